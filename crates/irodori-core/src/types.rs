//! Shared types for the irodori scatter core.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// frames without depending on `image` directly.
pub use image::RgbaImage;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// A quantized color: three 8-bit channels.
///
/// Two pixels quantizing to the same key always map to the same
/// representor within a single scan run. Alpha is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorKey {
    /// Red channel, 0-255.
    pub r: u8,
    /// Green channel, 0-255.
    pub g: u8,
    /// Blue channel, 0-255.
    pub b: u8,
}

impl ColorKey {
    /// Create a key directly from 8-bit channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quantize normalized `[0.0, 1.0]` channels by truncating `x * 255`.
    ///
    /// Out-of-range inputs are clamped before truncation.
    #[must_use]
    pub fn from_normalized(r: f32, g: f32, b: f32) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn quantize(channel: f32) -> u8 {
            (channel.clamp(0.0, 1.0) * 255.0) as u8
        }
        Self {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
        }
    }

    /// Quantize an RGBA pixel, discarding alpha.
    #[must_use]
    pub const fn from_rgba(pixel: image::Rgba<u8>) -> Self {
        Self {
            r: pixel.0[0],
            g: pixel.0[1],
            b: pixel.0[2],
        }
    }

    /// The 3D position encoding this color: each channel becomes one
    /// axis, in `[0.0, 255.0]`. Independent of the representor's scale.
    #[must_use]
    pub fn position(self) -> Vec3 {
        Vec3::new(f32::from(self.r), f32::from(self.g), f32::from(self.b))
    }
}

/// A position in the 3D color space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// Red axis.
    pub x: f32,
    /// Green axis.
    pub y: f32,
    /// Blue axis.
    pub z: f32,
}

impl Vec3 {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One active representor, snapshotted for export or inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// The color this representor stands in for.
    pub color: ColorKey,
    /// Position in color space.
    pub position: Vec3,
    /// Target scale, uniform across axes. Grows with color frequency.
    pub scale: f32,
}

/// What should happen to a repeated color's representor beyond the
/// scale bump.
///
/// The source behavior re-issues the full place-and-animate instruction
/// on every repeat, restarting any in-flight scale animation. That may
/// be unintended, so it is a policy choice rather than hard-wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatPolicy {
    /// Re-apply position and re-trigger the animation on every repeat.
    /// Also re-activates a representor that was deactivated mid-run.
    #[default]
    RestartAnimation,
    /// Only bump the target scale; leave the representor otherwise
    /// untouched.
    ScaleOnly,
}

/// Visual template stamped onto every pool entry at creation.
///
/// The core never animates; these are hints carried on handles for
/// presentation collaborators (scale-in speed, oversized-material
/// threshold).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepresentorPrototype {
    /// Scale assigned when a representor is first bound to a color.
    pub base_scale: f32,
    /// Speed multiplier for scale animation.
    pub scale_speed: f32,
    /// Scale above which a collaborator should swap to an oversized
    /// material.
    pub oversize_threshold: f32,
}

impl RepresentorPrototype {
    /// Default first-assignment scale.
    pub const DEFAULT_BASE_SCALE: f32 = 1.0;
    /// Default animation speed multiplier.
    pub const DEFAULT_SCALE_SPEED: f32 = 1.0;
    /// Default oversized-material threshold.
    pub const DEFAULT_OVERSIZE_THRESHOLD: f32 = 10.0;
}

impl Default for RepresentorPrototype {
    fn default() -> Self {
        Self {
            base_scale: Self::DEFAULT_BASE_SCALE,
            scale_speed: Self::DEFAULT_SCALE_SPEED,
            oversize_threshold: Self::DEFAULT_OVERSIZE_THRESHOLD,
        }
    }
}

/// Configuration for a [`ColorScene`](crate::scene::ColorScene).
///
/// Construction-time only; not mutable at runtime. Validated by
/// [`validate`](Self::validate) before a scene is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Number of representors pre-allocated in the pool.
    ///
    /// The source capped this at a 257x257 grid (~66k entries), far
    /// below the 16.7M possible 8-bit colors. The cap is arbitrary, not
    /// a color-space bound; images with more distinct colors truncate.
    pub pool_capacity: usize,

    /// Maximum wall-clock time a single resume may spend before
    /// yielding back to the host frame loop.
    #[serde(with = "duration_serde")]
    pub frame_budget: Duration,

    /// Scale added (uniformly on all axes) each time an already-seen
    /// color repeats.
    pub scale_increment: f32,

    /// Cleanup retires `max(registered / divisor, 1)` representors per
    /// resume.
    pub cleanup_chunk_divisor: usize,

    /// What to do, beyond the scale bump, when a color repeats.
    pub repeat_policy: RepeatPolicy,

    /// Template used to create pool entries.
    pub prototype: RepresentorPrototype,
}

impl SceneConfig {
    /// Default pool capacity: the source's 257x257 grid constant.
    pub const DEFAULT_POOL_CAPACITY: usize = 257 * 257;
    /// Default frame budget: 1/30 second.
    pub const DEFAULT_FRAME_BUDGET: Duration = Duration::from_micros(33_333);
    /// Default per-repeat scale increment.
    pub const DEFAULT_SCALE_INCREMENT: f32 = 0.1;
    /// Default cleanup chunk divisor.
    pub const DEFAULT_CLEANUP_CHUNK_DIVISOR: usize = 50;

    /// Check the configuration for values the scene cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] naming the offending field
    /// when the pool is empty, the frame budget is zero, the chunk
    /// divisor is zero, or a scale parameter is not a finite
    /// non-negative number.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.pool_capacity == 0 {
            return Err(SceneError::InvalidConfig(
                "pool_capacity must be at least 1".to_owned(),
            ));
        }
        if self.frame_budget.is_zero() {
            return Err(SceneError::InvalidConfig(
                "frame_budget must be non-zero".to_owned(),
            ));
        }
        if self.cleanup_chunk_divisor == 0 {
            return Err(SceneError::InvalidConfig(
                "cleanup_chunk_divisor must be at least 1".to_owned(),
            ));
        }
        if !self.scale_increment.is_finite() || self.scale_increment < 0.0 {
            return Err(SceneError::InvalidConfig(
                "scale_increment must be finite and non-negative".to_owned(),
            ));
        }
        if !self.prototype.base_scale.is_finite() || self.prototype.base_scale <= 0.0 {
            return Err(SceneError::InvalidConfig(
                "prototype.base_scale must be finite and positive".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            pool_capacity: Self::DEFAULT_POOL_CAPACITY,
            frame_budget: Self::DEFAULT_FRAME_BUDGET,
            scale_increment: Self::DEFAULT_SCALE_INCREMENT,
            cleanup_chunk_divisor: Self::DEFAULT_CLEANUP_CHUNK_DIVISOR,
            repeat_policy: RepeatPolicy::default(),
            prototype: RepresentorPrototype::default(),
        }
    }
}

/// Counts collected from a single scan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Pixels in the source frame.
    pub total_pixels: usize,
    /// Pixels actually represented. Less than `total_pixels` only when
    /// the pool ran out.
    pub pixels_processed: usize,
    /// Distinct quantized colors assigned a representor.
    pub distinct_colors: usize,
    /// Whether the run stopped early because the pool was exhausted.
    pub truncated: bool,
    /// How many times the scan suspended to honor the frame budget.
    pub yields: usize,
}

/// Errors that can occur while building or feeding a scene.
///
/// Pool exhaustion is deliberately not here: it is a normal terminal
/// condition that truncates a scan, not an error.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Failed to decode the input image bytes.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image had no pixels.
    #[error("input image is empty")]
    EmptyImage,

    /// Scene configuration is invalid.
    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),
}
