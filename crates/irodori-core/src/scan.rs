//! Frame-budgeted pixel scan.
//!
//! [`ScanTask`] walks every pixel of a frame in row-major order and
//! binds each distinct quantized color to a pooled representor. It is
//! an explicit resumable task: the host frame loop calls
//! [`resume`](ScanTask::resume) once per tick, and the task suspends
//! itself whenever the configured frame budget elapses, reporting
//! whole-percent progress on the way out.
//!
//! Per pixel:
//!
//! - **registry hit** — the representor's target scale grows by the
//!   configured increment (frequency accumulates visual size), and
//!   depending on [`RepeatPolicy`] the place-and-animate instruction is
//!   re-issued.
//! - **registry miss** — a representor is claimed from the pool, bound
//!   to the color at the prototype's base scale, placed, and recorded.
//!   If the pool is exhausted the scan stops immediately with a partial
//!   result; that is a warning, not an error.
//!
//! Exactly one completion event fires per run, truncated or not.

use image::RgbaImage;

use crate::clock::Clock;
use crate::decode;
use crate::events::Observers;
use crate::pool::RepresentorPool;
use crate::registry::ColorRegistry;
use crate::types::{ColorKey, RepeatPolicy, ScanSummary, SceneConfig};

/// Outcome of one [`ScanTask::resume`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// The frame budget elapsed; resume again next tick.
    InProgress,
    /// Every pixel was handled (or the pool ran out). The task is spent.
    Complete(ScanSummary),
}

/// Resumable scan over one frame's pixels.
pub struct ScanTask {
    keys: Vec<ColorKey>,
    index: usize,
    yields: usize,
    truncated: bool,
    started: bool,
}

impl ScanTask {
    /// Build a scan over `image`, quantizing its pixels up front.
    #[must_use]
    pub fn new(image: &RgbaImage) -> Self {
        Self {
            keys: decode::frame_keys(image),
            index: 0,
            yields: 0,
            truncated: false,
            started: false,
        }
    }

    /// Pixels handled so far.
    #[must_use]
    pub const fn pixels_processed(&self) -> usize {
        self.index
    }

    /// Total pixels in the frame.
    #[must_use]
    pub const fn total_pixels(&self) -> usize {
        self.keys.len()
    }

    /// Run until the frame budget elapses or the scan finishes.
    ///
    /// The budget is measured from resume entry, so each host tick gets
    /// a fresh allowance.
    pub fn resume<C: Clock>(
        &mut self,
        pool: &mut RepresentorPool,
        registry: &mut ColorRegistry,
        config: &SceneConfig,
        observers: &mut Observers,
        clock: &C,
    ) -> ScanStatus {
        if !self.started {
            self.started = true;
            observers.emit_processing_started();
        }

        let marker = clock.now();
        let total = self.keys.len();

        while self.index < total && !self.truncated {
            let key = self.keys[self.index];
            if !represent_pixel(key, pool, registry, config) {
                log::warn!(
                    "representor pool exhausted after {} of {total} pixels; \
                     image only partially represented",
                    self.index,
                );
                self.truncated = true;
                break;
            }
            self.index += 1;

            if clock.elapsed(&marker) >= config.frame_budget && self.index < total {
                observers.emit_progress(percent_done(self.index, total));
                self.yields += 1;
                return ScanStatus::InProgress;
            }
        }

        observers.emit_processing_complete();
        ScanStatus::Complete(ScanSummary {
            total_pixels: total,
            pixels_processed: self.index,
            distinct_colors: registry.len(),
            truncated: self.truncated,
            yields: self.yields,
        })
    }
}

/// Handle one pixel. Returns `false` when a representor was needed but
/// the pool had none left.
fn represent_pixel(
    key: ColorKey,
    pool: &mut RepresentorPool,
    registry: &mut ColorRegistry,
    config: &SceneConfig,
) -> bool {
    if let Some(id) = registry.lookup(key) {
        if let Some(handle) = pool.get_mut(id) {
            handle.target_scale += config.scale_increment;
            if config.repeat_policy == RepeatPolicy::RestartAnimation {
                handle.apply();
            }
        }
        return true;
    }

    let Some(id) = pool.next() else {
        return false;
    };
    if let Some(handle) = pool.get_mut(id) {
        handle.color = key;
        handle.target_scale = config.prototype.base_scale;
        handle.apply();
    }
    registry.insert(key, id);
    true
}

/// Whole-percent progress: `floor(done / total * 100)`.
#[allow(clippy::cast_possible_truncation)]
fn percent_done(done: usize, total: usize) -> u8 {
    debug_assert!(total > 0, "progress over an empty frame");
    ((done as u64).saturating_mul(100) / total.max(1) as u64) as u8
}
