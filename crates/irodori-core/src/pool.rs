//! Fixed-capacity representor pool.
//!
//! All representors a scene will ever use are allocated up front; a
//! scan claims them one at a time through a monotonically advancing
//! cursor. Nothing destroys a representor mid-run — exhaustion is a
//! normal terminal condition for images with more distinct colors than
//! the pool holds, and the cursor only rewinds on a full cleanup.

use serde::{Deserialize, Serialize};

use crate::types::{ColorKey, Placement, RepresentorPrototype, Vec3};

/// Index of a representor inside its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepresentorId(pub(crate) usize);

impl RepresentorId {
    /// The raw pool index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// How a representor should be retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetireMode {
    /// Deactivate but keep attributes; the handle is reused for the
    /// next image. This is what the normal cleanup flow does.
    Deactivate,
    /// Deactivate and zero attributes, for collaborators that remove
    /// the visual permanently.
    Discard,
}

/// One reusable visual unit standing in for a single distinct color.
///
/// Attributes are overwritten each time the handle is newly bound to a
/// color; the handle itself lives as long as the pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Representor {
    /// The color this handle currently represents.
    pub color: ColorKey,
    /// Position in color space, recomputed from `color` on `apply`.
    pub position: Vec3,
    /// Target scale, uniform across axes.
    pub target_scale: f32,
    /// Whether the handle is currently placed in the scene.
    pub active: bool,
    /// Animation speed hint for presentation collaborators.
    pub scale_speed: f32,
    /// Oversized-material threshold hint for presentation collaborators.
    pub oversize_threshold: f32,
}

impl Representor {
    fn from_prototype(prototype: &RepresentorPrototype) -> Self {
        Self {
            color: ColorKey::new(0, 0, 0),
            position: Vec3::default(),
            target_scale: 0.0,
            active: false,
            scale_speed: prototype.scale_speed,
            oversize_threshold: prototype.oversize_threshold,
        }
    }

    /// Place-and-animate instruction: activate the handle and derive its
    /// position from its color.
    ///
    /// The position never changes across repeats of the same color, so
    /// recomputing it here is redundant — but it mirrors the place
    /// instruction being a single atomic step, and it re-activates a
    /// handle that was deactivated mid-run.
    pub fn apply(&mut self) {
        self.position = self.color.position();
        self.active = true;
    }

    /// Retire instruction: scale to nothing and deactivate.
    ///
    /// [`RetireMode::Discard`] additionally clears the color binding;
    /// [`RetireMode::Deactivate`] keeps attributes so the handle can be
    /// inspected or reused.
    pub fn retire(&mut self, mode: RetireMode) {
        self.target_scale = 0.0;
        self.active = false;
        if mode == RetireMode::Discard {
            self.color = ColorKey::new(0, 0, 0);
            self.position = Vec3::default();
        }
    }

    /// Snapshot this handle for export.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        Placement {
            color: self.color,
            position: self.position,
            scale: self.target_scale,
        }
    }
}

/// Pre-allocated pool of representors with a monotone claim cursor.
#[derive(Debug, Clone)]
pub struct RepresentorPool {
    slots: Vec<Representor>,
    cursor: usize,
}

impl RepresentorPool {
    /// Allocate `capacity` inactive representors stamped from the
    /// prototype.
    #[must_use]
    pub fn new(capacity: usize, prototype: &RepresentorPrototype) -> Self {
        let template = Representor::from_prototype(prototype);
        Self {
            slots: vec![template; capacity],
            cursor: 0,
        }
    }

    /// Claim the next unused representor, advancing the cursor.
    ///
    /// Returns `None` once the cursor reaches capacity. Exhaustion is
    /// expected for oversized inputs; callers stop assigning new colors
    /// but keep running.
    pub fn next(&mut self) -> Option<RepresentorId> {
        if self.cursor >= self.slots.len() {
            return None;
        }
        let id = RepresentorId(self.cursor);
        self.cursor += 1;
        Some(id)
    }

    /// Borrow a representor.
    #[must_use]
    pub fn get(&self, id: RepresentorId) -> Option<&Representor> {
        self.slots.get(id.0)
    }

    /// Mutably borrow a representor.
    pub fn get_mut(&mut self, id: RepresentorId) -> Option<&mut Representor> {
        self.slots.get_mut(id.0)
    }

    /// Total number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the next unclaimed slot.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewind the cursor so the whole pool is reusable.
    ///
    /// Only the cleanup flow calls this, after every claimed handle has
    /// been retired.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Iterate over the currently active representors.
    pub fn active(&self) -> impl Iterator<Item = &Representor> {
        self.slots.iter().filter(|r| r.active)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pool(capacity: usize) -> RepresentorPool {
        RepresentorPool::new(capacity, &RepresentorPrototype::default())
    }

    #[test]
    fn new_pool_is_fully_inactive() {
        let p = pool(8);
        assert_eq!(p.capacity(), 8);
        assert_eq!(p.cursor(), 0);
        assert_eq!(p.active().count(), 0);
    }

    #[test]
    fn next_advances_cursor_until_exhaustion() {
        let mut p = pool(2);
        assert_eq!(p.next(), Some(RepresentorId(0)));
        assert_eq!(p.next(), Some(RepresentorId(1)));
        assert_eq!(p.next(), None);
        // Exhaustion is stable, not transient.
        assert_eq!(p.next(), None);
        assert_eq!(p.cursor(), 2);
    }

    #[test]
    fn reset_cursor_makes_slots_claimable_again() {
        let mut p = pool(1);
        let first = p.next().unwrap();
        assert_eq!(p.next(), None);
        p.reset_cursor();
        assert_eq!(p.next(), Some(first));
    }

    #[test]
    fn apply_activates_and_positions_from_color() {
        let mut p = pool(1);
        let id = p.next().unwrap();
        let handle = p.get_mut(id).unwrap();
        handle.color = ColorKey::new(255, 0, 128);
        handle.target_scale = 1.0;
        handle.apply();

        assert!(handle.active);
        assert_eq!(handle.position, Vec3::new(255.0, 0.0, 128.0));
    }

    #[test]
    fn retire_deactivate_keeps_color() {
        let mut p = pool(1);
        let id = p.next().unwrap();
        let handle = p.get_mut(id).unwrap();
        handle.color = ColorKey::new(7, 8, 9);
        handle.target_scale = 3.0;
        handle.apply();
        handle.retire(RetireMode::Deactivate);

        assert!(!handle.active);
        assert!((handle.target_scale - 0.0).abs() < f32::EPSILON);
        assert_eq!(handle.color, ColorKey::new(7, 8, 9));
    }

    #[test]
    fn retire_discard_clears_attributes() {
        let mut p = pool(1);
        let id = p.next().unwrap();
        let handle = p.get_mut(id).unwrap();
        handle.color = ColorKey::new(7, 8, 9);
        handle.apply();
        handle.retire(RetireMode::Discard);

        assert!(!handle.active);
        assert_eq!(handle.color, ColorKey::new(0, 0, 0));
        assert_eq!(handle.position, Vec3::default());
    }

    #[test]
    fn prototype_hints_are_stamped_onto_slots() {
        let prototype = RepresentorPrototype {
            base_scale: 2.0,
            scale_speed: 0.5,
            oversize_threshold: 42.0,
        };
        let mut p = RepresentorPool::new(1, &prototype);
        let id = p.next().unwrap();
        let handle = p.get(id).unwrap();
        assert!((handle.scale_speed - 0.5).abs() < f32::EPSILON);
        assert!((handle.oversize_threshold - 42.0).abs() < f32::EPSILON);
    }
}
