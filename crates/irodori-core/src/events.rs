//! Scene event observers.
//!
//! The source of this design used process-wide static events; here the
//! notification surface is an explicit registry owned by the scene.
//! Presentation collaborators (progress text, image display) implement
//! [`SceneObserver`] and subscribe; [`subscribe`](Observers::subscribe)
//! returns a [`SubscriberId`] that must be passed back to
//! [`unsubscribe`](Observers::unsubscribe) to detach the observer —
//! otherwise it stays registered for the life of the scene.

use image::RgbaImage;

/// Hooks fired by the scene as it works. All default to no-ops, so
/// collaborators implement only what they care about.
pub trait SceneObserver {
    /// A new image has been accepted for processing. Carries the
    /// decoded frame for display collaborators.
    fn on_image_loaded(&mut self, image: &RgbaImage) {
        let _ = image;
    }

    /// Pixel scanning has begun.
    fn on_processing_started(&mut self) {}

    /// Scan progress, in whole percent. Non-decreasing within one run.
    fn on_progress(&mut self, percent: u8) {
        let _ = percent;
    }

    /// Scanning ended — either every pixel was represented or the pool
    /// ran out. Fired exactly once per run.
    fn on_processing_complete(&mut self) {}

    /// All handles have been retired and scene state reset.
    fn on_cleanup_complete(&mut self) {}
}

/// Token identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Registry of subscribed observers, owned by the scene.
#[derive(Default)]
pub struct Observers {
    entries: Vec<(SubscriberId, Box<dyn SceneObserver>)>,
    next_id: u64,
}

impl Observers {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Keep the returned id: it is the only way
    /// to detach the observer later.
    pub fn subscribe(&mut self, observer: Box<dyn SceneObserver>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Remove a previously registered observer. Returns `false` if the
    /// id was already released.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no observers are subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn emit_image_loaded(&mut self, image: &RgbaImage) {
        for (_, observer) in &mut self.entries {
            observer.on_image_loaded(image);
        }
    }

    pub(crate) fn emit_processing_started(&mut self) {
        for (_, observer) in &mut self.entries {
            observer.on_processing_started();
        }
    }

    pub(crate) fn emit_progress(&mut self, percent: u8) {
        for (_, observer) in &mut self.entries {
            observer.on_progress(percent);
        }
    }

    pub(crate) fn emit_processing_complete(&mut self) {
        for (_, observer) in &mut self.entries {
            observer.on_processing_complete();
        }
    }

    pub(crate) fn emit_cleanup_complete(&mut self) {
        for (_, observer) in &mut self.entries {
            observer.on_cleanup_complete();
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
