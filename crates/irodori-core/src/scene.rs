//! Scene owner: pool, registry, observers, and the single active task.
//!
//! [`ColorScene`] is the component the host talks to. It validates its
//! configuration once at construction, accepts images, and is driven by
//! the host's frame loop through [`tick`](ColorScene::tick) — each tick
//! resumes whichever task is active until it either suspends on the
//! frame budget or finishes.
//!
//! At most one task (scan or cleanup) owns the registry and pool cursor
//! at a time. There is no lock: starting a scan or a cleanup cancels
//! any in-flight task by dropping it, so the old run simply stops being
//! resumed. No rollback is performed — a cancelled scan leaves its
//! already-placed representors for the next cleanup to retire.

use image::RgbaImage;

use crate::cleanup::{CleanupStatus, CleanupTask};
use crate::clock::{Clock, FrameClock};
use crate::events::{Observers, SceneObserver, SubscriberId};
use crate::pool::{RepresentorPool, RetireMode};
use crate::registry::ColorRegistry;
use crate::scan::{ScanStatus, ScanTask};
use crate::types::{Placement, ScanSummary, SceneConfig, SceneError};

/// Outcome of one host tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No task is active.
    Idle,
    /// The active task suspended; tick again next frame.
    InProgress,
    /// The scan finished (fully or truncated by pool exhaustion).
    ScanComplete(ScanSummary),
    /// The cleanup finished; registry empty, pool cursor rewound.
    CleanupComplete,
}

enum Task {
    Scan(ScanTask),
    Cleanup(CleanupTask),
}

/// A color-space scatter scene driven by an external frame loop.
pub struct ColorScene<C: Clock = FrameClock> {
    config: SceneConfig,
    pool: RepresentorPool,
    registry: ColorRegistry,
    observers: Observers,
    clock: C,
    active: Option<Task>,
}

impl ColorScene<FrameClock> {
    /// Build a scene with the default wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] if the configuration does
    /// not validate.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        Self::with_clock(config, FrameClock)
    }
}

impl<C: Clock> ColorScene<C> {
    /// Build a scene with a caller-supplied clock.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] if the configuration does
    /// not validate.
    pub fn with_clock(config: SceneConfig, clock: C) -> Result<Self, SceneError> {
        config.validate()?;
        let pool = RepresentorPool::new(config.pool_capacity, &config.prototype);
        log::debug!("scene initialized: {} representors available", pool.capacity());
        Ok(Self {
            config,
            pool,
            registry: ColorRegistry::new(),
            observers: Observers::new(),
            clock,
            active: None,
        })
    }

    /// Accept an image for processing.
    ///
    /// Fires the image-loaded event immediately and queues a scan; the
    /// scan itself runs on subsequent [`tick`](Self::tick)s. Any
    /// in-flight task is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EmptyImage`] if the image has no pixels.
    pub fn process_image(&mut self, image: &RgbaImage) -> Result<(), SceneError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SceneError::EmptyImage);
        }
        log::debug!(
            "processing image: {}x{} ({} pixels)",
            image.width(),
            image.height(),
            u64::from(image.width()) * u64::from(image.height()),
        );
        self.observers.emit_image_loaded(image);
        self.active = Some(Task::Scan(ScanTask::new(image)));
        Ok(())
    }

    /// Begin retiring every registered representor.
    ///
    /// Cancels any in-flight scan or prior cleanup first, then runs in
    /// chunks across subsequent [`tick`](Self::tick)s. The in-scope
    /// flow passes [`RetireMode::Deactivate`] so handles are reused for
    /// the next image.
    pub fn start_cleanup(&mut self, mode: RetireMode) {
        self.active = Some(Task::Cleanup(CleanupTask::new(
            &self.registry,
            self.config.cleanup_chunk_divisor,
            mode,
        )));
    }

    /// Resume the active task for one frame.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(task) = self.active.take() else {
            return TickOutcome::Idle;
        };
        match task {
            Task::Scan(mut scan) => {
                match scan.resume(
                    &mut self.pool,
                    &mut self.registry,
                    &self.config,
                    &mut self.observers,
                    &self.clock,
                ) {
                    ScanStatus::InProgress => {
                        self.active = Some(Task::Scan(scan));
                        TickOutcome::InProgress
                    }
                    ScanStatus::Complete(summary) => TickOutcome::ScanComplete(summary),
                }
            }
            Task::Cleanup(mut cleanup) => {
                match cleanup.resume(&mut self.pool, &mut self.registry, &mut self.observers) {
                    CleanupStatus::InProgress => {
                        self.active = Some(Task::Cleanup(cleanup));
                        TickOutcome::InProgress
                    }
                    CleanupStatus::Complete => TickOutcome::CleanupComplete,
                }
            }
        }
    }

    /// Whether a task is waiting to be ticked.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Register an observer. The returned id must be passed to
    /// [`unsubscribe`](Self::unsubscribe) to detach it.
    pub fn subscribe(&mut self, observer: Box<dyn SceneObserver>) -> SubscriberId {
        self.observers.subscribe(observer)
    }

    /// Release a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of distinct colors currently represented.
    #[must_use]
    pub fn distinct_colors(&self) -> usize {
        self.registry.len()
    }

    /// The configuration the scene was built with.
    #[must_use]
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The representor pool, for inspection.
    #[must_use]
    pub const fn pool(&self) -> &RepresentorPool {
        &self.pool
    }

    /// Snapshot every active representor for export or display.
    #[must_use]
    pub fn placements(&self) -> Vec<Placement> {
        self.pool.active().map(crate::pool::Representor::placement).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::clock::testing::{SaturatingClock, ZeroClock};
    use crate::types::ColorKey;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        ImageLoaded,
        Started,
        Progress(u8),
        ScanDone,
        CleanupDone,
    }

    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl SceneObserver for Recorder {
        fn on_image_loaded(&mut self, _image: &RgbaImage) {
            self.events.borrow_mut().push(Event::ImageLoaded);
        }

        fn on_processing_started(&mut self) {
            self.events.borrow_mut().push(Event::Started);
        }

        fn on_progress(&mut self, percent: u8) {
            self.events.borrow_mut().push(Event::Progress(percent));
        }

        fn on_processing_complete(&mut self) {
            self.events.borrow_mut().push(Event::ScanDone);
        }

        fn on_cleanup_complete(&mut self) {
            self.events.borrow_mut().push(Event::CleanupDone);
        }
    }

    fn scene_with<C: Clock>(clock: C, capacity: usize) -> (ColorScene<C>, Rc<RefCell<Vec<Event>>>) {
        let config = SceneConfig {
            pool_capacity: capacity,
            ..SceneConfig::default()
        };
        let mut scene = ColorScene::with_clock(config, clock).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        scene.subscribe(Box::new(Recorder {
            events: Rc::clone(&events),
        }));
        (scene, events)
    }

    fn image_of(colors: &[(u8, u8, u8)]) -> RgbaImage {
        let mut img = RgbaImage::new(colors.len() as u32, 1);
        for (x, &(r, g, b)) in colors.iter().enumerate() {
            img.put_pixel(x as u32, 0, image::Rgba([r, g, b, 255]));
        }
        img
    }

    fn drive_to_completion<C: Clock>(scene: &mut ColorScene<C>) -> TickOutcome {
        loop {
            match scene.tick() {
                TickOutcome::InProgress => {}
                outcome => return outcome,
            }
        }
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = SceneConfig {
            pool_capacity: 0,
            ..SceneConfig::default()
        };
        assert!(matches!(
            ColorScene::new(config),
            Err(SceneError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn empty_image_is_rejected() {
        let (mut scene, _) = scene_with(ZeroClock, 8);
        let empty = RgbaImage::new(0, 0);
        assert!(matches!(
            scene.process_image(&empty),
            Err(SceneError::EmptyImage),
        ));
        assert!(!scene.is_busy());
    }

    #[test]
    fn tick_when_idle_reports_idle() {
        let (mut scene, _) = scene_with(ZeroClock, 8);
        assert_eq!(scene.tick(), TickOutcome::Idle);
    }

    #[test]
    fn full_scan_then_cleanup_lifecycle() {
        let (mut scene, events) = scene_with(ZeroClock, 8);
        let image = image_of(&[(255, 0, 0), (255, 0, 0), (0, 255, 0)]);

        scene.process_image(&image).unwrap();
        let outcome = drive_to_completion(&mut scene);
        let TickOutcome::ScanComplete(summary) = outcome else {
            panic!("expected scan completion, got {outcome:?}");
        };
        assert_eq!(summary.distinct_colors, 2);
        assert_eq!(scene.distinct_colors(), 2);
        assert_eq!(scene.placements().len(), 2);

        scene.start_cleanup(RetireMode::Deactivate);
        assert_eq!(drive_to_completion(&mut scene), TickOutcome::CleanupComplete);
        assert_eq!(scene.distinct_colors(), 0);
        assert_eq!(scene.pool().cursor(), 0);
        assert!(scene.placements().is_empty());

        let events = events.borrow();
        assert_eq!(
            *events,
            vec![
                Event::ImageLoaded,
                Event::Started,
                Event::ScanDone,
                Event::CleanupDone,
            ],
        );
    }

    #[test]
    fn starting_cleanup_cancels_inflight_scan() {
        // The saturating clock forces a yield after every pixel, so the
        // scan is guaranteed to still be in flight after one tick.
        let (mut scene, events) = scene_with(SaturatingClock, 8);
        let image = image_of(&[(1, 0, 0), (2, 0, 0), (3, 0, 0), (4, 0, 0)]);

        scene.process_image(&image).unwrap();
        assert_eq!(scene.tick(), TickOutcome::InProgress);

        scene.start_cleanup(RetireMode::Deactivate);
        assert_eq!(drive_to_completion(&mut scene), TickOutcome::CleanupComplete);

        // The cancelled scan never fired its completion event.
        let events = events.borrow();
        assert!(!events.contains(&Event::ScanDone));
        assert_eq!(
            events.iter().filter(|e| **e == Event::CleanupDone).count(),
            1,
        );
        assert_eq!(scene.distinct_colors(), 0);
        assert_eq!(scene.pool().cursor(), 0);
    }

    #[test]
    fn new_image_cancels_inflight_scan() {
        let (mut scene, _) = scene_with(SaturatingClock, 8);
        let first = image_of(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)]);
        let second = image_of(&[(9, 0, 0)]);

        scene.process_image(&first).unwrap();
        assert_eq!(scene.tick(), TickOutcome::InProgress);

        scene.process_image(&second).unwrap();
        let TickOutcome::ScanComplete(summary) = drive_to_completion(&mut scene) else {
            panic!("expected scan completion");
        };
        // Only the second image's single pixel was processed by the new
        // run; the first run's partial state remains until cleanup.
        assert_eq!(summary.total_pixels, 1);
        assert!(scene.registry_contains(ColorKey::new(9, 0, 0)));
    }

    #[test]
    fn registry_capped_at_pool_capacity() {
        let (mut scene, _) = scene_with(ZeroClock, 2);
        let image = image_of(&[(1, 0, 0), (2, 0, 0), (3, 0, 0), (4, 0, 0)]);

        scene.process_image(&image).unwrap();
        let TickOutcome::ScanComplete(summary) = drive_to_completion(&mut scene) else {
            panic!("expected scan completion");
        };
        assert!(summary.truncated);
        assert_eq!(scene.distinct_colors(), 2);
        assert!(scene.distinct_colors() <= scene.config().pool_capacity);
    }

    #[test]
    fn unsubscribed_observer_hears_nothing() {
        let (mut scene, events) = scene_with(ZeroClock, 8);
        let extra = Rc::new(RefCell::new(Vec::new()));
        let id = scene.subscribe(Box::new(Recorder {
            events: Rc::clone(&extra),
        }));
        assert!(scene.unsubscribe(id));

        let image = image_of(&[(1, 2, 3)]);
        scene.process_image(&image).unwrap();
        drive_to_completion(&mut scene);

        assert!(extra.borrow().is_empty());
        assert!(!events.borrow().is_empty());
    }

    impl<C: Clock> ColorScene<C> {
        fn registry_contains(&self, key: ColorKey) -> bool {
            self.registry.lookup(key).is_some()
        }
    }
}
