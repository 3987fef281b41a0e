//! Wall-clock abstraction for frame-budget measurement.
//!
//! The scan decides when to yield by comparing elapsed wall-clock time
//! against the configured frame budget. Putting the clock behind a
//! trait keeps that decision deterministic under test: scheduling tests
//! drive the scan with hand-written clocks instead of sleeping.
//!
//! The default [`FrameClock`] uses the `web-time` crate, which is
//! `std::time::Instant` on native and `performance.now()` on WASM.

use std::time::Duration;

/// A monotonic clock.
pub trait Clock {
    /// An opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Wall-clock time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by [`web_time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock;

impl Clock for FrameClock {
    type Instant = web_time::Instant;

    fn now(&self) -> Self::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &Self::Instant) -> Duration {
        since.elapsed()
    }
}

/// Deterministic clocks for scheduling tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use super::Clock;

    /// Time never advances: the frame budget is never exceeded, so a
    /// scan runs to completion in a single resume.
    pub struct ZeroClock;

    impl Clock for ZeroClock {
        type Instant = ();

        fn now(&self) {}

        fn elapsed(&self, (): &()) -> Duration {
            Duration::ZERO
        }
    }

    /// Every elapsed check reports the budget as blown, forcing a yield
    /// after each pixel.
    pub struct SaturatingClock;

    impl Clock for SaturatingClock {
        type Instant = ();

        fn now(&self) {}

        fn elapsed(&self, (): &()) -> Duration {
            Duration::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clock_elapsed_is_monotonic() {
        let clock = FrameClock;
        let start = clock.now();
        let first = clock.elapsed(&start);
        let second = clock.elapsed(&start);
        assert!(second >= first);
    }
}
