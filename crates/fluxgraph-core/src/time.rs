//! Simulated time and the clock seam.
//!
//! The scheduler never observes wall-clock time. It reads "now" exactly once
//! at the start of every tick through a [`Clock`], which makes a run fully
//! reproducible for a fixed graph, clock sequence and injection sequence.
//!
//! Two kinds of clock are supported:
//!
//! - [`VirtualClock`]: owned by the scheduler, advanced by the `dt` passed
//!   to each tick. This is the default.
//! - Any `Fn() -> Time` closure: an externally driven clock (for example a
//!   presentation layer's shared simulation time). `advance` is a no-op; the
//!   caller moves time itself between ticks.

/// Simulated time, in milliseconds.
pub type Time = f64;

/// Source of "now" for the scheduler.
pub trait Clock {
    /// Returns the current simulated time.
    fn now(&self) -> Time;

    /// Moves the clock forward by `dt`.
    ///
    /// Called once at the start of every tick, before [`now`](Self::now) is
    /// read. Externally driven clocks ignore it.
    fn advance(&mut self, _dt: Time) {}
}

impl<F> Clock for F
where
    F: Fn() -> Time,
{
    #[inline]
    fn now(&self) -> Time {
        self()
    }
}

/// Self-advancing simulated clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualClock {
    now: Time,
}

impl VirtualClock {
    /// Creates a clock at `t = 0`.
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Creates a clock starting at `start`.
    pub fn starting_at(start: Time) -> Self {
        Self { now: start }
    }
}

impl Clock for VirtualClock {
    #[inline]
    fn now(&self) -> Time {
        self.now
    }

    #[inline]
    fn advance(&mut self, dt: Time) {
        self.now += dt;
    }
}
