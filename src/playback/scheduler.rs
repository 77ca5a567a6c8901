//! Tick pacing for playback
//!
//! The loop is cooperative and single-threaded: wait for one tick interval,
//! let the caller apply pending input, then run exactly one tick. `speed` is
//! re-read before every wait so a change lands on the next boundary.
//!
//! [`TickSource`] is the pacing seam: [`WallClockTicks`] sleeps for real,
//! [`ManualTicks`] returns immediately and records what it was asked for.

use std::thread;
use std::time::{Duration, Instant};

use crate::playback::controller::{BodySink, PlaybackController, TickOutcome};

pub trait TickSource {
    /// Suspend until the next tick at `speed` ticks per second
    fn wait(&mut self, speed: u32);
}

/// Sleeps `1 / speed` seconds measured from the previous tick.
/// A late tick is not made up for: the next interval starts from now.
#[derive(Debug)]
pub struct WallClockTicks {
    last: Option<Instant>,
}

impl WallClockTicks {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for WallClockTicks {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tick_interval(speed: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(speed.max(1)))
}

impl TickSource for WallClockTicks {
    fn wait(&mut self, speed: u32) {
        let interval = tick_interval(speed);
        if let Some(last) = self.last {
            let remaining = interval.saturating_sub(last.elapsed());
            if !remaining.is_zero() {
                thread::sleep(remaining);
            }
        } else {
            thread::sleep(interval);
        }
        self.last = Some(Instant::now());
    }
}

/// Deterministic tick source for tests and fast-forwarding
#[derive(Debug, Default)]
pub struct ManualTicks {
    requested: Vec<u32>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speeds passed to every `wait`, in order
    pub fn requested(&self) -> &[u32] {
        &self.requested
    }

    /// Simulated time the waits would have taken
    pub fn elapsed(&self) -> Duration {
        self.requested.iter().map(|&s| tick_interval(s)).sum()
    }
}

impl TickSource for ManualTicks {
    fn wait(&mut self, speed: u32) {
        self.requested.push(speed);
    }
}

/// Returned by the per-boundary hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Pairs a tick source with an optional tick budget
pub struct Scheduler<T: TickSource> {
    source: T,
    max_ticks: Option<u64>,
}

impl<T: TickSource> Scheduler<T> {
    pub fn new(source: T) -> Self {
        Self {
            source,
            max_ticks: None,
        }
    }

    /// Stop after `n` tick boundaries (paused boundaries count)
    pub fn with_max_ticks(mut self, n: u64) -> Self {
        self.max_ticks = Some(n);
        self
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    /// Run until `poll` returns `Stop`, `poll` fails, or the tick budget is spent.
    ///
    /// `poll` is called once per boundary, after the wait and before the tick,
    /// with the controller and sink so it can apply input and redraw.
    /// Returns the number of boundaries processed.
    pub fn run<S, F, E>(
        &mut self,
        controller: &mut PlaybackController,
        sink: &mut S,
        mut poll: F,
    ) -> Result<u64, E>
    where
        S: BodySink + ?Sized,
        F: FnMut(&mut PlaybackController, &mut S, TickOutcome) -> Result<LoopControl, E>,
    {
        let mut boundaries = 0;
        let mut last = TickOutcome::Skipped;

        loop {
            if self.max_ticks.is_some_and(|max| boundaries >= max) {
                break;
            }

            self.source.wait(controller.state().speed());

            if poll(controller, sink, last)? == LoopControl::Stop {
                break;
            }

            last = controller.tick(sink);
            boundaries += 1;
        }

        Ok(boundaries)
    }
}
