//! Playback cursor and user-control transitions
//!
//! `PlaybackState` is owned by the controller and passed by reference to
//! whatever handles input; there is no global. All mutations go through
//! [`PlaybackState::apply`] or the tick path, on the same thread.

use log::debug;

pub const MIN_SPEED: u32 = 10; // frames per second
pub const MAX_SPEED: u32 = 200;
pub const SPEED_STEP: u32 = 20;
pub const DEFAULT_SPEED: u32 = 60;

/// Discrete user actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    TogglePlay,
    SpeedUp,
    SpeedDown,
    ResetView, // camera only, handled by the viewer
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    current_step: usize, // index into the sorted step list
    running: bool,
    speed: u32, // ticks per second, MIN_SPEED..=MAX_SPEED
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_step: 0,
            running: true,
            speed: DEFAULT_SPEED,
        }
    }
}

impl PlaybackState {
    /// Fresh state with a custom initial speed, clamped into range
    pub fn with_speed(speed: u32) -> Self {
        Self {
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            ..Self::default()
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn speed_up(&mut self) {
        self.speed = (self.speed + SPEED_STEP).min(MAX_SPEED);
    }

    pub fn speed_down(&mut self) {
        self.speed = self.speed.saturating_sub(SPEED_STEP).max(MIN_SPEED);
    }

    /// Apply one user event. `ResetView` leaves the state untouched.
    pub fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::TogglePlay => self.toggle_running(),
            ControlEvent::SpeedUp => self.speed_up(),
            ControlEvent::SpeedDown => self.speed_down(),
            ControlEvent::ResetView => {}
        }
        debug!(
            "{event:?}: running = {}, speed = {} fps",
            self.running, self.speed
        );
    }

    /// Move the cursor forward one index, wrapping to 0 at `num_steps`.
    /// Returns true when it wrapped.
    pub(crate) fn advance(&mut self, num_steps: usize) -> bool {
        self.current_step += 1;
        if self.current_step >= num_steps {
            self.current_step = 0;
            return true;
        }
        false
    }
}
