//! Drive the playback cursor over a loaded trajectory
//!
//! Each executed tick pushes the position of every body that has a record at
//! the current step into a [`BodySink`]. Bodies without a record keep whatever
//! the sink last received (stale position, never interpolated or hidden).

use log::info;

use crate::playback::state::{ControlEvent, PlaybackState};
use crate::playback::trajectory::Trajectory;
use crate::simulation::states::NVec3;

/// Rendering collaborator fed by the controller
pub trait BodySink {
    /// Move the body in rendering slot `slot` to `x`
    fn set_position(&mut self, slot: usize, body_id: u64, x: NVec3);

    /// The cursor wrapped back to the first step
    fn on_restart(&mut self) {}
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped,   // paused, or nothing to play
    Advanced,  // emitted one step, cursor moved on
    Restarted, // emitted the last step and wrapped to 0
}

/// Last-known position per rendering slot
#[derive(Debug, Clone, Default)]
pub struct PositionTable {
    positions: Vec<Option<NVec3>>,
    updates: usize,
}

impl PositionTable {
    pub fn new(slots: usize) -> Self {
        Self {
            positions: vec![None; slots],
            updates: 0,
        }
    }

    pub fn get(&self, slot: usize) -> Option<NVec3> {
        self.positions.get(slot).copied().flatten()
    }

    pub fn positions(&self) -> &[Option<NVec3>] {
        &self.positions
    }

    /// Total `set_position` calls received
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl BodySink for PositionTable {
    fn set_position(&mut self, slot: usize, _body_id: u64, x: NVec3) {
        if slot >= self.positions.len() {
            self.positions.resize(slot + 1, None);
        }
        self.positions[slot] = Some(x);
        self.updates += 1;
    }
}

pub struct PlaybackController {
    trajectory: Trajectory,
    state: PlaybackState,
    restarts: u64,
}

impl PlaybackController {
    pub fn new(trajectory: Trajectory) -> Self {
        Self::with_state(trajectory, PlaybackState::default())
    }

    pub fn with_state(trajectory: Trajectory, state: PlaybackState) -> Self {
        Self {
            trajectory,
            state,
            restarts: 0,
        }
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PlaybackState {
        &mut self.state
    }

    /// Number of times the cursor has wrapped
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Raw step number under the cursor, if there is any data
    pub fn current_step_number(&self) -> Option<u64> {
        self.trajectory.steps().get(self.state.current_step()).copied()
    }

    pub fn handle(&mut self, event: ControlEvent) {
        self.state.apply(event);
    }

    /// Run one scheduled tick
    pub fn tick<S: BodySink + ?Sized>(&mut self, sink: &mut S) -> TickOutcome {
        let num_steps = self.trajectory.num_steps();
        if !self.state.is_running() || num_steps == 0 {
            return TickOutcome::Skipped;
        }

        let step = self.trajectory.steps()[self.state.current_step()];
        for (slot, &id) in self.trajectory.bodies().ids().iter().enumerate() {
            if let Some(x) = self.trajectory.position(step, id) {
                sink.set_position(slot, id, x);
            }
        }

        if self.state.advance(num_steps) {
            self.restarts += 1;
            info!("Simulation restarting...");
            sink.on_restart();
            TickOutcome::Restarted
        } else {
            TickOutcome::Advanced
        }
    }
}
