//! Rendering collaborator without a display
//!
//! Keeps last-known positions and reports restarts through the log, so a
//! trajectory can be replayed from a script or over ssh.

use log::{info, trace};

use crate::playback::controller::{BodySink, PlaybackController, PositionTable};
use crate::playback::scheduler::{LoopControl, Scheduler, TickSource};
use crate::simulation::states::NVec3;

#[derive(Debug, Default)]
pub struct LogSink {
    table: PositionTable,
    restarts: u64,
}

impl LogSink {
    pub fn new(bodies: usize) -> Self {
        Self {
            table: PositionTable::new(bodies),
            restarts: 0,
        }
    }

    pub fn positions(&self) -> &PositionTable {
        &self.table
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }
}

impl BodySink for LogSink {
    fn set_position(&mut self, slot: usize, body_id: u64, x: NVec3) {
        trace!("body {body_id} (slot {slot}) -> [{:e}, {:e}, {:e}]", x.x, x.y, x.z);
        self.table.set_position(slot, body_id, x);
    }

    fn on_restart(&mut self) {
        self.restarts += 1;
        info!("restart #{}", self.restarts);
    }
}

/// Replay with `source` pacing until `max_ticks` boundaries, or forever when `None`
pub fn run_headless<T: TickSource>(
    controller: &mut PlaybackController,
    source: T,
    max_ticks: Option<u64>,
) -> LogSink {
    let mut sink = LogSink::new(controller.trajectory().bodies().len());
    let mut scheduler = Scheduler::new(source);
    if let Some(n) = max_ticks {
        scheduler = scheduler.with_max_ticks(n);
    }

    let ticks = scheduler
        .run(controller, &mut sink, |_, _, _| {
            Ok::<_, std::convert::Infallible>(LoopControl::Continue)
        })
        .unwrap_or_else(|never| match never {});

    info!(
        "headless playback stopped after {ticks} ticks at step index {}",
        controller.state().current_step()
    );
    sink
}
