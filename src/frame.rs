//! Fixed-step frame pacing

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame we accept before clamping (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Turns variable frame times into a number of fixed simulation ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add a frame's elapsed time and return how many ticks to run.
    /// Time beyond `MAX_SUBSTEPS` ticks is dropped so a slow device never
    /// builds up a backlog.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        self.accumulator = self.accumulator.min(SIM_DT);
        ticks
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
