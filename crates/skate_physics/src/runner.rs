//! Fixed-step runner
//!
//! Converts variable frame deltas into whole physics steps. Time that would need more
//! than `max_substeps` steps in one frame is dropped rather than carried, so a stalled
//! tab does not come back to a burst of catch-up steps.

#[derive(Clone, Debug)]
pub struct FixedStepRunner {
    timestep: f32,
    max_substeps: u32,
    accumulator: f32,
    steps: u64,
}

impl FixedStepRunner {
    pub fn new(timestep: f32, max_substeps: u32) -> Self {
        Self {
            timestep,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            steps: 0,
        }
    }

    /// Account for `delta` seconds and return how many steps to run now
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.accumulator += delta.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.timestep && steps < self.max_substeps {
            self.accumulator -= self.timestep;
            steps += 1;
        }
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.timestep);
        }
        self.steps += u64::from(steps);
        steps
    }

    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Steps run since creation
    pub fn total_steps(&self) -> u64 {
        self.steps
    }
}
