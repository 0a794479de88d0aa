use gnat_core::{CONTROL_DIM, STATE_DIM};

// ---------------------------------------------------------------------------
// Solver interface
// ---------------------------------------------------------------------------

/// The opaque prediction/integration routine, narrowed to the fixed-size
/// vector contract the pipeline needs.
///
/// The call sequence per tick is `set_horizon`, `set_state`, `set_control`,
/// `solve`, `next_state`; `setup` runs exactly once before any tick. Status
/// codes follow the external convention: 0 is success, anything else is
/// forwarded to the consumer undecoded.
pub trait PredictionSolver {
    /// One-time initialization. Non-zero is fatal to the pipeline.
    fn setup(&mut self) -> i32;

    /// Set the discretization interval for the next solve.
    fn set_horizon(&mut self, horizon: f64);

    /// Set the initial state, in the 13-slot layout.
    fn set_state(&mut self, x0: &[f64; STATE_DIM]);

    /// Set the control inputs, in the 4-slot layout.
    fn set_control(&mut self, u0: &[f64; CONTROL_DIM]);

    /// Run one prediction step; must complete within a tick period.
    fn solve(&mut self) -> i32;

    /// The state vector produced by the last solve.
    fn next_state(&self) -> [f64; STATE_DIM];
}

// ---------------------------------------------------------------------------
// Passthrough
// ---------------------------------------------------------------------------

/// Echoes the state it was given with status 0. Stands in for the real
/// integrator during offline replay and in tests where only the assembled
/// state matters.
#[derive(Debug, Clone, Copy)]
pub struct PassthroughSolver {
    state: [f64; STATE_DIM],
}

impl PassthroughSolver {
    pub fn new() -> Self {
        Self {
            state: [0.0; STATE_DIM],
        }
    }
}

impl Default for PassthroughSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionSolver for PassthroughSolver {
    fn setup(&mut self) -> i32 {
        0
    }

    fn set_horizon(&mut self, _horizon: f64) {}

    fn set_state(&mut self, x0: &[f64; STATE_DIM]) {
        self.state = *x0;
    }

    fn set_control(&mut self, _u0: &[f64; CONTROL_DIM]) {}

    fn solve(&mut self) -> i32 {
        0
    }

    fn next_state(&self) -> [f64; STATE_DIM] {
        self.state
    }
}
