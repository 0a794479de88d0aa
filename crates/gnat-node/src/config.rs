use serde::{Deserialize, Serialize};

/// Pipeline timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Tick rate of the prediction step (Hz).
    pub frequency_hz: f64,
    /// Discretization interval handed to the solver each tick (s). Accounts
    /// for the actuation delay of the command path.
    pub delay: f64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 66.6,
            delay: 0.015,
        }
    }
}

impl NodeConfig {
    /// Tick period in seconds.
    pub fn period(&self) -> f64 {
        1.0 / self.frequency_hz
    }
}
