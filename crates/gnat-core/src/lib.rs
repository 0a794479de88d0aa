//! # Gnat Core
//!
//! Estimation math for a small quadrotor flying under an external
//! motion-capture system:
//! - Euler-angle to canonical unit-quaternion conversion
//! - Linear velocity recovery from position samples (finite difference
//!   plus a discrete low-pass differentiator)
//! - World-to-body frame rotation
//! - Assembly of the 13-element state vector consumed by the prediction
//!   solver
//!
//! Everything in this crate is deterministic and free of I/O; the shared
//! caches, solver bindings and publishing live in `gnat-node`.

pub mod attitude;
pub mod estimator;
pub mod rotation;
pub mod state;
pub mod velocity;
pub mod window;

// Re-export core types
pub use attitude::{euler_to_quaternion, EulerAngles};
pub use estimator::{SensorSnapshot, StateEstimator};
pub use rotation::world_to_body;
pub use state::{ControlVector, StateVector, CONTROL_DIM, STATE_DIM};
pub use velocity::VelocityEstimator;
pub use window::SampleWindow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
