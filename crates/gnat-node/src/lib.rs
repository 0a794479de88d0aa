//! # Gnat Node
//!
//! The estimation pipeline around `gnat-core`:
//! - latest-value sensor cache shared between transport handlers and the
//!   periodic tick
//! - ingest handlers, one per measurement source
//! - the injectable prediction-solver and publisher interfaces
//! - per-tick orchestration and the fixed-rate timer loop
//!
//! The transport layer itself (whatever delivers the sensor messages and
//! carries the published records) is an external collaborator; this crate
//! only defines the handler and publisher surfaces it plugs into.

pub mod cache;
pub mod config;
pub mod error;
pub mod ingest;
pub mod msg;
pub mod node;
pub mod publish;
pub mod solver;

pub use cache::{LatestCell, SensorCache};
pub use config::NodeConfig;
pub use error::NodeError;
pub use ingest::SensorIngest;
pub use msg::{
    AttitudeSample, EulerRecord, MotorHistory, MotorSpeeds, PositionSample, RateSample,
    StateEstimateRecord,
};
pub use node::EstimatorNode;
pub use publish::{CollectingPublisher, NullPublisher, StatePublisher};
pub use solver::{PassthroughSolver, PredictionSolver};
