/// Pipeline construction errors.
///
/// Per-tick solver failures are deliberately *not* represented here: a
/// non-zero solve status is forwarded in the published record for the
/// consumer to act on, and stale sensor data is silent degradation by
/// design. Only one-time setup can abort the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("prediction solver setup returned status {0}")]
    SolverSetup(i32),
}
