use crate::cache::SensorCache;
use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::ingest::SensorIngest;
use crate::msg::StateEstimateRecord;
use crate::publish::StatePublisher;
use crate::solver::PredictionSolver;
use gnat_core::{StateEstimator, StateVector};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Estimator node
// ---------------------------------------------------------------------------

/// The periodic prediction step and everything it owns: the sensor cache it
/// reads, the estimator state, the solver and the publisher.
///
/// Construction runs the solver's one-time setup and fails hard on a
/// non-zero status; per-tick solver failures are forwarded in the published
/// record instead.
pub struct EstimatorNode<S: PredictionSolver, P: StatePublisher> {
    config: NodeConfig,
    cache: Arc<SensorCache>,
    publisher: Arc<P>,
    solver: S,
    estimator: StateEstimator,
    /// Start-time reference, set by the first tick.
    start_time: Option<f64>,
}

impl<S: PredictionSolver, P: StatePublisher> EstimatorNode<S, P> {
    pub fn new(config: NodeConfig, mut solver: S, publisher: Arc<P>) -> Result<Self, NodeError> {
        let status = solver.setup();
        if status != 0 {
            return Err(NodeError::SolverSetup(status));
        }
        tracing::info!(
            frequency_hz = config.frequency_hz,
            delay = config.delay,
            "estimator node ready"
        );
        Ok(Self {
            config,
            cache: Arc::new(SensorCache::new()),
            publisher,
            solver,
            estimator: StateEstimator::new(),
            start_time: None,
        })
    }

    /// Shared handle to the measurement cache.
    pub fn cache(&self) -> Arc<SensorCache> {
        Arc::clone(&self.cache)
    }

    /// Handler set for the transport layer to deliver messages into.
    pub fn ingest(&self) -> SensorIngest<P> {
        SensorIngest::new(Arc::clone(&self.cache), Arc::clone(&self.publisher))
    }

    pub fn config(&self) -> NodeConfig {
        self.config
    }

    /// One prediction tick.
    ///
    /// `now` and `previous` are the timer's current and previous invocation
    /// times in seconds; `previous` is 0 on the very first call, which
    /// establishes the start-time reference and runs with dt = 0.
    pub fn tick(&mut self, now: f64, previous: f64) {
        let first = previous == 0.0;
        if first {
            self.start_time = Some(now);
        }
        let dt = if first { 0.0 } else { now - previous };
        let elapsed = now - self.start_time.unwrap_or(now);

        // Assemble the solver input from the latest cached measurements.
        let snapshot = self.cache.snapshot();
        let state = self.estimator.update(&snapshot, dt, elapsed);
        let control = self.cache.control();

        self.solver.set_horizon(self.config.delay);
        self.solver.set_state(&state.to_array());
        self.solver.set_control(&control.to_array());

        let status = self.solver.solve();
        if status != 0 {
            tracing::warn!(status, "prediction solve returned non-zero status");
        }
        let next = self.solver.next_state();

        // Publish regardless of status; the consumer decides what a failed
        // solve means.
        self.publisher.publish_state(&StateEstimateRecord {
            stamp: now,
            status,
            state: StateVector::from_array(&next),
        });
    }

    /// Fixed-rate tick loop.
    ///
    /// Sleeps on a deadline schedule so the cadence does not drift with tick
    /// cost, and checks `stop` between ticks. Timestamps are seconds since
    /// loop entry, offset by one period so the first tick's `previous`
    /// argument can be the 0 sentinel.
    pub fn run(&mut self, stop: &AtomicBool) {
        let period = Duration::from_secs_f64(self.config.period());
        let epoch = Instant::now();
        let mut deadline = epoch + period;
        let mut previous = 0.0;

        while !stop.load(Ordering::Relaxed) {
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
            let now = (deadline - epoch).as_secs_f64();
            self.tick(now, previous);
            previous = now;
            deadline += period;
        }
        tracing::info!("estimator node stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::{MotorSpeeds, PositionSample, RateSample};
    use crate::publish::CollectingPublisher;
    use crate::solver::PassthroughSolver;
    use gnat_core::{CONTROL_DIM, STATE_DIM};

    const DT: f64 = 0.02;

    fn node() -> (
        EstimatorNode<PassthroughSolver, CollectingPublisher>,
        Arc<CollectingPublisher>,
    ) {
        let publisher = Arc::new(CollectingPublisher::new());
        let node = EstimatorNode::new(
            NodeConfig::default(),
            PassthroughSolver::new(),
            Arc::clone(&publisher),
        )
        .expect("setup");
        (node, publisher)
    }

    /// Solver stub that fails setup.
    struct BrokenSetup;

    impl PredictionSolver for BrokenSetup {
        fn setup(&mut self) -> i32 {
            3
        }
        fn set_horizon(&mut self, _horizon: f64) {}
        fn set_state(&mut self, _x0: &[f64; STATE_DIM]) {}
        fn set_control(&mut self, _u0: &[f64; CONTROL_DIM]) {}
        fn solve(&mut self) -> i32 {
            0
        }
        fn next_state(&self) -> [f64; STATE_DIM] {
            [0.0; STATE_DIM]
        }
    }

    /// Solver stub whose every solve fails with a fixed status.
    struct FailingSolve {
        inner: PassthroughSolver,
    }

    impl PredictionSolver for FailingSolve {
        fn setup(&mut self) -> i32 {
            0
        }
        fn set_horizon(&mut self, horizon: f64) {
            self.inner.set_horizon(horizon);
        }
        fn set_state(&mut self, x0: &[f64; STATE_DIM]) {
            self.inner.set_state(x0);
        }
        fn set_control(&mut self, u0: &[f64; CONTROL_DIM]) {
            self.inner.set_control(u0);
        }
        fn solve(&mut self) -> i32 {
            17
        }
        fn next_state(&self) -> [f64; STATE_DIM] {
            self.inner.next_state()
        }
    }

    #[test]
    fn test_failed_setup_is_fatal() {
        let publisher = Arc::new(CollectingPublisher::new());
        let err = EstimatorNode::new(NodeConfig::default(), BrokenSetup, publisher)
            .err()
            .expect("setup must fail");
        assert!(matches!(err, NodeError::SolverSetup(3)));
    }

    #[test]
    fn test_failed_solve_still_publishes() {
        let publisher = Arc::new(CollectingPublisher::new());
        let mut node = EstimatorNode::new(
            NodeConfig::default(),
            FailingSolve {
                inner: PassthroughSolver::new(),
            },
            Arc::clone(&publisher),
        )
        .expect("setup");

        node.tick(DT, 0.0);

        let states = publisher.states();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].status, 17);
    }

    #[test]
    fn test_tick_with_empty_cache_publishes_identity_attitude() {
        let (mut node, publisher) = node();
        node.tick(DT, 0.0);

        let states = publisher.states();
        assert_eq!(states.len(), 1);
        let x = states[0].state.to_array();
        assert_eq!(x[3], 1.0);
        assert_eq!(x[0], 0.0);
        assert_eq!(x[7], 0.0);
    }

    #[test]
    fn test_stale_cache_reused_across_ticks() {
        let (mut node, publisher) = node();
        let ingest = node.ingest();
        ingest.handle_rates(RateSample {
            wx: 0.1,
            wy: 0.2,
            wz: 0.3,
        });

        node.tick(DT, 0.0);
        // No new messages before the second tick: same rates again.
        node.tick(2.0 * DT, DT);

        let states = publisher.states();
        assert_eq!(states.len(), 2);
        for rec in &states {
            let x = rec.state.to_array();
            assert_eq!((x[10], x[11], x[12]), (0.1, 0.2, 0.3));
        }
    }

    #[test]
    fn test_end_to_end_step_velocity() {
        // Six position samples (0,0,0) x4, (1,0,0), (2,0,0) at 20 ms ticks
        // with identity attitude: the assembled body-x velocity on the sixth
        // tick is (2-1)/0.02 = 50, surfaced through the passthrough solver.
        let (mut node, publisher) = node();
        let ingest = node.ingest();

        let mut previous = 0.0;
        for k in 1..=6 {
            let pos = match k {
                5 => PositionSample {
                    x: 1.0,
                    y: 0.0,
                    z: 0.0,
                },
                6 => PositionSample {
                    x: 2.0,
                    y: 0.0,
                    z: 0.0,
                },
                _ => PositionSample::default(),
            };
            ingest.handle_position(pos);
            let now = k as f64 * DT;
            node.tick(now, previous);
            previous = now;
        }

        let states = publisher.states();
        assert_eq!(states.len(), 6);
        let x = states[5].state.to_array();
        assert!((x[7] - 50.0).abs() < 1e-9, "body vx {} != 50", x[7]);
        assert!(x[8].abs() < 1e-12);
        assert!(x[9].abs() < 1e-12);
    }

    #[test]
    fn test_control_vector_reaches_solver() {
        // Passthrough ignores control, so capture it with a recording stub.
        struct RecordingSolver {
            inner: PassthroughSolver,
            last_control: [f64; CONTROL_DIM],
            last_horizon: f64,
        }
        impl PredictionSolver for RecordingSolver {
            fn setup(&mut self) -> i32 {
                0
            }
            fn set_horizon(&mut self, horizon: f64) {
                self.last_horizon = horizon;
            }
            fn set_state(&mut self, x0: &[f64; STATE_DIM]) {
                self.inner.set_state(x0);
            }
            fn set_control(&mut self, u0: &[f64; CONTROL_DIM]) {
                self.last_control = *u0;
            }
            fn solve(&mut self) -> i32 {
                0
            }
            fn next_state(&self) -> [f64; STATE_DIM] {
                self.inner.next_state()
            }
        }

        let publisher = Arc::new(CollectingPublisher::new());
        let mut node = EstimatorNode::new(
            NodeConfig::default(),
            RecordingSolver {
                inner: PassthroughSolver::new(),
                last_control: [0.0; CONTROL_DIM],
                last_horizon: 0.0,
            },
            Arc::clone(&publisher),
        )
        .expect("setup");

        node.ingest().handle_motors(MotorSpeeds {
            w1: 14,
            w2: 15,
            w3: 16,
            w4: 17,
        });
        node.tick(DT, 0.0);

        assert_eq!(node.solver.last_control, [14.0, 15.0, 16.0, 17.0]);
        assert!((node.solver.last_horizon - 0.015).abs() < 1e-12);
    }
}
