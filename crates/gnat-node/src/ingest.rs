use crate::cache::SensorCache;
use crate::msg::{AttitudeSample, EulerRecord, MotorSpeeds, PositionSample, RateSample};
use crate::publish::StatePublisher;
use std::sync::Arc;

/// Transport-facing sensor handlers.
///
/// The transport layer calls one handler per arriving message, on whatever
/// thread it dispatches from and in no particular order relative to the
/// tick. Each handler only overwrites its latest-value cell; the attitude
/// handler additionally re-publishes the normalized angles as a convenience
/// for consumers that want them without the raw stabilizer sign.
pub struct SensorIngest<P: StatePublisher> {
    cache: Arc<SensorCache>,
    publisher: Arc<P>,
}

impl<P: StatePublisher> SensorIngest<P> {
    pub fn new(cache: Arc<SensorCache>, publisher: Arc<P>) -> Self {
        Self { cache, publisher }
    }

    /// Motion-capture position message.
    pub fn handle_position(&self, sample: PositionSample) {
        self.cache.position.update(sample);
    }

    /// IMU angular-rate message.
    pub fn handle_rates(&self, sample: RateSample) {
        self.cache.rates.update(sample);
    }

    /// Stabilizer euler-angle message, angles in degrees.
    ///
    /// The stabilizer reports pitch with the opposite sign to the estimator
    /// convention; it is flipped here, once, at the boundary.
    pub fn handle_attitude(&self, stamp: f64, roll_deg: f64, pitch_deg: f64, yaw_deg: f64) {
        let sample = AttitudeSample {
            stamp,
            roll_deg,
            pitch_deg: -pitch_deg,
            yaw_deg,
        };
        self.cache.attitude.update(sample);

        self.publisher.publish_euler(&EulerRecord {
            stamp,
            roll_deg: sample.roll_deg,
            pitch_deg: sample.pitch_deg,
            yaw_deg: sample.yaw_deg,
        });
    }

    /// Commanded motor speeds from the controller.
    pub fn handle_motors(&self, speeds: MotorSpeeds) {
        let mut history = self.cache.motors.read();
        history.push(speeds);
        self.cache.motors.update(history);
    }
}
