//! Gnat - offline replay driver for the quadrotor estimation pipeline.
//!
//! Feeds a recorded (or synthesized) sensor log through the ingest handlers
//! and the fixed-rate prediction tick, with the passthrough solver standing
//! in for the real integrator, then exports the published estimates as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use gnat_node::{
    CollectingPublisher, EstimatorNode, MotorSpeeds, NodeConfig, PassthroughSolver,
    PositionSample, RateSample,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gnat")]
#[command(about = "Quadrotor state-estimation pipeline, offline replay mode")]
#[command(version)]
struct Args {
    /// Sensor log to replay (CSV: time,source,v1,v2,v3,v4). Synthesizes a
    /// hover trajectory when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Prediction tick rate (Hz)
    #[arg(long, default_value_t = 66.6)]
    frequency: f64,

    /// Solver discretization interval (s)
    #[arg(long, default_value_t = 0.015)]
    delay: f64,

    /// Length of the synthesized log when no input is given (s)
    #[arg(long, default_value_t = 10.0)]
    duration: f64,
}

// ---------------------------------------------------------------------------
// Sensor events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum SensorEvent {
    Position(PositionSample),
    Rates(RateSample),
    /// Raw stabilizer angles in degrees (pre sign normalization).
    Euler { roll: f64, pitch: f64, yaw: f64 },
    Motors(MotorSpeeds),
}

#[derive(Debug, Clone, Copy)]
struct TimedEvent {
    time: f64,
    event: SensorEvent,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let events = match &args.input {
        Some(path) => read_sensor_log(path)?,
        None => synthesize_log(args.duration),
    };
    tracing::info!(events = events.len(), "sensor log loaded");

    let config = NodeConfig {
        frequency_hz: args.frequency,
        delay: args.delay,
    };
    let publisher = Arc::new(CollectingPublisher::new());
    let mut node = EstimatorNode::new(config, PassthroughSolver::new(), Arc::clone(&publisher))?;

    replay(&mut node, &events);

    write_output(&args.output_dir, &publisher)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Drive the node over the event timeline: before each tick, deliver every
/// event whose timestamp has passed, in log order.
fn replay(
    node: &mut EstimatorNode<PassthroughSolver, CollectingPublisher>,
    events: &[TimedEvent],
) {
    let ingest = node.ingest();
    let period = node.config().period();
    let end_time = events.last().map(|e| e.time).unwrap_or(0.0);

    let mut next = 0usize;
    let mut previous = 0.0;
    let mut tick = 1u64;

    loop {
        let now = tick as f64 * period;
        if now > end_time + period {
            break;
        }

        while next < events.len() && events[next].time <= now {
            match events[next].event {
                SensorEvent::Position(p) => ingest.handle_position(p),
                SensorEvent::Rates(r) => ingest.handle_rates(r),
                SensorEvent::Euler { roll, pitch, yaw } => {
                    ingest.handle_attitude(events[next].time, roll, pitch, yaw)
                }
                SensorEvent::Motors(m) => ingest.handle_motors(m),
            }
            next += 1;
        }

        node.tick(now, previous);
        previous = now;
        tick += 1;
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn read_sensor_log(path: &PathBuf) -> Result<Vec<TimedEvent>> {
    // Motor rows carry four values, the others three; allow ragged rows.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening sensor log {:?}", path))?;

    let mut events = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("reading sensor log row {}", line + 2))?;
        let field = |i: usize| -> Result<f64> {
            row.get(i)
                .with_context(|| format!("row {}: missing column {}", line + 2, i))?
                .trim()
                .parse::<f64>()
                .with_context(|| format!("row {}: bad number in column {}", line + 2, i))
        };

        let time = field(0)?;
        let source = row.get(1).unwrap_or("").trim();
        let event = match source {
            "position" => SensorEvent::Position(PositionSample {
                x: field(2)?,
                y: field(3)?,
                z: field(4)?,
            }),
            "imu" => SensorEvent::Rates(RateSample {
                wx: field(2)?,
                wy: field(3)?,
                wz: field(4)?,
            }),
            "euler" => SensorEvent::Euler {
                roll: field(2)?,
                pitch: field(3)?,
                yaw: field(4)?,
            },
            "motors" => SensorEvent::Motors(MotorSpeeds {
                w1: field(2)? as i32,
                w2: field(3)? as i32,
                w3: field(4)? as i32,
                w4: field(5)? as i32,
            }),
            other => anyhow::bail!("row {}: unknown source {:?}", line + 2, other),
        };
        events.push(TimedEvent { time, event });
    }

    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok(events)
}

/// Deterministic hover-ish trajectory: a slow 0.5 m circle at 1 m altitude
/// with a matching gentle yaw sweep, sensors at 100 Hz, motors at 50 Hz.
fn synthesize_log(duration: f64) -> Vec<TimedEvent> {
    const SENSOR_HZ: f64 = 100.0;
    let steps = (duration * SENSOR_HZ) as usize;
    let mut events = Vec::with_capacity(steps * 4);

    for k in 0..steps {
        let t = k as f64 / SENSOR_HZ;
        let w = 0.4; // rad/s around the circle

        events.push(TimedEvent {
            time: t,
            event: SensorEvent::Position(PositionSample {
                x: 0.5 * (w * t).cos(),
                y: 0.5 * (w * t).sin(),
                z: 1.0,
            }),
        });
        events.push(TimedEvent {
            time: t,
            event: SensorEvent::Euler {
                roll: 2.0 * (w * t).sin(),
                pitch: 2.0 * (w * t).cos(),
                yaw: (w * t).to_degrees() % 360.0,
            },
        });
        events.push(TimedEvent {
            time: t,
            event: SensorEvent::Rates(RateSample {
                wx: 0.0,
                wy: 0.0,
                wz: w,
            }),
        });
        if k % 2 == 0 {
            events.push(TimedEvent {
                time: t,
                event: SensorEvent::Motors(MotorSpeeds {
                    w1: 18,
                    w2: 18,
                    w3: 18,
                    w4: 18,
                }),
            });
        }
    }
    events
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn write_output(output_dir: &PathBuf, publisher: &CollectingPublisher) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {:?}", output_dir))?;

    let state_path = output_dir.join("state_estimate.csv");
    let mut wtr = csv::Writer::from_path(&state_path)?;
    wtr.write_record([
        "time", "status", "x", "y", "z", "qw", "qx", "qy", "qz", "vbx", "vby", "vbz", "wx",
        "wy", "wz",
    ])?;
    for rec in publisher.states() {
        let x = rec.state.to_array();
        let mut row = vec![format!("{:.6}", rec.stamp), format!("{}", rec.status)];
        row.extend(x.iter().map(|v| format!("{:.6}", v)));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;

    let euler_path = output_dir.join("euler_angles.csv");
    let mut wtr = csv::Writer::from_path(&euler_path)?;
    wtr.write_record(["time", "roll_deg", "pitch_deg", "yaw_deg"])?;
    for rec in publisher.eulers() {
        wtr.write_record(&[
            format!("{:.6}", rec.stamp),
            format!("{:.6}", rec.roll_deg),
            format!("{:.6}", rec.pitch_deg),
            format!("{:.6}", rec.yaw_deg),
        ])?;
    }
    wtr.flush()?;

    tracing::info!(?state_path, ?euler_path, "replay output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_log_is_time_ordered() {
        let events = synthesize_log(1.0);
        assert!(!events.is_empty());
        for pair in events.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn test_replay_publishes_at_tick_rate() {
        let events = synthesize_log(2.0);
        let publisher = Arc::new(CollectingPublisher::new());
        let mut node = EstimatorNode::new(
            NodeConfig::default(),
            PassthroughSolver::new(),
            Arc::clone(&publisher),
        )
        .expect("setup");

        replay(&mut node, &events);

        let states = publisher.states();
        // Roughly duration * frequency ticks, all with success status.
        assert!(states.len() > 120 && states.len() < 145, "got {}", states.len());
        assert!(states.iter().all(|r| r.status == 0));
        // Euler records track the 100 Hz attitude stream, not the tick rate.
        assert_eq!(publisher.eulers().len(), 200);
    }
}
