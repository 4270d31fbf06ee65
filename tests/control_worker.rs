use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use flightctl::app::worker::control_worker_loop;
use flightctl::app::{ControlMessage, ControlResponse, FlightController};
use flightctl::config::ActuationConfig;
use flightctl::control::{BrakeStatus, CommandSet, Sensitivity, SharedSensitivity};
use flightctl::input::{AxisSample, InputFrame};
use flightctl::mixer::{Actuator, ControlRole};
use flightctl::ControlCommand;

const TIMEOUT_MS: u64 = 200;

async fn next_response(rx: &mut mpsc::Receiver<ControlResponse>) -> ControlResponse {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("worker response timed out")
        .expect("worker channel closed unexpectedly")
}

fn airframe() -> Vec<Option<Actuator>> {
    vec![
        Some(Actuator::new("elevator", ControlRole::Pitch, 1.0)),
        Some(Actuator::new("aileron_left", ControlRole::Roll, 1.0)),
        Some(Actuator::new("aileron_right", ControlRole::Roll, -1.0)),
        Some(Actuator::new("rudder", ControlRole::Yaw, 1.0)),
        Some(Actuator::new("flap", ControlRole::Flap, 1.0)),
    ]
}

fn spawn_worker(
    sensitivity: SharedSensitivity,
) -> (
    mpsc::Sender<ControlMessage>,
    mpsc::Receiver<ControlResponse>,
    tokio::task::JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (resp_tx, resp_rx) = mpsc::channel(8);
    let controller =
        FlightController::from_parts(airframe(), sensitivity, ActuationConfig::default());
    let worker = tokio::spawn(control_worker_loop(cmd_rx, resp_tx, controller));
    (cmd_tx, resp_rx, worker)
}

async fn snapshot(
    cmd_tx: &mpsc::Sender<ControlMessage>,
    resp_rx: &mut mpsc::Receiver<ControlResponse>,
) -> flightctl::Telemetry {
    cmd_tx.send(ControlMessage::Snapshot).await.unwrap();
    match next_response(resp_rx).await {
        ControlResponse::Snapshot(telemetry) => telemetry,
        other => panic!("expected snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn thrust_steps_and_saturates() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(SharedSensitivity::default());
    let press = InputFrame::default().with_pressed(ControlCommand::ThrustUp);

    for expected in [20, 40, 60, 80, 100, 100] {
        cmd_tx.send(ControlMessage::Input(press)).await.unwrap();
        match next_response(&mut resp_rx).await {
            ControlResponse::Fired {
                commands,
                telemetry,
            } => {
                assert!(commands.contains(ControlCommand::ThrustUp));
                // Truncated percent may read one lower because of float steps.
                assert!(
                    telemetry.thrust_percent == expected
                        || telemetry.thrust_percent + 1 == expected,
                    "got {} expected {expected}",
                    telemetry.thrust_percent
                );
            }
            other => panic!("expected fired response, got {other:?}"),
        }
    }

    cmd_tx.send(ControlMessage::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn held_button_fires_only_on_rising_edge() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(SharedSensitivity::default());
    let held = InputFrame::default().with_held(ControlCommand::BrakeToggle);

    for _ in 0..5 {
        cmd_tx.send(ControlMessage::Input(held)).await.unwrap();
    }
    match next_response(&mut resp_rx).await {
        ControlResponse::Fired { commands, .. } => {
            assert_eq!(commands, [ControlCommand::BrakeToggle].into_iter().collect::<CommandSet>());
        }
        other => panic!("expected fired response, got {other:?}"),
    }

    // Quiet ticks produce no responses, so the next one is the snapshot.
    assert_eq!(snapshot(&cmd_tx, &mut resp_rx).await.brake, BrakeStatus::On);

    cmd_tx.send(ControlMessage::Input(InputFrame::default())).await.unwrap();
    cmd_tx.send(ControlMessage::Input(held)).await.unwrap();
    next_response(&mut resp_rx).await;
    assert_eq!(snapshot(&cmd_tx, &mut resp_rx).await.brake, BrakeStatus::Off);

    cmd_tx.send(ControlMessage::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn physics_tick_mixes_current_state() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(SharedSensitivity::default());

    let frame = InputFrame::new(AxisSample::new(0.5, 1.0, -1.0))
        .with_pressed(ControlCommand::FlapToggle)
        .with_pressed(ControlCommand::BrakeToggle);
    cmd_tx.send(ControlMessage::Input(frame)).await.unwrap();
    next_response(&mut resp_rx).await;

    cmd_tx.send(ControlMessage::PhysicsTick).await.unwrap();
    match next_response(&mut resp_rx).await {
        ControlResponse::Actuation { frame, telemetry } => {
            let d: Vec<f32> = frame.deflections.iter().map(|d| d.unwrap()).collect();
            assert!((d[0] - 0.1).abs() < 1e-6);
            assert!((d[1] - 0.2).abs() < 1e-6);
            assert!((d[2] + 0.2).abs() < 1e-6);
            assert!((d[3] + 0.2).abs() < 1e-6);
            assert!((d[4] - 0.3).abs() < 1e-6);
            assert_eq!(frame.wheels.brake_torque, 100.0);
            assert_eq!(telemetry.brake, BrakeStatus::On);
        }
        other => panic!("expected actuation response, got {other:?}"),
    }

    cmd_tx.send(ControlMessage::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn sensitivity_is_reread_every_tick() {
    let sensitivity = SharedSensitivity::default();
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(sensitivity.clone());

    cmd_tx
        .send(ControlMessage::Input(InputFrame::new(AxisSample::new(1.0, 0.0, 0.0))))
        .await
        .unwrap();
    sensitivity.replace(Sensitivity {
        pitch: 0.7,
        ..Sensitivity::default()
    });

    cmd_tx.send(ControlMessage::PhysicsTick).await.unwrap();
    match next_response(&mut resp_rx).await {
        ControlResponse::Actuation { frame, .. } => {
            assert!((frame.deflections[0].unwrap() - 0.7).abs() < 1e-6);
        }
        other => panic!("expected actuation response, got {other:?}"),
    }

    cmd_tx.send(ControlMessage::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn actuator_update_returns_preview() {
    let (cmd_tx, mut resp_rx, worker) = spawn_worker(SharedSensitivity::default());
    cmd_tx
        .send(ControlMessage::Input(InputFrame::new(AxisSample::new(0.0, 0.0, 1.0))))
        .await
        .unwrap();

    let updated = vec![
        None,
        Some(Actuator::new("rudder", ControlRole::Yaw, 2.0)),
        Some(Actuator::new("spoiler", ControlRole::Roll, 1.0).passive()),
    ];
    cmd_tx
        .send(ControlMessage::UpdateActuators(updated.clone()))
        .await
        .unwrap();

    match next_response(&mut resp_rx).await {
        ControlResponse::Preview { actuators, frame } => {
            assert_eq!(actuators, updated);
            assert_eq!(frame.deflections.len(), 3);
            assert_eq!(frame.deflections[0], None);
            assert!((frame.deflections[1].unwrap() - 0.4).abs() < 1e-6);
            assert_eq!(frame.deflections[2], None);
        }
        other => panic!("expected preview response, got {other:?}"),
    }

    cmd_tx.send(ControlMessage::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn worker_exits_when_commands_close() {
    let (cmd_tx, _resp_rx, worker) = spawn_worker(SharedSensitivity::default());
    drop(cmd_tx);
    timeout(Duration::from_millis(TIMEOUT_MS), worker)
        .await
        .expect("worker did not stop")
        .unwrap();
}
