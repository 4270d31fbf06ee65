use flightctl::control::{CommandSet, CommandState, ControlCommand, Sensitivity};
use flightctl::input::{AxisSample, ButtonEdgeState, InputEdgeDispatcher, InputFrame};
use flightctl::mixer::{Actuator, ControlRole, SurfaceMixer};
use proptest::prelude::*;

fn command() -> impl Strategy<Value = ControlCommand> {
    prop::sample::select(ControlCommand::ALL.to_vec())
}

fn command_set() -> impl Strategy<Value = CommandSet> {
    prop::collection::vec(command(), 0..4).prop_map(|commands| commands.into_iter().collect())
}

fn axis() -> impl Strategy<Value = f32> {
    prop_oneof![
        -2.0f32..2.0,
        Just(f32::NAN),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
    ]
}

fn frame() -> impl Strategy<Value = InputFrame> {
    (axis(), axis(), axis(), command_set(), command_set()).prop_map(
        |(pitch, roll, yaw, pressed, held)| InputFrame {
            axes: AxisSample::new(pitch, roll, yaw),
            pressed,
            held,
        },
    )
}

fn role() -> impl Strategy<Value = ControlRole> {
    prop::sample::select(vec![
        ControlRole::Pitch,
        ControlRole::Roll,
        ControlRole::Yaw,
        ControlRole::Flap,
        ControlRole::None,
    ])
}

fn actuators() -> impl Strategy<Value = Vec<Option<Actuator>>> {
    prop::collection::vec(
        prop::option::of((role(), -3.0f32..3.0, any::<bool>()).prop_map(|(role, gain, control)| {
            let actuator = Actuator::new("surface", role, gain);
            if control {
                actuator
            } else {
                actuator.passive()
            }
        })),
        0..12,
    )
}

fn tuning() -> impl Strategy<Value = Sensitivity> {
    (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0.01f32..1.0).prop_map(
        |(pitch, roll, yaw, thrust_step)| Sensitivity {
            pitch,
            roll,
            yaw,
            thrust_step,
        },
    )
}

proptest! {
    #[test]
    fn state_stays_in_bounds(frames in prop::collection::vec(frame(), 1..64), tuning in tuning()) {
        let dispatcher = InputEdgeDispatcher::new(0.3);
        let mut state = CommandState::new();
        let mut edges = ButtonEdgeState::new();

        for frame in &frames {
            let outcome = dispatcher.tick(state, edges, frame, &tuning);
            state = outcome.state;
            edges = outcome.edges;

            prop_assert!((0.0..=1.0).contains(&state.thrust()));
            prop_assert!(state.flap() == 0.0 || state.flap() == 0.3);
            for value in [state.pitch(), state.roll(), state.yaw()] {
                prop_assert!((-1.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn continuous_hold_fires_once(command in command(), ticks in 1usize..50) {
        let dispatcher = InputEdgeDispatcher::new(0.3);
        let tuning = Sensitivity::default();
        let held = InputFrame::default().with_held(command);
        let mut state = CommandState::new();
        let mut edges = ButtonEdgeState::new();
        let mut fired = 0;

        for _ in 0..ticks {
            let outcome = dispatcher.tick(state, edges, &held, &tuning);
            state = outcome.state;
            edges = outcome.edges;
            if outcome.fired.contains(command) {
                fired += 1;
            }
        }
        prop_assert_eq!(fired, 1);
    }

    #[test]
    fn fired_is_subset_of_pressed_or_held(frames in prop::collection::vec(frame(), 1..32)) {
        let dispatcher = InputEdgeDispatcher::new(0.3);
        let tuning = Sensitivity::default();
        let mut state = CommandState::new();
        let mut edges = ButtonEdgeState::new();

        for frame in &frames {
            let outcome = dispatcher.tick(state, edges, frame, &tuning);
            for command in outcome.fired.iter() {
                prop_assert!(frame.pressed.contains(command) || frame.held.contains(command));
            }
            state = outcome.state;
            edges = outcome.edges;
        }
    }

    #[test]
    fn double_toggle_restores_brake_and_flap(presses in 0usize..10) {
        let mut state = CommandState::new();
        for _ in 0..presses {
            state.toggle_brake();
            state.toggle_flap(0.3);
        }
        prop_assert_eq!(state.brake_active(), presses % 2 == 1);
        prop_assert_eq!(state.flap() > 0.0, presses % 2 == 1);
    }

    #[test]
    fn mixing_is_pure_and_skips_non_participants(
        actuators in actuators(),
        axes in (axis(), axis(), axis()),
        tuning in tuning(),
    ) {
        let mut state = CommandState::new();
        let sample = AxisSample::new(axes.0, axes.1, axes.2);
        state.set_axes(sample.pitch, sample.roll, sample.yaw);
        let mixer = SurfaceMixer::new(actuators.clone());

        let first = mixer.mix(&state, &tuning);
        prop_assert_eq!(&first, &mixer.mix(&state, &tuning));

        for command in &first {
            let actuator = actuators[command.index].as_ref().unwrap();
            prop_assert!(actuator.is_control_actuator);
            prop_assert!(actuator.role != ControlRole::None);
            prop_assert!(command.deflection.is_finite());
        }
        let participating = actuators
            .iter()
            .flatten()
            .filter(|a| a.is_control_actuator && a.role != ControlRole::None)
            .count();
        prop_assert_eq!(first.len(), participating);
    }
}
