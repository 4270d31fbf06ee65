//! flightctl - keyboard flight controls in the terminal
//!
//! Opens a HUD that shows the command state and actuator outputs, or with
//! `--preview` prints the actuator commands for one set of stick inputs.

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use flightctl::app::describe_actuation;
use flightctl::input::AxisSample;
use flightctl::render::{ColorTheme, TerminalHud};
use flightctl::{load_config, Application, ControlCommand, FlightController, InputFrame};
use flightctl::{ControllerConfig, SharedSensitivity};
use std::path::PathBuf;

fn axis_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("VALUE")
        .help(help)
        .value_parser(value_parser!(f32))
        .allow_negative_numbers(true)
        .requires("preview")
}

fn axis_value(matches: &ArgMatches, name: &str) -> Result<f32> {
    let value = matches.get_one::<f32>(name).copied().unwrap_or(0.0);
    if !(-1.0..=1.0).contains(&value) {
        anyhow::bail!("--{name} must be within [-1, 1], got {value}");
    }
    Ok(value)
}

fn preview(config: &ControllerConfig, matches: &ArgMatches) -> Result<()> {
    let axes = AxisSample::new(
        axis_value(matches, "pitch")?,
        axis_value(matches, "roll")?,
        axis_value(matches, "yaw")?,
    );

    let mut controller = FlightController::new(config, SharedSensitivity::new(config.sensitivity));
    let mut frame = InputFrame::new(axes);
    if matches.get_flag("flaps") {
        frame = frame.with_pressed(ControlCommand::FlapToggle);
    }
    controller.input_tick(&frame);

    let output = controller.recompute();
    for line in describe_actuation(controller.actuators(), &output) {
        println!("{line}");
    }
    println!("{}", controller.telemetry());
    Ok(())
}

fn hud_theme(matches: &ArgMatches) -> ColorTheme {
    if matches.get_flag("monochrome") {
        ColorTheme::monochrome()
    } else {
        ColorTheme::default()
    }
}

fn cli() -> Command {
    Command::new("flightctl")
        .version(flightctl::VERSION)
        .about("Keyboard flight controls with a terminal HUD")
        .long_about(
            "flightctl maps key presses and held keys onto thrust, brake, flap and stick \
             commands, mixes them onto the configured actuators and shows the result live.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file (defaults to the user config directory)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("preview")
                .long("preview")
                .help("Print actuator commands for the given stick position and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(axis_arg("pitch", "Pitch input for --preview, in [-1, 1]"))
        .arg(axis_arg("roll", "Roll input for --preview, in [-1, 1]"))
        .arg(axis_arg("yaw", "Yaw input for --preview, in [-1, 1]"))
        .arg(
            Arg::new("flaps")
                .long("flaps")
                .help("Deploy flaps for --preview")
                .action(ArgAction::SetTrue)
                .requires("preview"),
        )
        .arg(
            Arg::new("monochrome")
                .long("monochrome")
                .help("Draw the HUD without colors")
                .action(ArgAction::SetTrue)
                .conflicts_with("preview"),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let matches = cli().get_matches();

    let config_path = matches.get_one::<PathBuf>("config").cloned();
    let config = load_config(config_path.as_deref())?;

    if matches.get_flag("preview") {
        return preview(&config, &matches);
    }

    let hud = TerminalHud::with_theme(hud_theme(&matches));
    let mut app = Application::new(config_path, config, Box::new(hud));
    app.run().await?;

    Ok(())
}
