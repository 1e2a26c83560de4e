//! Entry point: parses CLI arguments, loads configuration, wires up the
//! simulation, and drives it to completion.

mod config;
mod downlink;
mod error;
mod ground_station;
mod link_policy;
mod log_emitter;
mod logger;
mod math;
mod propagator;
mod satellite;
mod sensor;
mod simulation;
mod spacing;
mod visibility;

use chrono::Utc;
use clap::Parser;
use error::CliError;
use ground_station::GroundStation;
use link_policy::{LinkPolicy, PolicyKind};
use log_emitter::LogEmitter;
use propagator::CircularOrbitPropagator;
use satellite::Satellite;
use sensor::Sensor;
use simulation::{Simulation, SimulationConfig};
use spacing::{SpacingKind, SpacingStrategy};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use visibility::ElevationMaskVisibility;

const DEFAULT_STEP_COUNT: u64 = 1_000;
const DEFAULT_STEP_DURATION_SECS: f64 = 60.0;
const DEFAULT_LINK_RATE_BPS: f64 = 8.0 * 1024.0 * 1024.0;
const DEFAULT_THRESH_COEFF: f64 = 0.05;
const DEFAULT_ORBIT_RADIUS_KM: f64 = 6371.0 + 550.0;
const DEFAULT_ANGULAR_RATE_RAD_PER_SEC: f64 = 0.0011;
const GROUND_STATION_COUNT: u32 = 3;

fn parse_policy(value: &str) -> Result<PolicyKind, String> {
    PolicyKind::parse(value).ok_or_else(|| CliError::UnknownPolicy(value.to_string()).to_string())
}

fn parse_spacing(value: &str) -> Result<SpacingKind, String> {
    SpacingKind::parse(value).ok_or_else(|| CliError::UnknownSpacing(value.to_string()).to_string())
}

/// `bent_pipe <config_dir> <log_dir> [policy] [spacing]`
#[derive(Parser, Debug)]
#[command(name = "bent_pipe")]
#[command(about = "Discrete-time low-Earth-orbit constellation simulator")]
#[command(version)]
struct Cli {
    /// Directory containing `sensor.dat` and `constellation.dat`.
    config_dir: PathBuf,

    /// Directory the CSV analytics streams are written into.
    log_dir: PathBuf,

    /// Link scheduling policy.
    #[arg(value_parser = parse_policy, default_value = "sticky")]
    policy: PolicyKind,

    /// Observation spacing strategy.
    #[arg(value_parser = parse_spacing, default_value = "bent-pipe")]
    spacing: SpacingKind,
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let sensor_config = config::load_sensor_config(&cli.config_dir)?;
    let constellation_config = config::load_constellation_config(&cli.config_dir)?;

    std::fs::create_dir_all(&cli.log_dir).map_err(|source| {
        CliError::Config(error::ConfigError::Io { path: cli.log_dir.clone(), source })
    })?;

    let now = Utc::now();
    let satellite_count = constellation_config.satellite_count;
    let satellites: Vec<Satellite> = (0..satellite_count)
        .map(|i| Satellite::new(i, (DEFAULT_ORBIT_RADIUS_KM, 0.0, 0.0), now))
        .collect();
    let sensors: HashMap<u32, Sensor> = satellites
        .iter()
        .map(|sat| {
            let sensor = Sensor::new(
                sat.sat_id(),
                sensor_config.bits_per_sense,
                sensor_config.max_buffer_capacity(),
                sat.eci_posn(),
                now,
            );
            (sat.sat_id(), sensor)
        })
        .collect();
    let ground_stations: Vec<GroundStation> = (0..GROUND_STATION_COUNT).map(GroundStation::new).collect();

    let spacing_strategy = SpacingStrategy::new(cli.spacing, satellites.len());
    let link_policy = LinkPolicy::new(cli.policy);
    let mut propagator =
        CircularOrbitPropagator::new(DEFAULT_ORBIT_RADIUS_KM, DEFAULT_ANGULAR_RATE_RAD_PER_SEC, now);
    let visibility = ElevationMaskVisibility::new(DEFAULT_STEP_COUNT, DEFAULT_STEP_DURATION_SECS as i64);
    let log_emitter = LogEmitter::new(cli.log_dir.clone());

    let config = SimulationConfig {
        thresh_coeff: DEFAULT_THRESH_COEFF,
        link_rate_bps: DEFAULT_LINK_RATE_BPS,
        step_duration_secs: DEFAULT_STEP_DURATION_SECS,
    };

    let mut simulation = Simulation::new(
        config,
        satellites,
        sensors,
        ground_stations,
        spacing_strategy,
        link_policy,
        &mut propagator,
        &visibility,
        log_emitter,
        now,
    );

    info!("starting run: {} satellites, policy={}, spacing={}", satellite_count, cli.policy, cli.spacing);
    simulation.run(DEFAULT_STEP_COUNT)?;
    info!("run complete: {} steps", DEFAULT_STEP_COUNT);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            fatal!("{e}");
            ExitCode::FAILURE
        }
    }
}
