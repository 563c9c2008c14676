/*
 * Runs one traffic light and a handful of vehicles waiting to cross it.
 *
 * Each vehicle is a thread that blocks until the light hands it a green.
 * Once every vehicle has crossed, the light is stopped and the program exits.
 */

use std::process::ExitCode;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::{error, info, warn};

use traffic_light::config::{DEFAULT_MAX_UNITS, DEFAULT_MIN_UNITS};
use traffic_light::{Config, Delivery, Error, Result, TrafficLight, logging};

#[derive(Parser, Debug)]
#[command(name = "traffic-light", version, about = "Vehicles waiting at a randomly cycling traffic light")]
struct Args {
    /// Number of vehicles waiting at the light.
    #[arg(long, default_value_t = 3)]
    vehicles: usize,

    /// Shortest phase, in time units.
    #[arg(long, default_value_t = DEFAULT_MIN_UNITS)]
    min_units: u32,

    /// Longest phase, in time units.
    #[arg(long, default_value_t = DEFAULT_MAX_UNITS)]
    max_units: u32,

    /// Length of one time unit in milliseconds.
    #[arg(long, env = "TRAFFIC_LIGHT_TIME_UNIT_MS", default_value_t = 1000)]
    time_unit_ms: u64,

    /// Hand out phase changes oldest first instead of newest first.
    #[arg(long)]
    fifo: bool,

    /// More output, repeat for more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> Config {
        Config::default()
            .with_cycle_units(self.min_units, self.max_units)
            .with_time_unit(Duration::from_millis(self.time_unit_ms))
            .with_delivery(if self.fifo {
                Delivery::Fifo
            } else {
                Delivery::Lifo
            })
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "traffic light failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let light = Arc::new(TrafficLight::with_config(args.config())?);
    light.start()?;

    let vehicles = match spawn_vehicles(&light, args.vehicles) {
        Ok(vehicles) => vehicles,
        Err(err) => {
            light.stop();
            return Err(err);
        }
    };

    join_vehicles(&light, vehicles)?;
    light.stop();
    info!("all vehicles crossed");
    Ok(())
}

/*
 * Joins every vehicle and reports the first failure. After a failure the
 * light is stopped, which releases the vehicles still waiting so they can be
 * joined too.
 */
fn join_vehicles(light: &TrafficLight, vehicles: Vec<JoinHandle<Result<()>>>) -> Result<()> {
    let mut outcome = Ok(());
    for (vehicle, handle) in vehicles.into_iter().enumerate() {
        let crossed = handle
            .join()
            .unwrap_or_else(|_| Err(Error::VehiclePanicked { vehicle }));
        if let Err(err) = crossed {
            if outcome.is_ok() {
                warn!(vehicle, %err, "vehicle did not cross, stopping the light");
                light.stop();
                outcome = Err(err);
            }
        }
    }
    outcome
}

fn spawn_vehicles(light: &Arc<TrafficLight>, count: usize) -> Result<Vec<JoinHandle<Result<()>>>> {
    (0..count)
        .map(|vehicle| {
            let light = Arc::clone(light);
            thread::Builder::new()
                .name(format!("vehicle-{vehicle}"))
                .spawn(move || -> Result<()> {
                    info!(vehicle, phase = %light.current_phase(), "waiting at the light");
                    let green = light.wait_for_green()?;
                    info!(vehicle, sequence = green.sequence, "crossing on green");
                    Ok(())
                })
                .map_err(Error::Spawn)
        })
        .collect()
}
