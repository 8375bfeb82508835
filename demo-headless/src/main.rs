//! Headless transient conduction run
//!
//! Computes the temperature history of a square plate and writes one text frame per
//! time step to stdout (or a file). Logging goes to stderr so frames can be piped.

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use heat_sim_core::{
    Backend, HeatSimError, InitialCondition, ParamOverrides, Simulation, SimulationParams,
    StabilityPolicy, StatusCode, TextFrameWriter,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Transient 2-D heat conduction on a square plate with adiabatic edges
#[derive(Parser, Debug)]
#[command(name = "transient", version)]
#[command(about = "Transient 2-D heat conduction on a square plate", long_about = None)]
#[command(arg_required_else_help = true, allow_negative_numbers = true)]
struct Args {
    /// Number of grid points in x and y (decimals will be truncated)
    #[arg(required_unless_present = "config", value_parser = parse_truncated)]
    npts: Option<usize>,

    /// Number of time steps (decimals will be truncated)
    #[arg(required_unless_present = "config", value_parser = parse_truncated)]
    nt: Option<usize>,

    /// Size of the time steps, in seconds
    #[arg(required_unless_present = "config")]
    dt: Option<f32>,

    /// Thermal diffusivity, in m^2/s
    #[arg(required_unless_present = "config")]
    alpha: Option<f32>,

    /// Side length of the plate in meters
    #[arg(short, long)]
    length: Option<f32>,

    /// Load run parameters from a JSON file; positionals and options given on the
    /// command line replace the file's values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resolved run parameters to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Treat a Fourier number above 1/4 as an error instead of a warning
    #[arg(long)]
    strict_stability: bool,

    /// How each time step is spread over threads
    #[arg(short, long, value_enum, default_value_t = BackendKind::Threaded)]
    backend: BackendKind,

    /// Interior worker threads for the threaded backend
    #[arg(short, long, default_value_t = heat_sim_core::solver::DEFAULT_WORKERS)]
    workers: usize,

    /// Write frames to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Initial body temperature in °C
    #[arg(long, default_value_t = heat_sim_core::grid::initial::INIT_TEMP_BODY)]
    body: f32,

    /// Corner temperatures in °C: top-left,top-right,bottom-right,bottom-left
    #[arg(long, value_delimiter = ',')]
    corners: Option<Vec<f32>>,

    /// Log field statistics every N steps (0 = never)
    #[arg(short, long, default_value_t = 0)]
    report_interval: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Whole step on the main thread
    Serial,
    /// One thread per interior partition, boundary on the main thread
    Threaded,
    /// Rayon thread pool
    Rayon,
}

/// Parse a non-negative count, truncating any fractional part.
fn parse_truncated(s: &str) -> Result<usize, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("'{s}' must be a non-negative number"));
    }
    Ok(value.trunc() as usize)
}

impl Args {
    /// Command-line values, each replacing the config file's (or the default) value.
    fn overrides(&self) -> ParamOverrides {
        ParamOverrides {
            grid_points: self.npts,
            time_steps: self.nt,
            dt: self.dt,
            alpha: self.alpha,
            side_length: self.length,
            stability: self.strict_stability.then_some(StabilityPolicy::Reject),
        }
    }

    fn params(&self) -> Result<SimulationParams, HeatSimError> {
        if let Some(path) = &self.config {
            return SimulationParams::load_json_with(path, self.overrides());
        }

        match (self.npts, self.nt, self.dt, self.alpha) {
            (Some(npts), Some(nt), Some(dt), Some(alpha)) => {
                SimulationParams::new(npts, nt, dt, alpha)?.with_overrides(self.overrides())
            }
            _ => {
                let given = [
                    self.npts.is_some(),
                    self.nt.is_some(),
                    self.dt.is_some(),
                    self.alpha.is_some(),
                ];
                Err(HeatSimError::ArgumentCount {
                    expected: given.len(),
                    found: given.iter().filter(|&&p| p).count(),
                })
            }
        }
    }

    fn backend(&self) -> Result<Backend, HeatSimError> {
        match self.backend {
            BackendKind::Serial => Ok(Backend::Serial),
            BackendKind::Rayon => Ok(Backend::Rayon),
            BackendKind::Threaded if self.workers == 0 => Err(HeatSimError::invalid_parameter(
                "workers",
                "must be at least 1, got 0",
            )),
            BackendKind::Threaded => Ok(Backend::threaded(self.workers)),
        }
    }

    fn initial_condition(&self) -> Result<InitialCondition, HeatSimError> {
        let mut condition = InitialCondition {
            body: self.body,
            ..InitialCondition::default()
        };
        if let Some(corners) = &self.corners {
            condition.corners = <[f32; 4]>::try_from(corners.as_slice()).map_err(|_| {
                HeatSimError::invalid_parameter(
                    "corners",
                    format!("expected 4 temperatures, got {}", corners.len()),
                )
            })?;
        }
        Ok(condition)
    }

    fn output(&self) -> Result<Box<dyn Write>, HeatSimError> {
        match &self.output {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    HeatSimError::invalid_parameter(
                        "output",
                        format!("cannot write {}: {e}", path.display()),
                    )
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Status code for a clap parse failure.
fn argument_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => StatusCode::Ok,
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::UnknownArgument
        | ErrorKind::TooManyValues
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues => StatusCode::BadArgumentCount,
        _ => StatusCode::InvalidArgument,
    }
}

fn argument_error(e: &clap::Error) -> ExitCode {
    let _ = e.print();
    ExitCode::from(argument_status(e.kind()).as_u8())
}

fn run(args: &Args) -> Result<(), HeatSimError> {
    let params = args.params()?;
    let backend = args.backend()?;

    if let Some(path) = &args.save_config {
        params.save_json(path)?;
        info!("Saved run parameters to {}", path.display());
    }

    let mut sim = Simulation::builder()
        .params(params)
        .backend(backend)
        .initial_condition(args.initial_condition()?)
        .report_interval(args.report_interval)
        .build()?;

    let mut sink = TextFrameWriter::new(args.output()?);
    let summary = sim.run(&mut sink)?;

    if summary.sink_failures > 0 {
        error!(
            "{} of {} frames could not be written",
            summary.sink_failures, summary.frames_emitted
        );
    }
    info!(
        "{} frames in {:.3}s (slowest step {:.3}ms)",
        summary.frames_emitted,
        summary.elapsed.as_secs_f64(),
        summary.timing.slowest().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => return argument_error(&e),
    };
    init_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(status = %e.status(), "{e}");
            eprintln!("Error: {e}");
            ExitCode::from(e.status().as_u8())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("transient").chain(argv.iter().copied()))
    }

    #[test]
    fn test_four_positionals() {
        let args = parse(&["40", "1000", "0.1", "0.001"]).unwrap();
        let params = args.params().unwrap();
        assert_eq!(params.grid_points(), 40);
        assert_eq!(params.time_steps(), 1000);
        assert_eq!(
            args.backend().unwrap(),
            Backend::Threaded {
                workers: heat_sim_core::solver::DEFAULT_WORKERS
            }
        );
    }

    #[test]
    fn test_decimal_counts_truncated() {
        let args = parse(&["40.9", "10.2", "0.1", "0.001"]).unwrap();
        let params = args.params().unwrap();
        assert_eq!(params.grid_points(), 40);
        assert_eq!(params.time_steps(), 10);
    }

    #[test]
    fn test_missing_arguments_are_count_errors() {
        let err = parse(&["40", "1000"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["40", "1000", "0.1", "0.001", "7"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_non_numeric_is_value_error() {
        let err = parse(&["forty", "1000", "0.1", "0.001"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_zero_argument_is_invalid_value() {
        let args = parse(&["40", "0", "0.1", "0.001"]).unwrap();
        let err = args.params().unwrap_err();
        assert_eq!(err.status(), StatusCode::InvalidArgument);
    }

    #[test]
    fn test_options() {
        let args = parse(&[
            "10",
            "5",
            "0.1",
            "0.001",
            "--backend",
            "rayon",
            "--corners",
            "1,2,3,4",
            "--body",
            "20",
            "--length",
            "2",
            "--strict-stability",
        ])
        .unwrap();
        assert_eq!(args.backend().unwrap(), Backend::Rayon);
        let condition = args.initial_condition().unwrap();
        assert_eq!(condition.corners, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(condition.body, 20.0);
        let params = args.params().unwrap();
        assert_eq!(params.side_length(), 2.0);
        assert_eq!(params.stability(), StabilityPolicy::Reject);
    }

    #[test]
    fn test_wrong_corner_count_rejected() {
        let args = parse(&["10", "5", "0.1", "0.001", "--corners", "1,2,3"]).unwrap();
        let err = args.initial_condition().unwrap_err();
        assert_eq!(err.status(), StatusCode::InvalidArgument);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let args = parse(&["10", "5", "0.1", "0.001", "--workers", "0"]).unwrap();
        assert!(args.backend().is_err());
    }

    #[test]
    fn test_command_line_layers_over_config_file() {
        let path = std::env::temp_dir().join(format!("transient-cli-{}.json", std::process::id()));
        SimulationParams::new(5, 2, 0.5, 0.01)
            .unwrap()
            .with_side_length(3.0)
            .unwrap()
            .with_stability(StabilityPolicy::Reject)
            .unwrap()
            .save_json(&path)
            .unwrap();
        let config = path.to_str().unwrap();

        let args = parse(&["--config", config]).unwrap();
        let params = args.params().unwrap();
        assert_eq!(params.grid_points(), 5);
        assert_eq!(params.time_steps(), 2);

        // Positionals replace the file's values; the rest of the file still applies
        let args = parse(&["10", "3", "0.1", "0.001", "--config", config]).unwrap();
        let params = args.params().unwrap();
        assert_eq!(params.grid_points(), 10);
        assert_eq!(params.time_steps(), 3);
        assert_eq!(params.dt(), 0.1);
        assert_eq!(params.side_length(), 3.0);
        assert_eq!(params.stability(), StabilityPolicy::Reject);

        let args = parse(&["12", "--config", config, "--length", "2"]).unwrap();
        let params = args.params().unwrap();
        assert_eq!(params.grid_points(), 12);
        assert_eq!(params.time_steps(), 2);
        assert_eq!(params.side_length(), 2.0);

        std::fs::remove_file(&path).unwrap();
    }

    /// Status the binary would exit with, without running the simulation.
    fn status_of(argv: &[&str]) -> StatusCode {
        match parse(argv) {
            Err(e) => argument_status(e.kind()),
            Ok(args) => args.params().map_or_else(|e| e.status(), |_| StatusCode::Ok),
        }
    }

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(status_of(&["5", "1", "0.1", "0.001"]), StatusCode::Ok);
        assert_eq!(status_of(&["5", "1"]), StatusCode::BadArgumentCount);
        assert_eq!(
            status_of(&["5", "1", "0.1", "0.001", "7"]),
            StatusCode::BadArgumentCount
        );
        assert_eq!(status_of(&["five", "1", "0.1", "0.001"]), StatusCode::InvalidArgument);
        assert_eq!(status_of(&["5", "1", "0", "0.001"]), StatusCode::InvalidArgument);
        assert_eq!(status_of(&["5", "1", "-0.1", "0.001"]), StatusCode::InvalidArgument);
        assert_eq!(status_of(&["5", "1", "0.1", "-0.001"]), StatusCode::InvalidArgument);
        assert_eq!(status_of(&["-5", "1", "0.1", "0.001"]), StatusCode::InvalidArgument);
        assert_eq!(status_of(&["--no-such-flag"]), StatusCode::BadArgumentCount);
    }

    #[test]
    fn test_help_and_version_exit_cleanly() {
        let err = parse(&["--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert_eq!(argument_status(err.kind()), StatusCode::Ok);

        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(argument_status(err.kind()), StatusCode::Ok);

        let err = parse(&[]).unwrap_err();
        assert_eq!(argument_status(err.kind()), StatusCode::BadArgumentCount);
    }
}
