//! bondpad-mapper: bond-pad to package-lead mapping with wire conflict checks
//!
//! Reads a CSV pin table, maps it onto the package outline, and either writes
//! the rendered scene as JSON or prints a conflict summary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use bondpad_mapper::config::{self, Config};
use bondpad_mapper::error::InputResult;
use bondpad_mapper::geometry::ChipSize;
use bondpad_mapper::job::Job;
use bondpad_mapper::pins::{parse_chip_size, PinTable};
use bondpad_mapper::render::{render, LineScope};
use bondpad_mapper::report::Report;

/// Exit code of `check` when conflicts were found.
const EXIT_CONFLICTS: u8 = 2;

/// Bond-pad to package-lead mapping with ring detection and wire conflict checks.
#[derive(Parser, Debug)]
#[command(name = "bondpad-mapper")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the pin diagram scene as JSON
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print a conflict summary; exits with code 2 when conflicts exist
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// CSV pin table
    #[arg(short, long, value_name = "CSV")]
    pins: PathBuf,

    /// JSON job file with chip size, calibration and outline
    #[arg(short, long, value_name = "JSON")]
    job: Option<PathBuf>,

    /// Chip size text, e.g. "1200 um x 900 um" (overrides the job file)
    #[arg(long, value_name = "TEXT")]
    chip_size: Option<String>,

    /// Which wires to draw (overrides the configuration)
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    All,
    Inner,
    Outer,
}

impl From<ScopeArg> for LineScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::All => Self::All,
            ScopeArg::Inner => Self::Inner,
            ScopeArg::Outer => Self::Outer,
        }
    }
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the inputs and renders the scene.
fn build_report(input: &InputArgs, cfg: &Config) -> InputResult<Report> {
    let job = match input.job.as_deref() {
        Some(path) => Job::load(path)?,
        None => Job::default(),
    };

    let chip: Option<ChipSize> = match input.chip_size.as_deref() {
        Some(text) => Some(parse_chip_size(text)?),
        None => job.chip_size,
    };

    let table = PinTable::read_csv(&input.pins, &cfg.pins)?;
    info!(
        pins = %input.pins.display(),
        valid = table.valid.len(),
        invalid = table.invalid.len(),
        "Pin table loaded"
    );

    let outline = job.outline();
    let anchors = job.resolve_anchors(chip.as_ref(), &outline, &cfg.calibration);
    if anchors.is_none() {
        info!("No calibration available, pins will not be drawn");
    }

    let mut settings = cfg.render_settings();
    if let Some(scope) = input.scope {
        settings.style.line_scope = scope.into();
    }

    let scene = render(
        &table,
        chip.as_ref(),
        anchors.as_ref(),
        &outline.registry(),
        &settings,
    );
    Ok(Report::new(chip, scene))
}

fn run(command: &Command, cfg: &Config) -> InputResult<ExitCode> {
    match command {
        Command::Render { input, output } => {
            let report = build_report(input, cfg)?;
            report.write_json(output.as_deref())?;
            if let Some(path) = output.as_deref().map(Path::display) {
                info!(output = %path, "Scene written");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { input } => {
            let report = build_report(input, cfg)?;
            print!("{}", report.summary());
            if report.scene.has_conflicts() {
                Ok(ExitCode::from(EXIT_CONFLICTS))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Entry point for bondpad-mapper.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config_or_default(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting bondpad-mapper");

    match run(&args.command, &cfg) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn parses_render_arguments() {
        let args = Args::parse_from([
            "bondpad-mapper",
            "-vv",
            "render",
            "--pins",
            "pins.csv",
            "--chip-size",
            "100 um x 100 um",
            "--scope",
            "inner",
            "-o",
            "scene.json",
        ]);
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Render { input, output } => {
                assert_eq!(input.pins, PathBuf::from("pins.csv"));
                assert!(matches!(input.scope, Some(ScopeArg::Inner)));
                assert_eq!(output, Some(PathBuf::from("scene.json")));
            }
            Command::Check { .. } => panic!("expected render"),
        }
    }

    #[test]
    fn log_level_selection() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "bogus"), Level::WARN);
        assert_eq!(get_log_level(1, false, "warn"), Level::INFO);
        assert_eq!(get_log_level(5, false, "warn"), Level::TRACE);
    }
}
