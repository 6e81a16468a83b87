mod config;
mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use canvas::engine::Session;
use canvas::ruler::Measurement;
use canvas::units::{self, Point};
use clap::{Parser, Subcommand, ValueEnum};
use time::OffsetDateTime;

use crate::config::{AppConfig, ConfigError};
use crate::services::cad::{self, CadError};
use crate::services::persistence::{self, PersistenceError};
use crate::services::replay::{self, ReplayError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error(transparent)]
    Cad(#[from] CadError),
}

#[derive(Parser, Debug)]
#[command(name = "trajectory", about = "Draw, measure and persist centimeter-scaled trajectories")]
struct Cli {
    /// Canvas width in cm (overrides TRAJECTORY_CANVAS_WIDTH_CM).
    #[arg(long, global = true)]
    width: Option<f64>,

    /// Canvas height in cm (overrides TRAJECTORY_CANVAS_HEIGHT_CM).
    #[arg(long, global = true)]
    height: Option<f64>,

    /// Directory for exported documents (overrides TRAJECTORY_OUTPUT_DIR).
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay pointer events from a JSON-lines script and export the drawing.
    Replay {
        #[arg(long, default_value = "-", help = "Event script path, or - for stdin")]
        input: String,

        /// Do not write a document at the end.
        #[arg(long, default_value_t = false)]
        no_save: bool,

        /// Also write a plain-text coordinate listing here.
        #[arg(long)]
        text: Option<PathBuf>,

        /// Also write a DXF drawing (millimeters) here.
        #[arg(long)]
        dxf: Option<PathBuf>,
    },
    /// Load a saved document and print a summary.
    Inspect { file: PathBuf },
    /// Convert a saved document to a plain-text coordinate listing.
    ExportText {
        file: PathBuf,
        /// Output path; defaults to the input path with a `.txt` extension.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert a saved document to a DXF drawing in millimeters.
    ExportDxf {
        file: PathBuf,
        /// Output path; defaults to the input path with a `.dxf` extension.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Read the polylines of a DXF drawing and save them as a document.
    ImportDxf { file: PathBuf },
    /// Ruler distance between two pixel-space points.
    #[command(allow_negative_numbers = true)]
    Measure { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Convert a length between pixels and centimeters.
    #[command(allow_negative_numbers = true)]
    Convert {
        value: f64,
        #[arg(long, value_enum)]
        to: Unit,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Unit {
    Cm,
    Px,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::from_env()?.with_overrides(cli.width, cli.height, cli.out_dir)?;
    tracing::debug!(
        width_cm = config.canvas.width(),
        height_cm = config.canvas.height(),
        output_dir = %config.output_dir.display(),
        "configuration loaded"
    );

    match cli.command {
        Command::Replay { input, no_save, text, dxf } => run_replay(&config, &input, no_save, text, dxf),
        Command::Inspect { file } => run_inspect(&config, file),
        Command::ExportText { file, output } => run_export_text(&config, file, output),
        Command::ExportDxf { file, output } => run_export_dxf(&config, file, output),
        Command::ImportDxf { file } => run_import_dxf(&config, file),
        Command::Measure { x1, y1, x2, y2 } => {
            println!("{}", Measurement::new(Point::new(x1, y1), Point::new(x2, y2)).label());
            Ok(())
        }
        Command::Convert { value, to } => {
            match to {
                Unit::Cm => println!("{} cm", units::format_cm(units::to_cm(value))),
                Unit::Px => println!("{} px", units::format_cm(units::to_px(value))),
            }
            Ok(())
        }
    }
}

fn run_replay(
    config: &AppConfig,
    input: &str,
    no_save: bool,
    text: Option<PathBuf>,
    dxf: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut session = Session::with_canvas(config.canvas);
    let summary = replay::replay(&mut session, replay::open_input(input)?)?;

    for (line, reason) in &summary.rejected {
        eprintln!("line {line}: {reason}");
    }
    println!("events applied: {}", summary.applied);
    print_summary(&session);
    if let Some(label) = &summary.ruler_label {
        println!("ruler: {label}");
    }

    let now = OffsetDateTime::now_utc();
    if let Some(path) = text {
        persistence::export_text(&session, &path, now)?;
        println!("text saved: {}", path.display());
    }
    if let Some(path) = dxf {
        cad::export_dxf(&session, &path)?;
        println!("dxf saved: {}", path.display());
    }
    if !no_save {
        let path = persistence::export(&session, &config.output_dir, now)?;
        println!("saved {} points to {}", session.trajectory().len(), path.display());
    }
    Ok(())
}

fn run_inspect(config: &AppConfig, file: PathBuf) -> Result<(), CliError> {
    let mut session = Session::with_canvas(config.canvas);
    persistence::import(&mut session, &file)?;
    print_summary(&session);
    Ok(())
}

fn run_export_text(config: &AppConfig, file: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let mut session = Session::with_canvas(config.canvas);
    persistence::import(&mut session, &file)?;
    let output = output.unwrap_or_else(|| file.with_extension("txt"));
    persistence::export_text(&session, &output, OffsetDateTime::now_utc())?;
    println!("text saved: {}", output.display());
    Ok(())
}

fn run_export_dxf(config: &AppConfig, file: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let mut session = Session::with_canvas(config.canvas);
    persistence::import(&mut session, &file)?;
    let output = output.unwrap_or_else(|| file.with_extension("dxf"));
    cad::export_dxf(&session, &output)?;
    println!("dxf saved: {}", output.display());
    Ok(())
}

fn run_import_dxf(config: &AppConfig, file: PathBuf) -> Result<(), CliError> {
    let mut session = Session::with_canvas(config.canvas);
    cad::import_dxf(&mut session, &file)?;
    print_summary(&session);
    let path = persistence::export(&session, &config.output_dir, OffsetDateTime::now_utc())?;
    println!("saved {} points to {}", session.trajectory().len(), path.display());
    Ok(())
}

fn print_summary(session: &Session) {
    let canvas = session.canvas();
    println!(
        "canvas: {} x {} cm ({} x {} px)",
        units::format_cm(canvas.width()),
        units::format_cm(canvas.height()),
        canvas.width_px(),
        canvas.height_px()
    );
    println!("points: {}", session.trajectory().len());
    if let Some(last) = session.trajectory().last() {
        let cm = last.to_cm();
        println!("last point: {}, {} cm", units::format_cm(cm.x), units::format_cm(cm.y));
    }
    println!("path length: {} cm", units::format_cm(units::to_cm(session.trajectory().path_length())));
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
