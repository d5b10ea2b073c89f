//! CLI entry point for the bus seat dashboard.
//!
//! Provides subcommands for listing stops, viewing per-bucket bus counts for
//! a stop selection, exporting chart data, and running an interactive
//! selection session against a dataset loaded once.

use anyhow::{Context, Result};
use bus_seat_dashboard::analyzers::filter::StopSelection;
use bus_seat_dashboard::analyzers::pipeline::build_view;
use bus_seat_dashboard::config::Config;
use bus_seat_dashboard::dataset::{Dataset, DatasetCache, shared_cache};
use bus_seat_dashboard::output::{
    OutputFormat, export_view, print_pretty, render_stations, render_view,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bus_seat_dashboard")]
#[command(about = "Bus runs and low-seat buses per time bucket, by stop", long_about = None)]
struct Cli {
    /// CSV dataset to read (overrides BUS_DATA_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SelectionArgs {
    /// Stop to include; repeat for several stops
    #[arg(short, long = "station", value_name = "NAME")]
    stations: Vec<String>,

    /// Include every stop instead of the configured default
    #[arg(long, conflicts_with = "stations")]
    all: bool,
}

impl SelectionArgs {
    fn resolve(&self, config: &Config) -> StopSelection {
        if self.all {
            StopSelection::all()
        } else if self.stations.is_empty() {
            config.default_stations.clone()
        } else {
            self.stations.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the stops that can be selected
    Stations,
    /// Show bucket counts for a stop selection
    View {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Write aggregate.csv, long.csv and chart.json for a stop selection
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Directory to write the files into
        #[arg(short, long, default_value = "dashboard")]
        output_dir: PathBuf,
    },
    /// Read stop selections from stdin, one comma-separated line at a time
    Interactive {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env();
    let _file_guard = init_tracing(&config.log_file_path)?;

    let cli = Cli::parse();

    let data_path = cli.data.unwrap_or_else(|| config.data_path.clone());
    let cache = shared_cache(&data_path);

    match cli.command {
        Commands::Stations => {
            let dataset = load(cache)?;
            let names = dataset.station_names();
            info!(stations = names.len(), "Stations listed");
            render_stations(&mut io::stdout().lock(), &names)?;
        }
        Commands::View { selection, format } => {
            let dataset = load(cache)?;
            let selection = selection.resolve(&config);
            let view = build_view(dataset, &selection);
            print_pretty(&view);
            render_view(&mut io::stdout().lock(), &view, format)?;
        }
        Commands::Export {
            selection,
            output_dir,
        } => {
            let dataset = load(cache)?;
            let selection = selection.resolve(&config);
            let view = build_view(dataset, &selection);
            let written = export_view(&output_dir, &view)
                .with_context(|| format!("failed to export to {}", output_dir.display()))?;
            let mut stdout = io::stdout().lock();
            if written.is_empty() {
                render_view(&mut stdout, &view, OutputFormat::Table)?;
            }
            for path in written {
                writeln!(stdout, "{}", path.display())?;
            }
        }
        Commands::Interactive { format } => {
            interactive(cache, format)?;
        }
    }

    Ok(())
}

/// Colored stderr logging plus a JSON rolling log file.
///
/// The returned guard flushes the file writer and must outlive `main`'s work.
fn init_tracing(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bus_seat_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Fetches the cached dataset, logging the failure before it ends the session.
fn load(cache: &DatasetCache) -> Result<&Dataset> {
    Ok(cache
        .dataset()
        .inspect_err(|e| error!(error = %e, "Dataset unavailable"))?)
}

/// Runs one interaction per input line until EOF or `:quit`.
#[tracing::instrument(skip_all, fields(path = %cache.path().display()))]
fn interactive(cache: &DatasetCache, format: OutputFormat) -> Result<()> {
    load(cache)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "Enter stops separated by commas. Blank line = all stops, :stations lists stops, :quit exits."
    )?;

    let mut interactions = 0usize;
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let dataset = load(cache)?;
        match line.trim() {
            ":quit" | ":q" => break,
            ":stations" => render_stations(&mut stdout, &dataset.station_names())?,
            input => {
                interactions += 1;
                let view = build_view(dataset, &StopSelection::parse(input));
                print_pretty(&view);
                render_view(&mut stdout, &view, format)?;
            }
        }
    }

    info!(
        interactions,
        loads = cache.load_count(),
        "Interactive session finished"
    );
    Ok(())
}
