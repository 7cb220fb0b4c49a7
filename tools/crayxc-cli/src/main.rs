use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crayxc_log::aggregate::AggregateRecord;
use crayxc_log::codec::{Record, StreamCursor, CURRENT_VERSION};
use crayxc_log::internal::container::MemoryContainer;
use crayxc_log::present::ReportOptions;
use crayxc_log::{LogUtil, ModuleId, ModuleRegistry, Result};

/// Report tool for raw APXC module regions extracted from a trace log.
#[derive(Parser)]
#[command(name = "crayxc-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct StreamArgs {
    /// Format version recorded for the module in the log metadata
    #[arg(long, env = "CRAYXC_FORMAT_VERSION", default_value_t = CURRENT_VERSION)]
    format_version: u32,

    /// The log was written on a host of the opposite byte order
    #[arg(long, env = "CRAYXC_SWAP")]
    swap: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record of a module region as counter lines
    Parse {
        file: PathBuf,
        #[command(flatten)]
        stream: StreamArgs,
    },
    /// Print the description of the module's counters
    Describe {
        #[arg(long, default_value_t = CURRENT_VERSION)]
        format_version: u32,
    },
    /// Aggregate the records of several module regions
    Aggregate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        stream: StreamArgs,
    },
}

fn load(file: &Path, stream: &StreamArgs) -> Result<MemoryContainer> {
    let data = std::fs::read(file)?;
    tracing::debug!(file = %file.display(), bytes = data.len(), "loaded module region");
    Ok(MemoryContainer::with_region(
        ModuleId::APXC,
        &data,
        stream.format_version,
        stream.swap,
    ))
}

/// Runs `visit` on every record of the module stream in `file`.
///
/// Stops quietly at end of stream. A non-fatal error drops the module from
/// the report with a diagnostic line.
fn for_each_record(
    util: &dyn LogUtil,
    file: &Path,
    stream: &StreamArgs,
    mut visit: impl FnMut(&Record) -> Result<()>,
) -> Result<()> {
    let mut log = load(file, stream)?;
    let mut cursor = StreamCursor::default();
    loop {
        match util.get_record(&mut log, &mut cursor) {
            Ok(Some(record)) => visit(&record)?,
            Ok(None) => return Ok(()),
            Err(e) if !e.is_fatal() => {
                println!("# {} module omitted from {}: {}", util.name(), file.display(), e);
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = ModuleRegistry::with_defaults();
    let util = registry.get(ModuleId::APXC)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Parse { file, stream } => {
            out.write_all(util.print_description(stream.format_version).as_bytes())?;
            let opts = ReportOptions {
                module_name: util.name().to_string(),
                file_name: file.display().to_string(),
            };
            for_each_record(util, &file, &stream, |record| {
                util.print_record(&mut out, record, &opts)
            })?;
        }
        Commands::Describe { format_version } => {
            out.write_all(util.print_description(format_version).as_bytes())?;
        }
        Commands::Aggregate { files, stream } => {
            let mut acc = AggregateRecord::default();
            let mut is_first = true;
            for file in &files {
                for_each_record(util, file, &stream, |record| {
                    util.agg_records(record, &mut acc, is_first);
                    is_first = false;
                    Ok(())
                })?;
            }
            if is_first {
                tracing::warn!("no records to aggregate");
                return Ok(());
            }
            let opts = ReportOptions {
                module_name: util.name().to_string(),
                file_name: "<aggregate>".to_string(),
            };
            util.print_record(&mut out, &Record::Topology(acc.summary()), &opts)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "report generation failed");
            ExitCode::FAILURE
        }
    }
}
