use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crayxc_log::codec::{RecordReader, CURRENT_VERSION};
use crayxc_log::internal::container::MemoryContainer;
use crayxc_log::{ModuleId, Result};

/// Dumps the byte image of every record in a raw APXC module region.
#[derive(Parser)]
#[command(name = "crayxc-inspector", version, about)]
struct Args {
    file: PathBuf,

    /// Format version recorded for the module in the log metadata
    #[arg(long, env = "CRAYXC_FORMAT_VERSION", default_value_t = CURRENT_VERSION)]
    format_version: u32,

    /// The log was written on a host of the opposite byte order
    #[arg(long, env = "CRAYXC_SWAP")]
    swap: bool,

    /// Bytes shown per hex row
    #[arg(long, default_value_t = 32)]
    width: usize,
}

fn run(args: Args) -> Result<()> {
    let data = std::fs::read(&args.file)?;
    let mut log = MemoryContainer::with_region(ModuleId::APXC, &data, args.format_version, args.swap);
    let width = args.width.max(8);

    let mut offset = 0usize;
    for (index, record) in RecordReader::new(&mut log, ModuleId::APXC).enumerate() {
        let record = record?;
        let image = record.as_bytes();
        let header = record.header();
        println!(
            "record {} {:?} offset={} size={} id={} rank={}",
            index,
            record.shape(),
            offset,
            image.len(),
            header.id,
            header.rank as i64
        );
        for (row, chunk) in image.chunks(width).enumerate() {
            println!("  {:08x}  {}", offset + row * width, hex::encode(chunk));
        }
        offset += image.len();
    }

    if offset < data.len() {
        println!("trailing {} bytes not decoded", data.len() - offset);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "inspection failed");
            ExitCode::FAILURE
        }
    }
}
