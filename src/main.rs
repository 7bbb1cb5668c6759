use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

use bifrost::convert::{self, ConvertOptions, ServerType};

/// Convert BIND and djbdns zone data into declarative .dnszone YAML documents
#[derive(Parser, Debug)]
#[command(name = "bifrost", version)]
#[command(group(ArgGroup::new("input").required(true).args(["zone", "batch"])))]
struct Cli {
    /// Path to a single zone file
    #[arg(long, value_name = "PATH")]
    zone: Option<PathBuf>,

    /// Directory containing zone files to convert
    #[arg(long, value_name = "DIR")]
    batch: Option<PathBuf>,

    /// Input server/platform type
    #[arg(long, value_enum, default_value_t = ServerType::Auto)]
    servertype: ServerType,

    /// Do not write files; print the result to stdout
    #[arg(long)]
    dry_run: bool,

    /// Write .dnszone files to disk
    #[arg(long)]
    save: bool,

    /// Output directory (default: alongside the input)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Zone origin, if not embedded in the file
    #[arg(long, value_name = "NAME")]
    origin: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ConvertOptions {
        servertype: cli.servertype,
        dry_run: cli.dry_run,
        save: cli.save,
        out_dir: cli.out_dir,
        origin: cli.origin,
    };

    if let Some(zone) = cli.zone {
        if !zone.is_file() {
            error!("file not found: {}", zone.display());
            return ExitCode::from(2);
        }
        return match convert::convert_one(&zone, &options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("failed to convert {}: {}", zone.display(), e);
                ExitCode::from(1)
            }
        };
    }

    let Some(batch) = cli.batch else {
        // The clap group guarantees one of the two inputs
        return ExitCode::from(2);
    };
    if !batch.is_dir() {
        error!("directory not found: {}", batch.display());
        return ExitCode::from(2);
    }
    match convert::convert_batch(&batch, &options) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!("batch conversion failed: {}", e);
            ExitCode::from(1)
        }
    }
}
