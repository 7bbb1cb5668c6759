use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::convert::{Assembly, ServerType, bind, detect, tinydns};
use crate::error::Result;
use crate::zone::ZoneParser;

/// File extension of the converted output
const OUTPUT_EXTENSION: &str = "dnszone";

/// Conversion settings shared by single-file and batch runs
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Input format, or `Auto` to sniff it per file
    pub servertype: ServerType,
    /// Print the document instead of writing anything
    pub dry_run: bool,
    /// Persist `.dnszone` files to disk
    pub save: bool,
    /// Where saved files go (default: alongside the input)
    pub out_dir: Option<PathBuf>,
    /// Zone origin, for files that do not carry one
    pub origin: Option<String>,
}

/// Convert one input file: detect its format if requested, assemble the
/// document, surface warnings, then print or persist the result.
pub fn convert_one(path: &Path, options: &ConvertOptions) -> Result<()> {
    let servertype = match options.servertype {
        ServerType::Auto => detect::detect(path),
        requested => requested,
    };

    let assembly = match servertype {
        ServerType::Djbdns => tinydns::assemble_file(path, options.origin.as_deref())?,
        ServerType::Powerdns => {
            warn!("servertype 'powerdns' is not fully supported; attempting as BIND");
            assemble_bind(path, options)?
        }
        _ => assemble_bind(path, options)?,
    };

    // Warnings in discovery order, never fatal
    for warning in &assembly.warnings {
        warn!("{}: {}", path.display(), warning);
    }

    let yaml = assembly.document.to_yaml()?;
    if options.dry_run && !options.save {
        print!("{}", yaml);
        return Ok(());
    }

    if options.save {
        let out_path = output_path(path, options.out_dir.as_deref());
        fs::write(&out_path, yaml)?;
        println!("Saved: {}", out_path.display());
    } else {
        print!("{}", yaml);
    }

    Ok(())
}

/// Convert every regular file directly under `dir`, in name order.
/// A failing file is reported and skipped; the returned status is
/// non-zero when any file failed or none were found.
pub fn convert_batch(dir: &Path, options: &ConvertOptions) -> Result<i32> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        error!("no zone files found in {}", dir.display());
        return Ok(1);
    }

    let mut status = 0;
    for file in &files {
        if let Err(e) = convert_one(file, options) {
            error!("failed to convert {}: {}", file.display(), e);
            status = 1;
        }
    }

    Ok(status)
}

/// `<out_dir or input dir>/<input basename without extension>.dnszone`
pub fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "zone".to_string());
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
    };
    dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
}

fn assemble_bind(path: &Path, options: &ConvertOptions) -> Result<Assembly> {
    let mut parser = match options.origin.as_deref() {
        Some(origin) => ZoneParser::with_origin(origin),
        None => ZoneParser::new(),
    };
    let zone = parser.parse_file(path)?;
    Ok(bind::assemble(&zone))
}
