//! Command-line driver: loads one or more BEAM modules, cross-references
//! them against each other, and writes an annotated listing per module.

use beam_disasm::analysis::{annotate_all, ModuleAnalysis};
use beam_disasm::chunks::literal::MAX_DECOMPRESSED_SIZE;
use beam_disasm::error::BeamError;
use beam_disasm::module::Module;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use flate2::read::GzDecoder;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Disassemble BEAM modules and print an annotated listing for each.
#[derive(Clone, Debug, Parser)]
struct Args {
    /// a single .beam, gzip-compressed .beam, or .ez archive to analyze
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// a directory to walk for .beam/.ez files
    #[arg(short, long)]
    search: Option<PathBuf>,
    /// directory the per-module `.beamc` listings are written to
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let inputs = collect_inputs(&args);
    if inputs.is_empty() {
        anyhow::bail!("no input given; pass --file or --search");
    }

    let mut modules = Vec::new();
    let mut had_failure = false;
    for path in &inputs {
        match load_path(path) {
            Ok(mut loaded) => modules.append(&mut loaded),
            Err(err) => {
                log::error!("failed to load {}: {err:#}", path.display());
                had_failure = true;
            }
        }
    }

    let mut analyses: Vec<ModuleAnalysis> = modules.into_iter().map(ModuleAnalysis::new).collect();
    annotate_all(&mut analyses)?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output directory {}", args.output_dir.display()))?;

    for analysis in &analyses {
        let out_path = args.output_dir.join(format!("{}.beamc", analysis.module.name()));
        fs::write(&out_path, analysis.to_string())
            .with_context(|| format!("writing {}", out_path.display()))?;
    }

    if had_failure {
        anyhow::bail!("one or more inputs failed to load");
    }
    Ok(())
}

fn collect_inputs(args: &Args) -> Vec<PathBuf> {
    let mut inputs = Vec::new();
    if let Some(file) = &args.file {
        inputs.push(file.clone());
    }
    if let Some(dir) = &args.search {
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let ext = entry.path().extension().and_then(|s| s.to_str());
            if matches!(ext, Some("beam") | Some("ez")) {
                inputs.push(entry.into_path());
            }
        }
    }
    inputs
}

fn load_path(path: &Path) -> Result<Vec<Module>> {
    if path.extension().and_then(|s| s.to_str()) == Some("ez") {
        load_modules_from_ez(path)
    } else {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(vec![load_module_bytes(&bytes)?])
    }
}

/// Tries a plain parse first; a module wrapped as a `.beam.gz`-style file
/// fails that with `UnknownFileFormat`, in which case we retry after
/// running it through gzip (§4.J's loading pipeline).
fn load_module_bytes(bytes: &[u8]) -> Result<Module> {
    match Module::parse(&mut &bytes[..]) {
        Ok(module) => Ok(module),
        Err(err) if is_unknown_format(&err) => {
            let decoder = GzDecoder::new(bytes);
            let mut decompressed = Vec::new();
            decoder
                .take(MAX_DECOMPRESSED_SIZE + 1)
                .read_to_end(&mut decompressed)
                .context("retrying as gzip after an unrecognized container header")?;
            anyhow::ensure!(
                decompressed.len() as u64 <= MAX_DECOMPRESSED_SIZE,
                "gzip input decompressed past the {MAX_DECOMPRESSED_SIZE} byte cap"
            );
            Module::parse(&mut &decompressed[..])
        }
        Err(err) => Err(err),
    }
}

fn is_unknown_format(err: &anyhow::Error) -> bool {
    err.downcast_ref::<BeamError>()
        .is_some_and(|e| matches!(e, BeamError::UnknownFileFormat))
}

/// Loads every `.beam` member of an `.ez` archive. A member that fails to
/// parse is logged and skipped rather than failing the whole archive.
fn load_modules_from_ez(path: &Path) -> Result<Vec<Module>> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive = ZipArchive::new(file).with_context(|| format!("reading {} as a zip archive", path.display()))?;

    let mut modules = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.name().ends_with(".beam") {
            continue;
        }
        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry
            .by_ref()
            .take(MAX_DECOMPRESSED_SIZE + 1)
            .read_to_end(&mut bytes)?;
        if bytes.len() as u64 > MAX_DECOMPRESSED_SIZE {
            log::warn!("skipping {name} in {}: exceeds the {MAX_DECOMPRESSED_SIZE} byte decompression cap", path.display());
            continue;
        }
        match load_module_bytes(&bytes) {
            Ok(module) => modules.push(module),
            Err(err) => log::warn!("skipping {name} in {}: {err:#}", path.display()),
        }
    }
    Ok(modules)
}
