// Tue Feb 10 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use itertools::Itertools;
use std::path::{Path, PathBuf};
use tbd_stubs::{
    config::Config,
    format::{MemoryBuffer, ReadFlags},
    interface::InterfaceFile,
    reexport::reexport_symbols,
    registry::{atomic, Registry},
    utils::logging,
};

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Reads Mach-O dylibs and text stubs, writes text stubs and reexport lists", long_about = None)]
struct Args {
    /// Dynamic library, stub binary or .tbd file
    input: Option<PathBuf>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output generation: tbd-v1 .. tbd-v5
    #[arg(short, long)]
    format: Option<String>,

    /// Keep only these architectures (repeatable)
    #[arg(long = "arch")]
    archs: Vec<String>,

    /// Write the exported symbol names to this .reexport file
    #[arg(long)]
    reexport: Option<PathBuf>,

    /// Replace the output atomically if it exists
    #[arg(long)]
    replace: bool,

    /// Keep undefined symbols of flat namespace images
    #[arg(long)]
    record_undefined: bool,

    /// JSON file with defaults for every option
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn build_config(args: Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::new(),
    };

    if let Some(input) = args.input {
        config = config.with_input(input);
    }
    if let Some(output) = args.output {
        config = config.with_output(output);
    }
    if let Some(format) = args.format {
        config = config.with_output_format(format);
    }
    if !args.archs.is_empty() {
        config = config.with_archs(args.archs);
    }
    if let Some(reexport) = args.reexport {
        config = config.with_reexport_output(reexport);
    }
    if args.replace {
        config = config.with_replace_existing(true);
    }
    if args.record_undefined {
        config = config.with_record_undefined(true);
    }
    if args.verbose > 0 {
        config = config.with_verbosity(args.verbose);
    }

    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = build_config(args)?;
    logging::init(config.verbosity);

    let input = match &config.input {
        Some(input) => input,
        None => bail!("an input file must be given"),
    };
    let arches = config.architectures().map_err(|e| anyhow::anyhow!(e))?;
    let registry = Registry::with_all_handlers();

    println!("{} Reading {}", "[*]".blue(), input.display());
    let buffer = MemoryBuffer::from_path(input)?;
    let file = registry
        .read_interface_file(&buffer, ReadFlags::All, arches)
        .with_context(|| format!("reading {}", input.display()))?;
    let file = normalize(&file, config.record_undefined)?;

    print_summary(&file);

    if let Some(output) = &config.output {
        let file_type = config.file_type().map_err(|e| anyhow::anyhow!(e))?;
        registry
            .write_file(output, Some(&file), file_type, config.replace_existing)
            .with_context(|| format!("writing {} as {}", output.display(), file_type))?;
        println!("{} Wrote {} ({})", "[+]".green(), output.display(), file_type);
    }

    if let Some(reexport) = &config.reexport_output {
        write_reexports(&file, reexport, config.replace_existing)?;
    }

    Ok(())
}

/// Round-trips the library through its per-target record model, which
/// drops undefined symbols unless they are asked for.
fn normalize(file: &InterfaceFile, record_undefined: bool) -> Result<InterfaceFile> {
    if file.targets().is_empty() {
        return Ok(file.clone());
    }
    let mut rebuilt = InterfaceFile::from_apis(&file.to_apis(), record_undefined)?;
    rebuilt.path = file.path.clone();
    for document in &file.documents {
        rebuilt.add_document(normalize(document, record_undefined)?);
    }
    Ok(rebuilt)
}

fn write_reexports(file: &InterfaceFile, path: &Path, replace_existing: bool) -> Result<()> {
    let apis = file.to_apis();
    for api in &apis {
        let writer = reexport_symbols(api);
        let mut contents = Vec::new();
        writer.write_to_stream(&mut contents)?;

        let destination = if apis.len() == 1 {
            path.to_path_buf()
        } else {
            per_target_path(path, &api.target().to_string())
        };
        atomic::write_file(&destination, &contents, replace_existing)?;
        println!(
            "{} Wrote {} symbols for {} to {}",
            "[+]".green(),
            writer.symbols().len(),
            api.target(),
            destination.display()
        );
    }
    Ok(())
}

/// `libfoo.reexport` becomes `libfoo.arm64-macos.reexport`.
fn per_target_path(path: &Path, target: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("symbols");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}.{}", stem, target, ext),
        None => format!("{}.{}", stem, target),
    };
    path.with_file_name(name)
}

fn print_summary(file: &InterfaceFile) {
    println!("{}", "Library Summary".cyan().bold());
    println!("{}", "-".repeat(40).cyan());
    println!("  Install name:   {}", file.install_name.green());
    println!("  Read as:        {}", file.file_type);
    println!("  Current:        {}", file.current_version);
    println!("  Compatibility:  {}", file.compatibility_version);
    println!("  Targets:        {}", file.targets().iter().join(", "));

    let exports = file.symbols.exports().count();
    let reexports = file.symbols.reexports().count();
    let undefineds = file.symbols.undefineds().count();
    println!(
        "  Symbols:        {} exported, {} reexported, {} undefined",
        exports.to_string().green(),
        reexports.to_string().yellow(),
        undefineds.to_string().red()
    );

    if !file.reexported_libraries().is_empty() {
        println!("{}", "Reexported libraries:".yellow().bold());
        for library in file.reexported_libraries() {
            println!("  {}", library.install_name().cyan());
        }
    }
    for document in &file.documents {
        println!("  Inlined:        {}", document.install_name.cyan());
    }
    println!();
}
