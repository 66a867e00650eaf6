use anyhow::{Context, Result};
use clap::Parser;
use schemagen::config::{load_config, merge_with_cli_args};
use schemagen::document::FsLoader;
use schemagen::writer::{FileWriter, FsWriter, MemoryWriter};
use schemagen::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the root schema file (YAML)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Output directory for generated code
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to config file (overrides default location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load configuration
    let config = load_config(args.config.as_deref())?;
    let merged_config = merge_with_cli_args(config, args.schema, args.output);

    let schema_path = merged_config
        .schema
        .clone()
        .ok_or_else(|| anyhow::anyhow!("No schema specified. Use --schema or set `schema` in the config file"))?;

    println!("📖 Reading schema from: {:?}", schema_path);

    let pipeline = Pipeline::from_config(&merged_config);

    // Execute before hooks
    for hook in &merged_config.hooks.before_generate {
        println!("🎣 Running before hook: {}", hook);
        execute_hook(hook)?;
    }

    let mut fs_writer = FsWriter::new(&merged_config.output);
    let mut memory_writer = MemoryWriter::new();
    let writer: &mut dyn FileWriter = if args.dry_run {
        &mut memory_writer
    } else {
        &mut fs_writer
    };

    let report = pipeline
        .run(&FsLoader, &schema_path, writer)
        .with_context(|| format!("Failed to generate from {:?}", schema_path))?;

    for path in &report.files {
        println!("✅ Generated: {:?}", merged_config.output.join(path));
    }

    // Execute after hooks
    if args.dry_run {
        println!("⏭️  Dry run, skipping after hooks");
    } else {
        for hook in &merged_config.hooks.after_generate {
            println!("🎣 Running after hook: {}", hook);
            execute_hook(hook)?;
        }
    }

    if report.tables == 0 {
        println!("⚠️  Schema defines no tables. Check your schema file.");
    } else {
        println!(
            "🎉 Successfully generated {} file(s) for {} table(s)!",
            report.files.len(),
            report.tables
        );
    }

    Ok(())
}

fn execute_hook(command: &str) -> Result<()> {
    use std::process::Command;

    let output = if cfg!(target_os = "windows") {
        Command::new("cmd")
            .args(["/C", command])
            .output()
    } else {
        Command::new("sh")
            .args(["-c", command])
            .output()
    }?;

    if !output.status.success() {
        anyhow::bail!(
            "Hook failed: {}\nStderr: {}",
            command,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(())
}
