//! seedsmith CLI - pin the world seed of a world save.
//!
//! This is the main entry point for the seedsmith command-line application.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use seedsmith::prelude::*;
use seedsmith::{display_name, PatchReport, SourceKind};

/// seedsmith - rewrite a world's seed in place and force its terrain to regenerate
#[derive(Parser)]
#[command(name = "seedsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// World name (the descriptor is `<WORLD>.fwl`)
    world: String,

    /// Save directory root containing `worlds_local`
    save_dir: PathBuf,

    /// Seed to pin. An empty string disables patching
    seed: String,

    /// Checksum algorithm: auto, stable or polynomial
    #[arg(short, long, env = "SEEDSMITH_ALGORITHM", default_value = "auto")]
    algorithm: AlgorithmSelection,

    /// Number of offsets after the seed searched for its checksum
    #[arg(
        long,
        env = "SEEDSMITH_SCAN_WINDOW",
        default_value_t = seedsmith::fwl::DEFAULT_SCAN_WINDOW,
        value_parser = parse_scan_window
    )]
    scan_window: usize,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Do not delete the world database after patching
    #[arg(long)]
    keep_db: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            process::exit(1);
        }
        Err(err) => err.exit(),
    };

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let files = WorldFiles::new(&cli.save_dir, cli.world.as_str());
    let options = SyncOptions {
        patch: PatchOptions {
            algorithm: cli.algorithm,
            scan_window: cli.scan_window,
        },
        dry_run: cli.dry_run,
        keep_database: cli.keep_db,
    };

    let outcome = match sync_seed(&files, &cli.seed, &options) {
        Ok(outcome) => outcome,
        Err(e) if e.is_structural() => {
            return Err(e)
                .context("Could not determine the descriptor layout; nothing was written");
        }
        Err(e) => return Err(e).context("Failed to update the world seed"),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SyncOutcome::NoTarget => {
            println!("No target seed provided. Skipping.");
        }
        SyncOutcome::NoDescriptor { dir } => {
            println!(
                "No existing world files for '{}' in {}. The world will be generated on first start.",
                cli.world,
                dir.display()
            );
        }
        SyncOutcome::AlreadyCurrent { source, seed } => {
            println!(
                "Seed matches in {} ({}). No action taken.",
                display_name(&source),
                seed
            );
        }
        SyncOutcome::Patched(report) => print_report(&report),
    }

    Ok(())
}

fn print_report(report: &PatchReport) {
    let origin = match report.source_kind {
        SourceKind::Backup => "backup",
        SourceKind::Primary => "main file",
    };

    println!(
        "Analyzed {} {} (world '{}', version {})",
        origin,
        display_name(&report.source),
        report.world_name,
        report.version
    );
    println!(
        "Seed mismatch: current [{}] vs target [{}]",
        report.previous_seed, report.seed
    );
    println!(
        "Checksum: {} (gap of {} bytes)",
        report.algorithm, report.gap_len
    );

    if report.dry_run {
        for path in &report.targets {
            println!("Would update {}", display_name(path));
        }
        if report.database_action != DatabaseAction::Kept {
            println!("Would delete {}", display_name(&report.database));
        }
        println!("Dry run, nothing written");
        return;
    }

    for path in &report.targets {
        println!("Updated {}", display_name(path));
    }

    match report.database_action {
        DatabaseAction::Removed => println!(
            "Deleted {}. The world will regenerate on next start.",
            display_name(&report.database)
        ),
        DatabaseAction::Missing => println!(
            "No {} found, nothing to regenerate.",
            display_name(&report.database)
        ),
        DatabaseAction::Kept => println!("Kept {}", display_name(&report.database)),
        DatabaseAction::Skipped => {}
    }

    println!("Seed patched successfully");
}

fn parse_scan_window(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("scan window must be at least 1".to_string()),
        Ok(window) => Ok(window),
        Err(e) => Err(e.to_string()),
    }
}
