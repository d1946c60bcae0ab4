//! `license-credits` — collect source-file license headers into one credits document.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the bucket table and paths ([`config::load_config`]).
//! 3. Collect source files, from the command line or by walking the root ([`walker`]).
//! 4. Extract, normalize and classify each file's header ([`license`], [`updater`]).
//! 5. Report counts and unparseable files ([`report`]).
//! 6. Render the credits ([`credits`]) and write them unless `--dry-run`.
//! 7. Exit `1` on a changed bucketed header or any file without a header.

mod cli;
mod config;
mod credits;
mod error;
mod license;
mod models;
mod report;
mod updater;
mod walker;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::load_config;
use credits::LicenseTexts;
use updater::CreditsUpdater;
use walker::collect_source_files;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Resolve source root
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("source root {} not found", cli.root.display()))?;

    let config = load_config(&root, cli.config.as_deref())?;
    tracing::debug!(root = %root.display(), buckets = config.buckets.len(), "configuration loaded");

    let files: Vec<PathBuf> = if cli.files.is_empty() {
        collect_source_files(&root, &config)?
    } else {
        cli.files.clone()
    };

    if files.is_empty() {
        eprintln!("No source files found in {}", root.display());
        std::process::exit(1);
    }

    let mut updater = CreditsUpdater::new(&root, config.bucket_table());

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for file in &files {
        if let Err(err) = updater.process_file(file) {
            if let Some(pb) = &pb {
                pb.abandon();
            }
            return Err(err.into());
        }
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let stats = updater.credits().stats();
    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(
                &stats,
                updater.results(),
                &root,
                cli.verbose > 0,
                cli.quiet,
            )?;
        }
        ReportFormat::Json => {
            let summary = report::Summary {
                root: root.display().to_string(),
                stats: stats.clone(),
                files: updater.results(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if stats.unparseable > 0 {
        eprintln!(
            "{} {} file(s) have no recognisable license header. Update the header extraction \
             to handle them to continue generating credits",
            "error:".red().bold(),
            updater.credits().unparseable().len()
        );
        std::process::exit(1);
    }

    // --license-dir is relative to the working directory, not the root
    let license_dir = cli
        .license_dir
        .as_deref()
        .map(|dir| {
            dir.canonicalize()
                .with_context(|| format!("license directory {} not found", dir.display()))
        })
        .transpose()?;
    let text_paths = config.license_text_paths(&root, license_dir.as_deref())?;
    let texts = LicenseTexts::load(
        &config.overview_path(&root),
        text_paths.iter().map(|(bucket, path)| (*bucket, path.as_path())),
    )?;
    let document = updater.render(&texts)?;

    if cli.dry_run {
        tracing::info!(bytes = document.len(), "dry run, credits not written");
        return Ok(());
    }

    let output = cli.output.unwrap_or_else(|| config.output_path(&root));
    std::fs::write(&output, document)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if !cli.quiet && matches!(cli.report, ReportFormat::Terminal) {
        println!(" {} Credits written to {}", "→".cyan(), output.display());
    }

    Ok(())
}
