use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::credits::Stats;
use crate::models::ClassificationResult;

/// Render a colored terminal report of a credits run.
pub fn render(stats: &Stats, results: &[ClassificationResult], root: &Path, verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        println!(
            "Bucketed: {}  Verbatim: {}  Unparseable: {}",
            stats.bucketed.to_string().green(),
            stats.verbatim.to_string().yellow(),
            stats.unparseable.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-credits".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scanning: {}\n", root.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Files processed    : {}", results.len())
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Bucketed        : {:>4}  {}",
            "✓".green(),
            stats.bucketed,
            summarize_buckets(stats)
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  Verbatim        : {:>4}", "≡".yellow(), stats.verbatim)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unparseable     : {:>4}", "✗".red(), stats.unparseable)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if stats.unparseable > 0 {
        println!(
            " {} Failed to find a license header in:\n",
            "[ERROR]".red().bold()
        );
        render_table(results, |r| matches!(r, ClassificationResult::Unparseable { .. }));
        println!();
    }

    if verbose && !results.is_empty() {
        println!(" {} All files:\n", "[INFO]".cyan().bold());
        render_table(results, |_| true);
        println!();
    }

    Ok(())
}

fn render_table(results: &[ClassificationResult], filter: impl Fn(&ClassificationResult) -> bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
        ]);

    for result in results.iter().filter(|r| filter(r)) {
        let color = match result {
            ClassificationResult::Bucketed { .. } => Color::Green,
            ClassificationResult::Verbatim { .. } => Color::Yellow,
            ClassificationResult::Unparseable { .. } => Color::Red,
        };

        table.add_row(vec![
            Cell::new(result.path()),
            Cell::new(result.to_string()).fg(color),
        ]);
    }

    println!("{}", table);
}

/// Largest buckets first, e.g. `[LGPL (1203), MIPS (19), JPEG (3)]`.
fn summarize_buckets(stats: &Stats) -> String {
    let mut pairs: Vec<_> = stats.per_bucket.iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(a.1));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(bucket, count)| format!("{} ({})", bucket, count))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}
