mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use changelog_parser::{parse, ModificationKind, Parsed, Release};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use settings::Settings;
use tracing::info;

#[derive(Parser)]
#[command(name = "changelog_parser", about = "Turn free-form changelogs into structured releases")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse changelogs and print one JSON object per file
    Parse {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Release table for one changelog
    Summary {
        file: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Print parser warnings
    Lint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Exit non-zero when any warning is found
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    #[serde(flatten)]
    parsed: &'a Parsed,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let settings = Settings::load();
    info!(settings = ?settings, "settings loaded");

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { files, pretty } => {
            let pretty = pretty || settings.pretty;
            for (path, parsed) in parse_files(&files)? {
                let report = FileReport {
                    path: path.display().to_string(),
                    parsed: &parsed,
                };
                let json = if pretty {
                    serde_json::to_string_pretty(&report)?
                } else {
                    serde_json::to_string(&report)?
                };
                println!("{}", json);
            }
            Ok(())
        }
        Commands::Summary { file, limit } => {
            let text = read(&file)?;
            let parsed = parse(&text);
            print_summary(&parsed, limit);
            Ok(())
        }
        Commands::Lint { files, strict } => {
            let strict = strict || settings.strict;
            let mut total = 0;
            for (path, parsed) in parse_files(&files)? {
                for d in &parsed.diagnostics {
                    println!("{}: {}", path.display(), d);
                }
                total += parsed.diagnostics.len();
            }
            if strict && total > 0 {
                bail!("{} warning(s) in strict mode", total);
            }
            Ok(())
        }
    };

    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "done");
    result
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Parse every file in parallel; results keep argument order.
fn parse_files(paths: &[PathBuf]) -> Result<Vec<(&Path, Parsed)>> {
    paths
        .par_iter()
        .map(|p| Ok::<_, anyhow::Error>((p.as_path(), parse(&read(p)?))))
        .collect()
}

fn print_summary(parsed: &Parsed, limit: usize) {
    let doc = &parsed.document;
    if let Some(title) = &doc.title {
        println!("{}\n", title);
    }
    if doc.releases.is_empty() {
        println!("No releases found.");
        return;
    }

    print!("{:<16} | {:<10} | {:<24}", "Version", "Date", "Title");
    for kind in ModificationKind::ALL {
        print!(" | {:>3}", &kind.as_str()[..3]);
    }
    println!();
    println!("{}", "-".repeat(56 + 6 * ModificationKind::ALL.len()));

    for r in doc.releases.iter().take(limit) {
        print!(
            "{:<16} | {:<10} | {:<24}",
            truncate(&r.version, 16),
            format_date(r),
            truncate(r.title.as_deref().unwrap_or(""), 24)
        );
        for kind in ModificationKind::ALL {
            print!(" | {:>3}", r.modifications_of(kind).len());
        }
        println!();
    }

    println!(
        "\n{} releases, {} modifications, {} warnings",
        doc.releases.len(),
        doc.releases.iter().map(Release::modification_count).sum::<usize>(),
        parsed.diagnostics.len()
    );
}

fn format_date(release: &Release) -> String {
    release
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}
