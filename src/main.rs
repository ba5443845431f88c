//! blogify - static blog generator

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use blogify::document::extract;
use blogify::{convert_dir, read_source, write_index};

#[derive(Parser)]
#[command(name = "blogify")]
#[command(version, about = "Static blog generator for a line-oriented markup", long_about = None)]
#[command(after_help = "EXAMPLES:
    blogify posts site            Convert posts/*.blog into site/ and build the index
    blogify posts site --no-index Convert without rebuilding the index
    blogify -i posts/1-intro.blog Show a post's front matter")]
struct Cli {
    /// Directory containing markup sources
    #[arg(value_name = "SOURCE_DIR", required_unless_present = "info")]
    source: Option<PathBuf>,

    /// Directory to write generated pages into
    #[arg(value_name = "DEST_DIR", required_unless_present = "info")]
    dest: Option<PathBuf>,

    /// Show a source file's front matter without converting
    #[arg(short, long, value_name = "FILE")]
    info: Option<PathBuf>,

    /// Source file extension to convert
    #[arg(long, default_value = "blog")]
    ext: String,

    /// Title of the generated index page
    #[arg(long, default_value = "Blog index")]
    title: String,

    /// Skip rebuilding the index page
    #[arg(long)]
    no_index: bool,

    /// Print the conversion report as JSON
    #[arg(long)]
    json: bool,

    /// Suppress per-file progress output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct JsonReport {
    converted: Vec<PathBuf>,
    failed: Vec<JsonFailure>,
    index: Option<PathBuf>,
}

#[derive(Serialize)]
struct JsonFailure {
    path: PathBuf,
    error: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(ref path) = cli.info {
        return match show_info(path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let source = cli.source.as_deref().expect("source required");
    let dest = cli.dest.as_deref().expect("dest required");

    let report = match convert_dir(source, dest, &cli.ext) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !cli.quiet && !cli.json {
        for page in &report.converted {
            println!("{}", page.display());
        }
    }
    for (path, err) in &report.failed {
        eprintln!("error: {}: {err}", path.display());
    }

    let mut index = None;
    if cli.no_index {
        // Leave any existing index untouched.
    } else if report.is_success() {
        match write_index(dest, &cli.title) {
            Ok(path) => {
                if !cli.quiet && !cli.json {
                    println!("{}", path.display());
                }
                index = Some(path);
            }
            Err(e) => {
                eprintln!("error: index: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        eprintln!("error: skipping index build, {} file(s) failed", report.failed.len());
    }

    if cli.json {
        let json = JsonReport {
            converted: report.converted.clone(),
            failed: report
                .failed
                .iter()
                .map(|(path, err)| JsonFailure {
                    path: path.clone(),
                    error: err.to_string(),
                })
                .collect(),
            index,
        };
        match serde_json::to_string_pretty(&json) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn show_info(path: &Path) -> Result<(), String> {
    let raw = read_source(path).map_err(|e| e.to_string())?;
    let doc = extract(&raw).map_err(|e| e.to_string())?;

    println!("File: {}", path.display());
    println!("Title: {}", doc.title);
    println!("Created: {} ({})", doc.created, doc.created.to_text());
    println!("Modified: {} ({})", doc.modified, doc.modified.to_text());
    if !doc.subtitle.is_empty() {
        println!("Subtitle: {}", doc.subtitle);
    }
    println!("Body lines: {}", doc.body.len());

    Ok(())
}
