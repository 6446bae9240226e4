use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use deplinks::core::LinkAnalyzer;
use deplinks::formatters::JsonFormatter;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "deplinks",
    version,
    about = "Go dependency link extractor for code visualization"
)]
struct Cli {
    /// Root directory of the Go project to analyze
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();

    let analyzer = LinkAnalyzer::new();
    let links = analyzer.determine_links(&cli.root)?;

    eprintln!(
        "Found {} links in {:.2}s",
        links.len(),
        start.elapsed().as_secs_f64()
    );

    let formatter = JsonFormatter::new().with_pretty(cli.pretty);
    match &cli.output {
        Some(path) => formatter.format_to_file(&links, path)?,
        None => println!("{}", formatter.format_links(&links)?),
    }

    Ok(())
}
