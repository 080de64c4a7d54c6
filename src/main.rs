mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod logging;
mod workflows;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::Cli;
use config::Config;
use infra::http::HttpSource;
use infra::{FileSource, Source};
use workflows::export::OutputPaths;
use workflows::extract::Extractor;
use workflows::filter::RuleSet;
use workflows::pipeline;

fn main() {
    let cli = Cli::parse();
    logging::setup_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli)?;

    let source: Box<dyn Source> = match &cli.html_file {
        Some(path) => Box::new(FileSource { path: path.clone() }),
        None => Box::new(HttpSource::from_config(&config)),
    };

    let extractor = Extractor::from_config(&config)?;
    let rules = RuleSet::from_config(&config)?;
    let rule_names: Vec<_> = rules.rules().iter().map(|r| r.name()).collect();
    info!("Filter rules in order: {}", rule_names.join(", "));

    let paths = OutputPaths::under(&config.out_dir);
    let processed = pipeline::run(&*source, &extractor, &rules, &paths)?;

    info!(
        "Done: {} list items, {} kept, {} years",
        processed.stats.scanned,
        processed.filtered.len(),
        processed.counts.len()
    );
    Ok(())
}
