use tracing::info;

use crate::domain::models::{Entry, ExtractStats, YearCount};
use crate::error::PipelineError;
use crate::infra::Source;
use crate::workflows::aggregate::{count_by_year, top_years};
use crate::workflows::export::{export, OutputPaths};
use crate::workflows::extract::Extractor;
use crate::workflows::filter::RuleSet;

pub struct Processed {
    pub all: Vec<Entry>,
    pub filtered: Vec<Entry>,
    pub counts: Vec<YearCount>,
    pub stats: ExtractStats,
}

/// Extract, filter and aggregate one document.
pub fn process(html: &str, extractor: &Extractor, rules: &RuleSet) -> Result<Processed, PipelineError> {
    let (all, stats) = extractor.extract(html)?;
    let filtered = rules.apply(&all);
    let counts = count_by_year(&filtered);
    Ok(Processed {
        all,
        filtered,
        counts,
        stats,
    })
}

pub fn run(
    source: &dyn Source,
    extractor: &Extractor,
    rules: &RuleSet,
    paths: &OutputPaths,
) -> Result<Processed, PipelineError> {
    info!("Downloading {}", source.describe());
    let html = source.fetch()?;

    let processed = process(&html, extractor, rules)?;
    report(&processed.counts);

    export(paths, &processed.all, &processed.filtered, &processed.counts)?;
    Ok(processed)
}

fn report(counts: &[YearCount]) {
    let top = top_years(counts, 10);
    let Some(best) = top.first() else {
        info!("No entries survived filtering");
        return;
    };
    for yc in &top {
        info!("  {}: {}", yc.year, yc.count);
    }
    info!(
        "Year with the most Christmas episodes (filtered): {} ({})",
        best.year, best.count
    );
}
