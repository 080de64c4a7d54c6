use std::env;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::models::{Entry, YearCount};
use crate::error::PipelineError;
use crate::infra::csv::to_csv;
use crate::infra::files::{remove_if_exists, write_atomic};
use crate::workflows::chart::render_chart;

const ENTRY_HEADER: &[&str] = &["text", "year", "section"];
const COUNT_HEADER: &[&str] = &["year", "count"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub all_entries: PathBuf,
    pub filtered_entries: PathBuf,
    pub counts: PathBuf,
    pub chart: PathBuf,
    pub proof: PathBuf,
}

impl OutputPaths {
    pub fn under(root: &Path) -> Self {
        let data = root.join("data");
        let outputs = root.join("outputs");
        Self {
            all_entries: data.join("wiki_christmas_entries_all.csv"),
            filtered_entries: data.join("wiki_christmas_entries_filtered.csv"),
            counts: data.join("wiki_christmas_counts_by_year.csv"),
            chart: outputs.join("wiki_christmas_counts_by_year.png"),
            proof: outputs.join("it_ran.txt"),
        }
    }

    /// Generated artifacts, excluding the proof file itself.
    pub fn artifacts(&self) -> [&Path; 4] {
        [
            self.all_entries.as_path(),
            self.filtered_entries.as_path(),
            self.counts.as_path(),
            self.chart.as_path(),
        ]
    }
}

pub fn entries_csv(entries: &[Entry]) -> io::Result<Vec<u8>> {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.text.clone(),
                e.year.map(|y| y.to_string()).unwrap_or_default(),
                e.section.clone(),
            ]
        })
        .collect();
    to_csv(ENTRY_HEADER, &rows)
}

pub fn counts_csv(counts: &[YearCount]) -> io::Result<Vec<u8>> {
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|yc| vec![yc.year.to_string(), yc.count.to_string()])
        .collect();
    to_csv(COUNT_HEADER, &rows)
}

pub fn proof_text(paths: &OutputPaths, working_dir: &Path, summary: &str) -> String {
    let mut text = String::from("christmas-episodes run completed successfully.\n");
    text.push_str(&format!("Working directory: {}\n", working_dir.display()));
    text.push_str(summary);
    text.push('\n');
    text.push_str("Artifacts:\n");
    for path in paths.artifacts() {
        text.push_str(&format!("{}\n", path.display()));
    }
    text
}

fn write_table(path: &Path, contents: io::Result<Vec<u8>>) -> Result<(), PipelineError> {
    let contents = contents.map_err(|e| PipelineError::write(path, e))?;
    write_atomic(path, &contents)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write every artifact, then the proof file. The first failure aborts
/// the export and names the artifact; the proof file only exists after a
/// complete export.
pub fn export(
    paths: &OutputPaths,
    all: &[Entry],
    filtered: &[Entry],
    counts: &[YearCount],
) -> Result<(), PipelineError> {
    remove_if_exists(&paths.proof)?;

    write_table(&paths.all_entries, entries_csv(all))?;
    write_table(&paths.filtered_entries, entries_csv(filtered))?;
    write_table(&paths.counts, counts_csv(counts))?;

    let png = render_chart(counts).map_err(|e| PipelineError::write(&paths.chart, format!("{e:#}")))?;
    write_atomic(&paths.chart, &png)?;
    info!("Wrote chart {}", paths.chart.display());

    let working_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let summary = format!(
        "Entries: {} total, {} after filtering, {} distinct years",
        all.len(),
        filtered.len(),
        counts.len()
    );
    write_atomic(
        &paths.proof,
        proof_text(paths, &working_dir, &summary).as_bytes(),
    )?;
    info!("Wrote proof file {}", paths.proof.display());
    Ok(())
}
