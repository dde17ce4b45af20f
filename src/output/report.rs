// Report files: the cohort summary as CSV (for plotting and notebooks)
// and as JSON (everything, including excluded users and quartiles).

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::cohort::{CohortReport, SummaryColumn};

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write one row per user followed by the `mean` and `std` rows.
pub fn write_csv(report: &CohortReport, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec!["user"];
    header.extend(SummaryColumn::ALL.iter().map(|c| c.as_str()));
    writer.write_record(&header)?;

    for summary in &report.users {
        let r = &summary.result;
        writer.write_record([
            summary.user.clone(),
            r.num_unique_words.to_string(),
            r.num_total_words.to_string(),
            r.js_divergence_pq.to_string(),
            r.js_distance_pq.to_string(),
            r.js_divergence_qp.to_string(),
            r.js_distance_qp.to_string(),
        ])?;
    }

    for row in [&report.mean, &report.std].into_iter().flatten() {
        let mut record = vec![row.label.clone()];
        record.extend(row.values().iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the full report as pretty-printed JSON.
pub fn write_json(report: &CohortReport, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
