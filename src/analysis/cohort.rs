// Cohort aggregator: per-user summaries for a whole directory of tables.
//
// Each user's table is analyzed independently on a blocking worker, a
// bounded number at a time. Outcomes are then sorted and folded into a
// `CohortReport`: successful users become rows, users without enough data
// become recorded failures, and a broken input file aborts the run.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::stats::{self, ColumnSummary};
use super::user::{analyze_table, extract_user_id, DivergenceResult, UserSummary};
use crate::corpus::loader::TableSchema;
use crate::error::AnalysisError;

/// Numeric columns of a user summary, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryColumn {
    NumUniqueWords,
    NumTotalWords,
    JsDivergencePq,
    JsDistancePq,
    JsDivergenceQp,
    JsDistanceQp,
}

impl SummaryColumn {
    pub const ALL: [SummaryColumn; 6] = [
        SummaryColumn::NumUniqueWords,
        SummaryColumn::NumTotalWords,
        SummaryColumn::JsDivergencePq,
        SummaryColumn::JsDistancePq,
        SummaryColumn::JsDivergenceQp,
        SummaryColumn::JsDistanceQp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryColumn::NumUniqueWords => "num_unique_words",
            SummaryColumn::NumTotalWords => "num_total_words",
            SummaryColumn::JsDivergencePq => "js_divergence_pq",
            SummaryColumn::JsDistancePq => "js_distance_pq",
            SummaryColumn::JsDivergenceQp => "js_divergence_qp",
            SummaryColumn::JsDistanceQp => "js_distance_qp",
        }
    }

    pub fn value(&self, result: &DivergenceResult) -> f64 {
        match self {
            SummaryColumn::NumUniqueWords => result.num_unique_words as f64,
            SummaryColumn::NumTotalWords => result.num_total_words as f64,
            SummaryColumn::JsDivergencePq => result.js_divergence_pq,
            SummaryColumn::JsDistancePq => result.js_distance_pq,
            SummaryColumn::JsDivergenceQp => result.js_divergence_qp,
            SummaryColumn::JsDistanceQp => result.js_distance_qp,
        }
    }
}

/// A synthetic labeled row ("mean" or "std") over all user rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub label: String,
    pub num_unique_words: f64,
    pub num_total_words: f64,
    pub js_divergence_pq: f64,
    pub js_distance_pq: f64,
    pub js_divergence_qp: f64,
    pub js_distance_qp: f64,
}

impl AggregateRow {
    fn from_values(label: &str, v: [f64; 6]) -> Self {
        Self {
            label: label.to_string(),
            num_unique_words: v[0],
            num_total_words: v[1],
            js_divergence_pq: v[2],
            js_distance_pq: v[3],
            js_divergence_qp: v[4],
            js_distance_qp: v[5],
        }
    }

    /// Values in `SummaryColumn::ALL` order.
    pub fn values(&self) -> [f64; 6] {
        [
            self.num_unique_words,
            self.num_total_words,
            self.js_divergence_pq,
            self.js_distance_pq,
            self.js_divergence_qp,
            self.js_distance_qp,
        ]
    }
}

/// Full distribution of one column across the cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub column: String,
    #[serde(flatten)]
    pub summary: ColumnSummary,
}

/// A user excluded from the aggregate for lack of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFailure {
    pub user: Option<String>,
    pub file: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortReport {
    pub generated_at: DateTime<Utc>,
    /// Successful users, ordered by user id
    pub users: Vec<UserSummary>,
    pub failures: Vec<UserFailure>,
    /// Column means over `users`; `None` when no user succeeded
    pub mean: Option<AggregateRow>,
    /// Column sample standard deviations over `users`
    pub std: Option<AggregateRow>,
    pub columns: Vec<ColumnDescription>,
}

impl CohortReport {
    /// Fold per-table outcomes into a report.
    ///
    /// Fails on the first fatal error (in file order) so a broken input
    /// file is reported the same way on every run.
    pub fn from_outcomes(
        mut outcomes: Vec<(PathBuf, Result<UserSummary, AnalysisError>)>,
    ) -> Result<Self> {
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));

        let mut users = Vec::new();
        let mut failures = Vec::new();

        for (path, outcome) in outcomes {
            match outcome {
                Ok(summary) => users.push(summary),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "Insufficient data, excluding user from cohort"
                    );
                    failures.push(UserFailure {
                        user: extract_user_id(&path).ok(),
                        file: path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(Self::build(users, failures))
    }

    /// Order users and compute the aggregate rows.
    pub fn build(mut users: Vec<UserSummary>, failures: Vec<UserFailure>) -> Self {
        users.sort_by(|a, b| compare_user_ids(&a.user, &b.user));

        let column_values: Vec<Vec<f64>> = SummaryColumn::ALL
            .iter()
            .map(|col| users.iter().map(|u| col.value(&u.result)).collect())
            .collect();

        let aggregate = |label: &str, f: fn(&[f64]) -> Option<f64>| {
            let mut row = [0.0; 6];
            for (slot, values) in row.iter_mut().zip(&column_values) {
                *slot = f(values)?;
            }
            Some(AggregateRow::from_values(label, row))
        };
        let mean = aggregate("mean", stats::mean);
        let std = aggregate("std", stats::sample_std);

        let columns = SummaryColumn::ALL
            .iter()
            .zip(&column_values)
            .filter_map(|(col, values)| {
                stats::describe(values).map(|summary| ColumnDescription {
                    column: col.as_str().to_string(),
                    summary,
                })
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            users,
            failures,
            mean,
            std,
            columns,
        }
    }
}

/// Settings for a cohort run.
#[derive(Debug, Clone)]
pub struct CohortOptions {
    pub schema: TableSchema,
    /// Tables analyzed at once (at least 1)
    pub concurrency: usize,
}

impl Default for CohortOptions {
    fn default() -> Self {
        Self {
            schema: TableSchema::default(),
            concurrency: 4,
        }
    }
}

/// Every `.csv` file directly inside `dir`, sorted by path.
pub fn discover_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read data directory {}", dir.display()))?;

    let mut tables = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            tables.push(path);
        }
    }
    tables.sort();
    Ok(tables)
}

/// Analyze every table in `dir` and build the cohort report.
pub async fn run(dir: &Path, options: &CohortOptions) -> Result<CohortReport> {
    let tables = discover_tables(dir)?;
    if tables.is_empty() {
        warn!(dir = %dir.display(), "No CSV tables found");
    }

    println!(
        "Analyzing {} user tables ({} concurrent)...",
        tables.len(),
        options.concurrency.max(1),
    );

    let pb = ProgressBar::new(tables.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Users [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    // CSV parsing and the divergence math are CPU-bound, so each table runs
    // on a blocking worker
    let joined: Vec<_> = stream::iter(tables.into_iter().map(|path| {
        let schema = options.schema.clone();
        let pb = pb.clone();
        async move {
            let task_path = path.clone();
            let outcome =
                tokio::task::spawn_blocking(move || analyze_table(&task_path, &schema)).await;
            pb.inc(1);
            outcome.map(|result| (path, result))
        }
    }))
    .buffer_unordered(options.concurrency.max(1))
    .collect()
    .await;

    pb.finish_and_clear();

    let outcomes = joined
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .context("A table analysis worker panicked")?;

    let report = CohortReport::from_outcomes(outcomes)?;

    info!(
        users = report.users.len(),
        excluded = report.failures.len(),
        "Cohort analysis complete"
    );

    Ok(report)
}

/// Numeric order when both ids are integers, lexicographic otherwise.
pub fn compare_user_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u128>(), b.parse::<u128>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
