use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::analysis::cohort::CohortOptions;
use crate::corpus::loader::{TableSchema, DEFAULT_AD_COLUMN, DEFAULT_WORDS_COLUMN};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command
/// line flags override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one CSV table per user (ADVERGE_DATA_DIR)
    pub data_dir: PathBuf,
    /// Where cohort reports are written (ADVERGE_OUTPUT_DIR)
    pub output_dir: PathBuf,
    /// Column names in the per-user tables
    pub schema: TableSchema,
    /// Number of user tables analyzed at once (ADVERGE_CONCURRENCY)
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables, with defaults for all.
    pub fn load() -> Result<Self> {
        let concurrency = match env::var("ADVERGE_CONCURRENCY") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
                anyhow::anyhow!("ADVERGE_CONCURRENCY must be a positive integer, got {raw:?}")
            })?,
            Err(_) => 4,
        };

        Ok(Self {
            data_dir: env::var("ADVERGE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            output_dir: env::var("ADVERGE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./output")),
            schema: TableSchema {
                ad_column: env::var("ADVERGE_AD_COLUMN")
                    .unwrap_or_else(|_| DEFAULT_AD_COLUMN.to_string()),
                words_column: env::var("ADVERGE_WORDS_COLUMN")
                    .unwrap_or_else(|_| DEFAULT_WORDS_COLUMN.to_string()),
            },
            concurrency: concurrency.max(1),
        })
    }

    /// Check that the data directory exists.
    /// Call this before a cohort run.
    pub fn require_data_dir(&self) -> Result<()> {
        if !self.data_dir.is_dir() {
            anyhow::bail!(
                "Data directory {} not found.\n\
                 Set ADVERGE_DATA_DIR in your .env file or pass --data-dir.",
                self.data_dir.display()
            );
        }
        Ok(())
    }

    pub fn cohort_options(&self) -> CohortOptions {
        CohortOptions {
            schema: self.schema.clone(),
            concurrency: self.concurrency,
        }
    }
}
