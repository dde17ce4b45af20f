// Per-user aggregator: runs the whole divergence pipeline for one table.
//
// Given a user's records, this module:
// 1. Splits suggested words into ad and organic token sequences
// 2. Builds the union vocabulary of both sequences
// 3. Estimates each side's distribution over its own tokens
// 4. Aligns both distributions to the union vocabulary
// 5. Computes JS divergence and distance in both directions

use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::loader::TableSchema;
use crate::corpus::record::{ContentClass, VideoRecord};
use crate::corpus::split::{split_corpus, CorpusSplit};
use crate::corpus::traits::{CsvTable, RecordSource};
use crate::divergence::frequency::FrequencyDistribution;
use crate::divergence::metrics;
use crate::divergence::vocabulary::UnionVocabulary;
use crate::error::AnalysisError;

static USER_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// How differently one user's ad and organic content use vocabulary.
///
/// P is the advertisement distribution, Q the organic one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivergenceResult {
    /// Size of the union of both vocabularies
    pub num_unique_words: usize,
    /// Ad vocabulary size plus organic vocabulary size. Shared tokens are
    /// counted twice; this is not a count of token occurrences.
    pub num_total_words: usize,
    pub js_divergence_pq: f64,
    pub js_distance_pq: f64,
    pub js_divergence_qp: f64,
    pub js_distance_qp: f64,
}

/// A `DivergenceResult` tagged with the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user: String,
    #[serde(flatten)]
    pub result: DivergenceResult,
}

/// Both distributions of one user, laid over their shared vocabulary.
#[derive(Debug, Clone)]
pub struct VocabularyComparison {
    pub ad: FrequencyDistribution,
    pub organic: FrequencyDistribution,
    pub vocabulary: UnionVocabulary,
}

impl VocabularyComparison {
    /// Build the comparison for a split, refusing an empty side.
    pub fn from_split(split: &CorpusSplit) -> Result<Self, AnalysisError> {
        for class in [ContentClass::Advertisement, ContentClass::Organic] {
            if split.tokens(class).is_empty() {
                return Err(AnalysisError::EmptyClass { class });
            }
        }

        let vocabulary = UnionVocabulary::from_sequences(&split.ad, &split.non_ad);
        let ad = FrequencyDistribution::estimate(&split.ad)?;
        let organic = FrequencyDistribution::estimate(&split.non_ad)?;

        Ok(Self {
            ad,
            organic,
            vocabulary,
        })
    }

    /// Number of tokens that appear in both the ad and organic vocabularies.
    pub fn shared_tokens(&self) -> usize {
        self.vocabulary.total_vocabulary_size() - self.vocabulary.len()
    }

    pub fn divergence(&self) -> Result<DivergenceResult, AnalysisError> {
        let p = self.vocabulary.align(&self.ad);
        let q = self.vocabulary.align(&self.organic);

        // Both directions are computed separately and reported as-is
        let js_divergence_pq = metrics::js_divergence(&p, &q)?;
        let js_distance_pq = metrics::js_distance(&p, &q)?;
        let js_divergence_qp = metrics::js_divergence(&q, &p)?;
        let js_distance_qp = metrics::js_distance(&q, &p)?;

        Ok(DivergenceResult {
            num_unique_words: self.vocabulary.len(),
            num_total_words: self.vocabulary.total_vocabulary_size(),
            js_divergence_pq,
            js_distance_pq,
            js_divergence_qp,
            js_distance_qp,
        })
    }
}

/// Divergence for an already split corpus.
pub fn analyze_split(split: &CorpusSplit) -> Result<DivergenceResult, AnalysisError> {
    VocabularyComparison::from_split(split)?.divergence()
}

/// Divergence for a user's raw records.
pub fn analyze_records(records: &[VideoRecord]) -> Result<DivergenceResult, AnalysisError> {
    analyze_split(&split_corpus(records))
}

/// Divergence for any record source.
pub fn analyze_source(source: &dyn RecordSource) -> Result<DivergenceResult, AnalysisError> {
    analyze_records(&source.records()?)
}

/// Load a user's table, analyze it, and tag it with the id in its file name.
pub fn analyze_table(path: &Path, schema: &TableSchema) -> Result<UserSummary, AnalysisError> {
    let user = extract_user_id(path)?;
    let table = CsvTable::new(path, schema.clone());
    let result = analyze_source(&table)?;

    info!(
        user = user.as_str(),
        unique_words = result.num_unique_words,
        jsd = format!("{:.4}", result.js_divergence_pq),
        "Analyzed user"
    );

    Ok(UserSummary { user, result })
}

/// The first run of digits in the file name, e.g. `user_0042_videos.csv` -> `0042`.
pub fn extract_user_id(path: &Path) -> Result<String, AnalysisError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| USER_ID.find(name))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AnalysisError::MissingUserId {
            path: path.to_path_buf(),
        })
}
