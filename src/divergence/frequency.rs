// Empirical frequency estimation over a flat token sequence.
//
// Each distinct token maps to count / total. Probabilities sum to 1.0 over
// the sequence's own vocabulary; alignment to a shared vocabulary happens
// later in `vocabulary`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::record::TokenSequence;
use crate::error::AnalysisError;

/// Token -> probability, with unique keys and sorted iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyDistribution {
    probabilities: BTreeMap<String, f64>,
    /// Number of tokens (with repeats) the distribution was estimated from
    total: usize,
}

impl FrequencyDistribution {
    /// Estimate the distribution of a non-empty token sequence.
    pub fn estimate(tokens: &TokenSequence) -> Result<Self, AnalysisError> {
        if tokens.is_empty() {
            return Err(AnalysisError::EmptySequence);
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for token in tokens.iter() {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }

        let total = tokens.len();
        let probabilities = counts
            .into_iter()
            .map(|(token, count)| (token, count as f64 / total as f64))
            .collect();

        Ok(Self {
            probabilities,
            total,
        })
    }

    /// Probability of `token`, or 0.0 if it never occurred.
    pub fn probability(&self, token: &str) -> f64 {
        self.probabilities.get(token).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.probabilities.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Number of tokens, with repeats, in the source sequence.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probabilities.iter().map(|(t, p)| (t.as_str(), *p))
    }

    /// The `n` most probable tokens, ties broken alphabetically.
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        // BTreeMap order is alphabetical and the sort is stable
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }
}
