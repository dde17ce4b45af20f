// Vocabulary unification and probability alignment.
//
// Both distributions are estimated over their own vocabularies. Before
// comparing them they are laid out over the union vocabulary, in sorted
// token order, with 0.0 wherever a distribution never saw the token.

use std::collections::BTreeSet;

use super::frequency::FrequencyDistribution;
use crate::corpus::record::TokenSequence;

/// The sorted union of two token vocabularies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionVocabulary {
    tokens: Vec<String>,
    total_vocabulary_size: usize,
}

impl UnionVocabulary {
    /// Build the union vocabulary of two token sequences.
    pub fn from_sequences(a: &TokenSequence, b: &TokenSequence) -> Self {
        let vocab_a: BTreeSet<&str> = a.iter().collect();
        let vocab_b: BTreeSet<&str> = b.iter().collect();

        let total_vocabulary_size = vocab_a.len() + vocab_b.len();
        let tokens = vocab_a
            .union(&vocab_b)
            .map(|t| t.to_string())
            .collect();

        Self {
            tokens,
            total_vocabulary_size,
        }
    }

    /// Number of distinct tokens across both sequences.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Sum of the two vocabulary sizes. A token present on both sides is
    /// counted twice, so this is not a token count and not the union size.
    pub fn total_vocabulary_size(&self) -> usize {
        self.total_vocabulary_size
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Lay out `dist` over this vocabulary's token order.
    pub fn align(&self, dist: &FrequencyDistribution) -> AlignedVector {
        AlignedVector(self.tokens.iter().map(|t| dist.probability(t)).collect())
    }
}

/// Probabilities indexed by a `UnionVocabulary`'s token order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedVector(Vec<f64>);

impl AlignedVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::ops::Deref for AlignedVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tokens: &[&str]) -> TokenSequence {
        tokens.iter().copied().collect()
    }

    #[test]
    fn test_union_is_sorted_and_deduplicated() {
        let vocab =
            UnionVocabulary::from_sequences(&seq(&["shoes", "shoes", "sale"]), &seq(&["shoes", "style"]));
        assert_eq!(vocab.tokens(), &["sale", "shoes", "style"]);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_total_double_counts_shared_tokens() {
        let vocab =
            UnionVocabulary::from_sequences(&seq(&["shoes", "shoes", "sale"]), &seq(&["shoes", "style"]));
        assert_eq!(vocab.total_vocabulary_size(), 4);
    }

    #[test]
    fn test_align_zero_fills() {
        let a = seq(&["shoes", "shoes", "sale"]);
        let b = seq(&["shoes", "style"]);
        let vocab = UnionVocabulary::from_sequences(&a, &b);
        let p = vocab.align(&FrequencyDistribution::estimate(&a).unwrap());
        let q = vocab.align(&FrequencyDistribution::estimate(&b).unwrap());

        assert_eq!(p.len(), 3);
        assert_eq!(q.len(), 3);
        // order: sale, shoes, style
        assert!((p[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((p[1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(p[2], 0.0);
        assert_eq!(q[0], 0.0);
        assert!((q[1] - 0.5).abs() < 1e-12);
        assert!((q[2] - 0.5).abs() < 1e-12);
    }
}
