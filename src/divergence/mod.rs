// Divergence between ad and organic vocabulary distributions.
//
// frequency:  token sequence -> empirical probability mass function
// vocabulary: union of two vocabularies + zero-filled aligned vectors
// metrics:    KL, Jensen-Shannon divergence and distance (base 2)

pub mod frequency;
pub mod metrics;
pub mod vocabulary;
