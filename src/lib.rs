// adverge: vocabulary divergence between ads and organic videos
//
// This is the library root. Modules follow the pipeline: corpus turns
// donated metadata rows into token sequences, divergence compares two
// token distributions, analysis runs that per user and across the cohort,
// and output renders the results.

pub mod analysis;
pub mod config;
pub mod corpus;
pub mod divergence;
pub mod error;
pub mod output;
