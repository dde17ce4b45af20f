// Analysis: per-user divergence summaries and cohort aggregation.

pub mod cohort;
pub mod stats;
pub mod user;
