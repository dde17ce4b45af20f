// Corpus handling: from donated video metadata rows to flat token sequences.

pub mod loader;
pub mod normalize;
pub mod record;
pub mod split;
pub mod traits;
