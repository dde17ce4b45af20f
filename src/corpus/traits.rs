// Record source trait: where a user's metadata rows come from.
//
// The per-user analysis only needs a list of records. Reading them from a
// CSV export is the normal path, but tests and callers that already hold
// rows in memory can hand them over directly.

use std::path::PathBuf;

use super::loader::{self, TableSchema};
use super::record::VideoRecord;
use crate::error::AnalysisError;

/// Anything that can produce one user's video records.
pub trait RecordSource {
    fn records(&self) -> Result<Vec<VideoRecord>, AnalysisError>;
}

/// A per-user CSV table on disk.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub path: PathBuf,
    pub schema: TableSchema,
}

impl CsvTable {
    pub fn new(path: impl Into<PathBuf>, schema: TableSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }
}

impl RecordSource for CsvTable {
    fn records(&self) -> Result<Vec<VideoRecord>, AnalysisError> {
        loader::load_records(&self.path, &self.schema)
    }
}

impl RecordSource for Vec<VideoRecord> {
    fn records(&self) -> Result<Vec<VideoRecord>, AnalysisError> {
        Ok(self.clone())
    }
}

impl RecordSource for [VideoRecord] {
    fn records(&self) -> Result<Vec<VideoRecord>, AnalysisError> {
        Ok(self.to_vec())
    }
}
