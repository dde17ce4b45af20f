// CSV loading for per-user metadata tables.
//
// Tables come from an external export step, so only the two required
// columns are looked up by name; anything else in the file is ignored.
// Column names are configurable through `TableSchema`.

use std::fs::File;
use std::path::Path;

use tracing::info;

use super::record::VideoRecord;
use crate::error::AnalysisError;

pub const DEFAULT_AD_COLUMN: &str = "isAdvertisement";
pub const DEFAULT_WORDS_COLUMN: &str = "suggestedWords";

/// Names of the columns the analysis reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub ad_column: String,
    pub words_column: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            ad_column: DEFAULT_AD_COLUMN.to_string(),
            words_column: DEFAULT_WORDS_COLUMN.to_string(),
        }
    }
}

/// Read every record from a CSV table on disk.
pub fn load_records(path: &Path, schema: &TableSchema) -> Result<Vec<VideoRecord>, AnalysisError> {
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file, path, schema)?;

    info!(
        file = %path.display(),
        rows = records.len(),
        "Loaded metadata table"
    );

    Ok(records)
}

/// Parse records from any reader. `origin` is only used in error messages.
pub fn read_records<R: std::io::Read>(
    reader: R,
    origin: &Path,
    schema: &TableSchema,
) -> Result<Vec<VideoRecord>, AnalysisError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AnalysisError::csv(origin, e))?
        .clone();

    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| AnalysisError::malformed(origin, format!("missing column `{name}`")))
    };
    let ad_idx = column_index(&schema.ad_column)?;
    let words_idx = column_index(&schema.words_column)?;

    let mut records = Vec::new();
    for (i, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| AnalysisError::csv(origin, e))?;
        let row_number = i + 1;

        let raw_flag = row.get(ad_idx).unwrap_or("");
        let is_advertisement = parse_flag(raw_flag).ok_or_else(|| {
            AnalysisError::malformed(
                origin,
                format!(
                    "row {row_number}: `{}` is not a boolean: {raw_flag:?}",
                    schema.ad_column
                ),
            )
        })?;

        // An empty cell is how the export writes a null
        let suggested_words = row
            .get(words_idx)
            .filter(|w| !w.is_empty())
            .map(str::to_string);

        records.push(VideoRecord {
            suggested_words,
            is_advertisement,
        });
    }

    Ok(records)
}

/// Accept the boolean spellings dataframe exports produce.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "True" | "TRUE" | "1" | "1.0" => Some(true),
        "false" | "False" | "FALSE" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv_text: &str) -> Result<Vec<VideoRecord>, AnalysisError> {
        read_records(
            csv_text.as_bytes(),
            Path::new("user_7.csv"),
            &TableSchema::default(),
        )
    }

    #[test]
    fn test_reads_required_columns() {
        let records = parse(
            "id,isAdvertisement,suggestedWords\n\
             1,True,\"shoes, sale\"\n\
             2,False,street style\n",
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], VideoRecord::new(Some("shoes, sale"), true));
        assert_eq!(records[1], VideoRecord::new(Some("street style"), false));
    }

    #[test]
    fn test_empty_cell_is_missing() {
        let records = parse("isAdvertisement,suggestedWords\nfalse,\n").unwrap();
        assert_eq!(records[0].suggested_words, None);
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let err = parse("isAdvertisement,description\ntrue,hello\n").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInput { .. }));
        assert!(err.to_string().contains("suggestedWords"));
        assert!(err.to_string().contains("user_7.csv"));
    }

    #[test]
    fn test_bad_boolean_reports_row() {
        let err = parse("isAdvertisement,suggestedWords\ntrue,a\nmaybe,b\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 2"), "got: {msg}");
    }

    #[test]
    fn test_flag_spellings() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("1.0"), Some(true));
        assert_eq!(parse_flag(""), None);
    }
}
