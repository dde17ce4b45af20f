// Corpus splitter: partitions suggested-word phrases into ad and organic
// token sequences.
//
// Per record: drop it if suggested words are missing, strip digits,
// lowercase, split on ", " into phrases, then split each phrase on
// whitespace. Tokens are appended in row order, then phrase order, then
// word order.

use tracing::debug;

use super::normalize::strip_digits;
use super::record::{ContentClass, TokenSequence, VideoRecord};

/// Separator between phrases in the suggested-words field.
pub const PHRASE_SEPARATOR: &str = ", ";

/// Result of splitting one user's table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusSplit {
    pub ad: TokenSequence,
    pub non_ad: TokenSequence,
    /// Records dropped because their suggested-words field was missing
    pub skipped_rows: usize,
}

impl CorpusSplit {
    pub fn tokens(&self, class: ContentClass) -> &TokenSequence {
        match class {
            ContentClass::Advertisement => &self.ad,
            ContentClass::Organic => &self.non_ad,
        }
    }
}

/// Split a user's records into ad and non-ad token sequences.
pub fn split_corpus(records: &[VideoRecord]) -> CorpusSplit {
    let mut split = CorpusSplit::default();

    for record in records {
        let Some(words) = record.suggested_words.as_deref() else {
            split.skipped_rows += 1;
            continue;
        };

        let tokens = tokenize(&strip_digits(words));
        match record.class() {
            ContentClass::Advertisement => split.ad.extend(tokens),
            ContentClass::Organic => split.non_ad.extend(tokens),
        }
    }

    debug!(
        ad_tokens = split.ad.len(),
        non_ad_tokens = split.non_ad.len(),
        skipped = split.skipped_rows,
        "Split corpus"
    );

    split
}

/// Lowercase a normalized field and flatten its phrases into word tokens.
fn tokenize(normalized: &str) -> Vec<String> {
    normalized
        .to_lowercase()
        .split(PHRASE_SEPARATOR)
        .flat_map(|phrase| phrase.split_whitespace().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_by_class() {
        let records = vec![
            VideoRecord::new(Some("Running Shoes, Big Sale"), true),
            VideoRecord::new(Some("street style"), false),
        ];
        let split = split_corpus(&records);
        assert_eq!(
            split.ad.iter().collect::<Vec<_>>(),
            vec!["running", "shoes", "big", "sale"]
        );
        assert_eq!(split.non_ad.iter().collect::<Vec<_>>(), vec!["street", "style"]);
        assert_eq!(split.skipped_rows, 0);
    }

    #[test]
    fn test_missing_words_are_skipped() {
        let records = vec![
            VideoRecord::new(None, true),
            VideoRecord::new(Some("dance"), false),
            VideoRecord::new(None, false),
        ];
        let split = split_corpus(&records);
        assert!(split.ad.is_empty());
        assert_eq!(split.non_ad.len(), 1);
        assert_eq!(split.skipped_rows, 2);
    }

    #[test]
    fn test_digits_removed_before_tokenizing() {
        let records = vec![VideoRecord::new(Some("top 10 shoes, 2024"), true)];
        let split = split_corpus(&records);
        // "2024" becomes an empty phrase and yields no tokens
        assert_eq!(split.ad.iter().collect::<Vec<_>>(), vec!["top", "shoes"]);
    }

    #[test]
    fn test_comma_without_space_stays_in_phrase() {
        let records = vec![VideoRecord::new(Some("cats,dogs, birds"), false)];
        let split = split_corpus(&records);
        assert_eq!(
            split.non_ad.iter().collect::<Vec<_>>(),
            vec!["cats,dogs", "birds"]
        );
    }
}
