// Data models for donated video metadata.
//
// Only the two columns the divergence analysis needs are kept: whether the
// video was an advertisement, and its comma-separated suggested words.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of a user's donated metadata table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Comma-and-space separated phrases. `None` when the cell was empty.
    pub suggested_words: Option<String>,
    pub is_advertisement: bool,
}

impl VideoRecord {
    pub fn new(suggested_words: Option<&str>, is_advertisement: bool) -> Self {
        Self {
            suggested_words: suggested_words.map(str::to_string),
            is_advertisement,
        }
    }

    pub fn class(&self) -> ContentClass {
        if self.is_advertisement {
            ContentClass::Advertisement
        } else {
            ContentClass::Organic
        }
    }
}

/// Which side of the ad / non-ad partition a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentClass {
    Advertisement,
    Organic,
}

impl ContentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentClass::Advertisement => "advertisement",
            ContentClass::Organic => "organic",
        }
    }
}

impl fmt::Display for ContentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase word tokens for one class, in row / phrase / word order.
///
/// Only multiset counts matter downstream, but the order is kept stable so
/// the same table always produces the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence(Vec<String>);

impl TokenSequence {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub(crate) fn extend<I: IntoIterator<Item = String>>(&mut self, tokens: I) {
        self.0.extend(tokens);
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
