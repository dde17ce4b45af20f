// Numeric token stripping for the suggested-words field.

use std::sync::LazyLock;

use regex_lite::Regex;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Remove every run of decimal digits, leaving all other characters as-is.
///
/// Surrounding whitespace is not collapsed: `"top 10 shoes"` becomes
/// `"top  shoes"`. Tokenization later splits on any whitespace, so the
/// double space never produces an empty token.
pub fn strip_digits(text: &str) -> String {
    DIGIT_RUN.replace_all(text, "").into_owned()
}
