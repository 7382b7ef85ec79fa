//! Match Key Normalization
//!
//! Turns article titles and file names into a shared join key: the date
//! prefix and extension are removed, everything except CJK ideographs and
//! ASCII alphanumerics is dropped, and the result is cut to a fixed length.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Leading `[...]` token, e.g. `[2025-01-01]`
    static ref BRACKET_PREFIX: Regex = Regex::new(r"^\[.*?\]").unwrap();
}

/// Default number of characters kept in a key
pub const DEFAULT_MATCH_LEN: usize = 30;

/// Builds match keys for titles and file names
#[derive(Debug, Clone)]
pub struct KeyNormalizer {
    /// `.{extension}`, compared ASCII case-insensitively
    extension_suffix: String,
    match_len: usize,
}

impl KeyNormalizer {
    /// Create a normalizer stripping `.{extension}` and keeping `match_len` chars
    pub fn new(extension: &str, match_len: usize) -> Self {
        Self {
            extension_suffix: format!(".{}", extension.trim_start_matches('.')),
            match_len,
        }
    }

    pub fn match_len(&self) -> usize {
        self.match_len
    }

    /// Key for a possibly absent value; absent values map to the empty key
    pub fn key(&self, input: Option<&str>) -> String {
        match input {
            Some(text) => self.key_str(text),
            None => String::new(),
        }
    }

    /// Key for a title or file name
    pub fn key_str(&self, text: &str) -> String {
        let text = BRACKET_PREFIX.replace(text, "");
        strip_suffix_ignore_case(&text, &self.extension_suffix)
            .chars()
            .filter(|&c| is_key_char(c))
            .take(self.match_len)
            .collect()
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self::new("md", DEFAULT_MATCH_LEN)
    }
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> &'a str {
    let Some(split) = text.len().checked_sub(suffix.len()) else {
        return text;
    };
    match text.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(suffix) => &text[..split],
        _ => text,
    }
}

/// CJK unified ideographs (U+4E00..=U+9FA5) plus ASCII letters and digits
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}
