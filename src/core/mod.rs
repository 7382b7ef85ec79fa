//! Core matching modules
//!
//! Key normalization and the title/file matcher.

pub mod key_normalizer;
pub mod matcher;

pub use key_normalizer::{is_key_char, KeyNormalizer, DEFAULT_MATCH_LEN};
pub use matcher::{MatchResults, Matcher, UnmatchedTitle};
