//! Text decoding with a regional fallback
//!
//! Spreadsheet exports on Chinese-locale Windows are often GBK rather than
//! UTF-8. Decoding tries UTF-8 first and only then GBK, both strictly.

use encoding_rs::{Encoding, GBK};

use crate::error::{MdMatchError, MdResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Which decoder accepted the bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Gbk,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Gbk => "gbk",
        }
    }
}

/// Decode `bytes` as UTF-8 (BOM ignored), falling back to GBK
pub fn decode_text(bytes: &[u8]) -> MdResult<(String, TextEncoding)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => Ok((text.to_string(), TextEncoding::Utf8)),
        Err(utf8_err) => {
            tracing::debug!("Not UTF-8 ({}), retrying as GBK", utf8_err);
            decode_strict(GBK, bytes)
                .map(|text| (text, TextEncoding::Gbk))
                .ok_or_else(|| {
                    MdMatchError::TableDecode(format!(
                        "neither utf-8 ({}) nor gbk could decode the input",
                        utf8_err
                    ))
                })
        }
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}
