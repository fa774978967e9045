//! Legacy text decoding for scraped pages.
//!
//! The planalto.gov.br pages are served as windows-1252. Bytes are decoded
//! as that encoding unconditionally: no BOM sniffing and no `<meta charset>`
//! detection, so a page in another encoding comes out as mojibake.

use encoding_rs::WINDOWS_1252;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed {encoding} byte stream")]
    Malformed { encoding: &'static str },
}

/// Decode windows-1252 bytes to a UTF-8 string.
pub fn decode_legacy(bytes: &[u8]) -> Result<String, DecodeError> {
    WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(DecodeError::Malformed {
            encoding: WINDOWS_1252.name(),
        })
}
