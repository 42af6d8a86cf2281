//! RFC 4648 base32 codec for transporting secrets in human-safe form.
//!
//! Encoding always emits the uppercase `A–Z2–7` alphabet with `=` padding.
//! Decoding is tolerant of the forms that show up in provisioning URIs and
//! manual entry: padding is optional and lowercase is accepted. Anything
//! outside the alphabet is rejected with its position.

use data_encoding::{BASE32, BASE32_NOPAD};

use crate::error::OtpError;

/// Encode bytes as RFC 4648 base32 text with `=` padding.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE32.encode(bytes)
}

/// Decode RFC 4648 base32 text into bytes.
///
/// Trailing `=` padding is stripped and ignored; lowercase letters are
/// accepted.
///
/// # Errors
///
/// Returns [`OtpError::InvalidBase32`] with the byte position of the first
/// character outside the alphabet.
pub fn decode(text: &str) -> Result<Vec<u8>, OtpError> {
    let trimmed = text.trim_end_matches('=');
    let upper = trimmed.to_ascii_uppercase();
    BASE32_NOPAD
        .decode(upper.as_bytes())
        .map_err(|e| OtpError::InvalidBase32 { position: e.position })
}
