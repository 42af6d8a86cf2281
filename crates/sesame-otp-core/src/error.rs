//! Error types for `sesame-otp-core`.

use thiserror::Error;

/// Errors produced by the OTP engine.
///
/// Construction errors (`EmptySecret`, `DigitsOutOfRange`, `ZeroStep`)
/// surface when an OTP instance is built and are never silently clamped.
/// Format errors (`InvalidBase32`, `MalformedPrivateHash`) are validated
/// locally, before any value crosses a network boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    /// Secret key material is empty.
    #[error("secret key must not be empty")]
    EmptySecret,

    /// Digit count outside the accepted 6..=8 range.
    #[error("digit count {0} out of range (must be 6..=8)")]
    DigitsOutOfRange(u8),

    /// TOTP time step of zero seconds.
    #[error("time step must be greater than zero")]
    ZeroStep,

    /// A character outside the RFC 4648 base32 alphabet.
    #[error("invalid base32 character at position {position}")]
    InvalidBase32 {
        /// Byte offset of the offending character in the input.
        position: usize,
    },

    /// The client private hash is not a 64-character sha256 hex string.
    #[error("client private hash must be 64 hex characters")]
    MalformedPrivateHash,

    /// Secure memory failure (CSPRNG fill).
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}
