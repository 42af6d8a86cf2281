//! Shared OTP computation core (RFC 4226 §5.3 dynamic truncation).
//!
//! Both HOTP and TOTP reduce to the same pure function of
//! (secret, counter, hash mode, digit count); the variants only differ in
//! where the counter comes from. This module holds that function together
//! with the hash-mode and digit-count types and the fixed-time comparison
//! used by every verification path.

use ring::hmac;

use crate::error::OtpError;
use crate::memory::KeyMaterial;

/// Constant-time byte comparison for OTP codes.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// Uses bitwise OR accumulation to avoid short-circuit timing leaks.
///
/// Note: The early return on length mismatch is acceptable for OTP codes
/// because the expected digit count (6..=8) is public information — it is
/// not secret. The constant-time property protects the *code value*, not
/// its length.
#[must_use]
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ── Types ───────────────────────────────────────────────────────────

/// HMAC algorithm used for OTP generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashMode {
    /// HMAC-SHA1 (default for most authenticator deployments).
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl HashMode {
    /// Map to the corresponding `ring::hmac::Algorithm`.
    pub(crate) fn to_ring_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => hmac::HMAC_SHA256,
            Self::Sha512 => hmac::HMAC_SHA512,
        }
    }

    /// RFC-recommended secret length in bytes for this mode (RFC 4226 §4,
    /// RFC 6238 §3): 20 for SHA1, 32 for SHA256, 64 for SHA512.
    #[must_use]
    pub const fn recommended_key_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

/// Number of digits in an OTP code, bounded to 6..=8.
///
/// The bound applies to both HOTP and TOTP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OtpDigits(u8);

impl OtpDigits {
    /// 6-digit codes (the common default).
    pub const SIX: Self = Self(6);
    /// 8-digit codes (used by the RFC 6238 test vectors).
    pub const EIGHT: Self = Self(8);

    /// Validate a digit count.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::DigitsOutOfRange`] unless `6 <= count <= 8`.
    pub const fn new(count: u8) -> Result<Self, OtpError> {
        if count < 6 || count > 8 {
            return Err(OtpError::DigitsOutOfRange(count));
        }
        Ok(Self(count))
    }

    /// Return the numeric digit count.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Return the modulus value (10^digits) for truncation.
    const fn modulus(self) -> u32 {
        match self.0 {
            6 => 1_000_000,
            7 => 10_000_000,
            // new() admits nothing else
            _ => 100_000_000,
        }
    }
}

impl Default for OtpDigits {
    fn default() -> Self {
        Self::SIX
    }
}

// ── Dynamic truncation ─────────────────────────────────────────────

/// Extract a 31-bit integer from an HMAC digest (RFC 4226 §5.3).
///
/// The offset is the low-order 4 bits of the last digest byte; the RFC's
/// hard-coded index 19 generalizes to the last byte so SHA256 and SHA512
/// digests work the same way. Masking the first byte with `0x7F` discards
/// the sign bit.
pub(crate) fn dynamic_truncation(mac: &[u8]) -> u32 {
    let offset = usize::from(mac[mac.len().wrapping_sub(1)] & 0x0F);
    u32::from_be_bytes([
        mac[offset] & 0x7F,
        mac[offset.wrapping_add(1)],
        mac[offset.wrapping_add(2)],
        mac[offset.wrapping_add(3)],
    ])
}

/// Compute an OTP code from a secret and a counter.
///
/// Encodes `counter` as 8 big-endian bytes (RFC 4226 §5.3 dictates
/// big-endian regardless of host byte order), HMACs it, truncates, and
/// renders the result as a zero-padded decimal string of exactly
/// `digits` characters. Pure and deterministic; the HMAC key schedule
/// is scoped to the call.
#[must_use]
pub(crate) fn compute_code(
    key: &KeyMaterial,
    counter: u64,
    mode: HashMode,
    digits: OtpDigits,
) -> String {
    let mac = key.compute_hmac(mode, &counter.to_be_bytes());
    let binary = dynamic_truncation(&mac);

    // modulus is one of 10^6..10^8, never zero.
    #[allow(clippy::arithmetic_side_effects)]
    let code = binary % digits.modulus();
    let width = usize::from(digits.value());
    format!("{code:0>width$}")
}

// ── Tests ───────────────────────────────────────────────────────────
