//! Key generation and the session challenge-answer derivation.

use data_encoding::HEXLOWER;
use ring::digest;
use zeroize::Zeroize;

use crate::error::OtpError;
use crate::memory::KeyMaterial;
use crate::otp::HashMode;
use crate::time_correction::TimeCorrection;
use crate::totp::{Totp, DEFAULT_STEP_SECONDS};

/// Generate a random key of the RFC-recommended length for `mode`
/// (20/32/64 bytes for SHA1/SHA256/SHA512).
///
/// # Errors
///
/// Returns [`OtpError::SecureMemory`] if the CSPRNG fails.
pub fn random_key(mode: HashMode) -> Result<KeyMaterial, OtpError> {
    KeyMaterial::random(mode.recommended_key_len())
}

/// Generate a random key of an explicit length.
///
/// # Errors
///
/// Returns [`OtpError::EmptySecret`] for a zero length, or
/// [`OtpError::SecureMemory`] if the CSPRNG fails.
pub fn random_key_len(len: usize) -> Result<KeyMaterial, OtpError> {
    KeyMaterial::random(len)
}

/// Derive a device-specific key from a master key (RFC 4226 §7.5).
///
/// The derived key is the HMAC of the device's public identifier under
/// the master key; its length follows the hash mode.
///
/// # Errors
///
/// Returns [`OtpError::EmptySecret`] only if the HMAC output were empty,
/// which no supported mode produces.
pub fn derive_key_from_master(
    master: &KeyMaterial,
    public_identifier: &[u8],
    mode: HashMode,
) -> Result<KeyMaterial, OtpError> {
    let mut derived = master.compute_hmac(mode, public_identifier);
    let key = KeyMaterial::new(&derived);
    derived.zeroize();
    key
}

/// Derive the answer to a server-issued session challenge at the corrected
/// current time.
///
/// The canonical construction: base32-decode the one-time challenge
/// secret, compute a 6-digit SHA1 TOTP over a 30-second step, then hash
/// `code ‖ private_hash` with SHA-1 and render lowercase hex. The result
/// is deterministic, one-way, and depends on both the server's one-time
/// secret and the client's private credential.
///
/// # Errors
///
/// Returns [`OtpError::MalformedPrivateHash`] unless `client_private_hash`
/// is 64 hex characters (a sha256 hex digest), or
/// [`OtpError::InvalidBase32`]/[`OtpError::EmptySecret`] for an unusable
/// challenge secret.
pub fn challenge_answer(
    challenge_secret: &str,
    client_private_hash: &str,
    correction: TimeCorrection,
) -> Result<String, OtpError> {
    challenge_answer_at(challenge_secret, client_private_hash, correction.corrected_now())
}

/// Derive the challenge answer for a specific (already corrected) unix
/// timestamp.
///
/// # Errors
///
/// Same failure modes as [`challenge_answer`].
pub fn challenge_answer_at(
    challenge_secret: &str,
    client_private_hash: &str,
    unix_secs: u64,
) -> Result<String, OtpError> {
    if client_private_hash.len() != 64
        || !client_private_hash.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return Err(OtpError::MalformedPrivateHash);
    }

    let key = KeyMaterial::from_base32(challenge_secret)?;
    let totp = Totp::new(
        key,
        DEFAULT_STEP_SECONDS,
        HashMode::Sha1,
        6,
        TimeCorrection::NONE,
    )?;
    let code = totp.generate_at(unix_secs);

    let mut preimage = Vec::with_capacity(code.len().saturating_add(client_private_hash.len()));
    preimage.extend_from_slice(code.as_bytes());
    preimage.extend_from_slice(client_private_hash.as_bytes());
    let hash = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &preimage);
    preimage.zeroize();

    Ok(HEXLOWER.encode(hash.as_ref()))
}
