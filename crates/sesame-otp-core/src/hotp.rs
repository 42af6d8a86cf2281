//! RFC 4226 HMAC-based one-time passwords (counter-driven).

use crate::error::OtpError;
use crate::memory::KeyMaterial;
use crate::otp::{compute_code, constant_time_eq, HashMode, OtpDigits};
use crate::window::VerificationWindow;

/// Counter-driven OTP generator.
///
/// The caller supplies the counter explicitly and is expected to keep it
/// monotonically increasing per secret.
#[derive(Debug)]
pub struct Hotp {
    key: KeyMaterial,
    mode: HashMode,
    digits: OtpDigits,
}

impl Hotp {
    /// Create an HOTP instance producing `digits`-character codes.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::DigitsOutOfRange`] unless `6 <= digits <= 8`.
    /// Empty key material is already unrepresentable by [`KeyMaterial`].
    pub fn new(key: KeyMaterial, mode: HashMode, digits: u8) -> Result<Self, OtpError> {
        Ok(Self {
            key,
            mode,
            digits: OtpDigits::new(digits)?,
        })
    }

    /// Compute the code for a counter value.
    #[must_use]
    pub fn generate(&self, counter: u64) -> String {
        compute_code(&self.key, counter, self.mode, self.digits)
    }

    /// Verify a candidate code against a counter value.
    ///
    /// Uses a fixed-time comparison; the verdict's timing does not depend
    /// on how many characters match.
    #[must_use]
    pub fn verify(&self, candidate: &str, counter: u64) -> bool {
        let expected = self.generate(counter);
        constant_time_eq(expected.as_bytes(), candidate.as_bytes())
    }

    /// Verify a candidate against a window of counters around `counter`,
    /// returning the matched counter if any.
    ///
    /// Candidates are tried in the window's documented order; the first
    /// match wins. Callers use the returned counter to advance their
    /// stored moving factor.
    #[must_use]
    pub fn verify_window(
        &self,
        candidate: &str,
        counter: u64,
        window: VerificationWindow,
    ) -> Option<u64> {
        window
            .candidates(counter)
            .find(|&frame| constant_time_eq(self.generate(frame).as_bytes(), candidate.as_bytes()))
    }
}
