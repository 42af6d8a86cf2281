//! RFC 6238 time-based one-time passwords.
//!
//! A TOTP is an HOTP whose counter is derived from corrected wall-clock
//! time: `floor(corrected_unix_seconds / step)`. Verification walks the
//! ordered candidates of a [`VerificationWindow`] and reports the absolute
//! step that matched — replay protection (refusing a step twice) belongs
//! to the caller, who is the only party with persistent state.

use crate::error::OtpError;
use crate::memory::KeyMaterial;
use crate::otp::{compute_code, constant_time_eq, HashMode, OtpDigits};
use crate::time_correction::{unix_now, TimeCorrection};
use crate::window::VerificationWindow;

/// Default time step in seconds (RFC 6238 §4).
pub const DEFAULT_STEP_SECONDS: u64 = 30;

/// Time-driven OTP generator.
#[derive(Debug)]
pub struct Totp {
    key: KeyMaterial,
    step_seconds: u64,
    mode: HashMode,
    digits: OtpDigits,
    correction: TimeCorrection,
}

impl Totp {
    /// Create a TOTP instance.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::ZeroStep`] if `step_seconds` is zero, or
    /// [`OtpError::DigitsOutOfRange`] unless `6 <= digits <= 8`. Empty key
    /// material is already unrepresentable by [`KeyMaterial`].
    pub fn new(
        key: KeyMaterial,
        step_seconds: u64,
        mode: HashMode,
        digits: u8,
        correction: TimeCorrection,
    ) -> Result<Self, OtpError> {
        if step_seconds == 0 {
            return Err(OtpError::ZeroStep);
        }
        Ok(Self {
            key,
            step_seconds,
            mode,
            digits: OtpDigits::new(digits)?,
            correction,
        })
    }

    /// Compute the code for the corrected current time.
    #[must_use]
    pub fn generate(&self) -> String {
        self.generate_at(unix_now())
    }

    /// Compute the code for a specific unix timestamp (the correction is
    /// applied first).
    #[must_use]
    pub fn generate_at(&self, unix_secs: u64) -> String {
        compute_code(&self.key, self.step_for(unix_secs), self.mode, self.digits)
    }

    /// Verify a candidate code against the corrected current time.
    ///
    /// Returns the absolute time step that matched, if any. Candidates are
    /// tried in the window's order (exact step, then past, then future) and
    /// compared in constant time.
    #[must_use]
    pub fn verify(&self, candidate: &str, window: VerificationWindow) -> Option<u64> {
        self.verify_at(candidate, unix_now(), window)
    }

    /// Verify a candidate code against a specific unix timestamp.
    #[must_use]
    pub fn verify_at(
        &self,
        candidate: &str,
        unix_secs: u64,
        window: VerificationWindow,
    ) -> Option<u64> {
        let initial_step = self.step_for(unix_secs);
        window.candidates(initial_step).find(|&step| {
            let expected = compute_code(&self.key, step, self.mode, self.digits);
            constant_time_eq(expected.as_bytes(), candidate.as_bytes())
        })
    }

    /// Seconds remaining in the current step at the corrected current time.
    #[must_use]
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds_at(unix_now())
    }

    /// Seconds remaining in the step containing `unix_secs`.
    #[must_use]
    pub fn remaining_seconds_at(&self, unix_secs: u64) -> u64 {
        let corrected = self.correction.apply(unix_secs);
        // step_seconds is validated non-zero at construction.
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = corrected % self.step_seconds;
        #[allow(clippy::arithmetic_side_effects)]
        let remaining = self.step_seconds - elapsed;
        remaining
    }

    /// The configured time step in seconds.
    #[must_use]
    pub const fn step_seconds(&self) -> u64 {
        self.step_seconds
    }

    /// Derive the time-step counter for a timestamp.
    fn step_for(&self, unix_secs: u64) -> u64 {
        let corrected = self.correction.apply(unix_secs);
        // step_seconds is validated non-zero at construction.
        #[allow(clippy::arithmetic_side_effects)]
        let step = corrected / self.step_seconds;
        step
    }
}
