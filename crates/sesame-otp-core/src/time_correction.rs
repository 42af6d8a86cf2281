//! Clock-offset correction for out-of-sync local clocks.
//!
//! Where possible, fixing the system clock is preferable. This type covers
//! deployments where neither the client nor the server clock can be
//! touched: capture the known-correct time once and apply the resulting
//! offset to every subsequent computation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Immutable clock-offset holder.
///
/// The stored factor is `reference − correct` in seconds; applying the
/// correction subtracts it from a local timestamp. Immutable, `Copy`, and
/// therefore safe to share across threads without synchronization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeCorrection {
    /// Seconds the local clock runs ahead of the correct clock
    /// (negative when it runs behind).
    offset_seconds: i64,
}

impl TimeCorrection {
    /// The zero-offset instance.
    pub const NONE: Self = Self { offset_seconds: 0 };

    /// Build a correction from the known-correct current unix time,
    /// using the local system clock as the reference.
    #[must_use]
    pub fn from_correct_time(correct_unix: u64) -> Self {
        Self::from_reference(correct_unix, unix_now())
    }

    /// Build a correction from an explicit (correct, reference) pair of
    /// unix timestamps.
    #[must_use]
    pub fn from_reference(correct_unix: u64, reference_unix: u64) -> Self {
        // i64 unix seconds cover years far beyond any OTP deployment.
        let correct = i64::try_from(correct_unix).unwrap_or(i64::MAX);
        let reference = i64::try_from(reference_unix).unwrap_or(i64::MAX);
        Self {
            offset_seconds: reference.saturating_sub(correct),
        }
    }

    /// Apply the correction factor to a unix timestamp.
    ///
    /// Saturates at zero rather than wrapping for offsets larger than the
    /// timestamp itself.
    #[must_use]
    pub fn apply(&self, unix_secs: u64) -> u64 {
        let ts = i64::try_from(unix_secs).unwrap_or(i64::MAX);
        let corrected = ts.saturating_sub(self.offset_seconds);
        u64::try_from(corrected).unwrap_or(0)
    }

    /// The corrected current unix time.
    #[must_use]
    pub fn corrected_now(&self) -> u64 {
        self.apply(unix_now())
    }

    /// The raw correction factor in seconds (`reference − correct`).
    #[must_use]
    pub const fn offset_seconds(&self) -> i64 {
        self.offset_seconds
    }
}

impl Default for TimeCorrection {
    fn default() -> Self {
        Self::NONE
    }
}

/// Current unix time in whole seconds.
///
/// A system clock before the epoch maps to zero rather than panicking.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
