//! `sesame-otp-core` — RFC 4226/6238 one-time-password primitives for Sesame.
//!
//! This crate is the audit target: zero network, zero async. All
//! computation is synchronous and CPU-bound; the only I/O anywhere near it
//! is performed by the session layer's transport, which lives in
//! `sesame-session`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod base32;
pub mod otp;

pub mod hotp;
pub mod totp;

pub mod time_correction;
pub mod window;

pub mod keygen;

pub use error::OtpError;
pub use hotp::Hotp;
pub use keygen::{
    challenge_answer, challenge_answer_at, derive_key_from_master, random_key, random_key_len,
};
pub use memory::{KeyMaterial, LockedRegion};
pub use otp::{HashMode, OtpDigits};
pub use time_correction::{unix_now, TimeCorrection};
pub use totp::{Totp, DEFAULT_STEP_SECONDS};
pub use window::VerificationWindow;
