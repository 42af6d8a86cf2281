//! Session error types for `sesame-session`.

use thiserror::Error;

use sesame_otp_core::OtpError;

use crate::types::RemoteError;

/// Remote error codes this engine recognizes to drive its own state
/// transitions. All other codes pass through opaque.
pub mod codes {
    /// The submitted two-factor code was wrong.
    pub const INCORRECT_TWO_FACTOR_CODE: u16 = 8705;
    /// The session id is unknown to the server.
    pub const SESSION_NOT_FOUND: u16 = 8707;
    /// Authentication failed for an unspecified reason.
    pub const AUTHENTICATION_FAILURE: u16 = 8710;
    /// The session challenge answer was rejected.
    pub const BAD_SESSION_CHALLENGE_ANSWER: u16 = 8711;
    /// The session has expired.
    pub const SESSION_EXPIRED: u16 = 8714;
}

/// Errors produced by the session protocol layer.
///
/// Local errors (`NotEstablished`, `ChallengeConsumed`, `MalformedAnswer`)
/// are caught before any network interaction. Remote errors are terminal
/// for the current attempt — each represents either an
/// attacker-indistinguishable failure or session loss requiring
/// re-establishment, so the engine never retries them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// OTP engine failure (delegated from the core).
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// An operation that requires a session was called without one.
    #[error("no session established")]
    NotEstablished,

    /// The one-time challenge secret was already consumed; a second
    /// answer cannot be derived from the same issuance.
    #[error("challenge secret already consumed")]
    ChallengeConsumed,

    /// An answer was requested but the server never issued a challenge
    /// for this session.
    #[error("no challenge pending for this session")]
    NoChallengePending,

    /// The computed answer failed client-side validation (length or
    /// charset), caught before wasting a round trip.
    #[error("malformed challenge answer: {0}")]
    MalformedAnswer(String),

    /// The server rejected the session challenge answer.
    #[error("server rejected the session challenge answer")]
    BadChallengeAnswer,

    /// The session id is unknown to the server.
    #[error("session not found on the server")]
    SessionNotFound,

    /// The session has expired on the server.
    #[error("session expired")]
    SessionExpired,

    /// The submitted two-factor authentication code was incorrect.
    #[error("incorrect two-factor authentication code")]
    IncorrectTwoFactorCode,

    /// Authentication failed for an unspecified reason.
    #[error("authentication failure")]
    AuthenticationFailure,

    /// Any remote error outside the recognized subset, passed through
    /// unchanged.
    #[error("server error {code}: {message}")]
    Remote {
        /// Numeric error code from the server.
        code: u16,
        /// Server-provided message.
        message: String,
    },
}

impl From<RemoteError> for SessionError {
    fn from(remote: RemoteError) -> Self {
        match remote.code {
            codes::INCORRECT_TWO_FACTOR_CODE => Self::IncorrectTwoFactorCode,
            codes::SESSION_NOT_FOUND => Self::SessionNotFound,
            codes::AUTHENTICATION_FAILURE => Self::AuthenticationFailure,
            codes::BAD_SESSION_CHALLENGE_ANSWER => Self::BadChallengeAnswer,
            codes::SESSION_EXPIRED => Self::SessionExpired,
            code => Self::Remote {
                code,
                message: remote.message,
            },
        }
    }
}
