//! `sesame-session` — session challenge-response authentication for Sesame.
//!
//! Drives the protocol in which a server-issued one-time challenge secret
//! must be answered exactly once with a value derived from a TOTP code and
//! the client's private credential. OTP math lives in `sesame-otp-core`;
//! wire framing, HTTP, and retries live in the transport implementation
//! injected through [`SessionTransport`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod challenge;
pub mod error;
pub mod protocol;
pub mod types;

pub use challenge::PendingChallenge;
pub use error::SessionError;
pub use protocol::{SessionClient, SessionPhase, SessionTransport};
pub use types::{ClientInfo, RemoteError, SessionEstablished, SessionIdentification};
