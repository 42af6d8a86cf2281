//! Wire-facing session payloads.
//!
//! These are the only shapes this engine exchanges with the RPC
//! collaborator: it consumes `SessionEstablished` and `RemoteError`, and
//! produces `SessionIdentification`. Envelope framing, transport, and
//! retries all live outside.

use serde::{Deserialize, Serialize};

/// Session-establishment response returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEstablished {
    /// The server-assigned session id.
    pub id: String,
    /// One-time challenge secret. Absent or empty means no challenge is
    /// pending for this session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

impl SessionEstablished {
    /// Returns the challenge secret if one was actually issued
    /// (present and non-blank).
    #[must_use]
    pub fn issued_challenge(&self) -> Option<&str> {
        self.challenge
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
    }
}

/// Identification payload embedded in every authenticated request.
///
/// `challenge_answer` is present only on the first authenticated request
/// following a challenge issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentification {
    /// The session id obtained when establishing the session.
    pub session_id: String,
    /// The public hash of the client that established the session.
    pub client_public_hash: String,
    /// Answer to the session challenge, derived from the client's private
    /// hash and the server's one-time secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_answer: Option<String>,
}

/// Client identity material sent when establishing a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// The client's public identity hash (sha256 hex).
    pub public_hash: String,
    /// Platform name.
    pub platform: String,
    /// Client name.
    pub name: String,
    /// Client version.
    pub version: String,
}

/// Error surface consumed from the RPC collaborator: a numeric code plus
/// message, already classified by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Numeric error code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}
