//! Single-use holder for the server-issued challenge secret.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::SessionError;

/// A one-time challenge secret, stored exactly once at issuance.
///
/// `take()` yields the secret exactly once; every later acquisition fails
/// with [`SessionError::ChallengeConsumed`] instead of silently recomputing
/// a valid-looking answer. The secret is zeroed when dropped.
pub struct PendingChallenge {
    secret: Option<Zeroizing<String>>,
}

impl PendingChallenge {
    /// Store a freshly issued challenge secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: Some(Zeroizing::new(secret.to_owned())),
        }
    }

    /// Returns `true` while the secret has not been consumed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.secret.is_some()
    }

    /// Consume the secret. Exactly one call succeeds per issuance.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ChallengeConsumed`] on every call after the
    /// first.
    pub fn take(&mut self) -> Result<Zeroizing<String>, SessionError> {
        self.secret.take().ok_or(SessionError::ChallengeConsumed)
    }
}

impl fmt::Debug for PendingChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.secret.is_some() {
            f.write_str("PendingChallenge(***)")
        } else {
            f.write_str("PendingChallenge(consumed)")
        }
    }
}
