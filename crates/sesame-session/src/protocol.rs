//! Challenge-response session protocol state machine.
//!
//! Per session: `Unestablished → Established → ChallengePending →
//! Answered → Authenticated`, with `Unestablished → Established` directly
//! when the server issues no challenge secret. The transport is injected
//! at construction and owned here, by the protocol layer — never by the
//! windowing/OTP math below it.
//!
//! Challenge state is mutable and owned by exactly one `SessionClient`;
//! all methods take `&mut self`, so concurrent attempts on the same
//! session must be serialized by the caller.

use zeroize::Zeroizing;

use sesame_otp_core::{challenge_answer, OtpError, TimeCorrection};

use crate::challenge::PendingChallenge;
use crate::error::SessionError;
use crate::types::{ClientInfo, RemoteError, SessionEstablished, SessionIdentification};

/// Expected challenge answer length: a SHA-1 digest in hex.
const ANSWER_LEN: usize = 40;

/// Where a session currently stands in the challenge-response flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session, or the previous one was torn down by a hard failure.
    Unestablished,
    /// Session exists; the server issued no challenge.
    Established,
    /// Session exists with an unanswered one-time challenge.
    ChallengePending,
    /// The answer was derived and embedded; awaiting the server verdict.
    Answered,
    /// The server accepted the answer.
    Authenticated,
}

/// Synchronous transport seam to the RPC collaborator.
///
/// Both calls are plain request/response: no retry, no backoff — those
/// belong to the transport implementation, not to this engine.
pub trait SessionTransport {
    /// Establish a session from the client's identity material.
    ///
    /// # Errors
    ///
    /// Returns the server's numeric error surface on rejection.
    fn establish(&mut self, client: &ClientInfo) -> Result<SessionEstablished, RemoteError>;

    /// Perform the next authenticated call, carrying the identification
    /// payload (and, exactly once after issuance, the challenge answer).
    ///
    /// # Errors
    ///
    /// Returns the server's numeric error surface on rejection.
    fn submit(&mut self, identification: &SessionIdentification) -> Result<(), RemoteError>;
}

/// Client-side driver of the session challenge-response protocol.
#[derive(Debug)]
pub struct SessionClient<T: SessionTransport> {
    transport: T,
    client: ClientInfo,
    private_hash: Zeroizing<String>,
    correction: TimeCorrection,
    session_id: Option<String>,
    challenge: Option<PendingChallenge>,
    phase: SessionPhase,
}

impl<T: SessionTransport> SessionClient<T> {
    /// Create a session client from its transport and identity material.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::MalformedPrivateHash`] unless `private_hash` is
    /// a 64-character sha256 hex string — caught here rather than on the
    /// first authenticated request.
    pub fn new(
        transport: T,
        client: ClientInfo,
        private_hash: &str,
        correction: TimeCorrection,
    ) -> Result<Self, SessionError> {
        if private_hash.len() != 64 || !private_hash.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(OtpError::MalformedPrivateHash.into());
        }
        Ok(Self {
            transport,
            client,
            private_hash: Zeroizing::new(private_hash.to_owned()),
            correction,
            session_id: None,
            challenge: None,
            phase: SessionPhase::Unestablished,
        })
    }

    /// Establish a session: send identity material, store the session id,
    /// and capture an issued challenge secret exactly once.
    ///
    /// A non-empty secret moves the session to
    /// [`SessionPhase::ChallengePending`]; otherwise it is plain
    /// [`SessionPhase::Established`]. Re-establishing replaces any prior
    /// session state wholesale.
    ///
    /// # Errors
    ///
    /// Remote rejections are mapped through the recognized error-code
    /// subset; anything else surfaces as [`SessionError::Remote`].
    pub fn establish(&mut self) -> Result<SessionPhase, SessionError> {
        let established = self
            .transport
            .establish(&self.client)
            .map_err(SessionError::from)?;
        self.challenge = established.issued_challenge().map(PendingChallenge::new);
        self.session_id = Some(established.id);
        self.phase = if self.challenge.is_some() {
            SessionPhase::ChallengePending
        } else {
            SessionPhase::Established
        };
        Ok(self.phase)
    }

    /// Derive the answer to the pending challenge, consuming the one-time
    /// secret.
    ///
    /// The answer is validated client-side (40 lowercase hex characters)
    /// before it is allowed anywhere near a request. A second call for the
    /// same issuance fails with [`SessionError::ChallengeConsumed`] rather
    /// than recomputing a valid-looking answer.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotEstablished`] without a session,
    /// [`SessionError::NoChallengePending`] when none was issued, and the
    /// derivation's own [`OtpError`] failures otherwise.
    pub fn answer_challenge(&mut self) -> Result<String, SessionError> {
        if self.session_id.is_none() {
            return Err(SessionError::NotEstablished);
        }
        let pending = self
            .challenge
            .as_mut()
            .ok_or(SessionError::NoChallengePending)?;
        let secret = pending.take()?;
        let answer = challenge_answer(&secret, &self.private_hash, self.correction)?;
        validate_answer(&answer)?;
        self.phase = SessionPhase::Answered;
        Ok(answer)
    }

    /// Build the identification payload for the next authenticated request.
    ///
    /// While a challenge is pending this embeds the freshly derived answer
    /// and discards the local secret in the same motion; afterwards the
    /// payload carries only the session id and public hash.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotEstablished`] without a session; otherwise the
    /// failure modes of [`Self::answer_challenge`].
    pub fn identification(&mut self) -> Result<SessionIdentification, SessionError> {
        let session_id = self
            .session_id
            .clone()
            .ok_or(SessionError::NotEstablished)?;
        let challenge_answer = if self.phase == SessionPhase::ChallengePending {
            Some(self.answer_challenge()?)
        } else {
            None
        };
        Ok(SessionIdentification {
            session_id,
            client_public_hash: self.client.public_hash.clone(),
            challenge_answer,
        })
    }

    /// Submit the next authenticated request and apply the server verdict.
    ///
    /// Success moves the session to [`SessionPhase::Authenticated`]. A
    /// rejected answer or a lost session is a hard failure: local state is
    /// torn down and the session must be re-established.
    ///
    /// # Errors
    ///
    /// The mapped remote failure, or any local failure from building the
    /// identification payload.
    pub fn authenticate(&mut self) -> Result<(), SessionError> {
        let identification = self.identification()?;
        match self.transport.submit(&identification) {
            Ok(()) => {
                self.challenge = None;
                self.phase = SessionPhase::Authenticated;
                Ok(())
            }
            Err(remote) => {
                let error = SessionError::from(remote);
                if matches!(
                    error,
                    SessionError::BadChallengeAnswer
                        | SessionError::SessionNotFound
                        | SessionError::SessionExpired
                ) {
                    self.reset();
                }
                Err(error)
            }
        }
    }

    /// Current phase of the session state machine.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The established session id, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Borrow the injected transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Tear down local session state after a hard failure.
    fn reset(&mut self) {
        self.session_id = None;
        self.challenge = None;
        self.phase = SessionPhase::Unestablished;
    }
}

/// Client-side answer validation: 40 lowercase hex characters.
fn validate_answer(answer: &str) -> Result<(), SessionError> {
    if answer.len() != ANSWER_LEN {
        return Err(SessionError::MalformedAnswer(format!(
            "expected {ANSWER_LEN} characters, got {}",
            answer.len()
        )));
    }
    if !answer
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Err(SessionError::MalformedAnswer(
            "expected lowercase hex".to_owned(),
        ));
    }
    Ok(())
}
