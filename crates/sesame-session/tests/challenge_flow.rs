#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! End-to-end challenge flow against a fake transport.
//!
//! The fake server issues a base32 challenge secret on establish and
//! verifies submitted answers the same way a real server would: by
//! deriving the expected answer from the secret and the client's private
//! hash, with one step of slack on either side so a test never flakes on
//! a 30-second boundary.

use sesame_otp_core::{base32, challenge_answer_at, unix_now, TimeCorrection};
use sesame_session::{
    ClientInfo, RemoteError, SessionClient, SessionEstablished, SessionIdentification,
    SessionError, SessionPhase, SessionTransport,
};

const PRIVATE_HASH: &str = "a665a45920422f9d417e4867efdc4fb8a04a1f3fff1fa07e998e86f7f7a27ae3";
const PUBLIC_HASH: &str = "2413fb3709b05939f04cf2e92f7d0897fc2596f9ad0b8a9ea855c7bfebaae892";

fn client_info() -> ClientInfo {
    ClientInfo {
        public_hash: PUBLIC_HASH.to_owned(),
        platform: "linux".to_owned(),
        name: "sesame-tests".to_owned(),
        version: "0.1.0".to_owned(),
    }
}

/// Fake server: issues an optional challenge on establish and judges
/// submitted answers.
#[derive(Debug)]
struct FakeServer {
    challenge_secret: Option<String>,
    establish_calls: usize,
    submissions: Vec<SessionIdentification>,
}

impl FakeServer {
    fn with_challenge(secret_bytes: &[u8]) -> Self {
        Self {
            challenge_secret: Some(base32::encode(secret_bytes)),
            establish_calls: 0,
            submissions: Vec::new(),
        }
    }

    fn without_challenge() -> Self {
        Self {
            challenge_secret: None,
            establish_calls: 0,
            submissions: Vec::new(),
        }
    }

    fn expected_answers(&self) -> Vec<String> {
        let secret = self.challenge_secret.as_deref().expect("challenge issued");
        let now = unix_now();
        [now.saturating_sub(30), now, now.saturating_add(30)]
            .iter()
            .map(|&t| challenge_answer_at(secret, PRIVATE_HASH, t).expect("derivable"))
            .collect()
    }
}

impl SessionTransport for &mut FakeServer {
    fn establish(&mut self, _client: &ClientInfo) -> Result<SessionEstablished, RemoteError> {
        self.establish_calls += 1;
        Ok(SessionEstablished {
            id: format!("session-{}", self.establish_calls),
            challenge: self.challenge_secret.clone(),
        })
    }

    fn submit(&mut self, identification: &SessionIdentification) -> Result<(), RemoteError> {
        self.submissions.push(identification.clone());
        if self.challenge_secret.is_none() {
            return Ok(());
        }
        let answer = identification.challenge_answer.as_deref().ok_or(RemoteError {
            code: 8711,
            message: "missing challenge answer".to_owned(),
        })?;
        if self.expected_answers().iter().any(|e| e == answer) {
            Ok(())
        } else {
            Err(RemoteError {
                code: 8711,
                message: "bad challenge answer".to_owned(),
            })
        }
    }
}

/// A transport that always fails submission with a fixed remote code.
struct RejectingServer {
    code: u16,
    challenge: Option<String>,
}

impl SessionTransport for RejectingServer {
    fn establish(&mut self, _client: &ClientInfo) -> Result<SessionEstablished, RemoteError> {
        Ok(SessionEstablished {
            id: "session-1".to_owned(),
            challenge: self.challenge.clone(),
        })
    }

    fn submit(&mut self, _identification: &SessionIdentification) -> Result<(), RemoteError> {
        Err(RemoteError {
            code: self.code,
            message: "rejected".to_owned(),
        })
    }
}

#[test]
fn establish_with_challenge_enters_challenge_pending() {
    let mut server = FakeServer::with_challenge(b"12345678901234567890");
    let mut client =
        SessionClient::new(&mut server, client_info(), PRIVATE_HASH, TimeCorrection::NONE)
            .expect("client");

    let phase = client.establish().expect("establish");
    assert_eq!(phase, SessionPhase::ChallengePending);
    assert_eq!(client.session_id(), Some("session-1"));
}

#[test]
fn establish_without_challenge_is_plain_established() {
    let mut server = FakeServer::without_challenge();
    let mut client =
        SessionClient::new(&mut server, client_info(), PRIVATE_HASH, TimeCorrection::NONE)
            .expect("client");

    assert_eq!(client.establish().expect("establish"), SessionPhase::Established);
    let ident = client.identification().expect("identification");
    assert_eq!(ident.challenge_answer, None);
}

#[test]
fn correct_answer_authenticates_the_session() {
    let mut server = FakeServer::with_challenge(b"12345678901234567890");
    let mut client =
        SessionClient::new(&mut server, client_info(), PRIVATE_HASH, TimeCorrection::NONE)
            .expect("client");

    client.establish().expect("establish");
    client.authenticate().expect("authenticate");
    assert_eq!(client.phase(), SessionPhase::Authenticated);

    let first = &server.submissions[0];
    let answer = first.challenge_answer.as_deref().expect("answer embedded");
    assert_eq!(answer.len(), 40, "sha1 hex answer");
    assert_eq!(first.session_id, "session-1");
    assert_eq!(first.client_public_hash, PUBLIC_HASH);
}

#[test]
fn later_requests_carry_no_answer() {
    let mut server = FakeServer::with_challenge(b"12345678901234567890");
    let mut client =
        SessionClient::new(&mut server, client_info(), PRIVATE_HASH, TimeCorrection::NONE)
            .expect("client");

    client.establish().expect("establish");
    client.authenticate().expect("authenticate");
    let ident = client.identification().expect("identification");
    assert_eq!(ident.challenge_answer, None, "answer is single-use");
}

#[test]
fn wrong_answer_is_a_hard_failure_and_consumes_the_secret() {
    let mut client = SessionClient::new(
        RejectingServer {
            code: 8711,
            challenge: Some(base32::encode(b"12345678901234567890")),
        },
        client_info(),
        PRIVATE_HASH,
        TimeCorrection::NONE,
    )
    .expect("client");

    client.establish().expect("establish");
    let err = client.authenticate().unwrap_err();
    assert_eq!(err, SessionError::BadChallengeAnswer);

    // Hard failure: state torn down, the consumed secret cannot be reused.
    assert_eq!(client.phase(), SessionPhase::Unestablished);
    assert_eq!(client.session_id(), None);
    assert_eq!(client.answer_challenge().unwrap_err(), SessionError::NotEstablished);
}

#[test]
fn second_answer_from_same_issuance_fails_deterministically() {
    let mut server = FakeServer::with_challenge(b"12345678901234567890");
    let mut client =
        SessionClient::new(&mut server, client_info(), PRIVATE_HASH, TimeCorrection::NONE)
            .expect("client");

    client.establish().expect("establish");
    let first = client.answer_challenge().expect("first answer");
    assert_eq!(first.len(), 40);
    assert_eq!(
        client.answer_challenge().unwrap_err(),
        SessionError::ChallengeConsumed
    );
}

#[test]
fn expired_session_resets_state() {
    let mut client = SessionClient::new(
        RejectingServer {
            code: 8714,
            challenge: None,
        },
        client_info(),
        PRIVATE_HASH,
        TimeCorrection::NONE,
    )
    .expect("client");

    client.establish().expect("establish");
    assert_eq!(client.authenticate().unwrap_err(), SessionError::SessionExpired);
    assert_eq!(client.phase(), SessionPhase::Unestablished);
}

#[test]
fn unrecognized_remote_codes_pass_through_and_keep_the_session() {
    let mut client = SessionClient::new(
        RejectingServer {
            code: 16_384,
            challenge: None,
        },
        client_info(),
        PRIVATE_HASH,
        TimeCorrection::NONE,
    )
    .expect("client");

    client.establish().expect("establish");
    let err = client.authenticate().unwrap_err();
    assert_eq!(
        err,
        SessionError::Remote {
            code: 16_384,
            message: "rejected".to_owned()
        }
    );
    assert_eq!(client.session_id(), Some("session-1"), "session survives opaque errors");
}

#[test]
fn identification_before_establish_is_rejected() {
    let mut server = FakeServer::without_challenge();
    let mut client =
        SessionClient::new(&mut server, client_info(), PRIVATE_HASH, TimeCorrection::NONE)
            .expect("client");

    assert_eq!(
        client.identification().unwrap_err(),
        SessionError::NotEstablished
    );
}

#[test]
fn malformed_private_hash_is_rejected_at_construction() {
    let mut server = FakeServer::without_challenge();
    let err = SessionClient::new(&mut server, client_info(), "short", TimeCorrection::NONE)
        .unwrap_err();
    assert!(matches!(err, SessionError::Otp(_)));
}

#[test]
fn reestablishing_issues_a_fresh_challenge() {
    let mut server = FakeServer::with_challenge(b"12345678901234567890");
    let mut client =
        SessionClient::new(&mut server, client_info(), PRIVATE_HASH, TimeCorrection::NONE)
            .expect("client");

    client.establish().expect("first establish");
    let _ = client.answer_challenge().expect("consume first secret");

    let phase = client.establish().expect("second establish");
    assert_eq!(phase, SessionPhase::ChallengePending);
    assert_eq!(client.session_id(), Some("session-2"));
    let answer = client.answer_challenge().expect("fresh secret is answerable");
    assert_eq!(answer.len(), 40);
}
