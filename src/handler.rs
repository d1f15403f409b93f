//! Challenge-handling facade: Basic and Digest responses, preemptive
//! (pipelined) re-authorization and `Authentication-Info` nonce rotation.

use crate::challenge::ChallengeParams;
use crate::compute::{compute_digest, make_cnonce, userhash_requested, Credentials};
use crate::enums::{Algorithm, Qop};
use crate::header::DigestAuthorization;
use crate::nonce::NonceCounter;
use crate::{Error, Result};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use parking_lot::Mutex;
use tracing::debug;

/// Authentication scheme last used for a successful challenge response.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AuthScheme {
    Basic,
    Digest,
}

/// Snapshot of the last successfully handled challenge, read by preemptive
/// re-authorization. Updated last-write-wins under concurrency; the handler
/// makes no stronger ordering promise.
#[derive(Debug, Default, Clone)]
struct PipeliningState {
    scheme: Option<AuthScheme>,
    challenge: Option<ChallengeParams>,
}

/// Per-credential authentication-challenge handler.
///
/// One instance is scoped to a credential pair and typically to one logical
/// connection/session; it may be shared across threads issuing concurrent
/// requests.
#[derive(Debug)]
pub struct ChallengeHandler {
    credentials: Credentials,
    nonce_counter: NonceCounter,
    pipelining: Mutex<PipeliningState>,
}

impl ChallengeHandler {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            nonce_counter: NonceCounter::new(),
            pipelining: Mutex::new(PipeliningState::default()),
        }
    }

    /// Respond to a Basic challenge. Always succeeds and arms preemptive
    /// authorization with the Basic scheme.
    pub fn handle_basic(&self) -> String {
        let token = BASE64.encode(format!(
            "{}:{}",
            self.credentials.username, self.credentials.password
        ));

        let mut state = self.pipelining.lock();
        state.scheme = Some(AuthScheme::Basic);
        state.challenge = None;

        format!("Basic {}", token)
    }

    /// Respond to a set of Digest challenges for one request.
    ///
    /// Challenges missing `algorithm` get the RFC 7616 default `MD5` written
    /// back into their map. `Ok(None)` means no advertised algorithm was
    /// usable; pipelining state is left untouched in that case. A challenge
    /// selected for use but missing `realm` or `nonce` is an error.
    pub fn handle_digest<F>(
        &self,
        method: &str,
        uri: &str,
        mut challenges: Vec<ChallengeParams>,
        body: F,
    ) -> Result<Option<String>>
    where
        F: FnOnce() -> Vec<u8>,
    {
        for challenge in &mut challenges {
            challenge
                .entry("algorithm".to_string())
                .or_insert_with(|| "MD5".to_string());
        }

        let (algorithm, challenge) = match Self::select_algorithm(&challenges) {
            Some(selected) => selected,
            None => {
                debug!("no usable digest algorithm among {} challenge(s)", challenges.len());
                return Ok(None);
            }
        };
        debug!(algorithm = %algorithm, "responding to digest challenge");

        let header = self.respond(method, uri, challenge, algorithm, body, None)?;

        let mut state = self.pipelining.lock();
        state.scheme = Some(AuthScheme::Digest);
        state.challenge = Some(challenge.clone());

        Ok(Some(header))
    }

    /// Recompute an `Authorization` header from previously observed state,
    /// without a fresh server round trip. Digest reuses the stored challenge
    /// with a fresh cnonce/nc; Basic is re-issued as-is. `Ok(None)` when no
    /// challenge has been handled yet.
    pub fn attempt_preemptive_authorization<F>(
        &self,
        method: &str,
        uri: &str,
        body: F,
    ) -> Result<Option<String>>
    where
        F: FnOnce() -> Vec<u8>,
    {
        let snapshot = self.pipelining.lock().clone();
        match snapshot.scheme {
            Some(AuthScheme::Basic) => Ok(Some(self.handle_basic())),
            Some(AuthScheme::Digest) => match snapshot.challenge {
                Some(challenge) => {
                    // written back on handle_digest, so always parseable
                    let algorithm: Algorithm = challenge
                        .get("algorithm")
                        .and_then(|token| token.parse().ok())
                        .unwrap_or_default();
                    self.respond(method, uri, &challenge, algorithm, body, None)
                        .map(Some)
                }
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    /// Consume an `Authentication-Info` / `Proxy-Authentication-Info` map.
    /// A `nextnonce` field rotates the nonce of the stored challenge so
    /// subsequent pipelined requests sign with it.
    pub fn consume_authentication_info(&self, info: &ChallengeParams) {
        if let Some(next_nonce) = info.get("nextnonce") {
            let mut state = self.pipelining.lock();
            if let Some(challenge) = state.challenge.as_mut() {
                debug!("rotating server nonce from Authentication-Info");
                challenge.insert("nonce".to_string(), next_nonce.clone());
            }
        }
    }

    /// Pick the most preferred algorithm advertised by any challenge in the
    /// set. Unknown algorithm tokens never match a preference entry and are
    /// skipped.
    fn select_algorithm(
        challenges: &[ChallengeParams],
    ) -> Option<(Algorithm, &ChallengeParams)> {
        Algorithm::PREFERENCE.iter().find_map(|preferred| {
            challenges
                .iter()
                .find(|challenge| {
                    challenge
                        .get("algorithm")
                        .and_then(|token| token.parse::<Algorithm>().ok())
                        == Some(*preferred)
                })
                .map(|challenge| (*preferred, challenge))
        })
    }

    fn respond<F>(
        &self,
        method: &str,
        uri: &str,
        challenge: &ChallengeParams,
        algorithm: Algorithm,
        body: F,
        cnonce_override: Option<&str>,
    ) -> Result<String>
    where
        F: FnOnce() -> Vec<u8>,
    {
        let realm = challenge
            .get("realm")
            .ok_or(Error::MissingRequired("realm"))?;
        let nonce = challenge
            .get("nonce")
            .ok_or(Error::MissingRequired("nonce"))?;

        let qop = Qop::resolve(challenge.get("qop").map(String::as_str));

        // cnonce whenever qop is known or the algorithm is a -sess variant;
        // nc only when qop is known
        let cnonce = if qop.is_some() || algorithm.sess {
            Some(match cnonce_override {
                Some(cnonce) => cnonce.to_owned(),
                None => make_cnonce(),
            })
        } else {
            None
        };
        let nc = qop.map(|_| self.nonce_counter.next_count(nonce));

        let parts = compute_digest(
            &self.credentials,
            method,
            uri,
            challenge,
            algorithm,
            qop,
            body,
            nc,
            cnonce.as_deref(),
        )?;

        Ok(DigestAuthorization {
            username: &parts.username,
            realm,
            nonce,
            uri,
            response: &parts.response,
            algorithm,
            cnonce: cnonce.as_deref(),
            opaque: challenge
                .get("opaque")
                .map(String::as_str)
                .filter(|v| !v.is_empty()),
            qop,
            nc: nc.unwrap_or_default(),
            userhash: userhash_requested(challenge),
        }
        .to_header_string())
    }
}
