//! HTTP authentication-challenge handling for clients: the Basic scheme and
//! the full Digest scheme as specified by IETF RFCs 2069, 2617, and 7616,
//! including multi-algorithm negotiation, nonce/cnonce bookkeeping,
//! qop-dependent hash chains, preemptive (pipelined) re-authorization and
//! server-driven nonce rotation via `Authentication-Info`.
//!
//! The crate computes header *values*; pairing them with the right header
//! name (`Authorization` vs `Proxy-Authorization`) and driving the retry loop
//! is left to the HTTP transport.
//!
//! # Examples
//!
//! ```
//! use challenge_auth::{ChallengeHandler, Credentials};
//!
//! // Value from the WWW-Authenticate HTTP header (usually in a HTTP 401 response).
//! // This one is the RFC 2069 style without qop, so the response is deterministic.
//! let www_authenticate = r#"Digest realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;
//!
//! let handler = ChallengeHandler::new(Credentials::new("Mufasa", "CircleOfLife"));
//!
//! let challenges = challenge_auth::parse_challenges(www_authenticate);
//! let answer = handler
//!     .handle_digest("GET", "/dir/index.html", challenges, || Vec::new())
//!     .unwrap()
//!     .expect("a usable algorithm");
//!
//! assert_eq!(
//!     answer,
//!     r#"Digest username="Mufasa", realm="testrealm@host.com", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", response="1949323746fe6a43ef61f9606e7febea", algorithm=MD5, opaque="5ccc069c403ebaf9f0171e9517f40e41""#
//! );
//!
//! // Subsequent requests can authorize preemptively from the stored challenge,
//! // without waiting for another 401.
//! let again = handler
//!     .attempt_preemptive_authorization("GET", "/dir/index.html", || Vec::new())
//!     .unwrap()
//!     .expect("pipelining state was armed");
//! assert_eq!(again, answer);
//! ```

mod challenge;
mod compute;
mod enums;
mod error;
mod handler;
mod header;
mod nonce;
mod utils;

pub use error::{Error, Result};

pub use crate::challenge::{parse_auth_header, parse_challenges, ChallengeParams};
pub use crate::compute::{compute_digest, make_cnonce, Credentials, DigestParts};
pub use crate::handler::{AuthScheme, ChallengeHandler};
pub use crate::header::DigestAuthorization;
pub use crate::nonce::NonceCounter;

pub use crate::enums::*;
