//! Pure HA1/HA2/response hash chains for Digest authentication.

use crate::challenge::ChallengeParams;
use crate::enums::{Algorithm, Qop};
use crate::{Error, Result};

use rand::Rng;

/// Login credentials, immutable for the handler's lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Intermediate and final digest values for one request.
#[derive(Debug, PartialEq, Eq)]
pub struct DigestParts {
    pub ha1: String,
    pub ha2: String,
    pub response: String,
    /// Plaintext username, or `H(username:realm)` when the challenge set
    /// `userhash=true`.
    pub username: String,
}

/// Generate a fresh client nonce: 16 random bytes, lowercase hex.
/// A failing random source panics; that is fatal and never retried.
pub fn make_cnonce() -> String {
    let mut rng = rand::thread_rng();
    let nonce_bytes: [u8; 16] = rng.gen();
    hex::encode(nonce_bytes)
}

/// True when the challenge asks for a hashed username field.
pub fn userhash_requested(challenge: &ChallengeParams) -> bool {
    challenge
        .get("userhash")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Compute the digest hash chain for one request against one challenge.
///
/// All hash inputs are UTF-8 bytes, all outputs lowercase hex. The entity body
/// supplier is invoked only on the `auth-int` path. `nc` and `cnonce` are
/// supplied by the caller; the handler generates them according to the
/// qop/-sess rules before calling in.
pub fn compute_digest<F>(
    credentials: &Credentials,
    method: &str,
    uri: &str,
    challenge: &ChallengeParams,
    algorithm: Algorithm,
    qop: Option<Qop>,
    body: F,
    nc: Option<u32>,
    cnonce: Option<&str>,
) -> Result<DigestParts>
where
    F: FnOnce() -> Vec<u8>,
{
    let realm = challenge
        .get("realm")
        .ok_or(Error::MissingRequired("realm"))?;
    let nonce = challenge
        .get("nonce")
        .ok_or(Error::MissingRequired("nonce"))?;

    let ha1 = {
        let a1 = format!(
            "{name}:{realm}:{pw}",
            name = credentials.username,
            realm = realm,
            pw = credentials.password
        );
        if algorithm.sess {
            algorithm.hash_str(&format!(
                "{hash}:{nonce}:{cnonce}",
                hash = algorithm.hash_str(&a1),
                nonce = nonce,
                cnonce = cnonce.unwrap_or_default()
            ))
        } else {
            algorithm.hash_str(&a1)
        }
    };

    let ha2 = match qop {
        Some(Qop::AUTH_INT) => algorithm.hash_str(&format!(
            "{method}:{uri}:{bodyhash}",
            method = method,
            uri = uri,
            bodyhash = algorithm.hash(&body())
        )),
        _ => algorithm.hash_str(&format!("{method}:{uri}", method = method, uri = uri)),
    };

    let response = match qop {
        Some(q) => algorithm.hash_str(&format!(
            "{ha1}:{nonce}:{nc:08x}:{cnonce}:{qop}:{ha2}",
            ha1 = ha1,
            nonce = nonce,
            nc = nc.unwrap_or_default(),
            cnonce = cnonce.unwrap_or_default(),
            qop = q,
            ha2 = ha2
        )),
        None => algorithm.hash_str(&format!(
            "{ha1}:{nonce}:{ha2}",
            ha1 = ha1,
            nonce = nonce,
            ha2 = ha2
        )),
    };

    let username = if userhash_requested(challenge) {
        algorithm.hash_str(&format!(
            "{username}:{realm}",
            username = credentials.username,
            realm = realm
        ))
    } else {
        credentials.username.clone()
    };

    Ok(DigestParts {
        ha1,
        ha2,
        response,
        username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::AlgorithmType;

    fn rfc7616_challenge() -> ChallengeParams {
        let mut challenge = ChallengeParams::new();
        challenge.insert("realm".into(), "http-auth@example.org".into());
        challenge.insert(
            "nonce".into(),
            "7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v".into(),
        );
        challenge
    }

    const RFC7616_CNONCE: &str = "f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ";

    fn no_body() -> Vec<u8> {
        panic!("body supplier must not be called outside auth-int");
    }

    #[test]
    fn test_rfc7616_md5_vector() {
        let credentials = Credentials::new("Mufasa", "Circle of Life");
        let parts = compute_digest(
            &credentials,
            "GET",
            "/dir/index.html",
            &rfc7616_challenge(),
            Algorithm::default(),
            Some(Qop::AUTH),
            no_body,
            Some(1),
            Some(RFC7616_CNONCE),
        )
        .unwrap();

        assert_eq!(parts.response, "8ca523f5e9506fed4657c9700eebdbec");
        assert_eq!(parts.username, "Mufasa");
    }

    #[test]
    fn test_rfc7616_sha256_vector() {
        let credentials = Credentials::new("Mufasa", "Circle of Life");
        let parts = compute_digest(
            &credentials,
            "GET",
            "/dir/index.html",
            &rfc7616_challenge(),
            Algorithm::new(AlgorithmType::SHA2_256, false),
            Some(Qop::AUTH),
            no_body,
            Some(1),
            Some(RFC7616_CNONCE),
        )
        .unwrap();

        assert_eq!(
            parts.response,
            "753927fa0e85d155564e2e272a28d1802ca10daf4496794697cf8db5856cb6c1"
        );
    }

    #[test]
    fn test_rfc2069_no_qop() {
        let mut challenge = ChallengeParams::new();
        challenge.insert("realm".into(), "testrealm@host.com".into());
        challenge.insert(
            "nonce".into(),
            "dcd98b7102dd2f0e8b11d0f600bfb0c093".into(),
        );

        let credentials = Credentials::new("Mufasa", "CircleOfLife");
        let parts = compute_digest(
            &credentials,
            "GET",
            "/dir/index.html",
            &challenge,
            Algorithm::default(),
            None,
            no_body,
            None,
            None,
        )
        .unwrap();

        assert_eq!(parts.response, "1949323746fe6a43ef61f9606e7febea");
    }

    #[test]
    fn test_sess_variant_rehashes_ha1() {
        let credentials = Credentials::new("Mufasa", "Circle of Life");
        let challenge = rfc7616_challenge();
        let algo = Algorithm::new(AlgorithmType::SHA2_256, true);

        let parts = compute_digest(
            &credentials,
            "GET",
            "/dir/index.html",
            &challenge,
            algo,
            Some(Qop::AUTH),
            no_body,
            Some(1),
            Some(RFC7616_CNONCE),
        )
        .unwrap();

        let base = algo.hash_str("Mufasa:http-auth@example.org:Circle of Life");
        let expected_ha1 = algo.hash_str(&format!(
            "{}:7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v:{}",
            base, RFC7616_CNONCE
        ));
        assert_eq!(parts.ha1, expected_ha1);
    }

    #[test]
    fn test_auth_int_hashes_body() {
        let credentials = Credentials::new("user", "pass");
        let mut challenge = ChallengeParams::new();
        challenge.insert("realm".into(), "r".into());
        challenge.insert("nonce".into(), "n".into());

        let algo = Algorithm::default();
        let parts = compute_digest(
            &credentials,
            "POST",
            "/submit",
            &challenge,
            algo,
            Some(Qop::AUTH_INT),
            || b"hello body".to_vec(),
            Some(1),
            Some("cn"),
        )
        .unwrap();

        let expected_ha2 = algo.hash_str(&format!(
            "POST:/submit:{}",
            algo.hash(b"hello body")
        ));
        assert_eq!(parts.ha2, expected_ha2);
    }

    #[test]
    fn test_userhash_replaces_username() {
        let credentials = Credentials::new("Mufasa", "Circle of Life");
        let mut challenge = rfc7616_challenge();
        challenge.insert("userhash".into(), "true".into());

        let algo = Algorithm::new(AlgorithmType::SHA2_256, false);
        let parts = compute_digest(
            &credentials,
            "GET",
            "/dir/index.html",
            &challenge,
            algo,
            Some(Qop::AUTH),
            no_body,
            Some(1),
            Some(RFC7616_CNONCE),
        )
        .unwrap();

        assert_eq!(parts.username, algo.hash_str("Mufasa:http-auth@example.org"));
        assert_eq!(
            parts.username,
            "a947aad205e80e429958a387394944c6b496301e79f89d35a4cc23b6ee12b5b6"
        );
    }

    #[test]
    fn test_missing_fields_fail_fast() {
        let credentials = Credentials::new("u", "p");
        let challenge = ChallengeParams::new();
        let err = compute_digest(
            &credentials,
            "GET",
            "/",
            &challenge,
            Algorithm::default(),
            None,
            no_body,
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err, Error::MissingRequired("realm"));
    }

    #[test]
    fn test_make_cnonce_shape() {
        let a = make_cnonce();
        let b = make_cnonce();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
    }
}
