use crate::{Error, Error::*, Result};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use digest::DynDigest;
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};

/// Algorithm type
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[allow(non_camel_case_types)]
pub enum AlgorithmType {
    MD5,
    SHA2_256,
    SHA2_512_256,
}

/// Algorithm and the -sess flag pair
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Algorithm {
    pub algo: AlgorithmType,
    pub sess: bool,
}

impl Algorithm {
    /// Selection preference, most preferred first. Used both to pick among
    /// multiple challenges and among multiple advertised algorithms.
    pub const PREFERENCE: [Algorithm; 6] = [
        Algorithm { algo: AlgorithmType::SHA2_512_256, sess: false },
        Algorithm { algo: AlgorithmType::SHA2_512_256, sess: true },
        Algorithm { algo: AlgorithmType::SHA2_256, sess: false },
        Algorithm { algo: AlgorithmType::SHA2_256, sess: true },
        Algorithm { algo: AlgorithmType::MD5, sess: false },
        Algorithm { algo: AlgorithmType::MD5, sess: true },
    ];

    /// Compose from algorithm type and the -sess flag
    pub fn new(algo: AlgorithmType, sess: bool) -> Algorithm {
        Algorithm { algo, sess }
    }

    /// Calculate a hash of bytes using the selected algorithm, as lowercase hex.
    ///
    /// SHA-512-256 is the full SHA-512 digest truncated to its first 32 bytes,
    /// not the SHA-512/256 variant with distinct initialization vectors.
    pub fn hash(self, bytes: &[u8]) -> String {
        let (mut hash, out_len): (Box<dyn DynDigest>, usize) = match self.algo {
            AlgorithmType::MD5 => (Box::new(Md5::new()), 16),
            AlgorithmType::SHA2_256 => (Box::new(Sha256::new()), 32),
            AlgorithmType::SHA2_512_256 => (Box::new(Sha512::new()), 32),
        };

        hash.update(bytes);
        hex::encode(&hash.finalize()[..out_len])
    }

    /// Calculate a hash of string's bytes using the selected algorithm
    pub fn hash_str(self, bytes: &str) -> String {
        self.hash(bytes.as_bytes())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parse from the token used in WWW-Authenticate (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MD5" => Ok(Algorithm::new(AlgorithmType::MD5, false)),
            "MD5-SESS" => Ok(Algorithm::new(AlgorithmType::MD5, true)),
            "SHA-256" => Ok(Algorithm::new(AlgorithmType::SHA2_256, false)),
            "SHA-256-SESS" => Ok(Algorithm::new(AlgorithmType::SHA2_256, true)),
            "SHA-512-256" => Ok(Algorithm::new(AlgorithmType::SHA2_512_256, false)),
            "SHA-512-256-SESS" => Ok(Algorithm::new(AlgorithmType::SHA2_512_256, true)),
            _ => Err(UnknownAlgorithm(s.into())),
        }
    }
}

impl Default for Algorithm {
    /// MD5, the RFC 7616 default when the challenge omits `algorithm`
    fn default() -> Self {
        Algorithm::new(AlgorithmType::MD5, false)
    }
}

impl Display for Algorithm {
    /// Format to the form used in HTTP headers
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self.algo {
            AlgorithmType::MD5 => "MD5",
            AlgorithmType::SHA2_256 => "SHA-256",
            AlgorithmType::SHA2_512_256 => "SHA-512-256",
        })?;

        if self.sess {
            f.write_str("-sess")?;
        }

        Ok(())
    }
}

/// QOP field values
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(non_camel_case_types)]
pub enum Qop {
    AUTH,
    AUTH_INT,
}

impl Qop {
    /// Resolve a challenge's `qop` value: case-insensitive exact match against
    /// "auth" and "auth-int"; anything else (including absent) is treated as
    /// no qop. No splitting of combined option lists is attempted.
    pub fn resolve(value: Option<&str>) -> Option<Qop> {
        match value {
            Some(v) if v.eq_ignore_ascii_case("auth") => Some(Qop::AUTH),
            Some(v) if v.eq_ignore_ascii_case("auth-int") => Some(Qop::AUTH_INT),
            _ => None,
        }
    }
}

impl Display for Qop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Qop::AUTH => "auth",
            Qop::AUTH_INT => "auth-int",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_parse_display() {
        assert_eq!(
            "SHA-256-sess".parse::<Algorithm>().unwrap(),
            Algorithm::new(AlgorithmType::SHA2_256, true)
        );
        assert_eq!("md5".parse::<Algorithm>().unwrap(), Algorithm::default());
        assert_eq!(
            "SHA-512-256".parse::<Algorithm>().unwrap().to_string(),
            "SHA-512-256"
        );
        assert_eq!(
            Algorithm::new(AlgorithmType::MD5, true).to_string(),
            "MD5-sess"
        );
        assert_eq!(
            "SHA-1".parse::<Algorithm>(),
            Err(UnknownAlgorithm("SHA-1".into()))
        );
    }

    #[test]
    fn test_sha512_256_is_truncated_sha512() {
        // Plain SHA-512 truncated to 32 bytes, not the IV-based SHA-512/256.
        let algo = Algorithm::new(AlgorithmType::SHA2_512_256, false);
        let hashed = algo.hash_str("hello");

        let mut full = Sha512::new();
        digest::Digest::update(&mut full, b"hello");
        let expected = hex::encode(&full.finalize()[..32]);

        assert_eq!(hashed, expected);
        assert_eq!(
            hashed,
            "9b71d224bd62f3785d96d46ad3ea3d73319bfbc2890caadae2dff72519673ca7"
        );
        // The standardized SHA-512/256 of "hello" starts with e30d87cf.
        assert_ne!(
            hashed,
            "e30d87cfa2a75db545eac4d61baf970366a8357c7f72fa95b52d0accb698f13a"
        );
    }

    #[test]
    fn test_qop_resolve() {
        assert_eq!(Qop::resolve(Some("auth")), Some(Qop::AUTH));
        assert_eq!(Qop::resolve(Some("AUTH-INT")), Some(Qop::AUTH_INT));
        assert_eq!(Qop::resolve(Some("auth, auth-int")), None);
        assert_eq!(Qop::resolve(Some("token")), None);
        assert_eq!(Qop::resolve(None), None);
    }
}
