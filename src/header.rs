//! Wire-format serialization of the `Authorization` / `Proxy-Authorization`
//! header value.

use crate::enums::{Algorithm, Qop};
use crate::utils::QuoteForDigest;

use std::fmt;
use std::fmt::{Display, Formatter};

/// Computed fields of a Digest `Authorization` header, serialized through
/// [`Display`] in a fixed order: `username`, `realm`, `nonce`, `uri` and
/// `response` always come first and are quoted; `algorithm`, `cnonce`,
/// `opaque`, the `qop`/`nc` pair and `userhash` follow when present.
#[derive(Debug)]
pub struct DigestAuthorization<'a> {
    pub username: &'a str,
    pub realm: &'a str,
    pub nonce: &'a str,
    pub uri: &'a str,
    pub response: &'a str,
    pub algorithm: Algorithm,
    pub cnonce: Option<&'a str>,
    pub opaque: Option<&'a str>,
    /// `qop` and `nc` are emitted together or not at all.
    pub qop: Option<Qop>,
    pub nc: u32,
    pub userhash: bool,
}

impl<'a> DigestAuthorization<'a> {
    /// Produce the header value (also accessible through the Display trait)
    pub fn to_header_string(&self) -> String {
        self.to_string()
    }
}

impl<'a> Display for DigestAuthorization<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("Digest ")?;

        f.write_fmt(format_args!(
            "username=\"{}\"",
            self.username.quote_for_digest()
        ))?;
        f.write_fmt(format_args!(", realm=\"{}\"", self.realm.quote_for_digest()))?;
        f.write_fmt(format_args!(", nonce=\"{}\"", self.nonce.quote_for_digest()))?;
        f.write_fmt(format_args!(", uri=\"{}\"", self.uri))?;
        f.write_fmt(format_args!(
            ", response=\"{}\"",
            self.response.quote_for_digest()
        ))?;

        f.write_fmt(format_args!(", algorithm={}", self.algorithm))?;

        if let Some(cnonce) = self.cnonce {
            f.write_fmt(format_args!(", cnonce=\"{}\"", cnonce.quote_for_digest()))?;
        }

        if let Some(opaque) = self.opaque {
            f.write_fmt(format_args!(", opaque=\"{}\"", opaque.quote_for_digest()))?;
        }

        if let Some(qop) = &self.qop {
            f.write_fmt(format_args!(", qop={qop}, nc={nc:08x}", qop = qop, nc = self.nc))?;
        }

        if self.userhash {
            f.write_str(", userhash=true")?;
        }

        Ok(())
    }
}
