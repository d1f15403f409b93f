//! Parsing of `WWW-Authenticate` / `Proxy-Authenticate` challenge text and of
//! single-challenge headers such as `Authentication-Info`.
//!
//! This is deliberately not a general RFC 7235 challenge-list parser: challenges
//! are separated by scheme tokens at the start of a top-level comma segment, so
//! pathological headers mixing several full challenges with commas embedded in
//! quoted fields of the *scheme token itself* are not handled.

use std::collections::HashMap;

/// One challenge's parameters: lower-cased key, value with one layer of
/// surrounding quotes removed.
pub type ChallengeParams = HashMap<String, String>;

const SCHEMES: [&str; 2] = ["Basic", "Digest"];

/// Split header text on commas outside of double-quoted strings.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                segments.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&input[start..]);
    segments
}

/// Strip a single layer of surrounding `"` or `'` quotes.
fn strip_quotes(value: &str) -> &str {
    let v = value.trim();
    if v.len() >= 2
        && ((v.starts_with('"') && v.ends_with('"'))
            || (v.starts_with('\'') && v.ends_with('\'')))
    {
        &v[1..v.len() - 1]
    } else {
        v
    }
}

/// If the segment begins with a known scheme token, return the rest of it.
fn strip_scheme(segment: &str) -> Option<&str> {
    for scheme in SCHEMES {
        if let Some(prefix) = segment.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                let rest = &segment[scheme.len()..];
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    return Some(rest.trim_start());
                }
            }
        }
    }
    None
}

/// Parse one `key=value` segment into the map. Segments without `=` (e.g. a
/// bare scheme token's leftovers) are ignored.
fn parse_param(segment: &str, params: &mut ChallengeParams) {
    if let Some(eq) = segment.find('=') {
        let key = segment[..eq].trim().to_ascii_lowercase();
        if !key.is_empty() {
            params.insert(key, strip_quotes(&segment[eq + 1..]).to_string());
        }
    }
}

/// Parse raw challenge header text into an ordered list of per-scheme-instance
/// parameter maps. Empty input yields an empty list, never an error.
pub fn parse_challenges(header: &str) -> Vec<ChallengeParams> {
    let header = header.trim();
    if header.is_empty() {
        return Vec::new();
    }

    let mut challenges = Vec::new();
    let mut current = ChallengeParams::new();
    let mut started = false;

    for segment in split_top_level(header) {
        let segment = segment.trim();
        let segment = match strip_scheme(segment) {
            Some(rest) => {
                if started {
                    challenges.push(std::mem::take(&mut current));
                }
                started = true;
                rest
            }
            None => {
                started = true;
                segment
            }
        };
        parse_param(segment, &mut current);
    }
    if started {
        challenges.push(current);
    }
    challenges
}

/// Parse a standalone single-challenge header (`WWW-Authenticate` with one
/// challenge, `Authentication-Info`, `Proxy-Authentication-Info`) into a
/// key/value map. A leading `Basic`/`Digest` scheme token is stripped; empty
/// input yields an empty map.
pub fn parse_auth_header(header: &str) -> ChallengeParams {
    let header = header.trim();
    if header.is_empty() {
        return ChallengeParams::new();
    }
    let header = strip_scheme(header).unwrap_or(header);

    let mut params = ChallengeParams::new();
    for segment in split_top_level(header) {
        parse_param(segment, &mut params);
    }
    params
}
