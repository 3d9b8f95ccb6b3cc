//! Parsing of the `Signature` authorization header.
//!
//! The header has the format:
//!
//! ```text
//! Signature keyId="<id>",algorithm="<alg>",headers="<names>",signature="<base64>"
//! ```
//!
//! `headers` is optional and defaults to `date`. The older form of the scheme,
//! where the signature follows the parameters as a bare whitespace-separated
//! token, is accepted as well:
//!
//! ```text
//! Signature keyId="<id>",algorithm="<alg>" <base64>
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::algorithm::Algorithm;
use crate::error::AuthError;

/// The authorization scheme token.
pub const SIGNATURE_SCHEME: &str = "Signature";

/// Covered headers used when the `headers` parameter is absent.
pub const DEFAULT_HEADERS: &[&str] = &["date"];

/// The wire-level parameters of a `Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    /// Opaque key identifier, resolved by the caller.
    pub key_id: String,
    /// The signature algorithm.
    pub algorithm: Algorithm,
    /// Lowercased covered header names in signing order.
    pub headers: Vec<String>,
    /// Decoded signature bytes.
    pub signature: Vec<u8>,
}

impl ParsedSignature {
    /// Render these parameters back into an `Authorization` header value.
    ///
    /// # Examples
    ///
    /// ```
    /// use httpsig_auth::header::parse_authorization_header;
    ///
    /// let value = r#"Signature keyId="foo",algorithm="hmac-sha1",headers="date",signature="AAAA""#;
    /// let parsed = parse_authorization_header(value).unwrap();
    /// assert_eq!(parsed.to_header_value(), value);
    /// ```
    #[must_use]
    pub fn to_header_value(&self) -> String {
        format!(
            r#"{SIGNATURE_SCHEME} keyId="{}",algorithm="{}",headers="{}",signature="{}""#,
            self.key_id,
            self.algorithm,
            self.headers.join(" "),
            BASE64.encode(&self.signature),
        )
    }
}

/// Parse an `Authorization` header value using the `Signature` scheme.
///
/// # Errors
///
/// Returns [`AuthError::NoSignatureHeader`] if the value uses another scheme,
/// and the errors of [`parse_signature_params`] otherwise.
pub fn parse_authorization_header(header: &str) -> Result<ParsedSignature, AuthError> {
    let params = strip_scheme(header).ok_or(AuthError::NoSignatureHeader)?;
    parse_signature_params(params)
}

/// Whether the value carries the `Signature` authorization scheme.
#[must_use]
pub fn is_signature_scheme(header: &str) -> bool {
    strip_scheme(header).is_some()
}

/// Parse the parameter list that follows the scheme token.
///
/// # Errors
///
/// - [`AuthError::InvalidAuthHeader`] for malformed or duplicated parameters
/// - [`AuthError::MissingParameter`] if `keyId`, `algorithm` or `signature` is absent
/// - [`AuthError::UnsupportedAlgorithm`] for an unknown algorithm
/// - [`AuthError::InvalidEncoding`] if the signature is not valid base64
pub fn parse_signature_params(params: &str) -> Result<ParsedSignature, AuthError> {
    let raw = split_parameters(params)?;

    let mut key_id = None;
    let mut algorithm = None;
    let mut headers = None;
    let mut signature = None;

    for (name, value) in raw.pairs {
        let slot = match name {
            "keyId" => &mut key_id,
            "algorithm" => &mut algorithm,
            "headers" => &mut headers,
            "signature" => &mut signature,
            _ => continue,
        };
        if slot.replace(value).is_some() {
            return Err(AuthError::InvalidAuthHeader("duplicate parameter"));
        }
    }

    let signature = match (signature, raw.trailing) {
        (Some(_), Some(_)) => {
            return Err(AuthError::InvalidAuthHeader("unexpected trailing token"));
        }
        (param, trailing) => param.or(trailing),
    };

    let key_id = key_id
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingParameter("keyId"))?;
    let algorithm = algorithm.ok_or(AuthError::MissingParameter("algorithm"))?;
    let signature = signature.ok_or(AuthError::MissingParameter("signature"))?;

    let algorithm: Algorithm = algorithm.parse()?;

    let headers = match headers {
        Some(value) => {
            let names: Vec<String> = value
                .split_ascii_whitespace()
                .map(str::to_ascii_lowercase)
                .collect();
            if names.is_empty() {
                return Err(AuthError::InvalidAuthHeader("empty headers parameter"));
            }
            names
        }
        None => DEFAULT_HEADERS.iter().map(|&h| h.to_owned()).collect(),
    };

    let signature = BASE64.decode(signature)?;
    if signature.is_empty() {
        return Err(AuthError::MissingParameter("signature"));
    }

    Ok(ParsedSignature {
        key_id: key_id.to_owned(),
        algorithm,
        headers,
        signature,
    })
}

/// Strip a case-insensitive `Signature` scheme token, returning the parameters.
fn strip_scheme(header: &str) -> Option<&str> {
    let header = header.trim_start();
    let (scheme, rest) = header
        .split_once(|c: char| c.is_ascii_whitespace())
        .unwrap_or((header, ""));
    scheme
        .eq_ignore_ascii_case(SIGNATURE_SCHEME)
        .then_some(rest)
}

/// Raw `name=value` pairs plus an optional bare trailing token.
struct RawParams<'a> {
    pairs: Vec<(&'a str, &'a str)>,
    trailing: Option<&'a str>,
}

fn split_parameters(input: &str) -> Result<RawParams<'_>, AuthError> {
    let bytes = input.as_bytes();
    let mut pairs = Vec::new();
    let mut trailing = None;
    let mut pos = skip_whitespace(bytes, 0);

    while pos < bytes.len() {
        let name_len = bytes[pos..]
            .iter()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        if name_len == 0 || bytes.get(pos + name_len) != Some(&b'=') {
            return Err(AuthError::InvalidAuthHeader("malformed parameter"));
        }
        let name = &input[pos..pos + name_len];
        pos += name_len + 1;

        let value = if bytes.get(pos) == Some(&b'"') {
            let start = pos + 1;
            let len = bytes[start..]
                .iter()
                .position(|&b| b == b'"')
                .ok_or(AuthError::InvalidAuthHeader("unterminated quoted value"))?;
            pos = start + len + 1;
            &input[start..start + len]
        } else {
            let len = bytes[pos..]
                .iter()
                .take_while(|&&b| b != b',' && !b.is_ascii_whitespace())
                .count();
            let start = pos;
            pos += len;
            &input[start..pos]
        };
        pairs.push((name, value));

        let value_end = pos;
        pos = skip_whitespace(bytes, pos);
        match bytes.get(pos) {
            None => break,
            Some(b',') => pos = skip_whitespace(bytes, pos + 1),
            Some(_) if pos > value_end => {
                let token = input[pos..].trim_end();
                if token.contains(|c: char| c == ',' || c == '"' || c.is_ascii_whitespace()) {
                    return Err(AuthError::InvalidAuthHeader("malformed trailing token"));
                }
                trailing = Some(token);
                break;
            }
            Some(_) => {
                return Err(AuthError::InvalidAuthHeader("expected ',' between parameters"));
            }
        }
    }

    Ok(RawParams { pairs, trailing })
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}
