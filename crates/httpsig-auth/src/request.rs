//! Request-level entry points.
//!
//! [`parse_request`] runs the header parser and the signing-string builder
//! against a live request, [`verify`] makes the trust decision for a key, and
//! [`verify_request`] chains both through a [`KeyProvider`].
//!
//! ```text
//! Unparsed -> Parsed -> StringBuilt -> Verified
//! ```
//!
//! Any stage failure short-circuits; no stage is retried.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use http::header::{AUTHORIZATION, DATE, HeaderMap};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::algorithm::Algorithm;
use crate::canonical::build_signing_string;
use crate::config::VerifierConfig;
use crate::credentials::KeyProvider;
use crate::error::AuthError;
use crate::freshness::check_date_freshness;
use crate::header::{
    ParsedSignature, is_signature_scheme, parse_authorization_header, parse_signature_params,
};
use crate::keys::VerificationKey;
use crate::verifier::verify_signature;

/// Name of the header carrying a bare parameter list, used when no
/// `Authorization: Signature ...` header is present.
pub const SIGNATURE_HEADER: &str = "signature";

/// Read access to the parts of an inbound request that can be signed.
///
/// Implemented for [`http::request::Parts`] and [`http::Request`]. Header
/// lookups are case-insensitive because [`HeaderMap`] is.
pub trait SignedRequest {
    /// The request method.
    fn method(&self) -> &http::Method;
    /// The request URI as received.
    fn uri(&self) -> &http::Uri;
    /// The protocol version.
    fn version(&self) -> http::Version;
    /// The request headers.
    fn headers(&self) -> &HeaderMap;
}

impl SignedRequest for http::request::Parts {
    fn method(&self) -> &http::Method {
        &self.method
    }

    fn uri(&self) -> &http::Uri {
        &self.uri
    }

    fn version(&self) -> http::Version {
        self.version
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl<B> SignedRequest for http::Request<B> {
    fn method(&self) -> &http::Method {
        self.method()
    }

    fn uri(&self) -> &http::Uri {
        self.uri()
    }

    fn version(&self) -> http::Version {
        self.version()
    }

    fn headers(&self) -> &HeaderMap {
        self.headers()
    }
}

/// Signature parameters parsed from a request, together with the signing
/// string reconstructed from that request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureParams {
    /// Opaque key identifier, resolved by the caller.
    pub key_id: String,
    /// The signature algorithm.
    pub algorithm: Algorithm,
    /// Lowercased covered header names in signing order.
    pub headers: Vec<String>,
    /// Decoded signature bytes (serialized as base64).
    #[serde(serialize_with = "serialize_base64")]
    pub signature: Vec<u8>,
    /// The exact string the signer must have signed.
    pub signing_string: String,
}

impl SignatureParams {
    fn new(parsed: ParsedSignature, signing_string: String) -> Self {
        Self {
            key_id: parsed.key_id,
            algorithm: parsed.algorithm,
            headers: parsed.headers,
            signature: parsed.signature,
            signing_string,
        }
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}

/// Parse the signature on `request` and rebuild its signing string.
///
/// Uses the current time for the `date` freshness check; see
/// [`parse_request_at`] for a fixed clock.
pub fn parse_request<R>(request: &R, config: &VerifierConfig) -> Result<SignatureParams, AuthError>
where
    R: SignedRequest + ?Sized,
{
    parse_request_at(request, config, Utc::now())
}

/// Parse the signature on `request` and rebuild its signing string, judging
/// `date` freshness against `now`.
///
/// # Errors
///
/// Returns an [`AuthError`] if:
/// - No signature header is present, or it is malformed
/// - The algorithm is unsupported or not allowed by `config`
/// - A header required by `config` is not covered
/// - The covered `date` is missing, repeated, unparsable or outside the
///   clock-skew tolerance
/// - Another covered header is missing from the request
pub fn parse_request_at<R>(
    request: &R,
    config: &VerifierConfig,
    now: DateTime<Utc>,
) -> Result<SignatureParams, AuthError>
where
    R: SignedRequest + ?Sized,
{
    let parsed = extract_signature(request.headers())?;

    debug!(
        key_id = %parsed.key_id,
        algorithm = %parsed.algorithm,
        headers = ?parsed.headers,
        "Parsed HTTP signature"
    );

    if !config.is_algorithm_allowed(parsed.algorithm) {
        return Err(AuthError::DisallowedAlgorithm(parsed.algorithm.to_string()));
    }

    if let Some(missing) = config
        .required_headers
        .iter()
        .find(|required| !parsed.headers.iter().any(|h| h.eq_ignore_ascii_case(required)))
    {
        return Err(AuthError::RequiredHeaderNotSigned(missing.clone()));
    }

    if parsed.headers.iter().any(|h| h == "date") {
        let date = single_date_value(request.headers())?;
        check_date_freshness(date, now, config.clock_skew())?;
    }

    let signing_string = build_signing_string(&parsed.headers, request)?;

    debug!(
        covered = parsed.headers.len(),
        length = signing_string.len(),
        "Built signing string"
    );

    Ok(SignatureParams::new(parsed, signing_string))
}

/// Verify parsed signature parameters against `key`.
///
/// Returns `Ok(false)` for a well-formed signature that does not match.
///
/// # Errors
///
/// See [`verify_signature`].
pub fn verify(params: &SignatureParams, key: &VerificationKey) -> Result<bool, AuthError> {
    verify_signature(
        &params.signing_string,
        params.algorithm,
        &params.signature,
        key,
    )
}

/// Verify a signed request end to end, resolving the key through `provider`.
///
/// # Errors
///
/// Returns any error of [`parse_request`], [`KeyProvider::get_key`] or
/// [`verify`], and [`AuthError::SignatureDoesNotMatch`] when the signature is
/// well-formed but wrong.
pub fn verify_request<R>(
    request: &R,
    provider: &dyn KeyProvider,
    config: &VerifierConfig,
) -> Result<SignatureParams, AuthError>
where
    R: SignedRequest + ?Sized,
{
    let params = parse_request(request, config)?;
    let key = provider.get_key(&params.key_id)?;

    if verify(&params, &key)? {
        debug!(key_id = %params.key_id, "HTTP signature verification succeeded");
        Ok(params)
    } else {
        debug!(
            key_id = %params.key_id,
            algorithm = %params.algorithm,
            "HTTP signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// The one `Date` value a covered `date` line is built from.
///
/// A missing, repeated or non-ASCII `Date` cannot be judged fresh.
fn single_date_value(headers: &HeaderMap) -> Result<&str, AuthError> {
    let mut values = headers.get_all(DATE).iter();
    let value = values
        .next()
        .ok_or_else(|| AuthError::StaleOrInvalidDate("missing date header".to_owned()))?;
    if values.next().is_some() {
        return Err(AuthError::StaleOrInvalidDate(
            "repeated date header".to_owned(),
        ));
    }
    value
        .to_str()
        .map_err(|_| AuthError::StaleOrInvalidDate("non-ASCII date header".to_owned()))
}

/// Locate and parse the signature header.
///
/// `Authorization: Signature ...` takes precedence; a `Signature` header
/// holding the bare parameter list is the fallback.
fn extract_signature(headers: &HeaderMap) -> Result<ParsedSignature, AuthError> {
    if let Some(value) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_signature_scheme(v))
    {
        return parse_authorization_header(value);
    }

    let value = headers
        .get(SIGNATURE_HEADER)
        .ok_or(AuthError::NoSignatureHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader("non-ASCII signature header"))?;

    if is_signature_scheme(value) {
        parse_authorization_header(value)
    } else {
        parse_signature_params(value)
    }
}
