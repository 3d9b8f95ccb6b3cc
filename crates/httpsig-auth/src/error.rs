//! Error types for HTTP Signature authentication.
//!
//! All failures are represented by [`AuthError`]. Parsing and signing-string
//! failures surface before any cryptography runs; a well-formed signature with
//! the wrong value is *not* an error at the verifier level (it yields `false`).

/// Errors that can occur while parsing, canonicalizing, or verifying an
/// HTTP Signature.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header with the `Signature` scheme (and no
    /// `Signature` header) is present on the request.
    #[error("Missing Signature authorization header")]
    NoSignatureHeader,

    /// The header value is structurally malformed.
    #[error("Invalid Signature header: {0}")]
    InvalidAuthHeader(&'static str),

    /// A required parameter (`keyId`, `algorithm`, `signature`) is absent.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The `algorithm` parameter names an algorithm outside the supported set.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The algorithm is supported but not permitted by the verifier configuration.
    #[error("Algorithm not allowed: {0}")]
    DisallowedAlgorithm(String),

    /// The signature or key material is not in the expected encoding.
    #[error("Invalid {0} encoding")]
    InvalidEncoding(&'static str),

    /// A covered header does not exist on the request.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// A covered header carries a value that is not visible ASCII.
    #[error("Invalid value for header: {0}")]
    InvalidHeaderValue(String),

    /// The verifier configuration requires a header the signer did not cover.
    #[error("Required header not signed: {0}")]
    RequiredHeaderNotSigned(String),

    /// The covered `date` header is missing, unparsable, or outside the
    /// clock-skew tolerance.
    #[error("Stale or invalid date: {0}")]
    StaleOrInvalidDate(String),

    /// The algorithm family and the supplied key shape disagree.
    #[error("Algorithm {algorithm} cannot be used with a {key_type} key")]
    AlgorithmKeyMismatch {
        /// The wire name of the requested algorithm.
        algorithm: String,
        /// The kind of key that was supplied.
        key_type: &'static str,
    },

    /// The key or signature bytes are structurally unusable.
    #[error("Invalid key or signature: {0}")]
    InvalidKeyOrSignature(&'static str),

    /// The key provider has no key for the given `keyId`.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// The signing key could not produce a signature.
    #[error("Signing failed")]
    SigningFailed,

    /// The signature is well-formed but does not match the request.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}

impl AuthError {
    /// A stable, variant-level name suitable for structured logs.
    ///
    /// Responses to clients should not carry this value; it distinguishes
    /// failure modes an attacker could otherwise probe for.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoSignatureHeader => "NoSignatureHeader",
            Self::InvalidAuthHeader(_) => "InvalidAuthHeader",
            Self::MissingParameter(_) => "MissingParameter",
            Self::UnsupportedAlgorithm(_) => "UnsupportedAlgorithm",
            Self::DisallowedAlgorithm(_) => "DisallowedAlgorithm",
            Self::InvalidEncoding(_) => "InvalidEncoding",
            Self::MissingHeader(_) => "MissingHeader",
            Self::InvalidHeaderValue(_) => "InvalidHeaderValue",
            Self::RequiredHeaderNotSigned(_) => "RequiredHeaderNotSigned",
            Self::StaleOrInvalidDate(_) => "StaleOrInvalidDate",
            Self::AlgorithmKeyMismatch { .. } => "AlgorithmKeyMismatch",
            Self::InvalidKeyOrSignature(_) => "InvalidKeyOrSignature",
            Self::KeyNotFound(_) => "KeyNotFound",
            Self::SigningFailed => "SigningFailed",
            Self::SignatureDoesNotMatch => "SignatureDoesNotMatch",
        }
    }
}

impl From<base64::DecodeError> for AuthError {
    fn from(_: base64::DecodeError) -> Self {
        Self::InvalidEncoding("signature")
    }
}
