//! HTTP Signature request authentication.
//!
//! This crate verifies requests signed under the `Signature` authentication
//! scheme, where a client signs a selection of request headers and sends the
//! result in the `Authorization` header:
//!
//! ```text
//! Authorization: Signature keyId="foo",algorithm="hmac-sha256",headers="date",signature="..."
//! ```
//!
//! # Overview
//!
//! Verification happens in three steps, each usable on its own:
//!
//! 1. Parse the header into [`header::ParsedSignature`].
//! 2. Rebuild the signing string from the live request.
//! 3. Check the signature with a [`keys::VerificationKey`] resolved from the
//!    opaque `keyId`.
//!
//! Supported algorithms are `hmac-sha1`, `hmac-sha256`, `hmac-sha512`,
//! `rsa-sha1`, `rsa-sha256`, `rsa-sha512`, `dsa-sha1` and `dsa-sha256`.
//!
//! # Usage
//!
//! ```rust
//! use httpsig_auth::{StaticKeyProvider, VerificationKey, VerifierConfig, verify_request};
//!
//! let provider = StaticKeyProvider::new(vec![
//!     ("foo".to_owned(), VerificationKey::secret("s3cr3t")),
//! ]);
//! let config = VerifierConfig::default();
//!
//! let request = http::Request::builder().uri("/").body(()).unwrap();
//! // An unsigned request is refused before any key lookup.
//! assert!(verify_request(&request, &provider, &config).is_err());
//! ```
//!
//! # Modules
//!
//! - [`algorithm`] - Supported signature algorithms
//! - [`canonical`] - Signing-string construction
//! - [`config`] - Verifier policy loaded from the environment
//! - [`credentials`] - Key provider trait and in-memory implementation
//! - [`error`] - Authentication error types
//! - [`freshness`] - `date` header clock-skew check
//! - [`header`] - `Authorization` header parsing
//! - [`keys`] - Verification key material
//! - [`request`] - Request-level parse and verify entry points
//! - [`sign`] - Outbound request signing
//! - [`verifier`] - HMAC, RSA and DSA signature checks

pub mod algorithm;
pub mod canonical;
pub mod config;
pub mod credentials;
pub mod error;
pub mod freshness;
pub mod header;
pub mod keys;
pub mod request;
pub mod sign;
pub mod verifier;

#[cfg(test)]
mod testing;

pub use algorithm::{Algorithm, DigestAlgorithm};
pub use canonical::build_signing_string;
pub use config::VerifierConfig;
pub use credentials::{KeyProvider, StaticKeyProvider};
pub use error::AuthError;
pub use header::{ParsedSignature, parse_authorization_header};
pub use keys::VerificationKey;
pub use request::{
    SignatureParams, SignedRequest, parse_request, parse_request_at, verify, verify_request,
};
pub use sign::{RequestSigner, SigningKey, format_http_date};
pub use verifier::verify_signature;
