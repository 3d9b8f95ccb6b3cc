//! Request signing.
//!
//! The inverse of verification: build the signing string for a request,
//! sign it, and render the `Authorization` header value.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};

use crate::algorithm::{Algorithm, DigestAlgorithm};
use crate::canonical::build_signing_string;
use crate::error::AuthError;
use crate::freshness::HTTP_DATE_FORMAT;
use crate::header::{DEFAULT_HEADERS, ParsedSignature};
use crate::keys::parse_pem;
use crate::request::SignedRequest;
use crate::verifier::compute_hmac;

/// Key material used to produce a signature.
#[derive(Clone)]
pub enum SigningKey {
    /// Shared secret for the HMAC family.
    Secret(Vec<u8>),
    /// RSA private key.
    Rsa(Box<RsaPrivateKey>),
    /// DSA private key.
    Dsa(dsa::SigningKey),
}

impl SigningKey {
    /// Wrap a shared HMAC secret.
    pub fn secret(secret: impl AsRef<[u8]>) -> Self {
        Self::Secret(secret.as_ref().to_vec())
    }

    /// Decode a PEM-encoded private key: `RSA PRIVATE KEY` (PKCS#1) or
    /// `PRIVATE KEY` (PKCS#8, RSA or DSA).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEncoding`] if the text is not PEM, and
    /// [`AuthError::InvalidKeyOrSignature`] for any other private key.
    pub fn from_pem(pem_text: &str) -> Result<Self, AuthError> {
        let block = parse_pem(pem_text)?;
        match block.tag() {
            "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(block.contents())
                .map(|key| Self::Rsa(Box::new(key)))
                .map_err(|_| AuthError::InvalidKeyOrSignature("malformed RSA private key")),
            "PRIVATE KEY" => {
                if let Ok(key) = RsaPrivateKey::from_pkcs8_der(block.contents()) {
                    return Ok(Self::Rsa(Box::new(key)));
                }
                dsa::SigningKey::from_pkcs8_der(block.contents())
                    .map(Self::Dsa)
                    .map_err(|_| AuthError::InvalidKeyOrSignature("unsupported private key"))
            }
            _ => Err(AuthError::InvalidKeyOrSignature("unsupported PEM block")),
        }
    }

    /// Short name of the key family (`secret`, `rsa`, `dsa`).
    #[must_use]
    pub fn key_type(&self) -> &'static str {
        match self {
            Self::Secret(_) => "secret",
            Self::Rsa(_) => "rsa",
            Self::Dsa(_) => "dsa",
        }
    }

    /// Sign `message` with `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlgorithmKeyMismatch`] if the key family does not
    /// match, and [`AuthError::SigningFailed`] if the primitive fails.
    pub fn sign(&self, algorithm: Algorithm, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        match (algorithm, self) {
            (Algorithm::Hmac(digest), Self::Secret(secret)) => {
                compute_hmac(digest, secret, message)
            }
            (Algorithm::Rsa(digest), Self::Rsa(key)) => sign_rsa(digest, key, message),
            (Algorithm::Dsa(digest), Self::Dsa(key)) => sign_dsa(digest, key, message),
            (algorithm, key) => Err(AuthError::AlgorithmKeyMismatch {
                algorithm: algorithm.to_string(),
                key_type: key.key_type(),
            }),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey::{}(..)", self.key_type())
    }
}

fn sign_rsa(
    digest: DigestAlgorithm,
    key: &RsaPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, AuthError> {
    let signature = match digest {
        DigestAlgorithm::Sha1 => RsaSigningKey::<Sha1>::new(key.clone()).try_sign(message),
        DigestAlgorithm::Sha256 => RsaSigningKey::<Sha256>::new(key.clone()).try_sign(message),
        DigestAlgorithm::Sha512 => RsaSigningKey::<Sha512>::new(key.clone()).try_sign(message),
    }
    .map_err(|_| AuthError::SigningFailed)?;
    Ok(signature.to_vec())
}

fn sign_dsa(
    digest: DigestAlgorithm,
    key: &dsa::SigningKey,
    message: &[u8],
) -> Result<Vec<u8>, AuthError> {
    use dsa::signature::DigestSigner;

    let signature: dsa::Signature = match digest {
        DigestAlgorithm::Sha1 => key.try_sign_digest(Sha1::new_with_prefix(message)),
        DigestAlgorithm::Sha256 => key.try_sign_digest(Sha256::new_with_prefix(message)),
        DigestAlgorithm::Sha512 => key.try_sign_digest(Sha512::new_with_prefix(message)),
    }
    .map_err(|_| AuthError::SigningFailed)?;
    Ok(signature.to_vec())
}

/// Signs outbound requests for one key.
///
/// # Examples
///
/// ```
/// use httpsig_auth::algorithm::{Algorithm, DigestAlgorithm};
/// use httpsig_auth::sign::{RequestSigner, SigningKey};
///
/// let signer = RequestSigner::new(
///     "foo",
///     Algorithm::Hmac(DigestAlgorithm::Sha1),
///     SigningKey::secret("s3cr3t"),
/// );
/// let request = http::Request::builder()
///     .header("date", "Tue, 07 Jun 2011 20:51:35 GMT")
///     .body(())
///     .unwrap();
/// let value = signer.authorization_header(&request).unwrap();
/// assert_eq!(
///     value,
///     r#"Signature keyId="foo",algorithm="hmac-sha1",headers="date",signature="fjHgZR3SrwJxDkG3mGQW9Rl1ZZo=""#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RequestSigner {
    key_id: String,
    algorithm: Algorithm,
    headers: Vec<String>,
    key: SigningKey,
}

impl RequestSigner {
    /// Create a signer covering only `date`.
    pub fn new(key_id: impl Into<String>, algorithm: Algorithm, key: SigningKey) -> Self {
        Self {
            key_id: key_id.into(),
            algorithm,
            headers: DEFAULT_HEADERS.iter().map(|&h| h.to_owned()).collect(),
            key,
        }
    }

    /// Cover `headers` (in order) instead of the default.
    #[must_use]
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.headers = headers
            .into_iter()
            .map(|h| h.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    /// Sign `request` and return the parsed form of the resulting header.
    ///
    /// # Errors
    ///
    /// Returns any error of the signing-string builder or of
    /// [`SigningKey::sign`].
    pub fn sign<R>(&self, request: &R) -> Result<ParsedSignature, AuthError>
    where
        R: SignedRequest + ?Sized,
    {
        let signing_string = build_signing_string(&self.headers, request)?;
        let signature = self.key.sign(self.algorithm, signing_string.as_bytes())?;
        Ok(ParsedSignature {
            key_id: self.key_id.clone(),
            algorithm: self.algorithm,
            headers: self.headers.clone(),
            signature,
        })
    }

    /// Sign `request` and render the `Authorization` header value.
    ///
    /// # Errors
    ///
    /// See [`RequestSigner::sign`].
    pub fn authorization_header<R>(&self, request: &R) -> Result<String, AuthError>
    where
        R: SignedRequest + ?Sized,
    {
        self.sign(request).map(|parsed| parsed.to_header_value())
    }

    /// Base64 signature over an already-built signing string.
    ///
    /// # Errors
    ///
    /// See [`SigningKey::sign`].
    pub fn sign_string(&self, signing_string: &str) -> Result<String, AuthError> {
        let signature = self.key.sign(self.algorithm, signing_string.as_bytes())?;
        Ok(BASE64.encode(signature))
    }
}

/// Format `time` as an IMF-fixdate suitable for a `Date` header.
#[must_use]
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}
