//! Verification keys.
//!
//! A [`VerificationKey`] is either a shared HMAC secret or a public key.
//! Public keys are read from PEM: `RSA PUBLIC KEY` (PKCS#1) for RSA, or
//! `PUBLIC KEY` (SubjectPublicKeyInfo) for RSA and DSA.

use std::fmt;

use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;

use crate::algorithm::Algorithm;
use crate::error::AuthError;

const PEM_BOUNDARY: &str = "-----BEGIN ";

/// Key material used to check a signature.
#[derive(Clone)]
pub enum VerificationKey {
    /// Shared secret for the HMAC family.
    Secret(Vec<u8>),
    /// RSA public key.
    Rsa(RsaPublicKey),
    /// DSA public key.
    Dsa(dsa::VerifyingKey),
}

impl VerificationKey {
    /// Wrap a shared HMAC secret.
    pub fn secret(secret: impl AsRef<[u8]>) -> Self {
        Self::Secret(secret.as_ref().to_vec())
    }

    /// Decode a PEM-encoded RSA or DSA public key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEncoding`] if the text is not PEM, and
    /// [`AuthError::InvalidKeyOrSignature`] if the PEM block does not hold a
    /// supported public key.
    pub fn from_pem(pem_text: &str) -> Result<Self, AuthError> {
        let block = parse_pem(pem_text)?;
        match block.tag() {
            "RSA PUBLIC KEY" => RsaPublicKey::from_pkcs1_der(block.contents())
                .map(Self::Rsa)
                .map_err(|_| AuthError::InvalidKeyOrSignature("malformed RSA public key")),
            "PUBLIC KEY" => {
                if let Ok(key) = RsaPublicKey::from_public_key_der(block.contents()) {
                    return Ok(Self::Rsa(key));
                }
                dsa::VerifyingKey::from_public_key_der(block.contents())
                    .map(Self::Dsa)
                    .map_err(|_| AuthError::InvalidKeyOrSignature("unsupported public key"))
            }
            _ => Err(AuthError::InvalidKeyOrSignature("unsupported PEM block")),
        }
    }

    /// Build the key an `algorithm` expects from textual material: the raw
    /// secret for HMAC, a PEM public key otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlgorithmKeyMismatch`] if PEM is given for HMAC,
    /// a plain secret is given for RSA or DSA, or the PEM holds a key of
    /// another family. Otherwise any error of [`VerificationKey::from_pem`].
    pub fn from_material(algorithm: Algorithm, material: &str) -> Result<Self, AuthError> {
        let looks_like_pem = material.contains(PEM_BOUNDARY);
        let key = match (algorithm.is_symmetric(), looks_like_pem) {
            (true, false) => Self::secret(material),
            (false, true) => Self::from_pem(material)?,
            (_, is_pem) => {
                return Err(AuthError::AlgorithmKeyMismatch {
                    algorithm: algorithm.to_string(),
                    key_type: if is_pem { "pem" } else { "secret" },
                });
            }
        };
        key.check_algorithm(algorithm)?;
        Ok(key)
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

    /// Fail unless this key belongs to the family of `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlgorithmKeyMismatch`] on disagreement.
    pub fn check_algorithm(&self, algorithm: Algorithm) -> Result<(), AuthError> {
        let matches = matches!(
            (algorithm, self),
            (Algorithm::Hmac(_), Self::Secret(_))
                | (Algorithm::Rsa(_), Self::Rsa(_))
                | (Algorithm::Dsa(_), Self::Dsa(_))
        );
        if matches {
            Ok(())
        } else {
            Err(AuthError::AlgorithmKeyMismatch {
                algorithm: algorithm.to_string(),
                key_type: self.key_type(),
            })
        }
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret(_) => f.write_str("VerificationKey::Secret(..)"),
            Self::Rsa(key) => f
                .debug_struct("VerificationKey::Rsa")
                .field("bits", &(key.size() * 8))
                .finish(),
            Self::Dsa(_) => f.write_str("VerificationKey::Dsa(..)"),
        }
    }
}

/// Parse a PEM block, tolerating surrounding whitespace and non-standard
/// line wrapping.
pub(crate) fn parse_pem(pem_text: &str) -> Result<pem::Pem, AuthError> {
    pem::parse(pem_text.trim().as_bytes()).map_err(|_| AuthError::InvalidEncoding("key"))
}
