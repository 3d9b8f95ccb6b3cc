//! Signature algorithms.
//!
//! Algorithm names are strings on the wire (`hmac-sha256`, `rsa-sha1`, ...)
//! but are parsed into [`Algorithm`] at the boundary so the rest of the crate
//! never re-inspects raw text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Hash function paired with a signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-1.
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Wire suffix of this digest (`sha1`, `sha256`, `sha512`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

/// A supported HTTP Signature algorithm.
///
/// # Examples
///
/// ```
/// use httpsig_auth::algorithm::{Algorithm, DigestAlgorithm};
///
/// let alg: Algorithm = "HMAC-SHA256".parse().unwrap();
/// assert_eq!(alg, Algorithm::Hmac(DigestAlgorithm::Sha256));
/// assert_eq!(alg.to_string(), "hmac-sha256");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    /// Keyed-hash MAC over a shared secret.
    Hmac(DigestAlgorithm),
    /// RSASSA-PKCS1-v1_5.
    Rsa(DigestAlgorithm),
    /// DSA with a DER-encoded `(r, s)` signature.
    Dsa(DigestAlgorithm),
}

/// Every algorithm accepted on the wire.
pub const SUPPORTED_ALGORITHMS: &[Algorithm] = &[
    Algorithm::Hmac(DigestAlgorithm::Sha1),
    Algorithm::Hmac(DigestAlgorithm::Sha256),
    Algorithm::Hmac(DigestAlgorithm::Sha512),
    Algorithm::Rsa(DigestAlgorithm::Sha1),
    Algorithm::Rsa(DigestAlgorithm::Sha256),
    Algorithm::Rsa(DigestAlgorithm::Sha512),
    Algorithm::Dsa(DigestAlgorithm::Sha1),
    Algorithm::Dsa(DigestAlgorithm::Sha256),
];

impl Algorithm {
    /// The digest half of the algorithm.
    #[must_use]
    pub fn digest(self) -> DigestAlgorithm {
        match self {
            Self::Hmac(digest) | Self::Rsa(digest) | Self::Dsa(digest) => digest,
        }
    }

    /// Whether this algorithm uses a shared secret.
    #[must_use]
    pub fn is_symmetric(self) -> bool {
        matches!(self, Self::Hmac(_))
    }

    fn family(self) -> &'static str {
        match self {
            Self::Hmac(_) => "hmac",
            Self::Rsa(_) => "rsa",
            Self::Dsa(_) => "dsa",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.family(), self.digest().as_str())
    }
}

impl FromStr for Algorithm {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        SUPPORTED_ALGORITHMS
            .iter()
            .copied()
            .find(|alg| alg.to_string() == lower)
            .ok_or_else(|| AuthError::UnsupportedAlgorithm(s.to_owned()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = AuthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.to_string()
    }
}
