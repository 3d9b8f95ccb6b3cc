//! Signature verification for the HMAC, RSA and DSA families.
//!
//! A signature that is well-formed but wrong yields `Ok(false)`. Errors are
//! reserved for inputs that cannot be checked at all: a key of the wrong
//! family, an empty secret, or signature bytes with an impossible shape.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use rsa::RsaPublicKey;
use rsa::pkcs1v15::{Signature as RsaSignature, VerifyingKey as RsaVerifyingKey};
use rsa::signature::Verifier;
use rsa::traits::PublicKeyParts;
use sha1::{Digest, Sha1};
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::algorithm::{Algorithm, DigestAlgorithm};
use crate::error::AuthError;
use crate::keys::VerificationKey;

/// Check `signature` over `signing_string` with `algorithm` and `key`.
///
/// # Errors
///
/// Returns an [`AuthError`] if:
/// - The key family does not match the algorithm
/// - The HMAC secret is empty
/// - The RSA signature length differs from the key size
/// - The DSA signature is not a DER `(r, s)` sequence
pub fn verify_signature(
    signing_string: &str,
    algorithm: Algorithm,
    signature: &[u8],
    key: &VerificationKey,
) -> Result<bool, AuthError> {
    let message = signing_string.as_bytes();

    let valid = match (algorithm, key) {
        (Algorithm::Hmac(digest), VerificationKey::Secret(secret)) => {
            let expected = compute_hmac(digest, secret, message)?;
            expected.ct_eq(signature).into()
        }
        (Algorithm::Rsa(digest), VerificationKey::Rsa(public_key)) => {
            verify_rsa(digest, public_key, message, signature)?
        }
        (Algorithm::Dsa(digest), VerificationKey::Dsa(public_key)) => {
            verify_dsa(digest, public_key, message, signature)?
        }
        (algorithm, key) => {
            return Err(AuthError::AlgorithmKeyMismatch {
                algorithm: algorithm.to_string(),
                key_type: key.key_type(),
            });
        }
    };

    debug!(%algorithm, valid, "Checked signature");
    Ok(valid)
}

/// Compute the HMAC of `message` under `secret`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidKeyOrSignature`] for an empty secret.
pub(crate) fn compute_hmac(
    digest: DigestAlgorithm,
    secret: &[u8],
    message: &[u8],
) -> Result<Vec<u8>, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidKeyOrSignature("empty HMAC secret"));
    }
    match digest {
        DigestAlgorithm::Sha1 => mac::<Hmac<Sha1>>(secret, message),
        DigestAlgorithm::Sha256 => mac::<Hmac<Sha256>>(secret, message),
        DigestAlgorithm::Sha512 => mac::<Hmac<Sha512>>(secret, message),
    }
}

fn mac<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, AuthError> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|_| AuthError::InvalidKeyOrSignature("invalid HMAC key"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn verify_rsa(
    digest: DigestAlgorithm,
    public_key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, AuthError> {
    if signature.len() != public_key.size() {
        return Err(AuthError::InvalidKeyOrSignature(
            "RSA signature length does not match key size",
        ));
    }
    let signature = RsaSignature::try_from(signature)
        .map_err(|_| AuthError::InvalidKeyOrSignature("malformed RSA signature"))?;

    let result = match digest {
        DigestAlgorithm::Sha1 => {
            RsaVerifyingKey::<Sha1>::new(public_key.clone()).verify(message, &signature)
        }
        DigestAlgorithm::Sha256 => {
            RsaVerifyingKey::<Sha256>::new(public_key.clone()).verify(message, &signature)
        }
        DigestAlgorithm::Sha512 => {
            RsaVerifyingKey::<Sha512>::new(public_key.clone()).verify(message, &signature)
        }
    };
    Ok(result.is_ok())
}

fn verify_dsa(
    digest: DigestAlgorithm,
    public_key: &dsa::VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> Result<bool, AuthError> {
    use dsa::signature::DigestVerifier;

    let signature = dsa::Signature::try_from(signature)
        .map_err(|_| AuthError::InvalidKeyOrSignature("malformed DSA signature"))?;

    let result = match digest {
        DigestAlgorithm::Sha1 => {
            public_key.verify_digest(Sha1::new_with_prefix(message), &signature)
        }
        DigestAlgorithm::Sha256 => {
            public_key.verify_digest(Sha256::new_with_prefix(message), &signature)
        }
        DigestAlgorithm::Sha512 => {
            public_key.verify_digest(Sha512::new_with_prefix(message), &signature)
        }
    };
    Ok(result.is_ok())
}
