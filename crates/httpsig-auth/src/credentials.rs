//! Key provider trait and implementations.
//!
//! The header carries an opaque `keyId`; a [`KeyProvider`] turns it into the
//! [`VerificationKey`] to check the signature with. [`StaticKeyProvider`] is
//! an in-memory implementation for tests and small deployments.

use std::collections::HashMap;

use crate::error::AuthError;
use crate::keys::VerificationKey;

/// Trait for resolving verification keys by `keyId`.
///
/// Implementations may back this with a database, a configuration file, or a
/// remote key document.
pub trait KeyProvider: Send + Sync {
    /// Retrieve the key for the given `keyId`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::KeyNotFound`] if the `keyId` is not recognized.
    fn get_key(&self, key_id: &str) -> Result<VerificationKey, AuthError>;
}

/// A simple in-memory key provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use httpsig_auth::credentials::{KeyProvider, StaticKeyProvider};
/// use httpsig_auth::keys::VerificationKey;
///
/// let provider = StaticKeyProvider::new(vec![
///     ("foo".to_owned(), VerificationKey::secret("s3cr3t")),
/// ]);
///
/// assert!(provider.get_key("foo").is_ok());
/// assert!(provider.get_key("bar").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticKeyProvider {
    keys: HashMap<String, VerificationKey>,
}

impl StaticKeyProvider {
    /// Create a provider from `(key_id, key)` pairs.
    pub fn new(keys: impl IntoIterator<Item = (String, VerificationKey)>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Register or replace the key for `key_id`.
    pub fn insert(&mut self, key_id: impl Into<String>, key: VerificationKey) {
        self.keys.insert(key_id.into(), key);
    }
}

impl KeyProvider for StaticKeyProvider {
    fn get_key(&self, key_id: &str) -> Result<VerificationKey, AuthError> {
        self.keys
            .get(key_id)
            .cloned()
            .ok_or_else(|| AuthError::KeyNotFound(key_id.to_owned()))
    }
}
