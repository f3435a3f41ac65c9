//! Typed store handle with automatic serialization.

use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{StoreBackend, StoreError};

/// Type-safe handle over a [`StoreBackend`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`. Cloning is cheap; clones share the
/// same backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StoreBackend>,
}

impl Store {
    /// Wrap a backend.
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Get a value from the store.
    ///
    /// Returns `None` if the key doesn't exist. A stored value that does not
    /// deserialize into `T` is an error; callers decide whether to default.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let lines: Option<Vec<CartLine>> = store.get("buylock:guest_cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// store.set("buylock:guest_cart", &lines)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Get the raw bytes stored under a key.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.backend.get(key)
    }

    /// Store raw bytes under a key, bypassing serialization.
    pub fn set_raw(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.backend.set(key, bytes)
    }

    /// Delete a value from the store. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the store.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.exists(key)
    }

    /// Get all keys in the store.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

/// Helper to build store keys with namespacing.
///
/// # Example
///
/// ```rust
/// use buylock_store::store_key;
///
/// let key = store_key!("buylock", "guest_cart");
/// assert_eq!(key, "buylock:guest_cart");
/// ```
#[macro_export]
macro_rules! store_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: String,
        quantity: u32,
    }

    #[test]
    fn test_set_and_get_typed() {
        let store = Store::new(MemoryBackend::new());
        let lines = vec![Line {
            id: "a".to_string(),
            quantity: 2,
        }];

        store.set("cart", &lines).unwrap();
        let loaded: Option<Vec<Line>> = store.get("cart").unwrap();
        assert_eq!(loaded, Some(lines));
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = Store::new(MemoryBackend::new());
        let value: Option<String> = store.get("nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_malformed_value_is_serialize_error() {
        let store = Store::new(MemoryBackend::new());
        store.set_raw("cart", b"{not json").unwrap();

        let result: Result<Option<Vec<Line>>, _> = store.get("cart");
        assert!(matches!(result, Err(StoreError::Serialize(_))));
    }

    #[test]
    fn test_clones_share_backend() {
        let store = Store::new(MemoryBackend::new());
        let other = store.clone();

        store.set("currency", "EUR").unwrap();
        let code: Option<String> = other.get("currency").unwrap();
        assert_eq!(code.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_store_key_macro() {
        assert_eq!(store_key!("buylock", "currency"), "buylock:currency");
        assert_eq!(store_key!("buylock", "cart", 7), "buylock:cart:7");
    }
}
