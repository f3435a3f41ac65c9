//! Durable key-value storage for BuyLock client state.
//!
//! Plays the role browser storage plays for the web storefront: small JSON
//! documents under well-known keys, read and written synchronously.
//!
//! # Example
//!
//! ```rust
//! use buylock_store::{store_key, MemoryBackend, Store};
//!
//! let store = Store::new(MemoryBackend::new());
//! let key = store_key!("buylock", "currency");
//!
//! store.set(&key, &"USD").unwrap();
//! let code: Option<String> = store.get(&key).unwrap();
//! assert_eq!(code.as_deref(), Some("USD"));
//!
//! store.delete(&key).unwrap();
//! assert!(!store.exists(&key).unwrap());
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileBackend, MemoryBackend, StoreBackend};
pub use error::StoreError;
pub use kv::Store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileBackend, MemoryBackend, Store, StoreBackend, StoreError};
}
