//! Web options.
//!
//! The browser host keeps entries in IndexedDB, encrypted with WebCrypto.
//! `wrap_key`/`wrap_key_iv` let the application supply the key-wrapping
//! material; empty strings leave the host to generate its own.

use serde::{Deserialize, Serialize};

/// Options for browser storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebOptions {
    /// IndexedDB database name.
    pub db_name: String,
    /// Name of the stored public key entry.
    pub public_key: String,
    /// Application-supplied wrapping key.
    pub wrap_key: String,
    /// IV for the wrapping key.
    pub wrap_key_iv: String,
    /// Keep entries for the browser session only.
    pub use_session_storage: bool,
}

impl Default for WebOptions {
    fn default() -> Self {
        Self {
            db_name: "FlutterEncryptedStorage".to_string(),
            public_key: "FlutterSecureStorage".to_string(),
            wrap_key: String::new(),
            wrap_key_iv: String::new(),
            use_session_storage: false,
        }
    }
}

impl WebOptions {
    /// Use a specific IndexedDB database.
    pub fn with_db_name(mut self, name: impl Into<String>) -> Self {
        self.db_name = name.into();
        self
    }

    /// Supply the wrapping key and its IV.
    pub fn with_wrap_key(mut self, key: impl Into<String>, iv: impl Into<String>) -> Self {
        self.wrap_key = key.into();
        self.wrap_key_iv = iv.into();
        self
    }

    /// Keep entries for the browser session only.
    pub fn session_only(mut self) -> Self {
        self.use_session_storage = true;
        self
    }
}
