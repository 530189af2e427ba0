//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use securestore_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Client: `SecureStorage`, `PlatformOverrides`
//! - Options records and the `OptionsRecord` trait
//! - Enumerations used by the options
//! - Error types: `StorageError`, `StorageErrorCode`, `Result`
//! - Channel trait: `RemoteChannel`

// Client
pub use crate::client::SecureStorage;

// Options
pub use crate::options::{
    AndroidOptions, AppleOptions, IosOptions, LinuxOptions, MacOsOptions, OptionsRecord,
    PlatformOptions, PlatformOverrides, WebOptions, WindowsOptions,
};

// Vocabularies
pub use crate::enums::{
    AccessControlFlag, KeyCipherAlgorithm, KeychainAccessibility, StorageCipherAlgorithm,
};

// Error handling
pub use crate::errors::{StorageError, StorageErrorCode};
pub use crate::Result;

// Host boundary
pub use crate::channel::{ChannelError, Platform, RemoteChannel, StorageMethod};
