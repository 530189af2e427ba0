//! Secure storage client library.
//!
//! This crate does no cryptography and touches no keychain itself. It types
//! the per-platform options of a host secure-storage plugin, serializes them
//! to the JSON the host expects, and forwards every storage operation as one
//! remote invocation over an injected [`RemoteChannel`].
//!
//! # Features
//!
//! - **Typed options**: one record per platform (Android, iOS, macOS, web,
//!   Windows, Linux) with the host's defaults
//! - **Single wire format**: every record serializes through one code path
//! - **Channel abstraction**: trait-based host boundary, faked in-process by
//!   the [`testing`] module
//!
//! # Example
//!
//! ```
//! use securestore_lib::options::{AndroidOptions, OptionsRecord};
//!
//! let json = AndroidOptions::default().to_json().unwrap();
//! assert!(json.starts_with(r#"{"reset_on_error":true"#));
//! ```

pub mod channel;
mod client;
pub mod enums;
pub mod errors;
pub mod options;
pub mod prelude;
pub mod testing;

pub use channel::{ChannelError, Platform, RemoteChannel, StorageMethod};
pub use client::SecureStorage;
pub use errors::{StorageError, StorageErrorCode};
pub use options::{PlatformOptions, PlatformOverrides};

/// Common result alias for secure storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
