//! The boundary with the host runtime that performs the actual storage.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Remote method names understood by the host storage plugin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageMethod {
    /// Write a value.
    Set,
    /// Read a value.
    Get,
    /// Check for a key.
    ContainsKey,
    /// Delete a key.
    Remove,
    /// Read every entry.
    GetAll,
    /// Delete every entry.
    Clear,
}

impl StorageMethod {
    /// All methods, in dispatch-table order.
    pub const ALL: &'static [Self] = &[
        Self::Set,
        Self::Get,
        Self::ContainsKey,
        Self::Remove,
        Self::GetAll,
        Self::Clear,
    ];

    /// Name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Get => "get",
            Self::ContainsKey => "contains_key",
            Self::Remove => "remove",
            Self::GetAll => "get_all",
            Self::Clear => "clear",
        }
    }

    /// Whether the method addresses a single key.
    pub fn takes_key(&self) -> bool {
        matches!(self, Self::Set | Self::Get | Self::ContainsKey | Self::Remove)
    }
}

impl fmt::Display for StorageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target platforms, each contributing one options blob to every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    /// Android keystore / encrypted shared preferences.
    Android,
    /// iOS keychain.
    Ios,
    /// macOS keychain.
    MacOs,
    /// Browser IndexedDB with WebCrypto.
    Web,
    /// Windows credential storage.
    Windows,
    /// Linux secret service.
    Linux,
}

impl Platform {
    /// All platforms, in wire order.
    pub const ALL: &'static [Self] = &[
        Self::Android,
        Self::Ios,
        Self::MacOs,
        Self::Web,
        Self::Windows,
        Self::Linux,
    ];

    /// Key of this platform's blob in the `options` map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::MacOs => "macos",
            Self::Web => "web",
            Self::Windows => "windows",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a channel implementation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The host did not answer within the deadline.
    #[error("no reply within {timeout_ms}ms")]
    Timeout {
        /// Deadline in milliseconds
        timeout_ms: u64,
    },
    /// The host executed the call and reported a failure.
    #[error("{0}")]
    Remote(String),
    /// The host is unreachable.
    #[error("channel disconnected: {0}")]
    Disconnected(String),
}

/// Remote invocation channel to the host runtime.
///
/// One call to [`invoke`](RemoteChannel::invoke) is one request and one reply.
/// The host picks the options blob for the platform it runs on.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait RemoteChannel: Send + Sync {
    /// Invokes `method` with `arguments` and waits for the single reply.
    ///
    /// `timeout` is forwarded so hosts that support deadlines can enforce them
    /// on their side as well.
    async fn invoke(
        &self,
        method: StorageMethod,
        arguments: Map<String, Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, ChannelError>;
}
