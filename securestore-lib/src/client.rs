//! The secure storage client.
//!
//! Each operation validates its arguments locally, attaches the serialized
//! options of every platform and performs exactly one remote invocation.
//! The client keeps no copy of stored values; its only state is the default
//! options and default timeout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use securestore_lib::{SecureStorage, PlatformOverrides};
//! use securestore_lib::options::AndroidOptions;
//!
//! let storage = SecureStorage::new(channel)
//!     .with_android_options(AndroidOptions::default().with_key_prefix("vault_"));
//!
//! storage.set("token", "abc123").await?;
//! assert_eq!(storage.get("token").await?, Some("abc123".to_string()));
//!
//! // Per-call override for one platform
//! let overrides = PlatformOverrides::new().with_timeout(Duration::from_secs(2));
//! storage.remove_with("token", &overrides).await?;
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde_json::{Map, Value};

use crate::channel::{ChannelError, RemoteChannel, StorageMethod};
use crate::errors::{json_kind, StorageError};
use crate::options::{
    AndroidOptions, IosOptions, LinuxOptions, MacOsOptions, PlatformOptions, PlatformOverrides,
    WebOptions, WindowsOptions,
};
use crate::Result;

#[derive(Clone, Default)]
struct Defaults {
    options: Arc<PlatformOptions>,
    timeout: Option<Duration>,
}

fn lock_error(context: &str) -> StorageError {
    StorageError::Internal(format!(
        "SecureStorage: defaults lock poisoned during {}",
        context
    ))
}

#[cfg(not(target_arch = "wasm32"))]
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn require_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_argument("key", "must not be empty"));
    }
    Ok(())
}

fn require_string(value: Value) -> Result<String> {
    match value {
        Value::String(value) => Ok(value),
        Value::Null => Err(StorageError::invalid_argument("value", "must not be null")),
        // Never echo the value itself.
        other => Err(StorageError::invalid_argument(
            "value",
            format!("expected a string, got {}", json_kind(&other)),
        )),
    }
}

fn key_arguments(key: &str) -> Map<String, Value> {
    let mut arguments = Map::new();
    arguments.insert("key".to_string(), Value::String(key.to_string()));
    arguments
}

/// Secure key-value storage backed by a host runtime.
pub struct SecureStorage {
    channel: Arc<dyn RemoteChannel>,
    defaults: RwLock<Defaults>,
}

impl SecureStorage {
    /// Create a client with default options for every platform and no timeout.
    pub fn new(channel: Arc<dyn RemoteChannel>) -> Self {
        Self {
            channel,
            defaults: RwLock::new(Defaults::default()),
        }
    }

    fn configure(mut self, update: impl FnOnce(&mut Defaults)) -> Self {
        let defaults = self
            .defaults
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        update(defaults);
        self
    }

    /// Use `options` as the defaults for every platform.
    pub fn with_options(self, options: PlatformOptions) -> Self {
        self.configure(|d| d.options = Arc::new(options))
    }

    /// Use `options` as the Android default.
    pub fn with_android_options(self, options: AndroidOptions) -> Self {
        self.configure(|d| Arc::make_mut(&mut d.options).android = options)
    }

    /// Use `options` as the iOS default.
    pub fn with_ios_options(self, options: IosOptions) -> Self {
        self.configure(|d| Arc::make_mut(&mut d.options).ios = options)
    }

    /// Use `options` as the macOS default.
    pub fn with_macos_options(self, options: MacOsOptions) -> Self {
        self.configure(|d| Arc::make_mut(&mut d.options).macos = options)
    }

    /// Use `options` as the web default.
    pub fn with_web_options(self, options: WebOptions) -> Self {
        self.configure(|d| Arc::make_mut(&mut d.options).web = options)
    }

    /// Use `options` as the Windows default.
    pub fn with_windows_options(self, options: WindowsOptions) -> Self {
        self.configure(|d| Arc::make_mut(&mut d.options).windows = options)
    }

    /// Use `options` as the Linux default.
    pub fn with_linux_options(self, options: LinuxOptions) -> Self {
        self.configure(|d| Arc::make_mut(&mut d.options).linux = options)
    }

    /// Bound every call by `timeout` unless the call sets its own.
    ///
    /// The deadline is forwarded to the channel. Outside wasm32 the client
    /// also waits with `tokio::time::timeout`, so calls must run on a Tokio
    /// runtime with the time driver enabled.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.configure(|d| d.timeout = Some(timeout))
    }

    /// Current default options.
    ///
    /// The returned snapshot is not affected by later replacements.
    pub fn default_options(&self) -> Result<Arc<PlatformOptions>> {
        Ok(self.snapshot("default_options")?.options)
    }

    /// Current default timeout.
    pub fn default_timeout(&self) -> Result<Option<Duration>> {
        Ok(self.snapshot("default_timeout")?.timeout)
    }

    fn snapshot(&self, context: &str) -> Result<Defaults> {
        let defaults = self.defaults.read().map_err(|_| lock_error(context))?;
        Ok(defaults.clone())
    }

    fn replace(&self, context: &str, update: impl FnOnce(&mut PlatformOptions)) -> Result<()> {
        let mut defaults = self.defaults.write().map_err(|_| lock_error(context))?;
        let mut next = PlatformOptions::clone(&defaults.options);
        update(&mut next);
        defaults.options = Arc::new(next);
        Ok(())
    }

    /// Replace the default options of every platform.
    pub fn set_options(&self, options: PlatformOptions) -> Result<()> {
        self.replace("set_options", |d| *d = options)
    }

    /// Replace the Android default.
    pub fn set_android_options(&self, options: AndroidOptions) -> Result<()> {
        self.replace("set_android_options", |d| d.android = options)
    }

    /// Replace the iOS default.
    pub fn set_ios_options(&self, options: IosOptions) -> Result<()> {
        self.replace("set_ios_options", |d| d.ios = options)
    }

    /// Replace the macOS default.
    pub fn set_macos_options(&self, options: MacOsOptions) -> Result<()> {
        self.replace("set_macos_options", |d| d.macos = options)
    }

    /// Replace the web default.
    pub fn set_web_options(&self, options: WebOptions) -> Result<()> {
        self.replace("set_web_options", |d| d.web = options)
    }

    /// Replace the Windows default.
    pub fn set_windows_options(&self, options: WindowsOptions) -> Result<()> {
        self.replace("set_windows_options", |d| d.windows = options)
    }

    /// Replace the Linux default.
    pub fn set_linux_options(&self, options: LinuxOptions) -> Result<()> {
        self.replace("set_linux_options", |d| d.linux = options)
    }

    /// Replace the default timeout (`None` waits indefinitely).
    pub fn set_default_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        let mut defaults = self
            .defaults
            .write()
            .map_err(|_| lock_error("set_default_timeout"))?;
        defaults.timeout = timeout;
        Ok(())
    }

    async fn dispatch(
        &self,
        method: StorageMethod,
        mut arguments: Map<String, Value>,
        overrides: &PlatformOverrides,
    ) -> Result<Value> {
        let defaults = self.snapshot(method.as_str())?;
        arguments.insert(
            "options".to_string(),
            Value::Object(defaults.options.to_wire(overrides)?),
        );
        let timeout = overrides.timeout.or(defaults.timeout);

        #[cfg(feature = "tracing")]
        tracing::debug!(method = %method, timeout = ?timeout, "dispatching");

        let call = self.channel.invoke(method, arguments, timeout);
        #[cfg(target_arch = "wasm32")]
        let reply = call.await;
        #[cfg(not(target_arch = "wasm32"))]
        let reply = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(reply) => reply,
                Err(_) => {
                    return Err(StorageError::Timeout {
                        method,
                        timeout_ms: millis(limit),
                    })
                }
            },
            None => call.await,
        };

        reply.map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(method = %method, "host call failed: {err}");

            match err {
                ChannelError::Timeout { timeout_ms } => {
                    StorageError::Timeout { method, timeout_ms }
                }
                ChannelError::Remote(message) => StorageError::Remote { method, message },
                ChannelError::Disconnected(reason) => StorageError::Remote {
                    method,
                    message: format!("channel disconnected: {}", reason),
                },
            }
        })
    }

    /// Store `value` under `key` using the default options.
    ///
    /// `value` must be a string; `null` and other JSON kinds are rejected
    /// with `InvalidArgument` before anything is dispatched.
    pub async fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.set_with(key, value, &PlatformOverrides::default()).await
    }

    /// Store `value` under `key` with per-call overrides.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, value, overrides)))]
    pub async fn set_with(
        &self,
        key: &str,
        value: impl Into<Value>,
        overrides: &PlatformOverrides,
    ) -> Result<()> {
        require_key(key)?;
        let value = require_string(value.into())?;

        let mut arguments = key_arguments(key);
        arguments.insert("value".to_string(), Value::String(value));
        self.dispatch(StorageMethod::Set, arguments, overrides).await?;
        Ok(())
    }

    /// Read the value stored under `key`; `None` if there is none.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, &PlatformOverrides::default()).await
    }

    /// Read the value stored under `key` with per-call overrides.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, overrides)))]
    pub async fn get_with(
        &self,
        key: &str,
        overrides: &PlatformOverrides,
    ) -> Result<Option<String>> {
        require_key(key)?;

        let method = StorageMethod::Get;
        match self.dispatch(method, key_arguments(key), overrides).await? {
            Value::String(value) => Ok(Some(value)),
            Value::Null => Ok(None),
            other => Err(StorageError::unexpected_reply(method, &other)),
        }
    }

    /// Whether a value is stored under `key`.
    pub async fn contains_key(&self, key: &str) -> Result<bool> {
        self.contains_key_with(key, &PlatformOverrides::default()).await
    }

    /// Whether a value is stored under `key`, with per-call overrides.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, overrides)))]
    pub async fn contains_key_with(
        &self,
        key: &str,
        overrides: &PlatformOverrides,
    ) -> Result<bool> {
        require_key(key)?;

        let method = StorageMethod::ContainsKey;
        match self.dispatch(method, key_arguments(key), overrides).await? {
            Value::Bool(found) => Ok(found),
            Value::Null => Ok(false),
            other => Err(StorageError::unexpected_reply(method, &other)),
        }
    }

    /// Delete the value stored under `key`. Deleting a missing key succeeds.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.remove_with(key, &PlatformOverrides::default()).await
    }

    /// Delete the value stored under `key` with per-call overrides.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, overrides)))]
    pub async fn remove_with(&self, key: &str, overrides: &PlatformOverrides) -> Result<()> {
        require_key(key)?;
        self.dispatch(StorageMethod::Remove, key_arguments(key), overrides)
            .await?;
        Ok(())
    }

    /// Read every entry in the active platform's storage scope.
    pub async fn get_all(&self) -> Result<BTreeMap<String, String>> {
        self.get_all_with(&PlatformOverrides::default()).await
    }

    /// Read every entry with per-call overrides.
    ///
    /// Entries the host reports with a `null` value are skipped.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, overrides)))]
    pub async fn get_all_with(
        &self,
        overrides: &PlatformOverrides,
    ) -> Result<BTreeMap<String, String>> {
        let method = StorageMethod::GetAll;
        let entries = match self.dispatch(method, Map::new(), overrides).await? {
            Value::Object(entries) => entries,
            Value::Null => return Ok(BTreeMap::new()),
            other => return Err(StorageError::unexpected_reply(method, &other)),
        };

        let mut all = BTreeMap::new();
        for (key, value) in entries {
            match value {
                Value::String(value) => {
                    all.insert(key, value);
                }
                Value::Null => {}
                other => return Err(StorageError::unexpected_entry(method, &key, &other)),
            }
        }
        Ok(all)
    }

    /// Keys starting with `prefix`, sorted.
    ///
    /// Filtered locally over a single `get_all` call.
    pub async fn keys_with_prefix(
        &self,
        prefix: &str,
        overrides: &PlatformOverrides,
    ) -> Result<Vec<String>> {
        let all = self.get_all_with(overrides).await?;
        Ok(all
            .into_keys()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    /// Delete every entry in the active platform's storage scope.
    pub async fn clear(&self) -> Result<()> {
        self.clear_with(&PlatformOverrides::default()).await
    }

    /// Delete every entry with per-call overrides.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, overrides)))]
    pub async fn clear_with(&self, overrides: &PlatformOverrides) -> Result<()> {
        self.dispatch(StorageMethod::Clear, Map::new(), overrides).await?;
        Ok(())
    }
}
