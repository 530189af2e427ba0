//! In-memory fake of the host storage plugin.
//!
//! Interprets the six storage methods against a map, the way the host would
//! against the platform keychain. Entries are not encrypted and are lost
//! when the host is dropped.
//!
//! # Thread Safety
//!
//! Uses `RwLock` for thread-safe access. Lock poisoning is reported as a
//! remote error rather than panicking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::channel::{ChannelError, Platform, RemoteChannel, StorageMethod};

fn lock_error(context: &str) -> ChannelError {
    ChannelError::Remote(format!("MemoryHost: lock poisoned during {}", context))
}

fn require_str<'a>(
    arguments: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, ChannelError> {
    arguments
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ChannelError::Remote(format!("missing string argument '{}'", field)))
}

/// Every platform blob must be present and decode to a JSON object.
fn check_options(arguments: &Map<String, Value>) -> Result<(), ChannelError> {
    let options = arguments
        .get("options")
        .and_then(Value::as_object)
        .ok_or_else(|| ChannelError::Remote("missing options".to_string()))?;

    for platform in Platform::ALL {
        let text = options
            .get(platform.as_str())
            .and_then(Value::as_str)
            .ok_or_else(|| ChannelError::Remote(format!("missing options for {}", platform)))?;
        let decoded: Value = serde_json::from_str(text)
            .map_err(|e| ChannelError::Remote(format!("bad {} options: {}", platform, e)))?;
        if !decoded.is_object() {
            return Err(ChannelError::Remote(format!(
                "{} options are not an object",
                platform
            )));
        }
    }
    Ok(())
}

/// A fake host keeping entries in memory.
#[derive(Default)]
pub struct MemoryHost {
    entries: RwLock<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl MemoryHost {
    /// Create a new empty host.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of stored entries.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the host holds no entries.
    ///
    /// Returns true if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }

    /// Number of invocations handled, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn handle(
        &self,
        method: StorageMethod,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ChannelError> {
        check_options(arguments)?;

        match method {
            StorageMethod::Set => {
                let key = require_str(arguments, "key")?;
                let value = require_str(arguments, "value")?;
                let mut entries = self.entries.write().map_err(|_| lock_error("set"))?;
                entries.insert(key.to_string(), value.to_string());
                Ok(Value::Null)
            }
            StorageMethod::Get => {
                let key = require_str(arguments, "key")?;
                let entries = self.entries.read().map_err(|_| lock_error("get"))?;
                Ok(entries
                    .get(key)
                    .map(|v| Value::String(v.clone()))
                    .unwrap_or(Value::Null))
            }
            StorageMethod::ContainsKey => {
                let key = require_str(arguments, "key")?;
                let entries = self.entries.read().map_err(|_| lock_error("contains_key"))?;
                Ok(Value::Bool(entries.contains_key(key)))
            }
            StorageMethod::Remove => {
                let key = require_str(arguments, "key")?;
                let mut entries = self.entries.write().map_err(|_| lock_error("remove"))?;
                entries.remove(key);
                Ok(Value::Null)
            }
            StorageMethod::GetAll => {
                let entries = self.entries.read().map_err(|_| lock_error("get_all"))?;
                Ok(Value::Object(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect(),
                ))
            }
            StorageMethod::Clear => {
                let mut entries = self.entries.write().map_err(|_| lock_error("clear"))?;
                entries.clear();
                Ok(Value::Null)
            }
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl RemoteChannel for MemoryHost {
    async fn invoke(
        &self,
        method: StorageMethod,
        arguments: Map<String, Value>,
        _timeout: Option<Duration>,
    ) -> Result<Value, ChannelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.handle(method, &arguments)
    }
}
