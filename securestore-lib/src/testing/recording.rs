//! A channel that records what the client sends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::channel::{ChannelError, Platform, RemoteChannel, StorageMethod};

/// One recorded call.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    /// Method invoked.
    pub method: StorageMethod,
    /// Argument map as sent.
    pub arguments: Map<String, Value>,
    /// Timeout forwarded with the call.
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// The `key` argument, if present.
    pub fn key(&self) -> Option<&str> {
        self.arguments.get("key").and_then(Value::as_str)
    }

    /// The `value` argument, if present.
    pub fn value(&self) -> Option<&str> {
        self.arguments.get("value").and_then(Value::as_str)
    }

    /// The `options` map, if present.
    pub fn options(&self) -> Option<&Map<String, Value>> {
        self.arguments.get("options").and_then(Value::as_object)
    }

    /// The options blob for `platform`, decoded from its JSON text.
    pub fn options_for(&self, platform: Platform) -> Option<Value> {
        let text = self.options()?.get(platform.as_str())?.as_str()?;
        serde_json::from_str(text).ok()
    }
}

/// Records invocations and replies from a per-method script.
///
/// Unscripted methods reply `null`, which every operation accepts as its
/// empty outcome.
#[derive(Default)]
pub struct RecordingChannel {
    invocations: Mutex<Vec<Invocation>>,
    replies: Mutex<HashMap<StorageMethod, Value>>,
    failure: Mutex<Option<ChannelError>>,
    hang: AtomicBool,
}

impl RecordingChannel {
    /// Create a new recording channel.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reply `reply` to every later call of `method`.
    pub fn reply_to(&self, method: StorageMethod, reply: Value) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method, reply);
    }

    /// Fail every later call with `error` (still recording it).
    pub fn fail_with(&self, error: ChannelError) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Never reply to later calls.
    pub fn hang(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }

    /// All invocations so far, in arrival order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of invocations so far.
    pub fn invocation_count(&self) -> usize {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The most recent invocation.
    pub fn last(&self) -> Option<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl RemoteChannel for RecordingChannel {
    async fn invoke(
        &self,
        method: StorageMethod,
        arguments: Map<String, Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, ChannelError> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation {
                method,
                arguments,
                timeout,
            });

        if self.hang.load(Ordering::SeqCst) {
            return std::future::pending().await;
        }
        if let Some(error) = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        let replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(replies.get(&method).cloned().unwrap_or(Value::Null))
    }
}
