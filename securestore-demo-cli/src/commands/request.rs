//! Request command - show what a storage operation dispatches

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use securestore_lib::{
    ChannelError, PlatformOptions, PlatformOverrides, RemoteChannel, SecureStorage,
    StorageMethod,
};
use serde_json::{json, Map, Value};

use crate::ui;

/// Captures the dispatched request instead of sending it anywhere.
#[derive(Default)]
struct DryRunChannel {
    captured: Mutex<Option<Value>>,
}

#[async_trait]
impl RemoteChannel for DryRunChannel {
    async fn invoke(
        &self,
        method: StorageMethod,
        arguments: Map<String, Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, ChannelError> {
        let request = json!({
            "method": method.as_str(),
            "arguments": arguments,
            "timeout_ms": timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
        });
        *self.captured.lock().unwrap_or_else(PoisonError::into_inner) = Some(request);
        Ok(Value::Null)
    }
}

pub async fn run(
    options: PlatformOptions,
    method: StorageMethod,
    key: Option<&str>,
    value: Option<String>,
    timeout_ms: Option<u64>,
    verbose: bool,
) -> Result<()> {
    let channel = Arc::new(DryRunChannel::default());
    let storage = SecureStorage::new(channel.clone()).with_options(options);

    let mut overrides = PlatformOverrides::new();
    if let Some(ms) = timeout_ms {
        overrides = overrides.with_timeout(Duration::from_millis(ms));
    }

    let key = key.unwrap_or_default();
    match method {
        StorageMethod::Set => storage.set_with(key, value, &overrides).await?,
        StorageMethod::Get => {
            storage.get_with(key, &overrides).await?;
        }
        StorageMethod::ContainsKey => {
            storage.contains_key_with(key, &overrides).await?;
        }
        StorageMethod::Remove => storage.remove_with(key, &overrides).await?,
        StorageMethod::GetAll => {
            storage.get_all_with(&overrides).await?;
        }
        StorageMethod::Clear => storage.clear_with(&overrides).await?,
    }

    let captured = channel
        .captured
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    match captured {
        Some(request) => {
            ui::header(&format!("{} request", method));
            if verbose {
                ui::json(&request);
            } else {
                println!("{}", request);
            }
        }
        None => ui::info("Nothing was dispatched"),
    }

    Ok(())
}
