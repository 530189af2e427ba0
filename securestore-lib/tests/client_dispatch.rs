//! End-to-end dispatch tests against in-process channels.

use std::sync::Arc;
use std::time::Duration;

use securestore_lib::enums::{KeyCipherAlgorithm, KeychainAccessibility};
use securestore_lib::options::{AndroidOptions, AppleOptions, IosOptions, WebOptions};
use securestore_lib::testing::{MemoryHost, RecordingChannel};
use securestore_lib::{
    ChannelError, Platform, PlatformOverrides, SecureStorage, StorageErrorCode, StorageMethod,
};
use serde_json::{json, Value};

#[tokio::test]
async fn test_set_dispatches_one_call() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    storage.set("token", "abc123").await.unwrap();

    let invocations = channel.invocations();
    assert_eq!(invocations.len(), 1);

    let call = &invocations[0];
    assert_eq!(call.method, StorageMethod::Set);
    assert_eq!(call.key(), Some("token"));
    assert_eq!(call.value(), Some("abc123"));
    assert_eq!(call.timeout, None);

    let options = call.options().unwrap();
    assert_eq!(options.len(), 6);
    for platform in Platform::ALL {
        assert!(
            options[platform.as_str()].is_string(),
            "{} blob should be JSON text",
            platform
        );
    }
}

#[tokio::test]
async fn test_android_blob_matches_default_document() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    storage.set("token", "abc123").await.unwrap();

    let android = channel.last().unwrap().options_for(Platform::Android).unwrap();
    assert_eq!(
        android,
        json!({
            "reset_on_error": true,
            "migrate_on_algorithm_change": true,
            "enforce_biometrics": false,
            "key_cipher_algorithm": "RSA_ECB_OAEPwithSHA_256andMGF1Padding",
            "storage_cipher_algorithm": "AES_GCM_NoPadding",
            "shared_preferences_name": null,
            "preferences_key_prefix": null,
            "biometric_prompt_title": "Authenticate to access",
            "biometric_prompt_subtitle": "Use biometrics or device credentials"
        })
    );
}

#[tokio::test]
async fn test_call_fields_per_method() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    storage.get("a").await.unwrap();
    storage.contains_key("a").await.unwrap();
    storage.remove("a").await.unwrap();
    storage.get_all().await.unwrap();
    storage.clear().await.unwrap();

    let invocations = channel.invocations();
    let methods: Vec<_> = invocations.iter().map(|i| i.method).collect();
    assert_eq!(
        methods,
        vec![
            StorageMethod::Get,
            StorageMethod::ContainsKey,
            StorageMethod::Remove,
            StorageMethod::GetAll,
            StorageMethod::Clear
        ]
    );

    for call in &invocations {
        assert_eq!(call.key().is_some(), call.method.takes_key());
        assert!(call.value().is_none());
        assert!(!call.arguments.contains_key("key_prefix"));
        assert_eq!(call.options().unwrap().len(), 6);
    }
}

#[tokio::test]
async fn test_overrides_apply_to_one_call_only() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    let overrides = PlatformOverrides::new()
        .with_ios(IosOptions::from(
            AppleOptions::default().with_accessibility(KeychainAccessibility::FirstUnlock),
        ))
        .with_timeout(Duration::from_secs(5));
    storage.get_with("a", &overrides).await.unwrap();
    storage.get("a").await.unwrap();

    let invocations = channel.invocations();
    let first = &invocations[0];
    assert_eq!(first.timeout, Some(Duration::from_secs(5)));
    assert_eq!(
        first.options_for(Platform::Ios).unwrap()["accessibility"],
        "first_unlock"
    );
    assert_eq!(
        first.options_for(Platform::MacOs).unwrap()["accessibility"],
        "unlocked"
    );

    let second = &invocations[1];
    assert_eq!(second.timeout, None);
    assert_eq!(
        second.options_for(Platform::Ios).unwrap()["accessibility"],
        "unlocked"
    );
}

#[tokio::test]
async fn test_replaced_defaults_reach_the_wire() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone())
        .with_web_options(WebOptions::default().with_db_name("VaultDb"));

    storage.clear().await.unwrap();
    storage
        .set_android_options(AndroidOptions::default().with_key_cipher(KeyCipherAlgorithm::AesGcm))
        .unwrap();
    storage.clear().await.unwrap();

    let invocations = channel.invocations();
    assert_eq!(
        invocations[0].options_for(Platform::Web).unwrap()["db_name"],
        "VaultDb"
    );
    assert_eq!(
        invocations[0].options_for(Platform::Android).unwrap()["key_cipher_algorithm"],
        "RSA_ECB_OAEPwithSHA_256andMGF1Padding"
    );
    assert_eq!(
        invocations[1].options_for(Platform::Android).unwrap()["key_cipher_algorithm"],
        "AES_GCM_NoPadding"
    );
    assert_eq!(
        invocations[1].options_for(Platform::Web).unwrap()["db_name"],
        "VaultDb"
    );
}

#[tokio::test]
async fn test_null_value_never_dispatched() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    let err = storage.set("token", Value::Null).await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::InvalidArgument);
    assert_eq!(channel.invocation_count(), 0);
}

#[tokio::test]
async fn test_concurrent_sets_each_dispatch() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    let (a, b) = tokio::join!(storage.set("k", "a"), storage.set("k", "b"));
    a.unwrap();
    b.unwrap();

    let invocations = channel.invocations();
    assert_eq!(invocations.len(), 2);
    assert!(invocations
        .iter()
        .all(|i| i.method == StorageMethod::Set && i.key() == Some("k")));
    let mut values: Vec<_> = invocations.iter().filter_map(|i| i.value()).collect();
    values.sort();
    assert_eq!(values, vec!["a", "b"]);
}

#[tokio::test]
async fn test_timeout_when_host_hangs() {
    let channel = RecordingChannel::new();
    channel.hang();
    let storage = SecureStorage::new(channel.clone()).with_timeout(Duration::from_millis(20));

    let err = storage.get("token").await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::Timeout);
    assert!(err.is_retryable());
    assert_eq!(channel.invocation_count(), 1);
    assert_eq!(
        channel.last().unwrap().timeout,
        Some(Duration::from_millis(20))
    );
}

#[tokio::test]
async fn test_channel_errors_are_mapped() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    channel.fail_with(ChannelError::Remote("biometric authentication failed".into()));
    let err = storage.contains_key("token").await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::Remote);
    assert!(err.to_string().contains("biometric authentication failed"));

    channel.fail_with(ChannelError::Timeout { timeout_ms: 100 });
    let err = storage.remove("token").await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::Timeout);

    channel.fail_with(ChannelError::Disconnected("host gone".into()));
    let err = storage.clear().await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::Remote);
    assert!(err.to_string().contains("host gone"));
}

#[tokio::test]
async fn test_call_timeout_beats_client_default() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone()).with_timeout(Duration::from_secs(30));

    let overrides = PlatformOverrides::new().with_timeout(Duration::from_millis(750));
    storage.get_with("token", &overrides).await.unwrap();
    assert_eq!(
        channel.last().unwrap().timeout,
        Some(Duration::from_millis(750))
    );

    storage.get("token").await.unwrap();
    assert_eq!(channel.last().unwrap().timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn test_contains_key_reply_shapes() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    channel.reply_to(StorageMethod::ContainsKey, Value::Null);
    assert!(!storage.contains_key("token").await.unwrap());

    channel.reply_to(StorageMethod::ContainsKey, Value::Bool(true));
    assert!(storage.contains_key("token").await.unwrap());

    channel.reply_to(StorageMethod::ContainsKey, json!("yes"));
    let err = storage.contains_key("token").await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::UnexpectedReply);
    assert_eq!(
        err.to_string(),
        "unexpected reply to contains_key: got a string"
    );
}

#[tokio::test]
async fn test_get_all_reply_shapes() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    channel.reply_to(StorageMethod::GetAll, Value::Null);
    assert!(storage.get_all().await.unwrap().is_empty());

    channel.reply_to(StorageMethod::GetAll, json!(["a", "b"]));
    let err = storage.get_all().await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::UnexpectedReply);
    assert!(err.to_string().contains("an array"));
}

#[tokio::test]
async fn test_unexpected_replies_hide_stored_values() {
    let channel = RecordingChannel::new();
    let storage = SecureStorage::new(channel.clone());

    channel.reply_to(StorageMethod::Get, json!({"secret": "hunter2"}));
    let err = storage.get("token").await.unwrap_err();
    assert_eq!(err.code(), StorageErrorCode::UnexpectedReply);
    assert!(!err.to_string().contains("hunter2"), "{}", err);
    assert!(!format!("{:?}", err).contains("hunter2"));

    channel.reply_to(StorageMethod::GetAll, json!({"ok": "x", "pin": 98765}));
    let err = storage.get_all().await.unwrap_err();
    let message = err.to_string();
    assert!(!message.contains("98765"), "{}", message);
    assert!(message.contains("'pin'"));

    let err = storage.set("count", 31337).await.unwrap_err();
    assert!(!err.to_string().contains("31337"));
}

#[tokio::test]
async fn test_memory_host_round_trip() {
    let host = MemoryHost::new();
    let storage = SecureStorage::new(host.clone());

    assert_eq!(storage.get("never-written").await.unwrap(), None);
    assert!(!storage.contains_key("never-written").await.unwrap());
    storage.remove("never-written").await.unwrap();

    storage.set("vault.token", "abc123").await.unwrap();
    storage.set("vault.refresh", "def456").await.unwrap();
    storage.set("profile", "alice").await.unwrap();

    assert_eq!(
        storage.get("vault.token").await.unwrap(),
        Some("abc123".to_string())
    );
    assert!(storage.contains_key("profile").await.unwrap());

    let all = storage.get_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all["vault.refresh"], "def456");

    let calls_before = host.calls();
    let keys = storage
        .keys_with_prefix("vault.", &PlatformOverrides::new())
        .await
        .unwrap();
    assert_eq!(keys, vec!["vault.refresh", "vault.token"]);
    assert_eq!(host.calls(), calls_before + 1);

    storage.remove("profile").await.unwrap();
    assert_eq!(host.len(), 2);

    storage.clear().await.unwrap();
    assert!(host.is_empty());
    assert!(storage.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shared_client_across_tasks() {
    let host = MemoryHost::new();
    let storage = Arc::new(SecureStorage::new(host.clone()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage.set(&format!("key-{}", i), format!("value-{}", i)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(host.len(), 8);
    assert_eq!(host.calls(), 8);
}
