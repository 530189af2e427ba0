//! Session command - scripted walk through every storage operation

use anyhow::{ensure, Result};
use securestore_lib::testing::MemoryHost;
use securestore_lib::{PlatformOptions, PlatformOverrides, SecureStorage};

use crate::ui;

pub async fn run(options: PlatformOptions, prefix: &str, verbose: bool) -> Result<()> {
    let host = MemoryHost::new();
    let storage = SecureStorage::new(host.clone()).with_options(options);

    ui::header("Secure Storage Session");
    ui::info("Using the in-memory host; nothing is encrypted or persisted");
    ui::separator();

    let token_key = format!("{}token", prefix);
    let refresh_key = format!("{}refresh", prefix);

    storage.set(&token_key, "abc123").await?;
    storage.set(&refresh_key, "def456").await?;
    storage.set("unrelated", "kept").await?;
    ui::success(&format!("Stored 3 entries ({} host calls)", host.calls()));

    let token = storage.get(&token_key).await?;
    ui::key_value(&token_key, token.as_deref().unwrap_or("<missing>"));

    let missing = storage.get(&format!("{}missing", prefix)).await?;
    ensure!(missing.is_none(), "unwritten key returned a value");
    ui::key_value("unwritten key", "<missing>");

    let present = storage.contains_key(&refresh_key).await?;
    ui::key_value("contains refresh", &present.to_string());

    let keys = storage
        .keys_with_prefix(prefix, &PlatformOverrides::new())
        .await?;
    ui::key_value("keys with prefix", &keys.join(", "));

    storage.remove(&token_key).await?;
    storage.remove(&token_key).await?;
    ui::success("Removed token twice (second removal is a no-op)");

    let all = storage.get_all().await?;
    if verbose {
        for (key, value) in &all {
            ui::key_value(key, value);
        }
    }
    ui::key_value("entries", &all.len().to_string());

    storage.clear().await?;
    ensure!(host.is_empty(), "host still holds entries after clear");
    ui::success(&format!("Cleared storage ({} host calls total)", host.calls()));

    Ok(())
}
