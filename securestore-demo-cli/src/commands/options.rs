//! Options command - print the serialized options per platform

use anyhow::Result;
use securestore_lib::{Platform, PlatformOptions, PlatformOverrides};

use crate::ui;

pub fn run(options: &PlatformOptions, platform: Option<Platform>, verbose: bool) -> Result<()> {
    let platforms: Vec<Platform> = match platform {
        Some(platform) => vec![platform],
        None => Platform::ALL.to_vec(),
    };

    let overrides = PlatformOverrides::new();
    for platform in platforms {
        let blob = options.blob_for(platform, &overrides)?;
        ui::header(platform.as_str());
        if verbose {
            ui::json(&serde_json::from_str(&blob)?);
        } else {
            println!("{}", blob);
        }
    }

    Ok(())
}
