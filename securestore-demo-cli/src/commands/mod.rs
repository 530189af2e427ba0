//! CLI command implementations

pub mod options;
pub mod request;
pub mod session;

use anyhow::{Context, Result};
use securestore_lib::PlatformOptions;

/// Load default options from `path`, or the built-in defaults when unset.
pub fn load_options(path: Option<&str>) -> Result<PlatformOptions> {
    match path {
        Some(path) => {
            tracing::debug!("loading options from {}", path);
            PlatformOptions::from_file(path)
                .with_context(|| format!("failed to load options file {}", path))
        }
        None => Ok(PlatformOptions::default()),
    }
}
