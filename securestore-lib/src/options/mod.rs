//! Per-platform options records and their wire serialization.
//!
//! Every record serializes the same way: a flat JSON object with fields in
//! declaration order, enums as their wire string, timestamps as RFC 3339
//! text, lists as arrays and absent optionals as `null` (never omitted).
//! The rules live in the serde derives, so there is a single serializer for
//! all records: [`OptionsRecord::to_json`].
//!
//! ## Usage
//!
//! ```rust
//! use securestore_lib::options::{AndroidOptions, OptionsRecord};
//! use securestore_lib::enums::StorageCipherAlgorithm;
//!
//! let android = AndroidOptions::default()
//!     .with_storage_cipher(StorageCipherAlgorithm::AesCbcPkcs7);
//! let json = android.to_json().unwrap();
//! assert!(json.contains("\"storage_cipher_algorithm\":\"AES_CBC_PKCS7Padding\""));
//! ```

mod android;
mod apple;
mod desktop;
mod web;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::channel::Platform;
use crate::errors::StorageError;
use crate::Result;

pub use android::AndroidOptions;
pub use apple::{AppleOptions, IosOptions, MacOsOptions, DEFAULT_ACCOUNT_NAME};
pub use desktop::{LinuxOptions, WindowsOptions};
pub use web::WebOptions;

/// A configuration record sent to the host as JSON text.
pub trait OptionsRecord: Serialize {
    /// Serializes the record to compact JSON text.
    ///
    /// Deterministic: equal records produce byte-identical output.
    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(StorageError::from)
    }
}

impl OptionsRecord for AndroidOptions {}
impl OptionsRecord for AppleOptions {}
impl OptionsRecord for IosOptions {}
impl OptionsRecord for MacOsOptions {}
impl OptionsRecord for WebOptions {}
impl OptionsRecord for WindowsOptions {}
impl OptionsRecord for LinuxOptions {}

/// One options record per platform.
///
/// Used as the client's defaults. Can be loaded from a JSON document whose
/// top-level keys are platform names; missing platforms and missing fields
/// take their defaults. Unknown platforms or fields are rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformOptions {
    /// Android options.
    pub android: AndroidOptions,
    /// iOS options.
    pub ios: IosOptions,
    /// macOS options.
    pub macos: MacOsOptions,
    /// Web options.
    pub web: WebOptions,
    /// Windows options.
    pub windows: WindowsOptions,
    /// Linux options.
    pub linux: LinuxOptions,
}

impl PlatformOptions {
    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(StorageError::from)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StorageError::Serialization(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Serialized record for `platform`, honouring an override if one is set.
    pub fn blob_for(&self, platform: Platform, overrides: &PlatformOverrides) -> Result<String> {
        match platform {
            Platform::Android => overrides.android.as_ref().unwrap_or(&self.android).to_json(),
            Platform::Ios => overrides.ios.as_ref().unwrap_or(&self.ios).to_json(),
            Platform::MacOs => overrides.macos.as_ref().unwrap_or(&self.macos).to_json(),
            Platform::Web => overrides.web.as_ref().unwrap_or(&self.web).to_json(),
            Platform::Windows => overrides.windows.as_ref().unwrap_or(&self.windows).to_json(),
            Platform::Linux => overrides.linux.as_ref().unwrap_or(&self.linux).to_json(),
        }
    }

    /// Builds the `options` argument: platform name to JSON text, all platforms.
    pub fn to_wire(&self, overrides: &PlatformOverrides) -> Result<Map<String, Value>> {
        let mut blobs = Map::new();
        for platform in Platform::ALL {
            let blob = self.blob_for(*platform, overrides)?;
            blobs.insert(platform.as_str().to_string(), Value::String(blob));
        }
        Ok(blobs)
    }
}

/// Per-call replacements for the client's default options.
///
/// A platform left as `None` uses the client default for that call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformOverrides {
    /// Android override.
    pub android: Option<AndroidOptions>,
    /// iOS override.
    pub ios: Option<IosOptions>,
    /// macOS override.
    pub macos: Option<MacOsOptions>,
    /// Web override.
    pub web: Option<WebOptions>,
    /// Windows override.
    pub windows: Option<WindowsOptions>,
    /// Linux override.
    pub linux: Option<LinuxOptions>,
    /// Deadline for this call, replacing the client default.
    pub timeout: Option<Duration>,
}

impl PlatformOverrides {
    /// Create an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override Android options.
    pub fn with_android(mut self, options: AndroidOptions) -> Self {
        self.android = Some(options);
        self
    }

    /// Override iOS options.
    pub fn with_ios(mut self, options: IosOptions) -> Self {
        self.ios = Some(options);
        self
    }

    /// Override macOS options.
    pub fn with_macos(mut self, options: MacOsOptions) -> Self {
        self.macos = Some(options);
        self
    }

    /// Override web options.
    pub fn with_web(mut self, options: WebOptions) -> Self {
        self.web = Some(options);
        self
    }

    /// Override Windows options.
    pub fn with_windows(mut self, options: WindowsOptions) -> Self {
        self.windows = Some(options);
        self
    }

    /// Override Linux options.
    pub fn with_linux(mut self, options: LinuxOptions) -> Self {
        self.linux = Some(options);
        self
    }

    /// Set a deadline for this call.
    ///
    /// Same runtime requirement as [`SecureStorage::with_timeout`].
    ///
    /// [`SecureStorage::with_timeout`]: crate::SecureStorage::with_timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
