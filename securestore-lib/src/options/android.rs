//! Android options.

use serde::{Deserialize, Serialize};

use crate::enums::{KeyCipherAlgorithm, StorageCipherAlgorithm};

/// Options for the Android keystore-backed storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AndroidOptions {
    /// Wipe all entries if they can no longer be decrypted.
    pub reset_on_error: bool,
    /// Re-encrypt existing entries when the configured algorithms change.
    pub migrate_on_algorithm_change: bool,
    /// Require biometric authentication to access entries.
    pub enforce_biometrics: bool,
    /// Algorithm wrapping the storage key.
    pub key_cipher_algorithm: KeyCipherAlgorithm,
    /// Algorithm encrypting stored values.
    pub storage_cipher_algorithm: StorageCipherAlgorithm,
    /// Shared preferences file name; the host default when `None`.
    pub shared_preferences_name: Option<String>,
    /// Prefix prepended to every stored key; the host default when `None`.
    pub preferences_key_prefix: Option<String>,
    /// Title of the biometric prompt.
    pub biometric_prompt_title: String,
    /// Subtitle of the biometric prompt.
    pub biometric_prompt_subtitle: String,
}

impl Default for AndroidOptions {
    fn default() -> Self {
        Self {
            reset_on_error: true,
            migrate_on_algorithm_change: true,
            enforce_biometrics: false,
            key_cipher_algorithm: KeyCipherAlgorithm::RsaEcbOaep,
            storage_cipher_algorithm: StorageCipherAlgorithm::AesGcm,
            shared_preferences_name: None,
            preferences_key_prefix: None,
            biometric_prompt_title: "Authenticate to access".to_string(),
            biometric_prompt_subtitle: "Use biometrics or device credentials".to_string(),
        }
    }
}

impl AndroidOptions {
    /// Require biometrics, with the given prompt texts.
    pub fn with_biometrics(
        mut self,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        self.enforce_biometrics = true;
        self.biometric_prompt_title = title.into();
        self.biometric_prompt_subtitle = subtitle.into();
        self
    }

    /// Set the key wrapping algorithm.
    pub fn with_key_cipher(mut self, algorithm: KeyCipherAlgorithm) -> Self {
        self.key_cipher_algorithm = algorithm;
        self
    }

    /// Set the value encryption algorithm.
    pub fn with_storage_cipher(mut self, algorithm: StorageCipherAlgorithm) -> Self {
        self.storage_cipher_algorithm = algorithm;
        self
    }

    /// Use a dedicated shared preferences file.
    pub fn with_shared_preferences_name(mut self, name: impl Into<String>) -> Self {
        self.shared_preferences_name = Some(name.into());
        self
    }

    /// Prefix every stored key.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.preferences_key_prefix = Some(prefix.into());
        self
    }

    /// Keep undecryptable entries instead of wiping them.
    pub fn keep_on_error(mut self) -> Self {
        self.reset_on_error = false;
        self
    }
}
