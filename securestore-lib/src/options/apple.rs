//! Apple keychain options.
//!
//! iOS and macOS share one field set, [`AppleOptions`]. `IosOptions` wraps it
//! unchanged; `MacOsOptions` embeds it and adds the data-protection switch.
//! Both serialize flat: the shared fields come first, in declaration order.
//! Decoding rejects fields outside the record's field set.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::{AccessControlFlag, KeychainAccessibility};

/// Default keychain service/account name used by the host plugin.
pub const DEFAULT_ACCOUNT_NAME: &str = "flutter_secure_storage_service";

/// Keychain attributes shared by iOS and macOS.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppleOptions {
    /// Keychain service/account the items are grouped under.
    pub account_name: Option<String>,
    /// Keychain access group, for sharing between apps.
    pub group_id: Option<String>,
    /// When items may be read relative to the lock state.
    pub accessibility: Option<KeychainAccessibility>,
    /// Sync items through iCloud keychain.
    pub synchronizable: bool,
    /// User-visible label.
    pub label: Option<String>,
    /// User-visible description.
    pub description: Option<String>,
    /// User-editable comment.
    pub comment: Option<String>,
    /// Hide the item from keychain UIs.
    pub is_invisible: Option<bool>,
    /// Mark the item as a negative (placeholder) entry.
    pub is_negative: Option<bool>,
    /// Creation date attribute.
    pub creation_date: Option<DateTime<Utc>>,
    /// Modification date attribute.
    pub last_modified_date: Option<DateTime<Utc>>,
    /// Maximum number of items returned by queries.
    pub result_limit: Option<u32>,
    /// Return a persistent reference rather than the data.
    pub is_persistent: Option<bool>,
    /// Authentication UI behaviour passed through to the keychain query.
    pub auth_ui_behavior: Option<String>,
    /// Access-control constraints, in order; combinators apply to their neighbours.
    pub access_control_flags: Vec<AccessControlFlag>,
}

impl Default for AppleOptions {
    fn default() -> Self {
        Self {
            account_name: Some(DEFAULT_ACCOUNT_NAME.to_string()),
            group_id: None,
            accessibility: Some(KeychainAccessibility::Unlocked),
            synchronizable: false,
            label: None,
            description: None,
            comment: None,
            is_invisible: None,
            is_negative: None,
            creation_date: None,
            last_modified_date: None,
            result_limit: None,
            is_persistent: None,
            auth_ui_behavior: None,
            access_control_flags: Vec::new(),
        }
    }
}

impl AppleOptions {
    /// Set the keychain account name.
    pub fn with_account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = Some(name.into());
        self
    }

    /// Share items through a keychain access group.
    pub fn with_group_id(mut self, group: impl Into<String>) -> Self {
        self.group_id = Some(group.into());
        self
    }

    /// Set the accessibility level.
    pub fn with_accessibility(mut self, accessibility: KeychainAccessibility) -> Self {
        self.accessibility = Some(accessibility);
        self
    }

    /// Sync items through iCloud keychain.
    pub fn synchronizable(mut self) -> Self {
        self.synchronizable = true;
        self
    }

    /// Set the user-visible label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Append an access-control flag.
    pub fn with_access_control(mut self, flag: AccessControlFlag) -> Self {
        self.access_control_flags.push(flag);
        self
    }

    /// Set the creation and modification date attributes.
    pub fn with_dates(mut self, created: DateTime<Utc>, modified: DateTime<Utc>) -> Self {
        self.creation_date = Some(created);
        self.last_modified_date = Some(modified);
        self
    }
}

/// iOS keychain options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IosOptions(pub AppleOptions);

impl IosOptions {
    /// Shared keychain attributes.
    pub fn apple(&self) -> &AppleOptions {
        &self.0
    }
}

impl From<AppleOptions> for IosOptions {
    fn from(apple: AppleOptions) -> Self {
        Self(apple)
    }
}

/// macOS keychain options.
///
/// `Deserialize` is written by hand: serde cannot deny unknown fields
/// through `#[serde(flatten)]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MacOsOptions {
    /// Shared keychain attributes.
    #[serde(flatten)]
    pub apple: AppleOptions,
    /// Use the data-protection keychain instead of the legacy file keychain.
    pub uses_data_protection_keychain: bool,
}

impl Default for MacOsOptions {
    fn default() -> Self {
        Self {
            apple: AppleOptions::default(),
            uses_data_protection_keychain: true,
        }
    }
}

impl<'de> Deserialize<'de> for MacOsOptions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let uses_data_protection_keychain = match fields.remove("uses_data_protection_keychain") {
            Some(value) => bool::deserialize(value).map_err(de::Error::custom)?,
            None => true,
        };
        // The remaining keys must all be shared Apple fields.
        let apple = AppleOptions::deserialize(Value::Object(fields)).map_err(de::Error::custom)?;

        Ok(Self {
            apple,
            uses_data_protection_keychain,
        })
    }
}

impl MacOsOptions {
    /// Use the legacy file-based keychain.
    pub fn with_legacy_keychain(mut self) -> Self {
        self.uses_data_protection_keychain = false;
        self
    }
}

impl From<AppleOptions> for MacOsOptions {
    fn from(apple: AppleOptions) -> Self {
        Self {
            apple,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionsRecord;
    use chrono::TimeZone;
    use serde_json::Value;

    const APPLE_FIELDS: [&str; 15] = [
        "account_name",
        "group_id",
        "accessibility",
        "synchronizable",
        "label",
        "description",
        "comment",
        "is_invisible",
        "is_negative",
        "creation_date",
        "last_modified_date",
        "result_limit",
        "is_persistent",
        "auth_ui_behavior",
        "access_control_flags",
    ];

    fn field_order(json: &str) -> Vec<String> {
        let mut names = Vec::new();
        let object: serde_json::Map<String, Value> = serde_json::from_str(json).unwrap();
        for name in object.keys() {
            let position = json.find(&format!("\"{}\":", name)).unwrap();
            names.push((position, name.clone()));
        }
        names.sort();
        names.into_iter().map(|(_, name)| name).collect()
    }

    #[test]
    fn test_default_document() {
        let json = AppleOptions::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["account_name"], DEFAULT_ACCOUNT_NAME);
        assert_eq!(value["accessibility"], "unlocked");
        assert_eq!(value["synchronizable"], false);
        assert_eq!(value["creation_date"], Value::Null);
        assert_eq!(value["result_limit"], Value::Null);
        assert_eq!(value["access_control_flags"], Value::Array(vec![]));
        assert_eq!(value.as_object().unwrap().len(), APPLE_FIELDS.len());
    }

    #[test]
    fn test_ios_matches_apple() {
        let apple = AppleOptions::default().with_group_id("group.app.shared");
        let ios = IosOptions::from(apple.clone());
        assert_eq!(ios.to_json().unwrap(), apple.to_json().unwrap());
        assert_eq!(ios.apple().group_id.as_deref(), Some("group.app.shared"));
    }

    #[test]
    fn test_macos_appends_own_field() {
        let json = MacOsOptions::default().to_json().unwrap();
        let mut expected: Vec<String> = APPLE_FIELDS.iter().map(|s| s.to_string()).collect();
        expected.push("uses_data_protection_keychain".to_string());

        assert_eq!(field_order(&json), expected);
        assert!(json.ends_with(r#""uses_data_protection_keychain":true}"#));
    }

    #[test]
    fn test_dates_and_flags() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let modified = Utc.with_ymd_and_hms(2024, 6, 2, 8, 30, 15).unwrap();
        let options = AppleOptions::default()
            .with_dates(created, modified)
            .with_access_control(AccessControlFlag::BiometryAny)
            .with_access_control(AccessControlFlag::Or)
            .with_access_control(AccessControlFlag::DevicePasscode);

        let value: Value = serde_json::from_str(&options.to_json().unwrap()).unwrap();

        let created_text = value["creation_date"].as_str().unwrap();
        assert!(created_text.starts_with("2024-05-01T12:00:00"));
        assert_eq!(
            DateTime::parse_from_rfc3339(created_text).unwrap(),
            created
        );
        assert!(value["last_modified_date"]
            .as_str()
            .unwrap()
            .starts_with("2024-06-02T08:30:15"));
        assert_eq!(
            value["access_control_flags"],
            serde_json::json!(["biometry_any", "or", "device_passcode"])
        );
    }

    #[test]
    fn test_macos_decodes_flat_document() {
        let options: MacOsOptions = serde_json::from_str(
            r#"{"label": "vault", "uses_data_protection_keychain": false}"#,
        )
        .unwrap();
        assert_eq!(options.apple.label.as_deref(), Some("vault"));
        assert!(!options.uses_data_protection_keychain);
        assert_eq!(
            options.apple.accessibility,
            Some(KeychainAccessibility::Unlocked)
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let ios = serde_json::from_str::<IosOptions>(r#"{"synchronisable": true}"#);
        assert!(ios.is_err());

        let macos = serde_json::from_str::<MacOsOptions>(
            r#"{"label": "vault", "uses_data_protection_keychains": false}"#,
        );
        let err = macos.unwrap_err().to_string();
        assert!(err.contains("uses_data_protection_keychains"), "{}", err);
    }

    #[test]
    fn test_macos_round_trip() {
        let options = MacOsOptions::from(
            AppleOptions::default().with_access_control(AccessControlFlag::UserPresence),
        )
        .with_legacy_keychain();
        let decoded: MacOsOptions = serde_json::from_str(&options.to_json().unwrap()).unwrap();
        assert_eq!(decoded, options);
    }
}
