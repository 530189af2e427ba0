//! String-valued vocabularies used by the platform options.
//!
//! Every variant maps one-to-one onto the string the host plugin expects.
//! The string is the only wire form: no ordinal ever leaves this module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// All members, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire string for this member.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = StorageError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(StorageError::invalid_enum_value($kind, other)),
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = StorageError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

wire_enum! {
    /// When a keychain item may be read relative to the device lock state.
    KeychainAccessibility, "KeychainAccessibility" {
        /// Only while a passcode is set, this device only.
        Passcode => "passcode",
        /// While the device is unlocked.
        Unlocked => "unlocked",
        /// While the device is unlocked, never migrated to another device.
        UnlockedThisDevice => "unlocked_this_device",
        /// After the first unlock following a restart.
        FirstUnlock => "first_unlock",
        /// After the first unlock, never migrated to another device.
        FirstUnlockThisDevice => "first_unlock_this_device",
    }
}

wire_enum! {
    /// Keychain access-control constraints (presence of biometrics, passcode, ...).
    ///
    /// `Or` and `And` are combinators: the host joins the surrounding flags with them.
    AccessControlFlag, "AccessControlFlag" {
        /// Device passcode.
        DevicePasscode => "device_passcode",
        /// Any enrolled biometry.
        BiometryAny => "biometry_any",
        /// Biometry enrolled at the time the item was stored.
        BiometryCurrentSet => "biometry_current_set",
        /// Biometry or passcode.
        UserPresence => "user_presence",
        /// Paired watch.
        Watch => "watch",
        /// Any of the adjacent constraints.
        Or => "or",
        /// All of the adjacent constraints.
        And => "and",
        /// Application-provided password.
        ApplicationPassword => "application_password",
        /// Private key usage (Secure Enclave keys).
        PrivateKeyUsage => "private_key_usage",
    }
}

wire_enum! {
    /// Algorithm used on Android to wrap the storage key.
    KeyCipherAlgorithm, "KeyCipherAlgorithm" {
        /// RSA/ECB/PKCS1Padding.
        RsaEcbPkcs1 => "RSA_ECB_PKCS1Padding",
        /// RSA/ECB/OAEPWithSHA-256AndMGF1Padding.
        RsaEcbOaep => "RSA_ECB_OAEPwithSHA_256andMGF1Padding",
        /// AES/GCM/NoPadding (keystore-held key).
        AesGcm => "AES_GCM_NoPadding",
    }
}

wire_enum! {
    /// Algorithm used on Android to encrypt stored values.
    StorageCipherAlgorithm, "StorageCipherAlgorithm" {
        /// AES/CBC/PKCS7Padding.
        AesCbcPkcs7 => "AES_CBC_PKCS7Padding",
        /// AES/GCM/NoPadding.
        AesGcm => "AES_GCM_NoPadding",
    }
}
