//! Desktop options (Windows, Linux).

use serde::{Deserialize, Serialize};

/// Options for Windows credential storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsOptions {
    /// Read entries written by older plugin versions.
    pub use_backward_compatibility: bool,
}

impl WindowsOptions {
    /// Read entries written by older plugin versions.
    pub fn backward_compatible(mut self) -> Self {
        self.use_backward_compatibility = true;
        self
    }
}

/// Options for the Linux secret service. Carries no fields.
//
// A braced struct: a unit struct would serialize as `null`, not `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinuxOptions {}
