//! Strongly-typed representation of the `xnet.toml` file.

use serde::{Deserialize, Serialize};

/// Top-level translation configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Target device selection.
    #[serde(default)]
    pub target: TargetConfig,
    /// Identifier-resolution options.
    #[serde(default)]
    pub naming: NamingConfig,
}

impl TranslateConfig {
    /// Returns the string used to look up the chip family.
    ///
    /// An explicit `family` wins over `part`; both are accepted by the chip
    /// family lookup since a part number starts with its family number.
    pub fn family_selector(&self) -> Option<&str> {
        self.target
            .family
            .as_deref()
            .filter(|f| !f.is_empty())
            .or_else(|| self.target.part.as_deref().filter(|p| !p.is_empty()))
    }
}

/// The `[target]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Full part number, e.g. `3030PC84` or `XC4005E`.
    #[serde(default)]
    pub part: Option<String>,
    /// Chip family number, e.g. `3000` or `5200`.
    #[serde(default)]
    pub family: Option<String>,
}

/// The `[naming]` section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Append the case qualifier to every source identifier, even unique ones.
    #[serde(default)]
    pub qualify_all_names: bool,
    /// Treat every signal of every model as a port of the top-level scope.
    #[serde(default)]
    pub merge_toplevel_namespaces: bool,
}
