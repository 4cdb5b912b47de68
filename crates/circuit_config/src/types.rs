//! Configuration types deserialized from `circuit_lib.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `circuit_lib.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitLibConfig {
    /// Options for linking and validating the library.
    #[serde(default)]
    pub library: LibraryOptions,
}

/// Options controlling the link pass and library-wide validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryOptions {
    /// Fail the link pass on the first model name that does not resolve.
    ///
    /// When `false`, unresolved names are logged and left unresolved; any later
    /// use of the missing link fails instead.
    pub strict_links: bool,
    /// Require every populated model type to have a model flagged as default.
    ///
    /// When `false`, the first model created for a type stands in as its default.
    pub require_explicit_defaults: bool,
    /// Maximum number of pass-gate links followed when resolving a model's
    /// pass-gate logic.
    pub pass_gate_max_depth: usize,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            strict_links: false,
            require_explicit_defaults: false,
            pass_gate_max_depth: 8,
        }
    }
}
