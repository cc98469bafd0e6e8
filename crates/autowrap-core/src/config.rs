//! Generator configuration

use crate::error::WrapperResult;
use autowrap_schema::IntrospectOptions;
use serde::{Deserialize, Serialize};

/// Generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Fail `Clear` on a missing element instead of doing nothing
    pub strict_clear: bool,
    /// Infer helper methods from `Init`/`Clear`/`Add` name prefixes
    pub convention_helpers: bool,
    /// Allow the trailing-`s` fallback when inferring helpers
    pub pluralize_helpers: bool,
    /// Log generated plans as JSON after each generation run
    pub dump_generated: bool,
}

impl GeneratorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns [`crate::WrapperError::Config`] on malformed input
    pub fn from_toml_str(input: &str) -> WrapperResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// With strict clear
    #[inline]
    #[must_use]
    pub fn with_strict_clear(mut self, strict: bool) -> Self {
        self.strict_clear = strict;
        self
    }

    /// With convention helpers
    #[inline]
    #[must_use]
    pub fn with_convention_helpers(mut self, enabled: bool) -> Self {
        self.convention_helpers = enabled;
        self
    }

    /// With pluralized helper matching
    #[inline]
    #[must_use]
    pub fn with_pluralize_helpers(mut self, enabled: bool) -> Self {
        self.pluralize_helpers = enabled;
        self
    }

    /// With generated plan dumps
    #[inline]
    #[must_use]
    pub fn with_dump_generated(mut self, enabled: bool) -> Self {
        self.dump_generated = enabled;
        self
    }

    /// Introspection options derived from this configuration
    #[must_use]
    pub fn introspect_options(&self) -> IntrospectOptions {
        IntrospectOptions {
            convention_helpers: self.convention_helpers,
            pluralize_helpers: self.pluralize_helpers,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strict_clear: false,
            convention_helpers: true,
            pluralize_helpers: true,
            dump_generated: false,
        }
    }
}
