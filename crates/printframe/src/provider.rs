//! Ambient print defaults.
//!
//! A [`PrintProvider`] is a scope value. It is passed to the code that
//! creates print handles instead of being looked up implicitly, and inner
//! scopes are derived from outer ones with [`PrintProvider::nested`].

use crate::config::{PrintOptions, PrintSettings};
use crate::controller::{PrintHandle, use_print};
use crate::host::PrintHost;
use crate::source::PrintSource;
use std::rc::Rc;

/// A scope of default print options.
///
/// The default provider is the empty scope.
#[derive(Debug, Clone, Default)]
pub struct PrintProvider {
    defaults: PrintOptions,
}

impl PrintProvider {
    /// Establish a scope with `defaults`.
    #[must_use]
    pub const fn new(defaults: PrintOptions) -> Self {
        Self { defaults }
    }

    /// Establish a scope from JSON settings, such as a config file.
    ///
    /// # Errors
    ///
    /// See [`PrintSettings::from_json`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(PrintSettings::from_json(json)?.into()))
    }

    /// Derive an inner scope; `overrides` win key by key.
    #[must_use]
    pub fn nested(&self, overrides: PrintOptions) -> Self {
        Self::new(overrides.merged_over(&self.defaults))
    }

    /// The defaults of this scope.
    #[must_use]
    pub const fn defaults(&self) -> &PrintOptions {
        &self.defaults
    }

    /// Create a print handle whose `options` are merged over this scope's
    /// defaults.
    pub fn use_print<H: PrintHost>(
        &self,
        host: Rc<H>,
        source: impl Into<PrintSource>,
        options: PrintOptions,
    ) -> PrintHandle<H> {
        use_print(host, source, options.merged_over(&self.defaults))
    }
}
