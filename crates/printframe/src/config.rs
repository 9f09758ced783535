//! Print configuration layers.
//!
//! Options come from two layers: the ambient defaults of a
//! [`PrintProvider`](crate::PrintProvider) scope and the call site. Every
//! option is optional in both layers; merging is key by key with the call
//! site winning, and [`PrintSettings::resolve`] fills whatever is still
//! unset with the built-in defaults.

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Default upper bound for an external image load.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default number of reload attempts for a failing external image.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;

/// Hook awaited before the print surface is built.
pub type BeforePrintHook = Rc<dyn Fn() -> LocalBoxFuture<'static, ()>>;

/// Hook invoked after teardown completes.
pub type AfterPrintHook = Rc<dyn Fn()>;

/// The serializable part of the print options.
///
/// Field names deserialize in camelCase so defaults can be shared with
/// front-end configuration files:
///
/// ```
/// # use printframe::PrintSettings;
/// let settings = PrintSettings::from_json(r#"{ "documentTitle": "Invoice", "retryAttempts": 4 }"#).unwrap();
/// assert_eq!(settings.retry_attempts, Some(4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PrintSettings {
    /// Style text applied only under print media.
    pub print_styles: Option<String>,
    /// Title of the surface document. Defaults to the live document's title.
    pub document_title: Option<String>,
    /// Destroy the surface after printing (default `true`).
    pub remove_after_print: Option<bool>,
    /// Project the live document's styles into the surface (default `true`).
    pub copy_styles: Option<bool>,
    /// Class applied to the surface body.
    pub body_class: Option<String>,
    /// Upper bound in milliseconds for an external image load (default 5000).
    pub load_timeout: Option<u64>,
    /// Reload attempts for a failing external image (default 2).
    pub retry_attempts: Option<u32>,
    /// Append `_retry=<n>` to reloaded image URLs (default `true`).
    ///
    /// Turn off for signed or expiring URLs, where any query change
    /// invalidates the signature.
    pub cache_bust_retries: Option<bool>,
}

impl PrintSettings {
    /// Parse settings from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON, wrongly typed
    /// values, or unknown option names.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Merge `self` over `base`: every option set here wins, everything
    /// else is taken from `base`.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            print_styles: self.print_styles.clone().or_else(|| base.print_styles.clone()),
            document_title: self
                .document_title
                .clone()
                .or_else(|| base.document_title.clone()),
            remove_after_print: self.remove_after_print.or(base.remove_after_print),
            copy_styles: self.copy_styles.or(base.copy_styles),
            body_class: self.body_class.clone().or_else(|| base.body_class.clone()),
            load_timeout: self.load_timeout.or(base.load_timeout),
            retry_attempts: self.retry_attempts.or(base.retry_attempts),
            cache_bust_retries: self.cache_bust_retries.or(base.cache_bust_retries),
        }
    }

    /// Fill unset options with the built-in defaults. `fallback_title` is
    /// used when no document title was configured.
    #[must_use]
    pub fn resolve(&self, fallback_title: Option<String>) -> ResolvedOptions {
        ResolvedOptions {
            print_styles: self.print_styles.clone().unwrap_or_default(),
            document_title: self
                .document_title
                .clone()
                .or(fallback_title)
                .filter(|t| !t.is_empty()),
            remove_after_print: self.remove_after_print.unwrap_or(true),
            copy_styles: self.copy_styles.unwrap_or(true),
            body_class: self.body_class.clone().filter(|c| !c.trim().is_empty()),
            load_timeout: self
                .load_timeout
                .map_or(DEFAULT_LOAD_TIMEOUT, Duration::from_millis),
            retry_attempts: self.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            cache_bust_retries: self.cache_bust_retries.unwrap_or(true),
        }
    }
}

/// Settings with every default applied, as the pipeline consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Print-only style text; empty when none.
    pub print_styles: String,
    /// Surface document title.
    pub document_title: Option<String>,
    /// Destroy the surface after printing.
    pub remove_after_print: bool,
    /// Project the live document's styles.
    pub copy_styles: bool,
    /// Class applied to the surface body.
    pub body_class: Option<String>,
    /// Hard ceiling on the external image load wait.
    pub load_timeout: Duration,
    /// Reload attempts for a failing external image.
    pub retry_attempts: u32,
    /// Cache-bust reloaded image URLs.
    pub cache_bust_retries: bool,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        PrintSettings::default().resolve(None)
    }
}

/// Full print options: [`PrintSettings`] plus lifecycle hooks.
///
/// Built fluently:
///
/// ```
/// # use printframe::PrintOptions;
/// let options = PrintOptions::new()
///     .document_title("Order #42")
///     .print_styles(".no-print { display: none; }")
///     .on_after_print(|| println!("done"));
/// assert_eq!(options.settings.document_title.as_deref(), Some("Order #42"));
/// ```
#[derive(Clone, Default)]
pub struct PrintOptions {
    /// Serializable options.
    pub settings: PrintSettings,
    /// Awaited before any surface work begins.
    pub on_before_print: Option<BeforePrintHook>,
    /// Invoked once after a successful print's teardown.
    pub on_after_print: Option<AfterPrintHook>,
}

impl fmt::Debug for PrintOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintOptions")
            .field("settings", &self.settings)
            .field("on_before_print", &self.on_before_print.is_some())
            .field("on_after_print", &self.on_after_print.is_some())
            .finish()
    }
}

impl From<PrintSettings> for PrintOptions {
    fn from(settings: PrintSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
}

impl PrintOptions {
    /// Options with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the print-only style text.
    #[must_use]
    pub fn print_styles(mut self, css: impl Into<String>) -> Self {
        self.settings.print_styles = Some(css.into());
        self
    }

    /// Set the surface document title.
    #[must_use]
    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.settings.document_title = Some(title.into());
        self
    }

    /// Keep or destroy the surface after printing.
    #[must_use]
    pub const fn remove_after_print(mut self, remove: bool) -> Self {
        self.settings.remove_after_print = Some(remove);
        self
    }

    /// Project or skip the live document's styles.
    #[must_use]
    pub const fn copy_styles(mut self, copy: bool) -> Self {
        self.settings.copy_styles = Some(copy);
        self
    }

    /// Set the class applied to the surface body.
    #[must_use]
    pub fn body_class(mut self, class: impl Into<String>) -> Self {
        self.settings.body_class = Some(class.into());
        self
    }

    /// Set the external image load ceiling.
    #[must_use]
    pub fn load_timeout(mut self, timeout: Duration) -> Self {
        self.settings.load_timeout = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Set the number of reload attempts for a failing image.
    #[must_use]
    pub const fn retry_attempts(mut self, attempts: u32) -> Self {
        self.settings.retry_attempts = Some(attempts);
        self
    }

    /// Enable or disable `_retry=<n>` cache busting on image reloads.
    #[must_use]
    pub const fn cache_bust_retries(mut self, enabled: bool) -> Self {
        self.settings.cache_bust_retries = Some(enabled);
        self
    }

    /// Set the hook awaited before the surface is built.
    #[must_use]
    pub fn on_before_print<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.on_before_print = Some(Rc::new(move || hook().boxed_local()));
        self
    }

    /// Set the hook invoked after teardown.
    #[must_use]
    pub fn on_after_print(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_after_print = Some(Rc::new(hook));
        self
    }

    /// Merge `self` over `base`, key by key. Hooks count as keys.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            settings: self.settings.merged_over(&base.settings),
            on_before_print: self
                .on_before_print
                .clone()
                .or_else(|| base.on_before_print.clone()),
            on_after_print: self
                .on_after_print
                .clone()
                .or_else(|| base.on_after_print.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn call_site_wins_key_by_key() {
        let defaults = PrintSettings {
            document_title: Some("Ambient".into()),
            copy_styles: Some(false),
            retry_attempts: Some(5),
            ..PrintSettings::default()
        };
        let call_site = PrintSettings {
            document_title: Some("Call site".into()),
            ..PrintSettings::default()
        };

        let merged = call_site.merged_over(&defaults);
        assert_eq!(merged.document_title.as_deref(), Some("Call site"));
        assert_eq!(merged.copy_styles, Some(false));
        assert_eq!(merged.retry_attempts, Some(5));
        assert_eq!(merged.load_timeout, None);
    }

    #[test]
    fn resolve_applies_defaults() {
        let resolved = PrintSettings::default().resolve(Some("Live page".into()));
        assert_eq!(resolved.document_title.as_deref(), Some("Live page"));
        assert!(resolved.remove_after_print);
        assert!(resolved.copy_styles);
        assert_eq!(resolved.load_timeout, Duration::from_millis(5000));
        assert_eq!(resolved.retry_attempts, 2);
        assert!(resolved.cache_bust_retries);
        assert_eq!(resolved.body_class, None);
    }

    #[test]
    fn settings_parse_from_camel_case_json() {
        let settings = PrintSettings::from_json(
            r#"{ "printStyles": "h1 { color: black; }", "removeAfterPrint": false, "loadTimeout": 50 }"#,
        )
        .unwrap();
        assert_eq!(settings.remove_after_print, Some(false));
        assert_eq!(
            settings.resolve(None).load_timeout,
            Duration::from_millis(50)
        );
        assert!(PrintSettings::from_json(r#"{ "pageSize": "A4" }"#).is_err());
    }

    #[test]
    fn hooks_merge_like_other_keys() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let base = PrintOptions::new().on_after_print(move || counter.set(counter.get() + 1));
        let merged = PrintOptions::new().document_title("x").merged_over(&base);

        let hook = merged.on_after_print.unwrap();
        hook();
        assert_eq!(hits.get(), 1);
        assert!(merged.on_before_print.is_none());
    }
}
