//! The public print entry point.

use crate::config::PrintOptions;
use crate::error::{PrintOutcome, SkipReason};
use crate::host::PrintHost;
use crate::populate::{ElementContent, ResourceContent};
use crate::session;
use crate::source::PrintSource;
use crate::sync::LoadPolicy;
use printframe_dom::NodeId;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A print handle bound to one source and one set of options.
///
/// States go `Idle → Printing → Idle`. A trigger while printing is ignored,
/// so one handle never has two surfaces in flight. Clones share state.
pub struct PrintHandle<H: PrintHost> {
    host: Rc<H>,
    source: PrintSource,
    options: PrintOptions,
    printing: Rc<Cell<bool>>,
}

impl<H: PrintHost> Clone for PrintHandle<H> {
    fn clone(&self) -> Self {
        Self {
            host: Rc::clone(&self.host),
            source: self.source.clone(),
            options: self.options.clone(),
            printing: Rc::clone(&self.printing),
        }
    }
}

impl<H: PrintHost> fmt::Debug for PrintHandle<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintHandle")
            .field("source", &self.source)
            .field("options", &self.options)
            .field("printing", &self.printing.get())
            .finish_non_exhaustive()
    }
}

/// Create a print handle for `source` with call-site `options`.
///
/// To inherit ambient defaults, go through
/// [`PrintProvider::use_print`](crate::PrintProvider::use_print) instead.
pub fn use_print<H: PrintHost>(
    host: Rc<H>,
    source: impl Into<PrintSource>,
    options: PrintOptions,
) -> PrintHandle<H> {
    PrintHandle {
        host,
        source: source.into(),
        options,
        printing: Rc::new(Cell::new(false)),
    }
}

enum Target<'a> {
    Element(NodeId),
    Resource(&'a str, printframe_resource::TypeHint),
}

impl<H: PrintHost> PrintHandle<H> {
    /// Whether a session is in flight.
    #[must_use]
    pub fn is_printing(&self) -> bool {
        self.printing.get()
    }

    /// The source this handle prints.
    #[must_use]
    pub const fn source(&self) -> &PrintSource {
        &self.source
    }

    /// The options this handle prints with.
    #[must_use]
    pub const fn options(&self) -> &PrintOptions {
        &self.options
    }

    /// Run one print session.
    ///
    /// Never panics and never fails: every outcome, failures included, is
    /// logged here and returned as a [`PrintOutcome`]. By the time this
    /// resolves, [`is_printing`](Self::is_printing) is `false` again.
    pub async fn trigger_print(&self) -> PrintOutcome {
        if self.printing.get() {
            tracing::debug!("print already in progress, trigger ignored");
            return PrintOutcome::Skipped(SkipReason::AlreadyPrinting);
        }

        let mut target = match &self.source {
            PrintSource::Element(reference) => {
                let resolved = reference.resolve(&self.host.document().borrow());
                let Some(node) = resolved else {
                    tracing::warn!("print target is not attached to the document, skipping print");
                    return PrintOutcome::Skipped(SkipReason::TargetDetached);
                };
                Target::Element(node)
            }
            PrintSource::Url { url, hint } => Target::Resource(url, *hint),
        };

        self.printing.set(true);
        if let Some(hook) = &self.options.on_before_print {
            hook().await;

            // The hook may re-render: print what the reference holds now.
            if let PrintSource::Element(reference) = &self.source {
                let resolved = reference.resolve(&self.host.document().borrow());
                let Some(node) = resolved else {
                    self.printing.set(false);
                    tracing::warn!("print target was detached by onBeforePrint, skipping print");
                    return PrintOutcome::Skipped(SkipReason::TargetDetached);
                };
                target = Target::Element(node);
            }
        }

        let fallback_title = self.host.document().borrow().title();
        let options = self.options.settings.resolve(fallback_title);
        let host = &*self.host;
        let printing = Rc::clone(&self.printing);
        let on_after_print = self.options.on_after_print.clone();

        let result = match target {
            Target::Element(node) => {
                let content = ElementContent { node };
                session::run(host, &content, &options, printing, on_after_print).await
            }
            Target::Resource(url, hint) => {
                let content = ResourceContent::new(url, hint, LoadPolicy::from(&options));
                session::run(host, &content, &options, printing, on_after_print).await
            }
        };
        self.printing.set(false);

        match result {
            Ok(report) => {
                tracing::info!(
                    frame = report.frame.0,
                    retries = report.retries,
                    teardown = %report.trigger,
                    "print completed"
                );
                PrintOutcome::Printed
            }
            Err(err) => {
                tracing::error!(error = %err, "print failed");
                PrintOutcome::Failed(err)
            }
        }
    }
}
