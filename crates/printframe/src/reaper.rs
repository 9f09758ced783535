//! Print invocation and teardown.
//!
//! [§ 8.9.2 Printing](https://html.spec.whatwg.org/multipage/timers-and-user-prompts.html#printing)
//!
//! "Fire an event named afterprint at the relevant global object of
//! document." Hosts are not required to deliver it, so teardown is armed
//! on both the signal and a fallback timer. Both race in one `select!`:
//! the loser is dropped, and [`Teardown::fire`] consumes itself, so
//! teardown runs exactly once.

use crate::PrintError;
use crate::config::AfterPrintHook;
use crate::host::PrintHost;
use crate::surface::Surface;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use strum_macros::Display;

/// What ended the wait after printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum TeardownTrigger {
    /// The host delivered `afterprint`.
    AfterPrint,
    /// The fallback delay elapsed first.
    Fallback,
}

/// Everything teardown touches.
pub(crate) struct Teardown<'h, H: PrintHost> {
    pub(crate) surface: Surface<'h, H>,
    pub(crate) remove: bool,
    pub(crate) printing: Rc<Cell<bool>>,
    pub(crate) on_after_print: Option<AfterPrintHook>,
}

impl<H: PrintHost> Teardown<'_, H> {
    /// Destroy the surface (unless it is kept), clear the printing flag and
    /// run the after-print hook.
    fn fire(self, trigger: TeardownTrigger) {
        if self.remove {
            let _ = self.surface.destroy();
        }
        self.printing.set(false);
        tracing::debug!(%trigger, kept = !self.remove, "print surface torn down");
        if let Some(hook) = &self.on_after_print {
            hook();
        }
    }
}

/// Print the surface, then tear it down on `afterprint` or after
/// `fallback`, whichever comes first.
///
/// If the print action itself fails, `teardown` is dropped without firing:
/// the surface is still destroyed on drop, but the after-print hook does
/// not run.
pub(crate) async fn print_and_reap<H: PrintHost>(
    host: &H,
    teardown: Teardown<'_, H>,
    fallback: Duration,
) -> Result<TeardownTrigger, PrintError> {
    let frame = teardown.surface.frame();
    host.print(frame, &teardown.surface.document().borrow())?;
    tracing::debug!(frame = frame.0, "print action invoked");

    let trigger = tokio::select! {
        () = host.after_print(frame) => TeardownTrigger::AfterPrint,
        () = tokio::time::sleep(fallback) => TeardownTrigger::Fallback,
    };
    teardown.fire(trigger);
    Ok(trigger)
}
