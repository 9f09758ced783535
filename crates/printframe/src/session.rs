//! One print session: build, populate, synchronize, print, tear down.

use crate::PrintError;
use crate::config::{AfterPrintHook, ResolvedOptions};
use crate::host::PrintHost;
use crate::populate::ContentStage;
use crate::reaper::{self, Teardown, TeardownTrigger};
use crate::styles::{self, StylePlan};
use crate::surface::Surface;
use printframe_common::warning::clear_warnings;
use printframe_dom::NodeId;
use std::cell::Cell;
use std::rc::Rc;

/// The state of a session between surface construction and teardown.
pub(crate) struct PrintSession<'h, H: PrintHost> {
    pub(crate) surface: Surface<'h, H>,
    /// The element the synchronizer waits on.
    pub(crate) media: Option<NodeId>,
    pub(crate) retries: u32,
}

/// What a completed session did.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionReport {
    pub(crate) frame: NodeId,
    pub(crate) retries: u32,
    pub(crate) trigger: TeardownTrigger,
}

/// Run the pipeline for `content`.
///
/// On success the surface has been torn down, `printing` cleared and the
/// after-print hook run. On failure the surface is dropped, which destroys
/// it unless it is kept after printing.
pub(crate) async fn run<H: PrintHost, C: ContentStage>(
    host: &H,
    content: &C,
    options: &ResolvedOptions,
    printing: Rc<Cell<bool>>,
    on_after_print: Option<AfterPrintHook>,
) -> Result<SessionReport, PrintError> {
    // Skipped stylesheets are reported once per session.
    clear_warnings();
    let surface = Surface::create(host, options.remove_after_print)?;

    let plan = StylePlan {
        copy_ambient: options.copy_styles && content.copies_ambient_styles(),
        print_styles: options.print_styles.clone(),
        extra_rules: content.style_rules(),
    };
    let blocks = styles::build_style_blocks(host, &plan).await;

    let media = {
        let mut document = surface.document().borrow_mut();
        if let Some(title) = &options.document_title {
            document.set_title(title);
        }
        styles::write_style_blocks(&mut document, &blocks);
        let body = document.body().ok_or(PrintError::SurfaceUnavailable)?;
        if let Some(class) = &options.body_class {
            let _ = document.set_attribute(body, "class", class);
        }
        content.populate(host, &mut document, body)
    };

    let mut session = PrintSession {
        surface,
        media,
        retries: 0,
    };
    content.synchronize(host, &mut session).await?;

    let frame = session.surface.frame();
    let teardown = Teardown {
        surface: session.surface,
        remove: options.remove_after_print,
        printing,
        on_after_print,
    };
    let trigger = reaper::print_and_reap(host, teardown, content.teardown_fallback()).await?;

    Ok(SessionReport {
        frame,
        retries: session.retries,
        trigger,
    })
}
