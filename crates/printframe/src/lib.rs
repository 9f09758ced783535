//! Scoped printing through an isolated surface.
//!
//! # Scope
//!
//! This crate provides:
//! - **Session Control** - [`use_print`] and [`PrintHandle::trigger_print`]
//!   run one print at a time and report a [`PrintOutcome`]
//! - **Ambient Defaults** - [`PrintProvider`] scopes merged under call-site
//!   [`PrintOptions`]
//! - **Surfaces** - zero-size off-screen `<iframe>` documents used as the
//!   print target, always torn down through one guarded path
//! - **Style Projection** - live document styles, print-only styles and a
//!   page baseline
//! - **Content** - deep copies of live elements, or embedded images and PDFs
//!   from normalized share links
//! - **Load Synchronization** - image retries with CORS relaxation and
//!   optional cache busting, bounded by a load timeout
//!
//! The runtime is abstracted by [`PrintHost`]; [`HeadlessHost`] implements
//! it over an in-memory document.
//!
//! ```no_run
//! use printframe::{ElementRef, HeadlessHost, PrintOptions, PrintProvider};
//! use printframe_dom::DomTree;
//! use std::rc::Rc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let host = Rc::new(HeadlessHost::new(DomTree::new_html_document(Some("Orders")), "https://app.example.com/")?);
//! let invoice = ElementRef::new();
//! let provider = PrintProvider::new(PrintOptions::new().body_class("print-root"));
//! let handle = provider.use_print(Rc::clone(&host), invoice.clone(), PrintOptions::new().document_title("Invoice"));
//!
//! // Later, once `invoice` points at an attached element:
//! let printed = handle.trigger_print().await.into_result()?;
//! # let _ = printed;
//! # Ok(())
//! # }
//! ```

pub mod config;
mod controller;
mod error;
pub mod headless;
pub mod host;
mod populate;
mod provider;
mod reaper;
mod session;
mod source;
pub mod styles;
pub mod surface;
pub mod sync;

pub use config::{PrintOptions, PrintSettings, ResolvedOptions};
pub use controller::{PrintHandle, use_print};
pub use error::{PrintError, PrintOutcome, SkipReason};
pub use headless::{HeadlessHost, PrintedDocument};
pub use host::{ImageRequest, PrintHost, StylesheetError};
pub use provider::PrintProvider;
pub use source::{ElementRef, PrintSource};
pub use surface::Surface;

pub use printframe_resource::{CorsMode, ResourceKind, TypeHint};
