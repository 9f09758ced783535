//! Common utilities for printframe.
//!
//! This crate provides shared infrastructure used by all printframe components:
//! - **Warning System** - deduplicated warnings emitted through `tracing`
//! - **URL Helpers** - origin/host/path extraction and relative resolution
//! - **Fetching** - HTTP and `data:` URL loading for headless hosts

pub mod net;
pub mod url;
pub mod warning;
