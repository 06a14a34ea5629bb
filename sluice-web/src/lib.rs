//! Sluice Web - URL-to-browser media delivery server
//!
//! Serves the submission form, runs acquisitions through sluice-core,
//! and streams the resulting files back to browsers with full HTTP
//! byte-range support.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::too_many_lines)]

pub mod handlers;
pub mod pages;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server};
