//! Destinations for extracted records.
//!
//! # Submodules
//!
//! - [`backend`]: Posts the records to the backend's `/api/scrape` endpoint
//! - [`json`]: Renders the same payload as pretty JSON (used by `--dry-run`)

pub mod backend;
pub mod json;
