//! Carenote — medical narrative analysis with clinician review.
//!
//! Patients submit free-text (or document-derived) narratives; the crate
//! extracts candidate medical terms, composes a templated summary, obtains
//! recommendation text from a local model, and persists the bundle as an
//! analysis record. Assigned doctors then review each record
//! (pending/approved/disapproved) with notes, through role-scoped workflow
//! operations.

pub mod accounts;
pub mod config;
pub mod db;
pub mod extract;
pub mod models;
pub mod recommend;
pub mod workflow;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses.
///
/// Honors RUST_LOG, falling back to the crate-scoped default filter. Safe to
/// call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
