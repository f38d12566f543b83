//! guide-sync-core
//!
//! Core library for keeping families of near-duplicate documents in sync.
//!
//! Documents declared as variants of one another are split into titled
//! sections and compared section by section. The result lists sections that
//! are missing from some variants and sections whose bodies have diverged.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends.

pub mod config;
pub mod diff;
pub mod loader;
pub mod model;
pub mod report;
pub mod sections;
pub mod services;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
