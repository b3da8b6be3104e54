//! Medline Pubmed - streaming MEDLINE/PubMed XML ingest into a normalized
//! relational database.
//!
//! Two phases, both file-parallel across a `rayon` thread pool:
//!
//! 1. **Pre-scan** ([`prescan`]) writes a `PMID:Version` sidecar per file.
//! 2. **Load** ([`runner::run_load`]) builds the global assignment map from
//!    those sidecars ([`assignment`]), then streams each file
//!    ([`parser`]), coercing fields ([`coerce`]) and inserting each owned,
//!    non-duplicate citation ([`loader`]) via `medline-store`'s `Sink`.

pub mod assignment;
pub mod coerce;
pub mod config;
pub mod error;
pub mod loader;
pub mod parser;
pub mod prescan;
pub mod runner;
pub mod source;

pub use config::Config;
pub use error::Error;
pub use runner::Summary;
