//! medline-store: the relational database sink for the ingest pipeline.
//!
//! Owns connection pooling, schema migrations, and the per-citation
//! transactional writer. Durable, idempotent persistence of a stage's
//! output is the concern this crate covers, same as it ever was — only the
//! storage engine changed, from content-addressed files to Postgres rows.

pub mod error;
pub mod models;
pub mod pool;
pub mod schema;
pub mod sink;

pub use error::Error;
pub use models::CitationGraph;
pub use pool::{MIGRATIONS, PgPool, build_pool, reset_database, run_migrations};
pub use sink::Sink;
