//! Crate-level error taxonomy.
//!
//! File-level fatal errors ([`Error::Xml`], [`Error::Io`]) are caught at the
//! worker boundary and logged; they never cross a file boundary. Driver-fatal
//! errors (assignment map construction, schema migration) propagate out of
//! `main` via `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("xml parse error in {file}: {source}")]
    Xml {
        file: String,
        #[source]
        source: quick_xml::Error,
    },

    #[error("io error in {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] medline_store::Error),
}

impl medline_core::Retryable for Error {
    fn is_retryable(&self) -> bool {
        matches!(self, Error::Store(e) if e.is_retryable())
    }
}
