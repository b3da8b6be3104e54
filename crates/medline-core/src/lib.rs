//! Medline Core - Common infrastructure for the MEDLINE/PubMed ingest pipeline
//!
//! This crate provides reusable components shared across the pipeline stages:
//! progress reporting, a logging bridge, graceful shutdown, retry with backoff,
//! and a lock-free work queue for file assignment.

pub mod error;
pub mod logging;
pub mod progress;
pub mod retry;
pub mod semaphore;
pub mod shutdown;
pub mod work_queue;

// Re-exports for convenience
pub use error::Retryable;
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress};
pub use retry::{backoff_duration, retry_with_backoff};
pub use semaphore::{Semaphore, SemaphoreGuard};
pub use shutdown::{is_shutdown_requested, request_shutdown, shutdown_flag};
pub use work_queue::WorkQueue;
