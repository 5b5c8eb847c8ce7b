use async_trait::async_trait;
use coursereg_core::{Course, RegistrationForm};
use std::path::PathBuf;
use thiserror::Error;

mod catalog;
mod registrations;

pub use catalog::{FileCatalog, MemoryCatalog, parse_catalog};
pub use registrations::{FileRegistrations, MemoryRegistrations, confirmation_message, format_record};

pub type StoreResult<T> = Result<T, StoreError>;

// StoreError is the lowest level error type. It only wraps I/O from the backing files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Catalog source could not be opened or read
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registration sink could not be opened or appended to
    #[error("failed to append registration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only view over the course catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Courses offered in `session`, in catalog order. An empty list is a valid answer.
    async fn load_courses(&self, session: &str) -> StoreResult<Vec<Course>>;
}

/// Append-only sink for confirmed registrations.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Records the form and returns the confirmation message for the student.
    async fn persist(&self, form: &RegistrationForm) -> StoreResult<String>;
}
