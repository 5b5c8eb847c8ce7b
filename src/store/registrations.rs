use crate::store::{RegistrationStore, StoreError, StoreResult};
use async_trait::async_trait;
use coursereg_core::RegistrationForm;
use parking_lot::Mutex;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Formats one sink record: `session, code, matricule, firstName, lastName, email`,
/// tab-separated and newline-terminated.
///
/// Separators inside a field are flattened to spaces so a record always has six fields.
pub fn format_record(form: &RegistrationForm) -> String {
    let fields = [
        form.course.session.as_str(),
        form.course.code.as_str(),
        form.matricule.as_str(),
        form.first_name.as_str(),
        form.last_name.as_str(),
        form.email.as_str(),
    ];

    let mut line = fields
        .iter()
        .map(|f| f.replace(['\t', '\r', '\n'], " "))
        .collect::<Vec<_>>()
        .join("\t");
    line.push('\n');
    line
}

pub fn confirmation_message(form: &RegistrationForm) -> String {
    format!(
        "Félicitations! Inscription réussie de {} au cours {}",
        form.first_name, form.course.code
    )
}

/// Appends registrations to a text file. Duplicates are kept.
#[derive(Debug)]
pub struct FileRegistrations {
    path: PathBuf,
    // Held across open+write+flush so concurrent sessions never interleave records.
    write_lock: tokio::sync::Mutex<()>,
}

impl FileRegistrations {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn append(&self, record: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(record.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for FileRegistrations {
    async fn persist(&self, form: &RegistrationForm) -> StoreResult<String> {
        let record = format_record(form);
        self.append(&record).await.map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            session = %form.course.session,
            code = %form.course.code,
            matricule = %form.matricule,
            "registration persisted"
        );
        Ok(confirmation_message(form))
    }
}

/// Keeps formatted records in memory.
#[derive(Debug, Default)]
pub struct MemoryRegistrations {
    records: Mutex<Vec<String>>,
}

impl MemoryRegistrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<String> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrations {
    async fn persist(&self, form: &RegistrationForm) -> StoreResult<String> {
        self.records.lock().push(format_record(form));
        Ok(confirmation_message(form))
    }
}
