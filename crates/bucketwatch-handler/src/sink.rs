//! Log sinks
//!
//! The decoder never logs change entries directly; it hands them to an
//! injected [`LogSink`].

use bucketwatch_core::types::{Operation, S3EventRecord};
use bucketwatch_core::{Result, STATUS_SUCCESS};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

/// One processed change record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    pub event_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub bucket: String,
    pub key: String,
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
    pub status: &'static str,
}

impl ChangeEntry {
    /// Build an entry, failing on the first required field that is absent
    pub fn from_record(
        event_source: &str,
        subject: Option<&str>,
        record: &S3EventRecord,
    ) -> Result<Self> {
        let operation = record.operation()?;
        let bucket = record.bucket_name()?;
        let key = record.object_key()?;

        Ok(Self {
            event_source: event_source.to_string(),
            subject: subject.map(str::to_string),
            bucket: bucket.to_string(),
            key: key.to_string(),
            operation,
            event_time: record.event_time,
            status: STATUS_SUCCESS,
        })
    }

    /// Multi-line text form
    pub fn render(&self, quoted_unknown: bool) -> String {
        format!(
            "event_source: {}\nsubject: {}\nbucket: {}\nfile: {}\noperation: {}\nstatus: {}",
            self.event_source,
            self.subject.as_deref().unwrap_or("None"),
            self.bucket,
            self.key,
            self.operation.label(quoted_unknown),
            self.status
        )
    }
}

/// Receiver of processed change entries
pub trait LogSink: Send + Sync {
    fn emit(&self, entry: &ChangeEntry);
}

/// Writes each entry as an INFO event on the process-wide subscriber
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    quoted_unknown: bool,
}

impl TracingSink {
    pub fn new(quoted_unknown: bool) -> Self {
        Self { quoted_unknown }
    }
}

impl LogSink for TracingSink {
    fn emit(&self, entry: &ChangeEntry) {
        info!(
            event_source = %entry.event_source,
            subject = entry.subject.as_deref(),
            bucket = %entry.bucket,
            file = %entry.key,
            operation = entry.operation.label(self.quoted_unknown),
            event_time = ?entry.event_time,
            status = entry.status,
            "Processed object change"
        );
    }
}

/// Collects entries in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<ChangeEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ChangeEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drain everything collected so far
    pub fn take(&self) -> Vec<ChangeEntry> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl LogSink for MemorySink {
    fn emit(&self, entry: &ChangeEntry) {
        self.entries.lock().push(entry.clone());
    }
}
