//! Notification Decoder
//!
//! Walks a batch of envelopes, parses the S3 event message nested in each,
//! and emits one [`ChangeEntry`] per change record.

use std::sync::Arc;

use bucketwatch_core::types::{NotificationEnvelope, S3EventMessage};
use bucketwatch_core::Result;
use tracing::{debug, info};

use crate::sink::{ChangeEntry, LogSink};

/// Decoder handle
#[derive(Clone)]
pub struct NotificationDecoder {
    sink: Arc<dyn LogSink>,
}

impl NotificationDecoder {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Decode a batch in delivery order.
    ///
    /// Envelopes without an inner payload are skipped. The first malformed
    /// envelope or record aborts the batch; entries emitted before it stay
    /// emitted.
    pub fn process<E: NotificationEnvelope>(&self, batch: &[E]) -> Result<()> {
        info!("Start processing messages ({})", E::CHANNEL);

        for (index, envelope) in batch.iter().enumerate() {
            let emitted = self.process_envelope(envelope)?;
            debug!("Envelope {} produced {} entries", index, emitted);
        }

        info!("Finished processing messages ({})", E::CHANNEL);
        Ok(())
    }

    fn process_envelope<E: NotificationEnvelope>(&self, envelope: &E) -> Result<usize> {
        let event_source = envelope.event_source()?;

        let Some(inner) = envelope.inner_message()? else {
            debug!("Skipping {} envelope without payload", E::CHANNEL);
            return Ok(0);
        };

        let message = S3EventMessage::parse(inner.text)?;

        for record in &message.records {
            let entry = ChangeEntry::from_record(event_source, inner.subject, record)?;
            self.sink.emit(&entry);
        }

        Ok(message.records.len())
    }
}
