//! Lambda entry points
//!
//! One invocation decodes the delivered batch, then runs the package probe.

use std::fmt::Debug;
use std::sync::Arc;

use bucketwatch_core::types::{NotificationEnvelope, SnsBatch, SqsBatch};
use bucketwatch_core::{BucketwatchConfig, Result};
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::decoder::NotificationDecoder;
use crate::probe::PackageProbe;
use crate::sink::TracingSink;

/// State shared by every invocation of one function instance
pub struct HandlerState {
    decoder: NotificationDecoder,
    probe: Option<PackageProbe>,
}

impl HandlerState {
    pub fn new(decoder: NotificationDecoder, probe: Option<PackageProbe>) -> Self {
        Self { decoder, probe }
    }

    pub fn from_config(config: &BucketwatchConfig) -> Result<Self> {
        let sink = Arc::new(TracingSink::new(config.logging.quoted_unknown));
        let probe = if config.probe.enabled {
            Some(PackageProbe::new(&config.probe)?)
        } else {
            info!("Package probe disabled");
            None
        };

        Ok(Self::new(NotificationDecoder::new(sink), probe))
    }

    /// Decode a batch, then probe
    pub async fn handle<E>(&self, records: &[E]) -> Result<()>
    where
        E: NotificationEnvelope + Debug,
    {
        info!(
            channel = E::CHANNEL,
            records = records.len(),
            "Received notification batch"
        );
        debug!("Batch: {:?}", records);

        if let Err(err) = self.decoder.process(records) {
            if err.is_malformed_input() {
                warn!(code = err.code(), "Rejecting malformed batch: {}", err);
            }
            return Err(err);
        }

        if let Some(probe) = &self.probe {
            probe.run().await?;
        }

        Ok(())
    }
}

pub async fn handle_sns(
    state: &HandlerState,
    event: LambdaEvent<SnsBatch>,
) -> std::result::Result<(), LambdaError> {
    let span = info_span!("sns_invocation", request_id = %event.context.request_id);
    state.handle(&event.payload.records).instrument(span).await?;
    Ok(())
}

pub async fn handle_sqs(
    state: &HandlerState,
    event: LambdaEvent<SqsBatch>,
) -> std::result::Result<(), LambdaError> {
    let span = info_span!("sqs_invocation", request_id = %event.context.request_id);
    state.handle(&event.payload.records).instrument(span).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use bucketwatch_core::Error;

    fn state_without_probe() -> (HandlerState, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let state = HandlerState::new(NotificationDecoder::new(sink.clone()), None);
        (state, sink)
    }

    #[tokio::test]
    async fn test_handle_sns_batch() {
        let (state, sink) = state_without_probe();
        let batch: SnsBatch = serde_json::from_str(
            r#"{"Records":[{"EventSource":"aws:sns","EventSubscriptionArn":"arn:sub","Sns":{
                "Type":"Notification","TopicArn":"arn:topic","Subject":"Amazon S3 Notification",
                "Message":"{\"Records\":[{\"eventName\":\"ObjectRemoved:Delete\",\"s3\":{\"bucket\":{\"name\":\"sns-bucket\"},\"object\":{\"key\":\"a%2Fb.txt\"}}}]}"}}]}"#,
        )
        .unwrap();

        state.handle(&batch.records).await.unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bucket, "sns-bucket");
        assert_eq!(entries[0].key, "a%2Fb.txt");
        assert_eq!(entries[0].subject.as_deref(), Some("Amazon S3 Notification"));
    }

    #[tokio::test]
    async fn test_handle_propagates_decode_errors() {
        let (state, _sink) = state_without_probe();
        let batch: SqsBatch = serde_json::from_str(
            r#"{"Records":[{"eventSource":"aws:sqs","body":"{broken"}]}"#,
        )
        .unwrap();

        let err = state.handle(&batch.records).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_state_from_config_respects_probe_flag() {
        let mut config = BucketwatchConfig::default();
        config.probe.enabled = false;

        let state = HandlerState::from_config(&config).unwrap();
        assert!(state.probe.is_none());
    }
}
