//! Notification envelopes
//!
//! Topic (SNS) and queue (SQS) deliveries wrap the S3 event message as a
//! serialized string. Both shapes expose the same view through
//! [`NotificationEnvelope`] so one decoder handles either.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Serialized inner message plus the attribution that came with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerMessage<'a> {
    pub subject: Option<&'a str>,
    pub text: &'a str,
}

/// Common view over an outer notification record
pub trait NotificationEnvelope {
    /// Short name of the delivery channel, used in log lines
    const CHANNEL: &'static str;

    fn event_source(&self) -> Result<&str>;

    /// `Ok(None)` when the envelope carries nothing to decode
    fn inner_message(&self) -> Result<Option<InnerMessage<'_>>>;
}

// ============================================================================
// SNS
// ============================================================================

/// Batch delivered by a topic subscription
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsEnvelope>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsEnvelope {
    /// Real topic deliveries spell this `EventSource`
    #[serde(
        rename = "eventSource",
        alias = "EventSource",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_source: Option<String>,

    #[serde(
        rename = "EventSubscriptionArn",
        skip_serializing_if = "Option::is_none"
    )]
    pub subscription_arn: Option<String>,

    #[serde(rename = "Sns", skip_serializing_if = "Option::is_none")]
    pub sns: Option<SnsPayload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsPayload {
    /// Outer `None`: key absent. Inner `None`: key present with a null value.
    #[serde(
        rename = "Subject",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub subject: Option<Option<String>>,

    #[serde(rename = "Message", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// TopicArn, MessageId, Timestamp and the rest
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl SnsPayload {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.message.is_none() && self.attributes.is_empty()
    }
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl NotificationEnvelope for SnsEnvelope {
    const CHANNEL: &'static str = "SNS";

    fn event_source(&self) -> Result<&str> {
        self.event_source
            .as_deref()
            .ok_or(Error::FieldMissing("eventSource"))
    }

    fn inner_message(&self) -> Result<Option<InnerMessage<'_>>> {
        let sns = match &self.sns {
            Some(sns) if !sns.is_empty() => sns,
            _ => return Ok(None),
        };

        let subject = sns
            .subject
            .as_ref()
            .ok_or(Error::FieldMissing("Subject"))?
            .as_deref();
        let text = sns
            .message
            .as_deref()
            .ok_or(Error::FieldMissing("Message"))?;

        Ok(Some(InnerMessage { subject, text }))
    }
}

// ============================================================================
// SQS
// ============================================================================

/// Batch delivered by a queue event source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqsBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsEnvelope>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqsEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,

    #[serde(rename = "eventSourceARN", skip_serializing_if = "Option::is_none")]
    pub event_source_arn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NotificationEnvelope for SqsEnvelope {
    const CHANNEL: &'static str = "SQS";

    fn event_source(&self) -> Result<&str> {
        self.event_source
            .as_deref()
            .ok_or(Error::FieldMissing("eventSource"))
    }

    fn inner_message(&self) -> Result<Option<InnerMessage<'_>>> {
        Ok(self
            .body
            .as_deref()
            .filter(|body| !body.is_empty())
            .map(|text| InnerMessage {
                subject: None,
                text,
            }))
    }
}
