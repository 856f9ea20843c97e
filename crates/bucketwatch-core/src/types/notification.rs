//! Event Notification types
//!
//! S3-compatible event notifications as they arrive inside a topic or queue
//! message:
//! - Operation classification of event names
//! - Event type catalogue for the created/removed families
//! - Event record message format (the `Records` document)
//! - Destination configuration used when wiring buckets to queues and topics

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Error, Result};

// ============================================================================
// Operation Classification
// ============================================================================

const CREATED_PREFIX: &str = "ObjectCreated:";
const REMOVED_PREFIX: &str = "ObjectRemoved:";

/// Legacy rendering of an unclassified operation, quote characters included
pub const QUOTED_UNKNOWN_LABEL: &str = "\"UNKNOWN OPERATION\"";

/// Operation kind derived from an event name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Created,
    Deleted,
    Unknown,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Created => "CREATED",
            Operation::Deleted => "DELETED",
            Operation::Unknown => "UNKNOWN",
        }
    }

    /// Label written to logs. `quoted_unknown` reproduces the legacy text.
    pub fn label(&self, quoted_unknown: bool) -> &'static str {
        match self {
            Operation::Unknown if quoted_unknown => QUOTED_UNKNOWN_LABEL,
            _ => self.as_str(),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify an event name by its family prefix. Qualifiers after the colon
/// are ignored.
pub fn classify(event_name: &str) -> Operation {
    if event_name.starts_with(CREATED_PREFIX) {
        Operation::Created
    } else if event_name.starts_with(REMOVED_PREFIX) {
        Operation::Deleted
    } else {
        Operation::Unknown
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// S3 Event types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum S3EventType {
    // Object Created events
    #[serde(rename = "s3:ObjectCreated:*")]
    ObjectCreatedAll,
    #[serde(rename = "s3:ObjectCreated:Put")]
    ObjectCreatedPut,
    #[serde(rename = "s3:ObjectCreated:Post")]
    ObjectCreatedPost,
    #[serde(rename = "s3:ObjectCreated:Copy")]
    ObjectCreatedCopy,
    #[serde(rename = "s3:ObjectCreated:CompleteMultipartUpload")]
    ObjectCreatedCompleteMultipartUpload,

    // Object Removed events
    #[serde(rename = "s3:ObjectRemoved:*")]
    ObjectRemovedAll,
    #[serde(rename = "s3:ObjectRemoved:Delete")]
    ObjectRemovedDelete,
    #[serde(rename = "s3:ObjectRemoved:DeleteMarkerCreated")]
    ObjectRemovedDeleteMarkerCreated,

    // Test event
    #[serde(rename = "s3:TestEvent")]
    TestEvent,
}

impl S3EventType {
    pub const ALL: [S3EventType; 9] = [
        S3EventType::ObjectCreatedAll,
        S3EventType::ObjectCreatedPut,
        S3EventType::ObjectCreatedPost,
        S3EventType::ObjectCreatedCopy,
        S3EventType::ObjectCreatedCompleteMultipartUpload,
        S3EventType::ObjectRemovedAll,
        S3EventType::ObjectRemovedDelete,
        S3EventType::ObjectRemovedDeleteMarkerCreated,
        S3EventType::TestEvent,
    ];

    /// Check if this event type matches another (including wildcards)
    pub fn matches(&self, other: &S3EventType) -> bool {
        if self == other {
            return true;
        }

        match self {
            S3EventType::ObjectCreatedAll => matches!(
                other,
                S3EventType::ObjectCreatedPut
                    | S3EventType::ObjectCreatedPost
                    | S3EventType::ObjectCreatedCopy
                    | S3EventType::ObjectCreatedCompleteMultipartUpload
            ),
            S3EventType::ObjectRemovedAll => matches!(
                other,
                S3EventType::ObjectRemovedDelete | S3EventType::ObjectRemovedDeleteMarkerCreated
            ),
            _ => false,
        }
    }

    /// Get event name for configuration documents
    pub fn as_str(&self) -> &'static str {
        match self {
            S3EventType::ObjectCreatedAll => "s3:ObjectCreated:*",
            S3EventType::ObjectCreatedPut => "s3:ObjectCreated:Put",
            S3EventType::ObjectCreatedPost => "s3:ObjectCreated:Post",
            S3EventType::ObjectCreatedCopy => "s3:ObjectCreated:Copy",
            S3EventType::ObjectCreatedCompleteMultipartUpload => {
                "s3:ObjectCreated:CompleteMultipartUpload"
            }
            S3EventType::ObjectRemovedAll => "s3:ObjectRemoved:*",
            S3EventType::ObjectRemovedDelete => "s3:ObjectRemoved:Delete",
            S3EventType::ObjectRemovedDeleteMarkerCreated => "s3:ObjectRemoved:DeleteMarkerCreated",
            S3EventType::TestEvent => "s3:TestEvent",
        }
    }

    /// Event name as it appears in a delivered record (`eventName`)
    pub fn event_name(&self) -> &'static str {
        let name = self.as_str();
        name.strip_prefix("s3:").unwrap_or(name)
    }

    /// Look up a delivered `eventName`
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|t| t.event_name() == name).cloned()
    }

    pub fn operation(&self) -> Operation {
        match self {
            S3EventType::ObjectCreatedAll
            | S3EventType::ObjectCreatedPut
            | S3EventType::ObjectCreatedPost
            | S3EventType::ObjectCreatedCopy
            | S3EventType::ObjectCreatedCompleteMultipartUpload => Operation::Created,
            S3EventType::ObjectRemovedAll
            | S3EventType::ObjectRemovedDelete
            | S3EventType::ObjectRemovedDeleteMarkerCreated => Operation::Deleted,
            S3EventType::TestEvent => Operation::Unknown,
        }
    }
}

impl std::fmt::Display for S3EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Notification Configurations
// ============================================================================

/// Queue notification configuration (SQS-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueConfiguration {
    /// Configuration ID
    pub id: String,
    /// Destination queue name
    pub queue: String,
    /// Events to notify
    pub events: Vec<S3EventType>,
}

/// Topic notification configuration (SNS-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicConfiguration {
    /// Configuration ID
    pub id: String,
    /// Destination topic name
    pub topic: String,
    /// Events to notify
    pub events: Vec<S3EventType>,
}

/// Complete bucket notification configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationConfiguration {
    /// Queue configurations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queue_configurations: Vec<QueueConfiguration>,
    /// Topic configurations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topic_configurations: Vec<TopicConfiguration>,
}

impl NotificationConfiguration {
    /// Create empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add queue configuration
    pub fn add_queue(mut self, config: QueueConfiguration) -> Self {
        self.queue_configurations.push(config);
        self
    }

    /// Add topic configuration
    pub fn add_topic(mut self, config: TopicConfiguration) -> Self {
        self.topic_configurations.push(config);
        self
    }

    /// Get all destinations an event type is routed to
    pub fn matching_targets(&self, event_type: &S3EventType) -> Vec<NotificationTarget> {
        let mut targets = Vec::new();

        for queue in &self.queue_configurations {
            if Self::events_match(&queue.events, event_type) {
                targets.push(NotificationTarget::Queue {
                    id: queue.id.clone(),
                    name: queue.queue.clone(),
                });
            }
        }

        for topic in &self.topic_configurations {
            if Self::events_match(&topic.events, event_type) {
                targets.push(NotificationTarget::Topic {
                    id: topic.id.clone(),
                    name: topic.topic.clone(),
                });
            }
        }

        targets
    }

    fn events_match(events: &[S3EventType], event_type: &S3EventType) -> bool {
        events
            .iter()
            .any(|e| e.matches(event_type) || event_type.matches(e))
    }
}

/// Notification destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotificationTarget {
    Queue { id: String, name: String },
    Topic { id: String, name: String },
}

// ============================================================================
// Event Record (S3 Event Message Format)
// ============================================================================
//
// Every field is optional on the wire and read leniently: a value of the
// wrong type is treated as absent. Required fields are checked by the
// accessors so a missing one names the path that was absent.

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// S3 Event record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Info>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Info {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub s3_schema_version: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bucket: Option<S3BucketInfo>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub object: Option<S3ObjectInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3BucketInfo {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3ObjectInfo {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sequencer: Option<String>,
}

/// S3 Event message (contains multiple records)
#[derive(Debug, Clone, Default, Serialize)]
pub struct S3EventMessage {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

impl S3EventMessage {
    /// Parse the serialized message carried inside an envelope.
    ///
    /// Only text that is not a JSON document is a parse error. `Records` is
    /// absent on `s3:TestEvent` messages; a record that is not an object
    /// carries no fields.
    pub fn parse(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;

        let records = match document.get("Records") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(S3EventRecord::from_value).collect(),
            Some(_) => return Err(Error::FieldMissing("Records")),
        };

        Ok(Self { records })
    }
}

impl S3EventRecord {
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    pub fn event_name(&self) -> Result<&str> {
        self.event_name
            .as_deref()
            .ok_or(Error::FieldMissing("eventName"))
    }

    pub fn operation(&self) -> Result<Operation> {
        self.event_name().map(classify)
    }

    fn s3(&self) -> Result<&S3Info> {
        self.s3.as_ref().ok_or(Error::FieldMissing("s3"))
    }

    pub fn bucket_name(&self) -> Result<&str> {
        self.s3()?
            .bucket
            .as_ref()
            .and_then(|bucket| bucket.name.as_deref())
            .ok_or(Error::FieldMissing("s3.bucket.name"))
    }

    pub fn object_key(&self) -> Result<&str> {
        self.s3()?
            .object
            .as_ref()
            .and_then(|object| object.key.as_deref())
            .ok_or(Error::FieldMissing("s3.object.key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_prefix() {
        assert_eq!(classify("ObjectCreated:Put"), Operation::Created);
        assert_eq!(classify("ObjectCreated:CompleteMultipartUpload"), Operation::Created);
        assert_eq!(classify("ObjectRemoved:Delete"), Operation::Deleted);
        assert_eq!(classify("ObjectRemoved:DeleteMarkerCreated"), Operation::Deleted);
        assert_eq!(classify("SomeOtherEvent"), Operation::Unknown);
        assert_eq!(classify("ObjectRestore:Post"), Operation::Unknown);
    }

    #[test]
    fn test_classify_ignores_suffix_but_needs_colon() {
        assert_eq!(classify("ObjectCreated:"), Operation::Created);
        assert_eq!(classify("ObjectCreated:Something:Else"), Operation::Created);
        assert_eq!(classify("ObjectCreated"), Operation::Unknown);
        assert_eq!(classify("objectcreated:Put"), Operation::Unknown);
        assert_eq!(classify("s3:ObjectCreated:Put"), Operation::Unknown);
        assert_eq!(classify(""), Operation::Unknown);
    }

    #[test]
    fn test_operation_labels() {
        assert_eq!(Operation::Created.label(true), "CREATED");
        assert_eq!(Operation::Deleted.label(false), "DELETED");
        assert_eq!(Operation::Unknown.label(false), "UNKNOWN");
        assert_eq!(Operation::Unknown.label(true), "\"UNKNOWN OPERATION\"");
        assert_eq!(
            serde_json::to_string(&Operation::Deleted).unwrap(),
            "\"DELETED\""
        );
    }

    #[test]
    fn test_event_types_agree_with_classify() {
        for event_type in S3EventType::ALL.iter() {
            assert_eq!(
                classify(event_type.event_name()),
                event_type.operation(),
                "{}",
                event_type
            );
        }
    }

    #[test]
    fn test_event_type_matches() {
        assert!(S3EventType::ObjectCreatedAll.matches(&S3EventType::ObjectCreatedPut));
        assert!(S3EventType::ObjectCreatedAll.matches(&S3EventType::ObjectCreatedCopy));
        assert!(!S3EventType::ObjectCreatedAll.matches(&S3EventType::ObjectRemovedDelete));
        assert!(S3EventType::ObjectRemovedAll.matches(&S3EventType::ObjectRemovedDeleteMarkerCreated));
        assert!(S3EventType::ObjectCreatedPut.matches(&S3EventType::ObjectCreatedPut));
    }

    #[test]
    fn test_event_type_from_event_name() {
        assert_eq!(
            S3EventType::from_event_name("ObjectRemoved:Delete"),
            Some(S3EventType::ObjectRemovedDelete)
        );
        assert_eq!(S3EventType::from_event_name("s3:ObjectRemoved:Delete"), None);
        assert_eq!(S3EventType::from_event_name("ObjectRestore:Post"), None);
    }

    #[test]
    fn test_notification_config_matching() {
        let config = NotificationConfiguration::new()
            .add_queue(QueueConfiguration {
                id: "created".to_string(),
                queue: "uploads".to_string(),
                events: vec![S3EventType::ObjectCreatedAll],
            })
            .add_topic(TopicConfiguration {
                id: "removed".to_string(),
                topic: "deletions".to_string(),
                events: vec![S3EventType::ObjectRemovedAll],
            });

        let targets = config.matching_targets(&S3EventType::ObjectCreatedPut);
        assert_eq!(
            targets,
            vec![NotificationTarget::Queue {
                id: "created".to_string(),
                name: "uploads".to_string()
            }]
        );

        let targets = config.matching_targets(&S3EventType::ObjectRemovedDelete);
        assert_eq!(targets.len(), 1);

        assert!(config.matching_targets(&S3EventType::TestEvent).is_empty());
    }

    #[test]
    fn test_parse_event_message() {
        let message = S3EventMessage::parse(
            r#"{"Records":[{"eventVersion":"2.1","eventSource":"aws:s3","awsRegion":"us-east-1",
                "eventTime":"2024-05-01T12:00:00.000Z","eventName":"ObjectCreated:Put",
                "s3":{"s3SchemaVersion":"1.0","configurationId":"cfg",
                      "bucket":{"name":"b1","arn":"arn:aws:s3:::b1"},
                      "object":{"key":"dir/k1.txt","size":1024,"eTag":"abc","sequencer":"0A"}}}]}"#,
        )
        .unwrap();

        let record = &message.records[0];
        assert_eq!(record.operation().unwrap(), Operation::Created);
        assert_eq!(record.bucket_name().unwrap(), "b1");
        assert_eq!(record.object_key().unwrap(), "dir/k1.txt");
        assert_eq!(record.s3.as_ref().unwrap().object.as_ref().unwrap().size, Some(1024));
        assert!(record.event_time.is_some());
    }

    #[test]
    fn test_test_event_has_no_records() {
        let message = S3EventMessage::parse(
            r#"{"Service":"Amazon S3","Event":"s3:TestEvent","Time":"2024-05-01T12:00:00.000Z","Bucket":"b1"}"#,
        )
        .unwrap();
        assert!(message.records.is_empty());
    }

    #[test]
    fn test_missing_fields_are_named() {
        let record = S3EventRecord::default();
        assert!(matches!(record.event_name(), Err(Error::FieldMissing("eventName"))));
        assert!(matches!(record.bucket_name(), Err(Error::FieldMissing("s3"))));

        let record = S3EventRecord {
            s3: Some(S3Info {
                bucket: Some(S3BucketInfo::default()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(record.bucket_name(), Err(Error::FieldMissing("s3.bucket.name"))));
        assert!(matches!(record.object_key(), Err(Error::FieldMissing("s3.object.key"))));
    }

    #[test]
    fn test_invalid_message_is_parse_error() {
        let err = S3EventMessage::parse("not json").unwrap_err();
        assert_eq!(err.code(), "ParseError");
    }

    #[test]
    fn test_malformed_optional_fields_are_dropped() {
        let message = S3EventMessage::parse(
            r#"{"Records":[{"eventTime":"2024-05-01 12:00:00","eventName":"ObjectCreated:Put",
                "s3":{"bucket":{"name":"b1","arn":7},"object":{"key":"k1","size":"12"}}}]}"#,
        )
        .unwrap();

        let record = &message.records[0];
        assert!(record.event_time.is_none());
        assert_eq!(record.s3.as_ref().unwrap().object.as_ref().unwrap().size, None);
        assert_eq!(record.bucket_name().unwrap(), "b1");
        assert_eq!(record.object_key().unwrap(), "k1");
    }

    #[test]
    fn test_wrong_typed_required_field_is_missing() {
        let message = S3EventMessage::parse(
            r#"{"Records":[{"eventName":"ObjectCreated:Put","s3":{"bucket":{"name":5},"object":{"key":"k"}}},
                           "not a record",
                           {"eventName":["ObjectCreated:Put"]}]}"#,
        )
        .unwrap();

        assert_eq!(message.records.len(), 3);
        assert!(matches!(message.records[0].bucket_name(), Err(Error::FieldMissing("s3.bucket.name"))));
        assert!(matches!(message.records[1].event_name(), Err(Error::FieldMissing("eventName"))));
        assert!(matches!(message.records[2].event_name(), Err(Error::FieldMissing("eventName"))));
    }

    #[test]
    fn test_records_must_be_a_sequence() {
        let err = S3EventMessage::parse(r#"{"Records":{"eventName":"ObjectCreated:Put"}}"#).unwrap_err();
        assert!(matches!(err, Error::FieldMissing("Records")));

        assert!(S3EventMessage::parse(r#"{"Records":null}"#).unwrap().records.is_empty());
        assert!(S3EventMessage::parse("[1, 2]").unwrap().records.is_empty());
    }
}
