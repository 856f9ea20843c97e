//! Static stack naming
//!
//! Names of the provisioned resources for the two notification pipelines.
//! Every name and construct id derives from one stack suffix.

use serde::Serialize;

use super::notification::{
    NotificationConfiguration, NotificationTarget, Operation, QueueConfiguration, S3EventType,
    TopicConfiguration,
};
use crate::config::NamingConfig;

/// Function runtime the handlers are packaged for
pub const FUNCTION_RUNTIME: &str = "provided.al2023";

/// Function architecture
pub const FUNCTION_ARCHITECTURE: &str = "arm64";

/// A named resource with its construct id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceName {
    pub id: String,
    pub name: String,
}

impl ResourceName {
    fn new(kind: &str, suffix: &str) -> Self {
        Self {
            id: format!("{}-id-{}", kind, suffix),
            name: format!("{}-{}", kind, suffix),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionLayout {
    pub function: ResourceName,
    pub layer: ResourceName,
    /// Binary implementing the handler
    pub handler: String,
    pub runtime: &'static str,
    pub architecture: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketLayout {
    pub bucket: ResourceName,
    pub versioned: bool,
    pub notifications: NotificationConfiguration,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueLayout {
    pub queue: ResourceName,
    pub visibility_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicLayout {
    pub topic: ResourceName,
    pub display_name: String,
}

/// Bucket -> queue -> function
#[derive(Debug, Clone, Serialize)]
pub struct SqsPipeline {
    pub queue: QueueLayout,
    pub function: FunctionLayout,
    pub bucket: BucketLayout,
}

/// Bucket -> topic -> function
#[derive(Debug, Clone, Serialize)]
pub struct SnsPipeline {
    pub topic: TopicLayout,
    pub function: FunctionLayout,
    pub bucket: BucketLayout,
}

#[derive(Debug, Clone, Serialize)]
pub struct StackLayout {
    pub suffix: String,
    pub sqs: SqsPipeline,
    pub sns: SnsPipeline,
}

/// Where one delivered event name is forwarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRoute {
    pub event_type: S3EventType,
    pub operation: Operation,
    pub targets: Vec<NotificationTarget>,
}

/// Event families every bucket forwards
fn routed_events() -> Vec<S3EventType> {
    vec![S3EventType::ObjectCreatedAll, S3EventType::ObjectRemovedAll]
}

impl StackLayout {
    /// Route a delivered `eventName` through both buckets' notification
    /// configurations. `None` for names outside the known event types.
    pub fn route(&self, event_name: &str) -> Option<EventRoute> {
        let event_type = S3EventType::from_event_name(event_name)?;

        let mut targets = self.sqs.bucket.notifications.matching_targets(&event_type);
        targets.extend(self.sns.bucket.notifications.matching_targets(&event_type));

        Some(EventRoute {
            operation: event_type.operation(),
            event_type,
            targets,
        })
    }

    pub fn new(naming: &NamingConfig) -> Self {
        let suffix = naming.stack_suffix.as_str();

        let queue = ResourceName::new("sqs-queue", suffix);
        let sqs_bucket = ResourceName::new("sqs-bucket", suffix);
        let sqs = SqsPipeline {
            function: FunctionLayout {
                function: ResourceName::new("sqs-lambda", suffix),
                layer: ResourceName::new("sqs-lambda_layer", suffix),
                handler: "sqs-handler".to_string(),
                runtime: FUNCTION_RUNTIME,
                architecture: FUNCTION_ARCHITECTURE,
            },
            bucket: BucketLayout {
                versioned: true,
                notifications: NotificationConfiguration::new().add_queue(QueueConfiguration {
                    id: format!("{}-notification", sqs_bucket.name),
                    queue: queue.name.clone(),
                    events: routed_events(),
                }),
                bucket: sqs_bucket,
            },
            queue: QueueLayout {
                queue,
                visibility_timeout_secs: crate::QUEUE_VISIBILITY_TIMEOUT_SECS,
            },
        };

        let topic = ResourceName::new("sns-topic", suffix);
        let sns_bucket = ResourceName::new("sns-bucket", suffix);
        let sns = SnsPipeline {
            function: FunctionLayout {
                function: ResourceName::new("sns-lambda", suffix),
                layer: ResourceName::new("sns-lambda_layer", suffix),
                handler: "sns-handler".to_string(),
                runtime: FUNCTION_RUNTIME,
                architecture: FUNCTION_ARCHITECTURE,
            },
            bucket: BucketLayout {
                versioned: true,
                notifications: NotificationConfiguration::new().add_topic(TopicConfiguration {
                    id: format!("{}-notification", sns_bucket.name),
                    topic: topic.name.clone(),
                    events: routed_events(),
                }),
                bucket: sns_bucket,
            },
            topic: TopicLayout {
                display_name: format!("sns-display-topic-{}", suffix),
                topic,
            },
        };

        Self {
            suffix: suffix.to_string(),
            sqs,
            sns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let layout = StackLayout::new(&NamingConfig::default());

        assert_eq!(layout.sqs.queue.queue.name, "sqs-queue-project-aws-cdk-3-3");
        assert_eq!(layout.sqs.queue.queue.id, "sqs-queue-id-project-aws-cdk-3-3");
        assert_eq!(layout.sqs.queue.visibility_timeout_secs, 300);
        assert_eq!(layout.sqs.function.function.name, "sqs-lambda-project-aws-cdk-3-3");
        assert_eq!(
            layout.sqs.function.layer.name,
            "sqs-lambda_layer-project-aws-cdk-3-3"
        );
        assert_eq!(layout.sns.topic.topic.name, "sns-topic-project-aws-cdk-3-3");
        assert_eq!(
            layout.sns.topic.display_name,
            "sns-display-topic-project-aws-cdk-3-3"
        );
        assert_eq!(layout.sns.bucket.bucket.name, "sns-bucket-project-aws-cdk-3-3");
        assert!(layout.sns.bucket.versioned);
    }

    #[test]
    fn test_names_follow_suffix() {
        let layout = StackLayout::new(&NamingConfig {
            stack_suffix: "dev".to_string(),
        });
        assert_eq!(layout.suffix, "dev");
        assert_eq!(layout.sqs.bucket.bucket.name, "sqs-bucket-dev");
        assert_eq!(layout.sns.function.function.id, "sns-lambda-id-dev");
    }

    #[test]
    fn test_buckets_route_both_families() {
        let layout = StackLayout::new(&NamingConfig::default());

        for event_type in [
            S3EventType::ObjectCreatedPut,
            S3EventType::ObjectCreatedCompleteMultipartUpload,
            S3EventType::ObjectRemovedDelete,
        ] {
            assert_eq!(
                layout.sqs.bucket.notifications.matching_targets(&event_type),
                vec![NotificationTarget::Queue {
                    id: "sqs-bucket-project-aws-cdk-3-3-notification".to_string(),
                    name: "sqs-queue-project-aws-cdk-3-3".to_string(),
                }]
            );
            let targets = layout.sns.bucket.notifications.matching_targets(&event_type);
            assert!(matches!(
                targets.as_slice(),
                [NotificationTarget::Topic { name, .. }] if name == "sns-topic-project-aws-cdk-3-3"
            ));
        }

        assert!(layout
            .sns
            .bucket
            .notifications
            .matching_targets(&S3EventType::TestEvent)
            .is_empty());
    }

    #[test]
    fn test_route_event_name() {
        let layout = StackLayout::new(&NamingConfig {
            stack_suffix: "dev".to_string(),
        });

        let route = layout.route("ObjectCreated:Copy").unwrap();
        assert_eq!(route.operation, Operation::Created);
        let names: Vec<_> = route
            .targets
            .iter()
            .map(|t| match t {
                NotificationTarget::Queue { name, .. } | NotificationTarget::Topic { name, .. } => {
                    name.as_str()
                }
            })
            .collect();
        assert_eq!(names, vec!["sqs-queue-dev", "sns-topic-dev"]);

        let route = layout.route("TestEvent").unwrap();
        assert_eq!(route.operation, Operation::Unknown);
        assert!(route.targets.is_empty());

        assert!(layout.route("ObjectRestore:Post").is_none());
    }

    #[test]
    fn test_layout_serializes() {
        let json = serde_json::to_value(StackLayout::new(&NamingConfig::default())).unwrap();
        assert_eq!(json["sns"]["function"]["handler"], "sns-handler");
        assert_eq!(
            json["sqs"]["bucket"]["notifications"]["QueueConfigurations"][0]["Events"][0],
            "s3:ObjectCreated:*"
        );
    }
}
