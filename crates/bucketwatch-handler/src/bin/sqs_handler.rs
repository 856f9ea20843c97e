//! SQS handler - object change notifications delivered through a queue

use std::sync::Arc;

use bucketwatch_core::types::SqsBatch;
use bucketwatch_core::BucketwatchConfig;
use bucketwatch_handler::{handle_sqs, telemetry, HandlerState};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = BucketwatchConfig::load()?;
    telemetry::init(&config.logging);

    info!(
        version = bucketwatch_core::VERSION,
        stack = %config.naming.stack_suffix,
        "Starting sqs-handler"
    );

    let state = Arc::new(HandlerState::from_config(&config)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsBatch>| {
        let state = Arc::clone(&state);
        async move { handle_sqs(&state, event).await }
    }))
    .await
}
