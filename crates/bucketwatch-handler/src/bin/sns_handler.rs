//! SNS handler - object change notifications delivered through a topic

use std::sync::Arc;

use bucketwatch_core::types::SnsBatch;
use bucketwatch_core::BucketwatchConfig;
use bucketwatch_handler::{handle_sns, telemetry, HandlerState};
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
        "Starting sns-handler"
    );

    let state = Arc::new(HandlerState::from_config(&config)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SnsBatch>| {
        let state = Arc::clone(&state);
        async move { handle_sns(&state, event).await }
    }))
    .await
}
