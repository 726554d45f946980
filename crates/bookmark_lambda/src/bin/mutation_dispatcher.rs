use bookmark_lambda::adapters::dynamodb::DynamoRecordStore;
use bookmark_lambda::clients::shared_clients;
use bookmark_lambda::config::RuntimeConfig;
use bookmark_lambda::handlers::dispatcher::handle_mutation_event;
use bookmark_lambda::logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>, config: &RuntimeConfig) -> Result<(), Error> {
    let clients = shared_clients(config).await;
    let store = DynamoRecordStore::new(clients.dynamodb.clone(), config.table_name.clone());

    handle_mutation_event(event.payload, &store, config.error_policy)
        .map(|_| ())
        .map_err(|error| Error::from(error.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();
    let config = RuntimeConfig::from_env();
    lambda_runtime::run(service_fn(|event| handle_request(event, &config))).await
}
