use bookmark_core::routing::EventRule;
use bookmark_lambda::adapters::dynamodb::DynamoRecordStore;
use bookmark_lambda::adapters::eventbridge::EventBridgePublisher;
use bookmark_lambda::clients::shared_clients;
use bookmark_lambda::config::RuntimeConfig;
use bookmark_lambda::handlers::dispatcher::handle_routed_event;
use bookmark_lambda::handlers::resolver::{handle_resolver_event, ResolverContext};
use bookmark_lambda::logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    config: RuntimeConfig,
    rule: EventRule,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<Value, Error> {
    let clients = shared_clients(&deps.config).await;
    let store = DynamoRecordStore::new(clients.dynamodb.clone(), deps.config.table_name.clone());

    if is_bus_event(&event.payload) {
        handle_routed_event(event.payload, &deps.rule, &store, deps.config.error_policy)
            .map_err(|error| Error::from(error.to_string()))?;
        Ok(Value::Null)
    } else if is_resolver_event(&event.payload) {
        let publisher = EventBridgePublisher::new(clients.eventbridge.clone());
        let context = ResolverContext {
            rule: &deps.rule,
            event_bus_name: &deps.config.event_bus_name,
            publisher: &publisher,
            store: &store,
        };
        handle_resolver_event(event.payload, &context)
            .map_err(|error| Error::from(error.to_string()))
    } else {
        Err(Error::from(
            "unsupported event shape: expected a bus event or a resolver invocation",
        ))
    }
}

fn is_bus_event(event: &Value) -> bool {
    event
        .get("detail-type")
        .map(Value::is_string)
        .unwrap_or(false)
}

fn is_resolver_event(event: &Value) -> bool {
    event
        .get("info")
        .and_then(|info| info.get("fieldName"))
        .map(Value::is_string)
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();
    let config = RuntimeConfig::from_env();
    let deps = RuntimeDependencies {
        rule: config.event_rule(),
        config,
    };
    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
