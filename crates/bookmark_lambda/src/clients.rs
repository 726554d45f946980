//! Process-wide AWS SDK clients.
//!
//! Built on first use and reused by every invocation the process serves.
//! There is no teardown; the clients live until the process exits.

use tokio::sync::OnceCell;
use tracing::info;

use crate::config::RuntimeConfig;

#[derive(Debug, Clone)]
pub struct AwsClients {
    pub dynamodb: aws_sdk_dynamodb::Client,
    pub eventbridge: aws_sdk_eventbridge::Client,
}

static CLIENTS: OnceCell<AwsClients> = OnceCell::const_new();

/// Returns the shared clients, building them on the first call.
///
/// Only the first caller's `config` is used.
pub async fn shared_clients(config: &RuntimeConfig) -> &'static AwsClients {
    CLIENTS
        .get_or_init(|| async {
            let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

            let dynamodb = match config.dynamodb_endpoint.as_deref() {
                Some(endpoint) => {
                    let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
                        .endpoint_url(endpoint)
                        .build();
                    aws_sdk_dynamodb::Client::from_conf(dynamo_config)
                }
                None => aws_sdk_dynamodb::Client::new(&sdk_config),
            };

            info!(
                event = "clients_initialized",
                table = %config.table_name,
                dynamodb_endpoint = ?config.dynamodb_endpoint,
                "initialized AWS clients"
            );

            AwsClients {
                dynamodb,
                eventbridge: aws_sdk_eventbridge::Client::new(&sdk_config),
            }
        })
        .await
}
