//! DHCP reservation client for the Kea control agent.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use swappr_common::error::ApiError;
use swappr_common::hardware::InterfaceRecord;
use swappr_common::orchestration::DhcpBackend;

use crate::http::RestClient;

pub struct KeaDhcp {
    rest: RestClient,
}

/// The control agent answers every command with a result list.
#[derive(Deserialize)]
struct CommandResult {
    result: i64,
    #[serde(default)]
    text: String,
}

impl KeaDhcp {
    pub fn new(base_url: &str) -> Self {
        KeaDhcp {
            rest: RestClient::new(base_url),
        }
    }

    async fn command(&self, command: &str, arguments: serde_json::Value) -> Result<(), ApiError> {
        let results: Vec<CommandResult> = self
            .rest
            .post_json_response(
                "",
                &json!({
                    "command": command,
                    "service": ["dhcp4"],
                    "arguments": arguments,
                }),
            )
            .await?;

        match results.first() {
            Some(result) if result.result == 0 => Ok(()),
            Some(result) => Err(ApiError::response(
                command,
                format!("result {}: {}", result.result, result.text),
            )),
            None => Err(ApiError::response(command, "empty result list")),
        }
    }
}

#[async_trait]
impl DhcpBackend for KeaDhcp {
    async fn replace_reservations(&self, records: &[InterfaceRecord]) -> Result<(), ApiError> {
        for record in records {
            debug!(
                "Reserving {} for {} ({})",
                record.ip_address, record.mac_address, record.component_id
            );
            self.command(
                "reservation-add",
                json!({
                    "reservation": {
                        "hw-address": record.mac_address,
                        "ip-address": record.ip_address,
                        "hostname": record.component_id,
                    }
                }),
            )
            .await?;
        }
        self.command("config-write", json!({})).await
    }
}
