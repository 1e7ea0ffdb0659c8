//! REST client for the in-band power-control service.

use async_trait::async_trait;
use serde_json::json;

use swappr_common::error::ApiError;
use swappr_common::power::{PowerControl, PowerState};
use swappr_common::xname::XName;

use crate::http::RestClient;

pub struct PowerClient {
    rest: RestClient,
}

impl PowerClient {
    pub fn new(base_url: &str) -> Self {
        PowerClient {
            rest: RestClient::new(base_url),
        }
    }
}

#[async_trait]
impl PowerControl for PowerClient {
    async fn set_power_state(
        &self,
        xnames: &[XName],
        state: PowerState,
        recursive: bool,
    ) -> Result<(), ApiError> {
        self.rest
            .post_json(
                "transitions",
                &json!({
                    "operation": state.as_str(),
                    "xnames": xnames,
                    "recursive": recursive,
                }),
            )
            .await
    }
}
