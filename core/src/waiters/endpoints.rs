//! Waiter for board-controller management endpoints to be rediscovered.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use swappr_common::inventory::Inventory;
use swappr_common::xname::XName;

use crate::waiting::GroupWaiter;

/// Waits for the inventory service to know each member's Redfish endpoint
/// again, enabled, after the endpoints were removed or reset.
pub struct RedfishEndpointDiscoveryWaiter {
    members: Vec<XName>,
    timeout: Duration,
    inventory: Arc<dyn Inventory>,
}

impl RedfishEndpointDiscoveryWaiter {
    pub fn new(members: Vec<XName>, inventory: Arc<dyn Inventory>, timeout: Duration) -> Self {
        RedfishEndpointDiscoveryWaiter {
            members,
            timeout,
            inventory,
        }
    }
}

#[async_trait]
impl GroupWaiter for RedfishEndpointDiscoveryWaiter {
    type Member = XName;

    fn members(&self) -> Vec<XName> {
        self.members.clone()
    }

    fn condition_name(&self) -> String {
        "Redfish endpoint discovery".to_string()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(5)
    }

    async fn member_has_completed(&mut self, member: &XName) -> anyhow::Result<bool> {
        let endpoint = self.inventory.get_redfish_endpoint(member).await?;
        Ok(endpoint.is_some_and(|endpoint| endpoint.enabled))
    }
}
