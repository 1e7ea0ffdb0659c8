//! REST client for the hardware inventory service.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use swappr_common::error::ApiError;
use swappr_common::hardware::{Component, EthernetInterface, RedfishEndpoint};
use swappr_common::inventory::Inventory;
use swappr_common::xname::{ComponentType, XName};

use crate::http::RestClient;

pub struct InventoryClient {
    rest: RestClient,
}

/// Component queries come back wrapped in an envelope.
#[derive(Deserialize)]
struct ComponentsPayload {
    #[serde(rename = "Components", default)]
    components: Vec<Component>,
}

impl InventoryClient {
    pub fn new(base_url: &str) -> Self {
        InventoryClient {
            rest: RestClient::new(base_url),
        }
    }
}

#[async_trait]
impl Inventory for InventoryClient {
    async fn query_components(
        &self,
        parent: &XName,
        component_type: ComponentType,
    ) -> Result<Vec<Component>, ApiError> {
        let payload: ComponentsPayload = self
            .rest
            .get_json(&format!(
                "State/Components/Query/{parent}?type={}",
                component_type.as_str()
            ))
            .await?;
        Ok(payload.components)
    }

    async fn get_node_components(&self, parent: &XName) -> Result<Vec<Component>, ApiError> {
        self.query_components(parent, ComponentType::Node).await
    }

    async fn set_component_enabled(&self, xname: &XName, enabled: bool) -> Result<(), ApiError> {
        self.rest
            .patch_json(
                &format!("State/Components/{xname}/Enabled"),
                &json!({ "Enabled": enabled }),
            )
            .await
    }

    async fn bulk_enable_components(&self, xnames: &[XName]) -> Result<(), ApiError> {
        self.rest
            .patch_json(
                "State/Components/BulkEnabled",
                &json!({
                    "Enabled": true,
                    "ComponentIDs": xnames,
                }),
            )
            .await
    }

    async fn get_ethernet_interfaces(
        &self,
        component: Option<&XName>,
    ) -> Result<Vec<EthernetInterface>, ApiError> {
        // The service filters on exact component ids only, so hierarchy
        // filtering happens here.
        let interfaces: Vec<EthernetInterface> =
            self.rest.get_json("Inventory/EthernetInterfaces").await?;
        Ok(match component {
            Some(parent) => interfaces
                .into_iter()
                .filter(|iface| {
                    iface
                        .component_id
                        .as_ref()
                        .is_some_and(|id| parent.contains(id))
                })
                .collect(),
            None => interfaces,
        })
    }

    async fn delete_ethernet_interface(&self, interface_id: &str) -> Result<(), ApiError> {
        self.rest
            .delete(&format!("Inventory/EthernetInterfaces/{interface_id}"))
            .await
    }

    async fn get_redfish_endpoint(
        &self,
        xname: &XName,
    ) -> Result<Option<RedfishEndpoint>, ApiError> {
        self.rest
            .get_json_opt(&format!("Inventory/RedfishEndpoints/{xname}"))
            .await
    }

    async fn set_redfish_endpoint_enabled(
        &self,
        xname: &XName,
        enabled: bool,
    ) -> Result<(), ApiError> {
        self.rest
            .patch_json(
                &format!("Inventory/RedfishEndpoints/{xname}"),
                &json!({ "Enabled": enabled }),
            )
            .await
    }

    async fn delete_redfish_endpoint(&self, xname: &XName) -> Result<(), ApiError> {
        self.rest
            .delete(&format!("Inventory/RedfishEndpoints/{xname}"))
            .await
    }

    async fn begin_discovery(&self, xname: &XName) -> Result<(), ApiError> {
        self.rest
            .post_json("Inventory/Discover", &json!({ "xnames": [xname] }))
            .await
    }
}
