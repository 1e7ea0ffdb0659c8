//! # Inventory Service Contract
//!
//! The hardware inventory collaborator: component state, ethernet interface
//! records, and board-controller management endpoints.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::hardware::{Component, EthernetInterface, RedfishEndpoint};
use crate::xname::{ComponentType, XName};

/// Query and mutate the cluster's hardware inventory.
///
/// Implemented over REST in `swappr-clients`; procedures and waiters depend
/// only on this trait so tests can substitute an in-memory inventory.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Components of the given type at or below `parent`.
    async fn query_components(
        &self,
        parent: &XName,
        component_type: ComponentType,
    ) -> Result<Vec<Component>, ApiError>;

    /// Node components at or below `parent`.
    async fn get_node_components(&self, parent: &XName) -> Result<Vec<Component>, ApiError>;

    async fn set_component_enabled(&self, xname: &XName, enabled: bool) -> Result<(), ApiError>;

    /// Enable many components in one call.
    async fn bulk_enable_components(&self, xnames: &[XName]) -> Result<(), ApiError>;

    /// Ethernet interface records, optionally restricted to components at or
    /// below `component`.
    async fn get_ethernet_interfaces(
        &self,
        component: Option<&XName>,
    ) -> Result<Vec<EthernetInterface>, ApiError>;

    /// Delete one interface record by its record id (not by component).
    async fn delete_ethernet_interface(&self, interface_id: &str) -> Result<(), ApiError>;

    /// The management endpoint record for a board controller, or `None` if
    /// the service does not know the endpoint (e.g. right after removal).
    async fn get_redfish_endpoint(&self, xname: &XName)
    -> Result<Option<RedfishEndpoint>, ApiError>;

    async fn set_redfish_endpoint_enabled(
        &self,
        xname: &XName,
        enabled: bool,
    ) -> Result<(), ApiError>;

    async fn delete_redfish_endpoint(&self, xname: &XName) -> Result<(), ApiError>;

    /// Kick off hardware discovery for everything under `xname`.
    async fn begin_discovery(&self, xname: &XName) -> Result<(), ApiError>;
}
