//! # Inventory Data Types
//!
//! Records exchanged with the hardware inventory service. Field names follow
//! the service's PascalCase wire format.

use serde::{Deserialize, Serialize};

use crate::xname::{ComponentType, XName};

/// Hardware state as tracked by the inventory service.
///
/// Unknown states are carried through as text rather than rejected, so a
/// service upgrade cannot break deserialization of component queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentState {
    Empty,
    Populated,
    Off,
    On,
    Standby,
    Ready,
    #[serde(untagged)]
    Other(String),
}

impl ComponentState {
    pub fn is_off(&self) -> bool {
        *self == ComponentState::Off
    }
}

/// One component record from the inventory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "ID")]
    pub id: XName,
    #[serde(rename = "Type")]
    pub component_type: ComponentType,
    #[serde(rename = "State")]
    pub state: ComponentState,
    #[serde(rename = "Enabled", default)]
    pub enabled: bool,
}

/// An IP address allocation attached to an ethernet interface record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAllocation {
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
}

/// One ethernet interface record from the inventory service.
///
/// Records can be sparse: a freshly discovered interface may not have a
/// component or an address yet, so those fields are optional here and their
/// presence is enforced where a procedure actually requires them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthernetInterface {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "ComponentID", default)]
    pub component_id: Option<XName>,
    #[serde(rename = "MACAddress", default)]
    pub mac_address: Option<String>,
    #[serde(rename = "IPAddresses", default)]
    pub ip_addresses: Vec<IpAllocation>,
    #[serde(rename = "LastUpdate", default)]
    pub last_update: Option<String>,
}

/// The description text marking an interface as management-network traffic.
pub const MANAGEMENT_NETWORK_DESCRIPTION: &str = "Node Management Network";

impl EthernetInterface {
    pub fn is_management_network(&self) -> bool {
        self.description.contains(MANAGEMENT_NETWORK_DESCRIPTION)
    }

    pub fn first_ip_address(&self) -> Option<&str> {
        self.ip_addresses
            .first()
            .map(|alloc| alloc.ip_address.as_str())
    }
}

/// A board controller's management endpoint record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedfishEndpoint {
    #[serde(rename = "ID")]
    pub id: XName,
    #[serde(rename = "Enabled", default)]
    pub enabled: bool,
    #[serde(rename = "LastDiscoveryStatus", default)]
    pub last_discovery_status: Option<String>,
}

/// One entry of the persisted IP/MAC mapping written by a blade removal and
/// consumed by the following insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "ComponentID")]
    pub component_id: XName,
    #[serde(rename = "MACAddress")]
    pub mac_address: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
}
