//! In-memory collaborator fakes that record every call they receive.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use swappr_common::discovery::{DiscoverySchedule, ScheduleError};
use swappr_common::error::ApiError;
use swappr_common::hardware::{
    Component, ComponentState, EthernetInterface, InterfaceRecord, IpAllocation, RedfishEndpoint,
};
use swappr_common::inventory::Inventory;
use swappr_common::orchestration::{DhcpBackend, PodFinder};
use swappr_common::power::{PowerControl, PowerState};
use swappr_common::prompt::Prompter;
use swappr_common::xname::{ComponentType, XName};

pub fn xname(s: &str) -> XName {
    s.parse().expect(s)
}

pub fn component(id: &str, component_type: ComponentType, state: ComponentState) -> Component {
    Component {
        id: xname(id),
        component_type,
        state,
        enabled: true,
    }
}

pub fn interface(id: &str, component_id: &str, description: &str, mac: &str, ip: &str) -> EthernetInterface {
    EthernetInterface {
        id: id.to_string(),
        description: description.to_string(),
        component_id: Some(xname(component_id)),
        mac_address: Some(mac.to_string()),
        ip_addresses: vec![IpAllocation {
            ip_address: ip.to_string(),
        }],
        last_update: Some("2024-05-01T12:00:00Z".to_string()),
    }
}

/// An inventory that serves seeded records and keeps an operation log so
/// tests can assert what happened, and in what order.
#[derive(Default)]
pub struct FakeInventory {
    pub components: Vec<Component>,
    pub interfaces: Mutex<Vec<EthernetInterface>>,
    pub endpoints: Mutex<HashMap<String, RedfishEndpoint>>,
    pub ops: Mutex<Vec<String>>,
}

impl FakeInventory {
    pub fn log(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub fn add_enabled_endpoint(&self, id: &str) {
        self.endpoints.lock().unwrap().insert(
            id.to_string(),
            RedfishEndpoint {
                id: xname(id),
                enabled: true,
                last_discovery_status: Some("DiscoverOK".to_string()),
            },
        );
    }
}

#[async_trait]
impl Inventory for FakeInventory {
    async fn query_components(
        &self,
        parent: &XName,
        component_type: ComponentType,
    ) -> Result<Vec<Component>, ApiError> {
        Ok(self
            .components
            .iter()
            .filter(|c| c.component_type == component_type && parent.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn get_node_components(&self, parent: &XName) -> Result<Vec<Component>, ApiError> {
        self.query_components(parent, ComponentType::Node).await
    }

    async fn set_component_enabled(&self, xname: &XName, enabled: bool) -> Result<(), ApiError> {
        self.log(format!("set_enabled {xname} {enabled}"));
        Ok(())
    }

    async fn bulk_enable_components(&self, xnames: &[XName]) -> Result<(), ApiError> {
        let ids: Vec<String> = xnames.iter().map(ToString::to_string).collect();
        self.log(format!("bulk_enable {}", ids.join(",")));
        Ok(())
    }

    async fn get_ethernet_interfaces(
        &self,
        component: Option<&XName>,
    ) -> Result<Vec<EthernetInterface>, ApiError> {
        let interfaces = self.interfaces.lock().unwrap();
        Ok(interfaces
            .iter()
            .filter(|iface| match component {
                Some(parent) => iface
                    .component_id
                    .as_ref()
                    .is_some_and(|id| parent.contains(id)),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn delete_ethernet_interface(&self, interface_id: &str) -> Result<(), ApiError> {
        self.log(format!("delete_interface {interface_id}"));
        self.interfaces
            .lock()
            .unwrap()
            .retain(|iface| iface.id != interface_id);
        Ok(())
    }

    async fn get_redfish_endpoint(
        &self,
        xname: &XName,
    ) -> Result<Option<RedfishEndpoint>, ApiError> {
        Ok(self.endpoints.lock().unwrap().get(&xname.to_string()).cloned())
    }

    async fn set_redfish_endpoint_enabled(
        &self,
        xname: &XName,
        enabled: bool,
    ) -> Result<(), ApiError> {
        self.log(format!("set_endpoint_enabled {xname} {enabled}"));
        Ok(())
    }

    async fn delete_redfish_endpoint(&self, xname: &XName) -> Result<(), ApiError> {
        self.log(format!("delete_endpoint {xname}"));
        Ok(())
    }

    async fn begin_discovery(&self, xname: &XName) -> Result<(), ApiError> {
        self.log(format!("begin_discovery {xname}"));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePower {
    pub transitions: Mutex<Vec<(Vec<String>, PowerState, bool)>>,
}

#[async_trait]
impl PowerControl for FakePower {
    async fn set_power_state(
        &self,
        xnames: &[XName],
        state: PowerState,
        recursive: bool,
    ) -> Result<(), ApiError> {
        let ids = xnames.iter().map(ToString::to_string).collect();
        self.transitions.lock().unwrap().push((ids, state, recursive));
        Ok(())
    }
}

/// A schedule that reports a completed discovery cycle shortly after it is
/// resumed, and can be told to fail its next suspend/resume call.
#[derive(Default)]
pub struct FakeSchedule {
    pub fail_updates: bool,
    pub suspend_calls: Mutex<Vec<bool>>,
    pub completed: Mutex<Option<SystemTime>>,
    pub queries: Mutex<usize>,
}

#[async_trait]
impl DiscoverySchedule for FakeSchedule {
    async fn set_suspended(&self, suspended: bool) -> Result<(), ScheduleError> {
        if self.fail_updates {
            return Err(ScheduleError::Update("cron job not found".to_string()));
        }
        self.suspend_calls.lock().unwrap().push(suspended);
        if !suspended {
            // The next cycle "completes" comfortably after any resume time
            // a test could observe.
            *self.completed.lock().unwrap() =
                Some(SystemTime::now() + Duration::from_secs(3600));
        }
        Ok(())
    }

    async fn last_cycle_completed(&self) -> Result<Option<SystemTime>, ScheduleError> {
        *self.queries.lock().unwrap() += 1;
        Ok(*self.completed.lock().unwrap())
    }
}

pub struct FakePods {
    pub names: Vec<String>,
}

#[async_trait]
impl PodFinder for FakePods {
    async fn pod_names(
        &self,
        _namespace: &str,
        _label_selector: &str,
    ) -> Result<Vec<String>, ApiError> {
        Ok(self.names.clone())
    }
}

#[derive(Default)]
pub struct FakeDhcp {
    pub applied: Mutex<Vec<Vec<InterfaceRecord>>>,
}

#[async_trait]
impl DhcpBackend for FakeDhcp {
    async fn replace_reservations(&self, records: &[InterfaceRecord]) -> Result<(), ApiError> {
        self.applied.lock().unwrap().push(records.to_vec());
        Ok(())
    }
}

pub struct RecordingPrompter {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingPrompter {
    pub fn answering(answer: bool) -> Self {
        RecordingPrompter {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl Prompter for RecordingPrompter {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}
