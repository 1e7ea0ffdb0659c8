//! The blade insertion procedure.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use swappr_common::{info, success};

use swappr_common::hardware::{EthernetInterface, InterfaceRecord};
use swappr_common::power::PowerState;
use swappr_common::xname::{ComponentType, XName};

use crate::blade::{BladeServices, mapping};
use crate::error::{StageError, SwapError};
use crate::stage::{Procedure, stage};
use crate::waiters::{RedfishEndpointDiscoveryWaiter, ScheduledDiscoveryWaiter};
use crate::waiting::GroupWaiter;

/// How long rediscovered board-controller endpoints get to reappear.
const ENDPOINT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(300);
/// How long the resumed discovery cron job gets to complete a cycle.
const DISCOVERY_CYCLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Namespace and label locating the DHCP server pod.
const DHCP_NAMESPACE: &str = "services";
const DHCP_POD_SELECTOR: &str = "app.kubernetes.io/name=dhcp-kea";

/// Brings a freshly inserted blade back into service and re-associates the
/// network identity recorded at removal with its new location.
pub struct SwapInProcedure {
    xname: XName,
    src_mapping_file: PathBuf,
    dst_mapping_file: Option<PathBuf>,
    services: BladeServices,
}

impl SwapInProcedure {
    pub fn new(
        xname: XName,
        src_mapping_file: PathBuf,
        dst_mapping_file: Option<PathBuf>,
        services: BladeServices,
    ) -> Self {
        SwapInProcedure {
            xname,
            src_mapping_file,
            dst_mapping_file,
            services,
        }
    }

    async fn wait_for_endpoints(&self, members: Vec<XName>) -> Result<(), StageError> {
        let mut waiter = RedfishEndpointDiscoveryWaiter::new(
            members,
            self.services.inventory.clone(),
            ENDPOINT_DISCOVERY_TIMEOUT,
        );
        let outcome = waiter.wait_for_completion().await;
        if !outcome.succeeded() {
            let failed: Vec<String> =
                outcome.failed.iter().map(ToString::to_string).collect();
            return Err(SwapError::new(format!(
                "Redfish endpoints were not rediscovered for: {}",
                failed.join(", ")
            ))
            .into());
        }
        Ok(())
    }

    async fn wait_for_chassis_bmc_endpoints(&self) -> Result<(), StageError> {
        let chassis = self.xname.chassis().ok_or_else(|| {
            SwapError::new(format!("{} does not sit in a chassis", self.xname))
        })?;
        let bmcs = self
            .services
            .inventory
            .query_components(&chassis, ComponentType::ChassisBmc)
            .await?;
        self.wait_for_endpoints(bmcs.into_iter().map(|bmc| bmc.id).collect())
            .await
    }

    async fn wait_for_node_bmc_endpoints(&self) -> Result<(), StageError> {
        let bmcs = self
            .services
            .inventory
            .query_components(&self.xname, ComponentType::NodeBmc)
            .await?;
        self.wait_for_endpoints(bmcs.into_iter().map(|bmc| bmc.id).collect())
            .await
    }

    async fn enable_slot(&self) -> Result<(), StageError> {
        self.services
            .inventory
            .set_component_enabled(&self.xname, true)
            .await?;
        Ok(())
    }

    async fn power_on_slot(&self) -> Result<(), StageError> {
        self.services
            .power
            .set_power_state(&[self.xname.clone()], PowerState::On, true)
            .await?;
        Ok(())
    }

    async fn enable_nodes(&self) -> Result<(), StageError> {
        let nodes = self.services.inventory.get_node_components(&self.xname).await?;
        let ids: Vec<XName> = nodes.into_iter().map(|node| node.id).collect();
        self.services.inventory.bulk_enable_components(&ids).await?;
        Ok(())
    }

    async fn begin_discovery(&self) -> Result<(), StageError> {
        self.services.inventory.begin_discovery(&self.xname).await?;
        Ok(())
    }

    async fn resume_discovery(&self) -> Result<(), StageError> {
        self.services.schedule.set_suspended(false).await.map_err(|err| {
            SwapError::new(format!("Failed to resume hardware discovery: {err}"))
        })?;

        // Only wait on the schedule once the resume actually went through.
        let mut waiter = ScheduledDiscoveryWaiter::new(
            self.services.schedule.clone(),
            SystemTime::now(),
            DISCOVERY_CYCLE_TIMEOUT,
        );
        if !waiter.wait_for_completion().await.succeeded() {
            return Err(SwapError::new(
                "Hardware discovery did not complete a cycle after being resumed",
            )
            .into());
        }
        Ok(())
    }

    /// The fresh management-network records for nodes under the slot, which
    /// double as the destination snapshot and as the stale records to drop.
    async fn fresh_node_interfaces(&self) -> Result<Vec<EthernetInterface>, StageError> {
        let interfaces = self
            .services
            .inventory
            .get_ethernet_interfaces(Some(&self.xname))
            .await?;
        Ok(interfaces
            .into_iter()
            .filter(|iface| {
                iface.is_management_network()
                    && iface
                        .component_id
                        .as_ref()
                        .is_some_and(|id| id.component_type() == ComponentType::Node)
            })
            .collect())
    }

    async fn map_ip_mac_addresses(&self) -> Result<(), StageError> {
        let source = mapping::load_mapping(&self.src_mapping_file)?;

        let fresh = self.fresh_node_interfaces().await?;
        let destination: Vec<InterfaceRecord> = match &self.dst_mapping_file {
            Some(path) => mapping::load_mapping(path)?,
            None => fresh
                .iter()
                .map(mapping::interface_record)
                .collect::<Result<_, _>>()?,
        };

        // The auto-assigned records carry the wrong MACs for relocated
        // hardware; drop them before handing DHCP the corrected identity.
        for iface in &fresh {
            self.services
                .inventory
                .delete_ethernet_interface(&iface.id)
                .await?;
        }

        let merged = mapping::merge_mappings(&source, &destination)?;

        let pods = self
            .services
            .pods
            .pod_names(DHCP_NAMESPACE, DHCP_POD_SELECTOR)
            .await?;
        let pod = pods
            .first()
            .ok_or_else(|| SwapError::new("No DHCP server pod found"))?;

        info!(
            "Applying {} address reservations through DHCP pod {pod}",
            merged.len()
        );
        self.services.dhcp.replace_reservations(&merged).await?;
        Ok(())
    }
}

#[async_trait]
impl Procedure for SwapInProcedure {
    fn title(&self) -> &'static str {
        "Blade insertion"
    }

    async fn procedure(&mut self) -> Result<(), SwapError> {
        stage(
            "Wait for chassis controller endpoints",
            self.wait_for_chassis_bmc_endpoints(),
        )
        .await?;
        stage(
            "Wait for node controller endpoints",
            self.wait_for_node_bmc_endpoints(),
        )
        .await?;
        stage("Mark the slot enabled", self.enable_slot()).await?;
        stage("Power on the slot", self.power_on_slot()).await?;
        stage("Mark blade nodes enabled", self.enable_nodes()).await?;
        stage(
            "Start hardware discovery for the slot",
            self.begin_discovery(),
        )
        .await?;
        stage(
            "Turn the discovery cron job back on",
            self.resume_discovery(),
        )
        .await?;
        stage("Map IP and MAC addresses", self.map_ip_mac_addresses()).await?;

        success!("Blade {} is back in service", self.xname);
        Ok(())
    }
}
