//! The blade removal procedure.

use std::path::PathBuf;

use async_trait::async_trait;
use swappr_common::{info, success, warn};

use swappr_common::power::PowerState;
use swappr_common::xname::{ComponentType, XName};

use crate::blade::{BladeServices, mapping};
use crate::error::{StageError, SwapError};
use crate::stage::{Procedure, stage};

/// Quiesces and deregisters everything under a slot so its blade can be
/// physically pulled, recording the management network identity for the
/// later insertion.
pub struct SwapOutProcedure {
    xname: XName,
    mapping_file: PathBuf,
    services: BladeServices,
}

impl SwapOutProcedure {
    pub fn new(xname: XName, mapping_file: PathBuf, services: BladeServices) -> Self {
        SwapOutProcedure {
            xname,
            mapping_file,
            services,
        }
    }

    async fn pre_swap_checks(&self) -> Result<(), StageError> {
        if !self.xname.is_slot() {
            return Err(SwapError::new(format!(
                "Only slots may be swapped; {} is a {}",
                self.xname,
                self.xname.component_type()
            ))
            .into());
        }

        let nodes = self.services.inventory.get_node_components(&self.xname).await?;
        let not_off: Vec<String> = nodes
            .iter()
            .filter(|node| !node.state.is_off())
            .map(|node| node.id.to_string())
            .collect();
        if !not_off.is_empty() {
            return Err(SwapError::new(format!(
                "All nodes under {} must be powered off before it can be \
                 removed; still not off: {}",
                self.xname,
                not_off.join(", ")
            ))
            .into());
        }
        Ok(())
    }

    async fn node_bmcs(&self) -> Result<Vec<XName>, StageError> {
        let bmcs = self
            .services
            .inventory
            .query_components(&self.xname, ComponentType::NodeBmc)
            .await?;
        Ok(bmcs.into_iter().map(|bmc| bmc.id).collect())
    }

    async fn disable_redfish_endpoints(&self) -> Result<(), StageError> {
        for bmc in self.node_bmcs().await? {
            self.services
                .inventory
                .set_redfish_endpoint_enabled(&bmc, false)
                .await?;
        }
        Ok(())
    }

    async fn disable_slot(&self) -> Result<(), StageError> {
        self.services
            .inventory
            .set_component_enabled(&self.xname, false)
            .await?;
        Ok(())
    }

    async fn suspend_discovery(&self) -> Result<(), StageError> {
        self.services.schedule.set_suspended(true).await.map_err(|err| {
            SwapError::new(format!("Failed to suspend hardware discovery: {err}"))
        })?;
        Ok(())
    }

    async fn prompt_clear_controller_settings(&self) -> Result<(), StageError> {
        let listing = self
            .node_bmcs()
            .await?
            .iter()
            .map(|bmc| format!("  {bmc}"))
            .collect::<Vec<_>>()
            .join("\n");

        let message = format!(
            "Before continuing, the controller settings for the following \
             board controllers must be reset manually:\n{listing}\n\
             Have the controller settings been reset?"
        );
        if !self.services.prompter.confirm(&message) {
            return Err(SwapError::new("Blade swap canceled by user").into());
        }
        Ok(())
    }

    async fn delete_ethernet_interfaces(&self) -> Result<(), StageError> {
        for node in self.services.inventory.get_node_components(&self.xname).await? {
            for iface in self
                .services
                .inventory
                .get_ethernet_interfaces(Some(&node.id))
                .await?
            {
                self.services
                    .inventory
                    .delete_ethernet_interface(&iface.id)
                    .await?;
            }
        }
        Ok(())
    }

    async fn delete_redfish_endpoints(&self) -> Result<(), StageError> {
        for bmc in self.node_bmcs().await? {
            self.services.inventory.delete_redfish_endpoint(&bmc).await?;
        }
        Ok(())
    }

    async fn power_off_slot(&self) -> Result<(), StageError> {
        self.services
            .power
            .set_power_state(&[self.xname.clone()], PowerState::Off, true)
            .await?;
        Ok(())
    }

    async fn store_ip_mac_mapping(&self) -> Result<(), StageError> {
        let interfaces = self
            .services
            .inventory
            .get_ethernet_interfaces(Some(&self.xname))
            .await?;

        let mut records = Vec::new();
        for iface in interfaces.iter().filter(|iface| iface.is_management_network()) {
            records.push(mapping::interface_record(iface)?);
        }

        if records.is_empty() {
            warn!(
                "No management network interfaces found under {}; \
                 not writing a mapping file",
                self.xname
            );
            return Ok(());
        }

        mapping::store_mapping(&self.mapping_file, &records)?;
        info!(
            "Recorded {} interface mappings in {}",
            records.len(),
            self.mapping_file.display()
        );
        Ok(())
    }
}

#[async_trait]
impl Procedure for SwapOutProcedure {
    fn title(&self) -> &'static str {
        "Blade removal"
    }

    async fn procedure(&mut self) -> Result<(), SwapError> {
        stage("Perform pre-swap checks", self.pre_swap_checks()).await?;
        stage(
            "Mark Redfish endpoints disabled",
            self.disable_redfish_endpoints(),
        )
        .await?;
        stage("Mark the slot disabled", self.disable_slot()).await?;
        stage("Suspend the discovery cron job", self.suspend_discovery()).await?;
        stage(
            "Prompt for controller settings reset",
            self.prompt_clear_controller_settings(),
        )
        .await?;
        stage(
            "Clear node ethernet interface records",
            self.delete_ethernet_interfaces(),
        )
        .await?;
        stage(
            "Clear Redfish endpoint records",
            self.delete_redfish_endpoints(),
        )
        .await?;
        stage("Power off the slot", self.power_off_slot()).await?;
        stage(
            "Record the IP and MAC address mapping",
            self.store_ip_mac_mapping(),
        )
        .await?;

        success!("Blade {} is ready for removal", self.xname);
        Ok(())
    }
}
