//! # Network Identity Remapping
//!
//! A blade's nodes keep their physical NICs across a relocation, but their
//! structural addresses and IP assignments change with the new slot. The
//! merge here pairs each destination record with the source record at the
//! same board/node position and keeps the source MAC, so DHCP reservations
//! keyed by MAC remain valid at the new location.

use std::fs;
use std::path::Path;

use swappr_common::hardware::{EthernetInterface, InterfaceRecord};

use crate::error::SwapError;

/// Converts an inventory interface into a persistable mapping record.
///
/// The inventory may hold sparse records; one missing any field required
/// for remapping is a domain error, not something to silently skip.
pub fn interface_record(iface: &EthernetInterface) -> Result<InterfaceRecord, SwapError> {
    let missing = |field: &str| {
        SwapError::new(format!(
            "Ethernet interface {} has no {field}; cannot record its identity",
            iface.id
        ))
    };

    Ok(InterfaceRecord {
        description: iface.description.clone(),
        component_id: iface
            .component_id
            .clone()
            .ok_or_else(|| missing("component"))?,
        mac_address: iface
            .mac_address
            .clone()
            .ok_or_else(|| missing("MAC address"))?,
        ip_address: iface
            .first_ip_address()
            .ok_or_else(|| missing("IP address"))?
            .to_string(),
    })
}

/// Merges a pre-removal snapshot with a post-insertion snapshot.
///
/// Every destination record takes its MAC address from the unique source
/// record at the same blade position; component id and IP address come from
/// the destination. Both snapshots must pair up exactly; on any mismatch
/// the merge fails whole, leaving no partial result to half-configure DHCP
/// with.
pub fn merge_mappings(
    source: &[InterfaceRecord],
    destination: &[InterfaceRecord],
) -> Result<Vec<InterfaceRecord>, SwapError> {
    if source.len() != destination.len() {
        return Err(SwapError::new(format!(
            "Source mapping has {} interfaces but destination mapping has {}; \
             the mappings cannot be merged",
            source.len(),
            destination.len()
        )));
    }

    let mut merged = Vec::with_capacity(destination.len());
    for dst in destination {
        let position = dst.component_id.blade_suffix().ok_or_else(|| {
            SwapError::new(format!(
                "{} has no board/node position to match on",
                dst.component_id
            ))
        })?;

        let candidates: Vec<&InterfaceRecord> = source
            .iter()
            .filter(|src| src.component_id.blade_suffix().as_deref() == Some(position.as_str()))
            .collect();

        let src = match candidates.as_slice() {
            [src] => *src,
            [] => {
                return Err(SwapError::new(format!(
                    "No source interface matches destination {} at position {position}",
                    dst.component_id
                )));
            }
            _ => {
                return Err(SwapError::new(format!(
                    "Multiple source interfaces match destination {} at position {position}",
                    dst.component_id
                )));
            }
        };

        merged.push(InterfaceRecord {
            description: dst.description.clone(),
            component_id: dst.component_id.clone(),
            mac_address: src.mac_address.clone(),
            ip_address: dst.ip_address.clone(),
        });
    }

    Ok(merged)
}

pub fn store_mapping(path: &Path, records: &[InterfaceRecord]) -> Result<(), SwapError> {
    let contents = serde_json::to_string_pretty(records)
        .map_err(|err| SwapError::new(format!("Failed to serialize interface mapping: {err}")))?;
    fs::write(path, contents).map_err(|err| {
        SwapError::new(format!(
            "Failed to write mapping file {}: {err}",
            path.display()
        ))
    })
}

pub fn load_mapping(path: &Path) -> Result<Vec<InterfaceRecord>, SwapError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        SwapError::new(format!(
            "Failed to read mapping file {}: {err}",
            path.display()
        ))
    })?;
    serde_json::from_str(&contents).map_err(|err| {
        SwapError::new(format!(
            "Mapping file {} is malformed: {err}",
            path.display()
        ))
    })
}
