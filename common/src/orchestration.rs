//! # Cluster Orchestration and DHCP Contracts
//!
//! The orchestration API is consulted only to locate service pods (the DHCP
//! server in particular); the DHCP backend consumes the merged interface
//! mapping so leases keyed by MAC survive a blade relocation.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::hardware::InterfaceRecord;

#[async_trait]
pub trait PodFinder: Send + Sync {
    /// Names of the pods in `namespace` matching `label_selector`.
    async fn pod_names(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<String>, ApiError>;
}

#[async_trait]
pub trait DhcpBackend: Send + Sync {
    /// Replace the host reservations for the given interfaces so future
    /// leases resolve to the recorded addresses.
    async fn replace_reservations(&self, records: &[InterfaceRecord]) -> Result<(), ApiError>;
}
