//! # Blade Removal and Insertion
//!
//! The two procedures bracketing a physical blade swap. Removal quiesces
//! and deregisters everything under a slot and records the management
//! network identity of the outgoing blade; insertion waits for the new
//! hardware to be rediscovered, re-enables it, and grafts the recorded
//! identity onto the new location so DHCP leases keyed by MAC stay valid.

pub mod mapping;
pub mod swap_in;
pub mod swap_out;

pub use swap_in::SwapInProcedure;
pub use swap_out::SwapOutProcedure;

use std::sync::Arc;

use swappr_common::discovery::DiscoverySchedule;
use swappr_common::inventory::Inventory;
use swappr_common::orchestration::{DhcpBackend, PodFinder};
use swappr_common::power::PowerControl;
use swappr_common::prompt::Prompter;

/// The collaborators a blade swap needs, bundled for construction.
#[derive(Clone)]
pub struct BladeServices {
    pub inventory: Arc<dyn Inventory>,
    pub power: Arc<dyn PowerControl>,
    pub schedule: Arc<dyn DiscoverySchedule>,
    pub pods: Arc<dyn PodFinder>,
    pub dhcp: Arc<dyn DhcpBackend>,
    pub prompter: Arc<dyn Prompter>,
}
