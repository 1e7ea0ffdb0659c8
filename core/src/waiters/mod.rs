//! Concrete waiters built on the [group wait engine](crate::waiting).

mod endpoints;
mod health;
mod power;
mod schedule;

pub use endpoints::RedfishEndpointDiscoveryWaiter;
pub use health::StorageHealthWaiter;
pub use power::IpmiPowerStateWaiter;
pub use schedule::ScheduledDiscoveryWaiter;
