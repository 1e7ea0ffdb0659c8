//! # swappr Core
//!
//! The procedures and convergence machinery behind blade lifecycle
//! transitions:
//!
//! * **[`waiting`]**: the generic group wait engine: poll a set of members
//!   against a completion condition until a deadline, tolerating per-member
//!   probe failures.
//! * **[`waiters`]**: concrete waiters for chassis power state, storage
//!   cluster health, management endpoint rediscovery, and discovery cycles.
//! * **[`stage`]**: named procedure stages with uniform logging and error
//!   translation, and the procedure runner.
//! * **[`blade`]**: the blade removal and insertion procedures, including
//!   the IP/MAC identity remapping across a physical relocation.
//! * **[`storage`]**: the storage service restart flow.
//!
//! Everything here drives remote services exclusively through the traits in
//! `swappr-common`, so the whole crate is testable against in-memory fakes.

pub mod blade;
pub mod error;
pub mod stage;
pub mod storage;
pub mod waiters;
pub mod waiting;
