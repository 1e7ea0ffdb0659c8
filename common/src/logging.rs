//! Logging macros shared across the workspace.
//!
//! Thin wrappers over `tracing` so every crate logs through the same
//! vocabulary. `success!` logs at info level under a dedicated target that
//! the CLI formatter renders with its own symbol.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::tracing::info!($($arg)*) };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => { $crate::tracing::info!(target: "swappr::success", $($arg)*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::tracing::warn!($($arg)*) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::tracing::error!($($arg)*) };
}
