use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Starts a steadily ticking spinner with the given message.
pub fn start(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
