mod client;

pub use client::XdotoolClient;

use anyhow::Result;
use std::time::Duration;

/// Reports which window currently holds OS focus.
pub trait ActiveWindowOracle {
    /// Title of the foreground window, compared verbatim against the
    /// configured process name.
    fn foreground_window_title(&self) -> Result<String>;
}

/// Injects a synthetic key press into the focused window.
pub trait SaveTrigger {
    /// Press `key`, hold it for `hold`, release it. Called at most once per
    /// tick, with no retry.
    fn press_and_release(&self, key: &str, hold: Duration) -> Result<()>;
}
