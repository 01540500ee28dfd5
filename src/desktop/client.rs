use anyhow::{Context, Result};
use std::process::Command;
use std::time::Duration;

use super::{ActiveWindowOracle, SaveTrigger};

/// Client for querying focus and injecting keys via the xdotool CLI
#[derive(Debug, Clone)]
pub struct XdotoolClient {
    /// Path to xdotool binary
    xdotool_path: String,
}

impl XdotoolClient {
    pub fn new() -> Self {
        Self {
            xdotool_path: "xdotool".to_string(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.xdotool_path)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute xdotool {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("xdotool {} failed: {}", args.join(" "), stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

impl ActiveWindowOracle for XdotoolClient {
    fn foreground_window_title(&self) -> Result<String> {
        self.run(&["getactivewindow", "getwindowname"])
    }
}

impl SaveTrigger for XdotoolClient {
    fn press_and_release(&self, key: &str, hold: Duration) -> Result<()> {
        self.run(&["keydown", key])?;
        std::thread::sleep(hold);
        self.run(&["keyup", key])?;
        Ok(())
    }
}

impl Default for XdotoolClient {
    fn default() -> Self {
        Self::new()
    }
}
