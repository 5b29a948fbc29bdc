//! Opening links in the user's default browser.

use std::process::{Command, Stdio};

use crate::core::dashboard::LinkOpener;
use crate::error::{MonitorError, Result};

/// Hands URLs to the platform's default URL handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl SystemBrowser {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "windows")]
fn open_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    // The empty string is the window title `start` expects first.
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(target_os = "macos")]
fn open_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

impl LinkOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(MonitorError::other("No link configured"));
        }

        // Detached; output would corrupt the alternate screen.
        open_command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MonitorError::other(format!("Failed to launch browser: {}", e)))?;

        Ok(())
    }
}
