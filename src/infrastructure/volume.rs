//! OS audio mixer control.
//!
//! The mixer is driven through the platform's own command-line tool, one
//! subprocess per update. The call blocks the caller, exactly like the
//! rest of the control loop.

use std::process::Command;
use tracing::{debug, error, warn};

pub struct VolumeMixer;

impl VolumeMixer {
    pub fn new() -> Self {
        Self
    }

    /// Set the output volume in percent. Failures are logged, never fatal.
    pub fn set_volume(&self, percent: i32) {
        debug!("Setting output volume to {percent}%");

        let output = match mixer_command(percent) {
            Some(mut cmd) => cmd.output(),
            None => {
                warn!("No audio mixer command for this platform, skipping volume update");
                return;
            }
        };

        match output {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                error!("Mixer command failed: {}", stderr.trim());
            }
            Err(e) => {
                error!("Failed to run mixer command: {e}");
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn mixer_command(percent: i32) -> Option<Command> {
    let mut cmd = Command::new("osascript");
    cmd.args(["-e", &format!("set volume output volume {percent}")]);
    Some(cmd)
}

#[cfg(target_os = "linux")]
fn mixer_command(percent: i32) -> Option<Command> {
    let mut cmd = Command::new("pactl");
    cmd.args([
        "set-sink-volume",
        "@DEFAULT_SINK@",
        &format!("{percent}%"),
    ]);
    Some(cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn mixer_command(_percent: i32) -> Option<Command> {
    None
}
