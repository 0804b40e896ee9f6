//! Hand Tracking Bridge
//!
//! Landmark detection stays external: a sidecar process (by default
//! `python3 scripts/hand_tracker.py`) owns the webcam and the MediaPipe
//! Hands model, prints `READY`, then one JSON object per processed frame.
//! This module spawns the sidecar, performs the handshake and converts
//! each line into a pixel-space [`HandFrame`].

use crate::domain::models::{HandFrame, HandPoints, Handedness, PixelPoint};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{info, warn};

/// Hand landmark indices (MediaPipe hand landmark model convention)
pub mod landmarks {
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const PINKY_TIP: usize = 20;
}

const LANDMARK_COUNT: usize = 21;

/// JSON structures for parsing the sidecar output. Coordinates are
/// normalized to the frame; extra fields (z, confidence) are ignored.
#[derive(Debug, Deserialize)]
struct LandmarkPacket {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct HandPacket {
    handedness: String,
    landmarks: Vec<LandmarkPacket>,
}

#[derive(Debug, Deserialize)]
struct FramePacket {
    width: f64,
    height: f64,
    hands: Vec<HandPacket>,
}

/// Detector sidecar handle.
pub struct HandTracker {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl HandTracker {
    /// Spawn the detector sidecar and wait for its `READY` signal.
    pub async fn spawn(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().context("Empty tracker command")?;

        info!("Starting hand detector sidecar: {}", command.join(" "));
        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start hand detector `{program}`"))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture detector stdout")?;
        let mut lines = BufReader::new(stdout).lines();

        let ready = lines
            .next_line()
            .await?
            .context("Detector exited before signaling ready")?;
        if ready.trim() != "READY" {
            anyhow::bail!("Detector did not signal ready, got: {ready}");
        }

        info!("Hand detector ready");
        Ok(Self { child, lines })
    }

    /// Next frame of tracked hands, or `None` once the sidecar's stream
    /// ends (camera closed or process exit). Malformed lines are skipped
    /// with a warning.
    pub async fn next_frame(&mut self) -> Result<Option<HandFrame>> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            match serde_json::from_str::<FramePacket>(&line) {
                Ok(packet) => return Ok(Some(convert_frame(packet))),
                Err(e) => warn!("Skipping malformed detector line: {e}"),
            }
        }
    }
}

impl Drop for HandTracker {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}

fn convert_frame(packet: FramePacket) -> HandFrame {
    let FramePacket {
        width,
        height,
        hands,
    } = packet;

    let mut frame = HandFrame::default();
    for hand in hands {
        if hand.landmarks.len() != LANDMARK_COUNT {
            warn!(
                "Expected {LANDMARK_COUNT} landmarks, got {}",
                hand.landmarks.len()
            );
            continue;
        }

        let side = match hand.handedness.as_str() {
            "Left" => Handedness::Left,
            "Right" => Handedness::Right,
            other => {
                warn!("Unknown handedness label `{other}`");
                continue;
            }
        };

        let pixel = |index: usize| PixelPoint {
            x: hand.landmarks[index].x * width,
            y: hand.landmarks[index].y * height,
        };
        let points = HandPoints {
            index_tip: pixel(landmarks::INDEX_FINGER_TIP),
            index_mcp: pixel(landmarks::INDEX_FINGER_MCP),
            thumb_tip: pixel(landmarks::THUMB_TIP),
            middle_tip: pixel(landmarks::MIDDLE_FINGER_TIP),
            pinky_tip: pixel(landmarks::PINKY_TIP),
        };

        // When the model reports a side twice, the later observation wins.
        match side {
            Handedness::Left => frame.left = Some(points),
            Handedness::Right => frame.right = Some(points),
        }
    }

    frame
}
