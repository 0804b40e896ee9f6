//! Gesture control session: landmark frames in, throttled commands out.

pub mod dispatch;

use crate::domain::gestures::GestureClassifier;
use crate::domain::settings::Settings;
use crate::infrastructure::hand_tracker::HandTracker;
use dispatch::CommandDispatcher;
use std::time::Duration;
use tracing::{info, warn};

/// Run the frame loop until the detector stream ends.
///
/// Fully serialized: classification and dispatch of one frame complete
/// before the next frame is read, so a stalled outbound call stalls frame
/// consumption.
pub async fn run_control_loop(settings: &Settings) -> anyhow::Result<()> {
    let mut tracker = HandTracker::spawn(&settings.tracker_command).await?;
    let mut classifier = GestureClassifier::new(
        settings.activation_threshold,
        settings.release_threshold,
    );
    let mut dispatcher = CommandDispatcher::new(
        settings.bulb_service_url.clone(),
        Duration::from_millis(settings.update_interval_ms),
    );

    info!("Gesture control session started");
    while let Some(frame) = tracker.next_frame().await? {
        let previous_mode = classifier.mode();
        let command = classifier.process(&frame);
        if classifier.mode() != previous_mode {
            info!("Gesture mode: {:?}", classifier.mode());
        }

        let Some(command) = command else {
            continue;
        };
        if let Err(e) = dispatcher.dispatch(command).await {
            warn!("Failed to dispatch {command:?}: {e}");
        }
    }

    info!("Detector stream ended, stopping control session");
    Ok(())
}
