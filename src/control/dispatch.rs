use crate::domain::models::ControlCommand;
use crate::infrastructure::volume::VolumeMixer;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Throttle for mode-driven emissions.
///
/// One shared last-update instant for every command kind: rapid volume and
/// bulb updates contend for the same window. An emission is allowed only
/// when strictly more than the interval has passed since the last one.
pub struct RateLimiter {
    interval: Duration,
    last_update: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_update: None,
        }
    }

    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    fn allow_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_update {
            if now.duration_since(last) <= self.interval {
                return false;
            }
        }
        self.last_update = Some(now);
        true
    }
}

/// Sends classified commands to their outputs: volume to the OS mixer,
/// color and brightness to the bulb service.
pub struct CommandDispatcher {
    http: reqwest::Client,
    base_url: String,
    mixer: VolumeMixer,
    limiter: RateLimiter,
}

impl CommandDispatcher {
    pub fn new(base_url: String, update_interval: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            mixer: VolumeMixer::new(),
            limiter: RateLimiter::new(update_interval),
        }
    }

    /// Dispatch one command, or drop it inside the throttle window.
    pub async fn dispatch(&mut self, command: ControlCommand) -> anyhow::Result<()> {
        if !self.limiter.allow() {
            trace!("Throttled: {command:?}");
            return Ok(());
        }

        match command {
            ControlCommand::SetVolume(percent) => {
                self.mixer.set_volume(percent);
            }
            ControlCommand::SetColor(rgb) => {
                debug!("Posting color {rgb:?}");
                self.http
                    .post(format!("{}/set_color", self.base_url))
                    .json(&json!({ "rgb": rgb }))
                    .send()
                    .await?;
            }
            ControlCommand::SetBrightness(level) => {
                debug!("Posting brightness {level}");
                self.http
                    .post(format!("{}/set_brightness", self.base_url))
                    .json(&json!({ "brightness": level }))
                    .send()
                    .await?;
            }
        }

        Ok(())
    }
}
