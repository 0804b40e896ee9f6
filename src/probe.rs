//! Scan-and-exercise demo: find the bulb, cycle power, walk the primary
//! colors and ramp brightness. Useful for a first pairing check.

use crate::domain::settings::Settings;
use crate::infrastructure::bluetooth::{BleLink, BulbClient};
use std::time::Duration;
use tracing::info;

pub async fn run_probe(settings: &Settings) -> anyhow::Result<()> {
    let link = BleLink::new(
        settings.bulb_name.clone(),
        Duration::from_secs(settings.scan_seconds),
    )
    .await?;
    let mut client = BulbClient::new(link);

    if !client.connect().await {
        anyhow::bail!("Bulb not found");
    }

    info!("Turning light off...");
    client.write_power(false).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    info!("Turning light on...");
    client.write_power(true).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    for (name, rgb) in [
        ("RED", [255, 0, 0]),
        ("GREEN", [0, 255, 0]),
        ("BLUE", [0, 0, 255]),
    ] {
        info!("Setting color to {name}...");
        client.write_color(rgb).await;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    for level in 0..=255u8 {
        info!("Set brightness to {level}...");
        client.write_brightness(level).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    info!("Set brightness to 40...");
    client.write_brightness(40).await;

    client.disconnect().await;
    Ok(())
}
