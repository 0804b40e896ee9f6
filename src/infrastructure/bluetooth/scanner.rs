//! BLE Scanner Module
//!
//! One-pass discovery of the bulb by its advertised name.

use crate::infrastructure::bluetooth::client::BulbError;
use btleplug::api::{Central, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Peripheral};
use std::time::Duration;
use tracing::info;

/// Run one scan pass and return the first peripheral advertising `name`.
///
/// Every advertisement seen during the pass is logged, matching or not.
/// Returns `Ok(None)` when the pass completes without a match; scanning is
/// not resumed.
pub async fn find_by_name(
    adapter: &Adapter,
    name: &str,
    scan_window: Duration,
) -> Result<Option<Peripheral>, BulbError> {
    info!(
        "Scanning for `{name}` ({}s pass)...",
        scan_window.as_secs()
    );

    adapter
        .start_scan(ScanFilter::default())
        .await
        .map_err(BulbError::ConnectionFailed)?;
    tokio::time::sleep(scan_window).await;

    let peripherals = adapter
        .peripherals()
        .await
        .map_err(BulbError::ConnectionFailed)?;
    let _ = adapter.stop_scan().await;

    for peripheral in peripherals {
        let Ok(Some(properties)) = peripheral.properties().await else {
            continue;
        };
        let local_name = properties.local_name.as_deref().unwrap_or("Unknown");
        info!("Device found: {local_name}, {}", properties.address);

        if local_name == name {
            return Ok(Some(peripheral));
        }
    }

    Ok(None)
}
