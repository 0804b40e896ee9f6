//! Bulb Client Module
//!
//! Holds connection state and exposes the write operations. A write on a
//! stale connection attempts exactly one reconnect; if that fails the
//! operation fails without further retry. No backoff, no queueing.

use crate::domain::color::{encode_brightness, encode_color};
use crate::domain::models::{ConnectionStatus, Rgb};
use crate::infrastructure::bluetooth::protocol::{self, BulbEndpoint};
use crate::infrastructure::bluetooth::scanner;
use btleplug::api::{Manager as _, Peripheral as _, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BulbError {
    #[error("no Bluetooth adapter available")]
    AdapterUnavailable,
    #[error("bulb `{0}` not found in scan pass")]
    DeviceNotFound(String),
    #[error("connection failed: {0}")]
    ConnectionFailed(#[source] btleplug::Error),
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("no active connection")]
    NotConnected,
    #[error("characteristic {0} not present on device")]
    CharacteristicMissing(Uuid),
    #[error("write failed: {0}")]
    WriteFailed(#[source] btleplug::Error),
}

/// Seam between the client's reconnect policy and the BLE library.
#[allow(async_fn_in_trait)]
pub trait BulbLink {
    /// Discover the bulb and open a connection to it.
    async fn connect(&mut self) -> Result<(), BulbError>;
    async fn is_connected(&self) -> bool;
    async fn write(&mut self, endpoint: BulbEndpoint, payload: &[u8]) -> Result<(), BulbError>;
    async fn disconnect(&mut self) -> Result<(), BulbError>;
}

/// btleplug-backed link: one adapter, one peripheral.
pub struct BleLink {
    adapter: Adapter,
    bulb_name: String,
    scan_window: Duration,
    peripheral: Option<Peripheral>,
}

impl BleLink {
    /// Acquire the first Bluetooth adapter on the host.
    pub async fn new(bulb_name: String, scan_window: Duration) -> Result<Self, BulbError> {
        let manager = Manager::new().await.map_err(BulbError::ConnectionFailed)?;
        let adapter = manager
            .adapters()
            .await
            .map_err(BulbError::ConnectionFailed)?
            .into_iter()
            .next()
            .ok_or(BulbError::AdapterUnavailable)?;

        Ok(Self {
            adapter,
            bulb_name,
            scan_window,
            peripheral: None,
        })
    }
}

impl BulbLink for BleLink {
    async fn connect(&mut self) -> Result<(), BulbError> {
        let peripheral = scanner::find_by_name(&self.adapter, &self.bulb_name, self.scan_window)
            .await?
            .ok_or_else(|| BulbError::DeviceNotFound(self.bulb_name.clone()))?;

        peripheral
            .connect()
            .await
            .map_err(BulbError::ConnectionFailed)?;
        peripheral
            .discover_services()
            .await
            .map_err(BulbError::ConnectionFailed)?;

        self.peripheral = Some(peripheral);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        match &self.peripheral {
            Some(peripheral) => peripheral.is_connected().await.unwrap_or(false),
            None => false,
        }
    }

    async fn write(&mut self, endpoint: BulbEndpoint, payload: &[u8]) -> Result<(), BulbError> {
        let peripheral = self.peripheral.as_ref().ok_or(BulbError::NotConnected)?;
        let uuid = endpoint.uuid();
        let characteristic = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == uuid)
            .ok_or(BulbError::CharacteristicMissing(uuid))?;

        peripheral
            .write(&characteristic, payload, WriteType::WithoutResponse)
            .await
            .map_err(classify_write_error)
    }

    async fn disconnect(&mut self) -> Result<(), BulbError> {
        if let Some(peripheral) = self.peripheral.take() {
            peripheral
                .disconnect()
                .await
                .map_err(BulbError::ConnectionFailed)?;
        }
        Ok(())
    }
}

/// Authentication problems get their own variant so the failure can carry a
/// pairing hint; everything else is a generic write failure.
fn classify_write_error(err: btleplug::Error) -> BulbError {
    match err {
        btleplug::Error::PermissionDenied => BulbError::AuthenticationRequired,
        other if other.to_string().to_lowercase().contains("authentication") => {
            BulbError::AuthenticationRequired
        }
        other => BulbError::WriteFailed(other),
    }
}

/// Bulb client over any [`BulbLink`].
///
/// States: Disconnected -> Connecting -> Connected, back to Disconnected on
/// explicit teardown. Every operation reports success as a plain bool; all
/// failure detail goes to the log.
pub struct BulbClient<L: BulbLink> {
    link: L,
    status: ConnectionStatus,
}

impl<L: BulbLink> BulbClient<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            status: ConnectionStatus::Disconnected,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Scan for the bulb and open a connection.
    ///
    /// One scan pass; `false` when the bulb is not found or any
    /// connect-time error occurs. Errors never propagate.
    pub async fn connect(&mut self) -> bool {
        self.status = ConnectionStatus::Connecting;
        match self.link.connect().await {
            Ok(()) => {
                self.status = ConnectionStatus::Connected;
                info!("Connected to bulb");
                true
            }
            Err(e) => {
                self.status = ConnectionStatus::Disconnected;
                error!("Failed to connect to bulb: {e}");
                false
            }
        }
    }

    /// Write the 4-byte color payload for `rgb`.
    pub async fn write_color(&mut self, rgb: Rgb) -> bool {
        if !self.ensure_connected().await {
            return false;
        }
        let payload = encode_color(rgb);
        match self.link.write(BulbEndpoint::Color, &payload).await {
            Ok(()) => {
                info!("Set color to {rgb:?}");
                true
            }
            Err(e) => {
                report_write_failure("color", &e);
                false
            }
        }
    }

    /// Write the 1-byte brightness payload.
    pub async fn write_brightness(&mut self, level: u8) -> bool {
        if !self.ensure_connected().await {
            return false;
        }
        let payload = encode_brightness(level);
        match self.link.write(BulbEndpoint::Brightness, &payload).await {
            Ok(()) => {
                info!("Set brightness to {level}");
                true
            }
            Err(e) => {
                report_write_failure("brightness", &e);
                false
            }
        }
    }

    /// Toggle the bulb on or off.
    pub async fn write_power(&mut self, on: bool) -> bool {
        if !self.ensure_connected().await {
            return false;
        }
        let payload = protocol::power_payload(on);
        match self.link.write(BulbEndpoint::Power, &payload).await {
            Ok(()) => {
                info!("Turned bulb {}", if on { "on" } else { "off" });
                true
            }
            Err(e) => {
                report_write_failure("power", &e);
                false
            }
        }
    }

    /// Tear down the connection. No-op when already disconnected.
    pub async fn disconnect(&mut self) {
        if !self.link.is_connected().await {
            self.status = ConnectionStatus::Disconnected;
            return;
        }
        if let Err(e) = self.link.disconnect().await {
            warn!("Error during disconnect: {e}");
        }
        self.status = ConnectionStatus::Disconnected;
        info!("Disconnected from bulb");
    }

    /// At most one reconnect attempt for a stale connection.
    async fn ensure_connected(&mut self) -> bool {
        if self.link.is_connected().await {
            return true;
        }
        warn!("Client is not connected, attempting to reconnect...");
        if self.connect().await {
            true
        } else {
            error!("Failed to reconnect to bulb");
            false
        }
    }
}

fn report_write_failure(what: &str, err: &BulbError) {
    error!("Failed to write {what} to bulb: {err}");
    if matches!(err, BulbError::AuthenticationRequired) {
        error!("Authentication required. Pair the bulb in the OS Bluetooth settings.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ScriptedLink {
        connected: bool,
        connect_succeeds: bool,
        write_error: Option<BulbError>,
        connect_calls: usize,
        write_calls: usize,
        disconnect_calls: usize,
    }

    impl BulbLink for ScriptedLink {
        async fn connect(&mut self) -> Result<(), BulbError> {
            self.connect_calls += 1;
            if self.connect_succeeds {
                self.connected = true;
                Ok(())
            } else {
                Err(BulbError::DeviceNotFound("test bulb".into()))
            }
        }

        async fn is_connected(&self) -> bool {
            self.connected
        }

        async fn write(&mut self, _: BulbEndpoint, _: &[u8]) -> Result<(), BulbError> {
            self.write_calls += 1;
            match self.write_error.take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        async fn disconnect(&mut self) -> Result<(), BulbError> {
            self.disconnect_calls += 1;
            self.connected = false;
            Ok(())
        }
    }

    #[tokio::test]
    async fn stale_write_reconnects_once_then_writes() {
        let mut client = BulbClient::new(ScriptedLink {
            connect_succeeds: true,
            ..Default::default()
        });

        assert!(client.write_color([255, 0, 0]).await);
        assert_eq!(client.link.connect_calls, 1);
        assert_eq!(client.link.write_calls, 1);
        assert_eq!(client.status(), ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn failed_reconnect_fails_the_write_without_retry() {
        let mut client = BulbClient::new(ScriptedLink::default());

        assert!(!client.write_brightness(100).await);
        assert_eq!(client.link.connect_calls, 1);
        assert_eq!(client.link.write_calls, 0);
        assert_eq!(client.status(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn connected_client_writes_without_reconnecting() {
        let mut client = BulbClient::new(ScriptedLink {
            connected: true,
            ..Default::default()
        });

        assert!(client.write_power(true).await);
        assert_eq!(client.link.connect_calls, 0);
    }

    #[tokio::test]
    async fn write_failure_on_a_live_link_does_not_reconnect() {
        let mut client = BulbClient::new(ScriptedLink {
            connected: true,
            write_error: Some(BulbError::WriteFailed(btleplug::Error::RuntimeError(
                "gatt failure".into(),
            ))),
            ..Default::default()
        });

        assert!(!client.write_color([0, 0, 255]).await);
        assert_eq!(client.link.connect_calls, 0);
        assert_eq!(client.link.write_calls, 1);
    }

    #[tokio::test]
    async fn authentication_failure_is_still_a_plain_failure() {
        let mut client = BulbClient::new(ScriptedLink {
            connected: true,
            write_error: Some(BulbError::AuthenticationRequired),
            ..Default::default()
        });

        assert!(!client.write_brightness(40).await);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let mut client = BulbClient::new(ScriptedLink::default());

        client.disconnect().await;
        client.disconnect().await;
        assert_eq!(client.link.disconnect_calls, 0);
        assert_eq!(client.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn permission_denied_classifies_as_authentication() {
        assert!(matches!(
            classify_write_error(btleplug::Error::PermissionDenied),
            BulbError::AuthenticationRequired
        ));
        assert!(matches!(
            classify_write_error(btleplug::Error::RuntimeError(
                "Authentication required for this write".into()
            )),
            BulbError::AuthenticationRequired
        ));
        assert!(matches!(
            classify_write_error(btleplug::Error::RuntimeError("gatt failure".into())),
            BulbError::WriteFailed(_)
        ));
    }
}
