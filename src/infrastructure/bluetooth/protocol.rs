//! Bulb GATT Protocol
//!
//! Characteristic layout of the target lamp. All channels live under the
//! same vendor service; writes are fire-and-forget.

use uuid::Uuid;

/// On/off toggle, 1 byte.
pub const POWER_CHARACTERISTIC: Uuid = Uuid::from_u128(0x932c32bd_0002_47a2_835a_a8d455b859dd);

/// Brightness level, 1 byte.
pub const BRIGHTNESS_CHARACTERISTIC: Uuid =
    Uuid::from_u128(0x932c32bd_0003_47a2_835a_a8d455b859dd);

/// Color temperature channel. Present on the device, never written here.
#[allow(dead_code)]
pub const TEMPERATURE_CHARACTERISTIC: Uuid =
    Uuid::from_u128(0x932c32bd_0004_47a2_835a_a8d455b859dd);

/// Color payload, 4 bytes (see [`crate::domain::color::encode_color`]).
pub const COLOR_CHARACTERISTIC: Uuid = Uuid::from_u128(0x932c32bd_0005_47a2_835a_a8d455b859dd);

/// Writable channels of the bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulbEndpoint {
    Power,
    Brightness,
    Color,
}

impl BulbEndpoint {
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Power => POWER_CHARACTERISTIC,
            Self::Brightness => BRIGHTNESS_CHARACTERISTIC,
            Self::Color => COLOR_CHARACTERISTIC,
        }
    }
}

/// 1-byte payload for the power toggle.
pub fn power_payload(on: bool) -> [u8; 1] {
    [on as u8]
}
