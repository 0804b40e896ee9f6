//! Color and brightness payload encoding for the bulb, plus the
//! distance-to-color scale used by the gesture controller.

use crate::domain::models::Rgb;

/// Encode an RGB triple into the 4-byte color payload the bulb expects.
///
/// Each channel is clamped to a minimum of 1 (every channel contributes,
/// and the sum can never be zero), then scaled so the three channels sum
/// to 255. The payload byte order is `[0x01, red, blue, green]`: the
/// blue/green swap matches the bulb's byte layout and must not be
/// "corrected".
///
/// Because the output is a normalization onto the 255-sum simplex, two
/// inputs with the same channel ratio encode identically.
pub fn encode_color(rgb: Rgb) -> [u8; 4] {
    let clamped = rgb.map(|chan| i64::from(chan.max(1)));
    let total: i64 = clamped.iter().sum();
    let scaled = clamped.map(|chan| (chan as f64 / total as f64 * 255.0).round() as u8);

    [0x01, scaled[0], scaled[2], scaled[1]]
}

/// Encode a brightness level into its 1-byte payload.
///
/// Identity mapping; range handling is the caller's job (the HTTP facade
/// wraps its deserialized integer to a byte before calling).
pub fn encode_brightness(level: u8) -> [u8; 1] {
    [level]
}

/// Map a normalized pointer distance in [0, 32] onto an RGB triple.
///
/// Four bands, each letting one region of the spectrum lead:
/// red up to 8, green up to 16, blue up to 24, then uniform white up to 32.
/// The 1/90 red/green slope in the blue band and the truncating conversion
/// are kept exactly as the controller has always produced them.
pub fn distance_to_rgb(value: f64) -> [u8; 3] {
    let value = value.clamp(0.0, 32.0);

    if value <= 8.0 {
        let scale_r = value / 8.0;
        let scale_gb = value / 32.0;
        [
            (255.0 * scale_r) as u8,
            (255.0 * scale_gb) as u8,
            (255.0 * scale_gb) as u8,
        ]
    } else if value <= 16.0 {
        let scale_g = value / 16.0;
        let scale_rb = value / 32.0;
        [
            (255.0 * scale_rb) as u8,
            (255.0 * scale_g) as u8,
            (255.0 * scale_rb) as u8,
        ]
    } else if value <= 24.0 {
        let scale_b = value / 24.0;
        let scale_rg = value / 90.0;
        [
            (255.0 * scale_rg) as u8,
            (255.0 * scale_rg) as u8,
            (255.0 * scale_b) as u8,
        ]
    } else {
        let scale = value / 32.0;
        [
            (255.0 * scale) as u8,
            (255.0 * scale) as u8,
            (255.0 * scale) as u8,
        ]
    }
}
