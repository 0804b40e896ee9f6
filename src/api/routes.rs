use super::state::AppState;
use crate::domain::models::Rgb;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct SetColorRequest {
    /// Defaults to white when no color is provided.
    #[serde(default = "default_rgb")]
    pub rgb: Rgb,
}

fn default_rgb() -> Rgb {
    [255, 255, 255]
}

#[derive(Debug, Deserialize)]
pub struct SetBrightnessRequest {
    #[serde(default = "default_brightness")]
    pub brightness: i64,
}

fn default_brightness() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct ColorResponse {
    pub status: &'static str,
    pub color: Rgb,
}

#[derive(Debug, Serialize)]
pub struct BrightnessResponse {
    pub status: &'static str,
    pub brightness: i64,
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn set_color(
    State(state): State<AppState>,
    Json(request): Json<SetColorRequest>,
) -> Response {
    debug!("Color request: {:?}", request.rgb);
    let success = state.bulb.lock().await.write_color(request.rgb).await;

    if success {
        Json(ColorResponse {
            status: "success",
            color: request.rgb,
        })
        .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailureResponse {
                status: "failed",
                message: "Could not set color",
            }),
        )
            .into_response()
    }
}

pub async fn set_brightness(
    State(state): State<AppState>,
    Json(request): Json<SetBrightnessRequest>,
) -> Response {
    debug!("Brightness request: {}", request.brightness);
    let success = state
        .bulb
        .lock()
        .await
        .write_brightness(wrap_to_byte(request.brightness))
        .await;

    if success {
        Json(BrightnessResponse {
            status: "success",
            brightness: request.brightness,
        })
        .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailureResponse {
                status: "failed",
                message: "Could not set brightness",
            }),
        )
            .into_response()
    }
}

/// Out-of-range levels wrap modulo 256; the device payload has always been
/// a single byte and the facade does not reject.
fn wrap_to_byte(level: i64) -> u8 {
    level as u8
}
