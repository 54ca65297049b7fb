use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const SERVICE_NAME: &str = "navconfig-server";

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

#[derive(Serialize)]
pub struct BannerResponse {
    message: String,
    version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: format!("{SERVICE_NAME} is running"),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
