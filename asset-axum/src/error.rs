use asset_core::errors::AssetError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Handler error: any `anyhow::Error`, rendered through the `AssetError`
/// it carries (or a `GeneralError` when it carries none).
#[derive(Debug)]
pub struct AssetAxumError(pub anyhow::Error);

impl From<anyhow::Error> for AssetAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<AssetError> for AssetAxumError {
    fn from(e: AssetError) -> Self {
        Self(e.into_anyhow())
    }
}

fn respond(err: &AssetError) -> Response {
    let safe = err.sanitize_for_client();
    let status = StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(safe.to_json())).into_response()
}

impl IntoResponse for AssetAxumError {
    fn into_response(self) -> Response {
        if let Some(asset) = AssetError::from_anyhow(&self.0) {
            if asset.kind.is_client_error() {
                tracing::debug!(error = %asset, "request rejected");
            } else {
                tracing::error!(error = ?self.0, "request failed");
            }
            return respond(asset);
        }

        tracing::error!(error = ?self.0, "request failed");
        respond(&AssetError::normalize(self.0))
    }
}
