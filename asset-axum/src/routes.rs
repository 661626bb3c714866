use asset_core::errors::AssetError;
use asset_pipeline::{validate, AssetType, FileName, UploadReceipt};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;

use crate::{AssetAxumError, AssetState};

type HandlerResult<T> = Result<T, AssetAxumError>;

/// Stored objects are content addressed and never change.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

pub fn asset_router(state: AssetState) -> Router<()> {
    Router::new()
        .route("/feed/{name}", get(get_feed).post(upload_feed))
        .route("/feed/{name}/{id}", post(upload_feed_with_id))
        .route("/bundle/{name}", get(get_bundle).post(bundle_feeds))
        .route("/bundle/{name}/{id}", post(bundle_feeds_with_id))
        .route("/meta/{id}", get(get_meta))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

async fn store_feed(state: &AssetState, asset_type: &str, body: Bytes) -> HandlerResult<UploadReceipt> {
    let asset_type: AssetType = asset_type.parse()?;
    let receipt = state
        .pipeline
        .upload_raw_feed(&*state.sink, asset_type, body, &state.feed_base_uri())
        .await?;
    Ok(receipt)
}

async fn store_bundle(state: &AssetState, asset_type: &str, body: &[u8]) -> HandlerResult<UploadReceipt> {
    let asset_type: AssetType = asset_type.parse()?;
    let ids = validate::feed_id_list(body)?;
    let receipt = state
        .pipeline
        .bundle_and_upload(
            &*state.sink,
            asset_type,
            &ids,
            &state.bundle_base_uri(),
            &state.pipeline.settings().bundle,
        )
        .await?;
    Ok(receipt)
}

async fn upload_feed(
    State(state): State<AssetState>,
    Path(asset_type): Path<String>,
    body: Bytes,
) -> HandlerResult<Json<UploadReceipt>> {
    Ok(Json(store_feed(&state, &asset_type, body).await?))
}

async fn upload_feed_with_id(
    State(state): State<AssetState>,
    Path((asset_type, id)): Path<(String, String)>,
    body: Bytes,
) -> HandlerResult<Json<UploadReceipt>> {
    let receipt = store_feed(&state, &asset_type, body).await?;
    state.meta.set(&id, &receipt).await?;
    Ok(Json(receipt))
}

async fn bundle_feeds(
    State(state): State<AssetState>,
    Path(asset_type): Path<String>,
    body: Bytes,
) -> HandlerResult<Json<UploadReceipt>> {
    Ok(Json(store_bundle(&state, &asset_type, &body).await?))
}

async fn bundle_feeds_with_id(
    State(state): State<AssetState>,
    Path((asset_type, id)): Path<(String, String)>,
    body: Bytes,
) -> HandlerResult<Json<UploadReceipt>> {
    let receipt = store_bundle(&state, &asset_type, &body).await?;
    state.meta.set(&id, &receipt).await?;
    Ok(Json(receipt))
}

async fn read_object(state: &AssetState, name: &FileName) -> HandlerResult<Bytes> {
    match state.sink.get(name.as_str()).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.is_not_found() => {
            Err(AssetError::not_found(format!("No file with name '{name}'")).with_source(e).into())
        }
        Err(e) => Err(AssetError::general_error(format!("Unable to read file '{name}'"))
            .with_source(e)
            .into()),
    }
}

async fn get_feed(State(state): State<AssetState>, Path(name): Path<String>) -> HandlerResult<Response> {
    let name = FileName::feed(&name)?;
    let bytes = read_object(&state, &name).await?;

    let content_type = if name.as_str().ends_with(".js") {
        AssetType::Js.content_type()
    } else {
        "application/json"
    };
    Ok(([(header::CONTENT_TYPE, content_type), (header::CACHE_CONTROL, IMMUTABLE)], bytes).into_response())
}

async fn get_bundle(State(state): State<AssetState>, Path(name): Path<String>) -> HandlerResult<Response> {
    let name = FileName::bundle(&name)?;
    let asset_type = AssetType::from_file_name(name.as_str())
        .ok_or_else(|| AssetError::bad_request(format!("Unsupported bundle file '{name}'")))?;
    let bytes = read_object(&state, &name).await?;

    Ok((
        [
            (header::CONTENT_TYPE, asset_type.content_type()),
            (header::CACHE_CONTROL, IMMUTABLE),
        ],
        bytes,
    )
        .into_response())
}

async fn get_meta(State(state): State<AssetState>, Path(id): Path<String>) -> HandlerResult<Json<UploadReceipt>> {
    Ok(Json(state.meta.get(&id).await?))
}
