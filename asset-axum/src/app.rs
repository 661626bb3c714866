use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::routes::asset_router;
use crate::AssetState;

/// Feed bodies above this are refused before a handler runs.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AssetApp {
    pub state: AssetState,
    pub router: Router<()>,
}

impl AssetApp {
    pub fn new(state: AssetState) -> Self {
        Self::with_body_limit(state, DEFAULT_BODY_LIMIT)
    }

    pub fn with_body_limit(state: AssetState, limit: usize) -> Self {
        // Layers run bottom-up: the id is set before tracing sees the request.
        let router = asset_router(state.clone())
            .layer(DefaultBodyLimit::max(limit))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Self { state, router }
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %listener.local_addr()?, "asset service listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
