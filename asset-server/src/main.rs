use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = asset_server::load_config();
    let addr = asset_server::listen_addr(&config);
    let app = asset_server::build(&config).await?;

    tracing::info!(public_url = app.state.public_url(), "starting asset service");
    app.listen(addr).await?;

    Ok(())
}
