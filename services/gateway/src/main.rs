use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod error;
mod middleware;
mod routes;
mod settings;
mod state;

use artwork::ArtworkClient;
use common::cache;
use session::SessionDecoder;
use tokio::net::TcpListener;

use crate::{settings::Settings, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gateway=info,tower_http=info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting gateway service");

    let settings = Settings::new()?;

    // An unreachable cache is not fatal; sessions read as missing until it is back
    let store = cache::connect(&settings.cache).await?;
    match store.health_check().await {
        Ok(true) => info!("Session cache connection successful"),
        _ => warn!("Session cache {} is not reachable yet", settings.cache.url),
    }

    let app_state = AppState {
        sessions: SessionDecoder::new(store, settings.session.key_prefix.clone()),
        artworks: ArtworkClient::new(settings.upstream.clone()),
        cookie_name: Arc::from(settings.session.cookie_name.as_str()),
    };

    let app = routes::create_router(app_state);

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Gateway listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
