use std::{error::Error, sync::Arc};

use cinasweeper_server::{
    auth::{TokenTable, Verifier},
    config::Settings,
    store::{GameStore, MemoryStore},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("🚀 Starting Cinasweeper server");

    let settings = Settings::from_env();
    settings.board.validate()?;
    info!(
        "🧩 Board {}x{} with {} mines, leaderboard of {}",
        settings.board.height, settings.board.width, settings.board.mines, settings.leaderboard_size
    );

    if settings.tokens.is_empty() {
        warn!("AUTH_TOKENS is empty, every authenticated request will be rejected");
    }
    let verifier: Verifier = Arc::new(TokenTable::new(settings.tokens.clone()));
    let store: Arc<dyn GameStore> = Arc::new(MemoryStore::new());

    let rocket = cinasweeper_server::build(settings, store, verifier)?;
    info!("📡 Endpoints: POST/GET /games, GET /leaderboard, GET/PUT /games/<id>, GET /games/<id>/state, POST /games/<id>/moves");

    if let Err(e) = rocket.launch().await {
        error!("Server stopped with error: {}", e);
        return Err(e.to_string().into());
    }
    Ok(())
}
