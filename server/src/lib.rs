//! Cinasweeper server
//!
//! A server-authoritative Minesweeper with solo and 1v1 modes. The engine in
//! [`logic`] is pure; [`service::GameService`] wraps it with loading and
//! optimistic saving against a [`store::GameStore`], and [`routes`] exposes
//! the operations over HTTP.

use std::sync::Arc;

use rocket::{Build, Rocket, catchers, routes};

pub mod auth;
pub mod config;
pub mod cors;
pub mod data;
pub mod error;
pub mod logic;
pub mod rate_limit;
pub mod routes;
pub mod service;
pub mod store;

use crate::{
    auth::Verifier, config::Settings, cors::create_cors, rate_limit::RateLimiter,
    service::GameService, store::GameStore,
};

/// Assembles the rocket instance around the given collaborators.
pub fn build(
    settings: Settings,
    store: Arc<dyn GameStore>,
    verifier: Verifier,
) -> Result<Rocket<Build>, rocket_cors::Error> {
    let cors = create_cors(&settings.allowed_origins)?;
    let service = GameService::new(store, &settings);
    let rate_limiter = RateLimiter::per_minute(settings.games_per_minute);

    Ok(rocket::build()
        .attach(cors)
        .manage(service)
        .manage(rate_limiter)
        .manage(verifier)
        .register("/", catchers![routes::default_catcher])
        .mount(
            "/",
            routes![
                routes::create_game,
                routes::list_games,
                routes::leaderboard,
                routes::get_game,
                routes::get_state,
                routes::claim_game,
                routes::play_move,
            ],
        ))
}
