//! Persistence collaborator.
//!
//! Records carry a `revision`; saves are compare-and-swap on it so that
//! concurrent writers to one game are detected instead of silently losing an
//! update.

use cinasweeper_common::models::GameMode;
use thiserror::Error;

use crate::{
    data::{Game, GameState, UserRef},
    error::GameError,
};

mod memory;

pub use memory::MemoryStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),
    #[error("record {0} changed since it was loaded")]
    Conflict(String),
    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for GameError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => GameError::GameNotFound(id),
            StoreError::Conflict(id) => GameError::Conflict(id),
            StoreError::Backend(reason) => GameError::Storage(reason),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[rocket::async_trait]
pub trait GameStore: Send + Sync {
    async fn get_game(&self, id: &str) -> StoreResult<Game>;

    /// Stores `game` if the stored revision still equals `game.revision`, and
    /// returns the new revision.
    async fn save_game(&self, game: &Game) -> StoreResult<u64>;

    async fn get_game_state(&self, id: &str) -> StoreResult<GameState>;

    /// Same contract as [`GameStore::save_game`], keyed by the game id.
    async fn save_game_state(&self, id: &str, state: &GameState) -> StoreResult<u64>;

    /// Creates a game under a fresh id together with its empty state.
    async fn create_game(
        &self,
        owner: Option<UserRef>,
        mode: GameMode,
        opponent_id: Option<String>,
    ) -> StoreResult<Game>;

    /// Games owned by `owner`, best score first.
    async fn get_games_by_owner(&self, owner: &UserRef) -> StoreResult<Vec<Game>>;

    /// The `n` best won games, best score first.
    async fn get_top_games(&self, n: usize) -> StoreResult<Vec<Game>>;
}
