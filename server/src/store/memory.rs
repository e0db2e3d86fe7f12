use std::cmp::Reverse;

use chrono::Utc;
use cinasweeper_common::models::GameMode;
use dashmap::{DashMap, Entry};
use nanoid::nanoid;
use tracing::{debug, info, instrument, warn};

use super::{GameStore, StoreError, StoreResult};
use crate::data::{Game, GameState, UserRef};

/// Process-local store backed by concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: DashMap<String, Game>,
    states: DashMap<String, GameState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[instrument(level = "trace", skip(self, game))]
    fn insert_with_fresh_id(&self, mut game: Game) -> Game {
        let mut id_length = 8;
        let max_attempts_per_length = 10;

        loop {
            for _ in 0..max_attempts_per_length {
                let id = nanoid!(id_length);
                match self.games.entry(id.clone()) {
                    Entry::Occupied(_) => {
                        debug!("Game ID collision, trying another: {}", id);
                        continue;
                    }
                    Entry::Vacant(entry) => {
                        game.id = id.clone();
                        self.states.insert(id, GameState::default());
                        entry.insert(game.clone());
                        return game;
                    }
                }
            }

            warn!(
                "Exhausted ID attempts at length {}, increasing to {}",
                id_length,
                id_length + 1
            );
            id_length += 1;
        }
    }
}

fn by_score(games: &mut [Game]) {
    games.sort_by_key(|game| (Reverse(game.score), game.started_time, game.id.clone()));
}

#[rocket::async_trait]
impl GameStore for MemoryStore {
    async fn get_game(&self, id: &str) -> StoreResult<Game> {
        self.games
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn save_game(&self, game: &Game) -> StoreResult<u64> {
        let mut entry = self
            .games
            .get_mut(&game.id)
            .ok_or_else(|| StoreError::NotFound(game.id.clone()))?;

        if entry.revision != game.revision {
            debug!(
                "Rejected write to game {}: revision {} is stale, stored {}",
                game.id, game.revision, entry.revision
            );
            return Err(StoreError::Conflict(game.id.clone()));
        }

        let revision = game.revision + 1;
        *entry = Game {
            revision,
            ..game.clone()
        };
        Ok(revision)
    }

    async fn get_game_state(&self, id: &str) -> StoreResult<GameState> {
        self.states
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn save_game_state(&self, id: &str, state: &GameState) -> StoreResult<u64> {
        let mut entry = self
            .states
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if entry.revision != state.revision {
            debug!(
                "Rejected write to state of game {}: revision {} is stale, stored {}",
                id, state.revision, entry.revision
            );
            return Err(StoreError::Conflict(id.to_string()));
        }

        let revision = state.revision + 1;
        *entry = GameState {
            revision,
            ..state.clone()
        };
        Ok(revision)
    }

    async fn create_game(
        &self,
        owner: Option<UserRef>,
        mode: GameMode,
        opponent_id: Option<String>,
    ) -> StoreResult<Game> {
        let game = Game::new(String::new(), owner, mode, opponent_id, Utc::now());
        let game = self.insert_with_fresh_id(game);
        info!("Stored new {} game with ID: {}", game.mode, game.id);
        Ok(game)
    }

    async fn get_games_by_owner(&self, owner: &UserRef) -> StoreResult<Vec<Game>> {
        let mut games: Vec<Game> = self
            .games
            .iter()
            .filter(|entry| entry.value().is_owned_by(owner))
            .map(|entry| entry.value().clone())
            .collect();
        by_score(&mut games);
        Ok(games)
    }

    async fn get_top_games(&self, n: usize) -> StoreResult<Vec<Game>> {
        let mut games: Vec<Game> = self
            .games
            .iter()
            .filter(|entry| entry.value().score > 0)
            .map(|entry| entry.value().clone())
            .collect();
        by_score(&mut games);
        games.truncate(n);
        Ok(games)
    }
}
