use std::sync::Arc;

use chrono::{DateTime, Utc};
use cinasweeper_common::models::GameMode;
use tracing::{debug, info, instrument, warn};

use crate::{
    data::{Game, UserRef},
    error::{GameError, Result},
    logic::machine,
    store::GameStore,
};

/// Links the two seats of a 1v1 game.
#[derive(Clone)]
pub struct PairingManager {
    store: Arc<dyn GameStore>,
    retry_limit: usize,
}

impl PairingManager {
    pub fn new(store: Arc<dyn GameStore>, retry_limit: usize) -> Self {
        Self { store, retry_limit }
    }

    /// Creates the owner's seat plus an unowned opponent seat pointing back at
    /// it, and returns the owner's seat.
    #[instrument(level = "trace", skip(self, owner))]
    pub async fn create_pair(&self, owner: Option<UserRef>) -> Result<Game> {
        let mut seat = self.store.create_game(owner, GameMode::OneVOne, None).await?;
        let rival = self
            .store
            .create_game(None, GameMode::OneVOne, Some(seat.id.clone()))
            .await?;

        seat.opponent_id = Some(rival.id.clone());
        seat.revision = self.store.save_game(&seat).await?;

        info!("Paired games {} and {}", seat.id, rival.id);
        Ok(seat)
    }

    /// Loads the other seat of a paired game, if it has one.
    pub async fn opponent_of(&self, game: &Game) -> Result<Option<Game>> {
        match &game.opponent_id {
            Some(opponent_id) => Ok(Some(self.store.get_game(opponent_id).await?)),
            None => Ok(None),
        }
    }

    /// Persists a seat started by a claim on the other seat. A concurrent
    /// write to the seat (usually its own claim) is resolved by reloading and
    /// starting it again, which keeps any owner that was set meanwhile.
    pub async fn commit_opponent(&self, mut opponent: Game, now: DateTime<Utc>) -> Result<Game> {
        let mut attempt = 0;
        loop {
            let saved = self.store.save_game(&opponent).await;
            match saved {
                Ok(revision) => {
                    opponent.revision = revision;
                    debug!("Opponent seat {} started", opponent.id);
                    return Ok(opponent);
                }
                Err(error) => {
                    let error = GameError::from(error);
                    if !matches!(error, GameError::Conflict(_)) || attempt >= self.retry_limit {
                        return Err(error);
                    }
                }
            }

            attempt += 1;
            warn!(
                "Opponent seat {} changed concurrently, retry {}",
                opponent.id, attempt
            );
            opponent = self.store.get_game(&opponent.id).await?;
            if !machine::start(&mut opponent, now) {
                return Ok(opponent);
            }
        }
    }
}
