use std::{future::Future, sync::Arc};

use chrono::Utc;
use cinasweeper_common::{
    models::{Cell, GameMode, Move, Outcome},
    protocol::{BoardView, GameView},
};
use tracing::{info, instrument, warn};

use crate::{
    config::{BoardConfig, Settings},
    data::{Game, GameState, UserRef},
    error::{GameError, Result},
    logic::{
        PairingManager,
        machine::{self, Transition},
    },
    store::GameStore,
};

/// Outcome of [`GameService::play`] after everything was persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Played {
    pub game: Game,
    pub state: GameState,
    pub outcome: Outcome,
}

/// Wraps the pure state machine with loading, optimistic saving and retries.
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
    pairing: PairingManager,
    board: BoardConfig,
    retry_limit: usize,
    leaderboard_size: usize,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>, settings: &Settings) -> Self {
        Self {
            pairing: PairingManager::new(store.clone(), settings.retry_limit),
            store,
            board: settings.board,
            retry_limit: settings.retry_limit,
            leaderboard_size: settings.leaderboard_size,
        }
    }

    async fn retrying<T, F, Fut>(&self, id: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Err(GameError::Conflict(_)) if attempt < self.retry_limit => {
                    attempt += 1;
                    warn!("Concurrent write on game {}, retry {}", id, attempt);
                }
                result => return result,
            }
        }
    }

    #[instrument(level = "trace", skip(self, owner), fields(owner = owner.as_ref().map(|u| u.id.as_str())))]
    pub async fn create_game(&self, owner: Option<UserRef>, mode: GameMode) -> Result<Game> {
        let game = match mode {
            GameMode::Singleplayer => self.store.create_game(owner, mode, None).await?,
            GameMode::OneVOne => self.pairing.create_pair(owner).await?,
        };
        info!("Created {} game {}", game.mode, game.id);
        Ok(game)
    }

    /// Claims an unowned game for `user`. Losing a race against another claim
    /// is not an error: the caller gets the game with the winner as owner.
    #[instrument(level = "trace", skip(self, user), fields(user = %user.id))]
    pub async fn claim(&self, id: &str, user: &UserRef) -> Result<Game> {
        self.retrying(id, || self.try_claim(id, user)).await
    }

    async fn try_claim(&self, id: &str, user: &UserRef) -> Result<Game> {
        let game = self.store.get_game(id).await?;
        if game.owner.is_some() {
            return Ok(game);
        }

        let opponent = self.pairing.opponent_of(&game).await?;
        let now = Utc::now();
        let machine::Claim {
            mut game, opponent, ..
        } = machine::claim(game, opponent, user, now)?;

        // The opponent goes first: once this seat has an owner a retry turns
        // into a no-op and would never start the other seat.
        if let Some(opponent) = opponent {
            self.pairing.commit_opponent(opponent, now).await?;
        }
        game.revision = self.store.save_game(&game).await?;
        Ok(game)
    }

    #[instrument(level = "trace", skip(self, user), fields(user = %user.id))]
    pub async fn play(&self, id: &str, user: &UserRef, mv: Move) -> Result<Played> {
        self.retrying(id, || self.try_play(id, user, mv)).await
    }

    async fn try_play(&self, id: &str, user: &UserRef, mv: Move) -> Result<Played> {
        let game = self.store.get_game(id).await?;
        if !game.is_owned_by(user) {
            return Err(GameError::NotOwner);
        }
        let state = self.store.get_game_state(id).await?;
        if state.ended {
            if !game.ended {
                self.commit_end(game, &state).await?;
            }
            return Err(GameError::GameEnded);
        }

        let Transition {
            mut game,
            mut state,
            outcome,
        } = self.transition(game, state, mv)?;

        // The state write decides which of two concurrent moves wins, and the
        // ending move is the last one it lets through.
        state.revision = self.store.save_game_state(id, &state).await?;
        if outcome.ends_game() {
            game = self.commit_end(game, &state).await?;
        }

        Ok(Played {
            game,
            state,
            outcome,
        })
    }

    fn transition(&self, game: Game, state: GameState, mv: Move) -> Result<Transition> {
        machine::apply_move(game, state, mv, &self.board, &mut rand::rng(), Utc::now())
    }

    /// Copies the terminal status of a committed board onto its game record.
    /// A conflicting write is merged rather than replayed.
    async fn commit_end(&self, mut game: Game, state: &GameState) -> Result<Game> {
        game.ended = true;
        game.score = state.score;

        let mut attempt = 0;
        loop {
            let saved = self.store.save_game(&game).await;
            match saved {
                Ok(revision) => {
                    game.revision = revision;
                    return Ok(game);
                }
                Err(error) => {
                    let error = GameError::from(error);
                    if !matches!(error, GameError::Conflict(_)) || attempt >= self.retry_limit {
                        return Err(error);
                    }
                }
            }

            attempt += 1;
            let current = self.store.get_game(&game.id).await?;
            if current.ended {
                return Ok(current);
            }
            game = Game {
                ended: true,
                score: state.score,
                ..current
            };
        }
    }

    pub async fn game(&self, id: &str) -> Result<Game> {
        Ok(self.store.get_game(id).await?)
    }

    pub async fn state(&self, id: &str) -> Result<GameState> {
        Ok(self.store.get_game_state(id).await?)
    }

    pub async fn games_of(&self, user: &UserRef) -> Result<Vec<Game>> {
        Ok(self.store.get_games_by_owner(user).await?)
    }

    pub async fn leaderboard(&self) -> Result<Vec<Game>> {
        Ok(self.store.get_top_games(self.leaderboard_size).await?)
    }

    pub fn game_view(&self, game: &Game) -> GameView {
        GameView {
            id: game.id.clone(),
            owner: game.owner.as_ref().map(|owner| owner.id.clone()),
            started: game.started,
            started_time: game.started_time,
            mode: game.mode,
            opponent_id: game.opponent_id.clone(),
            score: game.score,
            ended: game.ended,
        }
    }

    /// Mine positions are only exposed once the game is over.
    pub fn board_view(&self, game: &Game, state: &GameState) -> BoardView {
        match &state.field {
            Some(field) => BoardView {
                height: field.board.height(),
                width: field.board.width(),
                mines: field.mines.count(),
                cells: field.board.rows().map(<[Cell]>::to_vec).collect(),
                mine_positions: (game.ended || state.ended)
                    .then(|| field.mines.positions().iter().copied().collect()),
            },
            None => BoardView {
                height: self.board.height,
                width: self.board.width,
                mines: self.board.mines,
                cells: vec![vec![Cell::Hidden; self.board.width]; self.board.height],
                mine_positions: None,
            },
        }
    }
}
