use chrono::{DateTime, Utc};
use cinasweeper_common::models::{Action, Move, Outcome};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    config::BoardConfig,
    data::{Game, GameState, UserRef},
    error::{GameError, Result},
    logic::{
        field::arm,
        flag::toggle_flag,
        reveal::{RevealResult, reveal},
        score::score,
        win::check_win,
    },
};

/// Result of [`claim`]. `opponent` is the paired seat when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub game: Game,
    pub opponent: Option<Game>,
    pub changed: bool,
}

/// Result of [`apply_move`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub game: Game,
    pub state: GameState,
    pub outcome: Outcome,
}

/// Marks a game as started, keeping the first start time.
pub fn start(game: &mut Game, now: DateTime<Utc>) -> bool {
    if game.started {
        return false;
    }
    game.started = true;
    game.started_time = now;
    true
}

/// Hands an unowned game to `user` and starts it together with its opponent
/// seat. A game that already has an owner is returned untouched.
pub fn claim(
    mut game: Game,
    opponent: Option<Game>,
    user: &UserRef,
    now: DateTime<Utc>,
) -> Result<Claim> {
    if game.owner.is_some() {
        debug!("Game {} already claimed, nothing to do", game.id);
        return Ok(Claim {
            game,
            opponent,
            changed: false,
        });
    }

    let opponent = match (&game.opponent_id, opponent) {
        (None, _) => None,
        (Some(opponent_id), None) => return Err(GameError::GameNotFound(opponent_id.clone())),
        (Some(_), Some(mut opponent)) => {
            if opponent.is_owned_by(user) {
                return Err(GameError::PlayingAgainstSelf);
            }
            start(&mut opponent, now);
            Some(opponent)
        }
    };

    game.owner = Some(user.clone());
    start(&mut game, now);
    info!("Game {} claimed by {}", game.id, user.id);

    Ok(Claim {
        game,
        opponent,
        changed: true,
    })
}

/// Applies one move. Mines are placed on the first move so that its cell is
/// always safe.
pub fn apply_move<R: Rng + ?Sized>(
    mut game: Game,
    mut state: GameState,
    mv: Move,
    config: &BoardConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Transition> {
    if game.ended || state.ended {
        return Err(GameError::GameEnded);
    }
    if !game.started {
        return Err(GameError::GameNotStarted);
    }

    let mut field = match state.field.take() {
        Some(field) => field,
        None => arm(config, config.clamp(mv.x, mv.y), rng)?,
    };

    let pos = field.board.clamp(mv.x, mv.y);
    let mut outcome = match mv.action {
        Action::Reveal => match reveal(&mut field.board, &field.info, pos) {
            RevealResult::Lose => Outcome::Lost,
            RevealResult::Opened(0) | RevealResult::NoChange => Outcome::NoChange,
            RevealResult::Opened(_) => Outcome::Revealed,
        },
        Action::Flag => {
            if toggle_flag(&mut field.board, pos)? {
                Outcome::Revealed
            } else {
                Outcome::NoChange
            }
        }
    };

    if outcome != Outcome::Lost && check_win(&field.board, &field.mines) {
        outcome = Outcome::Won;
        game.score = score(game.started_time, now);
    }

    match outcome {
        Outcome::Won => {
            game.ended = true;
            info!("Game {} won with score {}", game.id, game.score);
        }
        Outcome::Lost => {
            game.ended = true;
            info!("Game {} lost on mine at {}", game.id, pos);
        }
        Outcome::Revealed | Outcome::NoChange => {
            debug!("Game {}: {:?} at {} -> {:?}", game.id, mv.action, pos, outcome);
        }
    }

    if outcome.ends_game() {
        state.ended = true;
        state.score = game.score;
    }
    state.field = Some(field);
    Ok(Transition {
        game,
        state,
        outcome,
    })
}
