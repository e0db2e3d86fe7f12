use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Cell, GameMode, Outcome, Pos};

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CreateGameRequest {
    pub mode: GameMode,
}

/// Client-facing shape of a game record.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GameView {
    pub id: String,
    pub owner: Option<String>,
    pub started: bool,
    pub started_time: DateTime<Utc>,
    pub mode: GameMode,
    pub opponent_id: Option<String>,
    pub score: u32,
    pub ended: bool,
}

/// Client-facing shape of a board. `cells` is indexed `[x][y]`.
///
/// `mines` is only present once the game has ended.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BoardView {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    pub cells: Vec<Vec<Cell>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mine_positions: Option<Vec<Pos>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MoveResponse {
    pub outcome: Outcome,
    pub game: GameView,
    pub board: BoardView,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
