use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use cinasweeper_common::models::{Cell, GameMode, Pos};
use serde::{Deserialize, Serialize};

mod grid;

pub use grid::{Grid, Neighbors, clamp};

/// Visible cell states of one game.
pub type Board = Grid<Cell>;

/// True identity of every cell, fixed once mines are placed.
pub type InfoGrid = Grid<Tile>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Mine,
    Clear(u8),
}

impl Tile {
    pub const MINE_SENTINEL: i8 = -1;
}

impl From<Tile> for i8 {
    fn from(tile: Tile) -> Self {
        match tile {
            Tile::Mine => Tile::MINE_SENTINEL,
            Tile::Clear(adjacent) => adjacent as i8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineField {
    height: usize,
    width: usize,
    mines: BTreeSet<Pos>,
}

impl MineField {
    pub fn new(height: usize, width: usize, mines: BTreeSet<Pos>) -> Self {
        Self {
            height,
            width,
            mines,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn count(&self) -> usize {
        self.mines.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.mines.contains(&pos)
    }

    pub fn positions(&self) -> &BTreeSet<Pos> {
        &self.mines
    }
}

/// Everything that exists once the first move has placed the mines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub board: Board,
    pub mines: MineField,
    pub info: InfoGrid,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub revision: u64,
    /// `None` until the first move, which decides where mines may not go.
    pub field: Option<Field>,
    /// Set together with the board by the move that ends the game. The `Game`
    /// record is updated afterwards and may briefly lag behind.
    pub ended: bool,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub owner: Option<UserRef>,
    pub started: bool,
    pub started_time: DateTime<Utc>,
    pub mode: GameMode,
    pub opponent_id: Option<String>,
    pub score: u32,
    pub ended: bool,
    pub revision: u64,
}

impl Game {
    /// A singleplayer game with an owner starts right away; 1v1 seats wait
    /// for a second user to claim.
    pub fn new(
        id: String,
        owner: Option<UserRef>,
        mode: GameMode,
        opponent_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let started = mode == GameMode::Singleplayer && owner.is_some();
        Self {
            id,
            owner,
            started,
            started_time: now,
            mode,
            opponent_id,
            score: 0,
            ended: false,
            revision: 0,
        }
    }

    pub fn is_owned_by(&self, user: &UserRef) -> bool {
        self.owner.as_ref().is_some_and(|owner| owner.id == user.id)
    }
}
