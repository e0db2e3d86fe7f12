use std::fmt;

use serde::{Deserialize, Serialize};

/// Visible state of a single board cell.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(tag = "state")]
pub enum Cell {
    #[default]
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
    #[serde(rename = "mine")]
    Mine,
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed { .. } | Self::Mine)
    }
}

/// Board coordinate. `x` indexes rows and `y` indexes columns.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    #[serde(rename = "flag")]
    Flag,
    #[serde(rename = "reveal")]
    Reveal,
}

/// A single player action. Coordinates are signed so that out-of-range input
/// can be clamped onto the board instead of failing to deserialize.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub x: i64,
    pub y: i64,
    pub action: Action,
}

impl Move {
    pub const fn reveal(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            action: Action::Reveal,
        }
    }

    pub const fn flag(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            action: Action::Flag,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    #[serde(rename = "singleplayer")]
    Singleplayer,
    #[serde(rename = "1v1")]
    OneVOne,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleplayer => f.write_str("singleplayer"),
            Self::OneVOne => f.write_str("1v1"),
        }
    }
}

/// Result classification of one applied move.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing on the board changed.
    #[serde(rename = "no_change")]
    NoChange,
    /// The board changed and the game goes on.
    #[serde(rename = "revealed")]
    Revealed,
    #[serde(rename = "won")]
    Won,
    #[serde(rename = "lost")]
    Lost,
}

impl Outcome {
    /// Whether the move ended the game, which means the `Game` record itself
    /// has to be saved again and not only its state.
    pub const fn ends_game(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
