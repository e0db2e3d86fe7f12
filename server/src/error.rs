use cinasweeper_common::models::Pos;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game with id {0} not found")]
    GameNotFound(String),
    #[error("Game already ended, no new moves are accepted")]
    GameEnded,
    #[error("Game has not started yet")]
    GameNotStarted,
    #[error("Both seats of a 1v1 game cannot belong to the same user")]
    PlayingAgainstSelf,
    #[error("Cell {0} is already open and cannot be flagged")]
    CellAlreadyOpen(Pos),
    #[error("Invalid game configuration: {0}")]
    Configuration(String),
    #[error("You are not the owner of this game")]
    NotOwner,
    #[error("Game {0} was modified concurrently, try again")]
    Conflict(String),
    #[error("Too many games created, try again later")]
    RateLimited,
    #[error("Missing or invalid identity token")]
    Unauthorized,
    #[error("Storage failure: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
