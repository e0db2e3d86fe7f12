//! Shared value types for the Cinasweeper server.
//!
//! `models` holds the engine's value shapes (positions, visible cells, moves,
//! game modes and per-move outcomes); `protocol` holds the request and response
//! bodies the HTTP layer exchanges with clients.

pub mod models;
pub mod protocol;
