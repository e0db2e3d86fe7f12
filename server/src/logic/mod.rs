//! The game engine.
//!
//! Everything here except [`pairing`] is synchronous and free of I/O: it works
//! on caller-owned copies of [`Game`](crate::data::Game) and
//! [`GameState`](crate::data::GameState), so any number of requests can run it
//! in parallel.

pub mod field;
pub mod flag;
pub mod machine;
pub mod pairing;
pub mod reveal;
pub mod score;
pub mod win;

pub use field::{arm, build_info_grid, generate_board, place_mines};
pub use flag::toggle_flag;
pub use machine::{Claim, Transition, apply_move, claim};
pub use pairing::PairingManager;
pub use reveal::{RevealResult, reveal};
pub use score::score;
pub use win::check_win;
