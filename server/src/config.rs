use std::{env, fmt::Display, str::FromStr};

use cinasweeper_common::models::Pos;
use tracing::warn;

use crate::{
    data::clamp,
    error::{GameError, Result},
};

/// Dimensions and mine count used for every new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            height: 14,
            width: 14,
            mines: 56,
        }
    }
}

impl BoardConfig {
    pub const fn cells(&self) -> usize {
        self.height.saturating_mul(self.width)
    }

    /// Mine placement needs at least one free cell besides the excluded first
    /// move, so `mines` must stay below `cells - 1`. A board without mines
    /// would be won by the first move.
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(GameError::Configuration(format!(
                "board must not be empty, got {}x{}",
                self.height, self.width
            )));
        }

        if self.mines == 0 {
            return Err(GameError::Configuration(
                "board needs at least one mine".to_string(),
            ));
        }

        if self.mines >= self.cells() - 1 {
            return Err(GameError::Configuration(format!(
                "{} mines do not fit on a {}x{} board",
                self.mines, self.height, self.width
            )));
        }

        Ok(())
    }

    pub fn clamp(&self, x: i64, y: i64) -> Pos {
        clamp(self.height, self.width, x, y)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub board: BoardConfig,
    pub leaderboard_size: usize,
    pub games_per_minute: u32,
    pub retry_limit: usize,
    pub allowed_origins: Vec<String>,
    pub tokens: Vec<(String, String)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            leaderboard_size: 15,
            games_per_minute: 10,
            retry_limit: 3,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            tokens: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let board = BoardConfig {
            height: var_or("BOARD_HEIGHT", defaults.board.height),
            width: var_or("BOARD_WIDTH", defaults.board.width),
            mines: var_or("BOARD_MINES", defaults.board.mines),
        };

        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| split_list(&raw).map(str::to_string).collect())
            .unwrap_or(defaults.allowed_origins);

        let tokens = env::var("AUTH_TOKENS")
            .map(|raw| parse_tokens(&raw))
            .unwrap_or_default();

        Self {
            board,
            leaderboard_size: var_or("LEADERBOARD_SIZE", defaults.leaderboard_size),
            games_per_minute: var_or("RATE_LIMIT_GAMES_PER_MINUTE", defaults.games_per_minute),
            retry_limit: var_or("STORE_RETRY_LIMIT", defaults.retry_limit),
            allowed_origins,
            tokens,
        }
    }
}

fn var_or<T: FromStr + Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parses `token=user` pairs separated by commas.
pub fn parse_tokens(raw: &str) -> Vec<(String, String)> {
    split_list(raw)
        .filter_map(|pair| match pair.split_once('=') {
            Some((token, user)) if !token.trim().is_empty() && !user.trim().is_empty() => {
                Some((token.trim().to_string(), user.trim().to_string()))
            }
            _ => {
                warn!("Skipping malformed token entry {:?}", pair);
                None
            }
        })
        .collect()
}
