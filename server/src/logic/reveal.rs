use std::collections::HashSet;

use cinasweeper_common::models::{Cell, Pos};

use crate::data::{Board, InfoGrid, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealResult {
    NoChange,
    /// Number of cells opened, the flood fill included.
    Opened(usize),
    Lose,
}

/// Opens the cell at `at`, flooding through zero-count cells.
///
/// Flagged and already open cells are left alone. Out-of-bounds positions are
/// a no-op; callers clamp first.
pub fn reveal(board: &mut Board, info: &InfoGrid, at: Pos) -> RevealResult {
    if board.get(at) != Some(&Cell::Hidden) {
        return RevealResult::NoChange;
    }

    if info.get(at) == Some(&Tile::Mine) {
        if let Some(cell) = board.get_mut(at) {
            *cell = Cell::Mine;
        }
        return RevealResult::Lose;
    }

    let mut visited = HashSet::from([at]);
    let mut stack = vec![at];
    let mut opened = 0;

    while let Some(pos) = stack.pop() {
        let Some(&Tile::Clear(adjacent)) = info.get(pos) else {
            continue;
        };
        match board.get_mut(pos) {
            Some(cell) if *cell == Cell::Hidden => *cell = Cell::Revealed { adjacent },
            _ => continue,
        }
        opened += 1;

        if adjacent == 0 {
            stack.extend(board.neighbors(pos).filter(|&next| visited.insert(next)));
        }
    }

    RevealResult::Opened(opened)
}
