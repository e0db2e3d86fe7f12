use cinasweeper_common::models::{Cell, Pos};

use crate::{
    data::Board,
    error::{GameError, Result},
};

/// Flags a hidden cell or clears an existing flag. Returns whether the board
/// changed; positions outside the board are ignored.
pub fn toggle_flag(board: &mut Board, at: Pos) -> Result<bool> {
    let Some(cell) = board.get_mut(at) else {
        return Ok(false);
    };

    match *cell {
        Cell::Hidden => *cell = Cell::Flagged,
        Cell::Flagged => *cell = Cell::Hidden,
        Cell::Revealed { .. } | Cell::Mine => return Err(GameError::CellAlreadyOpen(at)),
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::field::generate_board;

    #[test]
    fn toggles_between_hidden_and_flagged() {
        let mut board = generate_board(2, 2);
        let at = Pos::new(1, 0);

        assert_eq!(toggle_flag(&mut board, at), Ok(true));
        assert_eq!(board.get(at), Some(&Cell::Flagged));
        assert_eq!(toggle_flag(&mut board, at), Ok(true));
        assert_eq!(board.get(at), Some(&Cell::Hidden));
    }

    #[test]
    fn refuses_to_flag_open_cells() {
        let mut board = generate_board(2, 2);
        let at = Pos::new(0, 1);
        if let Some(cell) = board.get_mut(at) {
            *cell = Cell::Revealed { adjacent: 2 };
        }

        assert_eq!(toggle_flag(&mut board, at), Err(GameError::CellAlreadyOpen(at)));
        assert_eq!(board.get(at), Some(&Cell::Revealed { adjacent: 2 }));
    }
}
