use cinasweeper_common::models::Cell;

use crate::data::{Board, MineField};

/// The game is won when the flagged cells are exactly the mines: every mine
/// flagged and no flag anywhere else.
pub fn check_win(board: &Board, mines: &MineField) -> bool {
    let mut flagged = 0;
    for (pos, cell) in board.iter() {
        if *cell == Cell::Flagged {
            if !mines.contains(pos) {
                return false;
            }
            flagged += 1;
        }
    }

    flagged == mines.count()
}

#[cfg(test)]
mod tests {
    use cinasweeper_common::models::Pos;

    use super::*;
    use crate::logic::{field::generate_board, flag::toggle_flag};

    fn mines(list: &[(usize, usize)]) -> MineField {
        MineField::new(3, 3, list.iter().map(|&(x, y)| Pos::new(x, y)).collect())
    }

    #[test]
    fn all_mines_flagged_wins() {
        let mines = mines(&[(0, 0), (2, 1)]);
        let mut board = generate_board(3, 3);

        toggle_flag(&mut board, Pos::new(0, 0)).unwrap();
        assert!(!check_win(&board, &mines));
        toggle_flag(&mut board, Pos::new(2, 1)).unwrap();
        assert!(check_win(&board, &mines));
    }

    #[test]
    fn stray_flag_blocks_the_win() {
        let mines = mines(&[(0, 0), (2, 1)]);
        let mut board = generate_board(3, 3);
        toggle_flag(&mut board, Pos::new(0, 0)).unwrap();
        toggle_flag(&mut board, Pos::new(2, 1)).unwrap();

        toggle_flag(&mut board, Pos::new(1, 1)).unwrap();
        assert!(!check_win(&board, &mines));

        toggle_flag(&mut board, Pos::new(1, 1)).unwrap();
        assert!(check_win(&board, &mines));
    }
}
