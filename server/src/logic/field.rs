use std::collections::BTreeSet;

use cinasweeper_common::models::{Cell, Pos};
use rand::Rng;
use tracing::debug;

use crate::{
    config::BoardConfig,
    data::{Board, Field, InfoGrid, MineField, Tile},
    error::Result,
};

pub fn generate_board(height: usize, width: usize) -> Board {
    Board::filled(height, width, Cell::Hidden)
}

/// Picks `count` distinct mine positions uniformly at random, never on
/// `excluded`.
pub fn place_mines<R: Rng + ?Sized>(
    height: usize,
    width: usize,
    count: usize,
    excluded: Pos,
    rng: &mut R,
) -> Result<MineField> {
    BoardConfig {
        height,
        width,
        mines: count,
    }
    .validate()?;

    let mut mines = BTreeSet::new();
    while mines.len() < count {
        let pos = Pos::new(rng.random_range(0..height), rng.random_range(0..width));
        if pos != excluded {
            mines.insert(pos);
        }
    }

    Ok(MineField::new(height, width, mines))
}

pub fn build_info_grid(height: usize, width: usize, mines: &MineField) -> InfoGrid {
    let mut info = InfoGrid::filled(height, width, Tile::Clear(0));

    for &mine in mines.positions() {
        if let Some(tile) = info.get_mut(mine) {
            *tile = Tile::Mine;
        }
    }

    for &mine in mines.positions() {
        for pos in info.neighbors(mine) {
            if let Some(Tile::Clear(adjacent)) = info.get_mut(pos) {
                *adjacent += 1;
            }
        }
    }

    info
}

/// Builds the full field for a game whose first move lands on `first`.
pub fn arm<R: Rng + ?Sized>(config: &BoardConfig, first: Pos, rng: &mut R) -> Result<Field> {
    let mines = place_mines(config.height, config.width, config.mines, first, rng)?;
    let info = build_info_grid(config.height, config.width, &mines);
    debug!(
        "Placed {} mines on {}x{} board, first move at {}",
        mines.count(),
        config.height,
        config.width,
        first
    );

    Ok(Field {
        board: generate_board(config.height, config.width),
        mines,
        info,
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::error::GameError;

    fn field(height: usize, width: usize, mines: &[(usize, usize)]) -> MineField {
        MineField::new(
            height,
            width,
            mines.iter().map(|&(x, y)| Pos::new(x, y)).collect(),
        )
    }

    fn as_rows(info: &InfoGrid) -> Vec<Vec<i8>> {
        info.rows()
            .map(|row| row.iter().map(|&tile| i8::from(tile)).collect())
            .collect()
    }

    #[test]
    fn fresh_board_is_hidden() {
        let board = generate_board(5, 4);
        assert_eq!(board.height(), 5);
        assert_eq!(board.width(), 4);
        assert!(board.iter().all(|(_, cell)| *cell == Cell::Hidden));
    }

    #[test]
    fn info_grid_counts_neighboring_mines() {
        let mines = field(3, 3, &[(0, 0), (1, 2), (2, 2)]);
        let info = build_info_grid(3, 3, &mines);
        assert_eq!(
            as_rows(&info),
            vec![vec![-1, 2, 1], vec![1, 3, -1], vec![0, 2, -1]]
        );
    }

    #[test]
    fn info_grid_matches_neighbor_scan() {
        let mut rng = StdRng::seed_from_u64(7);
        let mines = place_mines(9, 11, 30, Pos::new(4, 4), &mut rng).unwrap();
        let info = build_info_grid(9, 11, &mines);

        for (pos, tile) in info.iter() {
            match tile {
                Tile::Mine => assert!(mines.contains(pos)),
                Tile::Clear(adjacent) => {
                    let expected = info.neighbors(pos).filter(|&n| mines.contains(n)).count();
                    assert_eq!(usize::from(*adjacent), expected);
                    assert!(*adjacent <= 8);
                }
            }
        }
    }

    #[test]
    fn first_move_is_never_mined() {
        let excluded = Pos::new(6, 9);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mines = place_mines(14, 14, 56, excluded, &mut rng).unwrap();
            assert_eq!(mines.count(), 56);
            assert!(!mines.contains(excluded), "seed {seed} mined the first move");
        }
    }

    #[test]
    fn placing_too_many_mines_is_a_configuration_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = place_mines(3, 3, 8, Pos::new(0, 0), &mut rng);
        assert!(matches!(result, Err(GameError::Configuration(_))));
    }

    #[test]
    fn armed_field_has_matching_parts() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = BoardConfig::default();
        let field = arm(&config, Pos::new(0, 0), &mut rng).unwrap();
        assert_eq!(field.mines.count(), config.mines);
        assert_eq!(field.board.height(), config.height);
        assert_eq!(field.info.width(), config.width);
        assert_eq!(field.info.get(Pos::new(0, 0)).map(|t| *t == Tile::Mine), Some(false));
    }
}
