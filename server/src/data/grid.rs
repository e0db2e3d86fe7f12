use cinasweeper_common::models::Pos;
use serde::{Deserialize, Serialize};

/// Row-major `height x width` grid addressed by [`Pos`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            height,
            width,
            cells: vec![value; height * width],
        }
    }
}

impl<T> Grid<T> {
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.height && pos.y < self.width
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| pos.x * self.width + pos.y)
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.index(pos).and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        self.index(pos).and_then(|i| self.cells.get_mut(i))
    }

    pub fn clamp(&self, x: i64, y: i64) -> Pos {
        clamp(self.height, self.width, x, y)
    }

    pub fn neighbors(&self, pos: Pos) -> Neighbors {
        Neighbors::new(pos, self.height, self.width)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Pos::new(i / width, i % width), cell))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1))
    }
}

/// Clamps signed coordinates onto a `height x width` board.
pub fn clamp(height: usize, width: usize, x: i64, y: i64) -> Pos {
    let axis = |value: i64, len: usize| {
        let max = len.saturating_sub(1);
        usize::try_from(value.max(0)).map_or(max, |v| v.min(max))
    };
    Pos::new(axis(x, height), axis(y, width))
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// In-bounds cells of the 8-neighbourhood around a position. Edges are
/// clamped, never wrapped.
#[derive(Debug)]
pub struct Neighbors {
    center: Pos,
    height: usize,
    width: usize,
    index: usize,
}

impl Neighbors {
    fn new(center: Pos, height: usize, width: usize) -> Self {
        Self {
            center,
            height,
            width,
            index: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dx, dy)) = DISPLACEMENTS.get(self.index) {
            self.index += 1;

            let (Some(x), Some(y)) = (
                self.center.x.checked_add_signed(dx),
                self.center.y.checked_add_signed(dy),
            ) else {
                continue;
            };

            if x < self.height && y < self.width {
                return Some(Pos::new(x, y));
            }
        }

        None
    }
}
