//! Row/column arithmetic on a square grid of side `rows`.
//! Index layout is row-major: `index = row * rows + col`.

/// A cell position on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub fn new(row: usize, col: usize) -> Self { Self { row, col } }

    /// Coordinate of the linear state `index`.
    pub fn from_index(index: usize, rows: usize) -> Self {
        Self { row: index / rows, col: index % rows }
    }

    /// Linear state index of this coordinate.
    pub fn index(&self, rows: usize) -> usize { self.row * rows + self.col }

    pub fn row_distance(&self, other: &Coordinate) -> usize { self.row.abs_diff(other.row) }

    pub fn col_distance(&self, other: &Coordinate) -> usize { self.col.abs_diff(other.col) }

    /// True when `other` is one of the four N/S/W/E neighbours.
    pub fn is_adjacent(&self, other: &Coordinate) -> bool {
        self.row_distance(other) + self.col_distance(other) == 1
    }

    /// The up-to-four neighbours that exist on a grid of side `rows`,
    /// in north, south, west, east order.
    pub fn neighbors(self, rows: usize) -> impl Iterator<Item = Coordinate> {
        let Coordinate { row, col } = self;
        let north = row.checked_sub(1).map(|r| Coordinate::new(r, col));
        let south = (row + 1 < rows).then(|| Coordinate::new(row + 1, col));
        let west = col.checked_sub(1).map(|c| Coordinate::new(row, c));
        let east = (col + 1 < rows).then(|| Coordinate::new(row, col + 1));
        [north, south, west, east].into_iter().flatten()
    }
}

/// Side of the largest square grid that fits in `number_of_states` cells.
pub fn grid_side(number_of_states: usize) -> usize {
    let mut side = (number_of_states as f64).sqrt() as usize;
    while side * side > number_of_states {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= number_of_states {
        side += 1;
    }
    side
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip_on_small_grid() {
        for i in 0..16 {
            assert_eq!(Coordinate::from_index(i, 4).index(4), i);
        }
        assert_eq!(Coordinate::from_index(6, 4), Coordinate::new(1, 2));
    }

    #[test]
    fn corner_has_two_neighbors_center_has_four() {
        let corner: Vec<_> = Coordinate::new(0, 0).neighbors(3).collect();
        assert_eq!(corner, vec![Coordinate::new(1, 0), Coordinate::new(0, 1)]);
        assert_eq!(Coordinate::new(1, 1).neighbors(3).count(), 4);
        assert!(Coordinate::new(1, 1).neighbors(3).all(|n| n.is_adjacent(&Coordinate::new(1, 1))));
    }

    #[test]
    fn grid_side_floors_to_perfect_square() {
        assert_eq!(grid_side(1), 1);
        assert_eq!(grid_side(10), 3);
        assert_eq!(grid_side(16), 4);
        assert_eq!(grid_side(1500), 38);
        assert_eq!(grid_side(0), 0);
    }
}
