//! Sample spaces over grid cells.

pub mod space;

use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::utils::Coordinate;

pub use space::Space;

/// All cells of a square grid of side `rows`, sampled uniformly by drawing
/// row and column independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSpace {
    rows: usize,
}

impl CellSpace {
    pub fn new(rows: usize) -> Self {
        assert!(rows > 0, "CellSpace requires rows > 0");
        Self { rows }
    }

    pub fn rows(&self) -> usize { self.rows }

    /// Sample a cell and return its linear state index.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sample(rng).index(self.rows)
    }
}

impl Space for CellSpace {
    type Element = Coordinate;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        let axis = Uniform::from(0..self.rows);
        let row = axis.sample(rng);
        let col = axis.sample(rng);
        Coordinate::new(row, col)
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        elem.row < self.rows && elem.col < self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_stay_on_grid_and_cover_it() {
        let cells = CellSpace::new(3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 9];
        for _ in 0..500 {
            let c = cells.sample(&mut rng);
            assert!(cells.contains(&c));
            seen[c.index(3)] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert!(!cells.contains(&Coordinate::new(3, 0)));
    }

    #[test]
    fn single_cell_space_always_yields_origin() {
        let cells = CellSpace::new(1);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(cells.sample_index(&mut rng), 0);
        assert_eq!(cells.rows(), 1);
    }
}
