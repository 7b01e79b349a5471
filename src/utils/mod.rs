pub mod coord;
pub mod rng;

pub use coord::{Coordinate, grid_side};
pub use rng::{RngStream, SeedSequence, rng_from_seed, split_n};
