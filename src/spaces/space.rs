// Sampling surface shared by the random placement steps of grid generation.

use rand::Rng;

/// A set of values that can be sampled uniformly and tested for membership.
pub trait Space {
    type Element;

    /// Draw a sample using the provided RNG.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element;

    /// Whether the given element belongs to the space.
    fn contains(&self, elem: &Self::Element) -> bool;
}
