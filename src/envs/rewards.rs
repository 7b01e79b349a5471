use crate::core::{Edge, Reward};
use crate::utils::Coordinate;

/// Reward for a single step between two passable neighbouring cells.
pub const STEP_REWARD: Reward = -1.0;
/// Reward for entering the goal cell (and for staying in it).
pub const GOAL_REWARD: Reward = 1000.0;

/// Dense `n x n` transition/reward structure of a grid MDP.
///
/// Entry `(s, t)` is `Some(r)` when moving from `s` directly to `t` is legal
/// and yields reward `r`, and `None` otherwise. Rows are scanned in ascending
/// successor order, which is the tie-break order of every solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardMatrix {
    n: usize,
    edges: Vec<Edge>,
}

impl RewardMatrix {
    /// A matrix of `n` states without any legal transition.
    pub fn disconnected(n: usize) -> Self {
        Self { n, edges: vec![None; n * n] }
    }

    /// Build the structure of a `rows x rows` grid with the given goal and
    /// obstacle states.
    ///
    /// # Panics
    ///
    /// Panics if `rows == 0`, or if `goal` or any obstacle is not a state of
    /// the grid. `GridEnvironment::from_layout` validates the same inputs and
    /// reports them as errors instead.
    pub fn for_grid(rows: usize, goal: usize, obstacles: &[usize]) -> Self {
        assert!(rows > 0, "RewardMatrix::for_grid requires rows > 0");
        let n = rows * rows;
        assert!(goal < n, "goal {goal} is outside a grid of {n} states");
        if let Some(o) = obstacles.iter().find(|&&o| o >= n) {
            panic!("obstacle {o} is outside a grid of {n} states");
        }
        let mut m = Self::disconnected(n);

        // 4-connectivity
        for s in 0..n {
            for t in Coordinate::from_index(s, rows).neighbors(rows) {
                m.set(s, t.index(rows), Some(STEP_REWARD));
            }
        }

        m.set(goal, goal, Some(GOAL_REWARD));
        for t in Coordinate::from_index(goal, rows).neighbors(rows) {
            m.set(t.index(rows), goal, Some(GOAL_REWARD));
        }

        // Close every passage into and out of an obstacle.
        for &o in obstacles {
            for t in Coordinate::from_index(o, rows).neighbors(rows) {
                let t = t.index(rows);
                m.set(t, o, None);
                m.set(o, t, None);
            }
        }
        m
    }

    /// Number of states.
    pub fn len(&self) -> usize { self.n }

    pub fn is_empty(&self) -> bool { self.n == 0 }

    /// Reward of the transition `from -> to`, `None` if it is not legal.
    pub fn get(&self, from: usize, to: usize) -> Edge {
        self.edges[from * self.n + to]
    }

    pub fn is_legal(&self, from: usize, to: usize) -> bool { self.get(from, to).is_some() }

    pub(crate) fn set(&mut self, from: usize, to: usize, edge: Edge) {
        self.edges[from * self.n + to] = edge;
    }

    /// Legal successors of `from` with their rewards, in ascending state order.
    pub fn successors(&self, from: usize) -> impl Iterator<Item = (usize, Reward)> + '_ {
        let row = &self.edges[from * self.n..(from + 1) * self.n];
        row.iter().enumerate().filter_map(|(to, e)| e.map(|r| (to, r)))
    }

    /// Reward of `from -> to` as an extended real (`-inf` when illegal).
    pub fn reward_or_neg_inf(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).unwrap_or(f64::NEG_INFINITY)
    }
}
