use rand::Rng;
use tracing::{debug, warn};

use crate::core::{MdpError, Result};
use crate::envs::rewards::RewardMatrix;
use crate::spaces::CellSpace;
use crate::utils::{Coordinate, grid_side, rng_from_seed};

/// Parameters of a randomly generated grid world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Requested number of states, floored to a perfect square.
    pub number_of_states: usize,
    /// Fraction of the cells turned into obstacles, in `[0, 1]`.
    pub obstacle_rate: f64,
    /// Seed of the generator used for goal, obstacle and start placement.
    pub seed: u64,
    /// Maximum draws per rejection-sampled placement.
    pub max_sampling_attempts: usize,
}

impl Default for GridConfig {
    fn default() -> Self { Self::new(100, 0.2) }
}

impl GridConfig {
    pub fn new(number_of_states: usize, obstacle_rate: f64) -> Self {
        Self {
            number_of_states,
            obstacle_rate,
            seed: 1_234_567,
            max_sampling_attempts: 100_000,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_sampling_attempts(mut self, attempts: usize) -> Self {
        self.max_sampling_attempts = attempts;
        self
    }

    /// Side of the square grid these parameters produce.
    pub fn number_of_rows(&self) -> usize { grid_side(self.number_of_states) }

    /// Check ranges and feasibility before any sampling takes place.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_states == 0 {
            return Err(MdpError::InvalidParameter("number_of_states must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.obstacle_rate) {
            return Err(MdpError::InvalidParameter(format!(
                "obstacle_rate must be in [0, 1], got {}",
                self.obstacle_rate
            )));
        }
        if self.max_sampling_attempts == 0 {
            return Err(MdpError::InvalidParameter("max_sampling_attempts must be > 0".into()));
        }
        let rows = self.number_of_rows();
        if rows < 2 {
            return Err(MdpError::InvalidParameter(format!(
                "{} states give a {rows}x{rows} grid, too small for distinct start and goal",
                self.number_of_states
            )));
        }
        let n = rows * rows;
        let obstacles = self.obstacle_count();
        if obstacles > n - 2 {
            return Err(MdpError::InvalidParameter(format!(
                "{obstacles} obstacles leave no room for a goal and a start on {n} cells"
            )));
        }
        Ok(())
    }

    /// Exact number of obstacles placed: `floor(n * obstacle_rate)`.
    pub fn obstacle_count(&self) -> usize {
        let rows = self.number_of_rows();
        ((rows * rows) as f64 * self.obstacle_rate).floor() as usize
    }
}

/// A generated grid world: reward structure plus goal, start and obstacles.
///
/// The value is immutable once built; solvers only read it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridEnvironment {
    rows: usize,
    rewards: RewardMatrix,
    obstacles: Vec<usize>,
    obstacle_mask: Vec<bool>,
    goal: usize,
    start: usize,
}

impl GridEnvironment {
    /// Generate an environment from `config`, seeding the generator with `config.seed`.
    pub fn generate(config: &GridConfig) -> Result<Self> {
        let mut rng = rng_from_seed(config.seed);
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generate an environment drawing every placement from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(config: &GridConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let rows = config.number_of_rows();
        let n = rows * rows;
        let cells = CellSpace::new(rows);
        let attempts = config.max_sampling_attempts;

        let goal = cells.sample_index(rng);

        let mut mask = vec![false; n];
        let mut obstacles = Vec::with_capacity(config.obstacle_count());
        for _ in 0..config.obstacle_count() {
            let o = sample_until(&cells, rng, attempts, "obstacle", |c| c != goal && !mask[c])?;
            mask[o] = true;
            obstacles.push(o);
        }

        let goal_at = Coordinate::from_index(goal, rows);
        let qualifies = |c: usize| {
            let at = Coordinate::from_index(c, rows);
            c != goal
                && !mask[c]
                && 2 * at.row_distance(&goal_at) >= rows
                && 2 * at.col_distance(&goal_at) >= rows
        };
        if !(0..n).any(qualifies) {
            warn!(goal, rows, "no cell qualifies as start");
            return Err(MdpError::UnsolvableConfiguration(format!(
                "no free cell lies at least {rows}/2 rows and columns away from goal {goal}"
            )));
        }
        let start = sample_until(&cells, rng, attempts, "start", qualifies)?;

        obstacles.sort_unstable();
        debug!(rows, goal, start, obstacles = obstacles.len(), "generated grid environment");
        Ok(Self {
            rows,
            rewards: RewardMatrix::for_grid(rows, goal, &obstacles),
            obstacles,
            obstacle_mask: mask,
            goal,
            start,
        })
    }

    /// Build an environment with a fixed layout. The start-distance rule of
    /// random generation is not applied.
    pub fn from_layout<I>(rows: usize, goal: usize, start: usize, obstacles: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        if rows < 2 {
            return Err(MdpError::InvalidParameter(format!("grid side must be >= 2, got {rows}")));
        }
        let n = rows * rows;
        if goal >= n || start >= n {
            return Err(MdpError::InvalidParameter(format!(
                "goal {goal} and start {start} must be < {n}"
            )));
        }
        if goal == start {
            return Err(MdpError::InvalidParameter("goal and start must differ".into()));
        }
        let mut mask = vec![false; n];
        let mut list = Vec::new();
        for o in obstacles {
            if o >= n {
                return Err(MdpError::InvalidParameter(format!("obstacle {o} must be < {n}")));
            }
            if o == goal || o == start {
                return Err(MdpError::InvalidParameter(format!("obstacle {o} overlaps goal or start")));
            }
            if !mask[o] {
                mask[o] = true;
                list.push(o);
            }
        }
        list.sort_unstable();
        Ok(Self {
            rows,
            rewards: RewardMatrix::for_grid(rows, goal, &list),
            obstacles: list,
            obstacle_mask: mask,
            goal,
            start,
        })
    }

    pub fn number_of_states(&self) -> usize { self.rows * self.rows }
    pub fn number_of_rows(&self) -> usize { self.rows }
    pub fn rewards(&self) -> &RewardMatrix { &self.rewards }
    /// Obstacle states in ascending order.
    pub fn obstacles(&self) -> &[usize] { &self.obstacles }
    pub fn is_obstacle(&self, state: usize) -> bool { self.obstacle_mask[state] }
    pub fn goal(&self) -> usize { self.goal }
    pub fn start(&self) -> usize { self.start }
    pub fn goal_coordinate(&self) -> Coordinate { Coordinate::from_index(self.goal, self.rows) }
    pub fn start_coordinate(&self) -> Coordinate { Coordinate::from_index(self.start, self.rows) }

    /// Fraction of cells that are obstacles.
    pub fn obstacle_rate(&self) -> f64 {
        self.obstacles.len() as f64 / self.number_of_states() as f64
    }
}

fn sample_until<R, F>(cells: &CellSpace, rng: &mut R, attempts: usize, what: &str, accept: F) -> Result<usize>
where
    R: Rng + ?Sized,
    F: Fn(usize) -> bool,
{
    for _ in 0..attempts {
        let c = cells.sample_index(rng);
        if accept(c) {
            return Ok(c);
        }
    }
    warn!(attempts, what, "rejection sampling exhausted");
    Err(MdpError::UnsolvableConfiguration(format!(
        "no valid {what} cell found in {attempts} attempts"
    )))
}
