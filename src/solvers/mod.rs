// Dynamic-programming solvers for grid MDPs.
//
// Provided algorithms:
// - ValueIteration (synchronous Bellman sweeps)
// - GaussSeidelValueIteration (in-place sweeps over true neighbours)
// - PolicyIteration (fixed-sweep evaluation + greedy improvement)

pub mod evaluation;
pub mod gauss_seidel;
pub mod policy_iteration;
pub mod value_iteration;

use std::fmt;
use std::str::FromStr;

use crate::core::{MdpError, Result, SolveResult};
use crate::envs::GridEnvironment;

pub use evaluation::{EVALUATION_SWEEPS, greedy_improvement, policy_evaluation, random_adjacent_state};
pub use gauss_seidel::GaussSeidelValueIteration;
pub use policy_iteration::PolicyIteration;
pub use value_iteration::ValueIteration;

/// Parameters shared by the solvers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Convergence threshold of the value-iteration variants, `> 0`.
    pub epsilon: f64,
    /// Discount factor, in `(0, 1)`.
    pub discount: f64,
    /// Hard ceiling on sweeps (or improvement rounds for policy iteration).
    pub max_iterations: usize,
    /// Seed of the random initial policy of policy iteration.
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { epsilon: 0.01, discount: 0.9, max_iterations: 100_000, seed: 1_234_567 }
    }
}

impl SolverConfig {
    pub fn new(epsilon: f64, discount: f64) -> Self {
        Self { epsilon, discount, ..Self::default() }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate_discount(&self) -> Result<()> {
        if self.discount > 0.0 && self.discount < 1.0 {
            Ok(())
        } else {
            Err(MdpError::InvalidParameter(format!("discount must be in (0, 1), got {}", self.discount)))
        }
    }

    pub fn validate_epsilon(&self) -> Result<()> {
        if self.epsilon > 0.0 && self.epsilon.is_finite() {
            Ok(())
        } else {
            Err(MdpError::InvalidParameter(format!("epsilon must be > 0, got {}", self.epsilon)))
        }
    }

    /// Check both `epsilon` and `discount`, as the value-iteration variants need.
    pub fn validate(&self) -> Result<()> {
        self.validate_epsilon()?;
        self.validate_discount()
    }

    /// Stopping threshold on the largest utility change of a sweep:
    /// `epsilon * (1 - discount) / (2 * discount)`.
    pub fn fuzziness(&self) -> f64 {
        self.epsilon * (1.0 - self.discount) / (2.0 * self.discount)
    }
}

/// Identifier of a solving algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    ValueIteration,
    GaussSeidel,
    PolicyIteration,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::ValueIteration, Algorithm::GaussSeidel, Algorithm::PolicyIteration];

    /// Short id used by `Display` and `FromStr`.
    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::ValueIteration => "vi",
            Algorithm::GaussSeidel => "gs-vi",
            Algorithm::PolicyIteration => "pi",
        }
    }

    /// Whether the algorithm stops on the epsilon-derived threshold.
    pub fn uses_threshold(&self) -> bool { !matches!(self, Algorithm::PolicyIteration) }

    /// Boxed solver for this algorithm.
    pub fn solver(&self, config: SolverConfig) -> Box<dyn Solver + Send + Sync> {
        match self {
            Algorithm::ValueIteration => Box::new(ValueIteration::new(config)),
            Algorithm::GaussSeidel => Box::new(GaussSeidelValueIteration::new(config)),
            Algorithm::PolicyIteration => Box::new(PolicyIteration::new(config)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.id()) }
}

impl FromStr for Algorithm {
    type Err = MdpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "vi" | "value-iteration" => Ok(Algorithm::ValueIteration),
            "gs-vi" | "gauss-seidel" | "accelerated" => Ok(Algorithm::GaussSeidel),
            "pi" | "policy-iteration" => Ok(Algorithm::PolicyIteration),
            other => Err(MdpError::InvalidParameter(format!("unknown algorithm: {other}"))),
        }
    }
}

/// A solver computes a policy and utility table for a grid environment.
pub trait Solver {
    fn algorithm(&self) -> Algorithm;

    /// Run the algorithm to convergence. The environment is only read.
    fn solve(&self, env: &GridEnvironment) -> Result<SolveResult>;
}

/// Synchronous value iteration with the given threshold and discount.
pub fn value_iteration(env: &GridEnvironment, epsilon: f64, discount: f64) -> Result<SolveResult> {
    ValueIteration::new(SolverConfig::new(epsilon, discount)).solve(env)
}

/// Gauss-Seidel accelerated value iteration with the given threshold and discount.
pub fn accelerated_value_iteration(env: &GridEnvironment, epsilon: f64, discount: f64) -> Result<SolveResult> {
    GaussSeidelValueIteration::new(SolverConfig::new(epsilon, discount)).solve(env)
}

/// Policy iteration with the given discount and the default initial-policy seed.
pub fn policy_iteration(env: &GridEnvironment, discount: f64) -> Result<SolveResult> {
    PolicyIteration::new(SolverConfig { discount, ..SolverConfig::default() }).solve(env)
}

/// Initial utility table: `-inf` for obstacles, `0` elsewhere.
pub(crate) fn initial_utility(env: &GridEnvironment) -> Vec<f64> {
    (0..env.number_of_states())
        .map(|s| if env.is_obstacle(s) { f64::NEG_INFINITY } else { 0.0 })
        .collect()
}

/// Largest pointwise change between two utility tables; equal entries
/// (including two `-inf`) count as no change.
pub(crate) fn max_change(previous: &[f64], current: &[f64]) -> f64 {
    previous
        .iter()
        .zip(current)
        .map(|(&a, &b)| if a == b { 0.0 } else { (a - b).abs() })
        .fold(0.0, f64::max)
}
