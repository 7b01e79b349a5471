pub mod batch;
pub mod core;
pub mod envs;
pub mod solvers;
pub mod spaces;
pub mod utils;

pub use crate::batch::{AlgorithmSummary, BatchRunner, summarize};
pub use crate::core::{Edge, MdpError, Policy, Result, Reward, SolveResult};
pub use crate::envs::{GOAL_REWARD, GridConfig, GridEnvironment, RewardMatrix, STEP_REWARD};
pub use crate::solvers::{
    Algorithm, EVALUATION_SWEEPS, GaussSeidelValueIteration, PolicyIteration, Solver, SolverConfig, ValueIteration,
    accelerated_value_iteration, greedy_improvement, policy_evaluation, policy_iteration, random_adjacent_state,
    value_iteration,
};
pub use crate::spaces::{CellSpace, Space};
pub use crate::utils::{Coordinate, SeedSequence, rng_from_seed};
