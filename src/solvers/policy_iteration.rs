use std::time::Instant;

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::core::{MdpError, Policy, Result, SolveResult};
use crate::envs::GridEnvironment;
use crate::solvers::evaluation::{greedy_improvement, policy_evaluation, random_adjacent_state};
use crate::solvers::{Algorithm, Solver, SolverConfig};
use crate::utils::rng_from_seed;

/// Policy iteration with approximate (fixed-sweep) evaluation.
///
/// Starts from a random legal action per state, then alternates
/// [`policy_evaluation`] and [`greedy_improvement`] until an improvement
/// round leaves every action unchanged. `epsilon` is not used.
#[derive(Clone, Debug, Default)]
pub struct PolicyIteration {
    config: SolverConfig,
}

impl PolicyIteration {
    pub fn new(config: SolverConfig) -> Self { Self { config } }

    pub fn config(&self) -> &SolverConfig { &self.config }

    /// Solve drawing the initial policy from `rng` instead of `config.seed`.
    pub fn solve_with_rng<R: Rng + ?Sized>(&self, env: &GridEnvironment, rng: &mut R) -> Result<SolveResult> {
        let cfg = &self.config;
        cfg.validate_discount()?;
        let gamma = cfg.discount;
        let rewards = env.rewards();
        let n = env.number_of_states();

        let mut policy = Policy::unassigned(n);
        for s in (0..n).filter(|&s| !env.is_obstacle(s)) {
            policy.set(s, random_adjacent_state(rewards, s, rng));
        }
        // States without any action are worth -inf, like obstacles.
        let mut utility: Vec<f64> = policy
            .iter()
            .map(|a| if a.is_some() { 0.0 } else { f64::NEG_INFINITY })
            .collect();

        let mut iterations = 0;
        let started = Instant::now();
        loop {
            if iterations == cfg.max_iterations {
                warn!(iterations, "policy iteration hit the iteration ceiling");
                return Err(MdpError::FailedToConverge { algorithm: self.algorithm(), iterations });
            }
            iterations += 1;
            utility = policy_evaluation(&policy, &utility, rewards, gamma);
            let changed = greedy_improvement(&mut policy, &utility, rewards, gamma);
            trace!(iterations, changed, "policy iteration round");
            if !changed {
                break;
            }
        }

        let elapsed = started.elapsed();
        debug!(iterations, ?elapsed, "policy iteration converged");
        Ok(SolveResult::new(self.algorithm(), policy, utility, iterations, 0.0, elapsed))
    }
}

impl Solver for PolicyIteration {
    fn algorithm(&self) -> Algorithm { Algorithm::PolicyIteration }

    fn solve(&self, env: &GridEnvironment) -> Result<SolveResult> {
        let mut rng = rng_from_seed(self.config.seed);
        self.solve_with_rng(env, &mut rng)
    }
}
