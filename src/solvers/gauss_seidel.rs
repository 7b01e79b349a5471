use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::core::{MdpError, Policy, Result, SolveResult};
use crate::envs::GridEnvironment;
use crate::solvers::{Algorithm, Solver, SolverConfig, initial_utility, max_change};

/// Value iteration with Gauss-Seidel (in-place) sweeps.
///
/// A single utility table is updated in state order, so the update of `s`
/// already sees this sweep's values for every successor `t < s`. Only true
/// neighbours are scanned: self-loops (including the goal's) are skipped.
/// Same stopping rule as [`ValueIteration`](super::ValueIteration).
#[derive(Clone, Debug, Default)]
pub struct GaussSeidelValueIteration {
    config: SolverConfig,
}

impl GaussSeidelValueIteration {
    pub fn new(config: SolverConfig) -> Self { Self { config } }

    pub fn config(&self) -> &SolverConfig { &self.config }
}

impl Solver for GaussSeidelValueIteration {
    fn algorithm(&self) -> Algorithm { Algorithm::GaussSeidel }

    fn solve(&self, env: &GridEnvironment) -> Result<SolveResult> {
        let cfg = &self.config;
        cfg.validate()?;
        let fuzziness = cfg.fuzziness();
        let gamma = cfg.discount;
        let rewards = env.rewards();
        let n = env.number_of_states();

        let mut policy = Policy::unassigned(n);
        let mut utility = initial_utility(env);
        let mut previous = utility.clone();
        let mut iterations = 0;
        let started = Instant::now();

        let delta = loop {
            if iterations == cfg.max_iterations {
                warn!(iterations, "gauss-seidel value iteration hit the iteration ceiling");
                return Err(MdpError::FailedToConverge { algorithm: self.algorithm(), iterations });
            }
            iterations += 1;
            previous.copy_from_slice(&utility);

            for s in 0..n {
                if env.is_obstacle(s) {
                    continue;
                }
                let mut best = f64::NEG_INFINITY;
                for (t, r) in rewards.successors(s).filter(|&(t, _)| t != s) {
                    let q = r + gamma * utility[t];
                    if best < q {
                        best = q;
                        policy.set(s, Some(t));
                    }
                }
                utility[s] = best;
            }

            let delta = max_change(&previous, &utility);
            trace!(iterations, delta, "gauss-seidel sweep");
            if delta < fuzziness {
                break delta;
            }
        };

        let elapsed = started.elapsed();
        debug!(iterations, delta, ?elapsed, "gauss-seidel value iteration converged");
        Ok(SolveResult::new(self.algorithm(), policy, utility, iterations, delta, elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::{GOAL_REWARD, STEP_REWARD};

    #[test]
    fn goal_never_chooses_its_self_loop() {
        let env = GridEnvironment::from_layout(2, 3, 0, []).unwrap();
        let res = GaussSeidelValueIteration::default().solve(&env).unwrap();
        assert_eq!(res.action(3), Some(1));
        assert_eq!(res.action(1), Some(3));
        assert_eq!(res.action(2), Some(3));
        // Fixed point of U3 = -1 + g * (1000 + g * U3).
        let g = 0.9;
        let expected = (STEP_REWARD + g * GOAL_REWARD) / (1.0 - g * g);
        assert!((res.utility()[3] - expected).abs() < 0.01);
    }

    #[test]
    fn top_row_leads_back_to_corner_goal() {
        // Goal in the top-left corner: one sweep is never enough, and the
        // converged policy walks the top row back to the goal.
        let env = GridEnvironment::from_layout(3, 0, 2, []).unwrap();
        let solver = GaussSeidelValueIteration::new(SolverConfig::default().with_max_iterations(1));
        assert!(solver.solve(&env).is_err());
        let res = GaussSeidelValueIteration::default().solve(&env).unwrap();
        assert_eq!(res.action(2), Some(1));
        assert_eq!(res.action(1), Some(0));
        assert!(res.utility()[1] > res.utility()[2]);
    }

    #[test]
    fn obstacles_get_sentinels() {
        let env = GridEnvironment::from_layout(3, 8, 0, [1, 4]).unwrap();
        let res = GaussSeidelValueIteration::default().solve(&env).unwrap();
        for o in [1, 4] {
            assert_eq!(res.action(o), None);
            assert_eq!(res.utility()[o], f64::NEG_INFINITY);
        }
        assert_eq!(res.action(0), Some(3));
    }
}
