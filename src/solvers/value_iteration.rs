use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::core::{MdpError, Policy, Result, SolveResult};
use crate::envs::GridEnvironment;
use crate::solvers::{Algorithm, Solver, SolverConfig, initial_utility, max_change};

/// Synchronous value iteration.
///
/// Each sweep computes `U'[s] = max_t R[s, t] + discount * U[t]` from the
/// previous sweep's table only, and records the first maximizing successor
/// as the action of `s`. Stops once the largest change of a sweep drops
/// below `SolverConfig::fuzziness`.
#[derive(Clone, Debug, Default)]
pub struct ValueIteration {
    config: SolverConfig,
}

impl ValueIteration {
    pub fn new(config: SolverConfig) -> Self { Self { config } }

    pub fn config(&self) -> &SolverConfig { &self.config }
}

impl Solver for ValueIteration {
    fn algorithm(&self) -> Algorithm { Algorithm::ValueIteration }

    fn solve(&self, env: &GridEnvironment) -> Result<SolveResult> {
        let cfg = &self.config;
        cfg.validate()?;
        let fuzziness = cfg.fuzziness();
        let gamma = cfg.discount;
        let rewards = env.rewards();
        let n = env.number_of_states();

        let mut policy = Policy::unassigned(n);
        let mut current = initial_utility(env);
        let mut previous = current.clone();
        let mut iterations = 0;
        let started = Instant::now();

        let delta = loop {
            if iterations == cfg.max_iterations {
                warn!(iterations, "value iteration hit the iteration ceiling");
                return Err(MdpError::FailedToConverge { algorithm: self.algorithm(), iterations });
            }
            iterations += 1;
            previous.copy_from_slice(&current);

            for s in 0..n {
                // Obstacles keep their -inf utility and no action.
                if env.is_obstacle(s) {
                    continue;
                }
                let mut best = f64::NEG_INFINITY;
                for (t, r) in rewards.successors(s) {
                    let q = r + gamma * previous[t];
                    if best < q {
                        best = q;
                        policy.set(s, Some(t));
                    }
                }
                current[s] = best;
            }

            let delta = max_change(&previous, &current);
            trace!(iterations, delta, "value iteration sweep");
            if delta < fuzziness {
                break delta;
            }
        };

        let elapsed = started.elapsed();
        debug!(iterations, delta, ?elapsed, "value iteration converged");
        Ok(SolveResult::new(self.algorithm(), policy, current, iterations, delta, elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::GOAL_REWARD;

    fn two_by_two() -> GridEnvironment { GridEnvironment::from_layout(2, 3, 0, []).unwrap() }

    #[test]
    fn two_by_two_converges_to_goal() {
        let res = ValueIteration::new(SolverConfig::new(0.01, 0.9)).solve(&two_by_two()).unwrap();
        // The goal self-loop needs ~log(1000/fuzziness)/log(1/0.9) sweeps.
        assert!(res.iterations() > 100 && res.iterations() <= 200, "{}", res.iterations());
        assert_eq!(res.action(3), Some(3));
        assert_eq!(res.action(1), Some(3));
        assert_eq!(res.action(2), Some(3));
        assert_eq!(res.action(0), Some(1));
        let bound = GOAL_REWARD / (1.0 - 0.9);
        assert!((res.utility()[3] - bound).abs() < 1.0);
        assert!(res.utility()[1] > 0.9 * bound && res.utility()[2] > 0.9 * bound);
        assert!(res.delta() < SolverConfig::new(0.01, 0.9).fuzziness());
    }

    #[test]
    fn obstacles_get_sentinels() {
        let env = GridEnvironment::from_layout(3, 8, 0, [4]).unwrap();
        let res = ValueIteration::default().solve(&env).unwrap();
        assert_eq!(res.action(4), None);
        assert_eq!(res.utility()[4], f64::NEG_INFINITY);
        assert_eq!(res.policy().as_signed()[4], -1);
    }

    #[test]
    fn iteration_ceiling_is_reported() {
        let solver = ValueIteration::new(SolverConfig::new(0.01, 0.9).with_max_iterations(5));
        let err = solver.solve(&two_by_two()).unwrap_err();
        assert_eq!(err, MdpError::FailedToConverge { algorithm: Algorithm::ValueIteration, iterations: 5 });
    }

    #[test]
    fn invalid_parameters_fail_before_sweeping() {
        let env = two_by_two();
        assert!(matches!(ValueIteration::new(SolverConfig::new(0.01, 0.0)).solve(&env), Err(MdpError::InvalidParameter(_))));
        assert!(matches!(ValueIteration::new(SolverConfig::new(0.0, 0.9)).solve(&env), Err(MdpError::InvalidParameter(_))));
    }
}
