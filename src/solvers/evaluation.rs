//! Helpers shared by policy iteration: approximate policy evaluation,
//! greedy improvement and random choice of a legal successor.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::Policy;
use crate::envs::RewardMatrix;

/// Number of in-place sweeps performed by [`policy_evaluation`].
pub const EVALUATION_SWEEPS: usize = 20;

/// Approximate utility of `policy`, starting from `utility`.
///
/// Runs exactly [`EVALUATION_SWEEPS`] in-place sweeps of
/// `U[s] = R[s, pi(s)] + discount * U[pi(s)]`. States without an action, or
/// whose action is not a legal transition, keep their value.
pub fn policy_evaluation(policy: &Policy, utility: &[f64], rewards: &RewardMatrix, discount: f64) -> Vec<f64> {
    let mut next = utility.to_vec();
    for _ in 0..EVALUATION_SWEEPS {
        for (s, action) in policy.iter().enumerate() {
            let Some(t) = action else { continue };
            if let Some(r) = rewards.get(s, t) {
                next[s] = r + discount * next[t];
            }
        }
    }
    next
}

/// One greedy improvement sweep over every state.
///
/// A successor replaces the current action when its one-step value
/// `R[s, t] + discount * U[t]` strictly exceeds the best seen so far, which
/// starts at `U[s]`. Returns whether any state's action changed.
///
/// # Panics
///
/// Panics if `policy`, `utility` and `rewards` do not all cover the same
/// number of states.
pub fn greedy_improvement(policy: &mut Policy, utility: &[f64], rewards: &RewardMatrix, discount: f64) -> bool {
    assert!(
        utility.len() == policy.len() && rewards.len() == policy.len(),
        "greedy_improvement: policy has {} states, utility {}, rewards {}",
        policy.len(),
        utility.len(),
        rewards.len()
    );
    let mut changed = false;
    for s in 0..policy.len() {
        let before = policy.action(s);
        let mut best = utility[s];
        for (t, r) in rewards.successors(s) {
            let q = r + discount * utility[t];
            if q > best {
                best = q;
                policy.set(s, Some(t));
            }
        }
        changed |= policy.action(s) != before;
    }
    changed
}

/// A legal successor of `state` chosen uniformly at random, `None` if the
/// state has no legal transition.
pub fn random_adjacent_state<R: Rng + ?Sized>(rewards: &RewardMatrix, state: usize, rng: &mut R) -> Option<usize> {
    let candidates: Vec<usize> = rewards.successors(state).map(|(t, _)| t).collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::{GOAL_REWARD, STEP_REWARD};
    use crate::utils::rng_from_seed;

    #[test]
    fn evaluation_runs_fixed_number_of_sweeps() {
        // 2x2 grid, goal 3, everyone heads for the goal, goal loops on itself.
        let m = RewardMatrix::for_grid(2, 3, &[]);
        let p = Policy::from_actions(vec![Some(1), Some(3), Some(3), Some(3)]);
        let u = policy_evaluation(&p, &[0.0; 4], &m, 0.5);
        // Goal self-loop after 20 sweeps: 1000 * (1 - 0.5^20) / 0.5
        let expected_goal = GOAL_REWARD * (1.0 - 0.5f64.powi(EVALUATION_SWEEPS as i32)) / 0.5;
        assert!((u[3] - expected_goal).abs() < 1e-9);
        assert!(u[3] < 2.0 * GOAL_REWARD);
        // Earlier states read the previous sweep's value of later ones.
        assert!((u[1] - (GOAL_REWARD + 0.5 * u[3])).abs() < 1e-2);
        assert!((u[0] - (STEP_REWARD + 0.5 * u[1])).abs() < 1e-2);
    }

    #[test]
    fn evaluation_skips_missing_and_illegal_actions() {
        let m = RewardMatrix::for_grid(2, 3, &[]);
        let p = Policy::from_actions(vec![None, Some(2), Some(3), Some(3)]);
        let u = policy_evaluation(&p, &[7.0, 8.0, 0.0, 0.0], &m, 0.9);
        assert_eq!(u[0], 7.0);
        assert_eq!(u[1], 8.0, "1 -> 2 is diagonal and not legal");
    }

    #[test]
    fn improvement_picks_first_strict_maximizer() {
        let m = RewardMatrix::for_grid(2, 3, &[]);
        let mut p = Policy::from_actions(vec![Some(2), Some(0), Some(0), Some(1)]);
        let u = vec![0.0, 10.0, 10.0, 100.0];
        assert!(greedy_improvement(&mut p, &u, &m, 0.9));
        assert_eq!(p.action(0), Some(1), "tie between 1 and 2 keeps the first");
        assert_eq!(p.action(1), Some(3));
        assert_eq!(p.action(2), Some(3));
        assert_eq!(p.action(3), Some(3));
        assert!(!greedy_improvement(&mut p, &u, &m, 0.9));
    }

    #[test]
    #[should_panic(expected = "policy has 4 states, utility 3")]
    fn improvement_rejects_short_utility() {
        let m = RewardMatrix::for_grid(2, 3, &[]);
        let mut p = Policy::unassigned(4);
        greedy_improvement(&mut p, &[0.0; 3], &m, 0.9);
    }

    #[test]
    fn random_successor_is_legal_or_none() {
        let m = RewardMatrix::for_grid(3, 8, &[1, 3]);
        let mut rng = rng_from_seed(5);
        assert_eq!(random_adjacent_state(&m, 0, &mut rng), None);
        for _ in 0..50 {
            let t = random_adjacent_state(&m, 4, &mut rng).unwrap();
            assert!(t == 5 || t == 7);
            assert_eq!(random_adjacent_state(&m, 8, &mut rng).map(|t| [5, 7, 8].contains(&t)), Some(true));
        }
    }
}
