// Core types shared by the grid environment and the solvers.

use std::time::Duration;

use crate::solvers::Algorithm;

/// Reward attached to a legal transition.
pub type Reward = f64;

/// A single entry of the reward matrix: `None` means "no legal transition".
pub type Edge = Option<Reward>;

/// Recoverable errors across the environment and solver APIs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MdpError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Unsolvable configuration: {0}")]
    UnsolvableConfiguration(String),
    #[error("{algorithm} failed to converge within {iterations} iterations")]
    FailedToConverge { algorithm: Algorithm, iterations: usize },
}

/// Convenience alias for results using MdpError.
pub type Result<T> = std::result::Result<T, MdpError>;

/// Deterministic policy: for each state the chosen successor state.
/// `None` marks states without an action (obstacles, isolated cells).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Policy {
    actions: Vec<Option<usize>>,
}

impl Policy {
    /// A policy of `n` states, none of which has an action yet.
    pub fn unassigned(n: usize) -> Self { Self { actions: vec![None; n] } }

    pub fn from_actions(actions: Vec<Option<usize>>) -> Self { Self { actions } }

    /// Successor chosen for `state`, if any.
    pub fn action(&self, state: usize) -> Option<usize> {
        self.actions.get(state).copied().flatten()
    }

    pub fn set(&mut self, state: usize, successor: Option<usize>) {
        self.actions[state] = successor;
    }

    pub fn len(&self) -> usize { self.actions.len() }

    pub fn is_empty(&self) -> bool { self.actions.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ { self.actions.iter().copied() }

    /// The policy with the classic `-1` "no action" sentinel.
    pub fn as_signed(&self) -> Vec<i64> {
        self.actions.iter().map(|a| a.map_or(-1, |s| s as i64)).collect()
    }
}

/// Immutable snapshot of a completed solver run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveResult {
    algorithm: Algorithm,
    policy: Policy,
    utility: Vec<f64>,
    iterations: usize,
    delta: f64,
    elapsed: Duration,
}

impl SolveResult {
    pub(crate) fn new(
        algorithm: Algorithm,
        policy: Policy,
        utility: Vec<f64>,
        iterations: usize,
        delta: f64,
        elapsed: Duration,
    ) -> Self {
        Self { algorithm, policy, utility, iterations, delta, elapsed }
    }

    pub fn algorithm(&self) -> Algorithm { self.algorithm }
    pub fn policy(&self) -> &Policy { &self.policy }
    pub fn utility(&self) -> &[f64] { &self.utility }
    pub fn iterations(&self) -> usize { self.iterations }
    /// Largest utility change of the last sweep (0 for policy iteration).
    pub fn delta(&self) -> f64 { self.delta }
    pub fn elapsed(&self) -> Duration { self.elapsed }
    pub fn elapsed_secs(&self) -> f64 { self.elapsed.as_secs_f64() }

    /// Shortcut for `policy().action(state)`.
    pub fn action(&self, state: usize) -> Option<usize> { self.policy.action(state) }

    /// Follow the policy from `start` until `goal`, a state without action,
    /// or a state already visited. The returned path includes `start`.
    pub fn path_from(&self, start: usize, goal: usize) -> Vec<usize> {
        let mut path = vec![start];
        let mut visited = vec![false; self.policy.len()];
        let mut current = start;
        while current != goal && current < visited.len() && !visited[current] {
            visited[current] = true;
            match self.policy.action(current) {
                Some(next) => {
                    path.push(next);
                    current = next;
                }
                None => break,
            }
        }
        path
    }
}
