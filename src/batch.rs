// Batch runs: solve a set of seeded environments with one or every algorithm,
// as done when comparing iteration counts and running times.

use tracing::debug;

use crate::core::{Result, SolveResult};
use crate::envs::{GridConfig, GridEnvironment};
use crate::solvers::{Algorithm, SolverConfig};
use crate::utils::split_n;

/// Aggregate of every run of one algorithm over a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct AlgorithmSummary {
    pub algorithm: Algorithm,
    pub runs: usize,
    pub mean_iterations: f64,
    pub mean_elapsed_secs: f64,
    /// Largest final delta over the runs; `None` for policy iteration, which
    /// does not stop on a threshold.
    pub max_delta: Option<f64>,
}

/// Per-algorithm aggregates of `compare` output, in `Algorithm::ALL` order.
/// Algorithms absent from `results` are left out.
pub fn summarize(results: &[Vec<SolveResult>]) -> Vec<AlgorithmSummary> {
    Algorithm::ALL
        .iter()
        .filter_map(|&algorithm| {
            let runs: Vec<&SolveResult> = results.iter().flatten().filter(|r| r.algorithm() == algorithm).collect();
            if runs.is_empty() {
                return None;
            }
            let count = runs.len() as f64;
            let max_delta = algorithm
                .uses_threshold()
                .then(|| runs.iter().map(|r| r.delta()).fold(0.0, f64::max));
            Some(AlgorithmSummary {
                algorithm,
                runs: runs.len(),
                mean_iterations: runs.iter().map(|r| r.iterations() as f64).sum::<f64>() / count,
                mean_elapsed_secs: runs.iter().map(|r| r.elapsed_secs()).sum::<f64>() / count,
                max_delta,
            })
        })
        .collect()
}

/// Holds N environments generated from seeds derived from one root seed.
///
/// - Construct with `BatchRunner::new(n, &GridConfig::default())`
/// - Solve every environment with one algorithm: `run(algorithm, &config)`
/// - Solve every environment with all algorithms: `compare(&config)`
pub struct BatchRunner {
    envs: Vec<GridEnvironment>,
    seeds: Vec<u64>,
}

impl BatchRunner {
    /// Generate `n` environments; environment `i` uses the `i`-th sub-seed of `config.seed`.
    pub fn new(n: usize, config: &GridConfig) -> Result<Self> {
        let seeds = split_n(config.seed, n);
        let envs = seeds
            .iter()
            .map(|&seed| GridEnvironment::generate(&config.clone().with_seed(seed)))
            .collect::<Result<Vec<_>>>()?;
        debug!(n, root_seed = config.seed, "generated environment batch");
        Ok(Self { envs, seeds })
    }

    /// Wrap already built environments.
    pub fn from_envs(envs: Vec<GridEnvironment>) -> Self {
        Self { seeds: Vec::new(), envs }
    }

    pub fn len(&self) -> usize { self.envs.len() }
    pub fn is_empty(&self) -> bool { self.envs.is_empty() }

    /// Seeds used for generation, empty when built with `from_envs`.
    pub fn seeds(&self) -> &[u64] { &self.seeds }

    pub fn envs(&self) -> &[GridEnvironment] { &self.envs }

    /// Solve every environment with `algorithm`; fails on the first error.
    pub fn run(&self, algorithm: Algorithm, config: &SolverConfig) -> Result<Vec<SolveResult>> {
        let solver = algorithm.solver(config.clone());
        self.envs.iter().map(|env| solver.solve(env)).collect()
    }

    /// Solve every environment with every algorithm, in `Algorithm::ALL` order.
    pub fn compare(&self, config: &SolverConfig) -> Result<Vec<Vec<SolveResult>>> {
        let results = self
            .envs
            .iter()
            .map(|env| {
                Algorithm::ALL
                    .iter()
                    .map(|a| a.solver(config.clone()).solve(env))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        for s in summarize(&results) {
            debug!(
                algorithm = %s.algorithm,
                runs = s.runs,
                mean_iterations = s.mean_iterations,
                mean_elapsed_secs = s.mean_elapsed_secs,
                "batch comparison"
            );
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_is_deterministic_per_root_seed() {
        let cfg = GridConfig::new(36, 0.0).with_seed(7);
        let a = BatchRunner::new(3, &cfg).unwrap();
        let b = BatchRunner::new(3, &cfg).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.seeds(), b.seeds());
        assert_eq!(a.envs(), b.envs());
    }

    #[test]
    fn compare_runs_all_algorithms_in_order() {
        let batch = BatchRunner::new(2, &GridConfig::new(16, 0.0).with_seed(1)).unwrap();
        let results = batch.compare(&SolverConfig::default()).unwrap();
        assert_eq!(results.len(), 2);
        for per_env in &results {
            let algos: Vec<_> = per_env.iter().map(|r| r.algorithm()).collect();
            assert_eq!(algos, Algorithm::ALL.to_vec());
        }
    }

    #[test]
    fn summary_averages_each_algorithm() {
        let batch = BatchRunner::new(3, &GridConfig::new(16, 0.0).with_seed(3)).unwrap();
        let config = SolverConfig::default();
        let results = batch.compare(&config).unwrap();
        let summary = summarize(&results);
        assert_eq!(summary.iter().map(|s| s.algorithm).collect::<Vec<_>>(), Algorithm::ALL.to_vec());
        for s in &summary {
            assert_eq!(s.runs, 3);
            let total: usize = results
                .iter()
                .flatten()
                .filter(|r| r.algorithm() == s.algorithm)
                .map(|r| r.iterations())
                .sum();
            let expected = total as f64 / 3.0;
            assert_eq!(s.mean_iterations, expected);
            assert!(s.mean_elapsed_secs >= 0.0);
            match s.algorithm {
                Algorithm::PolicyIteration => assert_eq!(s.max_delta, None),
                _ => assert!(s.max_delta.is_some_and(|d| d < config.fuzziness())),
            }
        }
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn run_propagates_solver_errors() {
        let env = GridEnvironment::from_layout(2, 3, 0, []).unwrap();
        let batch = BatchRunner::from_envs(vec![env]);
        assert!(batch.run(Algorithm::ValueIteration, &SolverConfig::new(0.01, 1.0)).is_err());
        assert_eq!(batch.run(Algorithm::PolicyIteration, &SolverConfig::default()).unwrap().len(), 1);
    }
}
