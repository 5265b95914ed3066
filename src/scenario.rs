//! Scenario runner for repeated and batch simulations
//!
//! Simulations are pure functions of their parameter set, so results can be
//! memoized on the full parameter tuple and independent runs can go in
//! parallel.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::SimulationError;
use crate::params::{ParameterKey, ParameterSet};
use crate::projection::{SimulationConfig, SimulationResult, Simulator};

/// Runs simulations with a shared configuration and a result cache
///
/// The cache is never evicted on its own: it holds one entry per distinct
/// parameter set passed to `run_cached` until `clear_cache` is called.
/// `run` and `run_batch` bypass it entirely.
///
/// # Example
/// ```ignore
/// let mut runner = ScenarioRunner::new();
///
/// for rent in [1600.0, 1900.0, 2200.0] {
///     let params = ParameterSet { monthly_rent: rent, ..Default::default() };
///     let result = runner.run_cached(&params)?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: SimulationConfig,
    cache: HashMap<ParameterKey, Arc<SimulationResult>>,
}

impl ScenarioRunner {
    /// Create runner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a single simulation, bypassing the cache
    pub fn run(&self, params: &ParameterSet) -> Result<SimulationResult, SimulationError> {
        Ok(Simulator::new(*params, self.config.clone())?.run())
    }

    /// Run a simulation, reusing the result of an identical earlier run
    pub fn run_cached(&mut self, params: &ParameterSet) -> Result<Arc<SimulationResult>, SimulationError> {
        let key = params.cache_key();

        if let Some(result) = self.cache.get(&key) {
            log::debug!("Cache hit for parameter set");
            return Ok(Arc::clone(result));
        }

        let result = Arc::new(self.run(params)?);
        self.cache.insert(key, Arc::clone(&result));
        Ok(result)
    }

    /// Run independent simulations in parallel; output order matches input
    pub fn run_batch(&self, params: &[ParameterSet]) -> Vec<Result<SimulationResult, SimulationError>> {
        log::info!("Running batch of {} parameter sets", params.len());
        params.par_iter().map(|p| self.run(p)).collect()
    }

    /// Number of cached results
    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    /// Drop every memoized result
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_run_is_shared() {
        let mut runner = ScenarioRunner::new();
        let params = ParameterSet::default();

        let first = runner.run_cached(&params).unwrap();
        let second = runner.run_cached(&params).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(runner.cached_results(), 1);

        let other = ParameterSet {
            monthly_rent: 1700.0,
            ..params
        };
        let third = runner.run_cached(&other).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(runner.cached_results(), 2);

        runner.clear_cache();
        assert_eq!(runner.cached_results(), 0);
    }

    #[test]
    fn test_invalid_parameters_not_cached() {
        let mut runner = ScenarioRunner::new();
        let params = ParameterSet {
            equity_ratio: 1.5,
            ..Default::default()
        };

        assert!(runner.run_cached(&params).is_err());
        assert_eq!(runner.cached_results(), 0);
    }

    #[test]
    fn test_scenario_runner_batch() {
        let runner = ScenarioRunner::new();

        let batch: Vec<_> = [0.02, 0.03, 0.04]
            .iter()
            .map(|&rate| ParameterSet {
                appreciation_rate: rate,
                ..Default::default()
            })
            .chain(std::iter::once(ParameterSet {
                term_years: 0,
                ..Default::default()
            }))
            .collect();

        let results = runner.run_batch(&batch);
        assert_eq!(results.len(), 4);
        assert!(results[3].is_err());

        let wealth: Vec<f64> = results[..3]
            .iter()
            .map(|r| r.as_ref().unwrap().summary.comparison.final_buy_wealth)
            .collect();

        // Higher appreciation should result in higher final buy wealth
        assert!(wealth[2] > wealth[1] && wealth[1] > wealth[0]);

        // Batch results match sequential runs exactly
        let sequential = runner.run(&batch[1]).unwrap();
        assert_eq!(results[1].as_ref().unwrap(), &sequential);

        // Uncached paths leave the memo table untouched
        assert_eq!(runner.cached_results(), 0);
    }
}
