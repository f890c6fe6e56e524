use std::env;
use std::time::Duration;

/// Tuning for background analysis runs
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Upper bound on projects analysed at the same time (env: `BITEBASE_MAX_CONCURRENT_RUNS`)
    pub max_concurrent_runs: usize,
    /// Per-stage time limit (env: `BITEBASE_STAGE_TIMEOUT_SECS`)
    pub stage_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 4,
            stage_timeout: Duration::from_secs(30),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrent_runs: env::var("BITEBASE_MAX_CONCURRENT_RUNS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_concurrent_runs),
            stage_timeout: env::var("BITEBASE_STAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.stage_timeout),
        }
    }
}
