//! Solver parameter configuration.

use crate::WarmStart;

/// Parameters shared by every adapter front end.
///
/// Unset optional parameters fall through to the backing engine's defaults.
/// Parameters survive re-sizing and repeated solves; values are not
/// pre-validated here — the engine governs acceptance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QpConfig {
    /// Feasibility tolerance. `None` uses the engine default.
    pub feasibility_tolerance: Option<f64>,
    /// Optimality (duality-gap) tolerance. `None` uses the engine default.
    pub optimality_tolerance: Option<f64>,
    /// Iteration limit. `None` uses the engine default.
    pub max_iterations: Option<u32>,
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Warm-start policy for the next solve.
    pub warm_start: WarmStart,
    /// Echo engine output to the console.
    pub verbose: bool,
}

impl QpConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the feasibility tolerance.
    pub fn with_feasibility_tolerance(mut self, tol: f64) -> Self {
        self.feasibility_tolerance = Some(tol);
        self
    }

    /// Set the optimality tolerance.
    pub fn with_optimality_tolerance(mut self, tol: f64) -> Self {
        self.optimality_tolerance = Some(tol);
        self
    }

    /// Set the iteration limit.
    pub fn with_max_iterations(mut self, limit: u32) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the warm-start policy.
    pub fn with_warm_start(mut self, mode: WarmStart) -> Self {
        self.warm_start = mode;
        self
    }

    /// Enable or disable console output.
    pub fn with_verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Check if this configuration is all defaults.
    pub fn is_default(&self) -> bool {
        self.feasibility_tolerance.is_none()
            && self.optimality_tolerance.is_none()
            && self.max_iterations.is_none()
            && self.time_limit.is_none()
            && self.warm_start == WarmStart::Default
            && !self.verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_is_default() {
        let config = QpConfig::new();
        assert!(config.is_default());
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = QpConfig::new()
            .with_feasibility_tolerance(1e-9)
            .with_optimality_tolerance(1e-7)
            .with_max_iterations(50)
            .with_time_limit(10.0)
            .with_warm_start(WarmStart::Primal)
            .with_verbose(true);

        assert!(!config.is_default());
        assert_eq!(config.feasibility_tolerance, Some(1e-9));
        assert_eq!(config.optimality_tolerance, Some(1e-7));
        assert_eq!(config.max_iterations, Some(50));
        assert_eq!(config.time_limit, Some(10.0));
        assert_eq!(config.warm_start, WarmStart::Primal);
        assert!(config.verbose);
    }

    #[test]
    fn test_config_partial_is_not_default() {
        let config = QpConfig::new().with_warm_start(WarmStart::None);
        assert!(!config.is_default());
        assert_eq!(config.feasibility_tolerance, None);
    }

    #[test]
    fn test_config_clone() {
        let config1 = QpConfig::new().with_optimality_tolerance(1e-10);
        let config2 = config1.clone();
        assert_eq!(config1, config2);
    }
}
