//! Table configuration.

use crate::error::{TableError, TableResult};
use crate::probe::Strategy;
use serde::{Deserialize, Serialize};

/// Initial shape and growth policy of a table.
///
/// Deserializable so harnesses can read it from a file; unknown fields
/// are rejected.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Number of slots allocated up front. Must be at least 1.
    pub initial_capacity: usize,
    pub strategy: Strategy,
    /// Occupancy ratio the table may not exceed; in `(0, 1]`.
    pub load_factor_threshold: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            strategy: Strategy::DoubleHash,
            load_factor_threshold: 0.7,
        }
    }
}

impl TableConfig {
    pub fn new(initial_capacity: usize, strategy: Strategy, load_factor_threshold: f64) -> Self {
        Self {
            initial_capacity,
            strategy,
            load_factor_threshold,
        }
    }

    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_load_factor(mut self, load_factor_threshold: f64) -> Self {
        self.load_factor_threshold = load_factor_threshold;
        self
    }

    pub fn validate(&self) -> TableResult<()> {
        if self.initial_capacity == 0 {
            return Err(TableError::InvalidConfig(
                "initial_capacity must be at least 1".into(),
            ));
        }
        let lf = self.load_factor_threshold;
        // NaN fails both comparisons.
        if !(lf > 0.0 && lf <= 1.0) {
            return Err(TableError::InvalidConfig(format!(
                "load_factor_threshold must be in (0, 1], got {lf}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn default_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test_case(0, 0.5 ; "zero capacity")]
    #[test_case(8, 0.0 ; "zero threshold")]
    #[test_case(8, -0.1 ; "negative threshold")]
    #[test_case(8, 1.01 ; "threshold above one")]
    #[test_case(8, f64::NAN ; "nan threshold")]
    #[test_case(8, f64::INFINITY ; "infinite threshold")]
    fn rejects(capacity: usize, lf: f64) {
        let cfg = TableConfig::new(capacity, Strategy::LinearProbe, lf);
        assert!(matches!(cfg.validate(), Err(TableError::InvalidConfig(_))));
    }

    #[test_case(1, 1.0 ; "single slot full threshold")]
    #[test_case(6100, 0.99 ; "benchmark shape")]
    #[test_case(1000, 0.7 ; "growth shape")]
    fn accepts(capacity: usize, lf: f64) {
        let cfg = TableConfig::default()
            .with_capacity(capacity)
            .with_load_factor(lf);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserializes_with_defaults_and_aliases() {
        let cfg: TableConfig =
            serde_json::from_str(r#"{"initial_capacity": 1000, "strategy": "simple"}"#).unwrap();
        assert_eq!(cfg.initial_capacity, 1000);
        assert_eq!(cfg.strategy, Strategy::LinearProbe);
        assert_eq!(cfg.load_factor_threshold, 0.7);

        let cfg: TableConfig = serde_json::from_str(
            r#"{"strategy": "double_hash", "load_factor_threshold": 0.5}"#,
        )
        .unwrap();
        assert_eq!(cfg.strategy, Strategy::DoubleHash);
        assert_eq!(cfg.initial_capacity, 16);
    }

    #[test]
    fn unknown_fields_rejected() {
        let res: Result<TableConfig, _> = serde_json::from_str(r#"{"capacity": 4}"#);
        assert!(res.is_err());
    }
}
