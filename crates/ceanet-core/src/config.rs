//! Analysis configuration that downstream crates can serialize/deserialize.
//!
//! The λ domain bounds are passed explicitly into every top-level call; there
//! are no process-wide defaults to mutate.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::serde_ext::extended_f64;

/// Closed range of willingness-to-pay values a partition is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDomain {
    #[serde(with = "extended_f64")]
    pub min: f64,
    #[serde(with = "extended_f64")]
    pub max: f64,
}

impl Default for ThresholdDomain {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl ThresholdDomain {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let domain = Self { min, max };
        domain.validate()?;
        Ok(domain)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min.is_nan() || self.max.is_nan() {
            return Err(Error::Config("threshold bounds must not be NaN".into()));
        }
        if self.min >= self.max {
            return Err(Error::Config(format!(
                "min threshold {} must be below max threshold {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// `max - min`; infinite for the default domain.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_bounded(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn contains(&self, lambda: f64) -> bool {
        lambda >= self.min && lambda <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Lower end of the λ axis.
    #[serde(with = "extended_f64")]
    pub min_threshold: f64,

    /// Upper end of the λ axis (`+∞` by default).
    #[serde(with = "extended_f64")]
    pub max_threshold: f64,

    /// Absolute tolerance when deciding whether two neighbouring intervals
    /// carry the same cost and effectiveness.
    pub tolerance: f64,

    /// Intervals narrower than this fraction of the reference width are
    /// folded into a neighbour after a decision is maximized.
    pub degenerate_fraction: f64,

    /// Hard cap on bytes held by materialized generalized tables.
    pub mem_cap_bytes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_threshold: 0.0,
            max_threshold: f64::INFINITY,
            tolerance: 1e-9,
            degenerate_fraction: 1e-3,
            mem_cap_bytes: 256 * 1024 * 1024, // 256 MiB default
        }
    }
}

impl AnalysisConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `CEANET_MIN_THRESHOLD`: lower λ bound
    /// - `CEANET_MAX_THRESHOLD`: upper λ bound (`inf` accepted)
    /// - `CEANET_TOLERANCE`: interval merge tolerance
    /// - `CEANET_DEGENERATE_FRACTION`: degenerate interval fraction
    /// - `CEANET_MEM_CAP_BYTES`: table memory cap in bytes
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(v) = env_parse::<f64>("CEANET_MIN_THRESHOLD") {
            cfg.min_threshold = v;
        }
        if let Some(v) = env_parse::<f64>("CEANET_MAX_THRESHOLD") {
            cfg.max_threshold = v;
        }
        if let Some(v) = env_parse::<f64>("CEANET_TOLERANCE") {
            cfg.tolerance = v;
        }
        if let Some(v) = env_parse::<f64>("CEANET_DEGENERATE_FRACTION") {
            cfg.degenerate_fraction = v;
        }
        if let Some(v) = env_parse::<usize>("CEANET_MEM_CAP_BYTES") {
            cfg.mem_cap_bytes = v;
        }

        cfg
    }

    /// Builder-style override of the λ domain.
    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.min_threshold = min;
        self.max_threshold = max;
        self
    }

    pub fn domain(&self) -> ThresholdDomain {
        ThresholdDomain {
            min: self.min_threshold,
            max: self.max_threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.domain().validate()?;
        if !(self.tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if !(0.0..1.0).contains(&self.degenerate_fraction) {
            return Err(Error::Config(format!(
                "degenerate fraction must lie in [0, 1), got {}",
                self.degenerate_fraction
            )));
        }
        if self.mem_cap_bytes == 0 {
            return Err(Error::Config("memory cap must be positive".into()));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AnalysisConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.domain(), ThresholdDomain::default());
        assert!(!cfg.domain().is_bounded());
    }

    #[test]
    fn inverted_domain_is_rejected() {
        let cfg = AnalysisConfig::default().with_domain(10.0, 5.0);
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn fraction_out_of_range_is_rejected() {
        let cfg = AnalysisConfig {
            degenerate_fraction: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = AnalysisConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_threshold, f64::INFINITY);
        assert_eq!(back.min_threshold, 0.0);
    }
}
