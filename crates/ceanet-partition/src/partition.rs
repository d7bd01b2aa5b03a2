//! The partition value type.
//!
//! Interval `i` spans `[lower(i), upper(i)]` where `lower(0) = min_threshold`,
//! `upper(n-1) = max_threshold` and `thresholds[i]` separates interval `i`
//! from `i + 1`. A λ lying exactly on a threshold belongs to the upper
//! interval.

use std::fmt;

use ceanet_core::config::ThresholdDomain;
use ceanet_core::serde_ext::{extended_f64, extended_f64_vec};
use ceanet_core::strategy::Strategy;
use serde::{Deserialize, Serialize};

use crate::error::{CeError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPartition")]
pub struct Partition {
    strategies: Vec<Strategy>,
    #[serde(with = "extended_f64_vec")]
    costs: Vec<f64>,
    #[serde(with = "extended_f64_vec")]
    effectiveness: Vec<f64>,
    #[serde(with = "extended_f64_vec")]
    thresholds: Vec<f64>,
    #[serde(with = "extended_f64")]
    min_threshold: f64,
    #[serde(with = "extended_f64")]
    max_threshold: f64,
}

#[derive(Deserialize)]
struct RawPartition {
    strategies: Vec<Strategy>,
    #[serde(with = "extended_f64_vec")]
    costs: Vec<f64>,
    #[serde(with = "extended_f64_vec")]
    effectiveness: Vec<f64>,
    #[serde(with = "extended_f64_vec")]
    thresholds: Vec<f64>,
    #[serde(with = "extended_f64")]
    min_threshold: f64,
    #[serde(with = "extended_f64")]
    max_threshold: f64,
}

impl TryFrom<RawPartition> for Partition {
    type Error = CeError;

    fn try_from(raw: RawPartition) -> Result<Self> {
        Partition::new(
            raw.strategies,
            raw.costs,
            raw.effectiveness,
            raw.thresholds,
            ThresholdDomain {
                min: raw.min_threshold,
                max: raw.max_threshold,
            },
        )
    }
}

/// Borrowed view of one interval.
#[derive(Debug, Clone, Copy)]
pub struct Interval<'a> {
    pub lower: f64,
    pub upper: f64,
    pub strategy: &'a Strategy,
    pub cost: f64,
    pub effectiveness: f64,
}

impl<'a> Interval<'a> {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Partition {
    /// Validating constructor. Never returns a partially built partition.
    pub fn new(
        strategies: Vec<Strategy>,
        costs: Vec<f64>,
        effectiveness: Vec<f64>,
        thresholds: Vec<f64>,
        domain: ThresholdDomain,
    ) -> Result<Self> {
        let n = strategies.len();
        if n == 0 {
            return Err(CeError::EmptyCandidates);
        }
        if costs.len() != n {
            return Err(CeError::LengthMismatch {
                what: "costs",
                expected: n,
                found: costs.len(),
            });
        }
        if effectiveness.len() != n {
            return Err(CeError::LengthMismatch {
                what: "effectiveness",
                expected: n,
                found: effectiveness.len(),
            });
        }
        if thresholds.len() + 1 != n {
            return Err(CeError::LengthMismatch {
                what: "thresholds",
                expected: n - 1,
                found: thresholds.len(),
            });
        }
        if let Some(index) = costs.iter().position(|c| c.is_nan()) {
            return Err(CeError::NonFinite {
                what: "cost",
                index,
            });
        }
        if let Some(index) = effectiveness.iter().position(|e| e.is_nan()) {
            return Err(CeError::NonFinite {
                what: "effectiveness",
                index,
            });
        }
        if domain.min.is_nan() || domain.max.is_nan() || domain.min >= domain.max {
            return Err(CeError::InvalidPartition(format!(
                "empty domain [{}, {}]",
                domain.min, domain.max
            )));
        }
        let mut prev = domain.min;
        for (i, &t) in thresholds.iter().enumerate() {
            if !t.is_finite() || t < domain.min || t > domain.max {
                return Err(CeError::InvalidPartition(format!(
                    "threshold {t} at index {i} outside [{}, {}]",
                    domain.min, domain.max
                )));
            }
            if i > 0 && t <= prev {
                return Err(CeError::InvalidPartition(format!(
                    "thresholds not strictly increasing at index {i} ({prev} then {t})"
                )));
            }
            prev = t;
        }
        Ok(Self {
            strategies,
            costs,
            effectiveness,
            thresholds,
            min_threshold: domain.min,
            max_threshold: domain.max,
        })
    }

    /// One interval covering the whole domain.
    pub fn single(strategy: Strategy, cost: f64, effectiveness: f64, domain: ThresholdDomain) -> Result<Self> {
        Self::new(vec![strategy], vec![cost], vec![effectiveness], Vec::new(), domain)
    }

    /// Zero cost, zero effectiveness, no strategy, over the default domain.
    pub fn zero() -> Self {
        let domain = ThresholdDomain::default();
        Self {
            strategies: vec![None],
            costs: vec![0.0],
            effectiveness: vec![0.0],
            thresholds: Vec::new(),
            min_threshold: domain.min,
            max_threshold: domain.max,
        }
    }

    pub fn zero_within(domain: ThresholdDomain) -> Result<Self> {
        Self::single(None, 0.0, 0.0, domain)
    }

    pub fn num_intervals(&self) -> usize {
        self.strategies.len()
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn effectiveness(&self) -> &[f64] {
        &self.effectiveness
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    pub fn max_threshold(&self) -> f64 {
        self.max_threshold
    }

    pub fn domain(&self) -> ThresholdDomain {
        ThresholdDomain {
            min: self.min_threshold,
            max: self.max_threshold,
        }
    }

    /// True iff every interval has zero cost and zero effectiveness.
    pub fn is_zero(&self) -> bool {
        self.costs.iter().all(|&c| c == 0.0) && self.effectiveness.iter().all(|&e| e == 0.0)
    }

    /// Multiply every cost and effectiveness by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            strategies: self.strategies.clone(),
            costs: self.costs.iter().map(|c| c * factor).collect(),
            effectiveness: self.effectiveness.iter().map(|e| e * factor).collect(),
            thresholds: self.thresholds.clone(),
            min_threshold: self.min_threshold,
            max_threshold: self.max_threshold,
        }
    }

    /// `scale(1 / divisor)`; dividing by zero is refused.
    pub fn divide(&self, divisor: f64) -> Result<Self> {
        if divisor == 0.0 {
            return Err(CeError::DivisionByZero);
        }
        Ok(self.scale(1.0 / divisor))
    }

    pub fn lower_bound(&self, interval: usize) -> f64 {
        if interval == 0 {
            self.min_threshold
        } else {
            self.thresholds[interval - 1]
        }
    }

    pub fn upper_bound(&self, interval: usize) -> f64 {
        self.thresholds
            .get(interval)
            .copied()
            .unwrap_or(self.max_threshold)
    }

    /// Index of the interval containing `lambda`.
    pub fn interval_index(&self, lambda: f64) -> usize {
        self.thresholds.partition_point(|&t| t <= lambda)
    }

    pub fn cost_at(&self, lambda: f64) -> f64 {
        self.costs[self.interval_index(lambda)]
    }

    pub fn effectiveness_at(&self, lambda: f64) -> f64 {
        self.effectiveness[self.interval_index(lambda)]
    }

    pub fn strategy_at(&self, lambda: f64) -> &Strategy {
        &self.strategies[self.interval_index(lambda)]
    }

    /// λ·effectiveness − cost of the optimal strategy at `lambda`.
    pub fn net_monetary_benefit_at(&self, lambda: f64) -> f64 {
        let i = self.interval_index(lambda);
        lambda * self.effectiveness[i] - self.costs[i]
    }

    pub fn intervals(&self) -> impl Iterator<Item = Interval<'_>> + '_ {
        (0..self.num_intervals()).map(move |i| Interval {
            lower: self.lower_bound(i),
            upper: self.upper_bound(i),
            strategy: &self.strategies[i],
            cost: self.costs[i],
            effectiveness: self.effectiveness[i],
        })
    }

    pub(crate) fn into_parts(self) -> (Vec<Strategy>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.strategies, self.costs, self.effectiveness, self.thresholds)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, iv) in self.intervals().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(
                f,
                "[{}, {}]: cost={} eff={}",
                iv.lower, iv.upper, iv.cost, iv.effectiveness
            )?;
            if let Some(s) = iv.strategy {
                write!(f, " ({s})")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_piece() -> Partition {
        Partition::new(
            vec![None, None],
            vec![100.0, 200.0],
            vec![2.0, 5.0],
            vec![50.0],
            ThresholdDomain::default(),
        )
        .unwrap()
    }

    #[test]
    fn zero_partition_shape() {
        let z = Partition::zero();
        assert_eq!(z.num_intervals(), 1);
        assert!(z.thresholds().is_empty());
        assert!(z.is_zero());
        assert!(z.strategies()[0].is_none());
        assert_eq!(z.max_threshold(), f64::INFINITY);
    }

    #[test]
    fn new_rejects_bad_shapes() {
        let d = ThresholdDomain::default();
        assert!(matches!(
            Partition::new(vec![None], vec![1.0, 2.0], vec![1.0], vec![], d),
            Err(CeError::LengthMismatch { what: "costs", .. })
        ));
        assert!(matches!(
            Partition::new(vec![None, None], vec![1.0, 2.0], vec![1.0, 2.0], vec![], d),
            Err(CeError::LengthMismatch { what: "thresholds", .. })
        ));
        assert!(matches!(
            Partition::new(
                vec![None, None, None],
                vec![0.0; 3],
                vec![0.0; 3],
                vec![5.0, 5.0],
                d
            ),
            Err(CeError::InvalidPartition(_))
        ));
        assert!(matches!(
            Partition::new(vec![None, None], vec![0.0; 2], vec![0.0; 2], vec![-1.0], d),
            Err(CeError::InvalidPartition(_))
        ));
    }

    #[test]
    fn evaluation_at_lambda() {
        let p = two_piece();
        assert_eq!(p.cost_at(10.0), 100.0);
        assert_eq!(p.cost_at(50.0), 200.0);
        assert_eq!(p.effectiveness_at(1e6), 5.0);
        assert_eq!(p.net_monetary_benefit_at(100.0), 100.0 * 5.0 - 200.0);
        let widths: Vec<f64> = p.intervals().map(|iv| iv.width()).collect();
        assert_eq!(widths, vec![50.0, f64::INFINITY]);
    }

    #[test]
    fn scale_and_divide() {
        let p = two_piece();
        let s = p.scale(0.5);
        assert_eq!(s.costs(), &[50.0, 100.0]);
        assert_eq!(s.thresholds(), p.thresholds());
        assert_eq!(s.divide(0.5).unwrap(), p);
        assert_eq!(p.divide(0.0), Err(CeError::DivisionByZero));
        assert!(!p.is_zero());
        assert!(p.scale(0.0).is_zero());
    }

    #[test]
    fn json_round_trip_validates() {
        let p = two_piece();
        let json = serde_json::to_string(&p).unwrap();
        let back: Partition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);

        let broken = json.replace("[50.0]", "[]");
        assert!(serde_json::from_str::<Partition>(&broken).is_err());
    }

    #[test]
    fn single_validates_like_new() {
        let d = ThresholdDomain::default();
        assert!(matches!(
            Partition::single(None, f64::NAN, 1.0, d),
            Err(CeError::NonFinite { what: "cost", .. })
        ));
        assert!(matches!(
            Partition::single(None, 1.0, 1.0, ThresholdDomain { min: 5.0, max: 1.0 }),
            Err(CeError::InvalidPartition(_))
        ));
        assert!(Partition::zero_within(ThresholdDomain { min: 1.0, max: 1.0 }).is_err());
        assert_eq!(Partition::zero_within(d).unwrap(), Partition::zero());
    }

    #[test]
    fn infinite_threshold_is_rejected() {
        let d = ThresholdDomain::default();
        assert!(matches!(
            Partition::new(vec![None, None], vec![1.0, 2.0], vec![1.0, 2.0], vec![f64::INFINITY], d),
            Err(CeError::InvalidPartition(_))
        ));
    }

    #[test]
    fn infinite_values_survive_json() {
        let p = Partition::new(
            vec![None, None],
            vec![f64::NEG_INFINITY, 200.0],
            vec![2.0, f64::INFINITY],
            vec![50.0],
            ThresholdDomain::new(f64::NEG_INFINITY, f64::INFINITY).unwrap(),
        )
        .unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains(r#""costs":["-inf",200.0]"#));
        let back: Partition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
