//! Maximization at a decision node: one candidate partition per option of the
//! decision, folded into a single frontier.
//!
//! The candidates are piecewise in λ, so the λ axis is first split at every
//! candidate threshold. Inside each piece every candidate is constant and a
//! plain deterministic CEA picks the frontier; the pieces are then stitched
//! back together and cleaned up.

use ceanet_core::config::{AnalysisConfig, ThresholdDomain};
use ceanet_core::strategy::{Strategy, StrategyTree};
use ceanet_core::variable::Variable;

use crate::cea::deterministic_cea;
use crate::cut::{drop_degenerate_intervals, get_union_thresholds, join_contiguous_intervals, join_partitions};
use crate::error::{CeError, Result};
use crate::partition::Partition;

/// Frontier of the decision `decision`; `candidates[k]` is the partition
/// obtained by committing to state `k`.
pub fn optimal_cep(decision: &Variable, candidates: &[Partition], cfg: &AnalysisConfig) -> Result<Partition> {
    let folded = fold_decision_intervals(decision, candidates, cfg)?;
    let merged = join_contiguous_intervals(&folded, cfg.tolerance);
    Ok(drop_degenerate_intervals(&merged, cfg.degenerate_fraction, cfg.tolerance))
}

/// The per-piece CEA results joined in λ order, before any boundary is
/// merged away. Its thresholds are the union of the candidates' thresholds
/// inside the domain, plus any frontier switch points within a piece.
pub fn fold_decision_intervals(
    decision: &Variable,
    candidates: &[Partition],
    cfg: &AnalysisConfig,
) -> Result<Partition> {
    if candidates.is_empty() {
        return Err(CeError::EmptyCandidates);
    }
    if candidates.len() != decision.cardinality() {
        return Err(CeError::LengthMismatch {
            what: "decision candidates",
            expected: decision.cardinality(),
            found: candidates.len(),
        });
    }
    let domain = cfg.domain();
    if candidates.iter().all(Partition::is_zero) {
        return Partition::zero_within(domain);
    }

    let bounds = piece_bounds(get_union_thresholds(candidates), domain);
    let mut pieces = Vec::with_capacity(bounds.len() - 1);
    for window in bounds.windows(2) {
        let (lower, upper) = (window[0], window[1]);
        let lambda = representative_point(lower, upper);

        let strategies: Vec<Strategy> = candidates
            .iter()
            .enumerate()
            .map(|(k, c)| StrategyTree::decide(decision, k, c.strategy_at(lambda).clone()))
            .collect();
        let costs: Vec<f64> = candidates.iter().map(|c| c.cost_at(lambda)).collect();
        let effectiveness: Vec<f64> = candidates.iter().map(|c| c.effectiveness_at(lambda)).collect();

        let piece = deterministic_cea(
            &strategies,
            &costs,
            &effectiveness,
            Some(ThresholdDomain {
                min: lower,
                max: upper,
            }),
        )?;
        pieces.push(piece);
    }
    join_partitions(&pieces)
}

/// `[min, t_0, …, t_k, max]` keeping only thresholds strictly inside the
/// domain.
pub(crate) fn piece_bounds(union: Vec<f64>, domain: ThresholdDomain) -> Vec<f64> {
    let mut bounds = Vec::with_capacity(union.len() + 2);
    bounds.push(domain.min);
    bounds.extend(union.into_iter().filter(|&t| t > domain.min && t < domain.max));
    bounds.push(domain.max);
    bounds
}

/// A λ strictly inside `(lower, upper)`, finite even for unbounded pieces.
pub(crate) fn representative_point(lower: f64, upper: f64) -> f64 {
    match (lower.is_finite(), upper.is_finite()) {
        (true, true) => lower + (upper - lower) / 2.0,
        (true, false) => lower + lower.abs().max(1.0),
        (false, true) => upper - upper.abs().max(1.0),
        (false, false) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representative_points_stay_inside() {
        assert_eq!(representative_point(10.0, 20.0), 15.0);
        assert!(representative_point(1e20, f64::INFINITY) > 1e20);
        assert!(representative_point(f64::NEG_INFINITY, -5.0) < -5.0);
        assert_eq!(representative_point(f64::NEG_INFINITY, f64::INFINITY), 0.0);
    }

    #[test]
    fn bounds_ignore_thresholds_outside_domain() {
        let d = ThresholdDomain { min: 10.0, max: 100.0 };
        assert_eq!(
            piece_bounds(vec![5.0, 10.0, 50.0, 100.0, 200.0], d),
            vec![10.0, 50.0, 100.0]
        );
    }

    #[test]
    fn all_zero_candidates_fold_to_zero() {
        let d = Variable::decision(7, "D", ["a", "b"]).unwrap();
        let cfg = AnalysisConfig::default();
        let out = optimal_cep(&d, &[Partition::zero(), Partition::zero()], &cfg).unwrap();
        assert!(out.is_zero());
        assert_eq!(out.num_intervals(), 1);
        assert!(out.strategies()[0].is_none());
    }

    #[test]
    fn narrow_leading_interval_survives_on_unbounded_domain() {
        let d = Variable::decision(7, "D", ["a", "b", "c"]).unwrap();
        let cfg = AnalysisConfig::default();
        let dom = cfg.domain();
        let candidates = [
            Partition::single(None, 0.0, 0.0, dom).unwrap(),
            Partition::single(None, 0.5, 1.0, dom).unwrap(),
            Partition::single(None, 1000.5, 2.0, dom).unwrap(),
        ];
        let out = optimal_cep(&d, &candidates, &cfg).unwrap();

        assert_eq!(out.thresholds(), &[0.5, 1000.0]);
        assert_eq!(out.strategies()[0], StrategyTree::decide(&d, 0, None));
        // option a is the best buy below λ = 0.5
        assert_eq!(out.net_monetary_benefit_at(0.25), 0.0);
    }

    #[test]
    fn empty_or_misaligned_candidates_fail() {
        let d = Variable::decision(7, "D", ["a", "b"]).unwrap();
        let cfg = AnalysisConfig::default();
        assert_eq!(optimal_cep(&d, &[], &cfg), Err(CeError::EmptyCandidates));
        assert!(matches!(
            optimal_cep(&d, &[Partition::zero()], &cfg),
            Err(CeError::LengthMismatch { .. })
        ));
    }
}
