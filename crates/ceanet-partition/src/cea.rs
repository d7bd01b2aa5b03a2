//! Deterministic cost-effectiveness analysis: the frontier of a finite set of
//! alternatives.
//!
//! Classic construction: start at the cheapest alternative, repeatedly step to
//! the more effective alternative with the smallest ICER, and discard every
//! alternative that is no more effective than the last one chosen.

use ceanet_core::config::ThresholdDomain;
use ceanet_core::strategy::Strategy;

use crate::cut::cut_partition;
use crate::error::{CeError, Result};
use crate::icer::icer;
use crate::partition::Partition;

/// Build the non-dominated frontier of `m` alternatives and clip it to
/// `domain` (the default `[0, +∞)` when `None`).
///
/// The result has one interval per frontier alternative, in order of
/// increasing effectiveness; thresholds are the ICERs between neighbours.
pub fn deterministic_cea(
    strategies: &[Strategy],
    costs: &[f64],
    effectiveness: &[f64],
    domain: Option<ThresholdDomain>,
) -> Result<Partition> {
    let m = strategies.len();
    if m == 0 {
        return Err(CeError::EmptyCandidates);
    }
    if costs.len() != m {
        return Err(CeError::LengthMismatch {
            what: "costs",
            expected: m,
            found: costs.len(),
        });
    }
    if effectiveness.len() != m {
        return Err(CeError::LengthMismatch {
            what: "effectiveness",
            expected: m,
            found: effectiveness.len(),
        });
    }
    if let Some(index) = costs.iter().position(|c| !c.is_finite()) {
        return Err(CeError::NonFinite {
            what: "cost",
            index,
        });
    }
    if let Some(index) = effectiveness.iter().position(|e| !e.is_finite()) {
        return Err(CeError::NonFinite {
            what: "effectiveness",
            index,
        });
    }
    let domain = domain.unwrap_or_default();

    let point = |k: usize| (costs[k], effectiveness[k]);
    let sigma0 = cheapest(costs, effectiveness);

    let mut selected = vec![sigma0];
    let mut thresholds: Vec<f64> = Vec::new();
    let mut eligible: Vec<bool> = effectiveness
        .iter()
        .map(|&e| e > effectiveness[sigma0])
        .collect();

    loop {
        let last = *selected.last().unwrap_or(&sigma0);
        let Some(next) = best_increment(last, &eligible, costs, effectiveness) else {
            break;
        };
        let mut ratio = icer(point(last), point(next));
        // Rounding can leave a middle alternative optimal on an empty range;
        // drop it and re-measure from its predecessor.
        while let Some(&last_t) = thresholds.last() {
            if ratio > last_t {
                break;
            }
            thresholds.pop();
            selected.pop();
            let base = *selected.last().unwrap_or(&sigma0);
            ratio = icer(point(base), point(next));
        }
        thresholds.push(ratio);
        selected.push(next);

        let floor = effectiveness[next];
        eligible = eligible
            .iter()
            .zip(effectiveness)
            .map(|(&ok, &e)| ok && e > floor)
            .collect();
    }

    let uncut = Partition::new(
        selected.iter().map(|&k| strategies[k].clone()).collect(),
        selected.iter().map(|&k| costs[k]).collect(),
        selected.iter().map(|&k| effectiveness[k]).collect(),
        thresholds,
        ThresholdDomain {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        },
    )?;
    cut_partition(&uncut, domain.min, domain.max)
}

/// Minimum cost; ties go to higher effectiveness, then to the first index.
fn cheapest(costs: &[f64], effectiveness: &[f64]) -> usize {
    let mut best = 0;
    for k in 1..costs.len() {
        if costs[k] < costs[best]
            || (costs[k] == costs[best] && effectiveness[k] > effectiveness[best])
        {
            best = k;
        }
    }
    best
}

/// Eligible alternative with the smallest ICER from `from`; ties go to higher
/// effectiveness (skips collinear intermediates), then to the first index.
fn best_increment(
    from: usize,
    eligible: &[bool],
    costs: &[f64],
    effectiveness: &[f64],
) -> Option<usize> {
    let base = (costs[from], effectiveness[from]);
    let mut best: Option<(usize, f64)> = None;
    for k in (0..eligible.len()).filter(|&k| eligible[k]) {
        let ratio = icer(base, (costs[k], effectiveness[k]));
        best = match best {
            None => Some((k, ratio)),
            Some((b, r)) if ratio < r || (ratio == r && effectiveness[k] > effectiveness[b]) => {
                Some((k, ratio))
            }
            keep => keep,
        };
    }
    best.map(|(k, _)| k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceanet_core::strategy::{same_strategy, StrategyTree};
    use ceanet_core::variable::Variable;

    fn options(n: usize) -> (Variable, Vec<Strategy>) {
        let states: Vec<String> = (0..n).map(|i| format!("opt{i}")).collect();
        let d = Variable::decision(10, "Therapy", states).unwrap();
        let strategies = (0..n).map(|k| StrategyTree::decide(&d, k, None)).collect();
        (d, strategies)
    }

    #[test]
    fn two_actions_both_on_frontier() {
        let (_, s) = options(2);
        let p = deterministic_cea(&s, &[100.0, 200.0], &[2.0, 5.0], None).unwrap();
        assert_eq!(p.num_intervals(), 2);
        assert!((p.thresholds()[0] - 100.0 / 3.0).abs() < 1e-9);
        assert!(same_strategy(&p.strategies()[0], &s[0]));
        assert!(same_strategy(&p.strategies()[1], &s[1]));
    }

    #[test]
    fn less_effective_and_dearer_is_dominated() {
        let (_, s) = options(3);
        let p = deterministic_cea(&s, &[100.0, 200.0, 300.0], &[2.0, 5.0, 4.0], None).unwrap();
        assert_eq!(p.costs(), &[100.0, 200.0]);
        assert!(p.strategies().iter().all(|st| !same_strategy(st, &s[2])));
    }

    #[test]
    fn extended_dominance_is_removed() {
        // B lies above the segment A-C, so it is never optimal.
        let (_, s) = options(3);
        let p = deterministic_cea(&s, &[0.0, 90.0, 100.0], &[0.0, 1.0, 2.0], None).unwrap();
        assert_eq!(p.costs(), &[0.0, 100.0]);
        assert_eq!(p.thresholds(), &[50.0]);
    }

    #[test]
    fn collinear_intermediate_is_skipped() {
        let (_, s) = options(3);
        let p = deterministic_cea(&s, &[0.0, 10.0, 20.0], &[0.0, 1.0, 2.0], None).unwrap();
        assert_eq!(p.num_intervals(), 2);
        assert_eq!(p.effectiveness(), &[0.0, 2.0]);
    }

    #[test]
    fn cheapest_tie_prefers_effectiveness_then_first() {
        let (_, s) = options(3);
        let p = deterministic_cea(&s, &[5.0, 5.0, 5.0], &[1.0, 3.0, 3.0], None).unwrap();
        assert_eq!(p.num_intervals(), 1);
        assert!(same_strategy(&p.strategies()[0], &s[1]));
    }

    #[test]
    fn clipping_to_domain() {
        let (_, s) = options(3);
        let costs = [0.0, 100.0, 400.0];
        let effs = [0.0, 10.0, 20.0];
        // thresholds 10 and 30
        let full = deterministic_cea(&s, &costs, &effs, None).unwrap();
        assert_eq!(full.thresholds(), &[10.0, 30.0]);

        let d = ThresholdDomain::new(15.0, 100.0).unwrap();
        let clipped = deterministic_cea(&s, &costs, &effs, Some(d)).unwrap();
        assert_eq!(clipped.thresholds(), &[30.0]);
        assert_eq!(clipped.costs(), &[100.0, 400.0]);
        assert_eq!(clipped.min_threshold(), 15.0);
        assert_eq!(clipped.max_threshold(), 100.0);
    }

    #[test]
    fn malformed_input_fails_fast() {
        let (_, s) = options(2);
        assert_eq!(
            deterministic_cea(&[], &[], &[], None),
            Err(CeError::EmptyCandidates)
        );
        assert!(matches!(
            deterministic_cea(&s, &[1.0], &[1.0, 2.0], None),
            Err(CeError::LengthMismatch { what: "costs", .. })
        ));
        assert!(matches!(
            deterministic_cea(&s, &[1.0, f64::NAN], &[1.0, 2.0], None),
            Err(CeError::NonFinite { what: "cost", index: 1 })
        ));
    }
}
