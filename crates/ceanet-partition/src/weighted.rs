//! Expectation over the outcomes of a chance variable.

use ceanet_core::config::AnalysisConfig;
use ceanet_core::strategy::{same_strategy, Strategy, StrategyTree};
use ceanet_core::variable::Variable;

use crate::cut::{get_union_thresholds, join_contiguous_intervals};
use crate::error::{CeError, Result};
use crate::optimal::{piece_bounds, representative_point};
use crate::partition::Partition;

/// Probability-weighted sum of `branches` (one per state of `chance`).
///
/// Zero-probability branches are skipped entirely: they neither add
/// thresholds nor appear in the resulting strategy. Where the remaining
/// branches disagree on what to do, the interval's strategy becomes a
/// conditional node on `chance`.
pub fn weighted_average(
    chance: &Variable,
    branches: &[Partition],
    probabilities: &[f64],
    cfg: &AnalysisConfig,
) -> Result<Partition> {
    if branches.is_empty() {
        return Err(CeError::EmptyCandidates);
    }
    if probabilities.len() != branches.len() {
        return Err(CeError::LengthMismatch {
            what: "probabilities",
            expected: branches.len(),
            found: probabilities.len(),
        });
    }
    if branches.len() != chance.cardinality() {
        return Err(CeError::LengthMismatch {
            what: "chance branches",
            expected: chance.cardinality(),
            found: branches.len(),
        });
    }
    if let Some((state, &value)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0)
    {
        return Err(CeError::InvalidProbability { state, value });
    }

    let domain = cfg.domain();
    let active: Vec<usize> = (0..branches.len()).filter(|&k| probabilities[k] > 0.0).collect();
    if active.is_empty() {
        return Partition::zero_within(domain);
    }

    let union = get_union_thresholds(active.iter().map(|&k| &branches[k]));
    let bounds = piece_bounds(union, domain);

    let pieces = bounds.len() - 1;
    let mut strategies: Vec<Strategy> = Vec::with_capacity(pieces);
    let mut costs = Vec::with_capacity(pieces);
    let mut effectiveness = Vec::with_capacity(pieces);
    for window in bounds.windows(2) {
        let lambda = representative_point(window[0], window[1]);

        let (cost, eff) = active.iter().fold((0.0, 0.0), |(c, e), &k| {
            let p = probabilities[k];
            (
                c + p * branches[k].cost_at(lambda),
                e + p * branches[k].effectiveness_at(lambda),
            )
        });
        costs.push(cost);
        effectiveness.push(eff);

        let first = branches[active[0]].strategy_at(lambda);
        let shared = active[1..]
            .iter()
            .all(|&k| same_strategy(first, branches[k].strategy_at(lambda)));
        strategies.push(if shared {
            first.clone()
        } else {
            StrategyTree::conditional(
                chance,
                active
                    .iter()
                    .map(|&k| (k, branches[k].strategy_at(lambda).clone())),
            )
        });
    }

    let thresholds = bounds[1..bounds.len() - 1].to_vec();
    let averaged = Partition::new(strategies, costs, effectiveness, thresholds, domain)?;
    Ok(join_contiguous_intervals(&averaged, cfg.tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceanet_core::config::ThresholdDomain;

    #[test]
    fn probabilities_must_be_valid() {
        let x = Variable::chance(1, "X", ["a", "b"]).unwrap();
        let cfg = AnalysisConfig::default();
        let parts = [Partition::zero(), Partition::zero()];
        assert!(matches!(
            weighted_average(&x, &parts, &[0.5, -0.1], &cfg),
            Err(CeError::InvalidProbability { state: 1, .. })
        ));
        assert!(matches!(
            weighted_average(&x, &parts, &[1.0], &cfg),
            Err(CeError::LengthMismatch { what: "probabilities", .. })
        ));
    }

    #[test]
    fn all_zero_probabilities_give_zero() {
        let x = Variable::chance(1, "X", ["a", "b"]).unwrap();
        let cfg = AnalysisConfig::default();
        let d = ThresholdDomain::default();
        let parts = [
            Partition::single(None, 5.0, 1.0, d).unwrap(),
            Partition::single(None, 7.0, 2.0, d).unwrap(),
        ];
        let out = weighted_average(&x, &parts, &[0.0, 0.0], &cfg).unwrap();
        assert!(out.is_zero());
    }
}
