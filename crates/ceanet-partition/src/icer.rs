//! Incremental cost-effectiveness ratio.

/// `(cost_b - cost_a) / (eff_b - eff_a)` for points given as `(cost, eff)`.
///
/// Equal effectiveness is not an error: a candidate that costs more yields
/// `+∞` (it can never be chosen). Anything else yields `-∞`, which dominance
/// filtering makes unreachable; reaching it means the candidate set was not
/// filtered, so it is logged.
pub fn icer(previous: (f64, f64), candidate: (f64, f64)) -> f64 {
    let (prev_cost, prev_eff) = previous;
    let (cost, eff) = candidate;
    let delta_eff = eff - prev_eff;
    if delta_eff == 0.0 {
        if cost > prev_cost {
            return f64::INFINITY;
        }
        tracing::warn!(
            prev_cost,
            prev_eff,
            cost,
            eff,
            "ICER between equally effective candidates that do not cost more; candidate set was not dominance-filtered"
        );
        return f64::NEG_INFINITY;
    }
    (cost - prev_cost) / delta_eff
}
