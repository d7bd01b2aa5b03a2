//! Interval surgery: clipping, threshold unions, concatenation, and the
//! clean-up passes that remove boundaries which do not change anything.

use ceanet_core::config::ThresholdDomain;
use ceanet_core::strategy::same_strategy;

use crate::error::{CeError, Result};
use crate::partition::Partition;

/// Restrict `partition` to `[lower, upper]`.
///
/// Keeps the intervals that overlap the open range `(lower, upper)`; a
/// threshold lying exactly on a bound is dropped together with the interval
/// on the outer side.
pub fn cut_partition(partition: &Partition, lower: f64, upper: f64) -> Result<Partition> {
    if lower.is_nan() || upper.is_nan() || lower >= upper {
        return Err(CeError::InvalidPartition(format!(
            "cannot cut to [{lower}, {upper}]"
        )));
    }
    let t = partition.thresholds();
    let first = t.partition_point(|&x| x <= lower);
    let last = t.partition_point(|&x| x < upper);

    Partition::new(
        partition.strategies()[first..=last].to_vec(),
        partition.costs()[first..=last].to_vec(),
        partition.effectiveness()[first..=last].to_vec(),
        t[first..last].to_vec(),
        ThresholdDomain {
            min: lower,
            max: upper,
        },
    )
}

/// Sorted, duplicate-free union of the partitions' thresholds.
///
/// Scans all threshold lists at once; each round emits the smallest head and
/// advances every list whose head equals it.
pub fn get_union_thresholds<'a>(partitions: impl IntoIterator<Item = &'a Partition>) -> Vec<f64> {
    let lists: Vec<&[f64]> = partitions.into_iter().map(|p| p.thresholds()).collect();
    let mut cursors = vec![0usize; lists.len()];
    let mut out = Vec::new();

    loop {
        let current = lists
            .iter()
            .zip(&cursors)
            .filter_map(|(list, &c)| list.get(c).copied())
            .fold(None, |acc: Option<f64>, x| match acc {
                Some(m) if m <= x => Some(m),
                _ => Some(x),
            });
        let Some(current) = current else {
            break;
        };
        out.push(current);
        for (list, cursor) in lists.iter().zip(cursors.iter_mut()) {
            while list.get(*cursor) == Some(&current) {
                *cursor += 1;
            }
        }
    }
    out
}

/// Concatenate partitions covering consecutive λ ranges.
///
/// The boundary between part `k` and `k + 1` becomes the threshold
/// `parts[k].max_threshold()`.
pub fn join_partitions(parts: &[Partition]) -> Result<Partition> {
    let (head, tail) = parts.split_first().ok_or(CeError::EmptyCandidates)?;
    let mut strategies = head.strategies().to_vec();
    let mut costs = head.costs().to_vec();
    let mut effectiveness = head.effectiveness().to_vec();
    let mut thresholds = head.thresholds().to_vec();
    let mut boundary = head.max_threshold();

    for part in tail {
        thresholds.push(boundary);
        strategies.extend_from_slice(part.strategies());
        costs.extend_from_slice(part.costs());
        effectiveness.extend_from_slice(part.effectiveness());
        thresholds.extend_from_slice(part.thresholds());
        boundary = part.max_threshold();
    }

    Partition::new(
        strategies,
        costs,
        effectiveness,
        thresholds,
        ThresholdDomain {
            min: head.min_threshold(),
            max: boundary,
        },
    )
}

/// Merge neighbouring intervals with the same cost and effectiveness (within
/// `tolerance`) and structurally equal strategies.
pub fn join_contiguous_intervals(partition: &Partition, tolerance: f64) -> Partition {
    let n = partition.num_intervals();
    let mut keep_threshold = Vec::with_capacity(n.saturating_sub(1));
    let mut anchor = 0;
    for i in 1..n {
        let same = (partition.costs()[anchor] - partition.costs()[i]).abs() <= tolerance
            && (partition.effectiveness()[anchor] - partition.effectiveness()[i]).abs() <= tolerance
            && same_strategy(&partition.strategies()[anchor], &partition.strategies()[i]);
        keep_threshold.push(!same);
        if !same {
            anchor = i;
        }
    }
    if keep_threshold.iter().all(|&k| k) {
        return partition.clone();
    }
    rebuild(partition, |i| i == 0 || keep_threshold[i - 1])
}

/// Drop intervals narrower than `fraction` of their reference width.
///
/// The reference width is the domain width when both bounds are finite.
/// On an unbounded domain it is local to each interval: the larger magnitude
/// of its bounds, floored at 1, so only rounding-sized slivers go. A dropped
/// interior or last interval is absorbed by its left neighbour, a dropped
/// first interval by its right neighbour. Runs a contiguous merge afterwards
/// since neighbours may now coincide.
pub fn drop_degenerate_intervals(partition: &Partition, fraction: f64, tolerance: f64) -> Partition {
    if partition.thresholds().is_empty() || fraction <= 0.0 {
        return partition.clone();
    }
    let domain = partition.domain();
    let min_width = |lo: f64, hi: f64| {
        if domain.is_bounded() {
            fraction * domain.width()
        } else {
            fraction * lo.abs().max(hi.abs()).max(1.0)
        }
    };

    let (mut strategies, mut costs, mut effectiveness, mut thresholds) = partition.clone().into_parts();
    loop {
        if strategies.len() <= 1 {
            break;
        }
        let n = strategies.len();
        let degenerate = |i: usize| {
            let lo = if i == 0 { domain.min } else { thresholds[i - 1] };
            let hi = if i + 1 == n { domain.max } else { thresholds[i] };
            // intervals reaching an infinite bound are never degenerate
            lo.is_finite() && hi.is_finite() && hi - lo < min_width(lo, hi)
        };
        let Some(i) = (0..n).find(|&i| degenerate(i)) else {
            break;
        };
        strategies.remove(i);
        costs.remove(i);
        effectiveness.remove(i);
        if i == 0 {
            thresholds.remove(0);
        } else {
            thresholds.remove(i - 1);
        }
    }

    match Partition::new(strategies, costs, effectiveness, thresholds, domain) {
        Ok(p) => join_contiguous_intervals(&p, tolerance),
        // Removing intervals from a valid partition keeps it valid.
        Err(_) => partition.clone(),
    }
}

/// Keep interval `i` iff `keep(i)`; a dropped interval extends its kept left
/// neighbour.
fn rebuild(partition: &Partition, keep: impl Fn(usize) -> bool) -> Partition {
    let mut strategies = Vec::new();
    let mut costs = Vec::new();
    let mut effectiveness = Vec::new();
    let mut thresholds = Vec::new();
    for i in 0..partition.num_intervals() {
        if !keep(i) {
            continue;
        }
        if i > 0 {
            thresholds.push(partition.thresholds()[i - 1]);
        }
        strategies.push(partition.strategies()[i].clone());
        costs.push(partition.costs()[i]);
        effectiveness.push(partition.effectiveness()[i]);
    }
    Partition::new(strategies, costs, effectiveness, thresholds, partition.domain())
        .unwrap_or_else(|_| partition.clone())
}
