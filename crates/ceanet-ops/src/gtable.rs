//! Generalized tables: one partition per joint configuration.

use ceanet_core::config::ThresholdDomain;
use ceanet_core::table::{cell_count, check_distinct, flat_index, schema_union, CoordinateWalker, ScalarTable};
use ceanet_core::variable::Variable;
use ceanet_partition::Partition;
use serde::Serialize;

use crate::error::{OpError, Result};

/// Same row-major layout as [`ScalarTable`] (last variable fastest), but each
/// cell is a [`Partition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GTable {
    variables: Vec<Variable>,
    cells: Vec<Partition>,
}

impl GTable {
    pub fn new(variables: Vec<Variable>, cells: Vec<Partition>) -> Result<Self> {
        check_distinct(&variables)?;
        let expected = cell_count(&variables)?;
        if cells.len() != expected {
            return Err(OpError::Schema(format!(
                "generalized table over {} variables needs {expected} cells, got {}",
                variables.len(),
                cells.len()
            )));
        }
        Ok(Self { variables, cells })
    }

    /// Table without variables holding one partition.
    pub fn constant(partition: Partition) -> Self {
        Self {
            variables: Vec::new(),
            cells: vec![partition],
        }
    }

    /// Initial carrier built from a cost and an effectiveness utility table.
    ///
    /// The schema is the union of both (cost variables first); every cell is
    /// a single interval over `domain` with no strategy attached yet.
    pub fn from_utilities(cost: &ScalarTable, effectiveness: &ScalarTable, domain: ThresholdDomain) -> Result<Self> {
        domain.validate()?;
        let variables = schema_union(cost.variables(), effectiveness.variables());
        let mut walker = CoordinateWalker::new(&variables);
        let hc = walker.track(cost.variables())?;
        let he = walker.track(effectiveness.variables())?;

        let mut cells = Vec::with_capacity(cell_count(&variables)?);
        loop {
            let c = cost.values()[walker.position(hc)];
            let e = effectiveness.values()[walker.position(he)];
            if c.is_nan() || e.is_nan() {
                return Err(OpError::Schema(format!(
                    "utility is NaN at configuration {:?}",
                    walker.coordinates()
                )));
            }
            cells.push(Partition::single(None, c, e, domain)?);
            if !walker.advance() {
                break;
            }
        }
        Ok(Self { variables, cells })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn cells(&self) -> &[Partition] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.variables.contains(variable)
    }

    /// Largest interval count over all cells.
    pub fn max_intervals(&self) -> usize {
        self.cells.iter().map(Partition::num_intervals).max().unwrap_or(0)
    }

    pub fn cell_at(&self, assignment: &[(Variable, usize)]) -> Result<&Partition> {
        Ok(&self.cells[flat_index(&self.variables, assignment)?])
    }

    /// The final frontier, once every variable has been eliminated.
    pub fn into_single(self) -> Result<Partition> {
        if !self.variables.is_empty() {
            let names: Vec<&str> = self.variables.iter().map(Variable::name).collect();
            return Err(OpError::Schema(format!(
                "variables left uneliminated: {}",
                names.join(", ")
            )));
        }
        self.cells
            .into_iter()
            .next()
            .ok_or_else(|| OpError::Schema("empty generalized table".into()))
    }
}

/// `source` without `removed`, followed by `removed`.
///
/// Walking this order visits the cells that differ only in `removed`
/// consecutively, one group per configuration of the remaining variables.
pub(crate) fn grouping_axes(source: &[Variable], removed: &Variable) -> (Vec<Variable>, Vec<Variable>) {
    let remaining: Vec<Variable> = source.iter().filter(|v| *v != removed).cloned().collect();
    let mut axes = remaining.clone();
    axes.push(removed.clone());
    (remaining, axes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(id: u64, n: usize) -> Variable {
        let states: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
        Variable::chance(id, format!("V{id}"), states).unwrap()
    }

    #[test]
    fn cell_count_is_checked() {
        let a = var(1, 2);
        assert!(GTable::new(vec![a.clone()], vec![Partition::zero()]).is_err());
        assert!(GTable::new(vec![a], vec![Partition::zero(), Partition::zero()]).is_ok());
    }

    #[test]
    fn utilities_broadcast_over_union() {
        let a = var(1, 2);
        let b = var(2, 3);
        let cost = ScalarTable::new(vec![a.clone()], vec![10.0, 20.0]).unwrap();
        let eff = ScalarTable::new(vec![b.clone()], vec![1.0, 2.0, 3.0]).unwrap();
        let g = GTable::from_utilities(&cost, &eff, ThresholdDomain::default()).unwrap();
        assert_eq!(g.variables(), &[a.clone(), b.clone()]);
        assert_eq!(g.len(), 6);
        let cell = g.cell_at(&[(a, 1), (b, 2)]).unwrap();
        assert_eq!((cell.costs()[0], cell.effectiveness()[0]), (20.0, 3.0));
        assert!(cell.strategies()[0].is_none());
    }

    #[test]
    fn into_single_requires_no_variables() {
        let a = var(1, 1);
        let g = GTable::new(vec![a], vec![Partition::zero()]).unwrap();
        assert!(matches!(g.into_single(), Err(OpError::Schema(_))));
        let p = GTable::constant(Partition::zero()).into_single().unwrap();
        assert!(p.is_zero());
    }

    #[test]
    fn grouping_puts_removed_last() {
        let a = var(1, 2);
        let b = var(2, 2);
        let c = var(3, 2);
        let (remaining, axes) = grouping_axes(&[a.clone(), b.clone(), c.clone()], &b);
        assert_eq!(remaining, vec![a.clone(), c.clone()]);
        assert_eq!(axes, vec![a, c, b]);
    }
}
