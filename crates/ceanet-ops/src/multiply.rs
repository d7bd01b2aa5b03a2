//! Entrywise scaling of a generalized table by a scalar table.

use ceanet_core::table::{cell_count, schema_union, CoordinateWalker, ScalarTable};
use ceanet_partition::Partition;

use crate::error::Result;
use crate::gtable::GTable;

/// Result schema: the generalized table's variables, then the scalar
/// table's variables it lacks. Each cell is scaled by the matching value.
pub fn multiply(scalar: &ScalarTable, gtable: &GTable) -> Result<GTable> {
    combine(gtable, scalar, |cell, value| Ok(cell.scale(value)))
}

/// Mirror of [`multiply`] dividing by the matching value. A zero value is a
/// `DivisionByZero` error rather than an infinite partition.
pub fn divide(gtable: &GTable, scalar: &ScalarTable) -> Result<GTable> {
    combine(gtable, scalar, |cell, value| Ok(cell.divide(value)?))
}

fn combine(
    gtable: &GTable,
    scalar: &ScalarTable,
    f: impl Fn(&Partition, f64) -> Result<Partition>,
) -> Result<GTable> {
    let variables = schema_union(gtable.variables(), scalar.variables());
    let mut walker = CoordinateWalker::new(&variables);
    let hg = walker.track(gtable.variables())?;
    let hs = walker.track(scalar.variables())?;

    let mut cells = Vec::with_capacity(cell_count(&variables)?);
    loop {
        let cell = &gtable.cells()[walker.position(hg)];
        cells.push(f(cell, scalar.values()[walker.position(hs)])?);
        if !walker.advance() {
            break;
        }
    }
    GTable::new(variables, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ceanet_core::config::ThresholdDomain;
    use ceanet_core::variable::Variable;
    use ceanet_partition::CeError;

    use crate::error::OpError;

    fn var(id: u64, n: usize) -> Variable {
        let states: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
        Variable::chance(id, format!("V{id}"), states).unwrap()
    }

    fn utilities(vars: Vec<Variable>, costs: Vec<f64>) -> GTable {
        let eff: Vec<f64> = costs.iter().map(|c| c / 10.0).collect();
        let c = ScalarTable::new(vars.clone(), costs).unwrap();
        let e = ScalarTable::new(vars, eff).unwrap();
        GTable::from_utilities(&c, &e, ThresholdDomain::default()).unwrap()
    }

    #[test]
    fn multiply_extends_schema() {
        let a = var(1, 2);
        let b = var(2, 2);
        let g = utilities(vec![a.clone()], vec![10.0, 20.0]);
        let p = ScalarTable::new(vec![b.clone(), a.clone()], vec![0.1, 0.2, 0.9, 0.8]).unwrap();
        let out = multiply(&p, &g).unwrap();
        assert_eq!(out.variables(), &[a.clone(), b.clone()]);
        // (a=1, b=0) -> cost 20 * p(b=0, a=1) = 20 * 0.2
        let cell = out.cell_at(&[(a, 1), (b, 0)]).unwrap();
        assert!((cell.costs()[0] - 4.0).abs() < 1e-12);
        assert!((cell.effectiveness()[0] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn divide_undoes_multiply() {
        let a = var(1, 3);
        let g = utilities(vec![a.clone()], vec![3.0, 6.0, 9.0]);
        let p = ScalarTable::new(vec![a], vec![0.2, 0.3, 0.5]).unwrap();
        let back = divide(&multiply(&p, &g).unwrap(), &p).unwrap();
        for (x, y) in back.cells().iter().zip(g.cells()) {
            assert!((x.costs()[0] - y.costs()[0]).abs() < 1e-12);
            assert!((x.effectiveness()[0] - y.effectiveness()[0]).abs() < 1e-12);
        }
    }

    #[test]
    fn divide_by_zero_is_reported() {
        let a = var(1, 2);
        let g = utilities(vec![a.clone()], vec![3.0, 6.0]);
        let p = ScalarTable::new(vec![a], vec![0.5, 0.0]).unwrap();
        assert!(matches!(
            divide(&g, &p),
            Err(OpError::CostEffectiveness(CeError::DivisionByZero))
        ));
    }
}
