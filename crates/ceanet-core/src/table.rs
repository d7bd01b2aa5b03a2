//! Scalar tables and the coordinate/offset arithmetic shared by every table.
//!
//! Layout is row-major over the listed variables: the *last* variable varies
//! fastest. Generalized tables in `ceanet-ops` use exactly the same layout,
//! which is what lets one `CoordinateWalker` align cells across tables with
//! different variable sets.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::variable::Variable;

/// Number of joint configurations of `variables` (1 for the empty list).
pub fn cell_count(variables: &[Variable]) -> Result<usize> {
    variables.iter().try_fold(1usize, |acc, v| {
        acc.checked_mul(v.cardinality())
            .ok_or_else(|| Error::Schema("table size overflows usize".into()))
    })
}

/// Flat-index stride of each variable: incrementing variable `i` by one moves
/// `strides[i]` cells.
pub fn strides(variables: &[Variable]) -> Vec<usize> {
    let mut out = vec![1usize; variables.len()];
    for i in (0..variables.len().saturating_sub(1)).rev() {
        out[i] = out[i + 1] * variables[i + 1].cardinality();
    }
    out
}

/// Accumulated offsets of a table laid out over `source`, relative to the
/// axis order `reference`.
///
/// Entry `i` is the change of the source's flat index when reference axis `i`
/// is incremented and every faster reference axis (`j > i`) wraps back to 0.
/// Axes the source does not contain contribute nothing.
pub fn accumulated_offsets(source: &[Variable], reference: &[Variable]) -> Result<Vec<isize>> {
    for v in source {
        if !reference.contains(v) {
            return Err(Error::Schema(format!(
                "variable '{v}' is not part of the reference ordering"
            )));
        }
    }
    let src_strides = strides(source);
    let per_axis: Vec<isize> = reference
        .iter()
        .map(|axis| {
            source
                .iter()
                .position(|v| v == axis)
                .map(|p| src_strides[p] as isize)
                .unwrap_or(0)
        })
        .collect();

    let mut out = vec![0isize; reference.len()];
    let mut wrapped = 0isize;
    for i in (0..reference.len()).rev() {
        out[i] = per_axis[i] - wrapped;
        wrapped += (reference[i].cardinality() as isize - 1) * per_axis[i];
    }
    Ok(out)
}

/// Union of two variable lists: `first` in order, then the variables of
/// `second` that `first` does not already contain.
pub fn schema_union(first: &[Variable], second: &[Variable]) -> Vec<Variable> {
    let mut out = first.to_vec();
    for v in second {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}

/// Flat index of a full assignment. Extra assignments are ignored.
pub fn flat_index(variables: &[Variable], assignment: &[(Variable, usize)]) -> Result<usize> {
    let st = strides(variables);
    let mut idx = 0usize;
    for (v, stride) in variables.iter().zip(st) {
        let state = assignment
            .iter()
            .find(|(a, _)| a == v)
            .map(|(_, s)| *s)
            .ok_or_else(|| Error::Schema(format!("no state given for variable '{v}'")))?;
        if state >= v.cardinality() {
            return Err(Error::Schema(format!(
                "state {state} out of range for '{v}' ({} states)",
                v.cardinality()
            )));
        }
        idx += state * stride;
    }
    Ok(idx)
}

/// Fails when a variable appears more than once.
pub fn check_distinct(variables: &[Variable]) -> Result<()> {
    for (i, v) in variables.iter().enumerate() {
        if variables[..i].contains(v) {
            return Err(Error::Schema(format!("variable '{v}' listed twice")));
        }
    }
    Ok(())
}

/// Walks every joint configuration of a reference ordering, keeping one
/// running flat index per tracked source table.
///
/// ```text
/// let mut walker = CoordinateWalker::new(&axes);
/// let g = walker.track(gtable_vars)?;
/// loop {
///     use(walker.position(g));
///     if !walker.advance() { break; }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CoordinateWalker {
    cardinalities: Vec<usize>,
    coordinates: Vec<usize>,
    offsets: Vec<Vec<isize>>,
    positions: Vec<isize>,
    reference: Vec<Variable>,
}

impl CoordinateWalker {
    pub fn new(reference: &[Variable]) -> Self {
        Self {
            cardinalities: reference.iter().map(Variable::cardinality).collect(),
            coordinates: vec![0; reference.len()],
            offsets: Vec::new(),
            positions: Vec::new(),
            reference: reference.to_vec(),
        }
    }

    /// Register a source table; returns the handle for `position`.
    pub fn track(&mut self, source: &[Variable]) -> Result<usize> {
        let acc = accumulated_offsets(source, &self.reference)?;
        self.offsets.push(acc);
        self.positions.push(0);
        Ok(self.offsets.len() - 1)
    }

    /// Total configurations visited by a full walk.
    pub fn len(&self) -> usize {
        self.cardinalities.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn coordinates(&self) -> &[usize] {
        &self.coordinates
    }

    /// Flat index into tracked source `handle` for the current configuration.
    pub fn position(&self, handle: usize) -> usize {
        self.positions[handle] as usize
    }

    /// Step to the next configuration. Returns `false` once the walk wraps
    /// back to the first configuration.
    pub fn advance(&mut self) -> bool {
        for axis in (0..self.coordinates.len()).rev() {
            if self.coordinates[axis] + 1 < self.cardinalities[axis] {
                self.coordinates[axis] += 1;
                for c in &mut self.coordinates[axis + 1..] {
                    *c = 0;
                }
                for (pos, acc) in self.positions.iter_mut().zip(&self.offsets) {
                    *pos += acc[axis];
                }
                return true;
            }
        }
        self.coordinates.iter_mut().for_each(|c| *c = 0);
        self.positions.iter_mut().for_each(|p| *p = 0);
        false
    }
}

/// Flat table of reals (probabilities or plain utilities).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalarTable {
    variables: Vec<Variable>,
    values: Vec<f64>,
}

impl ScalarTable {
    pub fn new(variables: Vec<Variable>, values: Vec<f64>) -> Result<Self> {
        check_distinct(&variables)?;
        let expected = cell_count(&variables)?;
        if values.len() != expected {
            return Err(Error::Schema(format!(
                "scalar table over {} variables needs {expected} values, got {}",
                variables.len(),
                values.len()
            )));
        }
        Ok(Self { variables, values })
    }

    /// Table without variables holding a single value.
    pub fn constant(value: f64) -> Self {
        Self {
            variables: Vec::new(),
            values: vec![value],
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.variables.contains(variable)
    }

    pub fn strides(&self) -> Vec<usize> {
        strides(&self.variables)
    }

    /// See [`accumulated_offsets`].
    pub fn accumulated_offsets(&self, reference: &[Variable]) -> Result<Vec<isize>> {
        accumulated_offsets(&self.variables, reference)
    }

    pub fn value_at(&self, assignment: &[(Variable, usize)]) -> Result<f64> {
        Ok(self.values[flat_index(&self.variables, assignment)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(id: u64, n: usize) -> Variable {
        let states: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
        Variable::chance(id, format!("V{id}"), states).unwrap()
    }

    #[test]
    fn strides_are_row_major() {
        let vars = vec![var(1, 2), var(2, 3), var(3, 4)];
        assert_eq!(strides(&vars), vec![12, 4, 1]);
        assert_eq!(cell_count(&vars).unwrap(), 24);
        assert_eq!(cell_count(&[]).unwrap(), 1);
    }

    #[test]
    fn walker_tracks_permuted_source() {
        let a = var(1, 2);
        let b = var(2, 3);
        // Source stored as (b, a); walk in (a, b) order.
        let source = vec![b.clone(), a.clone()];
        let reference = vec![a.clone(), b.clone()];
        let mut w = CoordinateWalker::new(&reference);
        let h = w.track(&source).unwrap();

        let mut seen = Vec::new();
        loop {
            let (ca, cb) = (w.coordinates()[0], w.coordinates()[1]);
            let expected = flat_index(&source, &[(a.clone(), ca), (b.clone(), cb)]).unwrap();
            assert_eq!(w.position(h), expected);
            seen.push(w.position(h));
            if !w.advance() {
                break;
            }
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(w.position(h), 0);
    }

    #[test]
    fn walker_broadcasts_missing_axes() {
        let a = var(1, 2);
        let b = var(2, 2);
        let mut w = CoordinateWalker::new(&[a.clone(), b.clone()]);
        let h = w.track(&[a.clone()]).unwrap();
        let mut positions = vec![w.position(h)];
        while w.advance() {
            positions.push(w.position(h));
        }
        assert_eq!(positions, vec![0, 0, 1, 1]);
    }

    #[test]
    fn track_rejects_foreign_variables() {
        let a = var(1, 2);
        let b = var(2, 2);
        let mut w = CoordinateWalker::new(&[a]);
        assert!(w.track(&[b]).is_err());
    }

    #[test]
    fn scalar_table_validates_size() {
        let a = var(1, 2);
        assert!(ScalarTable::new(vec![a.clone()], vec![0.5]).is_err());
        assert!(ScalarTable::new(vec![a.clone(), a.clone()], vec![0.0; 4]).is_err());
        let t = ScalarTable::new(vec![a.clone()], vec![0.3, 0.7]).unwrap();
        assert_eq!(t.value_at(&[(a, 1)]).unwrap(), 0.7);
    }
}
