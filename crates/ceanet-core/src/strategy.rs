//! Strategy trees: "do X, and if the outcome of V is s, continue with T_s".
//!
//! Every interval of a partition points at one of these (or at `None`, the
//! shared "nothing left to decide" sentinel). Trees are immutable and shared
//! through `Arc`, so folding thousands of cells only bumps reference counts.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// Reference to a strategy tree; `None` means no further decision.
pub type Strategy = Option<Arc<StrategyTree>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyTree {
    /// Choose `state` of decision `variable`, then follow `next`.
    Decision {
        variable: Variable,
        state: usize,
        next: Strategy,
    },
    /// Branch on the outcome of `variable`.
    Conditional {
        variable: Variable,
        branches: Vec<StrategyBranch>,
    },
}

/// States of a conditioning variable that share one follow-up strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyBranch {
    pub states: Vec<usize>,
    pub next: Strategy,
}

/// Structural equality with a pointer fast path.
pub fn same_strategy(a: &Strategy, b: &Strategy) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => Arc::ptr_eq(x, y) || x == y,
        _ => false,
    }
}

impl StrategyTree {
    pub fn decide(variable: &Variable, state: usize, next: Strategy) -> Strategy {
        Some(Arc::new(StrategyTree::Decision {
            variable: variable.clone(),
            state,
            next,
        }))
    }

    /// Build a conditional node from `(state, follow-up)` pairs.
    ///
    /// States leading to equal follow-ups are grouped; groups appear in order
    /// of first appearance and list their states ascending, so two nodes built
    /// from the same mapping compare equal regardless of input order.
    pub fn conditional(
        variable: &Variable,
        children: impl IntoIterator<Item = (usize, Strategy)>,
    ) -> Strategy {
        let mut sorted: Vec<(usize, Strategy)> = children.into_iter().collect();
        sorted.sort_by_key(|(s, _)| *s);

        let mut branches: Vec<StrategyBranch> = Vec::new();
        for (state, next) in sorted {
            match branches.iter_mut().find(|b| same_strategy(&b.next, &next)) {
                Some(branch) => branch.states.push(state),
                None => branches.push(StrategyBranch {
                    states: vec![state],
                    next,
                }),
            }
        }
        Some(Arc::new(StrategyTree::Conditional {
            variable: variable.clone(),
            branches,
        }))
    }

    pub fn root_variable(&self) -> &Variable {
        match self {
            StrategyTree::Decision { variable, .. } => variable,
            StrategyTree::Conditional { variable, .. } => variable,
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let child_depth = |s: &Strategy| s.as_ref().map_or(0, |t| t.depth());
        match self {
            StrategyTree::Decision { next, .. } => 1 + child_depth(next),
            StrategyTree::Conditional { branches, .. } => {
                1 + branches.iter().map(|b| child_depth(&b.next)).max().unwrap_or(0)
            }
        }
    }

    /// Every `(decision, chosen state)` in pre-order.
    pub fn decisions(&self) -> Vec<(Variable, usize)> {
        let mut out = Vec::new();
        self.collect_decisions(&mut out);
        out
    }

    fn collect_decisions(&self, out: &mut Vec<(Variable, usize)>) {
        match self {
            StrategyTree::Decision {
                variable,
                state,
                next,
            } => {
                out.push((variable.clone(), *state));
                if let Some(n) = next {
                    n.collect_decisions(out);
                }
            }
            StrategyTree::Conditional { branches, .. } => {
                for n in branches.iter().filter_map(|b| b.next.as_ref()) {
                    n.collect_decisions(out);
                }
            }
        }
    }
}

fn state_label(variable: &Variable, state: usize) -> String {
    variable
        .state_name(state)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{state}"))
}

impl fmt::Display for StrategyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyTree::Decision {
                variable,
                state,
                next,
            } => {
                write!(f, "{}={}", variable, state_label(variable, *state))?;
                if let Some(n) = next {
                    write!(f, "; {n}")?;
                }
                Ok(())
            }
            StrategyTree::Conditional { variable, branches } => {
                for (i, b) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    let labels: Vec<String> =
                        b.states.iter().map(|s| state_label(variable, *s)).collect();
                    write!(f, "{}={} -> [", variable, labels.join(","))?;
                    match &b.next {
                        Some(n) => write!(f, "{n}")?,
                        None => f.write_str("-")?,
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (Variable, Variable) {
        let test = Variable::chance(1, "Test", ["pos", "neg"]).unwrap();
        let treat = Variable::decision(2, "Treat", ["no", "yes"]).unwrap();
        (test, treat)
    }

    #[test]
    fn conditional_is_canonical() {
        let (test, treat) = fixtures();
        let yes = StrategyTree::decide(&treat, 1, None);
        let no = StrategyTree::decide(&treat, 0, None);
        let a = StrategyTree::conditional(&test, [(0, yes.clone()), (1, no.clone())]);
        let b = StrategyTree::conditional(&test, [(1, no), (0, yes)]);
        assert!(same_strategy(&a, &b));
    }

    #[test]
    fn conditional_groups_equal_children() {
        let (test, treat) = fixtures();
        let yes = StrategyTree::decide(&treat, 1, None);
        let node = StrategyTree::conditional(&test, [(0, yes.clone()), (1, yes)]);
        match node.as_deref() {
            Some(StrategyTree::Conditional { branches, .. }) => {
                assert_eq!(branches.len(), 1);
                assert_eq!(branches[0].states, vec![0, 1]);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn display_and_decisions() {
        let (test, treat) = fixtures();
        let node = StrategyTree::conditional(
            &test,
            [
                (0, StrategyTree::decide(&treat, 1, None)),
                (1, StrategyTree::decide(&treat, 0, None)),
            ],
        );
        let tree = node.unwrap();
        assert_eq!(
            tree.to_string(),
            "Test=pos -> [Treat=yes] | Test=neg -> [Treat=no]"
        );
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.decisions().len(), 2);
        assert_eq!(tree.root_variable(), &test);
    }

    #[test]
    fn none_differs_from_leaf() {
        let (_, treat) = fixtures();
        assert!(!same_strategy(&None, &StrategyTree::decide(&treat, 0, None)));
        assert!(same_strategy(&None, &None));
    }
}
