//! Discrete variables of the decision network.
//!
//! The graph layer owns the network; this core only needs a stable identity,
//! the ordered state list, and whether the variable is a chance or a decision
//! node. Cloning is cheap (shared interior).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::VariableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Chance,
    Decision,
}

#[derive(Debug, Serialize, Deserialize)]
struct VariableInner {
    id: VariableId,
    name: String,
    kind: VariableKind,
    states: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variable {
    inner: Arc<VariableInner>,
}

impl Variable {
    pub fn new<S: Into<String>>(
        id: impl Into<VariableId>,
        name: impl Into<String>,
        kind: VariableKind,
        states: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let name = name.into();
        let states: Vec<String> = states.into_iter().map(Into::into).collect();
        if states.is_empty() {
            return Err(Error::Schema(format!("variable '{name}' has no states")));
        }
        Ok(Self {
            inner: Arc::new(VariableInner {
                id: id.into(),
                name,
                kind,
                states,
            }),
        })
    }

    pub fn chance<S: Into<String>>(
        id: u64,
        name: impl Into<String>,
        states: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        Self::new(id, name, VariableKind::Chance, states)
    }

    pub fn decision<S: Into<String>>(
        id: u64,
        name: impl Into<String>,
        states: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        Self::new(id, name, VariableKind::Decision, states)
    }

    pub fn id(&self) -> VariableId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn kind(&self) -> VariableKind {
        self.inner.kind
    }

    pub fn states(&self) -> &[String] {
        &self.inner.states
    }

    pub fn cardinality(&self) -> usize {
        self.inner.states.len()
    }

    pub fn state_name(&self, index: usize) -> Option<&str> {
        self.inner.states.get(index).map(String::as_str)
    }

    pub fn state_index(&self, name: &str) -> Option<usize> {
        self.inner.states.iter().position(|s| s == name)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}
