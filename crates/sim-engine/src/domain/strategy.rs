//! Strategy references.

use serde::{Deserialize, Serialize};

/// An immutable reference to a strategy under test.
///
/// The engine never inspects strategy internals; the simulator collaborator
/// resolves the reference to executable logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyRef {
    /// Strategy name, unique within a run.
    pub name: String,
}

impl StrategyRef {
    /// Create a reference by name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
