//! Market descriptors.

use serde::{Deserialize, Serialize};

/// A market identified by symbol and its owning broker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketDescriptor {
    /// Broker the market details were resolved from.
    pub broker: String,
    /// Market symbol, e.g. `EUR/USD`.
    pub symbol: String,
}

impl MarketDescriptor {
    /// Create a descriptor for a broker/symbol pair.
    #[must_use]
    pub fn new(broker: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            symbol: symbol.into(),
        }
    }
}
