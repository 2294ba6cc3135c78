//! Consumption of the drained aggregate: headline statistics and persistence.

mod store;
mod summary;

pub use store::{ResultsStore, StoreError};
pub use summary::ResultsSummary;
