//! Catalog store: reads the tabular CSV snapshot the engine treats as
//! immutable for its lifetime, plus deterministic demo fixtures.

pub mod fixtures;
pub mod loader;

pub use loader::{load_snapshot, StoreError};
