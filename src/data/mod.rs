//! Data module - dataset loading, cleaning and caching

pub mod cache;
pub mod geo;
pub mod loader;
pub mod model;

pub use cache::{DatasetCache, SourceKey};
pub use geo::Geometry;
pub use loader::{DataLoadError, DataLoader};
pub use model::{Dataset, DepartmentBoundary, JoinedRecord, NameRecord, Sex};
