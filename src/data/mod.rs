pub mod cache;
pub mod connectors;

pub use cache::MovingAverageCache;
pub use connectors::{CsvConnector, DatasetMetadata};
