pub mod traits;
pub mod evolution;
pub mod search_space;
pub mod backtesting;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use search_space::SearchSpaceConfig;
pub use backtesting::BacktestingConfig;
pub use traits::ConfigSection;
