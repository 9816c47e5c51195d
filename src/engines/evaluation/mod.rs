pub mod backtester;
pub mod portfolio;

pub use backtester::Backtester;
pub use portfolio::Portfolio;
