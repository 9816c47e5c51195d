//! Genetic-algorithm search for the moving-average crossover window pair
//! that maximizes realized capital on a historical price series.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use engines::evaluation::Backtester;
pub use engines::generation::{run_ga, EvolutionConfig, EvolutionEngine, Individual, ParameterBounds, ScoredIndividual};
pub use engines::report::SearchReport;
pub use error::{CrossgaError, Result};
pub use types::{BacktestResult, MaValue, PriceSeries, TradeEvent};
