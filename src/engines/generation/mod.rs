pub mod evolution_engine;
pub mod individual;
pub mod operators;
pub mod progress;
pub mod runner;

pub use evolution_engine::{
    fold_best, run_ga, CancellationToken, EvolutionConfig, EvolutionEngine, EvolutionOutcome,
    GenerationStats, ProgressCallback, StopReason,
};
pub use individual::{Individual, ParameterBounds, Population, ScoredIndividual};
pub use progress::{ChannelProgressCallback, LogProgressCallback, NoopProgressCallback, ProgressMessage};
pub use runner::EvolutionRunner;
