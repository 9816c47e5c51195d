use crate::data::MovingAverageCache;
use crate::engines::evaluation::Backtester;
use crate::engines::generation::{
    individual::{Individual, ParameterBounds, ScoredIndividual},
    operators::{breed, random_parent, random_population, truncation_selection},
};
use crate::error::{CrossgaError, Result};
use crate::types::PriceSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upper bound on memoised moving-average lines per run.
const MAX_CACHED_PERIODS: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub bounds: ParameterBounds,
    pub mutation_rate: f64,
    pub initial_capital: f64,
    pub seed: Option<u64>,
    /// Score each generation on the rayon pool.
    pub parallel: bool,
    /// Memoise moving averages per period for the duration of a run.
    pub cache_moving_averages: bool,
    /// Wall-clock budget, checked between generations.
    pub deadline: Option<Duration>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            bounds: ParameterBounds::default(),
            mutation_rate: 0.1,
            initial_capital: 10_000.0,
            seed: None,
            parallel: true,
            cache_moving_averages: true,
            deadline: None,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(CrossgaError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(CrossgaError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(CrossgaError::Configuration(
                "Initial capital must be positive".to_string(),
            ));
        }
        self.bounds.validate()
    }
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats);
    fn on_new_best(&mut self, generation: usize, best: &ScoredIndividual);
}

/// Shared flag for aborting a run between generations.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Completed,
    Cancelled,
    DeadlineReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub worst_fitness: f64,
    pub best_ever_fitness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    /// Best individual ever scored; `None` when nothing was scored.
    pub best: Option<ScoredIndividual>,
    pub generations_run: usize,
    pub stop_reason: StopReason,
    pub history: Vec<GenerationStats>,
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: StdRng,
    cancel: CancellationToken,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Run the generational search over `prices`.
    pub fn run<C: ProgressCallback>(
        &mut self,
        prices: &PriceSeries,
        mut callback: C,
    ) -> Result<EvolutionOutcome> {
        let started = Instant::now();
        let backtester = self.build_backtester(prices.len())?;
        let bounds = self.config.bounds;

        log::info!(
            "Starting search: population={}, generations={}, bars={}",
            self.config.population_size,
            self.config.generations,
            prices.len()
        );

        let mut population = random_population(self.config.population_size, &bounds, &mut self.rng);
        let mut best: Option<ScoredIndividual> = None;
        let mut history = Vec::with_capacity(self.config.generations);
        let mut stop_reason = StopReason::Completed;

        for generation in 0..self.config.generations {
            if self.cancel.is_cancelled() {
                log::warn!("Search cancelled before generation {}", generation + 1);
                stop_reason = StopReason::Cancelled;
                break;
            }
            if self.config.deadline.is_some_and(|d| started.elapsed() >= d) {
                log::warn!("Search deadline reached before generation {}", generation + 1);
                stop_reason = StopReason::DeadlineReached;
                break;
            }

            callback.on_generation_start(generation);

            let scored = self.score_population(&population, prices.prices(), &backtester)?;

            let previous = best.map(|b| b.fitness);
            best = fold_best(best, &scored);
            if let Some(current) = best.filter(|b| previous.map_or(true, |p| b.fitness > p)) {
                log::info!(
                    "New best at generation {}: short={}, long={}, fitness={:.4}",
                    generation + 1,
                    current.individual.short_period,
                    current.individual.long_period,
                    current.fitness
                );
                callback.on_new_best(generation, &current);
            }

            let stats = generation_stats(generation, &scored, best.map_or(f64::NEG_INFINITY, |b| b.fitness));
            log::debug!(
                "Generation {} complete: best={:.4}, mean={:.4}, worst={:.4}",
                generation + 1,
                stats.best_fitness,
                stats.mean_fitness,
                stats.worst_fitness
            );
            callback.on_generation_complete(&stats);
            history.push(stats);

            if generation + 1 == self.config.generations {
                break;
            }

            let survivors = truncation_selection(&scored);
            population = self.next_generation(&survivors);
        }

        log::info!(
            "Search finished after {} generations ({:?}) in {:.2}s",
            history.len(),
            stop_reason,
            started.elapsed().as_secs_f64()
        );

        Ok(EvolutionOutcome {
            best,
            generations_run: history.len(),
            stop_reason,
            history,
        })
    }

    fn build_backtester(&self, bars: usize) -> Result<Backtester> {
        let backtester = Backtester::new(self.config.initial_capital)?;
        if !self.config.cache_moving_averages {
            return Ok(backtester);
        }
        let bounds = &self.config.bounds;
        // Distinct lines a run can touch: every window in either range,
        // with all windows past the series end collapsing into one entry.
        let short_span = (bounds.max_short - bounds.min_short).saturating_add(1);
        let long_span = (bounds.max_long - bounds.min_long).saturating_add(1);
        let capacity = short_span
            .saturating_add(long_span)
            .min(bars.saturating_add(1))
            .min(MAX_CACHED_PERIODS);
        Ok(backtester.with_cache(Arc::new(MovingAverageCache::new(capacity))))
    }

    fn score_population(
        &self,
        population: &[Individual],
        prices: &[f64],
        backtester: &Backtester,
    ) -> Result<Vec<ScoredIndividual>> {
        for individual in population {
            individual.check_invariant()?;
        }

        let score = |individual: &Individual| -> Result<ScoredIndividual> {
            let fitness =
                backtester.evaluate_strategy(individual.short_period, individual.long_period, prices)?;
            Ok(ScoredIndividual {
                individual: *individual,
                fitness,
            })
        };

        // Results are collected positionally, so order matches `population`
        // on both paths.
        if self.config.parallel {
            population.par_iter().map(score).collect()
        } else {
            population.iter().map(score).collect()
        }
    }

    fn next_generation(&mut self, survivors: &[Individual]) -> Vec<Individual> {
        let mut next = Vec::with_capacity(self.config.population_size);
        while next.len() < self.config.population_size {
            let parent1 = *random_parent(survivors, &mut self.rng);
            let parent2 = *random_parent(survivors, &mut self.rng);
            next.push(breed(
                &parent1,
                &parent2,
                &self.config.bounds,
                self.config.mutation_rate,
                &mut self.rng,
            ));
        }
        next
    }
}

/// Elitism: the first individual to strictly beat the running best wins;
/// ties keep the incumbent.
pub fn fold_best(best: Option<ScoredIndividual>, scored: &[ScoredIndividual]) -> Option<ScoredIndividual> {
    scored.iter().fold(best, |acc, candidate| match acc {
        Some(current) if candidate.fitness <= current.fitness => Some(current),
        _ => Some(*candidate),
    })
}

fn generation_stats(generation: usize, scored: &[ScoredIndividual], best_ever_fitness: f64) -> GenerationStats {
    let fitness = scored.iter().map(|s| s.fitness);
    let best_fitness = fitness.clone().fold(f64::NEG_INFINITY, f64::max);
    let worst_fitness = fitness.clone().fold(f64::INFINITY, f64::min);
    let mean_fitness = fitness.sum::<f64>() / scored.len().max(1) as f64;

    GenerationStats {
        generation,
        best_fitness,
        mean_fitness,
        worst_fitness,
        best_ever_fitness,
    }
}

/// One-shot search with a fresh engine and no progress reporting.
pub fn run_ga(prices: &PriceSeries, config: EvolutionConfig) -> Result<Option<ScoredIndividual>> {
    let mut engine = EvolutionEngine::new(config)?;
    Ok(engine.run(prices, crate::engines::generation::progress::NoopProgressCallback)?.best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(short: usize, long: usize, fitness: f64) -> ScoredIndividual {
        ScoredIndividual {
            individual: Individual::new(short, long),
            fitness,
        }
    }

    #[test]
    fn test_fold_best_keeps_first_on_ties() {
        let generation = [scored(2, 5, 10.0), scored(3, 6, 12.0), scored(4, 7, 12.0)];
        let best = fold_best(None, &generation).unwrap();
        assert_eq!(best.individual, Individual::new(3, 6));

        let next = [scored(9, 10, 12.0)];
        assert_eq!(fold_best(Some(best), &next), Some(best));

        let better = [scored(9, 10, 12.5)];
        assert_eq!(fold_best(Some(best), &better), Some(better[0]));
    }

    #[test]
    fn test_fold_best_accepts_negative_fitness() {
        let best = fold_best(None, &[scored(2, 5, -3.0)]);
        assert_eq!(best.map(|b| b.fitness), Some(-3.0));
    }

    #[test]
    fn test_config_validation() {
        assert!(EvolutionConfig::default().validate().is_ok());

        let bad = [
            EvolutionConfig { population_size: 0, ..Default::default() },
            EvolutionConfig { mutation_rate: 1.5, ..Default::default() },
            EvolutionConfig { mutation_rate: f64::NAN, ..Default::default() },
            EvolutionConfig { initial_capital: 0.0, ..Default::default() },
            EvolutionConfig {
                bounds: ParameterBounds { min_short: 10, max_short: 20, min_long: 5, max_long: 10 },
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(EvolutionEngine::new(config.clone()), Err(CrossgaError::Configuration(_))),
                "expected rejection for {:?}",
                config
            );
        }
    }

    #[test]
    fn test_generation_stats() {
        let stats = generation_stats(3, &[scored(2, 5, 1.0), scored(2, 6, 3.0), scored(2, 7, 5.0)], 7.0);
        assert_eq!(stats.best_fitness, 5.0);
        assert_eq!(stats.worst_fitness, 1.0);
        assert_eq!(stats.mean_fitness, 3.0);
        assert_eq!(stats.best_ever_fitness, 7.0);
    }

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
