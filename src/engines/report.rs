use crate::{
    engines::evaluation::Backtester,
    engines::generation::{EvolutionOutcome, GenerationStats, ScoredIndividual, StopReason},
    error::Result,
    functions::simple_moving_average,
    types::{BacktestResult, MaValue, PriceSeries},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Moving-average overlays for the best individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaOverlay {
    pub short: Vec<MaValue>,
    pub long: Vec<MaValue>,
}

/// Everything a chart layer needs to present a finished search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub best: Option<ScoredIndividual>,
    pub stop_reason: StopReason,
    pub generations_run: usize,
    pub initial_capital: f64,
    pub dates: Option<Vec<NaiveDate>>,
    pub prices: Vec<f64>,
    pub overlay: Option<MaOverlay>,
    pub backtest: Option<BacktestResult>,
    pub history: Vec<GenerationStats>,
}

impl SearchReport {
    pub fn build(prices: &PriceSeries, outcome: &EvolutionOutcome, initial_capital: f64) -> Result<Self> {
        let (overlay, backtest) = match outcome.best {
            Some(best) => {
                let ind = best.individual;
                let backtester = Backtester::new(initial_capital)?;
                let backtest =
                    backtester.evaluate_strategy_detailed(ind.short_period, ind.long_period, prices.prices())?;
                let overlay = MaOverlay {
                    short: simple_moving_average(prices.prices(), ind.short_period)?,
                    long: simple_moving_average(prices.prices(), ind.long_period)?,
                };
                (Some(overlay), Some(backtest))
            }
            None => (None, None),
        };

        Ok(Self {
            best: outcome.best,
            stop_reason: outcome.stop_reason,
            generations_run: outcome.generations_run,
            initial_capital,
            dates: prices.dates().map(<[NaiveDate]>::to_vec),
            prices: prices.prices().to_vec(),
            overlay,
            backtest,
            history: outcome.history.clone(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
