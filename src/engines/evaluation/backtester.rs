use crate::{
    data::MovingAverageCache,
    engines::evaluation::Portfolio,
    error::{CrossgaError, Result},
    functions::SMA,
    types::{BacktestResult, MaValue},
};
use std::sync::Arc;

/// Moving-average crossover backtester.
///
/// Both entry points share one simulation, so the summary fitness and the
/// detailed final capital are identical for identical inputs.
pub struct Backtester {
    initial_capital: f64,
    cache: Option<Arc<MovingAverageCache>>,
}

impl Backtester {
    pub fn new(initial_capital: f64) -> Result<Self> {
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(CrossgaError::Configuration(
                "Initial capital must be positive".to_string(),
            ));
        }
        Ok(Self {
            initial_capital,
            cache: None,
        })
    }

    /// Reuse moving averages across evaluations of the same price series.
    ///
    /// The cache must only ever be used with one price series.
    pub fn with_cache(mut self, cache: Arc<MovingAverageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Final realized capital for the `(short_period, long_period)` pair.
    pub fn evaluate_strategy(&self, short_period: usize, long_period: usize, prices: &[f64]) -> Result<f64> {
        let mut portfolio = Portfolio::new(self.initial_capital);
        self.simulate(&mut portfolio, short_period, long_period, prices)?;
        Ok(portfolio.final_capital())
    }

    /// Same simulation, also returning the capital timeline and trade logs.
    pub fn evaluate_strategy_detailed(
        &self,
        short_period: usize,
        long_period: usize,
        prices: &[f64],
    ) -> Result<BacktestResult> {
        let mut portfolio = Portfolio::with_recording(self.initial_capital, prices.len());
        self.simulate(&mut portfolio, short_period, long_period, prices)?;

        Ok(BacktestResult {
            final_capital: portfolio.final_capital(),
            capital_timeline: portfolio.capital_timeline().to_vec(),
            buy_events: portfolio.buy_events().to_vec(),
            sell_events: portfolio.sell_events().to_vec(),
        })
    }

    fn simulate(
        &self,
        portfolio: &mut Portfolio,
        short_period: usize,
        long_period: usize,
        prices: &[f64],
    ) -> Result<()> {
        let short_line = self.moving_average(prices, short_period)?;
        let long_line = self.moving_average(prices, long_period)?;

        for (i, &price) in prices.iter().enumerate() {
            portfolio.process_bar(i, short_line[i], long_line[i], price);
        }

        if let Some(&last_price) = prices.last() {
            portfolio.close_at_end(prices.len() - 1, last_price);
        }

        Ok(())
    }

    fn moving_average(&self, prices: &[f64], period: usize) -> Result<Arc<Vec<MaValue>>> {
        match &self.cache {
            Some(cache) => cache.get_or_compute(prices, period),
            None => Ok(Arc::new(SMA::new(period)?.calculate(prices))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TradeEvent;

    #[test]
    fn test_backtester_rising_then_falling() {
        let prices = [1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0];
        let backtester = Backtester::new(100.0).unwrap();

        let detailed = backtester.evaluate_strategy_detailed(1, 2, &prices).unwrap();

        // Short(1) > Long(2) from bar 1, entry at 2.0; reverses at bar 4, exit at 3.0
        assert_eq!(
            detailed.buy_events,
            vec![TradeEvent { index: 1, capital_at_event: 100.0 }]
        );
        assert_eq!(
            detailed.sell_events,
            vec![TradeEvent { index: 4, capital_at_event: 101.0 }]
        );
        assert_eq!(
            detailed.capital_timeline,
            vec![100.0, 100.0, 100.0, 100.0, 101.0, 101.0, 101.0]
        );
        assert_eq!(detailed.final_capital, 101.0);
        assert_eq!(backtester.evaluate_strategy(1, 2, &prices).unwrap(), 101.0);
    }

    #[test]
    fn test_cached_and_uncached_agree() {
        let prices: Vec<f64> = (0..120).map(|i| 50.0 + ((i as f64) * 0.3).cos() * 8.0).collect();
        let plain = Backtester::new(1000.0).unwrap();
        let cached = Backtester::new(1000.0)
            .unwrap()
            .with_cache(Arc::new(MovingAverageCache::new(64)));

        for (s, l) in [(2, 5), (3, 20), (10, 30), (5, 6)] {
            let a = plain.evaluate_strategy(s, l, &prices).unwrap();
            let b = cached.evaluate_strategy(s, l, &prices).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_zero_period_is_configuration_error() {
        let backtester = Backtester::new(1000.0).unwrap();
        assert!(matches!(
            backtester.evaluate_strategy(0, 3, &[1.0, 2.0]),
            Err(CrossgaError::Configuration(_))
        ));
    }

    #[test]
    fn test_non_positive_capital_rejected() {
        assert!(Backtester::new(0.0).is_err());
        assert!(Backtester::new(-5.0).is_err());
        assert!(Backtester::new(f64::NAN).is_err());
    }
}
