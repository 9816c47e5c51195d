use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Chronological closing prices, optionally labelled with the trading date
/// of each bar.
///
/// The search core only ever reads `prices`; `dates` travels along so a
/// report can label its charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    prices: Vec<f64>,
    dates: Option<Vec<NaiveDate>>,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self { prices, dates: None }
    }

    /// Attach date labels. Labels are dropped when their length does not
    /// match the price count.
    pub fn with_dates(prices: Vec<f64>, dates: Vec<NaiveDate>) -> Self {
        let dates = (dates.len() == prices.len()).then_some(dates);
        Self { prices, dates }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.prices.last().copied()
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(prices: Vec<f64>) -> Self {
        Self::new(prices)
    }
}

/// One cell of a moving-average series.
///
/// Serialises as `null` while pending so chart layers can draw gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Option<f64>", from = "Option<f64>")]
pub enum MaValue {
    /// Fewer than `period` samples seen so far.
    Pending,
    Defined(f64),
}

impl MaValue {
    pub fn value(self) -> Option<f64> {
        match self {
            MaValue::Pending => None,
            MaValue::Defined(v) => Some(v),
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, MaValue::Defined(_))
    }
}

impl From<MaValue> for Option<f64> {
    fn from(value: MaValue) -> Self {
        value.value()
    }
}

impl From<Option<f64>> for MaValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MaValue::Pending, MaValue::Defined)
    }
}

/// Simulation state of the crossover backtest.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long { entry_price: f64 },
}

/// A buy or sell marker on the capital timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub index: usize,
    pub capital_at_event: f64,
}

/// Detailed backtest output for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub final_capital: f64,
    /// Realized capital in effect at each bar; same length as the input.
    pub capital_timeline: Vec<f64>,
    pub buy_events: Vec<TradeEvent>,
    pub sell_events: Vec<TradeEvent>,
}
