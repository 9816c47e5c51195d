use crate::types::{MaValue, PositionState, TradeEvent};

/// Long/flat single-unit position tracker driving the crossover backtest.
///
/// Capital is realized-only: it moves when a position is closed and never
/// while one is held.
pub struct Portfolio {
    pub initial_capital: f64,
    pub capital: f64,
    pub state: PositionState,
    recorder: Option<Recorder>,
}

#[derive(Default)]
struct Recorder {
    capital_timeline: Vec<f64>,
    buy_events: Vec<TradeEvent>,
    sell_events: Vec<TradeEvent>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            capital: initial_capital,
            state: PositionState::Flat,
            recorder: None,
        }
    }

    /// Like [`Portfolio::new`], additionally keeping a capital timeline and
    /// buy/sell logs.
    pub fn with_recording(initial_capital: f64, bars: usize) -> Self {
        Self {
            recorder: Some(Recorder {
                capital_timeline: Vec::with_capacity(bars),
                ..Recorder::default()
            }),
            ..Self::new(initial_capital)
        }
    }

    /// Advance one bar. Transitions only fire when both averages are
    /// defined; equal averages never trade.
    pub fn process_bar(&mut self, bar: usize, short: MaValue, long: MaValue, price: f64) {
        if let (MaValue::Defined(s), MaValue::Defined(l)) = (short, long) {
            match self.state {
                PositionState::Flat if s > l => self.open_position(bar, price),
                PositionState::Long { .. } if s < l => self.close_position(bar, price),
                _ => {}
            }
        }

        if let Some(recorder) = &mut self.recorder {
            recorder.capital_timeline.push(self.capital);
        }
    }

    pub fn open_position(&mut self, bar: usize, price: f64) {
        if self.state != PositionState::Flat {
            return;
        }
        self.state = PositionState::Long { entry_price: price };
        if let Some(recorder) = &mut self.recorder {
            recorder.buy_events.push(TradeEvent {
                index: bar,
                capital_at_event: self.capital,
            });
        }
    }

    pub fn close_position(&mut self, bar: usize, price: f64) {
        let PositionState::Long { entry_price } = self.state else {
            return;
        };
        self.capital += price - entry_price;
        self.state = PositionState::Flat;

        if let Some(recorder) = &mut self.recorder {
            recorder.sell_events.push(TradeEvent {
                index: bar,
                capital_at_event: self.capital,
            });
            // The sell bar shows post-trade capital, whether it was already
            // pushed (forced close) or is about to be.
            if let Some(slot) = recorder.capital_timeline.get_mut(bar) {
                *slot = self.capital;
            }
        }
    }

    /// Realize any position still open at the final bar.
    pub fn close_at_end(&mut self, last_bar: usize, last_price: f64) {
        if self.is_long() {
            self.close_position(last_bar, last_price);
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self.state, PositionState::Long { .. })
    }

    pub fn final_capital(&self) -> f64 {
        self.capital
    }

    pub fn capital_timeline(&self) -> &[f64] {
        self.recorder
            .as_ref()
            .map(|r| r.capital_timeline.as_slice())
            .unwrap_or(&[])
    }

    pub fn buy_events(&self) -> &[TradeEvent] {
        self.recorder.as_ref().map(|r| r.buy_events.as_slice()).unwrap_or(&[])
    }

    pub fn sell_events(&self) -> &[TradeEvent] {
        self.recorder.as_ref().map(|r| r.sell_events.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_bars_never_trade() {
        let mut portfolio = Portfolio::new(1000.0);
        portfolio.process_bar(0, MaValue::Pending, MaValue::Defined(1.0), 5.0);
        portfolio.process_bar(1, MaValue::Defined(2.0), MaValue::Pending, 5.0);
        assert_eq!(portfolio.state, PositionState::Flat);
    }

    #[test]
    fn test_equal_averages_do_not_trade() {
        let mut portfolio = Portfolio::new(1000.0);
        portfolio.process_bar(0, MaValue::Defined(2.0), MaValue::Defined(2.0), 5.0);
        assert_eq!(portfolio.state, PositionState::Flat);

        portfolio.process_bar(1, MaValue::Defined(3.0), MaValue::Defined(2.0), 5.0);
        portfolio.process_bar(2, MaValue::Defined(2.0), MaValue::Defined(2.0), 9.0);
        assert_eq!(portfolio.state, PositionState::Long { entry_price: 5.0 });
    }

    #[test]
    fn test_capital_is_not_marked_to_market() {
        let mut portfolio = Portfolio::with_recording(1000.0, 3);
        portfolio.process_bar(0, MaValue::Defined(3.0), MaValue::Defined(2.0), 10.0);
        portfolio.process_bar(1, MaValue::Defined(3.0), MaValue::Defined(2.0), 50.0);
        portfolio.process_bar(2, MaValue::Defined(1.0), MaValue::Defined(2.0), 30.0);

        assert_eq!(portfolio.capital_timeline(), &[1000.0, 1000.0, 1020.0]);
        assert_eq!(
            portfolio.buy_events(),
            &[TradeEvent { index: 0, capital_at_event: 1000.0 }]
        );
        assert_eq!(
            portfolio.sell_events(),
            &[TradeEvent { index: 2, capital_at_event: 1020.0 }]
        );
    }

    #[test]
    fn test_close_at_end_rewrites_last_timeline_slot() {
        let mut portfolio = Portfolio::with_recording(100.0, 2);
        portfolio.process_bar(0, MaValue::Defined(3.0), MaValue::Defined(2.0), 10.0);
        portfolio.process_bar(1, MaValue::Defined(3.0), MaValue::Defined(2.0), 7.0);
        portfolio.close_at_end(1, 7.0);

        assert_eq!(portfolio.final_capital(), 97.0);
        assert_eq!(portfolio.capital_timeline(), &[100.0, 97.0]);
        assert_eq!(portfolio.sell_events().len(), 1);
        assert!(!portfolio.is_long());
    }

    #[test]
    fn test_unrecorded_portfolio_has_empty_logs() {
        let mut portfolio = Portfolio::new(100.0);
        portfolio.process_bar(0, MaValue::Defined(3.0), MaValue::Defined(2.0), 10.0);
        assert!(portfolio.capital_timeline().is_empty());
        assert!(portfolio.buy_events().is_empty());
    }
}
