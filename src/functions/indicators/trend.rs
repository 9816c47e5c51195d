use crate::{
    error::{CrossgaError, Result},
    types::MaValue,
};

// --- SMA ---

/// Simple moving average over a trailing window of `period` prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SMA {
    period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(CrossgaError::Configuration(
                "Moving-average period must be at least 1".to_string(),
            ));
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Windowed mean, recomputed from scratch at every index.
    ///
    /// Cells before `period - 1` are `Pending`. A period longer than the
    /// series leaves every cell `Pending`.
    pub fn calculate(&self, prices: &[f64]) -> Vec<MaValue> {
        let period = self.period;
        (0..prices.len())
            .map(|i| {
                if i + 1 < period {
                    MaValue::Pending
                } else {
                    let window = &prices[i + 1 - period..=i];
                    MaValue::Defined(window.iter().sum::<f64>() / period as f64)
                }
            })
            .collect()
    }

    /// Running-sum variant. Agrees with [`SMA::calculate`] up to rounding.
    pub fn calculate_rolling(&self, prices: &[f64]) -> Vec<MaValue> {
        let period = self.period;
        let mut out = Vec::with_capacity(prices.len());
        let mut sum = 0.0;

        for (i, &price) in prices.iter().enumerate() {
            sum += price;
            if i >= period {
                sum -= prices[i - period];
            }
            if i + 1 < period {
                out.push(MaValue::Pending);
            } else {
                out.push(MaValue::Defined(sum / period as f64));
            }
        }

        out
    }
}

pub fn simple_moving_average(prices: &[f64], period: usize) -> Result<Vec<MaValue>> {
    Ok(SMA::new(period)?.calculate(prices))
}

pub fn simple_moving_average_rolling(prices: &[f64], period: usize) -> Result<Vec<MaValue>> {
    Ok(SMA::new(period)?.calculate_rolling(prices))
}
