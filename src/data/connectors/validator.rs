use crate::error::{CrossgaError, Result};
use polars::prelude::*;
use super::types::PriceColumn;

pub struct DataValidator;

impl DataValidator {
    /// Find column by checking aliases
    pub fn find_column(df: &DataFrame, column: &PriceColumn) -> Option<&'static str> {
        let columns = df.get_column_names();
        column
            .aliases()
            .into_iter()
            .find(|alias| columns.iter().any(|col| col.as_str() == *alias))
    }

    /// Validate that a close column exists and is numeric
    pub fn validate_close_column(df: &DataFrame) -> Result<&'static str> {
        let name = Self::find_column(df, &PriceColumn::Close).ok_or_else(|| {
            CrossgaError::DataLoading(format!(
                "Missing required column: {} (tried aliases: {:?})",
                PriceColumn::Close.as_str(),
                PriceColumn::Close.aliases()
            ))
        })?;

        let series = df.column(name)?;
        if !matches!(series.dtype(), DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32) {
            return Err(CrossgaError::DataLoading(format!(
                "Column '{}' must be numeric, found {:?}",
                name,
                series.dtype()
            )));
        }

        Ok(name)
    }

    /// Every price must be finite and strictly positive
    pub fn validate_prices(prices: &[f64]) -> Result<()> {
        for (i, &price) in prices.iter().enumerate() {
            if !price.is_finite() || price <= 0.0 {
                return Err(CrossgaError::DataLoading(format!(
                    "Invalid price at row {}: {} (prices must be positive)",
                    i, price
                )));
            }
        }
        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(len: usize, min_rows: usize) -> Result<()> {
        if len < min_rows {
            return Err(CrossgaError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                len, min_rows
            )));
        }
        Ok(())
    }
}
