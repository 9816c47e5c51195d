use crate::{
    error::{CrossgaError, Result},
    types::PriceSeries,
};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;
use super::{
    types::{DatasetMetadata, PriceColumn},
    validator::DataValidator,
};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| CrossgaError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a closing-price series (and date labels, when present) from CSV.
    pub fn load_price_series<P: AsRef<Path>>(path: P) -> Result<(PriceSeries, DatasetMetadata)> {
        let df = Self::load(&path)?;
        let (series, mut metadata) = Self::price_series_from_frame(&df)?;
        metadata.file_path = path.as_ref().to_string_lossy().to_string();
        Ok((series, metadata))
    }

    /// Extract a price series from an already loaded frame.
    ///
    /// Rows with a null close are dropped. Date labels are kept only if
    /// every surviving row has a parseable `YYYY-MM-DD` date.
    pub fn price_series_from_frame(df: &DataFrame) -> Result<(PriceSeries, DatasetMetadata)> {
        let close_name = DataValidator::validate_close_column(df)?;
        let close = df.column(close_name)?.cast(&DataType::Float64)?;
        let close = close.f64()?;

        let date_name = DataValidator::find_column(df, &PriceColumn::Date);
        let raw_dates: Option<Vec<Option<String>>> = match date_name {
            Some(name) => {
                let dates = df.column(name)?.cast(&DataType::String)?;
                let dates = dates.str()?;
                Some(dates.into_iter().map(|d| d.map(str::to_string)).collect())
            }
            None => None,
        };

        let mut prices = Vec::with_capacity(df.height());
        let mut kept_rows = Vec::with_capacity(df.height());
        for (row, value) in close.into_iter().enumerate() {
            if let Some(price) = value {
                prices.push(price);
                kept_rows.push(row);
            }
        }

        let dropped_rows = df.height() - prices.len();
        if dropped_rows > 0 {
            log::warn!("Dropped {} rows with null close prices", dropped_rows);
        }

        DataValidator::validate_minimum_rows(prices.len(), 1)?;
        DataValidator::validate_prices(&prices)?;

        let dates = raw_dates.and_then(|raw| {
            let parsed: Option<Vec<NaiveDate>> = kept_rows
                .iter()
                .map(|&row| raw[row].as_deref().and_then(parse_date))
                .collect();
            if parsed.is_none() {
                log::warn!("Date column present but not parseable; continuing without date labels");
            }
            parsed
        });

        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let metadata = DatasetMetadata {
            file_path: String::new(),
            num_rows: prices.len(),
            dropped_rows,
            close_column: close_name.to_string(),
            date_column: dates.as_ref().and(date_name.map(str::to_string)),
            date_range: dates
                .as_ref()
                .and_then(|d| Some((*d.first()?, *d.last()?))),
            price_range: (min, max),
        };

        let series = match dates {
            Some(dates) => PriceSeries::with_dates(prices, dates),
            None => PriceSeries::new(prices),
        };

        Ok((series, metadata))
    }
}

/// Accepts plain dates and datetimes whose first ten characters are a date.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
