use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns the price loader looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceColumn {
    Close,
    Date,
}

impl PriceColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Date => "date",
        }
    }

    /// Common alternative column names, in lookup order
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Close => vec![
                "close", "Close", "CLOSE", "c", "adj_close", "Adj Close", "price", "Price",
            ],
            Self::Date => vec!["date", "Date", "DATE", "datetime", "timestamp", "time"],
        }
    }
}

/// Metadata about a loaded price file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub dropped_rows: usize,
    pub close_column: String,
    pub date_column: Option<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub price_range: (f64, f64), // (min, max)
}
