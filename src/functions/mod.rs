pub mod indicators;

pub use indicators::{simple_moving_average, SMA};
