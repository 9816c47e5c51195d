pub mod trend;

pub use trend::{simple_moving_average, simple_moving_average_rolling, SMA};
