use crossga::functions::{indicators::simple_moving_average_rolling, simple_moving_average};
use crossga::MaValue;

fn windowed_mean(prices: &[f64], end: usize, period: usize) -> f64 {
    prices[end + 1 - period..=end].iter().sum::<f64>() / period as f64
}

#[test]
fn test_sma_matches_definition_for_every_period() {
    let prices: Vec<f64> = (0..60).map(|i| 20.0 + ((i * 7) % 13) as f64 * 0.5).collect();

    for period in 1..=prices.len() {
        let ma = simple_moving_average(&prices, period).unwrap();
        assert_eq!(ma.len(), prices.len());
        for (i, cell) in ma.iter().enumerate() {
            if i + 1 < period {
                assert_eq!(*cell, MaValue::Pending, "period {} index {}", period, i);
            } else {
                assert_eq!(*cell, MaValue::Defined(windowed_mean(&prices, i, period)));
            }
        }
    }
}

#[test]
fn test_sma_documented_example() {
    let ma = simple_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap();
    let values: Vec<Option<f64>> = ma.into_iter().map(MaValue::value).collect();
    assert_eq!(values, vec![None, Some(1.5), Some(2.5), Some(3.5), Some(4.5)]);
}

#[test]
fn test_rolling_agrees_on_large_prices() {
    let prices: Vec<f64> = (0..2_000).map(|i| 40_000.0 + (i as f64 * 0.013).sin() * 900.0).collect();
    let exact = simple_moving_average(&prices, 250).unwrap();
    let rolling = simple_moving_average_rolling(&prices, 250).unwrap();

    for (a, b) in exact.iter().zip(&rolling) {
        match (a.value(), b.value()) {
            (Some(x), Some(y)) => assert!((x - y).abs() / x < 1e-10),
            (None, None) => {}
            _ => panic!("definedness differs"),
        }
    }
}
