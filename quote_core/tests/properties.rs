use proptest::prelude::*;
use quote_core::{QuoteAnalyzer, QuoteConfig};

fn analyzer(seed: u64) -> QuoteAnalyzer {
    let config = QuoteConfig {
        latency_ms: 0,
        seed: Some(seed),
        ..QuoteConfig::default()
    };
    QuoteAnalyzer::new(&config).unwrap()
}

proptest! {
    #[test]
    fn price_is_frozen_after_first_read(symbol in ".{0,12}", seed in any::<u64>(), reads in 2usize..20) {
        let mut qa = analyzer(seed);
        let first = qa.get_price(&symbol);
        prop_assert!((100.0..=500.0).contains(&first));
        for _ in 1..reads {
            prop_assert_eq!(qa.get_price(&symbol), first);
        }
        prop_assert_eq!(qa.fetch_count(), 1);
    }

    #[test]
    fn moving_average_equals_price(symbol in "[A-Z]{1,5}", seed in any::<u64>(), window in 1usize..300) {
        let mut qa = analyzer(seed);
        let avg = qa.moving_average(&symbol, window).unwrap();
        prop_assert_eq!(avg, qa.get_price(&symbol));
    }

    #[test]
    fn rsi_is_saturated(symbol in "[A-Z]{1,5}", seed in any::<u64>(), period in 2usize..300) {
        let mut qa = analyzer(seed);
        prop_assert_eq!(qa.calculate_rsi(&symbol, period).unwrap(), 100.0);
    }

    #[test]
    fn rsi_cache_never_exceeds_capacity(keys in prop::collection::vec(("[A-C]{1,2}", 2usize..40), 1..400)) {
        let mut qa = analyzer(0);
        for (symbol, period) in &keys {
            qa.calculate_rsi(symbol, *period).unwrap();
        }
        let metrics = qa.rsi_metrics();
        prop_assert_eq!(metrics.inserts, metrics.misses);
        prop_assert!(metrics.inserts - metrics.evictions <= 100);
    }
}

#[test]
fn goog_scenario() {
    let mut qa = analyzer(2024);
    let v = qa.get_price("GOOG");
    assert!((100.0..=500.0).contains(&v));
    assert_eq!(qa.moving_average("GOOG", 10).unwrap(), v);
    assert_eq!(qa.calculate_rsi("GOOG", 14).unwrap(), 100.0);
    assert_eq!(qa.calculate_rsi_default("GOOG").unwrap(), 100.0);
    assert_eq!(qa.rsi_metrics().hits, 1);
}

#[test]
fn zero_window_is_invalid_argument() {
    let mut qa = analyzer(1);
    let err = qa.moving_average("X", 0).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.to_string(), "INVALID_ARGUMENT: moving average window_size must be positive, got 0");
}
