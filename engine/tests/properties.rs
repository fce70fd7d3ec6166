use chrono::{Duration, NaiveDate};
use engine::alerts::{deduplicate, validate_alerts};
use engine::indicators::{rolling_mean, Direction, GannHiLo, PriceField};
use engine::models::SignalRow;
use engine::signals::{track_positions, RawConditions, SignalFlags};
use proptest::prelude::*;
use shared::models::{Bar, SignalLabel};

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap() + Duration::days(offset as i64)
}

fn flags_strategy() -> impl Strategy<Value = SignalFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(long_open, long_close, short_open, short_close)| SignalFlags { long_open, long_close, short_open, short_close },
    )
}

fn label_strategy() -> impl Strategy<Value = SignalLabel> {
    prop_oneof![
        Just(SignalLabel::Hold),
        Just(SignalLabel::LongOpen),
        Just(SignalLabel::LongClose),
        Just(SignalLabel::ShortOpen),
        Just(SignalLabel::ShortClose),
    ]
}

fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(t, &close)| Bar {
            date: day(t),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 100,
        })
        .collect()
}

proptest! {
    #[test]
    fn tracked_events_hold_one_position(raw in prop::collection::vec(flags_strategy(), 0..200)) {
        let tracked = track_positions(&RawConditions::from_flags(raw.clone()));
        prop_assert_eq!(tracked.events.len(), raw.len());

        let (mut long, mut short) = (0i32, 0i32);
        for events in &tracked.events {
            prop_assert!(!(events.long_open && events.short_open));
            long += events.long_open as i32 - events.long_close as i32;
            short += events.short_open as i32 - events.short_close as i32;
            prop_assert!((0..=1).contains(&long));
            prop_assert!((0..=1).contains(&short));
            prop_assert!(long + short <= 1);
        }
    }

    #[test]
    fn dedup_returns_valid_pair(labels in prop::collection::vec(label_strategy(), 0..120)) {
        let rows: Vec<SignalRow> = labels
            .iter()
            .enumerate()
            .map(|(t, label)| SignalRow { date: day(t), close: 1.0 + t as f64, signal: Some(*label) })
            .collect();

        let alerts = deduplicate(&rows);
        prop_assert!(alerts.len() <= 2);
        prop_assert!(validate_alerts(&alerts));
        prop_assert!(alerts.windows(2).all(|w| w[0].signal_date >= w[1].signal_date));

        let any_open = labels.iter().any(|l| matches!(l, SignalLabel::LongOpen | SignalLabel::ShortOpen));
        if any_open {
            prop_assert!(alerts.iter().any(|a| a.alert_type.is_open()));
        }
    }

    #[test]
    fn gann_is_deterministic_and_warms_up_on_first_close(
        closes in prop::collection::vec(1.0f64..1000.0, 1..150),
        fast in 2usize..20,
        slow in 2usize..30,
    ) {
        let bars = bars_from_closes(&closes);
        let gann = GannHiLo::new(fast, slow);
        let first = gann.compute(&bars);
        let second = gann.compute(&bars);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.hilo.len(), bars.len());
        prop_assert_eq!(first.direction.len(), bars.len());

        // Neither average exists before the shorter window fills
        let warmup = fast.min(slow) - 1;
        for i in 0..warmup.min(bars.len()) {
            prop_assert_eq!(first.hilo[i], closes[0]);
            prop_assert_eq!(first.direction[i], Direction::Up);
        }
    }

    #[test]
    fn gann_direction_changes_only_on_breakout(
        closes in prop::collection::vec(1.0f64..1000.0, 2..150),
        fast in 2usize..20,
        slow in 2usize..30,
    ) {
        let bars = bars_from_closes(&closes);
        let output = GannHiLo::new(fast, slow).compute(&bars);
        let sma_high = rolling_mean(&PriceField::High.extract(&bars), fast);
        let sma_low = rolling_mean(&PriceField::Low.extract(&bars), slow);

        for i in 1..bars.len() {
            let breaks_up = sma_high[i - 1].is_some_and(|high| closes[i] > high);
            let breaks_down = sma_low[i - 1].is_some_and(|low| closes[i] < low);
            if breaks_up {
                prop_assert_eq!(output.direction[i], Direction::Up);
            } else if breaks_down {
                prop_assert_eq!(output.direction[i], Direction::Down);
            } else {
                prop_assert_eq!(output.direction[i], output.direction[i - 1], "bar {}", i);
            }
        }
    }
}
