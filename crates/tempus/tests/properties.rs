use chrono::{FixedOffset, Offset};
use proptest::prelude::*;
use tempus::{
    parse_duration, parse_time, AsInstant, Duration, Instant, Layout, Period, Range, Ranges, Zone,
};

// ── Strategies ──────────────────────────────────────────────────────────────

/// Instants whose local calendar year stays within 0001..=9999 for any offset.
fn arb_instant() -> impl Strategy<Value = Instant> {
    (
        -62_000_000_000i64..253_000_000_000i64,
        0u32..1_000_000_000,
        -(14 * 60)..=(14 * 60i32),
    )
        .prop_map(|(secs, nanos, offset_minutes)| {
            let zone = FixedOffset::east_opt(offset_minutes * 60)
                .map(Zone::from)
                .unwrap_or(Zone::Utc);
            tempus::from_unix(secs, i64::from(nanos))
                .unwrap()
                .with_timezone(&zone)
        })
}

/// UTC instants whose nanosecond count fits in `i64`.
fn arb_epoch_nanos_instant() -> impl Strategy<Value = Instant> {
    (-9_000_000_000i64..9_000_000_000, 0i64..1_000_000_000)
        .prop_map(|(secs, nanos)| tempus::from_unix(secs, nanos).unwrap())
}

fn arb_period() -> impl Strategy<Value = Period> {
    prop::sample::select(Period::ALL.to_vec())
}

fn arb_range() -> impl Strategy<Value = Range<i64>> {
    (-1_000i64..1_000, 0i64..500).prop_map(|(from, len)| Range::new(from, from + len))
}

// ── Properties ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rfc3339_nano_round_trips(t in arb_instant()) {
        let text = Layout::Rfc3339Nano.format(&t);
        let back = parse_time(text.as_str()).unwrap();
        prop_assert_eq!(back, t);
        prop_assert_eq!(back.offset().fix(), t.offset().fix());
    }

    #[test]
    fn nano_layout_round_trips(t in arb_epoch_nanos_instant()) {
        let text = Layout::Nano.format(&t);
        let back = Layout::Nano.parse(text.as_str()).unwrap();
        prop_assert_eq!(back, t);
    }

    #[test]
    fn period_boundaries_bracket_the_instant(t in arb_instant(), period in arb_period()) {
        let begin = period.beginning(&t);
        let end = period.end(&t);
        prop_assert!(begin <= t);
        prop_assert!(t <= end);
        prop_assert_eq!(period.beginning(&begin), begin);
        prop_assert_eq!(period.end(&end), end);
    }

    #[test]
    fn periods_are_adjacent(t in arb_instant(), period in arb_period()) {
        let next = period.end(&t) + chrono::TimeDelta::nanoseconds(1);
        prop_assert_eq!(period.beginning(&next), next);
    }

    #[test]
    fn duration_text_round_trips(nanos in -1_000_000_000_000_000_000i64..1_000_000_000_000_000_000) {
        let d = Duration::from_nanos(nanos);
        prop_assert_eq!(parse_duration(&d.to_string()).unwrap(), d);
    }

    #[test]
    fn union_encloses_every_range(ranges in prop::collection::vec(arb_range(), 1..8)) {
        let union = Ranges::new(ranges.clone()).max().unwrap();
        for r in &ranges {
            prop_assert!(union.from <= r.from && r.until <= union.until);
        }
    }

    #[test]
    fn intersection_is_inside_every_range(ranges in prop::collection::vec(arb_range(), 1..8)) {
        match Ranges::new(ranges.clone()).min() {
            Some(overlap) => {
                for r in &ranges {
                    prop_assert!(r.from <= overlap.from && overlap.until <= r.until);
                }
            }
            None => {
                let latest_from = ranges.iter().map(|r| r.from).max().unwrap();
                let earliest_until = ranges.iter().map(|r| r.until).min().unwrap();
                prop_assert!(latest_from > earliest_until);
            }
        }
    }

    #[test]
    fn unix_accessors_agree(t in arb_instant()) {
        prop_assert_eq!(t.unix_milli().div_euclid(1000), t.unix());
        prop_assert_eq!(t.unix_micro().div_euclid(1_000_000), t.unix());
    }
}
