//! Invariants that must hold for every valid input.

use apportion_core::*;
use proptest::prelude::*;

fn arb_sizes(max_len: usize) -> impl Strategy<Value = SizeMapping<usize>> {
    let size = prop_oneof![
        1 => Just(0.0),
        4 => 0.01_f64..1_000.0,
        1 => 1e-300_f64..1e-290,
        1 => 1e290_f64..f64::MAX,
    ];
    proptest::collection::vec(size, 1..=max_len)
        .prop_filter("at least one positive size", |v| v.iter().any(|x| *x > 0.0))
        .prop_map(|v| v.into_iter().enumerate().collect())
}

fn arb_method() -> impl Strategy<Value = RoundingMethod> {
    prop_oneof![
        Just(RoundingMethod::LargestRemainder),
        proptest::sample::select(Divisor::ALL.to_vec()).prop_map(RoundingMethod::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn largest_remainder_sums_and_stays_within_one_of_quota(
        size in arb_sizes(12),
        n in 0u64..200,
    ) {
        let result = largest_remainder(&size, n).unwrap();
        let shares = quota(&size, n).unwrap();
        prop_assert_eq!(result.values().sum::<u64>(), n);
        for (key, units) in &result {
            let share = shares[key];
            prop_assert!((*units as f64 - share).abs() < 1.0 + 1e-9,
                "entity {key}: {units} vs quota {share}");
            if size[key] == 0.0 {
                prop_assert_eq!(*units, 0);
            }
        }
    }

    #[test]
    fn highest_average_is_house_monotone(
        size in arb_sizes(8),
        n in 0u64..60,
        divisor in proptest::sample::select(Divisor::ALL.to_vec()),
    ) {
        let smaller = highest_average(&size, n, divisor).unwrap();
        let larger = highest_average(&size, n + 1, divisor).unwrap();
        prop_assert_eq!(smaller.values().sum::<u64>(), n);
        prop_assert_eq!(larger.values().sum::<u64>(), n + 1);
        for (key, units) in &larger {
            prop_assert!(*units >= smaller[key]);
        }
    }

    #[test]
    fn driver_respects_sum_floor_and_capacity(
        size in arb_sizes(10),
        caps in proptest::collection::vec(0u64..30, 10),
        initial in 0u64..3,
        method in arb_method(),
    ) {
        let units: CapacityMapping<usize> = size
            .keys()
            .map(|&k| (k, initial + caps[k]))
            .collect();
        // Largest n the capacities on positive-size entities can absorb.
        let room: u64 = size
            .iter()
            .filter(|(_, s)| **s > 0.0)
            .map(|(k, _)| units[k] - initial)
            .sum();
        let n = initial * size.len() as u64 + room / 2;

        let result = allocate(&size, n, Some(&units), initial, method).unwrap();
        prop_assert_eq!(result.values().sum::<u64>(), n);
        for (key, allocated) in &result {
            prop_assert!(*allocated >= initial);
            prop_assert!(*allocated <= units[key]);
        }
    }

    #[test]
    fn driver_without_caps_matches_plain_rounding(
        size in arb_sizes(10),
        n in 0u64..100,
        method in arb_method(),
    ) {
        let driven = allocate(&size, n, None, 0, method).unwrap();
        prop_assert_eq!(driven, method.apply(&size, n).unwrap());
    }

    #[test]
    fn permuting_keys_does_not_change_allocation(
        raw in proptest::collection::vec(1u32..10_000, 2..8),
        n in 0u64..80,
        method in arb_method(),
    ) {
        // Distinct sizes avoid exact ties, the only place order may matter.
        let mut distinct = raw.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assume!(distinct.len() == raw.len());
        // Adams, Dean and Huntington-Hill tie at +inf until everyone holds a unit.
        prop_assume!(n >= raw.len() as u64);

        let forward: SizeMapping<usize> =
            raw.iter().enumerate().map(|(k, &s)| (k, f64::from(s) + 0.123)).collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = method.apply(&forward, n).unwrap();
        let b = method.apply(&reversed, n).unwrap();
        for (key, units) in &a {
            prop_assert_eq!(*units, b[key]);
        }
    }
}
