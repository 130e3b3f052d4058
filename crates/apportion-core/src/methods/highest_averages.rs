//! Highest-averages (divisor) rounding.
//!
//! Units are handed out one at a time; each goes to the entity with the
//! largest `size / f(a)`, where `a` is what that entity already holds. With
//! an increasing divisor this reproduces Jefferson/D'Hondt, Webster/Sainte-Laguë,
//! Huntington-Hill and the rest exactly, and it is house monotone.

use crate::EntityKey;
use crate::divisor::Divisor;
use crate::error::{ApportionError, ApportionResult};
use crate::validate::{check_positive_sizes, scaled_sizes};
use apportion_types::{Allocation, SizeMapping};
use tracing::{instrument, trace};

/// Index of the entity with the highest quotient among those `eligible`.
///
/// The first entity reaching the maximum keeps it.
pub(crate) fn best_quotient(
    weights: &[f64],
    counts: &[u64],
    divisor: Divisor,
    eligible: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut winner: Option<(usize, f64)> = None;
    for (index, (&weight, &count)) in weights.iter().zip(counts).enumerate() {
        if weight <= 0.0 || !eligible(index) {
            continue;
        }
        let quotient = divisor.quotient(weight, count);
        match winner {
            Some((_, best)) if quotient <= best => {}
            _ => winner = Some((index, quotient)),
        }
    }
    winner.map(|(index, _)| index)
}

/// Distributes `n` units by highest averages with the given divisor.
#[instrument(level = "debug", skip(size), fields(entities = size.len()))]
pub fn highest_average<K: EntityKey>(
    size: &SizeMapping<K>,
    n: u64,
    divisor: Divisor,
) -> ApportionResult<Allocation<K>> {
    check_positive_sizes(size)?;

    let weights = scaled_sizes(size);
    let mut counts = vec![0u64; weights.len()];

    for unit in 0..n {
        let index = best_quotient(&weights, &counts, divisor, |_| true).ok_or_else(|| {
            ApportionError::internal_component("highest_average", "no entity can take a unit")
        })?;
        counts[index] += 1;
        trace!(unit, index, "unit awarded");
    }

    Ok(size.keys().cloned().zip(counts).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    fn parties() -> SizeMapping<&'static str> {
        indexmap! {
            "A" => 47_000.0,
            "B" => 16_000.0,
            "C" => 15_800.0,
            "D" => 12_000.0,
            "E" => 6_100.0,
            "F" => 3_100.0,
        }
    }

    fn seats(divisor: Divisor) -> Vec<u64> {
        highest_average(&parties(), 10, divisor).unwrap().values().copied().collect()
    }

    #[test]
    fn dhondt_favours_large_parties() {
        assert_eq!(seats(Divisor::DHondt), vec![5, 2, 2, 1, 0, 0]);
    }

    #[test]
    fn webster_is_sainte_lague() {
        assert_eq!(seats(Divisor::Webster), vec![4, 2, 2, 1, 1, 0]);
    }

    #[test]
    fn other_divisors() {
        assert_eq!(seats(Divisor::Adams), vec![3, 2, 2, 1, 1, 1]);
        assert_eq!(seats(Divisor::Dean), vec![4, 2, 1, 1, 1, 1]);
        assert_eq!(seats(Divisor::HuntingtonHill), vec![4, 2, 1, 1, 1, 1]);
        assert_eq!(seats(Divisor::Imperiali), vec![7, 1, 1, 1, 0, 0]);
        assert_eq!(seats(Divisor::Danish), vec![4, 2, 2, 1, 1, 0]);
    }

    #[test]
    fn ties_go_to_first_entity() {
        let size = indexmap! { "a" => 1.0, "b" => 1.0, "c" => 1.0 };
        let result = highest_average(&size, 2, Divisor::DHondt).unwrap();
        assert_eq!(result.values().copied().collect::<Vec<_>>(), vec![1, 1, 0]);
    }

    #[test]
    fn zero_size_entity_is_never_eligible() {
        // Adams makes the first unit free; an empty entity still gets none.
        let size = indexmap! { "a" => 0.0, "b" => 2.0, "c" => 1.0 };
        let result = highest_average(&size, 5, Divisor::Adams).unwrap();
        assert_eq!(result["a"], 0);
        assert_eq!(result.values().sum::<u64>(), 5);
    }

    #[test]
    fn house_monotone() {
        for divisor in Divisor::ALL {
            let mut previous = highest_average(&parties(), 0, divisor).unwrap();
            for n in 1..=30 {
                let next = highest_average(&parties(), n, divisor).unwrap();
                for (key, units) in &next {
                    assert!(*units >= previous[key], "{divisor}: {key} lost a unit at n={n}");
                }
                previous = next;
            }
        }
    }

    #[test]
    fn all_zero_sizes_are_rejected() {
        let size = indexmap! { "a" => 0.0 };
        assert!(highest_average(&size, 1, Divisor::Webster).is_err());
    }

    #[test]
    fn huge_sizes_keep_their_ratio() {
        // Danish and Webster divide by less than one at a = 0, where an
        // unscaled 1e308 would overflow to infinity.
        let size = indexmap! { "a" => 1e308, "b" => 1e308 / 2.0 };
        for divisor in [Divisor::DHondt, Divisor::Danish, Divisor::Webster] {
            let result = highest_average(&size, 3, divisor).unwrap();
            assert_eq!(result.values().copied().collect::<Vec<_>>(), vec![2, 1], "{divisor}");
        }
        let size = indexmap! { "a" => 1e308, "b" => 1e308 };
        let result = highest_average(&size, 10, Divisor::DHondt).unwrap();
        assert_eq!(result.values().copied().collect::<Vec<_>>(), vec![5, 5]);
    }

    #[test]
    fn tiny_positive_size_still_counts() {
        let size = indexmap! { "a" => 1e308, "b" => 1e-300 };
        let result = highest_average(&size, 2, Divisor::Adams).unwrap();
        assert_eq!(result.values().copied().collect::<Vec<_>>(), vec![1, 1]);
    }
}
