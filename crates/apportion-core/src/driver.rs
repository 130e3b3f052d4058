//! Capacity-constrained apportionment.
//!
//! The driver hands every entity its floor, then distributes the rest with a
//! [`RoundingMethod`]. Entities that end up over their capacity are clamped,
//! their excess is pooled, and their working size is zeroed so later rounds
//! skip them. The pooled excess is redistributed among the others until
//! nothing is left over:
//!
//! ```text
//! result    = initial for every entity
//! remaining = n - initial * |size|
//! while remaining > 0:
//!     result += method(working_size, remaining)
//!     remaining = 0
//!     for k with result[k] > units[k]:
//!         remaining += result[k] - units[k]
//!         result[k] = units[k]
//!         working_size[k] = 0
//! ```
//!
//! Every round that leaves units over saturates at least one entity that
//! still had a positive size, so the loop runs at most `|size| + 1` times.
//! Feasibility is checked up front: the capacity above the floor on entities
//! with a positive size must cover `remaining`, otherwise the call fails
//! before any unit is placed.

use crate::EntityKey;
use crate::error::{ApportionError, ApportionResult};
use crate::methods::RoundingMethod;
use crate::validate::{aligned_values, check_sizes, headroom};
use apportion_types::{Allocation, CapacityMapping, SizeMapping};
use tracing::{debug, instrument};

/// Allocates `n` units over `size`, never exceeding `units` and never going
/// below `initial` for any entity.
///
/// `units` defaults to `n` for every entity. The caller's mappings are not
/// modified; the result lists entities in the key order of `size`.
#[instrument(skip(size, units), fields(entities = size.len(), capped = units.is_some()))]
pub fn allocate<K: EntityKey>(
    size: &SizeMapping<K>,
    n: u64,
    units: Option<&CapacityMapping<K>>,
    initial: u64,
    method: RoundingMethod,
) -> ApportionResult<Allocation<K>> {
    check_sizes(size)?;

    let count = size.len() as u64;
    let floor_total = initial.checked_mul(count).filter(|total| *total <= n).ok_or_else(|| {
        ApportionError::invalid_argument(
            "initial",
            format!(
                "an initial allocation of {initial} for each of {count} entities needs more \
                 than the total of {n}; initial must be at most {}",
                n / count
            ),
        )
    })?;

    let capacity = match units {
        Some(units) => aligned_values(size, units, "units")?,
        None => vec![n; size.len()],
    };
    for (key, &cap) in size.keys().zip(&capacity) {
        if cap < initial {
            return Err(ApportionError::invalid_entity(
                "units",
                key,
                format!("capacity {cap} of {key:?} is below the initial allocation of {initial}"),
            ));
        }
    }

    let mut remaining = n - floor_total;
    let sizes: Vec<f64> = size.values().copied().collect();
    let room = headroom(&sizes, &vec![initial; sizes.len()], &capacity);
    if room < remaining {
        let message = if sizes.iter().all(|s| *s <= 0.0) {
            format!("all sizes are zero; {remaining} units above the floor cannot be placed")
        } else {
            format!(
                "capacities leave room for {room} units above the floor, \
                 but {remaining} remain to be placed"
            )
        };
        let argument = if units.is_some() { "units" } else { "size" };
        return Err(ApportionError::invalid_argument(argument, message));
    }

    let mut working = size.clone();
    let mut result = vec![initial; size.len()];
    let mut round = 0usize;

    while remaining > 0 {
        if round > size.len() {
            return Err(ApportionError::internal_component(
                "driver",
                format!("{remaining} units still unplaced after {round} rounds"),
            ));
        }
        round += 1;

        let increment = method.apply(&working, remaining)?;
        for (slot, add) in result.iter_mut().zip(increment.values()) {
            *slot += add;
        }

        remaining = 0;
        let mut saturated = 0usize;
        for (index, (slot, &cap)) in result.iter_mut().zip(&capacity).enumerate() {
            if *slot > cap {
                remaining += *slot - cap;
                *slot = cap;
                if let Some((_, weight)) = working.get_index_mut(index) {
                    *weight = 0.0;
                }
                saturated += 1;
            }
        }
        debug!(round, saturated, remaining, "redistribution round finished");
    }

    Ok(size.keys().cloned().zip(result).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divisor::Divisor;
    use indexmap::indexmap;

    fn values<K: EntityKey>(allocation: &Allocation<K>) -> Vec<u64> {
        allocation.values().copied().collect()
    }

    #[test]
    fn no_capacity_is_plain_rounding() {
        let size = indexmap! { "a" => 6.0, "b" => 6.0, "c" => 2.0 };
        let result = allocate(&size, 10, None, 0, RoundingMethod::LargestRemainder).unwrap();
        assert_eq!(values(&result), vec![4, 4, 2]);
    }

    #[test]
    fn cascading_caps_redistribute_excess() {
        // Round 1: c takes all 6, clamped at 3.  Round 2: b takes 3, clamped
        // at 2.  Round 3: a takes the last unit.
        let size = indexmap! { "a" => 1.0, "b" => 20.0, "c" => 300.0 };
        let units = indexmap! { "a" => 6, "b" => 2, "c" => 3 };
        for method in [RoundingMethod::LargestRemainder, RoundingMethod::from(Divisor::DHondt)] {
            let result = allocate(&size, 6, Some(&units), 0, method).unwrap();
            assert_eq!(values(&result), vec![1, 2, 3], "{method}");
        }
    }

    #[test]
    fn caller_sizes_are_not_modified() {
        let size = indexmap! { "a" => 1.0, "b" => 20.0, "c" => 300.0 };
        let before = size.clone();
        let units = indexmap! { "a" => 6, "b" => 2, "c" => 3 };
        allocate(&size, 6, Some(&units), 0, RoundingMethod::LargestRemainder).unwrap();
        assert_eq!(size, before);
    }

    #[test]
    fn floor_is_given_before_rounding() {
        let size = indexmap! { "a" => 5.0, "b" => 3.0, "c" => 2.0 };
        let result = allocate(&size, 10, None, 2, RoundingMethod::LargestRemainder).unwrap();
        assert_eq!(values(&result), vec![4, 3, 3]);
    }

    #[test]
    fn zero_size_entity_keeps_its_floor() {
        let size = indexmap! { "a" => 1.0, "b" => 0.0 };
        let result = allocate(&size, 5, None, 1, RoundingMethod::LargestRemainder).unwrap();
        assert_eq!(values(&result), vec![4, 1]);
    }

    #[test]
    fn floor_that_uses_everything_needs_no_rounding() {
        // All sizes zero is fine when nothing is left to round.
        let size = indexmap! { "a" => 0.0, "b" => 0.0 };
        let result = allocate(&size, 4, None, 2, RoundingMethod::LargestRemainder).unwrap();
        assert_eq!(values(&result), vec![2, 2]);
    }

    #[test]
    fn infeasible_floor_states_the_bound() {
        let size = indexmap! { "a" => 1.0, "b" => 1.0, "c" => 1.0 };
        let err = allocate(&size, 5, None, 2, RoundingMethod::LargestRemainder).unwrap_err();
        assert_eq!(err.argument(), Some("initial"));
        assert!(err.to_string().contains("at most 1"), "{err}");
    }

    #[test]
    fn insufficient_capacity_is_rejected_up_front() {
        let size = indexmap! { "a" => 1.0, "b" => 1.0 };
        let units = indexmap! { "a" => 2, "b" => 2 };
        let err = allocate(&size, 5, Some(&units), 0, RoundingMethod::LargestRemainder)
            .unwrap_err();
        assert_eq!(err.argument(), Some("units"));
    }

    #[test]
    fn capacity_on_empty_entities_does_not_count() {
        let size = indexmap! { "a" => 1.0, "b" => 0.0 };
        let units = indexmap! { "a" => 2, "b" => 10 };
        assert!(allocate(&size, 5, Some(&units), 0, RoundingMethod::LargestRemainder).is_err());
    }

    #[test]
    fn capacity_below_floor_is_rejected() {
        let size = indexmap! { "a" => 1.0, "b" => 1.0 };
        let units = indexmap! { "a" => 0, "b" => 10 };
        let err = allocate(&size, 4, Some(&units), 1, RoundingMethod::LargestRemainder)
            .unwrap_err();
        assert_eq!(err.entity(), Some("\"a\""));
    }

    #[test]
    fn all_zero_sizes_with_units_left_are_rejected() {
        let size = indexmap! { "a" => 0.0, "b" => 0.0 };
        let err = allocate(&size, 3, None, 0, RoundingMethod::LargestRemainder).unwrap_err();
        assert!(err.to_string().contains("all sizes are zero"), "{err}");
    }

    #[test]
    fn saturated_capacity_exactly_matches_total() {
        let size = indexmap! { "a" => 1.0, "b" => 2.0, "c" => 3.0 };
        let units = indexmap! { "a" => 1, "b" => 1, "c" => 1 };
        let result = allocate(&size, 3, Some(&units), 0, RoundingMethod::LargestRemainder).unwrap();
        assert_eq!(values(&result), vec![1, 1, 1]);
    }
}
