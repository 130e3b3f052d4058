//! Highest-averages with per-entity floors and ceilings.
//!
//! Unlike [`allocate`](crate::allocate), which rounds whole batches and then
//! clamps, this awards units one at a time and simply skips entities that
//! have reached their ceiling. Each entity starts at its own floor.

use crate::EntityKey;
use crate::divisor::Divisor;
use crate::error::{ApportionError, ApportionResult};
use crate::methods::highest_averages::best_quotient;
use crate::validate::{aligned_values, check_sizes, headroom, scaled_sizes};
use apportion_types::{Allocation, CapacityMapping, SizeMapping};
use tracing::{instrument, trace};

/// Distributes `n` units by highest averages, keeping every entity within
/// `lower[k] ..= upper[k]`.
///
/// `lower` defaults to zero and `upper` to `n` for every entity. Entities
/// of size zero keep their floor.
#[instrument(skip(size, lower, upper), fields(entities = size.len()))]
pub fn bounded_highest_average<K: EntityKey>(
    size: &SizeMapping<K>,
    n: u64,
    lower: Option<&CapacityMapping<K>>,
    upper: Option<&CapacityMapping<K>>,
    divisor: Divisor,
) -> ApportionResult<Allocation<K>> {
    check_sizes(size)?;

    let floors = match lower {
        Some(lower) => aligned_values(size, lower, "lower")?,
        None => vec![0; size.len()],
    };
    let ceilings = match upper {
        Some(upper) => aligned_values(size, upper, "upper")?,
        None => vec![n; size.len()],
    };

    for (key, (floor, ceiling)) in size.keys().zip(floors.iter().zip(&ceilings)) {
        if floor > ceiling {
            return Err(ApportionError::invalid_entity(
                "lower",
                key,
                format!("floor {floor} of {key:?} is above its ceiling {ceiling}"),
            ));
        }
    }

    let floor_total = floors
        .iter()
        .try_fold(0u64, |acc, floor| acc.checked_add(*floor))
        .filter(|total| *total <= n)
        .ok_or_else(|| {
            ApportionError::invalid_argument(
                "lower",
                format!("the floors add up to more than the total of {n}"),
            )
        })?;

    let remaining = n - floor_total;
    let weights = scaled_sizes(size);
    let room = headroom(&weights, &floors, &ceilings);
    if room < remaining {
        return Err(ApportionError::invalid_argument(
            "upper",
            format!(
                "ceilings leave room for {room} units above the floors, \
                 but {remaining} remain to be placed"
            ),
        ));
    }

    let mut counts = floors;
    for unit in 0..remaining {
        let index = best_quotient(&weights, &counts, divisor, |i| counts[i] < ceilings[i])
            .ok_or_else(|| {
                ApportionError::internal_component("bounded", "no entity below its ceiling")
            })?;
        counts[index] += 1;
        trace!(unit, index, "unit awarded");
    }

    Ok(size.keys().cloned().zip(counts).collect())
}
