//! Largest-remainder (Hamilton / Hare) rounding.
//!
//! Every entity first gets the integer part of its quota. The units that
//! leaves over go, one each, to the entities with the largest fractional
//! parts. The method is not house monotone: raising the total can take a
//! unit away from an entity (the Alabama paradox).

use crate::EntityKey;
use crate::error::{ApportionError, ApportionResult};
use crate::validate::proportions;
use apportion_types::{Allocation, SizeMapping};
use indexmap::IndexMap;
use tracing::{instrument, trace};

/// Exact proportional shares `n * size[k] / Σsize`.
///
/// Each share is `n` times a fraction of at most one, so it stays finite for
/// every finite size.
pub fn quota<K: EntityKey>(size: &SizeMapping<K>, n: u64) -> ApportionResult<IndexMap<K, f64>> {
    let fractions = proportions(size)?;
    let n = n as f64;
    Ok(size.keys().cloned().zip(fractions).map(|(key, fraction)| (key, n * fraction)).collect())
}

/// Distributes `n` units by largest remainder.
///
/// Ties between equal remainders go to the entity that comes first in
/// `size`. Entities of size zero never receive a unit.
#[instrument(level = "debug", skip(size), fields(entities = size.len()))]
pub fn largest_remainder<K: EntityKey>(
    size: &SizeMapping<K>,
    n: u64,
) -> ApportionResult<Allocation<K>> {
    let quotas = quota(size, n)?;

    let mut result: Allocation<K> = IndexMap::with_capacity(quotas.len());
    // (position, floor - quota); more negative means a larger fraction is owed
    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(quotas.len());
    let mut total_floor: u64 = 0;

    for (index, ((key, &share), &value)) in quotas.iter().zip(size.values()).enumerate() {
        let floor = share.floor();
        if !(0.0..=n as f64).contains(&floor) {
            return Err(ApportionError::internal_component(
                "largest_remainder",
                format!("share {share} of {key:?} is outside 0..={n}"),
            ));
        }
        let units = floor as u64;
        total_floor = total_floor.checked_add(units).filter(|sum| *sum <= n).ok_or_else(|| {
            ApportionError::internal_component(
                "largest_remainder",
                format!("floored shares add up to more than the total of {n}"),
            )
        })?;
        result.insert(key.clone(), units);
        if value > 0.0 {
            remainders.push((index, floor - share));
        }
    }

    // sort_by is stable, so equal remainders keep input order
    remainders.sort_by(|a, b| a.1.total_cmp(&b.1));

    let shortfall = n.saturating_sub(total_floor);
    trace!(total_floor, shortfall, "quotas floored");
    for &(index, _) in remainders.iter().take(shortfall as usize) {
        if let Some((_, units)) = result.get_index_mut(index) {
            *units += 1;
        }
    }

    Ok(result)
}
