//! Precondition checks shared by the rounding methods and the driver.

use crate::EntityKey;
use crate::error::{ApportionError, ApportionResult};
use indexmap::IndexMap;

/// Neumaier-compensated sum; keeps the proportion denominators stable when
/// sizes span many orders of magnitude.
pub(crate) fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for value in values {
        let t = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - t) + value;
        } else {
            compensation += (value - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Checks every size.
///
/// Rejects an empty mapping and any negative, NaN or infinite size.
pub(crate) fn check_sizes<K: EntityKey>(size: &IndexMap<K, f64>) -> ApportionResult<()> {
    if size.is_empty() {
        return Err(ApportionError::invalid_argument("size", "at least one entity is required"));
    }
    for (key, &value) in size {
        if !value.is_finite() {
            return Err(ApportionError::invalid_entity(
                "size",
                key,
                format!("size of {key:?} must be finite, got {value}"),
            ));
        }
        if value < 0.0 {
            return Err(ApportionError::invalid_entity(
                "size",
                key,
                format!("size of {key:?} must not be negative, got {value}"),
            ));
        }
    }
    Ok(())
}

/// Like [`check_sizes`], but also rejects mappings whose sizes are all zero.
pub(crate) fn check_positive_sizes<K: EntityKey>(size: &IndexMap<K, f64>) -> ApportionResult<()> {
    check_sizes(size)?;
    if size.values().any(|value| *value > 0.0) {
        Ok(())
    } else {
        Err(ApportionError::invalid_argument(
            "size",
            "all sizes are zero; there is no basis for a proportion",
        ))
    }
}

/// Sizes divided by a power of two near the largest one.
///
/// Dividing by a power of two is exact, so ratios and ties survive, and the
/// largest scaled value is close to one: sums and quotients of scaled sizes
/// cannot overflow. Positive sizes never scale to zero; the ones that would
/// underflow are raised to `f64::MIN_POSITIVE`.
pub(crate) fn scaled_sizes<K: EntityKey>(size: &IndexMap<K, f64>) -> Vec<f64> {
    let largest = size.values().copied().fold(0.0_f64, f64::max);
    if largest <= 0.0 {
        return size.values().copied().collect();
    }
    let exponent = (largest.log2().floor() as i32).clamp(f64::MIN_EXP - 1, f64::MAX_EXP - 1);
    let scale = 2.0_f64.powi(exponent);
    size.values()
        .map(|&value| if value > 0.0 { (value / scale).max(f64::MIN_POSITIVE) } else { 0.0 })
        .collect()
}

/// Each entity's fraction of the total size, in key order.
pub(crate) fn proportions<K: EntityKey>(size: &IndexMap<K, f64>) -> ApportionResult<Vec<f64>> {
    check_positive_sizes(size)?;
    let scaled = scaled_sizes(size);
    let total = compensated_sum(scaled.iter().copied());
    Ok(scaled.into_iter().map(|value| value / total).collect())
}

/// Returns `other`'s values in the key order of `size`.
///
/// Fails unless both mappings have exactly the same key set.
pub(crate) fn aligned_values<K: EntityKey>(
    size: &IndexMap<K, f64>,
    other: &IndexMap<K, u64>,
    argument: &str,
) -> ApportionResult<Vec<u64>> {
    let values = size
        .keys()
        .map(|key| {
            other.get(key).copied().ok_or_else(|| {
                ApportionError::invalid_entity(
                    argument,
                    key,
                    format!("{argument} has no entry for {key:?}; keys must match the sizes"),
                )
            })
        })
        .collect::<ApportionResult<Vec<u64>>>()?;

    if let Some(extra) = other.keys().find(|key| !size.contains_key(*key)) {
        return Err(ApportionError::invalid_entity(
            argument,
            extra,
            format!("{argument} names {extra:?}, which has no size; keys must match the sizes"),
        ));
    }
    Ok(values)
}

/// Sum of `ceiling - floor` over entities that can still receive units.
pub(crate) fn headroom(sizes: &[f64], floors: &[u64], ceilings: &[u64]) -> u64 {
    sizes
        .iter()
        .zip(floors.iter().zip(ceilings))
        .filter(|(size, _)| **size > 0.0)
        .fold(0u64, |acc, (_, (floor, ceiling))| acc.saturating_add(ceiling.saturating_sub(*floor)))
}
