//! Running serialised [`ApportionRequest`]s.
//!
//! Requests carry signed integers so that negative totals, floors and
//! capacities arriving from files are reported as invalid arguments rather
//! than parse failures. This module converts them and hands off to the driver.

use crate::driver::allocate;
use crate::error::{ApportionError, ApportionResult};
use crate::methods::RoundingMethod;
use apportion_types::{Allocation, ApportionRequest, ApportionResponse, CapacityMapping};
use tracing::instrument;

fn non_negative(argument: &str, value: i64) -> ApportionResult<u64> {
    u64::try_from(value).map_err(|_| {
        ApportionError::invalid_argument(argument, format!("{argument} must not be negative, got {value}"))
    })
}

/// Validates a request and runs the capacity-constrained driver on it.
#[instrument(skip(request), fields(entities = request.sizes.len(), total = request.total))]
pub fn apportion_request(request: &ApportionRequest) -> ApportionResult<Allocation<String>> {
    let total = non_negative("total", request.total)?;
    let initial = non_negative("initial", request.initial)?;
    let method = RoundingMethod::from_spec(&request.method)?;

    let units = request
        .units
        .as_ref()
        .map(|units| {
            units
                .iter()
                .map(|(key, &cap)| {
                    u64::try_from(cap).map(|cap| (key.clone(), cap)).map_err(|_| {
                        ApportionError::invalid_entity(
                            "units",
                            key,
                            format!("capacity of {key:?} must not be negative, got {cap}"),
                        )
                    })
                })
                .collect::<ApportionResult<CapacityMapping<String>>>()
        })
        .transpose()?;

    allocate(&request.sizes, total, units.as_ref(), initial, method)
}

/// Like [`apportion_request`], wrapped in a response envelope.
pub fn respond(request: &ApportionRequest) -> ApportionResult<ApportionResponse> {
    let allocation = apportion_request(request)?;
    let method = RoundingMethod::from_spec(&request.method)?;
    Ok(ApportionResponse::new(method.to_string(), allocation))
}
