//! Apportionment engine.
//!
//! Distributes a fixed number of indivisible units among entities in
//! proportion to their sizes, the way seats are apportioned among states or
//! parties, with optional per-entity capacities and a common floor.
//!
//! ```text
//! sizes + n ──► RoundingMethod ──► raw allocation ──► capacity check
//!                    ▲                                      │
//!                    └──── residual n, saturated sizes = 0 ◄┘
//! ```
//!
//! | Module | Key items | What it does |
//! |--------|-----------|--------------|
//! | [`divisor`] | [`Divisor`] | The seven named divisor functions |
//! | [`methods`] | [`largest_remainder`], [`highest_average`], [`RoundingMethod`] | Turn shares into integers summing to `n` |
//! | [`driver`] | [`allocate`] | Clamp-and-redistribute under capacities |
//! | [`bounded`] | [`bounded_highest_average`] | Divisor method with per-entity floors and ceilings |
//! | [`request`] | [`apportion_request`] | Validate and run a serialised request |
//!
//! ```
//! use apportion_core::{allocate, RoundingMethod};
//! use indexmap::indexmap;
//!
//! let size = indexmap! { "a" => 1.0, "b" => 20.0, "c" => 300.0 };
//! let units = indexmap! { "a" => 6, "b" => 2, "c" => 3 };
//! let result = allocate(&size, 6, Some(&units), 0, RoundingMethod::LargestRemainder).unwrap();
//! assert_eq!(result.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

#![warn(missing_docs)]

use std::fmt::Debug;
use std::hash::Hash;

pub mod bounded;
pub mod divisor;
pub mod driver;
pub mod error;
pub mod methods;
pub mod request;
mod validate;

pub use apportion_types::{Allocation, ApportionRequest, ApportionResponse, CapacityMapping, SizeMapping};
pub use bounded::bounded_highest_average;
pub use divisor::{Divisor, divisor};
pub use driver::allocate;
pub use error::{ApportionError, ApportionResult};
pub use methods::{RoundingMethod, highest_average, largest_remainder, quota};
pub use request::{apportion_request, respond};

/// Anything usable as an entity identifier.
///
/// Keys are opaque to the engine; `Debug` is only used in error messages.
pub trait EntityKey: Hash + Eq + Clone + Debug {}

impl<T: Hash + Eq + Clone + Debug> EntityKey for T {}
