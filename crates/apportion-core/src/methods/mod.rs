//! Rounding methods: turn proportional shares into integer units summing to `n`.

pub mod highest_averages;
pub mod largest_remainder;

use crate::EntityKey;
use crate::divisor::Divisor;
use crate::error::ApportionResult;
use apportion_types::{Allocation, MethodSpec, SizeMapping};
use std::fmt;

pub use highest_averages::highest_average;
pub use largest_remainder::{largest_remainder, quota};

/// The rounding strategy the driver applies on each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMethod {
    /// Hamilton: floor the quotas, leftovers by largest fraction
    #[default]
    LargestRemainder,
    /// Divisor method with the given divisor
    HighestAverages(Divisor),
}

impl RoundingMethod {
    /// Distributes `n` units over `size`.
    pub fn apply<K: EntityKey>(
        &self,
        size: &SizeMapping<K>,
        n: u64,
    ) -> ApportionResult<Allocation<K>> {
        match self {
            RoundingMethod::LargestRemainder => largest_remainder(size, n),
            RoundingMethod::HighestAverages(divisor) => highest_average(size, n, *divisor),
        }
    }

    /// Resolves a serialised method selector, validating the divisor name.
    pub fn from_spec(spec: &MethodSpec) -> ApportionResult<Self> {
        match spec {
            MethodSpec::LargestRemainder => Ok(RoundingMethod::LargestRemainder),
            MethodSpec::HighestAverages { divisor } => {
                Ok(RoundingMethod::HighestAverages(divisor.parse()?))
            }
        }
    }

    /// Whether raising `n` can never lower an entity's units.
    pub fn is_house_monotone(&self) -> bool {
        matches!(self, RoundingMethod::HighestAverages(_))
    }
}

impl From<Divisor> for RoundingMethod {
    fn from(divisor: Divisor) -> Self {
        RoundingMethod::HighestAverages(divisor)
    }
}

impl fmt::Display for RoundingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMethod::LargestRemainder => write!(f, "largest-remainder"),
            RoundingMethod::HighestAverages(divisor) => write!(f, "highest-averages({divisor})"),
        }
    }
}
