use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity sizes (populations, votes, weights) in caller order.
///
/// The iteration order is significant: both rounding methods break exact
/// ties in favour of the entity that comes first.
pub type SizeMapping<K> = IndexMap<K, f64>;

/// Per-entity ceilings on the number of units an entity may receive.
pub type CapacityMapping<K> = IndexMap<K, u64>;

/// Integer units awarded to each entity, in the key order of the sizes.
pub type Allocation<K> = IndexMap<K, u64>;

/// Divisor used by highest-averages when a request does not name one.
pub const DEFAULT_DIVISOR: &str = "d'hondt";

fn default_divisor() -> String {
    DEFAULT_DIVISOR.to_string()
}

/// Rounding method selected by a request or configuration file.
///
/// The divisor is carried by name; the engine resolves it against its
/// catalog and rejects unknown names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MethodSpec {
    /// Hamilton / Hare: floor the quotas, hand out the leftovers by remainder.
    #[default]
    LargestRemainder,
    /// Divisor method: award units one at a time by highest quotient.
    HighestAverages {
        /// Case-insensitive divisor name, e.g. `"webster"`.
        #[serde(default = "default_divisor")]
        divisor: String,
    },
}

impl MethodSpec {
    /// Highest-averages with the given divisor name.
    pub fn highest_averages(divisor: impl Into<String>) -> Self {
        MethodSpec::HighestAverages { divisor: divisor.into() }
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodSpec::LargestRemainder => write!(f, "largest-remainder"),
            MethodSpec::HighestAverages { divisor } => write!(f, "highest-averages({divisor})"),
        }
    }
}

/// A complete apportionment problem as read from JSON or TOML.
///
/// Integer fields are signed so that negative values coming from outside
/// can be reported as invalid arguments instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApportionRequest {
    /// Entity sizes in the order ties should be broken.
    pub sizes: IndexMap<String, f64>,
    /// Number of units to distribute.
    pub total: i64,
    /// Optional per-entity ceilings; must cover exactly the keys of `sizes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<IndexMap<String, i64>>,
    /// Units every entity receives before any rounding takes place.
    #[serde(default)]
    pub initial: i64,
    /// Rounding method applied on every redistribution round.
    #[serde(default)]
    pub method: MethodSpec,
}

/// Result envelope written back by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApportionResponse {
    /// Human-readable label of the method that produced the allocation.
    pub method: String,
    /// Units distributed; always equal to the allocation's sum.
    pub total: u64,
    /// Units per entity, in request order.
    pub allocation: Allocation<String>,
}

impl ApportionResponse {
    /// Wraps an allocation, recomputing the total from its values.
    pub fn new(method: impl Into<String>, allocation: Allocation<String>) -> Self {
        let total = allocation.values().sum();
        Self { method: method.into(), total, allocation }
    }
}
