//! Apportion Types
//!
//! This crate defines the data model shared by the apportionment engine
//! (`apportion-core`) and its command-line front end (`apportion-cli`): the
//! ordered entity mappings, the rounding-method selector and the serialisable
//! request/response envelopes. Keeping them here lets the CLI parse requests
//! without pulling the engine's internals into its public surface.

#![deny(missing_docs)]

mod types;
pub use types::{
    Allocation, ApportionRequest, ApportionResponse, CapacityMapping, DEFAULT_DIVISOR,
    MethodSpec, SizeMapping,
};
