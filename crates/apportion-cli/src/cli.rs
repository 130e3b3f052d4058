//! Command-line surface of the `apportion` binary.

use crate::input::{parse_count_pair, parse_size_pair};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Apportion a whole number of units among weighted entities
#[derive(Parser, Debug)]
#[command(name = "apportion", version)]
#[command(about = "Apportion a whole number of units among weighted entities")]
pub struct Cli {
    /// Configuration file; ./apportion.toml is used when present
    #[arg(long, global = true, env = "APPORTION_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Allocate units under optional capacities and a common floor
    Allocate(AllocateArgs),
    /// Highest-averages allocation with per-entity lower and upper bounds
    Bounded(BoundedArgs),
    /// Print the divisor sequences for the first few unit counts
    Divisors(DivisorsArgs),
}

#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Read a JSON or TOML request instead of --size/--total flags
    #[arg(long, conflicts_with_all = ["sizes", "total", "units", "initial"])]
    pub input: Option<PathBuf>,

    /// Entity size as KEY=VALUE; repeat once per entity, in order
    #[arg(long = "size", value_name = "KEY=VALUE", value_parser = parse_size_pair)]
    pub sizes: Vec<(String, f64)>,

    /// Number of units to distribute
    #[arg(long, allow_negative_numbers = true, required_unless_present = "input")]
    pub total: Option<i64>,

    /// Capacity as KEY=UNITS; when given, every entity needs one
    #[arg(long = "cap", value_name = "KEY=UNITS", value_parser = parse_count_pair)]
    pub units: Vec<(String, i64)>,

    /// Floor given to every entity before rounding
    #[arg(long, allow_negative_numbers = true)]
    pub initial: Option<i64>,

    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Divisor name; implies --method highest-averages
    #[arg(long)]
    pub divisor: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug)]
pub struct BoundedArgs {
    #[arg(long = "size", value_name = "KEY=VALUE", value_parser = parse_size_pair, required = true)]
    pub sizes: Vec<(String, f64)>,

    #[arg(long, allow_negative_numbers = true)]
    pub total: i64,

    /// Per-entity floor as KEY=UNITS; unlisted entities get 0
    #[arg(long, value_name = "KEY=UNITS", value_parser = parse_count_pair)]
    pub lower: Vec<(String, i64)>,

    /// Per-entity ceiling as KEY=UNITS; unlisted entities are unbounded
    #[arg(long, value_name = "KEY=UNITS", value_parser = parse_count_pair)]
    pub upper: Vec<(String, i64)>,

    #[arg(long)]
    pub divisor: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Debug)]
pub struct DivisorsArgs {
    /// Largest unit count to tabulate
    #[arg(long, default_value_t = 5)]
    pub upto: u64,
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MethodArg {
    #[default]
    LargestRemainder,
    HighestAverages,
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}
