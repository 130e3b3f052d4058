//! Library half of the `apportion` binary, split out so commands can be
//! exercised without spawning a process.

pub mod cli;
pub mod config;
pub mod input;
pub mod logging;
pub mod output;

use anyhow::{Result, bail};
use apportion_core::{CapacityMapping, bounded_highest_average, divisor, respond};
use apportion_types::{ApportionRequest, ApportionResponse, MethodSpec};
use cli::{AllocateArgs, BoundedArgs, Cli, Commands, MethodArg};
use config::{ApportionConfig, DefaultsConfig};
use indexmap::IndexMap;
use input::{collect_pairs, read_request};
use output::{render_divisors, render_response};
use tracing::info;

/// Runs the parsed command and returns what should be printed on stdout.
pub fn run(cli: &Cli, config: &ApportionConfig) -> Result<String> {
    match &cli.command {
        Commands::Allocate(args) => {
            let request = allocate_request(args, &config.defaults)?;
            let response = respond(&request)?;
            info!(method = %response.method, total = response.total, "allocation complete");
            render_response(&response, args.format.unwrap_or(config.output.format))
        }
        Commands::Bounded(args) => {
            let response = run_bounded(args, &config.defaults)?;
            info!(method = %response.method, total = response.total, "bounded allocation complete");
            render_response(&response, args.format.unwrap_or(config.output.format))
        }
        Commands::Divisors(args) => Ok(render_divisors(args.upto)),
    }
}

/// Method flags win over the request file, which wins over configured defaults.
fn resolve_method(
    method: Option<MethodArg>,
    divisor: Option<&str>,
    fallback: MethodSpec,
    defaults: &DefaultsConfig,
) -> Result<MethodSpec> {
    match (method, divisor) {
        (Some(MethodArg::LargestRemainder), Some(_)) => {
            bail!("--divisor only applies to --method highest-averages")
        }
        (Some(MethodArg::LargestRemainder), None) => Ok(MethodSpec::LargestRemainder),
        (Some(MethodArg::HighestAverages), divisor) => Ok(MethodSpec::highest_averages(
            divisor.unwrap_or(&defaults.divisor),
        )),
        (None, Some(divisor)) => Ok(MethodSpec::highest_averages(divisor)),
        (None, None) => Ok(fallback),
    }
}

fn default_method(defaults: &DefaultsConfig) -> MethodSpec {
    match defaults.method {
        MethodArg::LargestRemainder => MethodSpec::LargestRemainder,
        MethodArg::HighestAverages => MethodSpec::highest_averages(defaults.divisor.as_str()),
    }
}

pub fn allocate_request(args: &AllocateArgs, defaults: &DefaultsConfig) -> Result<ApportionRequest> {
    let divisor = args.divisor.as_deref();
    if let Some(path) = &args.input {
        let mut request = read_request(path)?;
        let from_file = std::mem::take(&mut request.method);
        request.method = resolve_method(args.method, divisor, from_file, defaults)?;
        return Ok(request);
    }

    let Some(total) = args.total else {
        bail!("--total is required unless --input is given");
    };
    if args.sizes.is_empty() {
        bail!("at least one --size is required unless --input is given");
    }
    let units = if args.units.is_empty() { None } else { Some(collect_pairs(&args.units, "cap")?) };

    Ok(ApportionRequest {
        sizes: collect_pairs(&args.sizes, "size")?,
        total,
        units,
        initial: args.initial.unwrap_or(defaults.initial),
        method: resolve_method(args.method, divisor, default_method(defaults), defaults)?,
    })
}

/// Fills bounds for unlisted entities so every size has one.
fn bounds(
    sizes: &IndexMap<String, f64>,
    pairs: &[(String, i64)],
    flag: &str,
    unlisted: u64,
) -> Result<Option<CapacityMapping<String>>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let given = collect_pairs(pairs, flag)?;
    if let Some(stray) = given.keys().find(|key| !sizes.contains_key(*key)) {
        bail!("--{flag} names '{stray}', which has no --size");
    }
    let mut filled = IndexMap::with_capacity(sizes.len());
    for key in sizes.keys() {
        let value = match given.get(key) {
            Some(&value) => u64::try_from(value)
                .map_err(|_| anyhow::anyhow!("--{flag} for '{key}' must not be negative, got {value}"))?,
            None => unlisted,
        };
        filled.insert(key.clone(), value);
    }
    Ok(Some(filled))
}

pub fn run_bounded(args: &BoundedArgs, defaults: &DefaultsConfig) -> Result<ApportionResponse> {
    let Ok(total) = u64::try_from(args.total) else {
        bail!("total must not be negative, got {}", args.total);
    };
    let sizes = collect_pairs(&args.sizes, "size")?;
    let lower = bounds(&sizes, &args.lower, "lower", 0)?;
    let upper = bounds(&sizes, &args.upper, "upper", total)?;
    let divisor = divisor(args.divisor.as_deref().unwrap_or(&defaults.divisor))?;

    let allocation =
        bounded_highest_average(&sizes, total, lower.as_ref(), upper.as_ref(), divisor)?;
    Ok(ApportionResponse::new(format!("bounded-highest-averages({divisor})"), allocation))
}
