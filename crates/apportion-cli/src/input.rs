use anyhow::{Context, Result, bail};
use apportion_types::ApportionRequest;
use indexmap::IndexMap;
use std::path::Path;

fn split_pair(raw: &str) -> Result<(String, &str), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim()))
}

/// Parses `KEY=SIZE`. Sign and finiteness are checked by the engine.
pub fn parse_size_pair(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = split_pair(raw)?;
    let size = value
        .parse::<f64>()
        .map_err(|e| format!("invalid size for '{key}': {e}"))?;
    Ok((key, size))
}

/// Parses `KEY=UNITS`. Negative counts pass through so the engine can name them.
pub fn parse_count_pair(raw: &str) -> Result<(String, i64), String> {
    let (key, value) = split_pair(raw)?;
    let count = value
        .parse::<i64>()
        .map_err(|e| format!("invalid unit count for '{key}': {e}"))?;
    Ok((key, count))
}

/// Collects flag pairs in command-line order, refusing repeated keys.
pub fn collect_pairs<V>(pairs: &[(String, V)], flag: &str) -> Result<IndexMap<String, V>>
where
    V: Copy,
{
    let mut map = IndexMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        if map.insert(key.clone(), *value).is_some() {
            bail!("--{flag} given more than once for '{key}'");
        }
    }
    Ok(map)
}

/// Reads a request file; `.toml` files are TOML, everything else JSON.
pub fn read_request(path: &Path) -> Result<ApportionRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request '{}'", path.display()))?;
    let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    parse_request(&text, is_toml)
        .with_context(|| format!("failed to parse request '{}'", path.display()))
}

pub fn parse_request(text: &str, is_toml: bool) -> Result<ApportionRequest> {
    if is_toml {
        Ok(toml::from_str(text)?)
    } else {
        Ok(serde_json::from_str(text)?)
    }
}
