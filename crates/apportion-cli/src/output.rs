use crate::cli::OutputFormat;
use anyhow::Result;
use apportion_core::Divisor;
use apportion_types::ApportionResponse;

pub fn render_response(response: &ApportionResponse, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Table => Ok(render_table(response)),
    }
}

fn render_table(response: &ApportionResponse) -> String {
    let width = response
        .allocation
        .keys()
        .map(|key| key.chars().count())
        .chain(["total".len()])
        .max()
        .unwrap_or(0);

    let rows = response.allocation.iter().map(|(key, units)| format!("{key:<width$}  {units:>8}"));
    std::iter::once(format!("method: {}", response.method))
        .chain(rows)
        .chain([format!("{:<width$}  {:>8}", "total", response.total)])
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row per divisor with `d(0) .. d(upto)`.
pub fn render_divisors(upto: u64) -> String {
    let header: String = (0..=upto).map(|a| format!(" {:>8}", format!("d({a})"))).collect();
    let rows = Divisor::ALL.iter().map(|divisor| {
        let values: String =
            (0..=upto).map(divisor.function()).map(|value| format!(" {value:>8.4}")).collect();
        format!("{:<16}{values}", divisor.name())
    });
    std::iter::once(format!("{:<16}{header}", "divisor"))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}
