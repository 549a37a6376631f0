//! Expand command: prints the occurrences of a rule.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use cadence_core::config::Settings;
use cadence_core::error::{CoreError, CoreResult};
use cadence_rfc::rfc::rrule::core::localize;
use cadence_rfc::rfc::rrule::{ExpansionOptions, parse_rule};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use clap::Args;

#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Recurrence rule, e.g. `FREQ=WEEKLY;BYDAY=MO,FR`.
    pub rule: String,

    /// Local start time (`YYYY-MM-DDTHH:MM:SS`), the first possible occurrence.
    #[arg(long)]
    pub start: NaiveDateTime,

    /// IANA time zone of the start time. Defaults to `expansion.timezone`.
    #[arg(long)]
    pub tz: Option<String>,

    /// Maximum number of occurrences to print. Defaults to `expansion.default_limit`.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print a JSON array instead of one occurrence per line.
    #[arg(long)]
    pub json: bool,
}

/// ## Summary
/// Resolves an IANA time zone name such as `Europe/Berlin`.
///
/// ## Errors
/// Returns `CoreError::ConfigError` for unknown names.
pub fn resolve_timezone(name: &str) -> CoreResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| CoreError::ConfigError(format!("unknown time zone '{name}': {e}")))
}

/// ## Summary
/// Writes the first occurrences of `args.rule` from `args.start`, bounded by
/// `--limit` or `expansion.default_limit`.
///
/// ## Errors
/// Returns an error if the rule does not parse or validate, the time zone is
/// unknown, the expansion settings are invalid, or writing fails.
pub fn run<W: Write>(writer: &mut W, args: &ExpandArgs, settings: &Settings) -> Result<()> {
    let rule = parse_rule(&args.rule).with_context(|| format!("invalid rule '{}'", args.rule))?;
    let tz_name = args.tz.as_deref().unwrap_or(&settings.expansion.timezone);
    let tz = resolve_timezone(tz_name)?;
    let start = localize(&tz, args.start)
        .ok_or_else(|| anyhow!("start {} cannot be placed in {tz_name}", args.start))?;
    let options = ExpansionOptions::from_config(&settings.expansion)?;
    let limit = args.limit.unwrap_or(settings.expansion.default_limit);

    let occurrences: Vec<String> = rule
        .next_entries_with(start, options)
        .take(limit)
        .map(|dt| dt.to_rfc3339())
        .collect();
    tracing::debug!(rule = %rule, count = occurrences.len(), limit, "Expanded rule");

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&occurrences)?)?;
    } else {
        for occurrence in &occurrences {
            writeln!(writer, "{occurrence}")?;
        }
    }
    Ok(())
}
