//! Explain command: shows how a rule will be expanded.

use std::io::Write;

use anyhow::{Context, Result};
use cadence_rfc::rfc::rrule::parse_rule;
use clap::Args;

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// Recurrence rule, e.g. `FREQ=YEARLY;BYMONTH=3;BYDAY=TH`.
    pub rule: String,
}

/// ## Summary
/// Writes the canonical rule followed by one `FIELD -> kind` line per
/// pipeline operator.
///
/// ## Errors
/// Returns an error if the rule does not parse or validate, or writing fails.
pub fn run<W: Write>(writer: &mut W, args: &ExplainArgs) -> Result<()> {
    let rule = parse_rule(&args.rule).with_context(|| format!("invalid rule '{}'", args.rule))?;

    writeln!(writer, "{rule}")?;
    for (field, kind) in rule.plan() {
        writeln!(writer, "{field} -> {kind}")?;
    }
    if !rule.by_set_pos().is_empty() {
        writeln!(writer, "BYSETPOS -> ignored")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(rule: &str) -> Result<String> {
        let mut output = Vec::new();
        run(
            &mut output,
            &ExplainArgs {
                rule: rule.to_string(),
            },
        )?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test_log::test]
    fn prints_canonical_rule_and_plan() {
        let output = render("byday=th;freq=yearly;bymonth=3;byhour=9").unwrap();
        assert_eq!(
            output,
            "FREQ=YEARLY;BYHOUR=9;BYDAY=TH;BYMONTH=3\n\
             BYHOUR -> transformer\n\
             BYDAY -> transformer\n\
             BYMONTH -> transformer\n"
        );
    }

    #[test]
    fn filters_are_labelled() {
        let output = render("FREQ=DAILY;BYMONTH=1").unwrap();
        assert_eq!(output, "FREQ=DAILY;BYMONTH=1\nBYMONTH -> filter\n");
    }

    #[test]
    fn set_positions_are_flagged() {
        let output = render("FREQ=MONTHLY;BYDAY=MO;BYSETPOS=-1").unwrap();
        assert!(output.ends_with("BYSETPOS -> ignored\n"));
    }

    #[test]
    fn malformed_rule_fails() {
        assert!(render("FREQ=FORTNIGHTLY").is_err());
    }
}
