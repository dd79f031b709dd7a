//! Rule grammar: an operator (`>`, `<`, `=`) immediately followed by a
//! non-negative decimal, e.g. `>1000`, `=3`, `<5.5`.

use campaign_core::error::RuleFormatError;
use campaign_core::types::{Dimension, Rule, RuleOperator};
use regex::Regex;
use std::sync::OnceLock;

/// Human description of the accepted syntax, carried on every rejection.
pub const EXPECTED_PATTERN: &str =
    "one of >, <, = immediately followed by a number such as 1000 or 5.5";

fn rule_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ASCII digit classes: `\d` would also admit non-ASCII digits.
    PATTERN.get_or_init(|| {
        Regex::new(r"^([><=])([0-9]+(?:\.[0-9]+)?)$").expect("rule pattern compiles")
    })
}

/// Parse an already-trimmed rule string. `None` if it does not match the grammar.
pub fn parse_rule(text: &str) -> Option<Rule> {
    let captures = rule_pattern().captures(text)?;
    let operator = captures
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(RuleOperator::from_symbol)?;
    // Overlong digit runs parse to infinity, which has no textual rule form.
    let magnitude = captures
        .get(2)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite())?;
    Some(Rule::new(operator, magnitude))
}

/// Validate the rule text entered for one dimension.
///
/// Blank input means "no constraint" and yields `Ok(None)`.
pub fn validate(dimension: Dimension, rule_text: &str) -> Result<Option<Rule>, RuleFormatError> {
    let trimmed = rule_text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    parse_rule(trimmed).map(Some).ok_or_else(|| RuleFormatError {
        dimension,
        input: trimmed.to_string(),
        expected: EXPECTED_PATTERN,
    })
}
