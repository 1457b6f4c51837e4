use anyhow::{Context, Result, bail};
use std::path::Path;

use super::{DEFAULT_WEIGHT, Rule};

/// Prefixes that mark a keyword-file line as a comment
const COMMENT_PREFIXES: [&str; 3] = ["#", "//", ";"];

/// Load rules from a keyword file
///
/// One keyword per line, optionally followed by `= weight`. Blank lines and
/// lines starting with `#`, `//` or `;` are ignored.
///
/// ```text
/// # authentication
/// failed password = 4
/// sudo
/// ```
pub fn load_keyword_file(path: &Path) -> Result<Vec<Rule>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keyword file: {}", path.display()))?;

    let rules = parse_keywords(&content)
        .with_context(|| format!("Invalid keyword file: {}", path.display()))?;

    tracing::debug!("Loaded {} rules from {}", rules.len(), path.display());
    Ok(rules)
}

/// Parse keyword-file content into an ordered rule list
pub fn parse_keywords(content: &str) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || COMMENT_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        let (keyword, weight) = match line.split_once('=') {
            Some((keyword, weight)) => {
                let weight = parse_weight(weight.trim())
                    .with_context(|| format!("line {}: '{}'", index + 1, line))?;
                (keyword.trim(), weight)
            }
            None => (line, DEFAULT_WEIGHT),
        };

        if keyword.is_empty() {
            bail!("line {}: missing keyword before '='", index + 1);
        }

        push_rule(&mut rules, Rule::new(keyword, weight));
    }

    Ok(rules)
}

/// Build default-weight rules from an inline keyword list
pub fn rules_from_keywords<I, S>(keywords: I) -> Vec<Rule>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rules = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        if !keyword.is_empty() {
            push_rule(&mut rules, Rule::keyword(keyword));
        }
    }
    rules
}

/// Append a rule, keeping keywords unique
///
/// A repeated keyword stays at its first position and takes the newer weight.
pub fn push_rule(rules: &mut Vec<Rule>, rule: Rule) {
    match rules.iter_mut().find(|r| r.keyword == rule.keyword) {
        Some(existing) => {
            tracing::debug!(
                "Keyword '{}' redefined, weight {} -> {}",
                rule.keyword,
                existing.weight,
                rule.weight
            );
            existing.weight = rule.weight;
        }
        None => rules.push(rule),
    }
}

fn parse_weight(raw: &str) -> Result<u32> {
    let weight: u32 = raw
        .parse()
        .with_context(|| format!("weight '{raw}' is not a positive integer"))?;
    if weight == 0 {
        bail!("weight must be at least 1");
    }
    Ok(weight)
}
