use regex::{Regex, RegexBuilder};

use super::types::{ScanOptions, Warning, WarningCategory};
use crate::rules::Rule;

/// Keyword whose match is cancelled when the line says "not fatal"
const SUPPRESSIBLE_KEYWORD: &str = "fatal";
const SUPPRESSION_PHRASE: &str = "not fatal";

#[derive(Debug, Clone)]
struct CompiledRule {
    keyword: String,
    weight: u32,
    matcher: Regex,
}

impl CompiledRule {
    fn matches(&self, line: &str) -> bool {
        if !self.matcher.is_match(line) {
            return false;
        }
        !(self.keyword == SUPPRESSIBLE_KEYWORD
            && line.to_lowercase().contains(SUPPRESSION_PHRASE))
    }
}

/// Line scorer with every rule compiled up front
///
/// Built once per scan from the rule list and options. Holds only immutable
/// data, so a single instance is shared by reference across all workers.
#[derive(Debug, Clone)]
pub struct LineScorer {
    rules: Vec<CompiledRule>,
    max_weight: u32,
}

impl LineScorer {
    /// Compile `rules` into word-boundary matchers
    ///
    /// Excluded keywords are dropped here. Rules that cannot be turned into a
    /// matcher are dropped too, with one warning each.
    pub fn new(rules: &[Rule], options: &ScanOptions) -> (Self, Vec<Warning>) {
        let mut compiled = Vec::with_capacity(rules.len());
        let mut warnings = Vec::new();

        for rule in rules {
            if options.is_excluded(&rule.keyword) {
                tracing::debug!("Excluding keyword '{}'", rule.keyword);
                continue;
            }

            match compile(rule, options.ignore_case()) {
                Ok(matcher) => compiled.push(CompiledRule {
                    keyword: rule.keyword.clone(),
                    weight: rule.weight,
                    matcher,
                }),
                Err(reason) => {
                    tracing::warn!("Skipping invalid rule '{}': {}", rule.keyword, reason);
                    warnings.push(Warning::new(
                        WarningCategory::InvalidRule,
                        format!("Invalid rule '{}': {}", rule.keyword, reason),
                    ));
                }
            }
        }

        let scorer = Self {
            rules: compiled,
            max_weight: options.max_weight(),
        };
        (scorer, warnings)
    }

    /// Number of rules that survived exclusion and compilation
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn max_weight(&self) -> u32 {
        self.max_weight
    }

    /// Importance score of `line`, or `None` when nothing matched
    ///
    /// Each rule contributes its weight at most once per line. Evaluation
    /// stops as soon as the running total reaches the cap.
    pub fn score(&self, line: &str) -> Option<u32> {
        let mut total: u32 = 0;

        for rule in &self.rules {
            if !rule.matches(line) {
                continue;
            }
            total = total.saturating_add(rule.weight);
            if total >= self.max_weight {
                total = self.max_weight;
                break;
            }
        }

        (total > 0).then_some(total)
    }
}

/// Score a single line without keeping the compiled scorer around
pub fn score(line: &str, rules: &[Rule], options: &ScanOptions) -> Option<u32> {
    LineScorer::new(rules, options).0.score(line)
}

fn compile(rule: &Rule, ignore_case: bool) -> Result<Regex, String> {
    if rule.keyword.trim().is_empty() {
        return Err("empty keyword".to_string());
    }
    if rule.weight == 0 {
        return Err("weight must be at least 1".to_string());
    }

    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(&rule.keyword)))
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn opts(max_weight: u32) -> ScanOptions {
        ScanOptions::new(false, max_weight, Vec::<String>::new()).unwrap()
    }

    fn error_attack() -> Vec<Rule> {
        vec![Rule::new("error", 2), Rule::new("attack", 5)]
    }

    #[test]
    fn test_single_keyword_match() {
        assert_eq!(score("system error detected", &error_attack(), &opts(10)), Some(2));
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        assert_eq!(score("attack attack attack", &error_attack(), &opts(10)), Some(5));
    }

    #[test]
    fn test_sum_clamped_to_max_weight() {
        let rules = vec![Rule::new("fail", 2), Rule::new("error", 3)];
        assert_eq!(score("fail and error both", &rules, &opts(4)), Some(4));
    }

    #[test]
    fn test_not_fatal_suppresses_fatal() {
        let rules = vec![Rule::new("fatal", 10)];
        assert_eq!(score("this is not fatal at all", &rules, &opts(10)), None);
        assert_eq!(score("NOT FATAL: retrying", &rules, &opts(10)), None);
        assert_eq!(score("fatal: disk gone", &rules, &opts(10)), Some(10));
    }

    #[test]
    fn test_suppression_only_affects_fatal_rule() {
        let rules = vec![Rule::new("fatal", 6), Rule::new("error", 2)];
        assert_eq!(score("error, but not fatal", &rules, &opts(10)), Some(2));
        // Another "fatal" on the line does not undo the suppression
        assert_eq!(score("fatal fatal, then not fatal", &rules, &opts(10)), None);
    }

    #[test]
    fn test_whole_word_only() {
        let rules = vec![Rule::new("error", 2)];
        assert_eq!(score("errors everywhere", &rules, &opts(10)), None);
        assert_eq!(score("no_error_here", &rules, &opts(10)), None);
        assert_eq!(score("[error] at boot", &rules, &opts(10)), Some(2));
        assert_eq!(score("error.", &rules, &opts(10)), Some(2));
    }

    #[test]
    fn test_multi_word_and_special_keywords() {
        let rules = vec![Rule::new("failed password", 4), Rule::new("user.name", 3)];
        assert_eq!(
            score("sshd: Failed password for root", &rules, &opts(10)),
            None
        );
        assert_eq!(score("sshd: failed password for root", &rules, &opts(10)), Some(4));
        assert_eq!(score("pam: user.name changed", &rules, &opts(10)), Some(3));
        // Keywords are matched literally, not as patterns
        assert_eq!(score("pam: userXname changed", &rules, &opts(10)), None);
    }

    #[test]
    fn test_case_sensitivity() {
        let rules = vec![Rule::new("error", 2)];
        assert_eq!(score("ERROR: boom", &rules, &opts(10)), None);

        let insensitive = ScanOptions::new(true, 10, Vec::<String>::new()).unwrap();
        assert_eq!(score("ERROR: boom", &rules, &insensitive), Some(2));
    }

    #[test]
    fn test_excluded_keyword_never_scores() {
        let options = ScanOptions::new(false, 10, ["attack"]).unwrap();
        assert_eq!(score("attack attack", &error_attack(), &options), None);
        assert_eq!(score("attack and error", &error_attack(), &options), Some(2));

        let (scorer, warnings) = LineScorer::new(&error_attack(), &options);
        assert_eq!(scorer.rule_count(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_short_circuit_follows_load_order() {
        // The cap is hit by the first rule, so the second never contributes
        let rules = vec![Rule::new("panic", 9), Rule::new("oops", 1)];
        assert_eq!(score("panic oops", &rules, &opts(3)), Some(3));
        assert_eq!(score("oops", &rules, &opts(3)), Some(1));
    }

    #[test]
    fn test_invalid_rules_are_dropped_with_warning() {
        let rules = vec![Rule::new("", 3), Rule::new("error", 0), Rule::new("attack", 5)];
        let (scorer, warnings) = LineScorer::new(&rules, &opts(10));

        assert_eq!(scorer.rule_count(), 1);
        assert_eq!(warnings.len(), 2);
        assert!(
            warnings
                .iter()
                .all(|w| w.category == WarningCategory::InvalidRule)
        );
        assert_eq!(scorer.score("attack with error"), Some(5));
    }

    #[test]
    fn test_no_rules_never_matches() {
        let (scorer, _) = LineScorer::new(&[], &opts(10));
        assert_eq!(scorer.score("error attack fatal"), None);
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded_and_deterministic(
            line in "[a-z ]{0,60}",
            weights in proptest::collection::vec(1u32..8, 1..6),
            max_weight in 1u32..=10,
        ) {
            let keywords = ["error", "fail", "attack", "fatal", "denied", "root"];
            let rules: Vec<Rule> = weights
                .iter()
                .zip(keywords)
                .map(|(w, k)| Rule::new(k, *w))
                .collect();
            let (scorer, _) = LineScorer::new(&rules, &opts(max_weight));

            let first = scorer.score(&line);
            prop_assert_eq!(first, scorer.score(&line));
            if let Some(s) = first {
                prop_assert!(s >= 1 && s <= max_weight);
            }
        }
    }
}
