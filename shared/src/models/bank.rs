//! Bookkeeping models. Not used by any cost computation.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An imported bank transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankStatement {
    pub statement_id: i64,
    pub txn_date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub reference: Option<String>,
    pub category: Option<String>,
    pub imported_at: NaiveDateTime,
}

/// Pattern-based categorization rule for bank transactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankRule {
    pub rule_id: i64,
    pub pattern: String,
    pub category: String,
    pub priority: i64,
}

impl BankRule {
    /// Case-insensitive substring match against a transaction description
    pub fn matches(&self, description: &str) -> bool {
        !self.pattern.is_empty()
            && description
                .to_lowercase()
                .contains(&self.pattern.to_lowercase())
    }
}

/// Pick the category of the highest-priority matching rule.
/// Ties on priority go to the rule created first.
pub fn categorize<'a>(description: &str, rules: &'a [BankRule]) -> Option<&'a str> {
    rules
        .iter()
        .filter(|r| r.matches(description))
        .min_by_key(|r| (std::cmp::Reverse(r.priority), r.rule_id))
        .map(|r| r.category.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(rule_id: i64, pattern: &str, category: &str, priority: i64) -> BankRule {
        BankRule {
            rule_id,
            pattern: pattern.to_string(),
            category: category.to_string(),
            priority,
        }
    }

    #[test]
    fn test_rule_matches_ignoring_case() {
        let r = rule(1, "ChemTan", "chemicals", 0);
        assert!(r.matches("PAYMENT CHEMTAN SUPPLY INV 42"));
        assert!(!r.matches("Payroll March"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert!(!rule(1, "", "misc", 10).matches("anything"));
    }

    #[test]
    fn test_categorize_prefers_higher_priority() {
        let rules = vec![
            rule(1, "supply", "general", 1),
            rule(2, "chemtan", "chemicals", 5),
        ];
        assert_eq!(categorize("ChemTan Supply", &rules), Some("chemicals"));
    }

    #[test]
    fn test_categorize_tie_goes_to_oldest_rule() {
        let rules = vec![rule(7, "hide", "later", 1), rule(3, "hide", "earlier", 1)];
        assert_eq!(categorize("Hide purchase", &rules), Some("earlier"));
    }

    #[test]
    fn test_categorize_without_match() {
        let rules = vec![rule(1, "fuel", "transport", 1)];
        assert_eq!(categorize("Office rent", &rules), None);
    }
}
