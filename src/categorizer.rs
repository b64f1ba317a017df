use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FinsortError, Result};
use crate::models::{CategorizedTransaction, Transaction};

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered keyword rules. Categories are tried in declaration order, and the
/// keywords inside a category in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default = "default_category")]
    pub default_category: String,
    pub categories: Vec<CategoryRule>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn rule(name: &str, keywords: &[&str]) -> CategoryRule {
    CategoryRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            categories: vec![
                rule("Rent", &["TRAILS", "APARTMENT", "PROPERTY", "RENT"]),
                rule("Utilities", &["ELECTRIC", "WATER", "INTERNET", "GAS", "UTILITY"]),
                rule(
                    "Food",
                    &["KROGER", "WALMART", "CHICK", "MCDONALD", "RESTAURANT", "CAFE", "GROCERY"],
                ),
                rule(
                    "Subscriptions",
                    &["OPENAI", "NETFLIX", "SPOTIFY", "SUBSCRIPTION", "MEMBERSHIP"],
                ),
                rule("Transfers", &["VENMO", "ZELLE", "TRANSFER", "XFER"]),
                rule(
                    "Income",
                    &["EB FROM CHECKING", "PAYROLL", "DEPOSIT", "SALARY", "EARNINGS"],
                ),
            ],
        }
    }
}

impl RuleTable {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FinsortError::Rules(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let table: RuleTable = serde_json::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        let default_category = self.default_category.trim();
        if default_category.is_empty() {
            return Err(FinsortError::Rules("default_category is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(FinsortError::Rules("category with an empty name".to_string()));
            }
            if !seen.insert(name) {
                return Err(FinsortError::Rules(format!("duplicate category '{name}'")));
            }
            if name == default_category {
                return Err(FinsortError::Rules(format!(
                    "'{name}' is the default category and cannot have keywords"
                )));
            }
            if category.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(FinsortError::Rules(format!(
                    "category '{name}' has an empty keyword"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Categorizer
// ---------------------------------------------------------------------------

pub struct Categorizer {
    /// (trimmed category, uppercased keywords) in table order.
    rules: Vec<(String, Vec<String>)>,
    default_category: String,
}

impl Categorizer {
    pub fn new(table: RuleTable) -> Self {
        let rules = table
            .categories
            .into_iter()
            .map(|c| {
                let keywords: Vec<String> = c.keywords.iter().map(|k| k.to_uppercase()).collect();
                (c.name.trim().to_string(), keywords)
            })
            .collect();
        Self {
            rules,
            default_category: table.default_category.trim().to_string(),
        }
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// First (category, keyword) pair whose keyword occurs in the description
    /// wins. No scoring, no longest match.
    pub fn categorize(&self, txn: &Transaction) -> &str {
        let desc_upper = txn.description.to_uppercase();
        for (category, keywords) in &self.rules {
            if keywords.iter().any(|k| desc_upper.contains(k.as_str())) {
                return category;
            }
        }
        &self.default_category
    }

    pub fn categorize_all(&self, transactions: Vec<Transaction>) -> Vec<CategorizedTransaction> {
        transactions
            .into_iter()
            .map(|transaction| {
                let category = self.categorize(&transaction).to_string();
                CategorizedTransaction {
                    transaction,
                    category,
                }
            })
            .collect()
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(RuleTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(description: &str) -> Transaction {
        Transaction::new("2024-01-01", description, -10.0)
    }

    fn table(rules: &[(&str, &[&str])]) -> RuleTable {
        RuleTable {
            default_category: DEFAULT_CATEGORY.to_string(),
            categories: rules.iter().map(|(n, k)| rule(n, k)).collect(),
        }
    }

    #[test]
    fn test_builtin_rules() {
        let c = Categorizer::default();
        assert_eq!(c.categorize(&txn("KROGER #5")), "Food");
        assert_eq!(c.categorize(&txn("TRAILS AT NORTH PT")), "Rent");
        assert_eq!(c.categorize(&txn("NETFLIX.COM")), "Subscriptions");
        assert_eq!(c.categorize(&txn("ZELLE TO JANE")), "Transfers");
        assert_eq!(c.categorize(&txn("ACME PAYROLL PPD")), "Income");
        assert_eq!(c.categorize(&txn("CITY WATER DEPT")), "Utilities");
    }

    #[test]
    fn test_matching_ignores_case() {
        let c = Categorizer::default();
        assert_eq!(c.categorize(&txn("kroger store 12")), "Food");
        let c = Categorizer::new(table(&[("Coffee", &["starbucks"])]));
        assert_eq!(c.categorize(&txn("STARBUCKS 0042")), "Coffee");
    }

    #[test]
    fn test_first_category_wins_over_longer_keyword() {
        let c = Categorizer::new(table(&[("A", &["FOO"]), ("B", &["FOOBAR"])]));
        assert_eq!(c.categorize(&txn("FOOBAR STORE")), "A");
    }

    #[test]
    fn test_category_order_beats_keyword_position() {
        // "GAS" sits in Utilities, which is declared before Food.
        let c = Categorizer::default();
        assert_eq!(c.categorize(&txn("WALMART GAS STATION")), "Utilities");
    }

    #[test]
    fn test_fallback_to_default() {
        let c = Categorizer::default();
        assert_eq!(c.categorize(&txn("MYSTERY VENDOR")), DEFAULT_CATEGORY);
        assert_eq!(c.categorize(&txn("")), DEFAULT_CATEGORY);

        let mut custom = table(&[("Food", &["KROGER"])]);
        custom.default_category = "Other".to_string();
        let c = Categorizer::new(custom);
        assert_eq!(c.categorize(&txn("MYSTERY VENDOR")), "Other");
        assert_eq!(c.default_category(), "Other");
    }

    #[test]
    fn test_categorize_is_deterministic() {
        let c = Categorizer::default();
        let t = txn("SPOTIFY USA");
        assert_eq!(c.categorize(&t), c.categorize(&t));
    }

    #[test]
    fn test_categorize_all_keeps_duplicates_in_order() {
        let c = Categorizer::default();
        let result = c.categorize_all(vec![txn("KROGER"), txn("KROGER"), txn("UNKNOWN")]);
        assert_eq!(result.len(), 3);
        let cats: Vec<&str> = result.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, vec!["Food", "Food", DEFAULT_CATEGORY]);
        assert_eq!(result[0].transaction, result[1].transaction);
    }

    #[test]
    fn test_categorize_all_empty() {
        assert!(Categorizer::default().categorize_all(Vec::new()).is_empty());
    }

    #[test]
    fn test_rule_table_from_json_keeps_order() {
        let json = r#"{
            "categories": [
                {"name": "Zoo", "keywords": ["ZOO"]},
                {"name": "Alpha", "keywords": ["ZOO TICKETS"]}
            ]
        }"#;
        let t = RuleTable::from_json(json).unwrap();
        assert_eq!(t.default_category, DEFAULT_CATEGORY);
        assert_eq!(t.categories[0].name, "Zoo");
        let c = Categorizer::new(t);
        assert_eq!(c.categorize(&txn("ZOO TICKETS")), "Zoo");
    }

    #[test]
    fn test_rule_table_rejects_bad_input() {
        let dup = r#"{"categories": [{"name": "A", "keywords": ["X"]}, {"name": "A", "keywords": ["Y"]}]}"#;
        assert!(matches!(RuleTable::from_json(dup), Err(FinsortError::Rules(_))));

        let empty_kw = r#"{"categories": [{"name": "A", "keywords": [" "]}]}"#;
        assert!(matches!(RuleTable::from_json(empty_kw), Err(FinsortError::Rules(_))));

        let shadow = r#"{"default_category": "Misc", "categories": [{"name": "Misc", "keywords": ["X"]}]}"#;
        assert!(matches!(RuleTable::from_json(shadow), Err(FinsortError::Rules(_))));

        assert!(matches!(RuleTable::from_json("{"), Err(FinsortError::Json(_))));
    }

    #[test]
    fn test_category_labels_are_trimmed() {
        let json = r#"{"default_category": " Other ", "categories": [{"name": " Food ", "keywords": ["KROGER"]}]}"#;
        let c = Categorizer::new(RuleTable::from_json(json).unwrap());
        assert_eq!(c.categorize(&txn("KROGER #5")), "Food");
        assert_eq!(c.categorize(&txn("MYSTERY")), "Other");
        assert_eq!(c.default_category(), "Other");

        let shadow = r#"{"default_category": " Misc", "categories": [{"name": "Misc ", "keywords": ["X"]}]}"#;
        assert!(matches!(RuleTable::from_json(shadow), Err(FinsortError::Rules(_))));

        let dup = r#"{"categories": [{"name": "Food", "keywords": ["X"]}, {"name": " Food", "keywords": ["Y"]}]}"#;
        assert!(matches!(RuleTable::from_json(dup), Err(FinsortError::Rules(_))));
    }

    #[test]
    fn test_rule_table_json_roundtrip_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, RuleTable::default().to_json().unwrap()).unwrap();
        let loaded = RuleTable::load(&path).unwrap();
        assert_eq!(loaded, RuleTable::default());
    }

    #[test]
    fn test_rule_table_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleTable::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
