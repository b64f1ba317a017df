use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;
use tracing::debug;

use crate::categorizer::Categorizer;
use crate::error::Result;
use crate::fmt::{money, signed_money};
use crate::importer::{parse_file, ColumnMap};
use crate::models::{FinancialSummary, Insight};
use crate::reports::{aggregate, insights, ranked_categories};
use crate::settings::{load_settings, resolve_input, RulesSource};

/// Shape of `report --json`: the summary fields plus the insight list.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    summary: &'a FinancialSummary,
    insights: &'a [Insight],
}

pub fn run(file: Option<&str>, rules: Option<&str>, json: bool) -> Result<()> {
    let settings = load_settings();
    let input = resolve_input(file, &settings)?;
    let source = RulesSource::resolve(rules, &settings);
    let categorizer = Categorizer::new(source.load()?);
    debug!("Using {} rules", source.describe());

    if json {
        let imported = parse_file(&input, &settings.columns)?;
        let categorized = categorizer.categorize_all(imported.transactions);
        let summary = aggregate(&categorized, categorizer.default_category());
        let insights = insights(&categorized);
        let report = JsonReport {
            summary: &summary,
            insights: &insights,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\nfinsort - Starting...\n");

    println!("Step 1/4: Parsing transactions from CSV...");
    let imported = parse_file(&input, &settings.columns)?;
    if imported.skipped > 0 {
        println!(
            "  \u{2713} Loaded {} transactions ({} invalid rows skipped)\n",
            imported.transactions.len(),
            imported.skipped
        );
    } else {
        println!("  \u{2713} Loaded {} transactions\n", imported.transactions.len());
    }

    if imported.transactions.is_empty() {
        println!("No transactions found in CSV file. Exiting.");
        return Ok(());
    }

    println!("Step 2/4: Categorizing transactions...");
    let categorized = categorizer.categorize_all(imported.transactions);
    println!("  \u{2713} Categorized {} transactions\n", categorized.len());

    println!("Step 3/4: Computing financial statistics...");
    let summary = aggregate(&categorized, categorizer.default_category());
    let insights = insights(&categorized);
    println!("  \u{2713} Computed statistics\n");

    println!("Step 4/4: Generating report...");
    println!("{}", format_summary(&summary, &insights));
    println!("\u{2713} Report generated successfully!\n");
    Ok(())
}

/// Explains the expected CSV layout after a missing file or column.
pub fn layout_hint(input: Option<&Path>, columns: &ColumnMap) -> String {
    let mut out = String::new();
    if let Some(path) = input {
        out.push_str(&format!(
            "Please ensure your CSV file is located at: {}\n",
            path.display()
        ));
    }
    out.push_str("The CSV needs a header row with these columns:\n");
    for name in [&columns.date, &columns.description, &columns.debit, &columns.credit] {
        out.push_str(&format!("  - {name}\n"));
    }
    out.push_str("Other columns are ignored.");
    out
}

// ---------------------------------------------------------------------------
// Pure formatting (summary → String)
// ---------------------------------------------------------------------------

fn section(title: &str) -> String {
    format!("\n----- {title} -----\n")
}

pub fn format_summary(summary: &FinancialSummary, insights: &[Insight]) -> String {
    let mut out = format!("\n{}\n", "===== FINANCE REPORT =====".bold());

    let mut totals = Table::new();
    totals.set_header(vec!["Item", "Amount"]);
    totals.add_row(vec![
        Cell::new("Total Income"),
        Cell::new(money(summary.total_income)),
    ]);
    totals.add_row(vec![
        Cell::new("Total Expenses"),
        Cell::new(money(summary.total_expenses)),
    ]);
    let net = if summary.net_change >= 0.0 {
        money(summary.net_change).green().bold()
    } else {
        money(summary.net_change).red().bold()
    };
    totals.add_row(vec![Cell::new("Net Change".bold()), Cell::new(net)]);
    totals.add_row(vec![
        Cell::new("Total Transactions"),
        Cell::new(summary.transaction_count),
    ]);
    out.push_str(&totals.to_string());

    out.push_str(&section("Spending by Category"));
    if summary.spending_by_category.is_empty() {
        out.push_str("No spending data available.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Amount"]);
        for item in ranked_categories(summary) {
            table.add_row(vec![Cell::new(&item.name), Cell::new(money(item.total))]);
        }
        out.push_str(&table.to_string());
    }

    out.push_str(&section("Largest Expense"));
    match &summary.largest_expense {
        Some(largest) => out.push_str(&format!(
            "{} \u{2014} {}",
            largest.description,
            money(largest.amount).red()
        )),
        None => out.push_str("No expenses found."),
    }

    out.push_str(&section("Uncategorized Transactions"));
    if summary.uncategorized_transactions.is_empty() {
        out.push_str(&"All transactions categorized successfully!".green().to_string());
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Date", "Description", "Amount"]);
        for t in &summary.uncategorized_transactions {
            let amt = if t.amount > 0.0 {
                signed_money(t.amount).green().to_string()
            } else {
                signed_money(t.amount).red().to_string()
            };
            table.add_row(vec![
                Cell::new(&t.date),
                Cell::new(&t.description),
                Cell::new(amt),
            ]);
        }
        out.push_str(&format!(
            "{} transactions need a rule\n{table}",
            summary.uncategorized_transactions.len()
        ));
    }

    if !insights.is_empty() {
        out.push_str(&section("Insights"));
        for insight in insights {
            out.push_str(&format!("* {}\n", format_insight(insight)));
        }
    }
    out.push('\n');
    out
}

fn format_insight(insight: &Insight) -> String {
    match insight {
        Insight::Recurring { count, total } => format!(
            "{count} recurring charges detected totaling {}/month",
            money(*total)
        ),
        Insight::TopCategories { categories } => {
            let mut line = String::new();
            if let Some(top) = categories.first() {
                line.push_str(&format!(
                    "Your top spending category is {} at {}",
                    top.name,
                    money(top.total)
                ));
            }
            if categories.len() > 1 {
                let rest: Vec<String> = categories[1..]
                    .iter()
                    .map(|c| format!("{} {}", c.name, money(c.total)))
                    .collect();
                line.push_str(&format!(" (then {})", rest.join(", ")));
            }
            line
        }
        Insight::SmallPurchases { count, total } => format!(
            "{count} small purchases under $10 add up to {}. Consider bundling trips",
            money(*total)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryTotal, LargestExpense, Transaction};

    fn sample() -> FinancialSummary {
        FinancialSummary {
            total_income: 500.0,
            total_expenses: 1262.5,
            net_change: -762.5,
            spending_by_category: vec![
                CategoryTotal { name: "Food".to_string(), total: 12.5 },
                CategoryTotal { name: "Rent".to_string(), total: 1250.0 },
                CategoryTotal { name: "Uncategorized".to_string(), total: 500.0 },
            ],
            largest_expense: Some(LargestExpense {
                description: "TRAILS APARTMENTS".to_string(),
                amount: 1250.0,
            }),
            transaction_count: 3,
            uncategorized_transactions: vec![Transaction::new("2024-01-02", "MOBILE DEP", 500.0)],
        }
    }

    #[test]
    fn test_format_summary_sections() {
        let out = format_summary(&sample(), &[]);
        assert!(out.contains("FINANCE REPORT"));
        assert!(out.contains("Total Income"));
        assert!(out.contains("$500.00"));
        assert!(out.contains("$1,262.50"));
        assert!(out.contains("-$762.50"));
        assert!(out.contains("TRAILS APARTMENTS"));
        assert!(out.contains("$1,250.00"));
        assert!(out.contains("MOBILE DEP"));
        assert!(out.contains("+$500.00"));
    }

    #[test]
    fn test_format_summary_orders_categories_by_amount() {
        let out = format_summary(&sample(), &[]);
        let rent = out.find("Rent").unwrap();
        let uncat = out.find("Uncategorized").unwrap();
        let food = out.find("Food").unwrap();
        assert!(rent < uncat && uncat < food);
    }

    #[test]
    fn test_format_empty_summary() {
        let out = format_summary(&FinancialSummary::default(), &[]);
        assert!(out.contains("No spending data available."));
        assert!(out.contains("No expenses found."));
        assert!(out.contains("All transactions categorized successfully!"));
        assert!(!out.contains("Insights"));
    }

    #[test]
    fn test_format_summary_lists_insights() {
        let insights = vec![
            Insight::Recurring { count: 2, total: 35.48 },
            Insight::TopCategories {
                categories: vec![
                    CategoryTotal { name: "Rent".to_string(), total: 1250.0 },
                    CategoryTotal { name: "Food".to_string(), total: 12.5 },
                ],
            },
            Insight::SmallPurchases { count: 6, total: 31.5 },
        ];
        let out = format_summary(&sample(), &insights);
        let section = out.find("----- Insights -----").unwrap();
        assert!(section > out.find("Uncategorized Transactions").unwrap());
        assert!(out.contains("2 recurring charges detected totaling $35.48/month"));
        assert!(out.contains("Your top spending category is Rent at $1,250.00 (then Food $12.50)"));
        assert!(out.contains("6 small purchases under $10 add up to $31.50"));
    }

    #[test]
    fn test_layout_hint_lists_columns() {
        let hint = layout_hint(Some(Path::new("data/transactions.csv")), &ColumnMap::default());
        assert!(hint.contains("data/transactions.csv"));
        assert!(hint.contains("  - Transaction Date"));
        assert!(hint.contains("  - Credit"));
    }
}
