use crate::models::{
    CategorizedTransaction, CategoryTotal, FinancialSummary, Insight, LargestExpense,
};

/// Fold categorized transactions into a [`FinancialSummary`] in one pass.
///
/// Anything that is not income counts as an expense, and every transaction
/// (income included) adds its absolute amount to its category total. The
/// largest expense only changes on a strictly greater magnitude, so the first
/// row wins a tie.
pub fn aggregate(categorized: &[CategorizedTransaction], default_category: &str) -> FinancialSummary {
    let mut summary = FinancialSummary::default();

    for CategorizedTransaction {
        transaction,
        category,
    } in categorized
    {
        let magnitude = transaction.amount.abs();

        if transaction.is_income() {
            summary.total_income += transaction.amount;
        } else {
            summary.total_expenses += magnitude;
        }

        match summary
            .spending_by_category
            .iter_mut()
            .find(|c| &c.name == category)
        {
            Some(entry) => entry.total += magnitude,
            None => summary.spending_by_category.push(CategoryTotal {
                name: category.clone(),
                total: magnitude,
            }),
        }

        if transaction.is_expense()
            && summary
                .largest_expense
                .as_ref()
                .map_or(true, |largest| magnitude > largest.amount)
        {
            summary.largest_expense = Some(LargestExpense {
                description: transaction.description.clone(),
                amount: magnitude,
            });
        }

        if category == default_category {
            summary.uncategorized_transactions.push(transaction.clone());
        }

        summary.transaction_count += 1;
    }

    summary.net_change = summary.total_income - summary.total_expenses;
    summary
}

/// Category totals sorted for display: largest first, ties in first-seen order.
pub fn ranked_categories(summary: &FinancialSummary) -> Vec<&CategoryTotal> {
    let mut ranked: Vec<&CategoryTotal> = summary.spending_by_category.iter().collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// Description fragments that mark a charge as a recurring subscription.
const RECURRING_KEYWORDS: &[&str] = &[
    "OPENAI",
    "NETFLIX",
    "SPOTIFY",
    "APPLE",
    "MICROSOFT",
    "BOLT",
    "SUBSCRIPTION",
];

/// Expenses strictly below this magnitude count as small purchases.
const SMALL_PURCHASE_LIMIT: f64 = 10.0;
/// The small-purchase insight needs more than this many of them.
const SMALL_PURCHASE_MIN_COUNT: usize = 5;
const TOP_CATEGORY_COUNT: usize = 3;
/// Never listed among the top spending categories.
const INCOME_CATEGORY: &str = "Income";

/// Derive spending insights from the categorized ledger.
///
/// Only strictly negative amounts count as spending here. Insights come back
/// in a fixed order: recurring charges, top categories, small purchases. Each
/// is omitted when it has nothing to report.
pub fn insights(categorized: &[CategorizedTransaction]) -> Vec<Insight> {
    let mut recurring = (0usize, 0.0f64);
    let mut small = (0usize, 0.0f64);
    let mut by_category: Vec<CategoryTotal> = Vec::new();

    for CategorizedTransaction {
        transaction,
        category,
    } in categorized
    {
        if !transaction.is_expense() {
            continue;
        }
        let magnitude = transaction.amount.abs();

        let desc_upper = transaction.description.to_uppercase();
        if RECURRING_KEYWORDS.iter().any(|k| desc_upper.contains(k)) {
            recurring.0 += 1;
            recurring.1 += magnitude;
        }

        if magnitude < SMALL_PURCHASE_LIMIT {
            small.0 += 1;
            small.1 += magnitude;
        }

        match by_category.iter_mut().find(|c| &c.name == category) {
            Some(entry) => entry.total += magnitude,
            None => by_category.push(CategoryTotal {
                name: category.clone(),
                total: magnitude,
            }),
        }
    }

    let mut found = Vec::new();

    if recurring.0 > 0 {
        found.push(Insight::Recurring {
            count: recurring.0,
            total: recurring.1,
        });
    }

    by_category.retain(|c| c.name != INCOME_CATEGORY);
    by_category.sort_by(|a, b| b.total.total_cmp(&a.total));
    by_category.truncate(TOP_CATEGORY_COUNT);
    if !by_category.is_empty() {
        found.push(Insight::TopCategories {
            categories: by_category,
        });
    }

    if small.0 > SMALL_PURCHASE_MIN_COUNT {
        found.push(Insight::SmallPurchases {
            count: small.0,
            total: small.1,
        });
    }

    found
}
