use serde::Serialize;

/// One normalized ledger entry. Negative amounts leave the account, positive
/// amounts enter it; the importer never produces a zero amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

/// A transaction paired with the category the rules assigned to it.
/// Kept in row order so identical rows stay distinct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedTransaction {
    pub transaction: Transaction,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargestExpense {
    pub description: String,
    pub amount: f64,
}

/// Aggregate statistics for one ledger, handed to the report formatters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_change: f64,
    /// Absolute amounts per category, in the order categories were first seen.
    pub spending_by_category: Vec<CategoryTotal>,
    pub largest_expense: Option<LargestExpense>,
    pub transaction_count: usize,
    pub uncategorized_transactions: Vec<Transaction>,
}

#[cfg(test)]
impl FinancialSummary {
    pub fn category_total(&self, name: &str) -> Option<f64> {
        self.spending_by_category
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.total)
    }
}

/// Spending observations drawn from the categorized ledger, in the order the
/// report lists them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    /// Expenses whose description names a known subscription service.
    Recurring { count: usize, total: f64 },
    /// Up to three categories with the most spending, largest first.
    TopCategories { categories: Vec<CategoryTotal> },
    /// Many small expenses that add up.
    SmallPurchases { count: usize, total: f64 },
}
