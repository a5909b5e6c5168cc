use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Direction of money flow for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub wallet_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Amount with the sign of its direction.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(needle))
            || self.category.to_lowercase().contains(needle)
    }
}

/// Case-insensitive search over title, description and category.
/// A blank query keeps every transaction.
pub fn search<'a>(transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return transactions.iter().collect();
    }

    transactions
        .iter()
        .filter(|transaction| transaction.matches(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransactionTotals {
    pub net_balance: f64,
    pub month_expenses: f64,
    pub month_income: f64,
}

/// Net balance over all transactions plus income and expenses of the month
/// containing `now`. Months are taken in the time zone of `now`, so callers
/// pass local time. Transactions without a timestamp count only toward the
/// net balance.
pub fn totals<Tz: TimeZone>(
    transactions: &[Transaction],
    now: DateTime<Tz>,
) -> TransactionTotals {
    let zone = now.timezone();
    transactions
        .iter()
        .fold(TransactionTotals::default(), |mut acc, transaction| {
            acc.net_balance += transaction.signed_amount();

            let in_month = transaction.created_at.is_some_and(|at| {
                let at = at.with_timezone(&zone);
                at.year() == now.year() && at.month() == now.month()
            });
            if in_month {
                match transaction.kind {
                    TransactionKind::Income => acc.month_income += transaction.amount,
                    TransactionKind::Expense => acc.month_expenses += transaction.amount,
                }
            }

            acc
        })
}
