//! Plain-text formatting shared by the TUI and one-shot command output.

use chrono::{DateTime, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{
    transaction::{Transaction, TransactionKind, TransactionTotals},
    wallet::Wallet,
};

const NAME_COLUMN: usize = 24;
const CATEGORY_COLUMN: usize = 14;

/// `$1234.50`, or `-$12.00` for negative values.
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${value:.2}")
    }
}

/// Amount with its direction: `+ $5000.00` for income, `- $4.50` for expense.
pub fn format_signed_amount(transaction: &Transaction) -> String {
    match transaction.kind {
        TransactionKind::Income => format!("+ ${:.2}", transaction.amount),
        TransactionKind::Expense => format!("- ${:.2}", transaction.amount),
    }
}

pub fn format_date(created_at: Option<DateTime<Utc>>) -> String {
    created_at
        .map(|at| at.with_timezone(&Local).format("%d %b %Y").to_string())
        .unwrap_or_else(|| "—".to_owned())
}

/// Pads or truncates `text` to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        let padding = width - text.width();
        return format!("{text}{}", " ".repeat(padding));
    }

    let mut fitted = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        fitted.push(ch);
        used += ch_width;
    }
    fitted.push('…');
    used += 1;

    format!("{fitted}{}", " ".repeat(width.saturating_sub(used)))
}

pub fn wallet_row(wallet: &Wallet) -> String {
    format!(
        "{:>4}  {}  {:<5}  {:>12}",
        wallet.id,
        fit(&wallet.name, NAME_COLUMN),
        wallet.icon(),
        format_money(wallet.balance)
    )
}

pub fn transaction_row(transaction: &Transaction) -> String {
    format!(
        "{:>4}  {}  {}  {:>13}  {}",
        transaction.id,
        fit(&transaction.title, NAME_COLUMN),
        fit(&transaction.category, CATEGORY_COLUMN),
        format_signed_amount(transaction),
        format_date(transaction.created_at)
    )
}

pub fn wallet_lines(wallets: &[Wallet], total: f64) -> Vec<String> {
    if wallets.is_empty() {
        return vec!["No wallets yet.".to_owned()];
    }

    let mut lines: Vec<String> = wallets.iter().map(wallet_row).collect();
    lines.push(format!("Total balance: {}", format_money(total)));
    lines
}

pub fn transaction_lines(transactions: &[Transaction]) -> Vec<String> {
    if transactions.is_empty() {
        return vec!["No transactions found.".to_owned()];
    }

    transactions.iter().map(transaction_row).collect()
}

pub fn totals_line(totals: &TransactionTotals) -> String {
    format!(
        "Net balance {}  |  This month: income {}  expenses {}",
        format_money(totals.net_balance),
        format_money(totals.month_income),
        format_money(totals.month_expenses)
    )
}

pub fn transaction_detail_lines(transaction: &Transaction) -> Vec<String> {
    vec![
        format!("Transaction #{}", transaction.id),
        format!("  Title:       {}", transaction.title),
        format!(
            "  Description: {}",
            transaction.description.as_deref().unwrap_or("—")
        ),
        format!("  Amount:      {}", format_signed_amount(transaction)),
        format!("  Category:    {}", transaction.category),
        format!(
            "  Wallet:      {}",
            transaction.wallet_id.as_deref().unwrap_or("—")
        ),
        format!("  Date:        {}", format_date(transaction.created_at)),
    ]
}
