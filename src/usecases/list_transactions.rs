use chrono::{DateTime, TimeZone};

use crate::{
    domain::transaction::{search, totals, Transaction, TransactionTotals},
    usecases::contracts::{SourceError, TransactionSource},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTransactionsQuery {
    /// Case-insensitive filter over title, description and category.
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListTransactionsOutput {
    pub transactions: Vec<Transaction>,
    /// Computed over every transaction of the user, not only the matches.
    pub totals: TransactionTotals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListTransactionsError {
    TemporarilyUnavailable,
    Rejected { message: String },
    NotFound,
    DataContractViolation,
}

/// `now` picks the month for the totals, in its own time zone.
pub fn list_transactions<Tz: TimeZone>(
    source: &dyn TransactionSource,
    user_id: &str,
    query: &ListTransactionsQuery,
    now: DateTime<Tz>,
) -> Result<ListTransactionsOutput, ListTransactionsError> {
    let all = source
        .list_transactions(user_id)
        .map_err(map_source_error)?;
    let totals = totals(&all, now);

    let transactions = match query.search.as_deref() {
        Some(needle) => search(&all, needle).into_iter().cloned().collect(),
        None => all,
    };

    Ok(ListTransactionsOutput {
        transactions,
        totals,
    })
}

pub fn get_transaction(
    source: &dyn TransactionSource,
    transaction_id: &str,
) -> Result<Transaction, ListTransactionsError> {
    let transaction_id = transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(ListTransactionsError::NotFound);
    }

    source
        .get_transaction(transaction_id)
        .map_err(map_source_error)
}

fn map_source_error(error: SourceError) -> ListTransactionsError {
    match error {
        SourceError::Unavailable => ListTransactionsError::TemporarilyUnavailable,
        SourceError::Rejected { message } => ListTransactionsError::Rejected { message },
        SourceError::InvalidData => ListTransactionsError::DataContractViolation,
    }
}
