//! Transaction mutations. Each one announces `TRANSACTION_UPDATED` strictly
//! after the backend reports success; a failed mutation announces nothing.

use crate::{
    domain::update_message::UpdateMessage,
    usecases::contracts::{SourceError, TransactionWriter, UpdateAnnouncer},
};

const TRANSACTION_MUTATED: &str = "TRANSACTION_MUTATED";
const TRANSACTION_MUTATION_FAILED: &str = "TRANSACTION_MUTATION_FAILED";

/// Transaction form as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInput {
    pub title: String,
    pub description: String,
    pub amount: String,
    pub wallet_id: Option<String>,
    pub category_id: Option<String>,
    pub type_id: Option<String>,
}

/// Validated transaction body sent on add and edit.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub wallet_id: String,
    pub category_id: String,
    pub type_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionMutationError {
    MissingFields,
    InvalidAmount,
    MissingTransactionId,
    Rejected { message: String },
    TemporarilyUnavailable,
    DataContractViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Add,
    Edit,
    Delete,
}

impl Mutation {
    fn as_label(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

pub fn add_transaction(
    writer: &dyn TransactionWriter,
    announcer: &dyn UpdateAnnouncer,
    user_id: &str,
    input: TransactionInput,
) -> Result<TransactionDraft, TransactionMutationError> {
    let draft = validate(input)?;
    let outcome = writer.add_transaction(user_id, &draft);
    finish(Mutation::Add, outcome, announcer)?;

    Ok(draft)
}

pub fn edit_transaction(
    writer: &dyn TransactionWriter,
    announcer: &dyn UpdateAnnouncer,
    user_id: &str,
    transaction_id: &str,
    input: TransactionInput,
) -> Result<TransactionDraft, TransactionMutationError> {
    let transaction_id = required_id(transaction_id)?;
    let draft = validate(input)?;
    let outcome = writer.edit_transaction(transaction_id, user_id, &draft);
    finish(Mutation::Edit, outcome, announcer)?;

    Ok(draft)
}

pub fn delete_transaction(
    writer: &dyn TransactionWriter,
    announcer: &dyn UpdateAnnouncer,
    transaction_id: &str,
) -> Result<(), TransactionMutationError> {
    let transaction_id = required_id(transaction_id)?;
    let outcome = writer.delete_transaction(transaction_id);
    finish(Mutation::Delete, outcome, announcer)
}

fn finish(
    mutation: Mutation,
    outcome: Result<(), SourceError>,
    announcer: &dyn UpdateAnnouncer,
) -> Result<(), TransactionMutationError> {
    match outcome {
        Ok(()) => {
            tracing::info!(
                code = TRANSACTION_MUTATED,
                mutation = mutation.as_label(),
                "transaction change accepted"
            );
            announcer.announce(&UpdateMessage::TransactionUpdated);
            Ok(())
        }
        Err(error) => {
            tracing::warn!(
                code = TRANSACTION_MUTATION_FAILED,
                mutation = mutation.as_label(),
                error = ?error,
                "transaction change refused"
            );
            Err(map_source_error(error))
        }
    }
}

fn required_id(transaction_id: &str) -> Result<&str, TransactionMutationError> {
    let transaction_id = transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(TransactionMutationError::MissingTransactionId);
    }
    Ok(transaction_id)
}

fn validate(input: TransactionInput) -> Result<TransactionDraft, TransactionMutationError> {
    let (Some(wallet_id), Some(category_id), Some(type_id)) = (
        non_blank(input.wallet_id),
        non_blank(input.category_id),
        non_blank(input.type_id),
    ) else {
        return Err(TransactionMutationError::MissingFields);
    };

    let amount = input.amount.trim();
    if amount.is_empty() {
        return Err(TransactionMutationError::MissingFields);
    }

    let amount = amount
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or(TransactionMutationError::InvalidAmount)?;

    let description = input.description.trim();

    Ok(TransactionDraft {
        title: input.title.trim().to_owned(),
        description: (!description.is_empty()).then(|| description.to_owned()),
        amount,
        wallet_id,
        category_id,
        type_id,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn map_source_error(error: SourceError) -> TransactionMutationError {
    match error {
        SourceError::Rejected { message } => TransactionMutationError::Rejected { message },
        SourceError::Unavailable => TransactionMutationError::TemporarilyUnavailable,
        SourceError::InvalidData => TransactionMutationError::DataContractViolation,
    }
}
