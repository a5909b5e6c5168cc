use crate::{
    domain::{
        catalog::{Category, TransactionType},
        session::UserSession,
        transaction::Transaction,
        update_message::UpdateMessage,
        wallet::Wallet,
    },
    usecases::{auth::SignUpCommand, manage_transaction::TransactionDraft, manage_wallet::NewWallet},
};

/// Failure reported by a backend source, before use-case mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network failure, timeout or a server-side error status.
    Unavailable,
    /// The backend answered and refused the request.
    Rejected { message: String },
    /// The response did not have the expected shape.
    InvalidData,
}

/// Tells other consumers of the live channel that a list changed.
pub trait UpdateAnnouncer {
    fn announce(&self, message: &UpdateMessage);
}

pub trait AccountGateway {
    fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, SourceError>;
    fn sign_up(&self, command: &SignUpCommand) -> Result<(), SourceError>;
}

pub trait WalletSource {
    fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>, SourceError>;
}

pub trait WalletWriter {
    fn add_wallet(&self, user_id: &str, wallet: &NewWallet) -> Result<(), SourceError>;
}

pub trait TransactionSource {
    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, SourceError>;
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, SourceError>;
}

pub trait TransactionWriter {
    fn add_transaction(&self, user_id: &str, draft: &TransactionDraft)
        -> Result<(), SourceError>;
    fn edit_transaction(
        &self,
        transaction_id: &str,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<(), SourceError>;
    fn delete_transaction(&self, transaction_id: &str) -> Result<(), SourceError>;
}

pub trait CatalogSource {
    fn categories(&self) -> Result<Vec<Category>, SourceError>;
    fn transaction_types(&self) -> Result<Vec<TransactionType>, SourceError>;
}

impl<T: UpdateAnnouncer + ?Sized> UpdateAnnouncer for &T {
    fn announce(&self, message: &UpdateMessage) {
        (*self).announce(message)
    }
}
