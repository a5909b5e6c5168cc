use crate::{
    domain::wallet::{total_balance, Wallet},
    usecases::contracts::{SourceError, WalletSource},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ListWalletsOutput {
    pub wallets: Vec<Wallet>,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListWalletsError {
    TemporarilyUnavailable,
    Rejected { message: String },
    DataContractViolation,
}

pub fn list_wallets(
    source: &dyn WalletSource,
    user_id: &str,
) -> Result<ListWalletsOutput, ListWalletsError> {
    let wallets = source.list_wallets(user_id).map_err(map_source_error)?;
    let total_balance = total_balance(&wallets);

    Ok(ListWalletsOutput {
        wallets,
        total_balance,
    })
}

fn map_source_error(error: SourceError) -> ListWalletsError {
    match error {
        SourceError::Unavailable => ListWalletsError::TemporarilyUnavailable,
        SourceError::Rejected { message } => ListWalletsError::Rejected { message },
        SourceError::InvalidData => ListWalletsError::DataContractViolation,
    }
}
