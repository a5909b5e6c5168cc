//! JSON shapes exchanged with the REST backend and their mapping onto the
//! domain model.
//!
//! The backend is loose about scalar types: ids, balances and amounts may
//! arrive as numbers or as strings. [`Scalar`] accepts both.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        catalog::{Category, TransactionType},
        session::UserSession,
        transaction::{Transaction, TransactionKind},
        wallet::{Wallet, WalletType},
    },
    usecases::{auth::SignUpCommand, manage_transaction::TransactionDraft, manage_wallet::NewWallet},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    pub fn into_string(self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(number) => number.as_f64(),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        };
        value.filter(|value| value.is_finite())
    }
}

/// A record the backend could not have meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation(pub &'static str);

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a SignUpCommand> for SignUpRequest<'a> {
    fn from(command: &'a SignUpCommand) -> Self {
        Self {
            first_name: &command.first_name,
            last_name: &command.last_name,
            email: &command.email,
            password: &command.password,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWalletRequest<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub balance: f64,
    pub wallet_type: &'static str,
}

impl<'a> AddWalletRequest<'a> {
    pub fn new(user_id: &'a str, wallet: &'a NewWallet) -> Self {
        Self {
            user_id,
            name: &wallet.name,
            balance: wallet.balance,
            wallet_type: wallet.wallet_type.as_wire(),
        }
    }
}

/// Body of transaction add and edit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody<'a> {
    pub user_id: &'a str,
    pub wallet_id: &'a str,
    pub category_id: &'a str,
    pub type_id: &'a str,
    pub amount: f64,
    pub title: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> TransactionBody<'a> {
    pub fn new(user_id: &'a str, draft: &'a TransactionDraft) -> Self {
        Self {
            user_id,
            wallet_id: &draft.wallet_id,
            category_id: &draft.category_id,
            type_id: &draft.type_id,
            amount: draft.amount,
            title: &draft.title,
            description: draft.description.as_deref(),
        }
    }
}

/// Acknowledgement returned by mutations. Some endpoints flag success with
/// `status`, others with `success`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn accepted(&self) -> bool {
        self.status == Some(true) || self.success == Some(true)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<WireUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub id: Scalar,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

impl From<WireUser> for UserSession {
    fn from(user: WireUser) -> Self {
        Self {
            id: user.id.into_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WalletsResponse {
    #[serde(default)]
    pub wallets: Option<Vec<WireWallet>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWallet {
    /// Wallet id; the backend names it `value`.
    pub value: Scalar,
    pub name: String,
    pub balance: Scalar,
    #[serde(default)]
    pub wallet_type: Option<String>,
}

impl TryFrom<WireWallet> for Wallet {
    type Error = ContractViolation;

    fn try_from(wallet: WireWallet) -> Result<Self, Self::Error> {
        let balance = wallet
            .balance
            .to_f64()
            .ok_or(ContractViolation("wallet balance is not a number"))?;

        Ok(Self {
            id: wallet.value.into_string(),
            name: wallet.name,
            balance,
            wallet_type: wallet.wallet_type.as_deref().and_then(WalletType::from_wire),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireOption {
    pub id: Scalar,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Option<Vec<WireOption>>,
}

#[derive(Debug, Deserialize)]
pub struct TypesResponse {
    #[serde(default)]
    pub types: Option<Vec<WireOption>>,
}

impl From<WireOption> for Category {
    fn from(option: WireOption) -> Self {
        Self {
            id: option.id.into_string(),
            value: option.value,
        }
    }
}

impl From<WireOption> for TransactionType {
    fn from(option: WireOption) -> Self {
        Self {
            id: option.id.into_string(),
            value: option.value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Option<Vec<WireTransaction>>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction: Option<WireTransaction>,
}

/// Either a nested `{id, value}` object or a bare name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireLabel {
    Object { value: String },
    Text(String),
}

impl WireLabel {
    fn into_value(self) -> String {
        match self {
            Self::Object { value } => value,
            Self::Text(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireRef {
    pub id: Scalar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    pub id: Scalar,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Scalar,
    #[serde(default, alias = "categoryName")]
    pub category: Option<WireLabel>,
    #[serde(default, rename = "type")]
    pub kind: Option<WireLabel>,
    #[serde(default)]
    pub wallet: Option<WireRef>,
    #[serde(default)]
    pub wallet_id: Option<Scalar>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

impl TryFrom<WireTransaction> for Transaction {
    type Error = ContractViolation;

    fn try_from(transaction: WireTransaction) -> Result<Self, Self::Error> {
        let amount = transaction
            .amount
            .to_f64()
            .ok_or(ContractViolation("transaction amount is not a number"))?;
        let kind = transaction
            .kind
            .map(WireLabel::into_value)
            .as_deref()
            .and_then(TransactionKind::from_label)
            .ok_or(ContractViolation("transaction type is neither income nor expense"))?;

        let wallet_id = transaction
            .wallet
            .map(|wallet| wallet.id)
            .or(transaction.wallet_id)
            .map(Scalar::into_string);

        Ok(Self {
            id: transaction.id.into_string(),
            title: transaction.title.unwrap_or_default(),
            description: transaction
                .description
                .filter(|description| !description.trim().is_empty()),
            amount,
            category: transaction
                .category
                .map(WireLabel::into_value)
                .unwrap_or_default(),
            kind,
            wallet_id,
            created_at: transaction.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

/// Accepts RFC 3339 and zone-less ISO timestamps; the latter are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
