use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;

use crate::{
    backend::wire::{
        AddWalletRequest, CategoriesResponse, ContractViolation, LoginRequest, LoginResponse,
        SignUpRequest, StatusResponse, TransactionBody, TransactionResponse, TransactionsResponse,
        TypesResponse, WalletsResponse,
    },
    domain::{
        catalog::{Category, TransactionType},
        session::UserSession,
        transaction::Transaction,
        wallet::Wallet,
    },
    infra::{config::BackendConfig, error::AppError},
    usecases::{
        auth::SignUpCommand,
        contracts::{
            AccountGateway, CatalogSource, SourceError, TransactionSource, TransactionWriter,
            WalletSource, WalletWriter,
        },
        manage_transaction::TransactionDraft,
        manage_wallet::NewWallet,
    },
};

const BACKEND_UNREACHABLE: &str = "BACKEND_UNREACHABLE";
const BACKEND_REJECTED: &str = "BACKEND_REJECTED";
const BACKEND_INVALID_PAYLOAD: &str = "BACKEND_INVALID_PAYLOAD";

/// Blocking facade over the async HTTP client. Every call is driven to
/// completion on the application runtime, so it must not be used from
/// inside that runtime's tasks.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    runtime: Handle,
}

impl RestBackend {
    pub fn new(config: &BackendConfig, runtime: Handle) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, SourceError> {
        self.runtime.block_on(async move {
            let response = request.send().await.map_err(|error| {
                tracing::warn!(
                    code = BACKEND_UNREACHABLE,
                    operation,
                    error = %error,
                    "backend request failed"
                );
                SourceError::Unavailable
            })?;

            let status = response.status();
            let body = response.text().await.map_err(|error| {
                tracing::warn!(
                    code = BACKEND_UNREACHABLE,
                    operation,
                    error = %error,
                    "backend response body could not be read"
                );
                SourceError::Unavailable
            })?;

            decode_response(operation, status, &body)
        })
    }

    fn acknowledge(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<(), SourceError> {
        let response: StatusResponse = self.execute(operation, request)?;
        if response.accepted() {
            return Ok(());
        }

        Err(rejected(operation, response.message))
    }
}

impl AccountGateway for RestBackend {
    fn sign_in(&self, email: &str, password: &str) -> Result<UserSession, SourceError> {
        let request = self
            .client
            .post(self.url("/users/login"))
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.execute("sign_in", request)?;

        match (response.status, response.data) {
            (true, Some(user)) => Ok(user.into()),
            (true, None) => Err(SourceError::InvalidData),
            (false, _) => Err(rejected("sign_in", response.message)),
        }
    }

    fn sign_up(&self, command: &SignUpCommand) -> Result<(), SourceError> {
        let request = self
            .client
            .post(self.url("/users"))
            .json(&SignUpRequest::from(command));
        self.acknowledge("sign_up", request)
    }
}

impl WalletSource for RestBackend {
    fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>, SourceError> {
        let request = self
            .client
            .get(self.url(&format!("/wallet/public/{user_id}")));
        let response: WalletsResponse = self.execute("list_wallets", request)?;

        map_items("list_wallets", response.wallets)
    }
}

impl WalletWriter for RestBackend {
    fn add_wallet(&self, user_id: &str, wallet: &NewWallet) -> Result<(), SourceError> {
        let request = self
            .client
            .post(self.url("/wallet/add"))
            .json(&AddWalletRequest::new(user_id, wallet));
        self.acknowledge("add_wallet", request)
    }
}

impl TransactionSource for RestBackend {
    fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, SourceError> {
        let request = self
            .client
            .get(self.url(&format!("/transaction/public/{user_id}")));
        let response: TransactionsResponse = self.execute("list_transactions", request)?;

        map_items("list_transactions", response.transactions)
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, SourceError> {
        let request = self
            .client
            .get(self.url(&format!("/transaction/getby/{transaction_id}")));
        let response: TransactionResponse = self.execute("get_transaction", request)?;

        match (response.status, response.transaction) {
            (true, Some(transaction)) => Transaction::try_from(transaction)
                .map_err(|violation| invalid_payload("get_transaction", violation.0)),
            (true, None) => Err(invalid_payload("get_transaction", "transaction missing")),
            (false, _) => Err(rejected("get_transaction", response.message)),
        }
    }
}

impl TransactionWriter for RestBackend {
    fn add_transaction(
        &self,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<(), SourceError> {
        let request = self
            .client
            .post(self.url("/transaction/add"))
            .json(&TransactionBody::new(user_id, draft));
        self.acknowledge("add_transaction", request)
    }

    fn edit_transaction(
        &self,
        transaction_id: &str,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<(), SourceError> {
        let request = self
            .client
            .put(self.url(&format!("/transaction/edit/{transaction_id}")))
            .json(&TransactionBody::new(user_id, draft));
        self.acknowledge("edit_transaction", request)
    }

    fn delete_transaction(&self, transaction_id: &str) -> Result<(), SourceError> {
        let request = self
            .client
            .delete(self.url(&format!("/transaction/delete/{transaction_id}")));
        self.acknowledge("delete_transaction", request)
    }
}

impl CatalogSource for RestBackend {
    fn categories(&self) -> Result<Vec<Category>, SourceError> {
        let request = self.client.get(self.url("/data/categories"));
        let response: CategoriesResponse = self.execute("categories", request)?;

        let options = response
            .categories
            .ok_or_else(|| invalid_payload("categories", "categories missing"))?;
        Ok(options.into_iter().map(Category::from).collect())
    }

    fn transaction_types(&self) -> Result<Vec<TransactionType>, SourceError> {
        let request = self.client.get(self.url("/data/type"));
        let response: TypesResponse = self.execute("transaction_types", request)?;

        let options = response
            .types
            .ok_or_else(|| invalid_payload("transaction_types", "types missing"))?;
        Ok(options.into_iter().map(TransactionType::from).collect())
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn decode_response<T: DeserializeOwned>(
    operation: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<T, SourceError> {
    if status.is_server_error() {
        tracing::warn!(
            code = BACKEND_UNREACHABLE,
            operation,
            status = status.as_u16(),
            "backend answered with a server error"
        );
        return Err(SourceError::Unavailable);
    }

    if status.is_client_error() {
        let message = serde_json::from_str::<StatusResponse>(body)
            .ok()
            .and_then(|response| response.message)
            .or_else(|| status.canonical_reason().map(str::to_owned));
        return Err(rejected(operation, message));
    }

    serde_json::from_str(body).map_err(|error| {
        tracing::warn!(
            code = BACKEND_INVALID_PAYLOAD,
            operation,
            error = %error,
            "backend payload does not match the expected shape"
        );
        SourceError::InvalidData
    })
}

fn map_items<W, T>(operation: &'static str, items: Option<Vec<W>>) -> Result<Vec<T>, SourceError>
where
    T: TryFrom<W, Error = ContractViolation>,
{
    let items = items.ok_or_else(|| invalid_payload(operation, "list missing"))?;

    items
        .into_iter()
        .map(|item| T::try_from(item).map_err(|violation| invalid_payload(operation, violation.0)))
        .collect()
}

fn rejected(operation: &'static str, message: Option<String>) -> SourceError {
    let message = message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "request was not accepted".to_owned());
    tracing::warn!(
        code = BACKEND_REJECTED,
        operation,
        message = %message,
        "backend refused the request"
    );
    SourceError::Rejected { message }
}

fn invalid_payload(operation: &'static str, details: &'static str) -> SourceError {
    tracing::warn!(
        code = BACKEND_INVALID_PAYLOAD,
        operation,
        details,
        "backend payload violates the data contract"
    );
    SourceError::InvalidData
}
