use std::{path::Path, sync::mpsc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::Local;

use crate::{
    backend,
    cli::{Cli, Command, TransactionArgs, TransactionCommand, WalletCommand},
    domain::{
        session::UserSession,
        transaction::Transaction,
        wallet::{Wallet, WalletType},
    },
    infra::{
        self, contracts::SessionStore, session_store::FileSessionStore,
        storage_layout::StorageLayout,
    },
    live::{self, LiveUpdateChannel},
    ui::{self, format, Console, CrosstermInput, StdConsole, TerminalSession},
    usecases::{
        self,
        auth::{self, AuthError, SignInCommand, SignUpInput},
        bootstrap,
        broadcast::with_open_channel,
        context::AppContext,
        contracts::{
            AccountGateway, CatalogSource, TransactionSource, TransactionWriter, UpdateAnnouncer,
            WalletSource, WalletWriter,
        },
        list_transactions::{self, ListTransactionsError, ListTransactionsQuery},
        list_wallets::{self, ListWalletsError},
        load_catalog::{self, LoadCatalogError},
        manage_transaction::{self, TransactionInput, TransactionMutationError},
        manage_wallet::{self, AddWalletError, NewWalletInput},
        screen::{LiveScreen, ScreenKind},
        watch::WatchSession,
    },
};

const APP_LOGOUT_FALLBACK: &str = "APP_LOGOUT_FALLBACK";

const UNAVAILABLE: &str = "The backend is unreachable. Check your connection and try again.";
const CONTRACT_VIOLATION: &str = "The backend sent data this client does not understand.";

pub fn run(cli: Cli) -> Result<()> {
    let command = cli.command_or_default();
    let mut console = StdConsole;

    if let Command::Logout = command {
        let sessions = logout_session_store(cli.config.as_deref())?;
        return logout(&sessions, &mut console);
    }

    let context = bootstrap::bootstrap(cli.config.as_deref())?;
    tracing::debug!(
        ui = ui::module_name(),
        domain = crate::domain::module_name(),
        backend = backend::module_name(),
        live = live::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    dispatch(&context, command, &mut console)
}

fn dispatch(context: &AppContext, command: Command, console: &mut dyn Console) -> Result<()> {
    let backend = &context.backend;

    match command {
        Command::Watch { screen } => {
            let user = require_session(&context.sessions)?;
            watch(context, user, screen.into())
        }
        Command::Login { email } => login(backend, &context.sessions, email, console),
        Command::Signup => signup(backend, console),
        Command::Logout => logout(&context.sessions, console),
        Command::Categories => show_catalog(backend, console),
        Command::Wallet(WalletCommand::List) => {
            let user = require_session(&context.sessions)?;
            show_wallets(backend, &user, console)
        }
        Command::Wallet(WalletCommand::Add {
            name,
            balance,
            wallet_type,
        }) => {
            let user = require_session(&context.sessions)?;
            let input = NewWalletInput {
                name,
                balance,
                wallet_type: wallet_type.map(WalletType::from),
            };
            announced(context, |channel| {
                create_wallet(backend, channel, &user, input, console)
            })
        }
        Command::Transaction(command) => {
            let user = require_session(&context.sessions)?;
            dispatch_transaction(context, &user, command, console)
        }
    }
}

fn dispatch_transaction(
    context: &AppContext,
    user: &UserSession,
    command: TransactionCommand,
    console: &mut dyn Console,
) -> Result<()> {
    let backend = &context.backend;

    match command {
        TransactionCommand::List { search } => show_transactions(backend, user, search, console),
        TransactionCommand::Show { id } => show_transaction(backend, &id, console),
        TransactionCommand::Add(fields) => {
            let input = resolve_transaction_input(backend, backend, user, fields)?;
            announced(context, |channel| {
                create_transaction(backend, channel, user, input, console)
            })
        }
        TransactionCommand::Edit { id, fields } => {
            let input = prefilled_edit_input(backend, backend, backend, user, &id, fields)?;
            announced(context, |channel| {
                update_transaction(backend, channel, user, &id, input, console)
            })
        }
        TransactionCommand::Delete { id } => announced(context, |channel| {
            remove_transaction(backend, channel, &id, console)
        }),
    }
}

/// Runs a mutation with the live channel open so watching screens refresh.
fn announced<T>(context: &AppContext, mutation: impl FnOnce(&LiveUpdateChannel) -> T) -> T {
    let open_timeout = Duration::from_millis(context.config.live.open_timeout_ms);
    with_open_channel(&context.channel, open_timeout, mutation)
}

fn watch(context: &AppContext, user: UserSession, kind: ScreenKind) -> Result<()> {
    let screen = LiveScreen::new(kind, context.channel.clone());
    let mut session = WatchSession::new(screen, user, &context.backend, &context.backend);
    let (sender, events) = mpsc::channel();

    let mut terminal = TerminalSession::new()?;
    let mut input = CrosstermInput;
    session.run(events, sender, &mut input, &mut terminal)
}

/// Logout must work even when the config is broken, so it falls back to the
/// default storage layout.
fn logout_session_store(config_path: Option<&Path>) -> Result<FileSessionStore> {
    match bootstrap::bootstrap(config_path) {
        Ok(context) => Ok(context.sessions.clone()),
        Err(error) => {
            tracing::warn!(
                code = APP_LOGOUT_FALLBACK,
                error = %error,
                "bootstrap failed; clearing the session at the default location"
            );
            let layout = StorageLayout::resolve()?;
            Ok(FileSessionStore::from_layout(&layout))
        }
    }
}

fn require_session(store: &dyn SessionStore) -> Result<UserSession> {
    auth::current_session(store)
        .ok_or_else(|| anyhow!("Not signed in. Run `fintrack login` first."))
}

fn login(
    gateway: &dyn AccountGateway,
    store: &dyn SessionStore,
    email: Option<String>,
    console: &mut dyn Console,
) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => required_line(console, "Email: ")?,
    };
    let password = required_secret(console, "Password: ")?;

    let session = auth::sign_in(gateway, store, SignInCommand { email, password })
        .map_err(|error| anyhow!(auth_message(&error)))?;

    console.print_line(&format!("Signed in as {}.", session.display_name()))?;
    Ok(())
}

fn signup(gateway: &dyn AccountGateway, console: &mut dyn Console) -> Result<()> {
    let input = SignUpInput {
        first_name: required_line(console, "First name: ")?,
        last_name: required_line(console, "Last name: ")?,
        email: required_line(console, "Email: ")?,
        password: required_secret(console, "Password: ")?,
        confirm_password: required_secret(console, "Confirm password: ")?,
    };

    auth::sign_up(gateway, input).map_err(|error| anyhow!(auth_message(&error)))?;

    console.print_line("Account created. Sign in with `fintrack login`.")?;
    Ok(())
}

fn logout(store: &dyn SessionStore, console: &mut dyn Console) -> Result<()> {
    let removed = auth::sign_out(store).map_err(|error| anyhow!(auth_message(&error)))?;

    if removed {
        console.print_line("Signed out.")?;
    } else {
        console.print_line("No saved session; nothing to do.")?;
    }
    Ok(())
}

fn show_wallets(
    source: &dyn WalletSource,
    user: &UserSession,
    console: &mut dyn Console,
) -> Result<()> {
    let output = list_wallets::list_wallets(source, &user.id)
        .map_err(|error| anyhow!(list_wallets_message(&error)))?;

    print_lines(console, format::wallet_lines(&output.wallets, output.total_balance))
}

fn create_wallet(
    writer: &dyn WalletWriter,
    announcer: &dyn UpdateAnnouncer,
    user: &UserSession,
    input: NewWalletInput,
    console: &mut dyn Console,
) -> Result<()> {
    let wallet = manage_wallet::add_wallet(writer, announcer, &user.id, input)
        .map_err(|error| anyhow!(add_wallet_message(&error)))?;

    console.print_line(&format!(
        "Wallet \"{}\" added with {}.",
        wallet.name,
        format::format_money(wallet.balance)
    ))?;
    Ok(())
}

fn show_transactions(
    source: &dyn TransactionSource,
    user: &UserSession,
    search: Option<String>,
    console: &mut dyn Console,
) -> Result<()> {
    let query = ListTransactionsQuery { search };
    let output = list_transactions::list_transactions(source, &user.id, &query, Local::now())
        .map_err(|error| anyhow!(list_transactions_message(&error)))?;

    console.print_line(&format::totals_line(&output.totals))?;
    print_lines(console, format::transaction_lines(&output.transactions))
}

fn show_transaction(
    source: &dyn TransactionSource,
    transaction_id: &str,
    console: &mut dyn Console,
) -> Result<()> {
    let transaction = list_transactions::get_transaction(source, transaction_id)
        .map_err(|error| anyhow!(list_transactions_message(&error)))?;

    print_lines(console, format::transaction_detail_lines(&transaction))
}

fn create_transaction(
    writer: &dyn TransactionWriter,
    announcer: &dyn UpdateAnnouncer,
    user: &UserSession,
    input: TransactionInput,
    console: &mut dyn Console,
) -> Result<()> {
    let draft = manage_transaction::add_transaction(writer, announcer, &user.id, input)
        .map_err(|error| anyhow!(mutation_message(&error)))?;

    console.print_line(&format!("Transaction \"{}\" added.", draft.title))?;
    Ok(())
}

fn update_transaction(
    writer: &dyn TransactionWriter,
    announcer: &dyn UpdateAnnouncer,
    user: &UserSession,
    transaction_id: &str,
    input: TransactionInput,
    console: &mut dyn Console,
) -> Result<()> {
    let draft =
        manage_transaction::edit_transaction(writer, announcer, &user.id, transaction_id, input)
            .map_err(|error| anyhow!(mutation_message(&error)))?;

    console.print_line(&format!(
        "Transaction #{} updated: \"{}\".",
        transaction_id.trim(),
        draft.title
    ))?;
    Ok(())
}

fn remove_transaction(
    writer: &dyn TransactionWriter,
    announcer: &dyn UpdateAnnouncer,
    transaction_id: &str,
    console: &mut dyn Console,
) -> Result<()> {
    manage_transaction::delete_transaction(writer, announcer, transaction_id)
        .map_err(|error| anyhow!(mutation_message(&error)))?;

    console.print_line(&format!("Transaction #{} deleted.", transaction_id.trim()))?;
    Ok(())
}

fn show_catalog(source: &dyn CatalogSource, console: &mut dyn Console) -> Result<()> {
    let catalog = load_catalog::load_catalog(source)
        .map_err(|error| anyhow!(catalog_message(&error)))?;

    console.print_line("Categories:")?;
    for category in &catalog.categories {
        console.print_line(&format!("  {:>4}  {}", category.id, category.value))?;
    }
    console.print_line("Types:")?;
    for item in &catalog.types {
        console.print_line(&format!("  {:>4}  {}", item.id, item.value))?;
    }
    Ok(())
}

/// Turns names given on the command line into the ids the backend expects.
/// Fields left out stay `None` so validation reports them.
fn resolve_transaction_input(
    wallets: &dyn WalletSource,
    catalog: &dyn CatalogSource,
    user: &UserSession,
    fields: TransactionArgs,
) -> Result<TransactionInput> {
    let wallet_id = match fields.wallet.as_deref() {
        Some(needle) => {
            let output = list_wallets::list_wallets(wallets, &user.id)
                .map_err(|error| anyhow!(list_wallets_message(&error)))?;
            let wallet = find_wallet(&output.wallets, needle)
                .ok_or_else(|| anyhow!("Unknown wallet '{needle}'. See `fintrack wallet list`."))?;
            Some(wallet.id.clone())
        }
        None => None,
    };

    let (category_id, type_id) = if fields.category.is_some() || fields.kind.is_some() {
        let catalog = load_catalog::load_catalog(catalog)
            .map_err(|error| anyhow!(catalog_message(&error)))?;
        let category_id = match fields.category.as_deref() {
            Some(needle) => Some(catalog.category_id(needle).ok_or_else(|| {
                anyhow!("Unknown category '{needle}'. See `fintrack categories`.")
            })?),
            None => None,
        };
        let type_id = match fields.kind.as_deref() {
            Some(needle) => Some(catalog.type_id(needle).ok_or_else(|| {
                anyhow!("Unknown transaction type '{needle}'. See `fintrack categories`.")
            })?),
            None => None,
        };
        (category_id, type_id)
    } else {
        (None, None)
    };

    Ok(TransactionInput {
        title: fields.title.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        amount: fields.amount.unwrap_or_default(),
        wallet_id,
        category_id,
        type_id,
    })
}

/// Edit input starting from the stored transaction, with the given flags
/// laid over it.
fn prefilled_edit_input(
    transactions: &dyn TransactionSource,
    wallets: &dyn WalletSource,
    catalog: &dyn CatalogSource,
    user: &UserSession,
    transaction_id: &str,
    fields: TransactionArgs,
) -> Result<TransactionInput> {
    let stored = list_transactions::get_transaction(transactions, transaction_id)
        .map_err(|error| anyhow!(list_transactions_message(&error)))?;

    resolve_transaction_input(wallets, catalog, user, fill_from_stored(fields, &stored))
}

fn fill_from_stored(fields: TransactionArgs, stored: &Transaction) -> TransactionArgs {
    TransactionArgs {
        title: fields.title.or_else(|| Some(stored.title.clone())),
        description: fields.description.or_else(|| stored.description.clone()),
        amount: fields.amount.or_else(|| Some(stored.amount.to_string())),
        wallet: fields.wallet.or_else(|| stored.wallet_id.clone()),
        category: fields
            .category
            .or_else(|| Some(stored.category.clone()).filter(|name| !name.is_empty())),
        kind: fields
            .kind
            .or_else(|| Some(stored.kind.as_label().to_owned())),
    }
}

fn find_wallet<'a>(wallets: &'a [Wallet], needle: &str) -> Option<&'a Wallet> {
    let needle = needle.trim();
    wallets.iter().find(|wallet| wallet.id == needle).or_else(|| {
        wallets
            .iter()
            .find(|wallet| wallet.name.eq_ignore_ascii_case(needle))
    })
}

fn required_line(console: &mut dyn Console, prompt: &str) -> Result<String> {
    console
        .prompt_line(prompt)?
        .ok_or_else(|| anyhow!("Input closed before all fields were entered."))
}

fn required_secret(console: &mut dyn Console, prompt: &str) -> Result<String> {
    console
        .prompt_secret(prompt)?
        .ok_or_else(|| anyhow!("Input closed before all fields were entered."))
}

fn print_lines(console: &mut dyn Console, lines: Vec<String>) -> Result<()> {
    for line in lines {
        console.print_line(&line)?;
    }
    Ok(())
}

fn auth_message(error: &AuthError) -> String {
    match error {
        AuthError::MissingFields => "All fields are required.".to_owned(),
        AuthError::PasswordMismatch => "Passwords do not match.".to_owned(),
        AuthError::Rejected { message } => message.clone(),
        AuthError::TemporarilyUnavailable => UNAVAILABLE.to_owned(),
        AuthError::DataContractViolation => CONTRACT_VIOLATION.to_owned(),
        AuthError::SessionNotSaved => {
            "Signed in, but the session could not be saved locally.".to_owned()
        }
        AuthError::SessionNotCleared => "The saved session could not be removed.".to_owned(),
    }
}

fn list_wallets_message(error: &ListWalletsError) -> String {
    match error {
        ListWalletsError::TemporarilyUnavailable => UNAVAILABLE.to_owned(),
        ListWalletsError::Rejected { message } => message.clone(),
        ListWalletsError::DataContractViolation => CONTRACT_VIOLATION.to_owned(),
    }
}

fn list_transactions_message(error: &ListTransactionsError) -> String {
    match error {
        ListTransactionsError::TemporarilyUnavailable => UNAVAILABLE.to_owned(),
        ListTransactionsError::Rejected { message } => message.clone(),
        ListTransactionsError::NotFound => "Transaction not found.".to_owned(),
        ListTransactionsError::DataContractViolation => CONTRACT_VIOLATION.to_owned(),
    }
}

fn add_wallet_message(error: &AddWalletError) -> String {
    match error {
        AddWalletError::MissingName => "Wallet name is required.".to_owned(),
        AddWalletError::InvalidBalance => "Balance must be a number.".to_owned(),
        AddWalletError::MissingWalletType => "Choose a wallet type: --type cash|card.".to_owned(),
        AddWalletError::Rejected { message } => message.clone(),
        AddWalletError::TemporarilyUnavailable => UNAVAILABLE.to_owned(),
        AddWalletError::DataContractViolation => CONTRACT_VIOLATION.to_owned(),
    }
}

fn mutation_message(error: &TransactionMutationError) -> String {
    match error {
        TransactionMutationError::MissingFields => {
            "Amount, wallet, category and type are required.".to_owned()
        }
        TransactionMutationError::InvalidAmount => {
            "Amount must be a number greater than zero.".to_owned()
        }
        TransactionMutationError::MissingTransactionId => "Transaction id is required.".to_owned(),
        TransactionMutationError::Rejected { message } => message.clone(),
        TransactionMutationError::TemporarilyUnavailable => UNAVAILABLE.to_owned(),
        TransactionMutationError::DataContractViolation => CONTRACT_VIOLATION.to_owned(),
    }
}

fn catalog_message(error: &LoadCatalogError) -> String {
    match error {
        LoadCatalogError::TemporarilyUnavailable => UNAVAILABLE.to_owned(),
        LoadCatalogError::DataContractViolation => CONTRACT_VIOLATION.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs};

    use super::*;
    use crate::{
        domain::{
            catalog::{Category, TransactionType},
            transaction::TransactionKind,
            update_message::UpdateMessage,
        },
        infra::stubs::InMemorySessionStore,
        test_support::{env_lock, ScopedXdgConfigHome},
        ui::FakeConsole,
        usecases::{
            auth::SignUpCommand, contracts::SourceError, manage_transaction::TransactionDraft,
            manage_wallet::NewWallet,
        },
    };

    fn ada() -> UserSession {
        UserSession {
            id: "7".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
        }
    }

    /// Backend double covering every source the commands use.
    #[derive(Default)]
    struct FakeBackend {
        sign_in_error: Option<SourceError>,
        stored: Option<Transaction>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.borrow_mut().push(call.into());
        }
    }

    impl AccountGateway for FakeBackend {
        fn sign_in(&self, email: &str, _password: &str) -> Result<UserSession, SourceError> {
            self.record(format!("sign_in {email}"));
            match &self.sign_in_error {
                Some(error) => Err(error.clone()),
                None => Ok(ada()),
            }
        }

        fn sign_up(&self, command: &SignUpCommand) -> Result<(), SourceError> {
            self.record(format!("sign_up {}", command.email));
            Ok(())
        }
    }

    impl WalletSource for FakeBackend {
        fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>, SourceError> {
            self.record(format!("list_wallets {user_id}"));
            Ok(vec![Wallet {
                id: "3".to_owned(),
                name: "Main".to_owned(),
                balance: 120.0,
                wallet_type: Some(WalletType::Card),
            }])
        }
    }

    impl WalletWriter for FakeBackend {
        fn add_wallet(&self, user_id: &str, wallet: &NewWallet) -> Result<(), SourceError> {
            self.record(format!("add_wallet {user_id} {}", wallet.name));
            Ok(())
        }
    }

    impl TransactionSource for FakeBackend {
        fn list_transactions(&self, _user_id: &str) -> Result<Vec<Transaction>, SourceError> {
            Err(SourceError::Unavailable)
        }

        fn get_transaction(&self, _transaction_id: &str) -> Result<Transaction, SourceError> {
            self.stored.clone().ok_or_else(|| SourceError::Rejected {
                message: "Transaction does not exist".to_owned(),
            })
        }
    }

    impl TransactionWriter for FakeBackend {
        fn add_transaction(
            &self,
            user_id: &str,
            draft: &TransactionDraft,
        ) -> Result<(), SourceError> {
            self.record(format!(
                "add_transaction {user_id} {} {} {}",
                draft.wallet_id, draft.category_id, draft.type_id
            ));
            Ok(())
        }

        fn edit_transaction(
            &self,
            transaction_id: &str,
            _user_id: &str,
            draft: &TransactionDraft,
        ) -> Result<(), SourceError> {
            self.record(format!(
                "edit_transaction {transaction_id} {} {} {:?}",
                draft.title, draft.amount, draft.description
            ));
            Ok(())
        }

        fn delete_transaction(&self, transaction_id: &str) -> Result<(), SourceError> {
            self.record(format!("delete_transaction {transaction_id}"));
            Ok(())
        }
    }

    impl CatalogSource for FakeBackend {
        fn categories(&self) -> Result<Vec<Category>, SourceError> {
            Ok(vec![Category {
                id: "2".to_owned(),
                value: "Food".to_owned(),
            }])
        }

        fn transaction_types(&self) -> Result<Vec<TransactionType>, SourceError> {
            Ok(vec![TransactionType {
                id: "1".to_owned(),
                value: "Expense".to_owned(),
            }])
        }
    }

    #[derive(Default)]
    struct Announcements(RefCell<Vec<String>>);

    impl UpdateAnnouncer for Announcements {
        fn announce(&self, message: &UpdateMessage) {
            self.0.borrow_mut().push(message.tag().to_owned());
        }
    }

    #[test]
    fn login_prompts_for_missing_email_and_saves_session() {
        let backend = FakeBackend::default();
        let store = InMemorySessionStore::default();
        let mut console = FakeConsole::new(vec![Some(" ada@example.com "), Some("secret")]);

        login(&backend, &store, None, &mut console).expect("login should succeed");

        assert_eq!(backend.calls(), vec!["sign_in ada@example.com"]);
        assert_eq!(auth::current_session(&store), Some(ada()));
        assert_eq!(console.output, vec!["Signed in as Ada Lovelace."]);
    }

    #[test]
    fn login_reports_backend_message_on_rejection() {
        let backend = FakeBackend {
            sign_in_error: Some(SourceError::Rejected {
                message: "Invalid email or password".to_owned(),
            }),
            ..FakeBackend::default()
        };
        let store = InMemorySessionStore::default();
        let mut console = FakeConsole::new(vec![Some("nope")]);

        let error = login(&backend, &store, Some("ada@example.com".to_owned()), &mut console)
            .expect_err("login should fail");

        assert_eq!(error.to_string(), "Invalid email or password");
        assert_eq!(auth::current_session(&store), None);
    }

    #[test]
    fn signup_stops_when_input_closes() {
        let backend = FakeBackend::default();
        let mut console = FakeConsole::new(vec![Some("Ada"), None]);

        let error = signup(&backend, &mut console).expect_err("signup should stop");

        assert!(error.to_string().contains("Input closed"));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn signup_rejects_mismatched_passwords_without_calling_backend() {
        let backend = FakeBackend::default();
        let mut console = FakeConsole::new(vec![
            Some("Ada"),
            Some("Lovelace"),
            Some("ada@example.com"),
            Some("one"),
            Some("two"),
        ]);

        let error = signup(&backend, &mut console).expect_err("signup should fail");

        assert_eq!(error.to_string(), "Passwords do not match.");
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn data_commands_require_a_session() {
        let store = InMemorySessionStore::default();

        let error = require_session(&store).expect_err("no session saved");

        assert!(error.to_string().contains("fintrack login"));
    }

    #[test]
    fn wallet_list_prints_rows_and_total() {
        let backend = FakeBackend::default();
        let mut console = FakeConsole::new(Vec::new());

        show_wallets(&backend, &ada(), &mut console).expect("list should succeed");

        assert_eq!(backend.calls(), vec!["list_wallets 7"]);
        assert_eq!(console.output.len(), 2);
        assert!(console.output[0].contains("Main"));
        assert_eq!(console.output[1], "Total balance: $120.00");
    }

    #[test]
    fn wallet_add_announces_after_backend_accepts() {
        let backend = FakeBackend::default();
        let announcements = Announcements::default();
        let mut console = FakeConsole::new(Vec::new());
        let input = NewWalletInput {
            name: "Travel".to_owned(),
            balance: "250".to_owned(),
            wallet_type: Some(WalletType::Cash),
        };

        create_wallet(&backend, &announcements, &ada(), input, &mut console)
            .expect("add should succeed");

        assert_eq!(backend.calls(), vec!["add_wallet 7 Travel"]);
        assert_eq!(*announcements.0.borrow(), vec!["WALLET_UPDATED"]);
        assert_eq!(console.output, vec!["Wallet \"Travel\" added with $250.00."]);
    }

    #[test]
    fn transaction_list_maps_unavailable_backend_to_message() {
        let backend = FakeBackend::default();
        let mut console = FakeConsole::new(Vec::new());

        let error = show_transactions(&backend, &ada(), None, &mut console)
            .expect_err("backend is down");

        assert_eq!(error.to_string(), UNAVAILABLE);
        assert!(console.output.is_empty());
    }

    #[test]
    fn transaction_show_surfaces_rejection_message() {
        let backend = FakeBackend::default();
        let mut console = FakeConsole::new(Vec::new());

        let error = show_transaction(&backend, "99", &mut console).expect_err("missing");

        assert_eq!(error.to_string(), "Transaction does not exist");
    }

    #[test]
    fn transaction_names_resolve_to_backend_ids() {
        let backend = FakeBackend::default();
        let fields = TransactionArgs {
            title: Some("Lunch".to_owned()),
            amount: Some("12.5".to_owned()),
            wallet: Some("main".to_owned()),
            category: Some("food".to_owned()),
            kind: Some("Expense".to_owned()),
            ..TransactionArgs::default()
        };

        let input =
            resolve_transaction_input(&backend, &backend, &ada(), fields).expect("should resolve");

        assert_eq!(input.wallet_id.as_deref(), Some("3"));
        assert_eq!(input.category_id.as_deref(), Some("2"));
        assert_eq!(input.type_id.as_deref(), Some("1"));
    }

    #[test]
    fn unknown_category_is_reported_before_any_mutation() {
        let backend = FakeBackend::default();
        let fields = TransactionArgs {
            category: Some("Travel".to_owned()),
            ..TransactionArgs::default()
        };

        let error = resolve_transaction_input(&backend, &backend, &ada(), fields)
            .expect_err("category does not exist");

        assert!(error.to_string().contains("Unknown category 'Travel'"));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn transaction_add_then_delete_announce_each_success() {
        let backend = FakeBackend::default();
        let announcements = Announcements::default();
        let mut console = FakeConsole::new(Vec::new());
        let input = TransactionInput {
            title: "Lunch".to_owned(),
            amount: "12.5".to_owned(),
            wallet_id: Some("3".to_owned()),
            category_id: Some("2".to_owned()),
            type_id: Some("1".to_owned()),
            ..TransactionInput::default()
        };

        create_transaction(&backend, &announcements, &ada(), input, &mut console)
            .expect("add should succeed");
        remove_transaction(&backend, &announcements, " 5 ", &mut console)
            .expect("delete should succeed");

        assert_eq!(
            backend.calls(),
            vec!["add_transaction 7 3 2 1", "delete_transaction 5"]
        );
        assert_eq!(
            *announcements.0.borrow(),
            vec!["TRANSACTION_UPDATED", "TRANSACTION_UPDATED"]
        );
        assert_eq!(console.output[1], "Transaction #5 deleted.");
    }

    #[test]
    fn invalid_amount_announces_nothing() {
        let backend = FakeBackend::default();
        let announcements = Announcements::default();
        let mut console = FakeConsole::new(Vec::new());
        let input = TransactionInput {
            title: "Lunch".to_owned(),
            amount: "-3".to_owned(),
            wallet_id: Some("3".to_owned()),
            category_id: Some("2".to_owned()),
            type_id: Some("1".to_owned()),
            ..TransactionInput::default()
        };

        let error = update_transaction(&backend, &announcements, &ada(), "5", input, &mut console)
            .expect_err("amount must be positive");

        assert_eq!(
            error.to_string(),
            "Amount must be a number greater than zero."
        );
        assert!(announcements.0.borrow().is_empty());
        assert!(backend.calls().is_empty());
    }

    fn stored_lunch() -> Transaction {
        Transaction {
            id: "5".to_owned(),
            title: "Lunch".to_owned(),
            description: Some("with Bob".to_owned()),
            amount: 12.5,
            category: "Food".to_owned(),
            kind: TransactionKind::Expense,
            wallet_id: Some("3".to_owned()),
            created_at: None,
        }
    }

    #[test]
    fn amount_only_edit_keeps_stored_fields() {
        let backend = FakeBackend {
            stored: Some(stored_lunch()),
            ..FakeBackend::default()
        };
        let announcements = Announcements::default();
        let mut console = FakeConsole::new(Vec::new());
        let fields = TransactionArgs {
            amount: Some("50".to_owned()),
            ..TransactionArgs::default()
        };

        let input = prefilled_edit_input(&backend, &backend, &backend, &ada(), "5", fields)
            .expect("stored transaction should prefill the edit");
        update_transaction(&backend, &announcements, &ada(), "5", input, &mut console)
            .expect("edit should succeed");

        assert_eq!(
            backend.calls(),
            vec![
                "list_wallets 7".to_owned(),
                "edit_transaction 5 Lunch 50 Some(\"with Bob\")".to_owned()
            ]
        );
        assert_eq!(*announcements.0.borrow(), vec!["TRANSACTION_UPDATED"]);
        assert_eq!(console.output, vec!["Transaction #5 updated: \"Lunch\"."]);
    }

    #[test]
    fn edit_flags_override_stored_values() {
        let backend = FakeBackend {
            stored: Some(stored_lunch()),
            ..FakeBackend::default()
        };
        let fields = TransactionArgs {
            title: Some("Dinner".to_owned()),
            description: Some(String::new()),
            ..TransactionArgs::default()
        };

        let input = prefilled_edit_input(&backend, &backend, &backend, &ada(), "5", fields)
            .expect("stored transaction should prefill the edit");

        assert_eq!(input.title, "Dinner");
        assert_eq!(input.description, "");
        assert_eq!(input.amount, "12.5");
        assert_eq!(input.wallet_id.as_deref(), Some("3"));
        assert_eq!(input.category_id.as_deref(), Some("2"));
        assert_eq!(input.type_id.as_deref(), Some("1"));
    }

    #[test]
    fn edit_of_missing_transaction_fails_before_any_mutation() {
        let backend = FakeBackend::default();

        let error = prefilled_edit_input(
            &backend,
            &backend,
            &backend,
            &ada(),
            "99",
            TransactionArgs::default(),
        )
        .expect_err("nothing stored under that id");

        assert_eq!(error.to_string(), "Transaction does not exist");
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn logout_succeeds_when_config_is_broken() {
        let _guard = env_lock();
        let xdg = ScopedXdgConfigHome::new();

        let config_path = xdg.path().join("broken.toml");
        fs::write(&config_path, "[backend]\nrequest_timeout_ms = \"soon\"\n")
            .expect("config fixture should be writable");

        let layout = StorageLayout::resolve().expect("layout should resolve");
        layout.ensure_dirs().expect("layout dirs should be created");
        let store = FileSessionStore::from_layout(&layout);
        store.save(&ada()).expect("session should be written");

        let sessions = logout_session_store(Some(&config_path)).expect("fallback store");
        let mut console = FakeConsole::new(Vec::new());
        logout(&sessions, &mut console).expect("logout should succeed");

        assert!(!layout.session_file().exists());
        assert_eq!(console.output, vec!["Signed out."]);
    }

    #[test]
    fn logout_without_session_is_a_no_op() {
        let store = InMemorySessionStore::default();
        let mut console = FakeConsole::new(Vec::new());

        logout(&store, &mut console).expect("logout should succeed");

        assert_eq!(console.output, vec!["No saved session; nothing to do."]);
    }
}
