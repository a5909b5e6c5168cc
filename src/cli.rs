use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{domain::wallet::WalletType, usecases::screen::ScreenKind};

#[derive(Debug, Parser)]
#[command(name = "fintrack", about = "Personal finance tracker with live refresh (CLI + TUI)")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch a screen that refreshes when other clients change data
    Watch {
        #[arg(long, value_enum, default_value_t = ScreenArg::Home)]
        screen: ScreenArg,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Signup,
    /// Forget the saved session
    Logout,
    #[command(subcommand)]
    Wallet(WalletCommand),
    #[command(subcommand)]
    Transaction(TransactionCommand),
    /// List transaction categories and types
    Categories,
}

#[derive(Debug, Clone, Subcommand)]
pub enum WalletCommand {
    /// List wallets with the total balance
    List,
    /// Add a wallet
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        balance: String,
        #[arg(long = "type", value_enum)]
        wallet_type: Option<WalletTypeArg>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum TransactionCommand {
    /// List transactions with totals
    List {
        /// Filter by title, description or category
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one transaction
    Show { id: String },
    /// Add a transaction
    Add(TransactionArgs),
    /// Change a transaction; fields left out keep their stored values
    Edit {
        id: String,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction
    Delete { id: String },
}

/// Transaction fields; wallet, category and type accept an id or a name.
#[derive(Debug, Clone, Default, Args)]
pub struct TransactionArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,
    #[arg(long)]
    pub wallet: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenArg {
    Home,
    Wallets,
    Expenses,
}

impl From<ScreenArg> for ScreenKind {
    fn from(value: ScreenArg) -> Self {
        match value {
            ScreenArg::Home => Self::Home,
            ScreenArg::Wallets => Self::Wallets,
            ScreenArg::Expenses => Self::Expenses,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WalletTypeArg {
    Cash,
    Card,
}

impl From<WalletTypeArg> for WalletType {
    fn from(value: WalletTypeArg) -> Self {
        match value {
            WalletTypeArg::Cash => Self::Cash,
            WalletTypeArg::Card => Self::Card,
        }
    }
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Watch {
            screen: ScreenArg::Home,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults_to_watching_home_when_command_is_missing() {
        let cli = Cli::parse_from(["fintrack"]);

        assert!(matches!(
            cli.command_or_default(),
            Command::Watch {
                screen: ScreenArg::Home
            }
        ));
    }

    #[test]
    fn parses_watch_screen_and_global_config() {
        let cli = Cli::parse_from(["fintrack", "watch", "--screen", "expenses", "--config", "f.toml"]);

        assert!(matches!(
            cli.command_or_default(),
            Command::Watch {
                screen: ScreenArg::Expenses
            }
        ));
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("f.toml".to_owned())
        );
    }

    #[test]
    fn parses_wallet_add_with_negative_balance() {
        let cli = Cli::parse_from([
            "fintrack", "wallet", "add", "--name", "Loan", "--balance", "-20", "--type", "card",
        ]);

        match cli.command_or_default() {
            Command::Wallet(WalletCommand::Add {
                name,
                balance,
                wallet_type,
            }) => {
                assert_eq!(name, "Loan");
                assert_eq!(balance, "-20");
                assert_eq!(wallet_type, Some(WalletTypeArg::Card));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_transaction_edit_fields() {
        let cli = Cli::parse_from([
            "fintrack",
            "transaction",
            "edit",
            "42",
            "--title",
            "Rent",
            "--amount",
            "900",
            "--wallet",
            "Main",
            "--category",
            "Housing",
            "--type",
            "expense",
        ]);

        match cli.command_or_default() {
            Command::Transaction(TransactionCommand::Edit { id, fields }) => {
                assert_eq!(id, "42");
                assert_eq!(fields.title.as_deref(), Some("Rent"));
                assert_eq!(fields.description, None);
                assert_eq!(fields.amount.as_deref(), Some("900"));
                assert_eq!(fields.wallet.as_deref(), Some("Main"));
                assert_eq!(fields.kind.as_deref(), Some("expense"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn screen_and_wallet_type_args_map_to_domain() {
        assert_eq!(ScreenKind::from(ScreenArg::Wallets), ScreenKind::Wallets);
        assert_eq!(WalletType::from(WalletTypeArg::Cash), WalletType::Cash);
    }
}
