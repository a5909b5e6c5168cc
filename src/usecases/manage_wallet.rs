//! Adding a wallet, announced to other screens once the backend accepts it.

use crate::{
    domain::{update_message::UpdateMessage, wallet::WalletType},
    usecases::contracts::{SourceError, UpdateAnnouncer, WalletWriter},
};

const WALLET_ADDED: &str = "WALLET_ADDED";
const WALLET_ADD_FAILED: &str = "WALLET_ADD_FAILED";

/// Wallet form as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWalletInput {
    pub name: String,
    pub balance: String,
    pub wallet_type: Option<WalletType>,
}

/// Validated wallet sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWallet {
    pub name: String,
    pub balance: f64,
    pub wallet_type: WalletType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddWalletError {
    MissingName,
    InvalidBalance,
    MissingWalletType,
    Rejected { message: String },
    TemporarilyUnavailable,
    DataContractViolation,
}

pub fn add_wallet(
    writer: &dyn WalletWriter,
    announcer: &dyn UpdateAnnouncer,
    user_id: &str,
    input: NewWalletInput,
) -> Result<NewWallet, AddWalletError> {
    let wallet = validate(input)?;

    if let Err(error) = writer.add_wallet(user_id, &wallet) {
        tracing::warn!(code = WALLET_ADD_FAILED, error = ?error, "wallet was not added");
        return Err(map_source_error(error));
    }

    tracing::info!(
        code = WALLET_ADDED,
        wallet_type = wallet.wallet_type.as_wire(),
        "wallet added"
    );
    announcer.announce(&UpdateMessage::WalletUpdated);

    Ok(wallet)
}

fn validate(input: NewWalletInput) -> Result<NewWallet, AddWalletError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AddWalletError::MissingName);
    }

    let balance = input
        .balance
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(AddWalletError::InvalidBalance)?;

    let wallet_type = input.wallet_type.ok_or(AddWalletError::MissingWalletType)?;

    Ok(NewWallet {
        name: name.to_owned(),
        balance,
        wallet_type,
    })
}

fn map_source_error(error: SourceError) -> AddWalletError {
    match error {
        SourceError::Rejected { message } => AddWalletError::Rejected { message },
        SourceError::Unavailable => AddWalletError::TemporarilyUnavailable,
        SourceError::InvalidData => AddWalletError::DataContractViolation,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records writer calls and announcements in one timeline.
    #[derive(Default)]
    struct Recorder {
        result: Option<SourceError>,
        timeline: RefCell<Vec<String>>,
    }

    impl WalletWriter for Recorder {
        fn add_wallet(&self, user_id: &str, wallet: &NewWallet) -> Result<(), SourceError> {
            self.timeline
                .borrow_mut()
                .push(format!("add:{user_id}:{}", wallet.name));
            match &self.result {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        }
    }

    impl UpdateAnnouncer for Recorder {
        fn announce(&self, message: &UpdateMessage) {
            self.timeline
                .borrow_mut()
                .push(format!("announce:{}", message.tag()));
        }
    }

    fn input() -> NewWalletInput {
        NewWalletInput {
            name: " Travel ".to_owned(),
            balance: "250.75".to_owned(),
            wallet_type: Some(WalletType::Card),
        }
    }

    #[test]
    fn announces_wallet_update_after_successful_add() {
        let recorder = Recorder::default();

        let wallet = add_wallet(&recorder, &recorder, "7", input()).expect("add should succeed");

        assert_eq!(wallet.name, "Travel");
        assert_eq!(wallet.balance, 250.75);
        assert_eq!(
            *recorder.timeline.borrow(),
            vec!["add:7:Travel".to_owned(), "announce:WALLET_UPDATED".to_owned()]
        );
    }

    #[test]
    fn failed_add_announces_nothing() {
        let recorder = Recorder {
            result: Some(SourceError::Rejected {
                message: "Wallet name already exists".to_owned(),
            }),
            ..Recorder::default()
        };

        let err = add_wallet(&recorder, &recorder, "7", input()).expect_err("must fail");

        assert_eq!(
            err,
            AddWalletError::Rejected {
                message: "Wallet name already exists".to_owned()
            }
        );
        assert_eq!(*recorder.timeline.borrow(), vec!["add:7:Travel".to_owned()]);
    }

    #[test]
    fn rejects_blank_name() {
        let recorder = Recorder::default();
        let mut input = input();
        input.name = "  ".to_owned();

        let err = add_wallet(&recorder, &recorder, "7", input).expect_err("must fail");

        assert_eq!(err, AddWalletError::MissingName);
        assert!(recorder.timeline.borrow().is_empty());
    }

    #[test]
    fn rejects_non_numeric_balance() {
        let recorder = Recorder::default();

        for balance in ["", "ten", "NaN", "inf"] {
            let mut input = input();
            input.balance = balance.to_owned();

            let err = add_wallet(&recorder, &recorder, "7", input).expect_err("must fail");

            assert_eq!(err, AddWalletError::InvalidBalance, "balance {balance:?}");
        }
        assert!(recorder.timeline.borrow().is_empty());
    }

    #[test]
    fn requires_wallet_type() {
        let recorder = Recorder::default();
        let mut input = input();
        input.wallet_type = None;

        let err = add_wallet(&recorder, &recorder, "7", input).expect_err("must fail");

        assert_eq!(err, AddWalletError::MissingWalletType);
    }
}
