//! Foreground loop of a focused screen: fetch what the screen shows, then
//! re-fetch one list per matching update until asked to quit.

use std::{
    sync::mpsc::{Receiver, Sender},
    time::Duration,
};

use anyhow::Result;
use chrono::Local;

use crate::{
    domain::{
        channel_status::ChannelPhase,
        events::ScreenEvent,
        list_state::ListState,
        session::UserSession,
        transaction::{Transaction, TransactionTotals},
        update_message::RefreshTarget,
        wallet::Wallet,
    },
    usecases::{
        contracts::{TransactionSource, WalletSource},
        list_transactions::{list_transactions, ListTransactionsQuery},
        list_wallets::list_wallets,
        screen::{LiveScreen, ScreenKind},
    },
};

const WATCH_REFRESH_FAILED: &str = "WATCH_REFRESH_FAILED";
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything a renderer needs to draw the focused screen.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchState {
    pub screen: ScreenKind,
    pub user: UserSession,
    pub phase: ChannelPhase,
    pub wallets: ListState<Wallet>,
    pub wallet_total: f64,
    pub transactions: ListState<Transaction>,
    pub totals: TransactionTotals,
    running: bool,
}

impl WatchState {
    /// Initial state before the first fetch: both lists loading.
    pub fn for_screen(screen: ScreenKind, user: UserSession) -> Self {
        Self {
            screen,
            user,
            phase: ChannelPhase::Unconnected,
            wallets: ListState::default(),
            wallet_total: 0.0,
            transactions: ListState::default(),
            totals: TransactionTotals::default(),
            running: true,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

pub trait ScreenRenderer {
    fn render(&mut self, state: &WatchState) -> Result<()>;
}

/// User commands for the focused screen.
pub trait ScreenInput {
    /// Waits at most `timeout` for the next command.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<ScreenEvent>>;
}

pub struct WatchSession<'a> {
    screen: LiveScreen,
    wallets: &'a dyn WalletSource,
    transactions: &'a dyn TransactionSource,
    state: WatchState,
}

impl<'a> WatchSession<'a> {
    pub fn new(
        screen: LiveScreen,
        user: UserSession,
        wallets: &'a dyn WalletSource,
        transactions: &'a dyn TransactionSource,
    ) -> Self {
        let state = WatchState::for_screen(screen.kind(), user);
        Self {
            screen,
            wallets,
            transactions,
            state,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Focuses the screen, runs until the user quits, then blurs the screen.
    /// `events` receives the refresh requests forwarded through `sender`.
    pub fn run(
        &mut self,
        events: Receiver<ScreenEvent>,
        sender: Sender<ScreenEvent>,
        input: &mut dyn ScreenInput,
        renderer: &mut dyn ScreenRenderer,
    ) -> Result<()> {
        self.screen.on_focus(sender);
        let outcome = self.event_loop(&events, input, renderer);
        self.screen.on_blur();
        outcome
    }

    pub fn handle_event(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::Refresh(target) if self.state.screen.watches(target) => {
                self.refresh(target)
            }
            ScreenEvent::Refresh(_) => {}
            ScreenEvent::ChannelChanged(phase) => self.state.phase = phase,
            ScreenEvent::QuitRequested => self.state.running = false,
        }
    }

    pub fn refresh(&mut self, target: RefreshTarget) {
        let user_id = self.state.user.id.clone();

        match target {
            RefreshTarget::Wallets => {
                self.state.wallets.set_loading();
                match list_wallets(self.wallets, &user_id) {
                    Ok(output) => {
                        self.state.wallet_total = output.total_balance;
                        self.state.wallets.set_ready(output.wallets);
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = WATCH_REFRESH_FAILED,
                            target = target.as_label(),
                            error = ?error,
                            "list refresh failed"
                        );
                        self.state.wallets.set_error();
                    }
                }
            }
            RefreshTarget::Transactions => {
                self.state.transactions.set_loading();
                let query = ListTransactionsQuery::default();
                match list_transactions(self.transactions, &user_id, &query, Local::now()) {
                    Ok(output) => {
                        self.state.totals = output.totals;
                        self.state.transactions.set_ready(output.transactions);
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = WATCH_REFRESH_FAILED,
                            target = target.as_label(),
                            error = ?error,
                            "list refresh failed"
                        );
                        self.state.transactions.set_error();
                    }
                }
            }
        }
    }

    fn event_loop(
        &mut self,
        events: &Receiver<ScreenEvent>,
        input: &mut dyn ScreenInput,
        renderer: &mut dyn ScreenRenderer,
    ) -> Result<()> {
        for target in self.state.screen.targets() {
            self.refresh(*target);
        }
        self.state.phase = self.screen.channel().phase();
        renderer.render(&self.state)?;

        while self.state.running {
            let mut changed = false;

            while let Ok(event) = events.try_recv() {
                self.handle_event(event);
                changed = true;
            }

            let phase = self.screen.channel().phase();
            if phase != self.state.phase {
                self.handle_event(ScreenEvent::ChannelChanged(phase));
                changed = true;
            }

            if let Some(event) = input.next_event(INPUT_POLL_INTERVAL)? {
                self.handle_event(event);
                changed = true;
            }

            if changed && self.state.running {
                renderer.render(&self.state)?;
            }
        }

        Ok(())
    }
}
