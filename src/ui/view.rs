use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    domain::{
        list_state::{ListState, ListUiState},
        transaction::Transaction,
        update_message::RefreshTarget,
        wallet::Wallet,
    },
    usecases::watch::WatchState,
};

use super::{format, styles};

const DETAIL_COLUMN: usize = 14;

pub fn render(frame: &mut Frame<'_>, state: &WatchState) {
    let [header_area, content_area, hint_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    frame.render_widget(Paragraph::new(header_line(state)), header_area);

    match state.screen.targets() {
        [single] => render_panel(frame, content_area, state, *single),
        targets => {
            let [top, bottom] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(content_area);
            if let Some(target) = targets.first() {
                render_panel(frame, top, state, *target);
            }
            if let Some(target) = targets.get(1) {
                render_panel(frame, bottom, state, *target);
            }
        }
    }

    frame.render_widget(Paragraph::new(hint_line()), hint_area);
}

fn render_panel(frame: &mut Frame<'_>, area: Rect, state: &WatchState, target: RefreshTarget) {
    let (title, lines) = match target {
        RefreshTarget::Wallets => (
            format!("Wallets ({})", state.wallets.items().len()),
            wallet_panel_lines(state),
        ),
        RefreshTarget::Transactions => (
            format!("Transactions ({})", state.transactions.items().len()),
            transaction_panel_lines(state),
        ),
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(styles::panel_border_style()),
    );
    frame.render_widget(panel, area);
}

fn header_line(state: &WatchState) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("fintrack / {}", state.screen.as_label()),
            styles::screen_title_style(),
        ),
        Span::raw("  "),
        Span::styled(state.user.display_name(), styles::user_name_style()),
        Span::raw("  "),
        Span::styled(
            state.phase.as_label().to_owned(),
            styles::phase_style(state.phase),
        ),
    ])
}

fn hint_line() -> Line<'static> {
    Line::from(Span::styled("q / Esc: quit   w / t: refresh wallets / transactions", styles::hint_style()))
}

fn wallet_panel_lines(state: &WatchState) -> Vec<Line<'static>> {
    let mut lines = list_notice(&state.wallets, "wallets");
    if !lines.is_empty() && state.wallets.items().is_empty() {
        return lines;
    }

    lines.extend(state.wallets.items().iter().map(wallet_line));
    lines.push(Line::from(vec![
        Span::raw("Total balance: "),
        Span::styled(
            format::format_money(state.wallet_total),
            styles::total_style(state.wallet_total),
        ),
    ]));
    lines
}

fn transaction_panel_lines(state: &WatchState) -> Vec<Line<'static>> {
    let mut lines = vec![totals_line(state)];
    let notice = list_notice(&state.transactions, "transactions");
    let stale_or_missing = !notice.is_empty();
    lines.extend(notice);
    if stale_or_missing && state.transactions.items().is_empty() {
        return lines;
    }

    lines.extend(state.transactions.items().iter().map(transaction_line));
    lines
}

/// Placeholder or warning shown above the rows for non-ready lists.
fn list_notice<T>(list: &ListState<T>, noun: &str) -> Vec<Line<'static>> {
    let text = match list.ui_state() {
        ListUiState::Ready => return Vec::new(),
        ListUiState::Loading => format!("Loading {noun}..."),
        ListUiState::Empty => format!("No {noun} yet."),
        ListUiState::Error if list.items().is_empty() => {
            format!("Failed to load {noun}. Check connection.")
        }
        ListUiState::Error => "Refresh failed; showing last known data.".to_owned(),
    };

    vec![Line::from(Span::styled(text, styles::placeholder_style()))]
}

fn totals_line(state: &WatchState) -> Line<'static> {
    let totals = &state.totals;
    Line::from(vec![
        Span::raw("Net "),
        Span::styled(
            format::format_money(totals.net_balance),
            styles::total_style(totals.net_balance),
        ),
        Span::styled("  month income ", styles::item_detail_style()),
        Span::raw(format::format_money(totals.month_income)),
        Span::styled("  month expenses ", styles::item_detail_style()),
        Span::raw(format::format_money(totals.month_expenses)),
    ])
}

fn wallet_line(wallet: &Wallet) -> Line<'static> {
    Line::from(vec![
        Span::styled("● ", styles::wallet_accent_style(wallet.color())),
        Span::styled(format::fit(&wallet.name, 24), styles::item_name_style()),
        Span::raw(" "),
        Span::styled(format::fit(wallet.icon(), 7), styles::item_detail_style()),
        Span::raw(format::format_money(wallet.balance)),
    ])
}

fn transaction_line(transaction: &Transaction) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format::fit(&transaction.title, 24),
            styles::item_name_style(),
        ),
        Span::raw(" "),
        Span::styled(
            format::fit(&transaction.category, DETAIL_COLUMN),
            styles::item_detail_style(),
        ),
        Span::raw(" "),
        Span::styled(
            format::format_signed_amount(transaction),
            styles::amount_style(transaction.kind),
        ),
        Span::raw(" "),
        Span::styled(
            format::format_date(transaction.created_at),
            styles::item_detail_style(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            channel_status::ChannelPhase, session::UserSession, transaction::TransactionKind,
        },
        usecases::screen::ScreenKind,
    };

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn lines_to_strings(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_to_string).collect()
    }

    fn state(screen: ScreenKind) -> WatchState {
        WatchState::for_screen(
            screen,
            UserSession {
                id: "7".to_owned(),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                email: "ada@example.com".to_owned(),
            },
        )
    }

    fn salary() -> Transaction {
        Transaction {
            id: "1".to_owned(),
            title: "Salary".to_owned(),
            description: None,
            amount: 5000.0,
            category: "Income".to_owned(),
            kind: TransactionKind::Income,
            wallet_id: None,
            created_at: None,
        }
    }

    #[test]
    fn header_shows_screen_user_and_link_phase() {
        let mut watch = state(ScreenKind::Home);
        watch.phase = ChannelPhase::Open;

        let header = line_to_string(&header_line(&watch));

        assert!(header.contains("fintrack / home"));
        assert!(header.contains("Ada Lovelace"));
        assert!(header.contains("LIVE_OPEN"));
    }

    #[test]
    fn loading_wallets_render_placeholder_only() {
        let watch = state(ScreenKind::Wallets);

        let lines = lines_to_strings(&wallet_panel_lines(&watch));

        assert_eq!(lines, vec!["Loading wallets...".to_owned()]);
    }

    #[test]
    fn ready_wallets_end_with_total() {
        let mut watch = state(ScreenKind::Wallets);
        watch.wallets.set_ready(vec![Wallet {
            id: "1".to_owned(),
            name: "Cash".to_owned(),
            balance: 40.0,
            wallet_type: None,
        }]);
        watch.wallet_total = 40.0;

        let lines = lines_to_strings(&wallet_panel_lines(&watch));

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("● Cash"));
        assert!(lines[0].ends_with("$40.00"));
        assert_eq!(lines[1], "Total balance: $40.00");
    }

    #[test]
    fn failed_refresh_keeps_last_transactions_visible() {
        let mut watch = state(ScreenKind::Expenses);
        watch.transactions.set_ready(vec![salary()]);
        watch.transactions.set_error();

        let lines = lines_to_strings(&transaction_panel_lines(&watch));

        assert!(lines[0].starts_with("Net $0.00"));
        assert_eq!(lines[1], "Refresh failed; showing last known data.");
        assert!(lines[2].contains("+ $5000.00"));
    }

    #[test]
    fn empty_transactions_show_totals_and_placeholder() {
        let mut watch = state(ScreenKind::Expenses);
        watch.transactions.set_ready(Vec::new());

        let lines = lines_to_strings(&transaction_panel_lines(&watch));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "No transactions yet.");
    }
}
