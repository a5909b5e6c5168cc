//! Style definitions for the watch screen.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{channel_status::ChannelPhase, transaction::TransactionKind};

// =============================================================================
// Header and status styles
// =============================================================================

/// Style for the screen title in the header.
pub fn screen_title_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn user_name_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Live-link indicator, colored by phase.
pub fn phase_style(phase: ChannelPhase) -> Style {
    match phase {
        ChannelPhase::Open => Style::default().fg(Color::Green),
        ChannelPhase::Connecting => Style::default().fg(Color::Yellow),
        ChannelPhase::Unconnected | ChannelPhase::Closed => Style::default().fg(Color::Red),
    }
}

pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// List styles
// =============================================================================

pub fn panel_border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Style for wallet and transaction names (bold, bright).
pub fn item_name_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for secondary columns such as category and date.
pub fn item_detail_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Marker color for a wallet, parsed from its `#rrggbb` accent.
pub fn wallet_accent_style(hex: &str) -> Style {
    let color = hex.parse::<Color>().unwrap_or(Color::White);
    Style::default().fg(color)
}

pub fn amount_style(kind: TransactionKind) -> Style {
    match kind {
        TransactionKind::Income => Style::default().fg(Color::Green),
        TransactionKind::Expense => Style::default().fg(Color::Red),
    }
}

/// Total rows; red when the figure is negative.
pub fn total_style(value: f64) -> Style {
    let color = if value < 0.0 { Color::Red } else { Color::Green };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
