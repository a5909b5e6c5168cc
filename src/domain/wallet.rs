const WALLET_COLORS: [&str; 5] = ["#10b981", "#3b82f6", "#f59e0b", "#ef4444", "#8b5cf6"];

/// Kind of money container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalletType {
    #[default]
    Cash,
    Card,
}

impl WalletType {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CASH" => Some(Self::Cash),
            "CARD" => Some(Self::Card),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    pub id: String,
    pub name: String,
    pub balance: f64,
    /// `None` when the backend reports a type this client does not know.
    pub wallet_type: Option<WalletType>,
}

impl Wallet {
    /// Display color, stable per wallet id.
    pub fn color(&self) -> &'static str {
        let hash = self
            .id
            .bytes()
            .fold(0usize, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as usize));
        WALLET_COLORS[hash % WALLET_COLORS.len()]
    }

    pub fn icon(&self) -> &'static str {
        self.wallet_type.map(WalletType::icon).unwrap_or("wallet")
    }
}

pub fn total_balance(wallets: &[Wallet]) -> f64 {
    wallets.iter().map(|wallet| wallet.balance).sum()
}
