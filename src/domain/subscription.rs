use serde::{Deserialize, Serialize};

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Hash, Eq, PartialEq, Default, clap::ValueEnum,
)]
pub enum Exchange {
    #[default]
    #[value(name = "BSE")]
    Bse,
    #[value(name = "NSE")]
    Nse,
}

impl Exchange {
    pub fn code(&self) -> &'static str {
        match self {
            Exchange::Bse => "BSE",
            Exchange::Nse => "NSE",
        }
    }
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Hash, Eq, PartialEq, Default, clap::ValueEnum,
)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Identity of one chart instance. Any change to it tears down and rebuilds
/// the drawing surface.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct Subscription {
    pub symbol: String,
    /// Numeric exchange code used by the history endpoint to resolve symbols
    pub scrip_code: Option<String>,
    pub exchange: Exchange,
    pub theme: Theme,
}

impl Subscription {
    pub fn new(symbol: impl Into<String>, exchange: Exchange, theme: Theme) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            scrip_code: None,
            exchange,
            theme,
        }
    }

    pub fn with_scrip_code(mut self, scrip_code: impl Into<String>) -> Self {
        let code = scrip_code.into();
        self.scrip_code = if code.trim().is_empty() { None } else { Some(code.trim().to_string()) };
        self
    }

    /// Tradeable symbols are `[A-Za-z0-9&-]+` and not purely numeric
    /// (a bare scrip code cannot be charted by symbol).
    pub fn is_valid_symbol(symbol: &str) -> bool {
        !symbol.is_empty()
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '&' || c == '-')
            && !symbol.chars().all(|c| c.is_ascii_digit())
    }

    pub fn has_valid_symbol(&self) -> bool {
        Self::is_valid_symbol(&self.symbol)
    }

    /// `EXCHANGE:SYMBOL`, as used by external chart viewers.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.exchange.code(), self.symbol)
    }

    /// Same data source (symbol + exchange), regardless of theme.
    pub fn same_source(&self, other: &Subscription) -> bool {
        self.symbol == other.symbol
            && self.exchange == other.exchange
            && self.scrip_code == other.scrip_code
    }
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({:?} theme)", self.qualified_name(), self.theme)
    }
}
