pub mod api;
pub mod browser;
pub mod config;
pub mod render;
pub mod reporter;
pub mod state;
pub mod types;

/// Backend base URL when neither config nor environment set one.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// Element id of the trader list container.
pub const TRADER_LIST_ID: &str = "trader-list";

/// Element id of the trade list container.
pub const TRADE_LIST_ID: &str = "trade-list";

/// Element id of the trade panel heading.
pub const TRADE_TITLE_ID: &str = "trade-title";
