//! Trader browser orchestration: fetch, select, render into panels.
//!
//! A render cycle fetches the trader list, settles the selection, renders the
//! trader cards and then the selected trader's trades. Card clicks re-run the
//! whole cycle. Every mutating call takes `&mut self`, so cycles on one
//! browser never overlap; a click issued during a load runs after it.

use tracing::{debug, info, warn};

use crate::api::{RequestError, TraderApi};
use crate::render::{
    NO_TRADERS_HTML, NO_TRADES_HTML, TRADERS_FAILED_HTML, TRADES_FAILED_HTML, render_page,
    render_trade_list, render_trader_list, trade_title,
};
use crate::state::Selection;
use crate::types::Trader;

/// The three host containers the browser renders into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panels {
    /// HTML for the trader list container.
    pub trader_list: String,
    /// HTML for the trade list container.
    pub trade_list: String,
    /// Plain text for the trade panel heading.
    pub trade_title: String,
}

impl Panels {
    /// Standalone HTML document with all three panels.
    pub fn to_document(&self) -> String {
        render_page(&self.trader_list, &self.trade_title, &self.trade_list)
    }
}

/// Result of loading one panel. Both load paths report through this type.
#[derive(Debug)]
pub enum LoadOutcome {
    Rendered { count: usize },
    Empty,
    Failed(RequestError),
}

impl LoadOutcome {
    /// Whether the load ended in a request failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }

    /// Short name used in render reports.
    pub fn label(&self) -> &'static str {
        match self {
            LoadOutcome::Rendered { .. } => "rendered",
            LoadOutcome::Empty => "empty",
            LoadOutcome::Failed(_) => "failed",
        }
    }

    /// Number of items rendered; zero unless `Rendered`.
    pub fn count(&self) -> usize {
        match self {
            LoadOutcome::Rendered { count } => *count,
            _ => 0,
        }
    }
}

/// What one render cycle did to each panel. `trades` is `None` when the
/// cycle stopped before a trade fetch was issued.
#[derive(Debug)]
pub struct CycleReport {
    pub traders: LoadOutcome,
    pub trades: Option<LoadOutcome>,
}

/// Owns the selection and the panels, and drives every render cycle.
pub struct TraderBrowser<A> {
    api: A,
    selection: Selection,
    panels: Panels,
    /// Trader list from the last successful fetch.
    traders: Vec<Trader>,
    refetch_on_select: bool,
}

impl<A: TraderApi> TraderBrowser<A> {
    /// Browser with nothing selected yet.
    pub fn new(api: A) -> Self {
        Self::with_selection(api, Selection::new())
    }

    /// Browser starting from an existing selection, e.g. one given on the command line.
    pub fn with_selection(api: A, selection: Selection) -> Self {
        Self {
            api,
            selection,
            panels: Panels::default(),
            traders: Vec::new(),
            refetch_on_select: true,
        }
    }

    /// When disabled, clicks re-render the cached trader list instead of
    /// fetching it again. Trades are always fetched.
    pub fn refetch_on_select(mut self, enabled: bool) -> Self {
        self.refetch_on_select = enabled;
        self
    }

    /// Current panel contents.
    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Trader list from the last successful load.
    pub fn traders(&self) -> &[Trader] {
        &self.traders
    }

    /// Full render cycle starting from a fresh trader list fetch.
    pub async fn load_traders(&mut self) -> CycleReport {
        match self.api.traders().await {
            Ok(traders) => self.show_traders(traders).await,
            Err(e) => {
                warn!("Failed to load traders: {e}");
                self.panels.trader_list = TRADERS_FAILED_HTML.to_string();
                CycleReport {
                    traders: LoadOutcome::Failed(e),
                    trades: None,
                }
            }
        }
    }

    /// Card click: select `address`, then re-run the render cycle.
    pub async fn click(&mut self, address: &str) -> CycleReport {
        info!("Selected trader {address}");
        self.selection.select(address);
        if self.refetch_on_select || self.traders.is_empty() {
            self.load_traders().await
        } else {
            let traders = std::mem::take(&mut self.traders);
            self.show_traders(traders).await
        }
    }

    async fn show_traders(&mut self, traders: Vec<Trader>) -> CycleReport {
        let Some(first) = traders.first() else {
            debug!("Trader list is empty");
            self.panels.trader_list = NO_TRADERS_HTML.to_string();
            self.panels.trade_list.clear();
            self.traders.clear();
            return CycleReport {
                traders: LoadOutcome::Empty,
                trades: None,
            };
        };

        let address = self.selection.select_if_unset(&first.address).to_string();

        self.panels.trader_list = render_trader_list(&traders, &self.selection);
        let count = traders.len();

        let trades = self.load_trades(&address, Some(&traders)).await;
        self.traders = traders;

        CycleReport {
            traders: LoadOutcome::Rendered { count },
            trades: Some(trades),
        }
    }

    /// Render the trade panel for `address`. Without a supplied trader list
    /// the list is fetched to resolve the heading.
    pub async fn load_trades(&mut self, address: &str, traders: Option<&[Trader]>) -> LoadOutcome {
        let fetched;
        let known = match traders {
            Some(list) => list,
            None => match self.api.traders().await {
                Ok(list) => {
                    fetched = list;
                    &fetched[..]
                }
                Err(e) => return self.trades_failed(address, e),
            },
        };

        let title = known
            .iter()
            .find(|t| t.address == address)
            .map(Trader::label)
            .unwrap_or_else(|| address.to_string());
        self.panels.trade_title = trade_title(&title);

        match self.api.trades(address).await {
            Ok(trades) if trades.is_empty() => {
                self.panels.trade_list = NO_TRADES_HTML.to_string();
                LoadOutcome::Empty
            }
            Ok(trades) => {
                self.panels.trade_list = render_trade_list(&trades);
                LoadOutcome::Rendered {
                    count: trades.len(),
                }
            }
            Err(e) => self.trades_failed(address, e),
        }
    }

    fn trades_failed(&mut self, address: &str, e: RequestError) -> LoadOutcome {
        warn!("Failed to load trades for {address}: {e}");
        self.panels.trade_list = TRADES_FAILED_HTML.to_string();
        LoadOutcome::Failed(e)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::types::Trade;

    /// In-memory backend that records every request.
    #[derive(Default)]
    struct FakeApi {
        traders: RefCell<Vec<Trader>>,
        trades: HashMap<String, Vec<Trade>>,
        traders_status: Option<u16>,
        trades_status: Option<u16>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn with_traders(traders: Vec<Trader>) -> Self {
            Self {
                traders: RefCell::new(traders),
                ..Default::default()
            }
        }

        fn trades_for(mut self, address: &str, trades: Vec<Trade>) -> Self {
            self.trades.insert(address.to_string(), trades);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl TraderApi for &FakeApi {
        async fn traders(&self) -> Result<Vec<Trader>, RequestError> {
            self.calls.borrow_mut().push("traders".into());
            if let Some(status) = self.traders_status {
                return Err(RequestError::Status {
                    status,
                    url: "/api/traders".into(),
                });
            }
            Ok(self.traders.borrow().clone())
        }

        async fn trades(&self, address: &str) -> Result<Vec<Trade>, RequestError> {
            self.calls.borrow_mut().push(format!("trades:{address}"));
            if let Some(status) = self.trades_status {
                return Err(RequestError::Status {
                    status,
                    url: format!("/api/traders/{address}/trades"),
                });
            }
            Ok(self.trades.get(address).cloned().unwrap_or_default())
        }
    }

    fn trader(address: &str, username: &str) -> Trader {
        Trader {
            address: address.into(),
            username: Some(json!(username)),
            ..Default::default()
        }
    }

    fn sample_trade() -> Trade {
        serde_json::from_value(json!({
            "market_question": "Will X happen?",
            "outcome": "Yes",
            "price": "0.62",
            "amount": "100",
            "timestamp": "2024-01-01T00:00:00Z",
            "tx_hash": "0xdead"
        }))
        .unwrap()
    }

    fn active_address(panels: &Panels) -> Option<String> {
        let marker = r#"class="trader-card active" data-address=""#;
        let start = panels.trader_list.find(marker)? + marker.len();
        let end = panels.trader_list[start..].find('"')? + start;
        Some(panels.trader_list[start..end].to_string())
    }

    #[tokio::test]
    async fn empty_trader_list_shows_empty_states_without_trade_fetch() {
        let api = FakeApi::default();
        let mut browser = TraderBrowser::new(&api);
        let report = browser.load_traders().await;

        assert!(matches!(report.traders, LoadOutcome::Empty));
        assert!(report.trades.is_none());
        assert_eq!(browser.panels().trader_list, NO_TRADERS_HTML);
        assert_eq!(browser.panels().trade_list, "");
        assert_eq!(browser.selection().address(), None);
        assert_eq!(api.calls(), vec!["traders"]);
    }

    #[tokio::test]
    async fn first_trader_selected_and_marked_active() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice"), trader("0xdef", "bob")]);
        let mut browser = TraderBrowser::new(&api);
        let report = browser.load_traders().await;

        assert_eq!(report.traders.count(), 2);
        assert_eq!(browser.selection().address(), Some("0xabc"));
        assert_eq!(active_address(browser.panels()).as_deref(), Some("0xabc"));
        assert_eq!(browser.panels().trader_list.matches("trader-card active").count(), 1);
        // list passed through, no second trader fetch
        assert_eq!(api.calls(), vec!["traders", "trades:0xabc"]);
    }

    #[tokio::test]
    async fn cards_keep_backend_order() {
        let api = FakeApi::with_traders(vec![trader("0xzzz", "zed"), trader("0xaaa", "amy")]);
        let mut browser = TraderBrowser::new(&api);
        browser.load_traders().await;

        let html = &browser.panels().trader_list;
        assert!(html.find("0xzzz").unwrap() < html.find("0xaaa").unwrap());
    }

    #[tokio::test]
    async fn renders_selected_trader_trades() {
        let api = FakeApi::with_traders(vec![trader("0xABC", "alice")])
            .trades_for("0xABC", vec![sample_trade()]);
        let mut browser = TraderBrowser::new(&api);
        let outcome = browser.load_trades("0xABC", None).await;

        assert_eq!(outcome.count(), 1);
        let panels = browser.panels();
        assert_eq!(panels.trade_title, "Trades • alice");
        assert!(panels.trade_list.contains("<h4>Will X happen?</h4>"));
        assert!(panels.trade_list.contains("<strong>Outcome</strong><br/>Yes"));
        assert!(panels.trade_list.contains("<strong>Price</strong><br/>0.62"));
        assert!(panels.trade_list.contains("<strong>Size</strong><br/>100"));
        assert!(panels.trade_list.contains("<strong>Amount</strong><br/>100"));
        assert!(panels.trade_list.contains("<strong>Tx</strong><br/>0xdead"));
        assert_eq!(api.calls(), vec!["traders", "trades:0xABC"]);
    }

    #[tokio::test]
    async fn unknown_trader_title_is_raw_address() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice")]);
        let mut browser = TraderBrowser::new(&api);
        let outcome = browser.load_trades("0x999", Some(&[])).await;

        assert!(matches!(outcome, LoadOutcome::Empty));
        assert_eq!(browser.panels().trade_title, "Trades • 0x999");
        assert_eq!(browser.panels().trade_list, NO_TRADES_HTML);
        assert_eq!(api.calls(), vec!["trades:0x999"]);
    }

    #[tokio::test]
    async fn click_reselects_refetches_and_replaces_trades() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice"), trader("0xdef", "bob")])
            .trades_for("0xabc", vec![sample_trade()]);
        let mut browser = TraderBrowser::new(&api);
        browser.load_traders().await;
        assert!(browser.panels().trade_list.contains("Will X happen?"));

        let report = browser.click("0xdef").await;

        assert_eq!(browser.selection().address(), Some("0xdef"));
        assert_eq!(active_address(browser.panels()).as_deref(), Some("0xdef"));
        assert_eq!(browser.panels().trade_title, "Trades • bob");
        assert_eq!(browser.panels().trade_list, NO_TRADES_HTML);
        assert!(matches!(report.trades, Some(LoadOutcome::Empty)));
        assert_eq!(
            api.calls(),
            vec!["traders", "trades:0xabc", "traders", "trades:0xdef"]
        );
    }

    #[tokio::test]
    async fn click_picks_up_newly_arrived_traders() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice")]);
        let mut browser = TraderBrowser::new(&api);
        browser.load_traders().await;

        api.traders.borrow_mut().push(trader("0xnew", "newcomer"));
        browser.click("0xabc").await;

        assert!(browser.panels().trader_list.contains("0xnew"));
        assert_eq!(browser.traders().len(), 2);
    }

    #[tokio::test]
    async fn click_without_refetch_uses_cached_list() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice"), trader("0xdef", "bob")]);
        let mut browser = TraderBrowser::new(&api).refetch_on_select(false);
        browser.load_traders().await;
        browser.click("0xdef").await;

        assert_eq!(active_address(browser.panels()).as_deref(), Some("0xdef"));
        assert_eq!(api.calls(), vec!["traders", "trades:0xabc", "trades:0xdef"]);
    }

    #[tokio::test]
    async fn trader_fetch_failure_shows_message_and_leaves_trades() {
        let api = FakeApi {
            traders_status: Some(500),
            ..Default::default()
        };
        let mut browser = TraderBrowser::new(&api);
        let report = browser.load_traders().await;

        match &report.traders {
            LoadOutcome::Failed(e) => assert_eq!(e.status(), Some(500)),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(report.trades.is_none());
        assert_eq!(browser.panels().trader_list, TRADERS_FAILED_HTML);
        assert_eq!(browser.panels().trade_list, "");
        assert_eq!(api.calls(), vec!["traders"]);
    }

    #[tokio::test]
    async fn trade_fetch_failure_is_rendered() {
        let api = FakeApi {
            trades_status: Some(502),
            ..FakeApi::with_traders(vec![trader("0xabc", "alice")])
        };
        let mut browser = TraderBrowser::new(&api);
        let report = browser.load_traders().await;

        assert_eq!(report.traders.count(), 1);
        assert!(report.trades.as_ref().is_some_and(LoadOutcome::is_failed));
        assert_eq!(browser.panels().trade_title, "Trades • alice");
        assert_eq!(browser.panels().trade_list, TRADES_FAILED_HTML);
    }

    #[tokio::test]
    async fn preselected_address_is_kept() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice"), trader("0xdef", "bob")]);
        let mut browser = TraderBrowser::with_selection(&api, Selection::with_address("0xdef"));
        browser.load_traders().await;

        assert_eq!(active_address(browser.panels()).as_deref(), Some("0xdef"));
        assert_eq!(api.calls(), vec!["traders", "trades:0xdef"]);
    }

    #[tokio::test]
    async fn selection_missing_from_list_still_renders_cards() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice"), trader("0xdef", "bob")]);
        let mut browser = TraderBrowser::with_selection(&api, Selection::with_address("0x999"));
        let report = browser.load_traders().await;

        assert!(matches!(report.traders, LoadOutcome::Rendered { count: 2 }));
        assert!(matches!(report.trades, Some(LoadOutcome::Empty)));
        assert_eq!(active_address(browser.panels()), None);
        assert_eq!(browser.panels().trade_title, "Trades • 0x999");
        assert_eq!(api.calls(), vec!["traders", "trades:0x999"]);
    }

    #[tokio::test]
    async fn document_contains_rendered_panels() {
        let api = FakeApi::with_traders(vec![trader("0xabc", "alice")])
            .trades_for("0xabc", vec![sample_trade()]);
        let mut browser = TraderBrowser::new(&api);
        browser.load_traders().await;

        let doc = browser.panels().to_document();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"<h2 id="trade-title">Trades • alice</h2>"#));
        assert!(doc.contains("Will X happen?"));
    }
}
