//! HTML templates for the trader and trade panels.
//!
//! Every value taken from the API passes through [`escape_html`] before it is
//! interpolated into markup.

use crate::state::Selection;
use crate::types::{NOT_AVAILABLE, Trade, Trader, text_or};
use crate::{TRADE_LIST_ID, TRADE_TITLE_ID, TRADER_LIST_ID};

pub const NO_TRADERS_HTML: &str =
    r#"<p class="empty">No traders found yet. Run fetch_trades.py first.</p>"#;
pub const NO_TRADES_HTML: &str = r#"<p class="empty">No trades for this trader yet.</p>"#;
pub const TRADERS_FAILED_HTML: &str = r#"<p class="empty">Failed to load traders.</p>"#;
pub const TRADES_FAILED_HTML: &str = r#"<p class="empty">Failed to load trades.</p>"#;

/// Escape `& < > " '` for safe interpolation into HTML text and attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Heading for the trade panel.
pub fn trade_title(title: &str) -> String {
    format!("Trades • {title}")
}

/// One trader card, marked `active` when it is the current selection.
pub fn render_trader_card(trader: &Trader, selection: &Selection) -> String {
    let name = trader.label();
    let image = text_or(&trader.profile_image, "");
    let active = if selection.is_selected(&trader.address) {
        "active"
    } else {
        ""
    };
    let address = escape_html(&trader.address);

    format!(
        r#"
    <article class="trader-card {active}" data-address="{address}">
      <div class="profile">
        <img src="{image}" alt="{name} profile" onerror="this.style.display='none'" />
        <div>
          <strong>{name}</strong>
          <div class="meta">@{username}</div>
        </div>
      </div>
      <p class="meta">{bio}</p>
      <p class="meta">Trades: {trades} • Followers: {followers}</p>
      <p class="meta">Volume: {volume} • Last trade: {latest}</p>
      <p class="meta">{address}</p>
    </article>
  "#,
        image = escape_html(&image),
        name = escape_html(&name),
        username = escape_html(&text_or(&trader.username, "unknown")),
        bio = escape_html(&text_or(&trader.bio, "No bio")),
        trades = escape_html(&text_or(&trader.trade_count, "0")),
        followers = escape_html(&text_or(&trader.follower_count, "0")),
        volume = escape_html(&text_or(&trader.volume_traded, "0")),
        latest = escape_html(&text_or(&trader.latest_trade, NOT_AVAILABLE)),
    )
}

/// One trade row with its fixed field grid.
pub fn render_trade_row(trade: &Trade) -> String {
    let size = trade
        .size_or_amount()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let cells = [
        ("Outcome", text_or(&trade.outcome, NOT_AVAILABLE)),
        ("Side", text_or(&trade.side, NOT_AVAILABLE)),
        ("Price", text_or(&trade.price, NOT_AVAILABLE)),
        ("Size", size),
        ("Amount", text_or(&trade.amount, NOT_AVAILABLE)),
        ("Token", text_or(&trade.token_id, NOT_AVAILABLE)),
        ("Time", text_or(&trade.timestamp, NOT_AVAILABLE)),
        ("Tx", text_or(&trade.tx_hash, NOT_AVAILABLE)),
    ];

    let grid: String = cells
        .iter()
        .map(|(label, value)| {
            format!(
                "\n        <div><strong>{label}</strong><br/>{}</div>",
                escape_html(value)
            )
        })
        .collect();

    format!(
        r#"
    <article class="trade-row">
      <h4>{title}</h4>
      <div class="trade-grid">{grid}
      </div>
    </article>
  "#,
        title = escape_html(&trade.title()),
    )
}

/// All trader cards in the order given.
pub fn render_trader_list(traders: &[Trader], selection: &Selection) -> String {
    traders
        .iter()
        .map(|t| render_trader_card(t, selection))
        .collect()
}

/// All trade rows in the order given.
pub fn render_trade_list(trades: &[Trade]) -> String {
    trades.iter().map(render_trade_row).collect()
}

/// Complete standalone document hosting the three panels.
pub fn render_page(trader_list: &str, trade_title: &str, trade_list: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Polymarket Trader Browser</title>
  <style>
    body {{ font-family: system-ui, sans-serif; margin: 0; display: flex; gap: 1rem; padding: 1rem; }}
    section {{ flex: 1; }}
    .trader-card, .trade-row {{ border: 1px solid #ddd; border-radius: 8px; padding: 0.75rem; margin-bottom: 0.5rem; }}
    .trader-card.active {{ border-color: #2563eb; background: #eff6ff; }}
    .profile {{ display: flex; gap: 0.5rem; align-items: center; }}
    .profile img {{ width: 40px; height: 40px; border-radius: 50%; }}
    .meta {{ color: #555; font-size: 0.9rem; }}
    .trade-grid {{ display: grid; grid-template-columns: repeat(4, 1fr); gap: 0.5rem; }}
    .empty {{ color: #777; }}
  </style>
</head>
<body>
  <section>
    <h2>Traders</h2>
    <div id="{TRADER_LIST_ID}">{trader_list}</div>
  </section>
  <section>
    <h2 id="{TRADE_TITLE_ID}">{title}</h2>
    <div id="{TRADE_LIST_ID}">{trade_list}</div>
  </section>
</body>
</html>
"#,
        title = escape_html(trade_title),
    )
}
