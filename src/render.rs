// src/render.rs
//! HTML and plain-text presentation of an earnings lookup.
use crate::models::{DerivedView, HistoricalMove};
use crate::services::deriver::NOT_AVAILABLE;
use crate::services::earnings::EarningsLookup;

pub const TITLE: &str = "📊 Earnings Move Dashboard";
const INTRO: &str = "Enter a stock ticker to fetch its implied and historical earnings moves.";

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub note: Option<&'static str>,
}

/// What the page shows under the input form.
#[derive(Debug, Clone)]
pub enum PageState {
    Idle,
    Loaded(EarningsLookup),
    NotFound(String),
    Invalid(String),
    Failed(String),
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_dollars(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${:.2}", value)
    }
}

/// Summary metrics in display order. The expected move is left out when it
/// could not be computed.
pub fn metrics(view: &DerivedView) -> Vec<Metric> {
    let mut metrics = vec![Metric {
        label: "📈 Current Implied Earnings Move",
        value: format_percent(view.implied_move_percent),
        note: None,
    }];

    if let Some(change) = view.expected_price_change {
        metrics.push(Metric {
            label: "💵 Expected Price Move (±)",
            value: format_dollars(change),
            note: view
                .has_zero_price_change()
                .then_some("zero move: check the price data"),
        });
    }

    metrics.push(Metric {
        label: "📉 Average Historical Earnings Move",
        value: format_percent(view.avg_historical_move_percent),
        note: None,
    });
    metrics.push(Metric {
        label: "📅 Next Earnings Date",
        value: view.resolved_next_earnings_date.clone(),
        note: None,
    });
    metrics
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn banner(kind: &str, message: &str) -> String {
    format!(
        "<div class=\"banner {}\">{}</div>\n",
        kind,
        escape_html(message)
    )
}

fn render_table(moves: &[HistoricalMove]) -> String {
    let mut html = String::from(
        "<table>\n<thead><tr><th>Earnings Move</th><th>Percentage</th></tr></thead>\n<tbody>\n",
    );
    for m in moves {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(&m.label),
            escape_html(&format_percent(m.percentage))
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_lookup(lookup: &EarningsLookup) -> String {
    let mut html = format!(
        "<h2>📌 Data for {}</h2>\n",
        escape_html(lookup.ticker.as_str())
    );
    for warning in &lookup.warnings {
        html.push_str(&banner("warning", warning));
    }
    html.push_str("<div class=\"metrics\">\n");
    for metric in metrics(&lookup.view) {
        html.push_str(&format!(
            "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div>",
            escape_html(metric.label),
            escape_html(&metric.value)
        ));
        if let Some(note) = metric.note {
            html.push_str(&format!("<div class=\"note\">{}</div>", escape_html(note)));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
    html.push_str(&render_table(&lookup.view.historical_moves));
    html
}

const STYLE: &str = "body{font-family:sans-serif;max-width:760px;margin:2rem auto;padding:0 1rem}\
.metrics{display:flex;flex-wrap:wrap;gap:1.5rem;margin:1rem 0}\
.metric .label{font-size:.85rem;color:#555}.metric .value{font-size:1.8rem}\
.metric .note{font-size:.8rem;color:#a15c00}\
.banner{padding:.75rem 1rem;border-radius:.4rem;margin:.75rem 0}\
.warning{background:#fff6d6}.error{background:#ffe1e1}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
#spinner{display:none}#spinner.active{display:block}";

/// Full dashboard page. `input_value` pre-fills the ticker box.
pub fn render_page(input_value: &str, state: &PageState) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>Earnings Move Dashboard</title>\n<style>{}</style>\n</head>\n<body>\n\
<h1>{}</h1>\n<p>{}</p>\n\
<form method=\"get\" action=\"/\" onsubmit=\"document.getElementById('spinner').classList.add('active')\">\n\
<label for=\"ticker\">Enter Stock Ticker (e.g., AAPL, MSFT)</label>\n\
<input id=\"ticker\" name=\"ticker\" type=\"text\" value=\"{}\">\n\
<button type=\"submit\">Get Earnings Data</button>\n</form>\n\
<div id=\"spinner\">Fetching data...</div>\n",
        STYLE,
        TITLE,
        INTRO,
        escape_html(input_value)
    );

    match state {
        PageState::Idle => {}
        PageState::Loaded(lookup) => html.push_str(&render_lookup(lookup)),
        PageState::NotFound(ticker) => html.push_str(&banner(
            "warning",
            &format!("No data found for the specified ticker ({}).", ticker),
        )),
        PageState::Invalid(message) => html.push_str(&banner("warning", message)),
        PageState::Failed(message) => html.push_str(&banner("error", message)),
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Terminal rendering used by the `lookup_ticker` binary.
pub fn render_text(lookup: &EarningsLookup) -> String {
    let mut out = format!("{}\n\n📌 Data for {}\n", TITLE, lookup.ticker);
    for warning in &lookup.warnings {
        out.push_str(&format!("⚠ {}\n", warning));
    }
    out.push('\n');
    for metric in metrics(&lookup.view) {
        out.push_str(&format!("{:<40} {}", metric.label, metric.value));
        if let Some(note) = metric.note {
            out.push_str(&format!("  ({})", note));
        }
        out.push('\n');
    }
    out.push_str(&format!("\n{:<16} {}\n", "Earnings Move", "Percentage"));
    for m in &lookup.view.historical_moves {
        out.push_str(&format!("{:<16} {}\n", m.label, format_percent(m.percentage)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ticker;

    fn sample_view(change: Option<f64>) -> DerivedView {
        DerivedView {
            implied_move_percent: Some(5.0),
            expected_price_change: change,
            avg_historical_move_percent: None,
            resolved_next_earnings_date: "2024-01-10".to_string(),
            historical_moves: (1..=12)
                .map(|i| HistoricalMove {
                    label: format!("Earnings #{}", i),
                    percentage: if i == 1 { Some(-2.5) } else { None },
                })
                .collect(),
        }
    }

    fn sample_lookup(change: Option<f64>) -> EarningsLookup {
        EarningsLookup {
            ticker: Ticker::parse("AAPL").unwrap(),
            view: sample_view(change),
            warnings: vec!["Price <stale>".to_string()],
        }
    }

    #[test]
    fn absent_expected_move_is_not_a_metric() {
        let labels: Vec<_> = metrics(&sample_view(None)).iter().map(|m| m.label).collect();
        assert_eq!(labels.len(), 3);
        assert!(!labels.iter().any(|l| l.contains("Expected")));
    }

    #[test]
    fn zero_expected_move_is_shown_with_a_note() {
        let metrics = metrics(&sample_view(Some(0.0)));
        let expected = metrics.iter().find(|m| m.label.contains("Expected")).unwrap();
        assert_eq!(expected.value, "$0.00");
        assert!(expected.note.is_some());
    }

    #[test]
    fn values_are_formatted() {
        assert_eq!(format_percent(Some(5.25)), "5.25%");
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_dollars(12.5), "$12.50");
        assert_eq!(format_dollars(-3.0), "-$3.00");
    }

    #[test]
    fn page_escapes_user_text() {
        let page = render_page("<script>", &PageState::Failed("Error: 500 - <b>oops</b>".into()));
        assert!(page.contains("value=\"&lt;script&gt;\""));
        assert!(page.contains("Error: 500 - &lt;b&gt;oops&lt;/b&gt;"));
        assert!(!page.contains("<b>oops</b>"));
    }

    #[test]
    fn loaded_page_has_metrics_and_table() {
        let page = render_page("AAPL", &PageState::Loaded(sample_lookup(Some(10.0))));
        assert!(page.contains("📌 Data for AAPL"));
        assert!(page.contains("$10.00"));
        assert!(page.contains("<td>Earnings #1</td><td>-2.5%</td>"));
        assert!(page.contains("<td>Earnings #12</td><td>N/A</td>"));
        assert!(page.contains("Price &lt;stale&gt;"));
    }

    #[test]
    fn idle_page_has_form_only() {
        let page = render_page("AAPL", &PageState::Idle);
        assert!(page.contains("Get Earnings Data"));
        assert!(page.contains("value=\"AAPL\""));
        assert!(!page.contains("<table>"));
    }

    #[test]
    fn text_rendering_lists_every_move() {
        let text = render_text(&sample_lookup(Some(10.0)));
        assert!(text.contains("Data for AAPL"));
        assert_eq!(text.matches("Earnings #").count(), 12);
        assert!(text.contains("2024-01-10"));
    }
}
