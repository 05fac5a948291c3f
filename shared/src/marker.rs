use std::fmt::Write;

use serde::Serialize;

use crate::format::format_currency;
use crate::metric::{MetricName, TRACKED_METRICS};
use crate::record::{AllMetricsRecord, MetricRecords, SingleMetricRecord};

pub const LABEL_GLYPH: &str = "🏆";
pub const TOOLTIP_CLASS: &str = "marker-label";

/// A point marker ready to hand to the map widget.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub lat: f64,
    pub lon: f64,
    pub tooltip: String,
    pub popup_html: String,
}

/// Tooltip options passed to the map widget for every marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    pub permanent: bool,
    pub direction: &'static str,
    pub class_name: &'static str,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            permanent: true,
            direction: "top",
            class_name: TOOLTIP_CLASS,
        }
    }
}

impl MetricRecords {
    /// One marker per record, in response order.
    pub fn markers(&self) -> Vec<MarkerSpec> {
        match self {
            MetricRecords::Single { metric, records } => records
                .iter()
                .map(|record| single_metric_marker(*metric, record))
                .collect(),
            MetricRecords::All(records) => records.iter().map(all_metrics_marker).collect(),
        }
    }
}

pub fn single_metric_label(rank: u32, metric: MetricName) -> String {
    format!("{rank} {LABEL_GLYPH} {}", metric.initial())
}

fn single_metric_marker(metric: MetricName, record: &SingleMetricRecord) -> MarkerSpec {
    let mut popup = popup_header(&record.company, &record.ticker);
    let _ = write!(popup, "<br>{metric}: {}", format_currency(record.value));
    MarkerSpec {
        lat: record.lat,
        lon: record.lon,
        tooltip: single_metric_label(record.rank, metric),
        popup_html: popup,
    }
}

fn all_metrics_marker(record: &AllMetricsRecord) -> MarkerSpec {
    let mut popup = popup_header(&record.company, &record.ticker);
    for name in aggregate_display_order(record) {
        let Some(value) = record.values.get(name) else {
            continue;
        };
        let _ = write!(
            popup,
            "<br>{}: {}",
            escape_html(name),
            format_currency(*value)
        );
        if let Some(rank) = record.ranks.get(name) {
            let _ = write!(popup, " (Rank {rank})");
        }
    }
    MarkerSpec {
        lat: record.lat,
        lon: record.lon,
        tooltip: LABEL_GLYPH.to_owned(),
        popup_html: popup,
    }
}

/// Tracked metrics first in their canonical order, then any other keys
/// the backend sent, alphabetically.
fn aggregate_display_order(record: &AllMetricsRecord) -> Vec<&str> {
    let mut order: Vec<&str> = TRACKED_METRICS
        .iter()
        .map(|metric| metric.as_str())
        .filter(|name| record.values.contains_key(*name))
        .collect();
    order.extend(
        record
            .values
            .keys()
            .map(String::as_str)
            .filter(|name| !TRACKED_METRICS.iter().any(|m| m.as_str() == *name)),
    );
    order
}

fn popup_header(company: &str, ticker: &str) -> String {
    format!(
        "<strong>{}</strong><br>Ticker: {}",
        escape_html(company),
        escape_html(ticker)
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn acme() -> SingleMetricRecord {
        SingleMetricRecord {
            company: "Acme".to_owned(),
            ticker: "ACM".to_owned(),
            country: None,
            lat: 10.0,
            lon: 20.0,
            value: 1_500_000.0,
            rank: 3,
        }
    }

    #[test]
    fn single_metric_marker_matches_reference_scenario() {
        let records = MetricRecords::Single {
            metric: MetricName::Revenue,
            records: vec![acme()],
        };
        let markers = records.markers();
        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!((marker.lat, marker.lon), (10.0, 20.0));
        assert_eq!(marker.tooltip, "3 🏆 R");
        assert!(marker.popup_html.contains("Acme"));
        assert!(marker.popup_html.contains("ACM"));
        assert!(marker.popup_html.contains("$1,500,000"));
        assert!(marker.popup_html.contains("Revenue: $1,500,000"));
    }

    #[test]
    fn market_cap_label_uses_m() {
        assert_eq!(single_metric_label(12, MetricName::MarketCap), "12 🏆 M");
    }

    #[test]
    fn aggregate_popup_lists_every_metric_with_rank() {
        let body = json!([{
            "company": "Acme", "ticker": "ACM", "lat": 1, "lon": 2,
            "values": { "Market Cap": 3000, "Revenue": 1000, "Earnings": 2000 },
            "ranks": { "Market Cap": 9, "Revenue": 7, "Earnings": 8 }
        }])
        .to_string();
        let records = MetricRecords::decode(MetricName::All, &body).unwrap();
        let markers = records.markers();
        let popup = &markers[0].popup_html;

        assert_eq!(markers[0].tooltip, LABEL_GLYPH);
        assert!(popup.contains("Revenue: $1,000 (Rank 7)"));
        assert!(popup.contains("Earnings: $2,000 (Rank 8)"));
        assert!(popup.contains("Market Cap: $3,000 (Rank 9)"));

        let revenue = popup.find("Revenue").unwrap();
        let earnings = popup.find("Earnings").unwrap();
        let market_cap = popup.find("Market Cap").unwrap();
        assert!(revenue < earnings && earnings < market_cap);
    }

    #[test]
    fn aggregate_popup_includes_extra_metrics_after_tracked_ones() {
        let body = json!([{
            "company": "Acme", "ticker": "ACM", "lat": 1, "lon": 2,
            "values": { "Dividends": 5, "Revenue": 1 },
            "ranks": { "Dividends": 2, "Revenue": 1 }
        }])
        .to_string();
        let popup = MetricRecords::decode(MetricName::All, &body).unwrap().markers()[0]
            .popup_html
            .clone();
        assert!(popup.contains("Dividends: $5 (Rank 2)"));
        assert!(!popup.contains("Earnings"));
        assert!(popup.find("Revenue").unwrap() < popup.find("Dividends").unwrap());
    }

    #[test]
    fn escapes_company_and_ticker() {
        let mut record = acme();
        record.company = "<script>alert(1)</script> & Sons".to_owned();
        let markers = MetricRecords::Single {
            metric: MetricName::Earnings,
            records: vec![record],
        }
        .markers();
        let popup = &markers[0].popup_html;
        assert!(!popup.contains("<script>"));
        assert!(popup.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; Sons"));
    }

    #[test]
    fn tooltip_style_serializes_as_widget_options() {
        let value = serde_json::to_value(TooltipStyle::default()).unwrap();
        assert_eq!(
            value,
            json!({ "permanent": true, "direction": "top", "className": "marker-label" })
        );
    }
}
