use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMetric;

/// Dimension companies are ranked along, plus the aggregate `All` view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricName {
    Revenue,
    Earnings,
    #[serde(rename = "Market Cap")]
    MarketCap,
    All,
}

pub const DEFAULT_METRIC: MetricName = MetricName::Revenue;

/// Metrics that carry a value and rank per company, in display order.
pub const TRACKED_METRICS: [MetricName; 3] = [
    MetricName::Revenue,
    MetricName::Earnings,
    MetricName::MarketCap,
];

/// Selector options, in the order they appear in the dropdown.
pub const SELECTABLE_METRICS: [MetricName; 4] = [
    MetricName::Revenue,
    MetricName::Earnings,
    MetricName::MarketCap,
    MetricName::All,
];

impl MetricName {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricName::Revenue => "Revenue",
            MetricName::Earnings => "Earnings",
            MetricName::MarketCap => "Market Cap",
            MetricName::All => "All",
        }
    }

    pub fn is_aggregate(self) -> bool {
        matches!(self, MetricName::All)
    }

    /// Uppercased first letter, used as the marker label suffix.
    pub fn initial(self) -> char {
        self.as_str()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }

    /// Path of the metric endpoint, with the name percent-encoded as a path segment.
    pub fn api_path(self) -> String {
        format!("/api/metric/{}", self.as_str().replace(' ', "%20"))
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = UnknownMetric;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        SELECTABLE_METRICS
            .into_iter()
            .find(|metric| metric.as_str() == trimmed)
            .ok_or_else(|| UnknownMetric(raw.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selector_values() {
        assert_eq!("Revenue".parse::<MetricName>(), Ok(MetricName::Revenue));
        assert_eq!("Market Cap".parse::<MetricName>(), Ok(MetricName::MarketCap));
        assert_eq!(" All ".parse::<MetricName>(), Ok(MetricName::All));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "Dividends".parse::<MetricName>().unwrap_err();
        assert_eq!(err, UnknownMetric("Dividends".to_owned()));
        assert!("revenue".parse::<MetricName>().is_err());
    }

    #[test]
    fn initials_are_uppercase_first_letters() {
        assert_eq!(MetricName::Revenue.initial(), 'R');
        assert_eq!(MetricName::Earnings.initial(), 'E');
        assert_eq!(MetricName::MarketCap.initial(), 'M');
    }

    #[test]
    fn api_path_encodes_spaces() {
        assert_eq!(MetricName::Revenue.api_path(), "/api/metric/Revenue");
        assert_eq!(MetricName::MarketCap.api_path(), "/api/metric/Market%20Cap");
        assert_eq!(MetricName::All.api_path(), "/api/metric/All");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&MetricName::MarketCap).unwrap();
        assert_eq!(json, "\"Market Cap\"");
        let back: MetricName = serde_json::from_str("\"Earnings\"").unwrap();
        assert_eq!(back, MetricName::Earnings);
    }

    #[test]
    fn only_all_is_aggregate() {
        assert!(MetricName::All.is_aggregate());
        assert!(TRACKED_METRICS.iter().all(|m| !m.is_aggregate()));
    }
}
