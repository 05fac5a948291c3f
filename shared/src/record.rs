use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LoadError;
use crate::metric::MetricName;

/// One company as returned for a single selected metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleMetricRecord {
    pub company: String,
    pub ticker: String,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub value: f64,
    #[serde(deserialize_with = "deserialize_rank")]
    pub rank: u32,
}

/// One company as returned for the aggregate `All` view.
/// `values` and `ranks` are keyed by metric wire name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllMetricsRecord {
    pub company: String,
    pub ticker: String,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub values: BTreeMap<String, f64>,
    #[serde(deserialize_with = "deserialize_ranks")]
    pub ranks: BTreeMap<String, u32>,
}

/// A decoded metric response. The variant is chosen by the requested metric,
/// never sniffed from the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricRecords {
    Single {
        metric: MetricName,
        records: Vec<SingleMetricRecord>,
    },
    All(Vec<AllMetricsRecord>),
}

impl MetricRecords {
    pub fn decode(metric: MetricName, body: &str) -> Result<Self, LoadError> {
        if metric.is_aggregate() {
            let records: Vec<AllMetricsRecord> = serde_json::from_str(body)?;
            for record in &records {
                check_rank_keys(record)?;
            }
            Ok(MetricRecords::All(records))
        } else {
            let records: Vec<SingleMetricRecord> = serde_json::from_str(body)?;
            Ok(MetricRecords::Single { metric, records })
        }
    }

    pub fn metric(&self) -> MetricName {
        match self {
            MetricRecords::Single { metric, .. } => *metric,
            MetricRecords::All(_) => MetricName::All,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MetricRecords::Single { records, .. } => records.len(),
            MetricRecords::All(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_rank_keys(record: &AllMetricsRecord) -> Result<(), LoadError> {
    if record.values.keys().eq(record.ranks.keys()) {
        return Ok(());
    }
    let values: Vec<&str> = record.values.keys().map(String::as_str).collect();
    let ranks: Vec<&str> = record.ranks.keys().map(String::as_str).collect();
    Err(LoadError::Parse(format!(
        "{}: ranks {ranks:?} do not match values {values:?}",
        record.ticker
    )))
}

/// Ranks arrive as integers or as integral floats (`3.0`).
fn rank_from_number(raw: f64) -> Option<u32> {
    if raw.fract() == 0.0 && raw >= 1.0 && raw <= f64::from(u32::MAX) {
        Some(raw as u32)
    } else {
        None
    }
}

fn deserialize_rank<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    rank_from_number(raw)
        .ok_or_else(|| D::Error::custom(format!("rank must be a positive integer, got {raw}")))
}

fn deserialize_ranks<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, f64>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, raw)| match rank_from_number(raw) {
            Some(rank) => Ok((name, rank)),
            None => Err(D::Error::custom(format!(
                "rank for {name} must be a positive integer, got {raw}"
            ))),
        })
        .collect()
}
