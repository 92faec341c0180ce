// src/models.rs
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// One row of the ORATS `cores` endpoint, reduced to the fields the dashboard reads.
///
/// Every member is optional: a missing key and a value of the wrong JSON type
/// both come through as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEarningsRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker: Option<String>,
    #[serde(rename = "impErnMv", default, deserialize_with = "lenient_f64")]
    pub imp_ern_mv: Option<f64>,
    #[serde(rename = "absAvgErnMv", default, deserialize_with = "lenient_f64")]
    pub abs_avg_ern_mv: Option<f64>,
    #[serde(rename = "nextErn", default, deserialize_with = "lenient_string")]
    pub next_ern: Option<String>,
    #[serde(rename = "daysToNextErn", default, deserialize_with = "lenient_f64")]
    pub days_to_next_ern: Option<f64>,
    #[serde(rename = "lastErn", default, deserialize_with = "lenient_string")]
    pub last_ern: Option<String>,
    #[serde(rename = "clsPx", default, deserialize_with = "lenient_f64")]
    pub cls_px: Option<f64>,
    #[serde(rename = "ernMv1", default, deserialize_with = "lenient_f64")]
    pub ern_mv1: Option<f64>,
    #[serde(rename = "ernMv2", default, deserialize_with = "lenient_f64")]
    pub ern_mv2: Option<f64>,
    #[serde(rename = "ernMv3", default, deserialize_with = "lenient_f64")]
    pub ern_mv3: Option<f64>,
    #[serde(rename = "ernMv4", default, deserialize_with = "lenient_f64")]
    pub ern_mv4: Option<f64>,
    #[serde(rename = "ernMv5", default, deserialize_with = "lenient_f64")]
    pub ern_mv5: Option<f64>,
    #[serde(rename = "ernMv6", default, deserialize_with = "lenient_f64")]
    pub ern_mv6: Option<f64>,
    #[serde(rename = "ernMv7", default, deserialize_with = "lenient_f64")]
    pub ern_mv7: Option<f64>,
    #[serde(rename = "ernMv8", default, deserialize_with = "lenient_f64")]
    pub ern_mv8: Option<f64>,
    #[serde(rename = "ernMv9", default, deserialize_with = "lenient_f64")]
    pub ern_mv9: Option<f64>,
    #[serde(rename = "ernMv10", default, deserialize_with = "lenient_f64")]
    pub ern_mv10: Option<f64>,
    #[serde(rename = "ernMv11", default, deserialize_with = "lenient_f64")]
    pub ern_mv11: Option<f64>,
    #[serde(rename = "ernMv12", default, deserialize_with = "lenient_f64")]
    pub ern_mv12: Option<f64>,
}

/// Number of historical earnings moves carried by a record.
pub const HISTORICAL_MOVE_COUNT: usize = 12;

impl RawEarningsRecord {
    /// `ernMv{index}` for index 1..=12, most recent event first.
    pub fn historical_move(&self, index: usize) -> Option<f64> {
        match index {
            1 => self.ern_mv1,
            2 => self.ern_mv2,
            3 => self.ern_mv3,
            4 => self.ern_mv4,
            5 => self.ern_mv5,
            6 => self.ern_mv6,
            7 => self.ern_mv7,
            8 => self.ern_mv8,
            9 => self.ern_mv9,
            10 => self.ern_mv10,
            11 => self.ern_mv11,
            12 => self.ern_mv12,
            _ => None,
        }
    }
}

/// Row of the ORATS `summaries` endpoint; only the live price is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceSummary {
    #[serde(rename = "stockPrice", default, deserialize_with = "lenient_f64")]
    pub stock_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalMove {
    pub label: String,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub implied_move_percent: Option<f64>,
    pub expected_price_change: Option<f64>,
    pub avg_historical_move_percent: Option<f64>,
    pub resolved_next_earnings_date: String,
    pub historical_moves: Vec<HistoricalMove>,
}

impl DerivedView {
    /// True when the expected move was computed and came out as exactly zero.
    pub fn has_zero_price_change(&self) -> bool {
        matches!(self.expected_price_change, Some(change) if change == 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid ticker {0:?}: expected 1-15 letters, digits, '.' or '-'")]
pub struct InvalidTicker(pub String);

/// Upper-cased, validated stock symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, InvalidTicker> {
        let symbol = input.trim().to_uppercase();
        let re = Regex::new(r"^[A-Z0-9][A-Z0-9.\-]{0,14}$")
            .map_err(|_| InvalidTicker(input.to_string()))?;
        if re.is_match(&symbol) {
            Ok(Ticker(symbol))
        } else {
            Err(InvalidTicker(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
