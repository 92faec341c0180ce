// src/services/deriver.rs
use chrono::{Days, NaiveDate};

use crate::models::{DerivedView, HistoricalMove, RawEarningsRecord, HISTORICAL_MOVE_COUNT};

/// ORATS reports unset dates as this literal.
pub const UNSET_DATE: &str = "0000-00-00";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("not a YYYY-MM-DD date: {0:?}")]
pub struct DateParseError(pub String);

/// Whole days until the next earnings event, as reported in `daysToNextErn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount(u64);

impl DayCount {
    /// Accepts finite, non-negative values and truncates the fractional part.
    pub fn classify(raw: f64) -> Option<Self> {
        if raw.is_finite() && raw >= 0.0 && raw <= u32::MAX as f64 {
            Some(DayCount(raw.trunc() as u64))
        } else {
            None
        }
    }

    pub fn days(self) -> u64 {
        self.0
    }
}

pub fn parse_earnings_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let well_formed = input.len() == 10
        && input.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DateParseError(input.to_string()));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| DateParseError(input.to_string()))
}

fn is_unset(date: Option<&str>) -> bool {
    match date {
        None => true,
        Some(d) => d.trim().is_empty() || d == UNSET_DATE,
    }
}

/// Next earnings date with the upstream `0000-00-00` defect repaired where possible.
///
/// `lastErn` counts as day 1 of the `daysToNextErn` window, so a window of a
/// single day cannot name a future date and resolves to `N/A`.
pub fn resolve_next_earnings_date(record: &RawEarningsRecord) -> String {
    if !is_unset(record.next_ern.as_deref()) {
        return record.next_ern.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    }

    let days = match record.days_to_next_ern.and_then(DayCount::classify) {
        Some(days) if days.days() > 1 => days,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let last = match record.last_ern.as_deref() {
        Some(last) if !is_unset(Some(last)) => last,
        _ => return NOT_AVAILABLE.to_string(),
    };

    parse_earnings_date(last)
        .ok()
        .and_then(|date| date.checked_add_days(Days::new(days.days() - 1)))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Builds the dashboard view for one ticker.
///
/// `external_price` wins over the record's own close price when both are known.
pub fn derive(record: &RawEarningsRecord, external_price: Option<f64>) -> DerivedView {
    let price = external_price.or(record.cls_px);
    let expected_price_change = match (record.imp_ern_mv, price) {
        (Some(implied), Some(price)) => Some(implied / 100.0 * price),
        _ => None,
    };

    let historical_moves = (1..=HISTORICAL_MOVE_COUNT)
        .map(|i| HistoricalMove {
            label: format!("Earnings #{}", i),
            percentage: record.historical_move(i),
        })
        .collect();

    DerivedView {
        implied_move_percent: record.imp_ern_mv,
        expected_price_change,
        avg_historical_move_percent: record.abs_avg_ern_mv,
        resolved_next_earnings_date: resolve_next_earnings_date(record),
        historical_moves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unset_record(days: Option<f64>, last: Option<&str>) -> RawEarningsRecord {
        RawEarningsRecord {
            next_ern: Some(UNSET_DATE.to_string()),
            days_to_next_ern: days,
            last_ern: last.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn known_next_date_is_used_verbatim() {
        let record = RawEarningsRecord {
            next_ern: Some("2024-07-25".to_string()),
            days_to_next_ern: Some(3.0),
            last_ern: Some("2024-04-25".to_string()),
            ..Default::default()
        };
        assert_eq!(derive(&record, None).resolved_next_earnings_date, "2024-07-25");
    }

    #[test]
    fn unset_next_date_is_rebuilt_from_last_date() {
        let record = unset_record(Some(10.0), Some("2024-01-01"));
        assert_eq!(resolve_next_earnings_date(&record), "2024-01-10");
    }

    #[test]
    fn rebuild_truncates_fractional_days_and_crosses_months() {
        let record = unset_record(Some(31.9), Some("2024-02-15"));
        assert_eq!(resolve_next_earnings_date(&record), "2024-03-16");
    }

    #[test]
    fn unset_next_date_without_inputs_is_not_available() {
        for record in [
            unset_record(None, Some("2024-01-01")),
            unset_record(Some(0.0), Some("2024-01-01")),
            unset_record(Some(-4.0), Some("2024-01-01")),
            unset_record(Some(0.4), Some("2024-01-01")),
            unset_record(Some(f64::NAN), Some("2024-01-01")),
            unset_record(Some(10.0), None),
            unset_record(Some(10.0), Some(UNSET_DATE)),
        ] {
            assert_eq!(resolve_next_earnings_date(&record), NOT_AVAILABLE, "{:?}", record);
        }
    }

    #[test]
    fn one_day_window_does_not_repeat_last_date() {
        let record = unset_record(Some(1.0), Some("2024-01-01"));
        assert_eq!(resolve_next_earnings_date(&record), NOT_AVAILABLE);

        let record = unset_record(Some(1.9), Some("2024-01-01"));
        assert_eq!(resolve_next_earnings_date(&record), NOT_AVAILABLE);

        let record = unset_record(Some(2.0), Some("2024-01-01"));
        assert_eq!(resolve_next_earnings_date(&record), "2024-01-02");
    }

    #[test]
    fn whitespace_next_date_is_treated_as_unset() {
        let mut record = unset_record(Some(3.0), Some("2024-03-01"));
        record.next_ern = Some("  ".to_string());
        assert_eq!(resolve_next_earnings_date(&record), "2024-03-03");

        record.days_to_next_ern = None;
        assert_eq!(resolve_next_earnings_date(&record), NOT_AVAILABLE);
    }

    #[test]
    fn malformed_last_date_degrades_to_not_available() {
        for last in ["not-a-date", "2024-13-01", "2024-02-30", "2024-1-1", "24-01-01"] {
            let record = unset_record(Some(10.0), Some(last));
            assert_eq!(resolve_next_earnings_date(&record), NOT_AVAILABLE, "{}", last);
        }
    }

    #[test]
    fn missing_or_empty_next_date_is_treated_as_unset() {
        let mut record = unset_record(Some(2.0), Some("2024-01-30"));
        record.next_ern = None;
        assert_eq!(resolve_next_earnings_date(&record), "2024-01-31");

        record.next_ern = Some(String::new());
        assert_eq!(resolve_next_earnings_date(&record), "2024-01-31");

        record.last_ern = None;
        assert_eq!(resolve_next_earnings_date(&record), NOT_AVAILABLE);
    }

    #[test]
    fn expected_move_uses_close_price() {
        let record = RawEarningsRecord {
            imp_ern_mv: Some(5.0),
            cls_px: Some(200.0),
            ..Default::default()
        };
        assert_eq!(derive(&record, None).expected_price_change, Some(10.0));
    }

    #[test]
    fn external_price_takes_precedence() {
        let record = RawEarningsRecord {
            imp_ern_mv: Some(5.0),
            cls_px: Some(200.0),
            ..Default::default()
        };
        assert_eq!(derive(&record, Some(250.0)).expected_price_change, Some(12.5));
    }

    #[test]
    fn expected_move_needs_implied_move_and_price() {
        let no_implied = RawEarningsRecord {
            cls_px: Some(200.0),
            ..Default::default()
        };
        assert_eq!(derive(&no_implied, None).expected_price_change, None);
        assert_eq!(derive(&no_implied, Some(250.0)).expected_price_change, None);

        let no_price = RawEarningsRecord {
            imp_ern_mv: Some(5.0),
            ..Default::default()
        };
        assert_eq!(derive(&no_price, None).expected_price_change, None);
        assert_eq!(derive(&no_price, Some(80.0)).expected_price_change, Some(4.0));
    }

    #[test]
    fn zero_price_still_yields_a_value() {
        let record = RawEarningsRecord {
            imp_ern_mv: Some(5.0),
            cls_px: Some(0.0),
            ..Default::default()
        };
        let view = derive(&record, None);
        assert_eq!(view.expected_price_change, Some(0.0));
        assert!(view.has_zero_price_change());
    }

    #[test]
    fn historical_moves_are_always_twelve_in_field_order() {
        let record = RawEarningsRecord {
            ern_mv2: Some(-3.5),
            ern_mv11: Some(7.25),
            ..Default::default()
        };
        let moves = derive(&record, None).historical_moves;

        assert_eq!(moves.len(), 12);
        for (i, m) in moves.iter().enumerate() {
            assert_eq!(m.label, format!("Earnings #{}", i + 1));
        }
        assert_eq!(moves[0].percentage, None);
        assert_eq!(moves[1].percentage, Some(-3.5));
        assert_eq!(moves[10].percentage, Some(7.25));
    }

    #[test]
    fn passthrough_fields_keep_presence() {
        let empty = derive(&RawEarningsRecord::default(), None);
        assert_eq!(empty.implied_move_percent, None);
        assert_eq!(empty.avg_historical_move_percent, None);
        assert_eq!(empty.expected_price_change, None);
        assert_eq!(empty.resolved_next_earnings_date, NOT_AVAILABLE);

        let record = RawEarningsRecord {
            imp_ern_mv: Some(6.1),
            abs_avg_ern_mv: Some(4.4),
            ..Default::default()
        };
        let view = derive(&record, None);
        assert_eq!(view.implied_move_percent, Some(6.1));
        assert_eq!(view.avg_historical_move_percent, Some(4.4));
    }

    #[test]
    fn day_count_rejects_negative_and_non_finite() {
        assert_eq!(DayCount::classify(3.99), Some(DayCount(3)));
        assert_eq!(DayCount::classify(0.0), Some(DayCount(0)));
        assert_eq!(DayCount::classify(-1.0), None);
        assert_eq!(DayCount::classify(f64::INFINITY), None);
        assert_eq!(DayCount::classify(1e12), None);
    }
}
