//! Value coercions shared by every assembler.
//!
//! Physical quantities become exact decimals through their string form, millisecond epochs
//! become UTC instants, and protocol links stored as HTML anchors are reduced to their target.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::errors::SlimsGraphError;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*<a\b([^>]*)>(.*?)</a\s*>\s*$").expect("anchor pattern compiles")
});

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("href pattern compiles")
});

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Parses a quantity through its textual form so no binary float rounding leaks in.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        Value::Null => return None,
        other => {
            warn!(value = %other, "quantity is neither numeric nor text");
            return None;
        }
    };
    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(decimal) => Some(decimal),
        Err(err) => {
            warn!(value = %text, error = %err, "unparsable quantity");
            None
        }
    }
}

/// Millisecond epoch to a UTC instant; fractional milliseconds are truncated.
pub fn from_epoch_millis(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))?,
        _ => return None,
    };
    DateTime::<Utc>::from_timestamp_millis(millis)
}

pub fn to_epoch_millis(instant: &DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

/// Reduces an anchor tag to its `href`.
///
/// Text that is not an anchor is returned unchanged, an anchor without `href` yields `None`, and
/// a non-text value yields `None` with a warning.
pub fn parse_html_anchor(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => parse_html_anchor_str(text),
        other => {
            warn!(value = %other, "protocol link is not text");
            None
        }
    }
}

pub fn parse_html_anchor_str(text: &str) -> Option<String> {
    let Some(anchor) = ANCHOR_RE.captures(text) else {
        return Some(text.to_string());
    };
    let attributes = anchor.get(1).map_or("", |m| m.as_str());
    HREF_RE.captures(attributes).and_then(|href| {
        href.get(1)
            .or_else(|| href.get(2))
            .or_else(|| href.get(3))
            .map(|m| m.as_str().to_string())
    })
}

/// Parses an ISO-8601 filter bound. Naive timestamps and bare dates are taken as UTC.
pub fn parse_date(input: Option<&str>) -> Result<Option<DateTime<Utc>>, SlimsGraphError> {
    let Some(raw) = input else {
        return Ok(None);
    };
    let text = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Some(naive.and_utc()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }
    Err(SlimsGraphError::validation(format!(
        "invalid isoformat string: {raw:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decimal_keeps_textual_precision() {
        assert_eq!(to_decimal(&json!(30.2)), Decimal::from_str("30.2").ok());
        assert_eq!(to_decimal(&json!("0.85")), Decimal::from_str("0.85").ok());
        assert_eq!(to_decimal(&json!(null)), None);
        assert_eq!(to_decimal(&json!("n/a")), None);
    }

    #[test]
    fn decimal_accepts_exponent_form() {
        assert_eq!(
            to_decimal(&json!(1e16)),
            Decimal::from_str("10000000000000000").ok()
        );
    }

    #[test]
    fn integral_floats_count_as_keys() {
        assert_eq!(to_i64(&json!(42.0)), Some(42));
        assert_eq!(to_i64(&json!(42.5)), None);
        assert_eq!(to_i64(&json!("17")), Some(17));
    }
}
