use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::{coerce::to_epoch_millis, row::Row};

/// Query predicate understood by the record store.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    Equals { field: String, value: Value },
    Contains { field: String, substring: String },
    IsOneOf { field: String, values: Vec<Value> },
    GreaterOrEqual { field: String, value: Value },
    LessOrEqual { field: String, value: Value },
    And(Vec<Criteria>),
}

impl Criteria {
    pub fn equals<F: Into<String>, V: Into<Value>>(field: F, value: V) -> Self {
        Criteria::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains<F: Into<String>, S: Into<String>>(field: F, substring: S) -> Self {
        Criteria::Contains {
            field: field.into(),
            substring: substring.into(),
        }
    }

    pub fn is_one_of<F, I, V>(field: F, values: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Criteria::IsOneOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn greater_or_equal<F: Into<String>, V: Into<Value>>(field: F, value: V) -> Self {
        Criteria::GreaterOrEqual {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn less_or_equal<F: Into<String>, V: Into<Value>>(field: F, value: V) -> Self {
        Criteria::LessOrEqual {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn and(criteria: Vec<Criteria>) -> Self {
        Criteria::And(criteria)
    }

    /// Conjunction of `self` followed by `other`.
    pub fn and_also(self, other: Criteria) -> Self {
        Criteria::And(vec![self, other])
    }

    pub fn operator(&self) -> &'static str {
        match self {
            Criteria::Equals { .. } => "equals",
            Criteria::Contains { .. } => "contains",
            Criteria::IsOneOf { .. } => "inSet",
            Criteria::GreaterOrEqual { .. } => "greaterOrEqual",
            Criteria::LessOrEqual { .. } => "lessOrEqual",
            Criteria::And(_) => "and",
        }
    }

    /// Wire form sent to the record store.
    pub fn to_json(&self) -> Value {
        match self {
            Criteria::Equals { field, value }
            | Criteria::GreaterOrEqual { field, value }
            | Criteria::LessOrEqual { field, value } => json!({
                "fieldName": field,
                "operator": self.operator(),
                "value": value,
            }),
            Criteria::Contains { field, substring } => json!({
                "fieldName": field,
                "operator": self.operator(),
                "value": substring,
            }),
            Criteria::IsOneOf { field, values } => json!({
                "fieldName": field,
                "operator": self.operator(),
                "value": values,
            }),
            Criteria::And(items) => json!({
                "operator": self.operator(),
                "criteria": items.iter().map(Criteria::to_json).collect::<Vec<_>>(),
            }),
        }
    }

    /// Evaluates the predicate against a fetched row. List-valued columns match when any
    /// element matches.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Criteria::Equals { field, value } => {
                column_values(row, field).any(|candidate| values_equal(candidate, value))
            }
            Criteria::Contains { field, substring } => column_values(row, field)
                .filter_map(Value::as_str)
                .any(|text| text.contains(substring.as_str())),
            Criteria::IsOneOf { field, values } => column_values(row, field)
                .any(|candidate| values.iter().any(|value| values_equal(candidate, value))),
            Criteria::GreaterOrEqual { field, value } => column_values(row, field).any(|c| {
                matches!(
                    compare_values(c, value),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }),
            Criteria::LessOrEqual { field, value } => column_values(row, field).any(|c| {
                matches!(
                    compare_values(c, value),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }),
            Criteria::And(items) => items.iter().all(|item| item.matches(row)),
        }
    }
}

impl Serialize for Criteria {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Creation-window predicate over a millisecond timestamp column.
pub fn date_criteria(
    start: Option<&DateTime<Utc>>,
    end: Option<&DateTime<Utc>>,
    field_name: &str,
) -> Option<Criteria> {
    let lower = start.map(|s| Criteria::greater_or_equal(field_name, to_epoch_millis(s)));
    let upper = end.map(|e| Criteria::less_or_equal(field_name, to_epoch_millis(e)));
    match (lower, upper) {
        (Some(lower), Some(upper)) => Some(lower.and_also(upper)),
        (Some(single), None) | (None, Some(single)) => Some(single),
        (None, None) => None,
    }
}

fn column_values<'r>(row: &'r Row, field: &str) -> Box<dyn Iterator<Item = &'r Value> + 'r> {
    match row.value(field) {
        Some(Value::Array(items)) => Box::new(items.iter()),
        Some(value) => Box::new(std::iter::once(value)),
        None => Box::new(std::iter::empty()),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
