use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{coerce, graph::NodeKey};

/// One column of a fetched record, with the optional metadata the store attaches to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(
        default,
        rename = "displayValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_value: Option<String>,
    #[serde(
        default,
        rename = "displayValues",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_values: Option<Vec<String>>,
    #[serde(
        default,
        rename = "joinedDisplayValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub joined_display_value: Option<String>,
}

impl Field {
    pub fn new<T: Into<String>>(name: T, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            unit: None,
            display_value: None,
            display_values: None,
            joined_display_value: None,
        }
    }

    pub fn with_unit<T: Into<String>>(mut self, unit: T) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_display_value<T: Into<String>>(mut self, display: T) -> Self {
        self.display_value = Some(display.into());
        self
    }

    pub fn with_display_values(mut self, displays: Vec<String>) -> Self {
        self.display_values = Some(displays);
        self
    }
}

/// A record fetched from one table. Rows are never mutated after they are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "tableName")]
    table_name: String,
    pk: i64,
    #[serde(default)]
    columns: Vec<Field>,
}

impl Row {
    pub fn new<T: Into<String>>(table_name: T, pk: i64, columns: Vec<Field>) -> Self {
        Self {
            table_name: table_name.into(),
            pk,
            columns,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn pk(&self) -> i64 {
        self.pk
    }

    pub fn node_key(&self) -> NodeKey {
        NodeKey::new(&self.table_name, self.pk)
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    pub fn field(&self, column: &str) -> Option<&Field> {
        self.columns.iter().find(|field| field.name == column)
    }

    /// Raw value of `column`; absent columns and JSON nulls are both `None`.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.field(column)
            .map(|field| &field.value)
            .filter(|value| !value.is_null())
    }

    pub fn unit(&self, column: &str) -> Option<&str> {
        self.field(column).and_then(|field| field.unit.as_deref())
    }

    pub fn display_value(&self, column: &str) -> Option<&str> {
        self.field(column)
            .and_then(|field| field.display_value.as_deref())
    }

    pub fn display_values(&self, column: &str) -> Option<&[String]> {
        self.field(column)
            .and_then(|field| field.display_values.as_deref())
    }

    pub fn joined_display_value(&self, column: &str) -> Option<&str> {
        self.field(column)
            .and_then(|field| field.joined_display_value.as_deref())
    }

    pub fn str_value(&self, column: &str) -> Option<String> {
        match self.value(column)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn i64_value(&self, column: &str) -> Option<i64> {
        coerce::to_i64(self.value(column)?)
    }

    pub fn bool_value(&self, column: &str) -> Option<bool> {
        self.value(column).and_then(Value::as_bool)
    }

    pub fn string_list(&self, column: &str) -> Option<Vec<String>> {
        match self.value(column)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(text) => Some(vec![text.clone()]),
            _ => None,
        }
    }

    pub fn display_value_list(&self, column: &str) -> Option<Vec<String>> {
        self.display_values(column).map(<[String]>::to_vec)
    }

    pub fn decimal_value(&self, column: &str) -> Option<Decimal> {
        self.value(column).and_then(coerce::to_decimal)
    }

    pub fn instant_value(&self, column: &str) -> Option<DateTime<Utc>> {
        self.value(column).and_then(coerce::from_epoch_millis)
    }

    /// Integer keys held by `column`, flattening list-valued foreign keys.
    pub fn key_values(&self, column: &str) -> Vec<i64> {
        match self.value(column) {
            Some(Value::Array(items)) => items.iter().filter_map(coerce::to_i64).collect(),
            Some(value) => coerce::to_i64(value).into_iter().collect(),
            None => Vec::new(),
        }
    }
}
