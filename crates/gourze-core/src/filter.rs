//! Declarative list filters.
//!
//! A list request carries its filters as dotted query keys:
//!
//! ```text
//! GET /api/users?username.op=contains&username.val=doe&page=2&take=20&sortBy=createdAt&sortOrder=desc
//! GET /api/orders?userId.op=in&userId.val=3&userId.val=7
//! ```
//!
//! Each entity publishes a [`ListSchema`]: the query keys it accepts, the
//! column and [`FieldKind`] behind each, and the fields it may be sorted by.
//! [`ListQuery::parse`] turns the raw key/value pairs into typed
//! [`FieldFilter`]s plus a [`Pagination`]; turning those into SQL is the
//! database crate's job.
//!
//! Parsing is strict: unknown operators, operators that do not apply to a
//! field's kind, unparseable values, and unknown sort fields are all
//! rejected with a [`FilterError`] instead of being silently ignored.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::pagination::{
    DEFAULT_PAGE, DEFAULT_SORT_BY, DEFAULT_TAKE, MAX_PAGE, MAX_TAKE, PageMeta, Pagination,
    SortOrder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::LessThanOrEqual => "less_than_or_equal",
        }
    }

    /// `in` and `not_in` take a value set; everything else takes one value.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    pub fn supports(&self, kind: FieldKind) -> bool {
        match self {
            Self::Equals | Self::NotEquals | Self::In | Self::NotIn => true,
            Self::Contains | Self::StartsWith | Self::EndsWith => kind == FieldKind::Text,
            Self::GreaterThan
            | Self::LessThan
            | Self::GreaterThanOrEqual
            | Self::LessThanOrEqual => kind != FieldKind::Text,
        }
    }

    /// The LIKE pattern for the wildcard operators, with the user's value
    /// escaped so it only ever matches literally.
    pub fn like_pattern(&self, value: &str) -> Option<String> {
        let escaped = escape_like(value);
        match self {
            Self::Contains => Some(format!("%{escaped}%")),
            Self::StartsWith => Some(format!("{escaped}%")),
            Self::EndsWith => Some(format!("%{escaped}")),
            _ => None,
        }
    }
}

impl FromStr for FilterOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "equals" => Self::Equals,
            "not_equals" => Self::NotEquals,
            "in" => Self::In,
            "not_in" => Self::NotIn,
            "contains" => Self::Contains,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            "greater_than" => Self::GreaterThan,
            "less_than" => Self::LessThan,
            "greater_than_or_equal" | "greater_or_equal" => Self::GreaterThanOrEqual,
            "less_than_or_equal" | "less_or_equal" => Self::LessThanOrEqual,
            _ => return Err(()),
        };
        Ok(op)
    }
}

/// Escapes the LIKE metacharacters `%`, `_` and the escape character itself.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Literal values of one filter, typed by the field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValues {
    Text(Vec<String>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Timestamp(Vec<DateTime<Utc>>),
}

impl FilterValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse(field: &str, kind: FieldKind, raw: &[&str]) -> Result<Self, FilterError> {
        let invalid = |value: &str| FilterError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };

        let values = match kind {
            FieldKind::Text => Self::Text(raw.iter().map(|v| v.to_string()).collect()),
            FieldKind::Integer => Self::Integer(
                raw.iter()
                    .copied()
                    .map(|v| v.trim().parse::<i64>().map_err(|_| invalid(v)))
                    .collect::<Result<_, _>>()?,
            ),
            FieldKind::Float => Self::Float(
                raw.iter()
                    .copied()
                    .map(|v| {
                        v.trim()
                            .parse::<f64>()
                            .ok()
                            .filter(|n| n.is_finite())
                            .ok_or_else(|| invalid(v))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            FieldKind::Timestamp => Self::Timestamp(
                raw.iter()
                    .copied()
                    .map(|v| parse_timestamp(v.trim()).ok_or_else(|| invalid(v)))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(values)
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One validated predicate: `column <op> values`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub column: &'static str,
    pub op: FilterOp,
    pub values: FilterValues,
}

impl FieldFilter {
    pub fn new(column: &'static str, op: FilterOp, values: FilterValues) -> Self {
        Self { column, op, values }
    }
}

/// A filterable query key and the column it maps to.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub key: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FilterField {
    pub const fn new(key: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { key, column, kind }
    }
}

/// A sortable query key and the column it maps to.
#[derive(Debug, Clone, Copy)]
pub struct SortField {
    pub key: &'static str,
    pub column: &'static str,
}

impl SortField {
    pub const fn new(key: &'static str, column: &'static str) -> Self {
        Self { key, column }
    }
}

/// What a list endpoint accepts.
#[derive(Debug, Clone, Copy)]
pub struct ListSchema {
    pub filters: &'static [FilterField],
    pub sortable: &'static [SortField],
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("unknown operator `{op}` for `{field}`")]
    UnknownOperator { field: String, op: String },

    #[error("operator `{op}` is not supported for `{field}`")]
    UnsupportedOperator { field: String, op: &'static str },

    #[error("operator `{op}` on `{field}` takes a single value, got {count}")]
    TooManyValues {
        field: String,
        op: &'static str,
        count: usize,
    },

    #[error("invalid value `{value}` for `{field}`")]
    InvalidValue { field: String, value: String },

    #[error("cannot sort by `{0}`")]
    UnknownSortField(String),

    #[error("sortOrder must be `asc` or `desc`, got `{0}`")]
    InvalidSortOrder(String),

    #[error("page must be a positive integer within range, got `{0}`")]
    InvalidPage(String),

    #[error("take must be an integer between 1 and 100, got `{0}`")]
    InvalidTake(String),
}

/// Filters plus pagination for one list request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQuery {
    pub filters: Vec<FieldFilter>,
    pub pagination: Pagination,
}

impl ListQuery {
    /// Builds a query from raw query-string pairs, in the order they
    /// arrived. Repeated `<field>.val` keys form the value set; for the
    /// single-valued keys the last occurrence wins.
    pub fn parse(pairs: &[(String, String)], schema: &ListSchema) -> Result<Self, FilterError> {
        let last = |key: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let page = match last("page") {
            None | Some("") => DEFAULT_PAGE,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|p| (1..=MAX_PAGE).contains(p))
                .ok_or_else(|| FilterError::InvalidPage(raw.to_string()))?,
        };

        let take = match last("take") {
            None | Some("") => DEFAULT_TAKE,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|t| (1..=MAX_TAKE).contains(t))
                .ok_or_else(|| FilterError::InvalidTake(raw.to_string()))?,
        };

        let sort_key = match last("sortBy") {
            None | Some("") => DEFAULT_SORT_BY,
            Some(raw) => raw,
        };
        let sort_column = schema
            .sortable
            .iter()
            .find(|field| field.key == sort_key)
            .map(|field| field.column)
            .ok_or_else(|| FilterError::UnknownSortField(sort_key.to_string()))?;

        let sort_order = match last("sortOrder") {
            None | Some("") => SortOrder::Asc,
            Some(raw) => SortOrder::parse(raw)
                .ok_or_else(|| FilterError::InvalidSortOrder(raw.to_string()))?,
        };

        let mut filters = Vec::new();
        for field in schema.filters {
            if let Some(filter) = parse_field(pairs, field)? {
                filters.push(filter);
            }
        }

        Ok(Self {
            filters,
            pagination: Pagination::new(page, take, sort_column, sort_order),
        })
    }

    /// Adds a server-side predicate, e.g. scoping a list to its parent.
    pub fn push_filter(&mut self, filter: FieldFilter) {
        self.filters.push(filter);
    }

    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta::new(total, &self.pagination)
    }
}

fn parse_field(
    pairs: &[(String, String)],
    field: &FilterField,
) -> Result<Option<FieldFilter>, FilterError> {
    let op_key = format!("{}.op", field.key);
    let val_key = format!("{}.val", field.key);

    let op = match pairs.iter().rev().find(|(k, _)| *k == op_key) {
        None => FilterOp::Equals,
        Some((_, raw)) => raw
            .parse::<FilterOp>()
            .map_err(|_| FilterError::UnknownOperator {
                field: field.key.to_string(),
                op: raw.clone(),
            })?,
    };

    if !op.supports(field.kind) {
        return Err(FilterError::UnsupportedOperator {
            field: field.key.to_string(),
            op: op.as_str(),
        });
    }

    let raw_values: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| *k == val_key)
        .map(|(_, v)| v.as_str())
        .collect();

    if raw_values.is_empty() {
        return Ok(None);
    }

    if !op.is_multi_valued() && raw_values.len() > 1 {
        return Err(FilterError::TooManyValues {
            field: field.key.to_string(),
            op: op.as_str(),
            count: raw_values.len(),
        });
    }

    let values = FilterValues::parse(field.key, field.kind, &raw_values)?;
    Ok(Some(FieldFilter::new(field.column, op, values)))
}
