//! Query model for influencer reads.
//!
//! Handlers translate request parameters into an [`InfluencerQuery`]: an
//! ordered list of predicates plus a row range and an ordering. Stores
//! interpret it without knowing anything about HTTP.

use regex::Regex;
use std::sync::LazyLock;
use url::form_urlencoded;

use crate::models::Influencer;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").expect("valid leading-integer regex"));

/// Columns a query may filter or order on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Email,
    Status,
    CreatedAt,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Email => "email",
            Column::Status => "status",
            Column::CreatedAt => "created_at",
        }
    }

    /// Text value of the column for `row`, `None` for non-text or null columns.
    pub fn text<'a>(&self, row: &'a Influencer) -> Option<&'a str> {
        match self {
            Column::Name => Some(&row.name),
            Column::Email => Some(&row.email),
            Column::Status => row.status.as_deref(),
            Column::CreatedAt => None,
        }
    }
}

/// A single filter, applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = value`
    Equals { column: Column, value: String },
    /// Any of `columns` contains `needle`, case-insensitively.
    AnyContains { columns: Vec<Column>, needle: String },
}

impl Predicate {
    pub fn matches(&self, row: &Influencer) -> bool {
        match self {
            Predicate::Equals { column, value } => column.text(row) == Some(value.as_str()),
            Predicate::AnyContains { columns, needle } => {
                let needle = needle.to_lowercase();
                columns.iter().any(|column| {
                    column
                        .text(row)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

/// Window of rows to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: Column,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluencerQuery {
    pub predicates: Vec<Predicate>,
    pub range: Range,
    pub order: Order,
}

impl Default for InfluencerQuery {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            range: Range {
                offset: 0,
                count: DEFAULT_LIMIT,
            },
            order: Order {
                column: Column::CreatedAt,
                ascending: false,
            },
        }
    }
}

impl InfluencerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: Column, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Equals {
            column,
            value: value.into(),
        });
        self
    }

    pub fn any_contains(mut self, columns: &[Column], needle: impl Into<String>) -> Self {
        self.predicates.push(Predicate::AnyContains {
            columns: columns.to_vec(),
            needle: needle.into(),
        });
        self
    }

    /// Selects page `page` (1-based) of `limit` rows.
    pub fn page(mut self, page: i64, limit: i64) -> Self {
        self.range = Range {
            offset: page.saturating_sub(1).saturating_mul(limit),
            count: limit,
        };
        self
    }

    pub fn order_by(mut self, column: Column, ascending: bool) -> Self {
        self.order = Order { column, ascending };
        self
    }

    pub fn matches(&self, row: &Influencer) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

/// Query string of `GET /api/influencers`.
///
/// Kept as raw strings so that unparseable numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    /// Reads the known keys from a raw query string. The first occurrence of
    /// a repeated key wins and unknown keys are ignored, so this never fails.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "status" => &mut params.status,
                "search" => &mut params.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    pub fn page(&self) -> i64 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }

    /// Builds the read: status filter, then name/email search, then the
    /// page window, newest first.
    pub fn to_query(&self) -> InfluencerQuery {
        let mut query = InfluencerQuery::new();

        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            query = query.eq(Column::Status, status);
        }

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.any_contains(&[Column::Name, Column::Email], search);
        }

        query
            .page(self.page(), self.limit())
            .order_by(Column::CreatedAt, false)
    }
}

/// Parses the integer at the start of `raw`, ignoring anything after it.
///
/// `" 42abc"` yields 42; input without leading digits yields `None`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    LEADING_INT
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(parse_leading_int)
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}
