//! Translation of raw, untrusted request parameters into a bounded
//! [`ListQuery`].
//!
//! The translator is deliberately forgiving: unparseable numbers fall back
//! to defaults and field names outside the caller-supplied allow-lists are
//! silently dropped. Nothing a client sends can make translation fail, and
//! nothing outside the allow-lists can reach the storage layer.

use std::collections::HashMap;

/// Page size applied when the client sends none (or garbage).
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Page number applied when the client sends none (or garbage).
pub const DEFAULT_PAGE: i64 = 1;

/// Literal `order` parameter value that requests a descending sort.
const ORDER_REVERSE: &str = "reverse";

/// Sort order for a list query. Ascending unless explicitly reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A single filter value, tagged with its matching semantics.
///
/// The tag is resolved once, from the field name, at translation time:
/// identity fields (`id` / `_id`) match exactly, every other allow-listed
/// field matches as a case-insensitive substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Equality match against the stored value.
    Exact(String),
    /// Case-insensitive substring match against the stored value.
    Pattern(String),
}

impl FilterValue {
    /// Tag a raw value according to the field it filters on.
    pub fn for_field(field: &str, value: String) -> Self {
        if field == "id" || field == "_id" {
            FilterValue::Exact(value)
        } else {
            FilterValue::Pattern(value)
        }
    }

    /// The raw value as sent by the client.
    pub fn value(&self) -> &str {
        match self {
            FilterValue::Exact(v) | FilterValue::Pattern(v) => v,
        }
    }
}

/// A validated, defaulted description of one paginated list request.
///
/// `sort_field` and the keys in `filters` only ever contain names taken
/// from the allow-lists passed to [`ListQuery::from_params`], so the
/// storage layer may interpolate them into SQL. Values are always bound.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub per_page: i64,
    pub page: i64,
    /// Column to sort by; `None` leaves the result order unspecified.
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    /// Allow-listed column name paired with its tagged filter value,
    /// in allow-list order.
    pub filters: Vec<(String, FilterValue)>,
}

impl ListQuery {
    /// Build a query from raw request parameters.
    ///
    /// `allowed_sorts` and `allowed_filters` map the parameter name a
    /// client may use to the column name the store understands. Parameters
    /// that name anything else are dropped without error. Never fails.
    pub fn from_params(
        params: &HashMap<String, String>,
        allowed_sorts: &[(&str, &str)],
        allowed_filters: &[(&str, &str)],
    ) -> Self {
        // Unparseable or missing numbers are left at zero so the
        // unconditional defaulting below kicks in.
        let mut page: i64 = params
            .get("page")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let mut per_page: i64 = params
            .get("per_page")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        if page <= 0 {
            page = DEFAULT_PAGE;
        }
        if per_page <= 0 {
            per_page = DEFAULT_PER_PAGE;
        }

        let mut filters = Vec::new();
        for (param, column) in allowed_filters {
            if let Some(value) = params.get(*param) {
                filters.push((
                    (*column).to_string(),
                    FilterValue::for_field(column, value.clone()),
                ));
            }
        }

        let sort_field = params.get("sort").and_then(|raw| {
            allowed_sorts
                .iter()
                .find(|(param, _)| param == raw)
                .map(|(_, column)| (*column).to_string())
        });

        let sort_direction = if params.get("order").map(String::as_str) == Some(ORDER_REVERSE) {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        Self {
            per_page,
            page,
            sort_field,
            sort_direction,
            filters,
        }
    }

    /// Number of leading records skipped by pagination.
    ///
    /// Saturates instead of overflowing, so absurdly large page numbers
    /// yield an empty page rather than a panic or a negative offset.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}
