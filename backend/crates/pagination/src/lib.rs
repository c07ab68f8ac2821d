//! Page-number pagination primitives for listing endpoints.
//!
//! Listing endpoints accept `page`, `per_page`, `sort` and `direction` query
//! parameters. Parsing is deliberately lenient: malformed or out-of-range
//! values fall back to defaults instead of rejecting the request, so callers
//! always receive a usable [`Pagination`].
//!
//! Pages are one-based on the wire and zero-based once parsed. Ordering is
//! restricted to an allow-list of columns so the sort key can be interpolated
//! into a query plan without ever reaching the database as free text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page size used when `per_page` is missing or invalid.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Column used to order listing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    /// Creation timestamp (default).
    #[default]
    CreatedOn,
    /// Last modification timestamp.
    UpdatedOn,
    /// Storage identifier.
    Id,
}

impl SortColumn {
    /// Resolve a raw query value, falling back to [`SortColumn::CreatedOn`].
    ///
    /// Whitespace is ignored and matching is case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use pagination::SortColumn;
    ///
    /// assert_eq!(SortColumn::parse(" Updated "), SortColumn::UpdatedOn);
    /// assert_eq!(SortColumn::parse("salary"), SortColumn::CreatedOn);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "created" | "created_on" => Self::CreatedOn,
            "updated" | "updated_on" => Self::UpdatedOn,
            "id" => Self::Id,
            _ => Self::default(),
        }
    }

    /// Column name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedOn => "created_on",
            Self::UpdatedOn => "updated_on",
            Self::Id => "id",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering direction for listing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first (default).
    #[default]
    Desc,
}

impl SortDirection {
    /// Resolve a raw query value, falling back to [`SortDirection::Desc`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if normalise(raw) == "asc" {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    /// SQL keyword for the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalised pagination request.
///
/// ## Invariants
/// - `per_page` lies within `1..=MAX_PER_PAGE`.
/// - `page` is zero-based.
///
/// # Examples
/// ```
/// use pagination::{Pagination, SortColumn, SortDirection};
///
/// let page = Pagination::from_query("page=3&per_page=10&sort=id&direction=asc");
/// assert_eq!(page.page(), 2);
/// assert_eq!(page.offset(), 20);
/// assert_eq!(page.sort(), SortColumn::Id);
/// assert_eq!(page.direction(), SortDirection::Asc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    per_page: u32,
    sort: SortColumn,
    direction: SortDirection,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
            sort: SortColumn::default(),
            direction: SortDirection::default(),
        }
    }
}

impl Pagination {
    /// Build a pagination value from already-parsed parts.
    ///
    /// A zero `per_page` is replaced by the default and larger values are
    /// clamped to [`MAX_PER_PAGE`].
    #[must_use]
    pub const fn new(page: u32, per_page: u32, sort: SortColumn, direction: SortDirection) -> Self {
        let per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else if per_page > MAX_PER_PAGE {
            MAX_PER_PAGE
        } else {
            per_page
        };
        Self {
            page,
            per_page,
            sort,
            direction,
        }
    }

    /// Parse a raw, URL-encoded query string.
    ///
    /// Unknown parameters are ignored. When a parameter repeats, the first
    /// occurrence wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut raw = RawParams::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "page" => &mut raw.page,
                "per_page" => &mut raw.per_page,
                "sort" => &mut raw.sort,
                "direction" => &mut raw.direction,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        raw.resolve()
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Column used for ordering.
    #[must_use]
    pub const fn sort(&self) -> SortColumn {
        self.sort
    }

    /// Ordering direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Number of rows to skip before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.per_page as u64
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

#[derive(Debug, Default)]
struct RawParams {
    page: Option<String>,
    per_page: Option<String>,
    sort: Option<String>,
    direction: Option<String>,
}

impl RawParams {
    fn resolve(self) -> Pagination {
        let page = self.page.as_deref().map_or(0, parse_page);
        let per_page = self
            .per_page
            .as_deref()
            .map_or(DEFAULT_PER_PAGE, parse_per_page);
        let sort = self.sort.as_deref().map_or_else(SortColumn::default, SortColumn::parse);
        let direction = self
            .direction
            .as_deref()
            .map_or_else(SortDirection::default, SortDirection::parse);
        Pagination::new(page, per_page, sort, direction)
    }
}

fn parse_page(raw: &str) -> u32 {
    raw.trim().parse::<i64>().map_or(0, |one_based| {
        u32::try_from(one_based.saturating_sub(1).max(0)).unwrap_or(u32::MAX)
    })
}

fn parse_per_page(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(value) if value < 1 => DEFAULT_PER_PAGE,
        Ok(value) => u32::try_from(value).map_or(MAX_PER_PAGE, |fits| fits.min(MAX_PER_PAGE)),
        Err(_) => DEFAULT_PER_PAGE,
    }
}

fn normalise(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
