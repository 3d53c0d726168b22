//! Paging and sorting requests for list queries.

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Sort specification: an entity property and a direction.
///
/// The property is the snake_case attribute name (`"name"`, `"id"`); the
/// repository rejects names that are not columns of the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub property: String,
    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

impl std::str::FromStr for Sort {
    type Err = String;

    /// Parses `name`, `name,asc` or `name,desc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let property = parts.next().unwrap_or_default().trim();
        if property.is_empty() {
            return Err("sort property must not be empty".to_string());
        }

        match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
            None => Ok(Sort::asc(property)),
            Some(d) if d == "asc" => Ok(Sort::asc(property)),
            Some(d) if d == "desc" => Ok(Sort::desc(property)),
            Some(d) => Err(format!("unknown sort direction `{}`", d)),
        }
    }
}

/// Page request (1-indexed page, capped page size, optional sort)
#[derive(Debug, Clone, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    #[serde(default)]
    pub sort: Option<Sort>,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Zero-based page index for the query
    pub fn index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Rows to skip for this page, `None` when it lies beyond any addressable row
    pub fn offset(&self) -> Option<u64> {
        self.index().checked_mul(self.limit())
    }

    /// Get limit, at least one and capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the totals needed to walk the rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Create new page
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(PageRequest::new(1, 0).limit(), 1);
        assert_eq!(PageRequest::new(1, 500).limit(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 25).limit(), 25);
    }

    #[test]
    fn offset_uses_one_based_pages() {
        assert_eq!(PageRequest::new(1, 10).offset(), Some(0));
        assert_eq!(PageRequest::new(3, 10).offset(), Some(20));
        assert_eq!(PageRequest::new(0, 10).offset(), Some(0));
    }

    #[test]
    fn offset_past_u64_is_none() {
        assert_eq!(PageRequest::new(u64::MAX, 50).offset(), None);
        assert_eq!(PageRequest::new(u64::MAX, 1).offset(), Some(u64::MAX - 1));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u8> = Page::new(vec![], 1, 10, 21);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());

        let empty: Page<u8> = Page::new(vec![], 1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn sort_parses_direction_suffix() {
        assert_eq!("name".parse::<Sort>().unwrap(), Sort::asc("name"));
        assert_eq!("name,DESC".parse::<Sort>().unwrap(), Sort::desc("name"));
        assert!("name,sideways".parse::<Sort>().is_err());
        assert!(",asc".parse::<Sort>().is_err());
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.page, DEFAULT_PAGE_NUMBER);
        assert_eq!(request.per_page, DEFAULT_PAGE_SIZE);
        assert!(request.sort.is_none());
    }
}
