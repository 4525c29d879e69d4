//! Cursor-based pagination.
//!
//! The cursor is an opaque continuation token (the id of the last row on
//! the previous page) rather than an offset, so pages stay stable under
//! concurrent inserts. Queries fetch `limit + 1` rows; the extra row, if
//! present, is trimmed and its predecessor's id becomes the next cursor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Maximum allowed items per page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A cursor-bounded page request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage {
    /// Items per page, clamped to `1..=MAX_PAGE_SIZE`.
    pub limit: u32,
    /// Id of the last row seen on the previous page.
    pub cursor: Option<Uuid>,
}

impl Default for CursorPage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }
}

impl CursorPage {
    /// Creates a page request with the limit clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(limit: u32, cursor: Option<Uuid>) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            cursor,
        }
    }

    /// Creates a page request from optional query parameters.
    pub fn from_query(limit: Option<u32>, cursor: Option<Uuid>) -> Self {
        Self::new(limit.unwrap_or(DEFAULT_PAGE_SIZE), cursor)
    }

    /// Number of rows to fetch so the presence of a following page is
    /// observable.
    pub fn fetch_limit(&self) -> u32 {
        self.limit + 1
    }

    /// Trims an over-fetched result to `limit` rows and returns the next
    /// cursor, present iff more rows exist beyond this page.
    pub fn trim<T>(&self, items: &mut Vec<T>, id_of: impl Fn(&T) -> Uuid) -> Option<Uuid> {
        if items.len() > self.limit as usize {
            items.truncate(self.limit as usize);
            items.last().map(&id_of)
        } else {
            None
        }
    }
}
