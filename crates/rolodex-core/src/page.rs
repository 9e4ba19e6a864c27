use crate::key::IndexKey;
use crate::result::RolodexResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Traversal direction of a page request.
///
/// The backing index is only ever scanned in ascending order; a descending
/// request selects its page from the upper end of the bounded range and
/// reports rows and keys in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }
}

/// One bounded, cursor-style page request against the sorted index.
///
/// `start` and `end` are given in traversal order: `start` is where the
/// traversal begins and `end` where it stops, so for a descending request
/// `start` is the upper table bound. A `None` bound leaves that side of the
/// range open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub start: Option<IndexKey>,
    pub start_inclusive: bool,
    pub end: Option<IndexKey>,
    pub end_inclusive: bool,
    pub order: Direction,
    pub target_len: usize,
}

/// A fetched page plus the index keys actually spanned by its rows, in
/// traversal order. The key list is what lets a caller pin an open boundary
/// to the true extent of the page rather than guessing from a row count.
#[derive(Debug, Clone)]
pub struct PageResponse<R> {
    pub rows: Vec<R>,
    pub index_keys: Vec<IndexKey>,
}

impl<R> PageResponse<R> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            index_keys: Vec::new(),
        }
    }

    /// Last index key observed in traversal order, if any.
    pub fn last_key(&self) -> Option<&IndexKey> {
        self.index_keys.last()
    }
}

/// The bounded page-fetch primitive the pagination controller is built on.
///
/// Implementations may be remote; a fetch can fail transiently or stay
/// outstanding indefinitely. The returned page may be shorter than
/// `target_len` when the range runs out of rows.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Row: Clone + Send + Sync + 'static;

    async fn fetch_page(&self, request: PageRequest) -> RolodexResult<PageResponse<Self::Row>>;
}
