use async_trait::async_trait;
use rolodex_core::{
    Direction, IndexKey, KeyPart, PageRequest, PageResponse, PageSource, RolodexResult,
};
use rolodex_domain::{Contact, ContactGenerator};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;

/// In-memory contact table sorted by its name index.
///
/// The index key of an entry is the contact's name key with a monotonic
/// insertion-sequence tiebreaker appended, so contacts sharing a name stay
/// distinct and keep a stable order.
pub struct ContactBook {
    inner: RwLock<BookInner>,
}

struct BookInner {
    index: BTreeMap<IndexKey, Contact>,
    seq: i64,
    count: u64,
}

impl ContactBook {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BookInner {
                index: BTreeMap::new(),
                seq: 0,
                count: 0,
            }),
        }
    }

    /// Insert one contact and bump the maintained row counter.
    ///
    /// Returns the full index key the entry was filed under.
    pub async fn insert(&self, contact: Contact) -> IndexKey {
        let mut inner = self.inner.write().await;
        inner.seq += 1;
        let key = entry_key(&contact, inner.seq);
        tracing::debug!("inserting contact {} at {}", contact.display_name(), key);
        inner.index.insert(key.clone(), contact);
        inner.count += 1;
        key
    }

    /// Seed the book with `n` generated contacts.
    pub async fn seed(&self, seed: u64, n: usize) {
        let mut generator = ContactGenerator::new(seed);
        for contact in generator.take(n) {
            self.insert(contact).await;
        }
        tracing::info!("seeded {} contacts", n);
    }

    /// The maintained row counter.
    pub async fn count(&self) -> u64 {
        self.inner.read().await.count
    }

    /// Every contact in index order.
    pub async fn all(&self) -> Vec<Contact> {
        let inner = self.inner.read().await;
        inner.index.values().cloned().collect()
    }

    /// Fetch one bounded page from the name index.
    ///
    /// Bounds arrive in traversal order. The scan itself is always
    /// ascending: a descending request swaps its bounds into ascending
    /// range form, takes the page from the upper end of the range, and
    /// reports rows and keys in descending order. An empty key bound means
    /// that side of the range is already past the last row and is treated
    /// as open.
    pub async fn get_page(&self, request: PageRequest) -> RolodexResult<PageResponse<Contact>> {
        let inner = self.inner.read().await;

        let (low, high) = match request.order {
            Direction::Ascending => (
                range_bound(&request.start, request.start_inclusive),
                range_bound(&request.end, request.end_inclusive),
            ),
            Direction::Descending => (
                range_bound(&request.end, request.end_inclusive),
                range_bound(&request.start, request.start_inclusive),
            ),
        };

        if range_is_empty(&low, &high) {
            return Ok(PageResponse::empty());
        }

        let scan = inner.index.range((low, high));
        let taken: Vec<(&IndexKey, &Contact)> = match request.order {
            Direction::Ascending => scan.take(request.target_len).collect(),
            Direction::Descending => scan.rev().take(request.target_len).collect(),
        };

        let mut response = PageResponse {
            rows: Vec::with_capacity(taken.len()),
            index_keys: Vec::with_capacity(taken.len()),
        };
        for (key, contact) in taken {
            response.index_keys.push(key.clone());
            response.rows.push(contact.clone());
        }
        Ok(response)
    }
}

impl Default for ContactBook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageSource for ContactBook {
    type Row = Contact;

    async fn fetch_page(&self, request: PageRequest) -> RolodexResult<PageResponse<Contact>> {
        self.get_page(request).await
    }
}

fn entry_key(contact: &Contact, seq: i64) -> IndexKey {
    let mut parts = contact.name_key().parts().to_vec();
    parts.push(KeyPart::Int(seq));
    IndexKey::new(parts)
}

fn range_bound(key: &Option<IndexKey>, inclusive: bool) -> Bound<IndexKey> {
    match key {
        None => Bound::Unbounded,
        Some(k) if k.is_empty() => Bound::Unbounded,
        Some(k) if inclusive => Bound::Included(k.clone()),
        Some(k) => Bound::Excluded(k.clone()),
    }
}

/// `BTreeMap::range` panics on an inverted range; report such a range as
/// containing no rows instead.
fn range_is_empty(low: &Bound<IndexKey>, high: &Bound<IndexKey>) -> bool {
    let (low_key, low_open) = match low {
        Bound::Unbounded => return false,
        Bound::Included(k) => (k, false),
        Bound::Excluded(k) => (k, true),
    };
    let (high_key, high_open) = match high {
        Bound::Unbounded => return false,
        Bound::Included(k) => (k, false),
        Bound::Excluded(k) => (k, true),
    };
    match low_key.cmp(high_key) {
        Ordering::Greater => true,
        Ordering::Equal => low_open || high_open,
        Ordering::Less => false,
    }
}
