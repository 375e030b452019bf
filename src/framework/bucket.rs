//! # Bucket Store
//!
//! [`Bucket`] is an ordered, duplicate-free collection of entities plus the pagination
//! cursor and fetch bookkeeping of one board tab. [`BucketStore`] holds the three buckets.
//!
//! Every mutation goes through identifier-keyed operations (`replace_page`, `append_page`,
//! `prepend`, `remove_by_id`); nothing ever writes by position. This is what keeps the
//! fetch path and the event path consistent with each other.

use super::core::BoardEntity;
use crate::model::{BucketId, PageInfo};
use std::collections::{HashMap, HashSet};

/// How a fetched page is merged into its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// The bucket becomes exactly the fetched page (initial load, refresh, pagination).
    Replace,
    /// The page is added after existing contents ("load more").
    Append,
}

#[derive(Debug, Clone)]
pub struct Bucket<T: BoardEntity> {
    orders: Vec<T>,
    page_info: PageInfo,
    page_size: u32,
    loading: bool,
    generation: u64,
    last_error: Option<String>,
}

impl<T: BoardEntity> Bucket<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            orders: Vec::new(),
            page_info: PageInfo::default(),
            page_size,
            loading: false,
            generation: 0,
            last_error: None,
        }
    }

    /// Replaces contents and pagination wholesale. Duplicate ids inside `orders` keep
    /// their first occurrence.
    pub fn replace_page(&mut self, orders: Vec<T>, page_info: PageInfo) {
        let mut seen = HashSet::with_capacity(orders.len());
        self.orders = orders
            .into_iter()
            .filter(|o| seen.insert(o.id().clone()))
            .collect();
        self.page_info = page_info;
    }

    /// Appends `orders` after existing contents, skipping ids already present.
    pub fn append_page(&mut self, orders: Vec<T>, page_info: PageInfo) {
        let mut seen: HashSet<T::Id> = self.orders.iter().map(|o| o.id().clone()).collect();
        for order in orders {
            if seen.insert(order.id().clone()) {
                self.orders.push(order);
            }
        }
        self.page_info = page_info;
    }

    /// Inserts at the front, moving an existing entry with the same id.
    pub fn prepend(&mut self, order: T) {
        self.remove_by_id(order.id());
        self.orders.insert(0, order);
    }

    pub fn remove_by_id(&mut self, id: &T::Id) -> Option<T> {
        let index = self.orders.iter().position(|o| o.id() == id)?;
        Some(self.orders.remove(index))
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.orders.iter().any(|o| o.id() == id)
    }

    pub fn orders(&self) -> &[T] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a new fetch. Any earlier in-flight fetch for this bucket becomes stale.
    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Ends the current fetch, recording its error (or clearing the previous one).
    pub(crate) fn settle(&mut self, error: Option<String>) {
        self.loading = false;
        self.last_error = error;
    }
}

/// The three buckets of the board.
///
/// Besides the buckets, the store remembers which ids the event path wrote and when. A page
/// applied with [`apply_page`](BucketStore::apply_page) never overrides an event that was
/// applied after its fetch started.
#[derive(Debug, Clone)]
pub struct BucketStore<T: BoardEntity> {
    live: Bucket<T>,
    completed: Bucket<T>,
    cancelled: Bucket<T>,
    event_seq: u64,
    event_writes: HashMap<T::Id, u64>,
}

impl<T: BoardEntity> BucketStore<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            live: Bucket::new(page_size),
            completed: Bucket::new(page_size),
            cancelled: Bucket::new(page_size),
            event_seq: 0,
            event_writes: HashMap::new(),
        }
    }

    pub fn bucket(&self, id: BucketId) -> &Bucket<T> {
        match id {
            BucketId::Live => &self.live,
            BucketId::Completed => &self.completed,
            BucketId::Cancelled => &self.cancelled,
        }
    }

    pub fn bucket_mut(&mut self, id: BucketId) -> &mut Bucket<T> {
        match id {
            BucketId::Live => &mut self.live,
            BucketId::Completed => &mut self.completed,
            BucketId::Cancelled => &mut self.cancelled,
        }
    }

    /// First bucket (live, completed, cancelled) holding `id`.
    pub fn locate(&self, id: &T::Id) -> Option<BucketId> {
        BucketId::ALL
            .into_iter()
            .find(|bucket| self.bucket(*bucket).contains(id))
    }

    /// Removes `id` from every bucket, returning how many held it.
    pub fn remove_everywhere(&mut self, id: &T::Id) -> usize {
        BucketId::ALL
            .into_iter()
            .filter(|bucket| self.bucket_mut(*bucket).remove_by_id(id).is_some())
            .count()
    }

    /// Sequence number of the latest event-path write. Fetches record it when they start.
    pub fn event_seq(&self) -> u64 {
        self.event_seq
    }

    /// Marks `id` as written by the event path.
    pub fn record_event(&mut self, id: &T::Id) {
        self.event_seq += 1;
        self.event_writes.insert(id.clone(), self.event_seq);
    }

    fn written_since(&self, id: &T::Id, since: u64) -> bool {
        self.event_writes.get(id).is_some_and(|seq| *seq > since)
    }

    /// Forgets event writes once no fetch is in flight, since nothing can race them anymore.
    pub(crate) fn prune_event_writes(&mut self) {
        if BucketId::ALL.into_iter().all(|b| !self.bucket(b).loading()) {
            self.event_writes.clear();
        }
    }

    /// Applies a page fetched by a fetch that started at event sequence `since`.
    ///
    /// Ids the event path wrote after `since` are left where the event put them. `Append`
    /// also skips ids already held by any bucket. Remaining page ids are evicted from the
    /// other buckets, and a `Replace` keeps the target's event-written entries in front of
    /// the page.
    pub fn apply_page(
        &mut self,
        target: BucketId,
        mode: PageMode,
        orders: Vec<T>,
        page_info: PageInfo,
        since: u64,
    ) {
        let orders: Vec<T> = orders
            .into_iter()
            .filter(|o| !self.written_since(o.id(), since))
            .filter(|o| mode == PageMode::Replace || self.locate(o.id()).is_none())
            .collect();

        for other in BucketId::ALL.into_iter().filter(|b| *b != target) {
            for order in &orders {
                self.bucket_mut(other).remove_by_id(order.id());
            }
        }

        match mode {
            PageMode::Replace => {
                let mut merged: Vec<T> = self
                    .bucket(target)
                    .orders()
                    .iter()
                    .filter(|o| self.written_since(o.id(), since))
                    .cloned()
                    .collect();
                merged.extend(orders);
                self.bucket_mut(target).replace_page(merged, page_info);
            }
            PageMode::Append => self.bucket_mut(target).append_page(orders, page_info),
        }
    }

    pub fn total(&self) -> usize {
        self.live.len() + self.completed.len() + self.cancelled.len()
    }
}
