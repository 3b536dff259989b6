//! Query cache — keyed request results with staleness and de-duplication.
//!
//! DESIGN
//! ======
//! Each cache key owns one entry holding the last good result, the last
//! error, and at most one in-flight request. Callers that ask for a key
//! while a request is in flight await the same shared future instead of
//! issuing a second request.
//!
//! The request runs on its own tokio task and settles the entry itself, so
//! an entry never stays "fetching" once the request has finished, even if
//! every caller that asked for it has gone away.
//!
//! TRADE-OFFS
//! ==========
//! A removed key may be fetched again while its old request is still
//! running; each request carries an id and only settles the entry whose
//! in-flight id still matches.
//!
//! The entry map sits behind a `std::sync::Mutex`; the lock is never held
//! across an await. A failed refetch keeps the previous data so readers can
//! still show it next to the error.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::catalog::CatalogError;
use crate::config::QueryTimings;

type FetchResult<V> = Result<Arc<V>, CatalogError>;
type SharedFetch<V> = Shared<BoxFuture<'static, FetchResult<V>>>;
type EntryMap<K, V> = Mutex<HashMap<K, Entry<V>>>;

/// Process-wide id for each spawned request.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// ENTRY
// =============================================================================

struct Entry<V> {
    data: Option<Arc<V>>,
    error: Option<CatalogError>,
    updated_at: Option<Instant>,
    last_access: Instant,
    invalidated: bool,
    in_flight: Option<InFlight<V>>,
}

struct InFlight<V> {
    id: u64,
    request: SharedFetch<V>,
}

impl<V> Entry<V> {
    fn new(now: Instant) -> Self {
        Self { data: None, error: None, updated_at: None, last_access: now, invalidated: false, in_flight: None }
    }

    fn is_stale(&self, now: Instant, timings: &QueryTimings) -> bool {
        match self.updated_at {
            Some(at) if self.data.is_some() && !self.invalidated => {
                now.saturating_duration_since(at) >= timings.stale_after
            }
            _ => true,
        }
    }
}

/// Snapshot of one key, for rendering loading/error/data states.
#[derive(Debug)]
pub struct QueryState<V> {
    pub data: Option<Arc<V>>,
    pub error: Option<CatalogError>,
    /// First load: a request is running and there is no data yet.
    pub is_loading: bool,
    /// Any request is running, including background refetches.
    pub is_fetching: bool,
    pub is_stale: bool,
}

impl<V> QueryState<V> {
    fn idle() -> Self {
        Self { data: None, error: None, is_loading: false, is_fetching: false, is_stale: true }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// =============================================================================
// CACHE
// =============================================================================

pub struct QueryCache<K, V> {
    entries: Arc<EntryMap<K, V>>,
    timings: QueryTimings,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries), timings: self.timings }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(timings: QueryTimings) -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())), timings }
    }

    #[must_use]
    pub fn timings(&self) -> QueryTimings {
        self.timings
    }

    /// Return cached data for `key` if fresh; otherwise join the in-flight
    /// request or start one with `fetcher`.
    ///
    /// `fetcher` is only called when a new request is actually issued.
    ///
    /// # Errors
    ///
    /// Returns the request's error. Every caller coalesced onto the same
    /// request receives the same error.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> FetchResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, CatalogError>> + Send + 'static,
    {
        let pending = {
            let now = Instant::now();
            let mut entries = lock(&self.entries);
            let entry = entries.entry(key.clone()).or_insert_with(|| Entry::new(now));
            entry.last_access = now;

            if !entry.is_stale(now, &self.timings) {
                if let Some(data) = &entry.data {
                    tracing::debug!(?key, "query cache hit");
                    return Ok(Arc::clone(data));
                }
            }

            if let Some(in_flight) = &entry.in_flight {
                tracing::debug!(?key, id = in_flight.id, "query joined in-flight request");
                in_flight.request.clone()
            } else {
                let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(?key, id, "query cache miss");
                let request = spawn_request(Arc::clone(&self.entries), key.clone(), id, fetcher());
                entry.in_flight = Some(InFlight { id, request: request.clone() });
                request
            }
        };

        pending.await
    }

    #[must_use]
    pub fn state(&self, key: &K) -> QueryState<V> {
        self.state_at(key, Instant::now())
    }

    #[must_use]
    pub fn state_at(&self, key: &K, now: Instant) -> QueryState<V> {
        let entries = lock(&self.entries);
        let Some(entry) = entries.get(key) else {
            return QueryState::idle();
        };
        let is_fetching = entry.in_flight.is_some();
        QueryState {
            data: entry.data.clone(),
            error: entry.error.clone(),
            is_loading: is_fetching && entry.data.is_none(),
            is_fetching,
            is_stale: entry.is_stale(now, &self.timings),
        }
    }

    /// Mark `key` stale so the next fetch goes to the network.
    pub fn invalidate(&self, key: &K) {
        if let Some(entry) = lock(&self.entries).get_mut(key) {
            entry.invalidated = true;
        }
    }

    /// Drop `key`. A request still in flight finishes but its result is discarded.
    pub fn remove(&self, key: &K) {
        lock(&self.entries).remove(key);
    }

    /// Evict idle entries. Returns how many were removed.
    pub fn gc(&self) -> usize {
        self.gc_at(Instant::now())
    }

    pub fn gc_at(&self, now: Instant) -> usize {
        let gc_after = self.timings.gc_after;
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|_, entry| {
            entry.in_flight.is_some() || now.saturating_duration_since(entry.last_access) < gc_after
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "query cache gc");
        }
        evicted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// REQUEST TASK
// =============================================================================

fn spawn_request<K, V, Fut>(entries: Arc<EntryMap<K, V>>, key: K, id: u64, request: Fut) -> SharedFetch<V>
where
    K: Eq + Hash + Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
    Fut: Future<Output = Result<V, CatalogError>> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let result = match AssertUnwindSafe(request).catch_unwind().await {
            Ok(result) => result.map(Arc::new),
            Err(_) => Err(CatalogError::Request("request task panicked".into())),
        };
        settle(&entries, &key, id, &result);
        result
    });

    async move {
        task.await
            .unwrap_or_else(|e| Err(CatalogError::Request(format!("request task aborted: {e}"))))
    }
    .boxed()
    .shared()
}

fn settle<K, V>(entries: &EntryMap<K, V>, key: &K, id: u64, result: &FetchResult<V>)
where
    K: Eq + Hash + Debug,
{
    let mut entries = lock(entries);
    let Some(entry) = entries.get_mut(key) else {
        tracing::debug!(?key, id, "query result discarded; entry removed");
        return;
    };
    if entry.in_flight.as_ref().map(|f| f.id) != Some(id) {
        tracing::debug!(?key, id, "query result discarded; entry replaced");
        return;
    }
    entry.in_flight = None;
    match result {
        Ok(data) => {
            entry.data = Some(Arc::clone(data));
            entry.error = None;
            entry.updated_at = Some(Instant::now());
            entry.invalidated = false;
            tracing::debug!(?key, "query settled");
        }
        Err(e) => {
            entry.error = Some(e.clone());
            tracing::debug!(?key, error = %e, "query failed");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
