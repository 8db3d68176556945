//! Cached, coalescing event catalog repository.
//!
//! Implements the cache-aside pattern over a [`Transport`]:
//! - **Reads**: check the [`TimedCache`] first; on a miss issue exactly one
//!   request and cache a validated result.
//! - **Concurrency**: callers that arrive while a request for the same key is
//!   in flight wait for that request's outcome instead of issuing their own.
//! - **Cancellation**: dropping the leading call's future discards its result.
//!   Nothing is cached, the load state is restored, and any waiters start a
//!   fresh attempt.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::payload::interpret_response;
use super::{CatalogSource, FetchError, LoadState, Pager, RepositoryConfig, Transport};
use crate::cache::{events_key, events_page_key, Clock, Storage, SystemClock, TimedCache};
use crate::event::Catalog;

type Outcome = Result<Catalog, FetchError>;
type InFlight = HashMap<String, watch::Sender<Option<Outcome>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Loads the event catalog through a transport and caches it.
///
/// # Type Parameters
///
/// * `T` - The transport used to reach the event source
/// * `S` - The storage backing the cache
/// * `C` - The clock used for cache expiry
pub struct EventRepository<T, S, C = SystemClock>
where
    T: Transport,
    S: Storage,
    C: Clock,
{
    transport: T,
    cache: TimedCache<S, C>,
    config: RepositoryConfig,
    state: Mutex<LoadState>,
    in_flight: Mutex<InFlight>,
}

impl<T, S> EventRepository<T, S>
where
    T: Transport,
    S: Storage,
{
    /// Creates a repository whose cache uses the system clock.
    pub fn new(transport: T, storage: S, config: RepositoryConfig) -> Self {
        Self::with_cache(transport, TimedCache::new(storage), config)
    }
}

impl<T, S, C> EventRepository<T, S, C>
where
    T: Transport,
    S: Storage,
    C: Clock,
{
    /// Creates a repository over an existing cache.
    pub fn with_cache(transport: T, cache: TimedCache<S, C>, config: RepositoryConfig) -> Self {
        Self {
            transport,
            cache,
            config,
            state: Mutex::new(LoadState::Idle),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn cache(&self) -> &TimedCache<S, C> {
        &self.cache
    }

    /// Returns the state of the most recent load.
    pub fn state(&self) -> LoadState {
        lock(&self.state).clone()
    }

    /// Returns a pager sized to the configured source.
    pub fn pager(&self) -> Pager {
        Pager::new(self.config.page_count())
    }

    /// Loads the catalog, from cache when fresh.
    ///
    /// With a paginated source this is the first page.
    pub async fn load_catalog(&self) -> Result<Catalog, FetchError> {
        let (key, url) = self.target(1);
        self.load(key, url).await
    }

    /// Loads one page of a paginated source. Out-of-range pages are clamped.
    pub async fn load_page(&self, page: usize) -> Result<Catalog, FetchError> {
        let (key, url) = self.target(self.pager().clamp(page));
        self.load(key, url).await
    }

    /// Drops the cached catalog and loads it again.
    pub async fn refresh(&self) -> Result<Catalog, FetchError> {
        let (key, url) = self.target(1);
        self.cache.remove(&key);
        self.load(key, url).await
    }

    /// Drops the cached copy of one page and loads it again.
    pub async fn refresh_page(&self, page: usize) -> Result<Catalog, FetchError> {
        let (key, url) = self.target(self.pager().clamp(page));
        self.cache.remove(&key);
        self.load(key, url).await
    }

    /// Evicts every cached page of the configured source.
    pub fn clear_cache(&self) {
        for page in 1..=self.config.page_count() {
            let (key, _) = self.target(page);
            self.cache.remove(&key);
        }
    }

    /// Cache key and URL for a page that is already in range.
    fn target(&self, page: usize) -> (String, String) {
        let key = match self.config.source() {
            CatalogSource::Single(_) => events_key(),
            CatalogSource::Paged(_) => events_page_key(page),
        };
        let url = self.config.page_url(page).unwrap_or_default().to_string();
        (key, url)
    }

    fn set_state(&self, state: LoadState) {
        *lock(&self.state) = state;
    }

    async fn load(&self, key: String, url: String) -> Outcome {
        loop {
            if let Some(catalog) = self.cache.get::<Catalog>(&key) {
                tracing::debug!(%key, count = catalog.len(), "Serving catalog from cache");
                self.set_state(LoadState::Success);
                return Ok(catalog);
            }

            let waiter = match lock(&self.in_flight).entry(key.clone()) {
                Entry::Occupied(entry) => Some(entry.get().subscribe()),
                Entry::Vacant(entry) => {
                    entry.insert(watch::channel(None).0);
                    None
                }
            };

            let Some(mut receiver) = waiter else {
                return self.fetch(&key, &url).await;
            };

            tracing::debug!(%key, "Joining in-flight catalog fetch");
            let outcome = match receiver.wait_for(Option::is_some).await {
                Ok(outcome) => outcome.clone(),
                Err(_) => None,
            };
            match outcome {
                Some(outcome) => return outcome,
                None => tracing::debug!(%key, "In-flight fetch was cancelled, retrying"),
            }
        }
    }

    /// Performs the single request for `key`, unless the cache was filled
    /// meanwhile. The caller must have registered `key` in the in-flight table.
    async fn fetch(&self, key: &str, url: &str) -> Outcome {
        let flight = Flight {
            key,
            state: &self.state,
            in_flight: &self.in_flight,
            previous_state: Some(std::mem::replace(
                &mut *lock(&self.state),
                LoadState::Loading,
            )),
        };

        // A leader may have cached its result and left the table between our
        // cache miss and our registration.
        if let Some(catalog) = self.cache.get::<Catalog>(key) {
            tracing::debug!(%key, count = catalog.len(), "Catalog cached by an earlier fetch");
            let outcome = Ok(catalog);
            flight.complete(&outcome);
            return outcome;
        }

        tracing::debug!(%key, %url, "Fetching event catalog");
        let outcome = match self.transport.fetch(url).await {
            Ok(response) => interpret_response(&response),
            Err(err) => {
                tracing::debug!(%key, error = %err, "Transport failed");
                Err(FetchError::from(err))
            }
        };

        match &outcome {
            Ok(catalog) => {
                self.cache
                    .set(key, catalog, self.config.cache_ttl_minutes());
                tracing::debug!(%key, count = catalog.len(), "Event catalog fetched");
            }
            Err(err) => tracing::warn!(%key, error = %err, "Failed to fetch event catalog"),
        }

        flight.complete(&outcome);
        outcome
    }

    #[cfg(test)]
    fn waiters(&self, key: &str) -> usize {
        lock(&self.in_flight)
            .get(key)
            .map_or(0, |sender| sender.receiver_count())
    }
}

/// Registration of an in-flight request.
///
/// Completing it publishes the outcome to waiters. Dropping it without
/// completing (the leading future was cancelled) restores the previous load
/// state and closes the channel so waiters retry.
struct Flight<'a> {
    key: &'a str,
    state: &'a Mutex<LoadState>,
    in_flight: &'a Mutex<InFlight>,
    previous_state: Option<LoadState>,
}

impl Flight<'_> {
    fn complete(mut self, outcome: &Outcome) {
        self.previous_state = None;
        *lock(self.state) = match outcome {
            Ok(_) => LoadState::Success,
            Err(err) => LoadState::Failed(err.clone()),
        };
        if let Some(sender) = lock(self.in_flight).remove(self.key) {
            sender.send_replace(Some(outcome.clone()));
        }
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        let Some(previous) = self.previous_state.take() else {
            return;
        };
        tracing::debug!(key = %self.key, "Catalog fetch cancelled, discarding");
        *lock(self.state) = previous;
        lock(self.in_flight).remove(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use tokio::sync::Semaphore;

    use crate::cache::{ManualClock, MemoryStorage};
    use crate::repository::{TransportError, TransportResponse, NETWORK_ERROR_MESSAGE};

    type Reply = std::result::Result<TransportResponse, TransportError>;

    /// Transport that replays scripted replies and counts requests.
    ///
    /// The last scripted reply repeats once the script runs out. With a gate,
    /// every request blocks until a permit is added.
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(replies: Vec<Reply>, gate: Arc<Semaphore>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(replies)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn fetch(&self, url: &str) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            lock(&self.urls).push(url.to_string());
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            let mut replies = lock(&self.replies);
            if replies.len() > 1 {
                replies.pop_front().unwrap()
            } else {
                replies.front().cloned().unwrap()
            }
        }
    }

    fn feed() -> serde_json::Value {
        json!({
            "events": [
                {
                    "id": 1,
                    "event_name": "Butterfly 100M",
                    "event_category": "Swimming",
                    "start_time": "2022-12-17 13:00:00",
                    "end_time": "2022-12-17 14:00:00"
                },
                {
                    "id": 4,
                    "event_name": "Shot put 400M",
                    "event_category": "Shotput",
                    "start_time": "2022-12-20 13:30:00",
                    "end_time": "2022-12-20 16:00:00"
                }
            ]
        })
    }

    fn ok() -> Reply {
        Ok(TransportResponse::ok_json(&feed()))
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap())
    }

    fn repository(
        transport: Arc<ScriptedTransport>,
        clock: ManualClock,
    ) -> EventRepository<Arc<ScriptedTransport>, MemoryStorage, ManualClock> {
        let cache = TimedCache::with_clock(MemoryStorage::new(), clock);
        let config = RepositoryConfig::single("http://events.test/feed").unwrap();
        EventRepository::with_cache(transport, cache, config)
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(StdDuration::from_millis(2)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_fetches_and_caches_on_first_load() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let repo = repository(transport.clone(), clock());
        assert_eq!(repo.state(), LoadState::Idle);

        let catalog = repo.load_catalog().await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(transport.calls(), 1);
        assert_eq!(repo.state(), LoadState::Success);
        assert_eq!(repo.cache().get::<Catalog>("events"), Some(catalog));
        assert_eq!(*lock(&transport.urls), vec!["http://events.test/feed"]);
    }

    #[tokio::test]
    async fn test_repeated_loads_within_ttl_do_not_refetch() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let clock = clock();
        let repo = repository(transport.clone(), clock.clone());

        let first = repo.load_catalog().await.unwrap();
        clock.advance(Duration::minutes(59));
        let second = repo.load_catalog().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let clock = clock();
        let repo = repository(transport.clone(), clock.clone());

        repo.load_catalog().await.unwrap();
        clock.advance(Duration::minutes(61));
        repo.load_catalog().await.unwrap();

        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_serves_catalog_cached_by_another_session() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let storage = MemoryStorage::new();
        let first = EventRepository::with_cache(
            transport.clone(),
            TimedCache::with_clock(storage.clone(), clock()),
            RepositoryConfig::default(),
        );
        first.load_catalog().await.unwrap();

        let second = EventRepository::with_cache(
            transport.clone(),
            TimedCache::with_clock(storage, clock()),
            RepositoryConfig::default(),
        );
        assert_eq!(second.load_catalog().await.unwrap().len(), 2);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_client_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(TransportResponse::new(
            404,
            "Not Found",
            "",
        ))]));
        let repo = repository(transport, clock());

        let err = repo.load_catalog().await.unwrap_err();

        assert_eq!(
            err,
            FetchError::Client {
                status: 404,
                status_text: "Not Found".to_string()
            }
        );
        assert!(err.message().contains("404"));
        assert!(err.message().contains("Not Found"));
        assert_eq!(repo.state(), LoadState::Failed(err));
    }

    #[tokio::test]
    async fn test_server_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(TransportResponse::new(
            500,
            "Internal Server Error",
            "boom",
        ))]));
        let repo = repository(transport, clock());

        let err = repo.load_catalog().await.unwrap_err();
        assert_eq!(err.message(), "Server Error 500: Internal Server Error");
    }

    #[tokio::test]
    async fn test_network_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError(
            "connection refused".to_string(),
        ))]));
        let repo = repository(transport, clock());

        let err = repo.load_catalog().await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(TransportResponse::ok_json(
            &json!({ "invalidField": "nope" }),
        ))]));
        let repo = repository(transport, clock());

        let err = repo.load_catalog().await.unwrap_err();
        assert_eq!(
            err,
            FetchError::MalformedResponse("missing events".to_string())
        );
    }

    #[tokio::test]
    async fn test_failures_are_not_cached_and_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(TransportResponse::new(503, "Service Unavailable", "")),
            ok(),
        ]));
        let repo = repository(transport.clone(), clock());

        assert!(repo.load_catalog().await.is_err());
        assert_eq!(transport.calls(), 1);
        assert!(repo.cache().get::<Catalog>("events").is_none());

        // A user-initiated retry reaches the source again
        assert!(repo.load_catalog().await.is_ok());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_triggers_fetch() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let repo = repository(transport.clone(), clock());
        repo.cache()
            .storage()
            .set_item("events", "{\"data\": 12")
            .unwrap();

        assert_eq!(repo.load_catalog().await.unwrap().len(), 2);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let repo = repository(transport.clone(), clock());

        repo.load_catalog().await.unwrap();
        repo.refresh().await.unwrap();

        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(ScriptedTransport::gated(vec![ok()], gate.clone()));
        let repo = Arc::new(repository(transport.clone(), clock()));

        let leader = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| transport.calls() == 1).await;
        assert!(repo.state().is_loading());

        let follower = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| repo.waiters("events") == 1).await;

        gate.add_permits(1);
        let leader = leader.await.unwrap().unwrap();
        let follower = follower.await.unwrap().unwrap();

        assert_eq!(leader, follower);
        assert_eq!(transport.calls(), 1);
        assert_eq!(repo.state(), LoadState::Success);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_failure() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(ScriptedTransport::gated(
            vec![Ok(TransportResponse::new(500, "Internal Server Error", ""))],
            gate.clone(),
        ));
        let repo = Arc::new(repository(transport.clone(), clock()));

        let leader = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| transport.calls() == 1).await;

        let follower = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| repo.waiters("events") == 1).await;

        gate.add_permits(1);
        let leader = leader.await.unwrap().unwrap_err();
        let follower = follower.await.unwrap().unwrap_err();

        assert_eq!(leader, follower);
        assert!(matches!(leader, FetchError::Server { status: 500, .. }));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_load_discards_result() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(ScriptedTransport::gated(vec![ok()], gate.clone()));
        let repo = Arc::new(repository(transport.clone(), clock()));

        let load = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| transport.calls() == 1).await;
        assert!(repo.state().is_loading());

        load.abort();
        assert!(load.await.unwrap_err().is_cancelled());

        assert_eq!(repo.state(), LoadState::Idle);
        assert!(repo.cache().get::<Catalog>("events").is_none());
        assert!(lock(&repo.in_flight).is_empty());

        // A later load starts from scratch
        gate.add_permits(1);
        assert!(repo.load_catalog().await.is_ok());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_waiter_retries_when_leader_is_cancelled() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(ScriptedTransport::gated(vec![ok()], gate.clone()));
        let repo = Arc::new(repository(transport.clone(), clock()));

        let leader = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| transport.calls() == 1).await;

        let follower = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| repo.waiters("events") == 1).await;

        leader.abort();
        let _ = leader.await;

        // The follower takes over with its own request
        wait_until(|| transport.calls() == 2).await;
        gate.add_permits(1);
        assert_eq!(follower.await.unwrap().unwrap().len(), 2);
        assert_eq!(repo.state(), LoadState::Success);
    }

    /// Storage whose next read, once armed, returns what it saw and then
    /// blocks until released.
    #[derive(Default)]
    struct StalledRead {
        inner: MemoryStorage,
        armed: AtomicBool,
        entered: AtomicBool,
        released: AtomicBool,
    }

    impl Storage for StalledRead {
        fn get_item(&self, key: &str) -> crate::cache::Result<Option<String>> {
            let value = self.inner.get_item(key);
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.store(true, Ordering::SeqCst);
                let started = std::time::Instant::now();
                while !self.released.load(Ordering::SeqCst)
                    && started.elapsed() < StdDuration::from_secs(5)
                {
                    std::thread::sleep(StdDuration::from_millis(1));
                }
            }
            value
        }

        fn set_item(&self, key: &str, value: &str) -> crate::cache::Result<()> {
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> crate::cache::Result<()> {
            self.inner.remove_item(key)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_late_caller_reuses_result_cached_after_its_miss() {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(ScriptedTransport::gated(vec![ok()], gate.clone()));
        let storage = Arc::new(StalledRead::default());
        let repo = Arc::new(EventRepository::with_cache(
            transport.clone(),
            TimedCache::with_clock(storage.clone(), clock()),
            RepositoryConfig::single("http://events.test/feed").unwrap(),
        ));

        let leader = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| transport.calls() == 1).await;

        // The late caller misses the cache and stalls before registering
        storage.armed.store(true, Ordering::SeqCst);
        let late = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load_catalog().await }
        });
        wait_until(|| storage.entered.load(Ordering::SeqCst)).await;

        // The leader finishes and leaves the in-flight table meanwhile
        gate.add_permits(1);
        let leader = leader.await.unwrap().unwrap();
        assert!(lock(&repo.in_flight).is_empty());

        storage.released.store(true, Ordering::SeqCst);
        let late = late.await.unwrap().unwrap();

        assert_eq!(late, leader);
        assert_eq!(transport.calls(), 1);
        assert_eq!(repo.state(), LoadState::Success);
    }

    #[tokio::test]
    async fn test_paged_source_caches_per_page() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok()]));
        let cache = TimedCache::with_clock(MemoryStorage::new(), clock());
        let config = RepositoryConfig::paged(vec![
            "http://events.test/page/1".to_string(),
            "http://events.test/page/2".to_string(),
        ])
        .unwrap();
        let repo = EventRepository::with_cache(transport.clone(), cache, config);

        repo.load_catalog().await.unwrap();
        repo.load_page(2).await.unwrap();
        repo.load_page(1).await.unwrap();
        // Out of range pages clamp to the last page, which is cached
        repo.load_page(7).await.unwrap();

        assert_eq!(transport.calls(), 2);
        assert_eq!(
            *lock(&transport.urls),
            vec!["http://events.test/page/1", "http://events.test/page/2"]
        );
        assert!(repo.cache().get::<Catalog>("events:page:1").is_some());
        assert!(repo.cache().get::<Catalog>("events:page:2").is_some());
        assert_eq!(repo.pager().total_pages(), 2);

        repo.clear_cache();
        assert!(repo.cache().storage().is_empty());
    }
}
