//! Single-value cache with staleness-bounded reads and single-flight fetches.
//!
//! # Invalidation while a fetch is outstanding
//!
//! [`Cached::invalidate`] never cancels a running fetch. Callers already
//! waiting on it still receive its result, but the fetch is detached from the
//! cache: its value is discarded and the next [`Cached::fetch`] issues a new
//! request. A generation counter tags each fetch so a stale completion cannot
//! overwrite state that was cleared after it started.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use eatery_core::Clock;
use futures::future::{BoxFuture, FutureExt, Shared};

type Fetcher<T, E> = dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync;
type InFlight<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

struct State<T, E> {
    value: Option<T>,
    fetched_at: Option<DateTime<Utc>>,
    in_flight: Option<InFlight<T, E>>,
    generation: u64,
}

/// A lazily fetched value that is refreshed once it grows too stale.
///
/// Concurrent [`fetch`](Self::fetch) calls that miss the cache share a single
/// underlying request and all receive its result, success or error. A failed
/// fetch leaves the cache as it was.
pub struct Cached<T, E> {
    state: Arc<Mutex<State<T, E>>>,
    fetcher: Arc<Fetcher<T, E>>,
    clock: Arc<dyn Clock>,
}

impl<T, E> fmt::Debug for Cached<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Cached")
            .field("has_value", &state.value.is_some())
            .field("fetched_at", &state.fetched_at)
            .field("in_flight", &state.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

fn lock<S>(mutex: &Mutex<S>) -> MutexGuard<'_, S> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T, E> Cached<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache that calls `fetch` on a miss.
    pub fn new<F, Fut>(clock: Arc<dyn Clock>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let fetcher: Arc<Fetcher<T, E>> = Arc::new(move || fetch().boxed());
        Self {
            state: Arc::new(Mutex::new(State {
                value: None,
                fetched_at: None,
                in_flight: None,
                generation: 0,
            })),
            fetcher,
            clock,
        }
    }

    /// Returns the cached value if it was fetched at most `max_staleness`
    /// ago, otherwise joins or starts a fetch.
    pub async fn fetch(&self, max_staleness: Duration) -> Result<T, E> {
        let in_flight = {
            let mut state = lock(&self.state);
            if let (Some(value), Some(fetched_at)) = (&state.value, state.fetched_at) {
                if self.clock.now() - fetched_at <= max_staleness {
                    tracing::trace!(%fetched_at, "cache hit");
                    return Ok(value.clone());
                }
            }

            if let Some(in_flight) = &state.in_flight {
                tracing::trace!("joining in-flight fetch");
                in_flight.clone()
            } else {
                tracing::debug!("cache miss, starting fetch");
                let in_flight = self.start(state.generation);
                state.in_flight = Some(in_flight.clone());
                in_flight
            }
        };
        in_flight.await
    }

    /// Clears the cached value. Does not cancel an in-flight fetch.
    pub fn invalidate(&self) {
        let mut state = lock(&self.state);
        state.value = None;
        state.fetched_at = None;
        state.in_flight = None;
        state.generation = state.generation.wrapping_add(1);
        tracing::debug!(generation = state.generation, "cache invalidated");
    }

    /// The cached value, however stale, without fetching.
    pub fn peek(&self) -> Option<T> {
        lock(&self.state).value.clone()
    }

    /// When the cached value was fetched.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.state).fetched_at
    }

    fn start(&self, generation: u64) -> InFlight<T, E> {
        let request = (self.fetcher)();
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);

        async move {
            let result = request.await;
            let mut state = lock(&state);
            if state.generation != generation {
                tracing::debug!("discarding fetch that started before invalidation");
                return result;
            }
            state.in_flight = None;
            if let Ok(value) = &result {
                state.value = Some(value.clone());
                state.fetched_at = Some(clock.now());
            } else {
                tracing::debug!("fetch failed, cache unchanged");
            }
            result
        }
        .boxed()
        .shared()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use eatery_core::ManualClock;

    fn clock() -> Arc<ManualClock> {
        let start = DateTime::parse_from_rfc3339("2025-01-06T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Arc::new(ManualClock::new(start))
    }

    /// A cache whose n-th fetch returns `n` after a short delay.
    fn counting(clock: Arc<ManualClock>, calls: Arc<AtomicUsize>) -> Cached<usize, String> {
        Cached::new(clock, move || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok(n)
            }
        })
    }

    /// A cache whose odd-numbered fetches fail.
    fn flaky(clock: Arc<ManualClock>, calls: Arc<AtomicUsize>) -> Cached<usize, String> {
        Cached::new(clock, move || {
            let calls = Arc::clone(&calls);
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                if n % 2 == 1 {
                    Err(format!("failure {n}"))
                } else {
                    Ok(n)
                }
            }
        })
    }

    #[tokio::test]
    async fn fresh_value_is_served_from_cache() {
        let clock = clock();
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting(Arc::clone(&clock), Arc::clone(&calls));

        assert_eq!(cache.fetch(Duration::minutes(5)).await, Ok(1));
        clock.advance(Duration::minutes(5));
        assert_eq!(cache.fetch(Duration::minutes(5)).await, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_value_is_refetched() {
        let clock = clock();
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting(Arc::clone(&clock), Arc::clone(&calls));

        assert_eq!(cache.fetch(Duration::minutes(5)).await, Ok(1));
        clock.advance(Duration::minutes(5) + Duration::seconds(1));
        assert_eq!(cache.fetch(Duration::minutes(5)).await, Ok(2));
        assert_eq!(cache.fetched_at(), Some(clock.now()));
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting(clock(), Arc::clone(&calls));
        let staleness = Duration::minutes(5);

        let (a, b, c, d) = tokio::join!(
            cache.fetch(staleness),
            cache.fetch(staleness),
            cache.fetch(staleness),
            cache.fetch(staleness),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!([a, b, c, d], [Ok(1), Ok(1), Ok(1), Ok(1)]);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = flaky(clock(), Arc::clone(&calls));
        let staleness = Duration::minutes(5);

        let (a, b, c) = tokio::join!(
            cache.fetch(staleness),
            cache.fetch(staleness),
            cache.fetch(staleness),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let expected: Result<usize, String> = Err("failure 1".to_string());
        assert_eq!([a, b, c], [expected.clone(), expected.clone(), expected]);
        assert_eq!(cache.peek(), None);

        // The failed attempt is not remembered; the next call fetches again.
        assert_eq!(cache.fetch(staleness).await, Ok(2));
    }

    #[tokio::test]
    async fn failure_keeps_previous_value() {
        let clock = clock();
        let calls = Arc::new(AtomicUsize::new(1));
        let cache = flaky(Arc::clone(&clock), Arc::clone(&calls));

        assert_eq!(cache.fetch(Duration::minutes(5)).await, Ok(2));
        let fetched_at = cache.fetched_at();
        clock.advance(Duration::minutes(10));

        assert_eq!(
            cache.fetch(Duration::minutes(5)).await,
            Err("failure 3".to_string())
        );
        assert_eq!(cache.peek(), Some(2));
        assert_eq!(cache.fetched_at(), fetched_at);
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = counting(clock(), Arc::clone(&calls));

        assert_eq!(cache.fetch(Duration::hours(1)).await, Ok(1));
        cache.invalidate();
        assert_eq!(cache.peek(), None);
        assert_eq!(cache.fetched_at(), None);
        assert_eq!(cache.fetch(Duration::hours(1)).await, Ok(2));
    }

    #[tokio::test]
    async fn invalidate_detaches_in_flight_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(counting(clock(), Arc::clone(&calls)));

        let early = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.fetch(Duration::hours(1)).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate();
        let late = cache.fetch(Duration::hours(1)).await;

        // The early caller still gets its own result; the late one does not
        // reuse it.
        assert_eq!(early.await.unwrap(), Ok(1));
        assert_eq!(late, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.peek(), Some(2));
    }
}
