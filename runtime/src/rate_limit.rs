//! Rate limiting for dispatch sites.
//!
//! Search-as-you-type and scroll-driven "load more" produce bursts of intents.
//! [`Debouncer`] collapses a burst into its last call; [`Throttle`] lets at most
//! one call through per interval. Neither gives ordering guarantees: stale
//! fetch results are rejected by the reducer's request tokens, not here.
//!
//! Both are driven by `tokio::time`, so tests can run them under
//! `tokio::time::pause()`.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Default debounce window for search text changes
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default throttle interval for scroll events
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(100);

/// Runs only the last of a burst of calls, once `delay` has passed quietly.
///
/// Each [`call`](Debouncer::call) supersedes the previous one. A superseded
/// call is dropped when its timer fires; a call whose timer already fired
/// runs to completion.
///
/// # Example
///
/// ```ignore
/// let debouncer = Debouncer::new(DEFAULT_DEBOUNCE);
/// for text in ["s", "sh", "shoe"] {
///     let store = store.clone();
///     let text = text.to_string();
///     debouncer.call(move || async move {
///         let _ = store.send(CatalogAction::search(text)).await;
///     });
/// }
/// // Only the "shoe" search is dispatched
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The configured quiet period
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `f` to run after the quiet period, superseding earlier calls
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F, Fut>(&self, f: F) -> tokio::task::JoinHandle<bool>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != mine {
                tracing::trace!(generation = mine, "Debounced call superseded");
                return false;
            }
            f().await;
            true
        })
    }

    /// Drop every pending call
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Lets at most one call through per interval.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    origin: Instant,
    /// Millis since `origin` of the last accepted call, plus one; 0 = never.
    last: AtomicU64,
}

impl Throttle {
    /// Create a throttle with the given minimum interval between calls
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            origin: Instant::now(),
            last: AtomicU64::new(0),
        }
    }

    /// Returns `true` if the caller may proceed now
    pub fn try_acquire(&self) -> bool {
        let now = u64::try_from(self.origin.elapsed().as_millis())
            .unwrap_or(u64::MAX - 1)
            .saturating_add(1);
        let interval = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);

        let mut last = self.last.load(Ordering::Acquire);
        loop {
            if last != 0 && now.saturating_sub(last) < interval {
                return false;
            }
            match self
                .last
                .compare_exchange(last, now, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return true,
                Err(current) => last = current,
            }
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use std::sync::Mutex;

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_runs_only_last_call() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for text in ["s", "sh", "shoe"] {
            let seen = Arc::clone(&seen);
            handles.push(debouncer.call(move || async move {
                seen.lock().unwrap().push(text);
            }));
            tokio::time::advance(Duration::from_millis(100)).await;
        }

        let mut ran = Vec::new();
        for handle in handles {
            ran.push(handle.await.unwrap());
        }

        assert_eq!(ran, vec![false, false, true]);
        assert_eq!(*seen.lock().unwrap(), vec!["shoe"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_separated_calls_both_run() {
        let debouncer = Debouncer::new(Duration::from_millis(500));

        let first = debouncer.call(|| async {});
        tokio::time::advance(Duration::from_millis(600)).await;
        assert!(first.await.unwrap());

        let second = debouncer.call(|| async {});
        assert!(second.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel() {
        let debouncer = Debouncer::default();
        assert_eq!(debouncer.delay(), DEFAULT_DEBOUNCE);

        let pending = debouncer.call(|| async {});
        debouncer.cancel();

        assert!(!pending.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_limits_rate() {
        let throttle = Throttle::new(Duration::from_millis(100));

        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());

        tokio::time::advance(Duration::from_millis(50)).await;
        assert!(!throttle.try_acquire());

        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }
}
