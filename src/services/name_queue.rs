//! Background name resolution queue.
//!
//! Addresses are resolved one at a time with a fixed pause between requests.
//! The queue owns the name cache: an address that has settled (hit or miss),
//! is in flight, or is already queued is never queued again, so every address
//! is looked up at most once per session.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::client::NameService;
use crate::domain::NameCache;

// ============================================================================
// Constants
// ============================================================================

/// Default pause between two name lookups.
pub const DEFAULT_NAME_DELAY: Duration = Duration::from_millis(15);

// ============================================================================
// Types
// ============================================================================

/// Outcome of one lookup. `name` is `None` for misses and failures alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResolved {
    pub address: String,
    pub name: Option<String>,
}

#[derive(Debug, Default)]
struct QueueState {
    cache: NameCache,
    queued: VecDeque<String>,
    queued_set: HashSet<String>,
    in_flight: Option<String>,
    running: bool,
}

impl QueueState {
    fn is_known(&self, address: &str) -> bool {
        self.cache.is_settled(address)
            || self.in_flight.as_deref() == Some(address)
            || self.queued_set.contains(address)
    }
}

// ============================================================================
// Queue
// ============================================================================

/// Single-flight, paced name resolver.
///
/// Results are delivered as `M::from(NameResolved)` on the given channel.
pub struct NameQueue<M> {
    state: Arc<Mutex<QueueState>>,
    service: Arc<dyn NameService>,
    delay: Duration,
    notify: mpsc::UnboundedSender<M>,
}

impl<M> Clone for NameQueue<M> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            service: Arc::clone(&self.service),
            delay: self.delay,
            notify: self.notify.clone(),
        }
    }
}

impl<M> std::fmt::Debug for NameQueue<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameQueue")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<M> NameQueue<M>
where
    M: From<NameResolved> + Send + 'static,
{
    #[must_use]
    pub fn new(
        service: Arc<dyn NameService>,
        delay: Duration,
        notify: mpsc::UnboundedSender<M>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            service,
            delay,
            notify,
        }
    }

    /// Queues every address not yet settled, in flight or queued, and starts
    /// the drain task if it is idle. Returns the number of addresses queued.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue<I, S>(&self, addresses: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = lock(&self.state);
        let mut added = 0;
        for address in addresses {
            let address = address.as_ref();
            if address.is_empty() || state.is_known(address) {
                continue;
            }
            state.queued.push_back(address.to_string());
            state.queued_set.insert(address.to_string());
            added += 1;
        }

        if !state.running && !state.queued.is_empty() {
            state.running = true;
            drop(state);
            trace!(added, "starting name queue drain");
            tokio::spawn(self.clone().drain());
        }
        added
    }

    async fn drain(self) {
        loop {
            // The emptiness check and the `running` reset happen under the same
            // lock as `enqueue`, so an enqueue racing the end of a drain either
            // lands in this loop or starts a fresh drain.
            let address = {
                let mut state = lock(&self.state);
                let Some(address) = state.queued.pop_front() else {
                    state.running = false;
                    return;
                };
                state.queued_set.remove(&address);
                state.in_flight = Some(address.clone());
                address
            };

            let name = match self.service.resolve_name(&address).await {
                Ok(name) => name,
                Err(error) => {
                    debug!(%address, %error, "name lookup failed, caching miss");
                    None
                }
            };

            {
                let mut state = lock(&self.state);
                state.cache.insert(address.clone(), name.clone());
                state.in_flight = None;
            }
            let _ = self.notify.send(M::from(NameResolved { address, name }));

            tokio::time::sleep(self.delay).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeerError;
    use crate::domain::name::NameState;
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeNames {
        names: HashMap<String, String>,
        failing: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeNames {
        fn with(names: &[(&str, &str)], failing: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                names: names
                    .iter()
                    .map(|(a, n)| ((*a).to_string(), (*n).to_string()))
                    .collect(),
                failing: failing.iter().map(|a| (*a).to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NameService for FakeNames {
        async fn resolve_name(&self, address: &str) -> Result<Option<String>, SeerError> {
            self.calls.lock().unwrap().push(address.to_string());
            tokio::time::sleep(Duration::from_millis(5)).await;
            if self.failing.contains(address) {
                return Err(SeerError::upstream(503, None));
            }
            Ok(self.names.get(address).cloned())
        }
    }

    fn queue(service: Arc<FakeNames>) -> (NameQueue<NameResolved>, mpsc::UnboundedReceiver<NameResolved>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (NameQueue::new(service, DEFAULT_NAME_DELAY, tx), rx)
    }

    fn cache_of(queue: &NameQueue<NameResolved>) -> NameCache {
        lock(&queue.state).cache.clone()
    }

    fn pending(queue: &NameQueue<NameResolved>) -> usize {
        let state = lock(&queue.state);
        state.queued.len() + usize::from(state.in_flight.is_some())
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_in_order_and_caches() {
        let service = FakeNames::with(&[("0xa", "alice.sui")], &[]);
        let (queue, mut rx) = queue(Arc::clone(&service));

        assert_eq!(queue.enqueue(["0xa", "0xb"]), 2);
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();

        assert_eq!(
            first,
            NameResolved {
                address: "0xa".to_string(),
                name: Some("alice.sui".to_string())
            }
        );
        assert_eq!(second.name, None);
        let cache = cache_of(&queue);
        assert_eq!(cache.state("0xa"), NameState::Resolved("alice.sui"));
        assert_eq!(cache.state("0xb"), NameState::Missing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_address_looked_up_once() {
        let service = FakeNames::with(&[("0xa", "alice.sui")], &[]);
        let (queue, mut rx) = queue(Arc::clone(&service));

        assert_eq!(queue.enqueue(["0xa", "0xa"]), 1);
        assert_eq!(queue.enqueue(["0xa"]), 0);
        rx.recv().await.unwrap();
        assert_eq!(queue.enqueue(["0xa"]), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(service.calls(), vec!["0xa".to_string()]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_cached_as_miss_and_never_retried() {
        let service = FakeNames::with(&[], &["0xbad"]);
        let (queue, mut rx) = queue(Arc::clone(&service));

        queue.enqueue(["0xbad"]);
        let resolved = rx.recv().await.unwrap();
        assert_eq!(resolved.name, None);

        assert_eq!(queue.enqueue(["0xbad"]), 0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(service.calls().len(), 1);
        assert_eq!(cache_of(&queue).state("0xbad"), NameState::Missing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarts_after_drain_completes() {
        let service = FakeNames::with(&[("0xb", "bob.sui")], &[]);
        let (queue, mut rx) = queue(Arc::clone(&service));

        queue.enqueue(["0xa"]);
        rx.recv().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(pending(&queue), 0);

        assert_eq!(queue.enqueue(["0xb"]), 1);
        let resolved = rx.recv().await.unwrap();
        assert_eq!(resolved.name.as_deref(), Some("bob.sui"));
        assert_eq!(service.calls(), vec!["0xa".to_string(), "0xb".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_during_drain_joins_running_drain() {
        let service = FakeNames::with(&[], &[]);
        let (queue, mut rx) = queue(Arc::clone(&service));

        queue.enqueue(["0x1"]);
        tokio::task::yield_now().await;
        queue.enqueue(["0x1", "0x2", "0x3"]);

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(rx.recv().await.unwrap().address);
        }
        assert_eq!(seen, vec!["0x1", "0x2", "0x3"]);
        assert_eq!(service.calls().len(), 3);
    }
}
