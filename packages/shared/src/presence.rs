//! Debounced presence: per-key expiry timers with cancel-and-restart semantics.
//!
//! A burst of `refresh` calls for the same key is treated as one continuous
//! presence period that ends only after `window` of silence. Both the relay
//! hub (auto stop-typing broadcast) and the client (auto-expiring typing
//! indicator) own one table each.
//!
//! Invariant: at most one live timer per key. Replacing or cancelling a timer
//! guarantees the old one never reaches the expiry receiver.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::mpsc, task::JoinHandle};

/// Quiet period after which a typing signal is considered over.
pub const TYPING_TIMEOUT: Duration = Duration::from_millis(2500);

/// A key whose presence window elapsed without a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expired<K, V> {
    pub key: K,
    pub value: V,
}

struct Pending<V> {
    generation: u64,
    value: V,
    handle: JoinHandle<()>,
}

type Entries<K, V> = Arc<Mutex<HashMap<K, Pending<V>>>>;

/// Table of debounced per-key timers.
///
/// Expirations are delivered on the receiver returned by [`DebouncedPresence::new`],
/// so the owner consumes them from its own event loop.
///
/// The table lock is never held across an `.await`.
pub struct DebouncedPresence<K, V = ()> {
    window: Duration,
    entries: Entries<K, V>,
    expired_tx: mpsc::UnboundedSender<Expired<K, V>>,
    next_generation: AtomicU64,
}

fn lock<K, V>(entries: &Mutex<HashMap<K, Pending<V>>>) -> MutexGuard<'_, HashMap<K, Pending<V>>> {
    // Entries stay consistent even if a holder panicked
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<K, V> DebouncedPresence<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Create an empty table and the receiver its expirations are sent to.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<Expired<K, V>>) {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        let presence = Self {
            window,
            entries: Arc::new(Mutex::new(HashMap::new())),
            expired_tx,
            next_generation: AtomicU64::new(0),
        };
        (presence, expired_rx)
    }

    /// Start (or restart) the window for `key`.
    ///
    /// Any pending timer for the same key is cancelled first. Returns `true`
    /// if a pending timer was replaced.
    pub async fn refresh(&self, key: K, value: V) -> bool {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        let mut entries = lock(&self.entries);
        let replaced = match entries.remove(&key) {
            Some(previous) => {
                previous.handle.abort();
                true
            }
            None => false,
        };

        let handle = self.schedule(key.clone(), generation);
        entries.insert(
            key,
            Pending {
                generation,
                value,
                handle,
            },
        );

        replaced
    }

    /// Cancel the pending timer for `key`, returning its stored value.
    pub async fn cancel(&self, key: &K) -> Option<V> {
        let mut entries = lock(&self.entries);
        entries.remove(key).map(|pending| {
            pending.handle.abort();
            pending.value
        })
    }

    /// Cancel every pending timer. Returns how many were cancelled.
    pub async fn cancel_all(&self) -> usize {
        abort_all(&self.entries)
    }

    pub async fn is_pending(&self, key: &K) -> bool {
        lock(&self.entries).contains_key(key)
    }

    pub async fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub async fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    fn schedule(&self, key: K, generation: u64) -> JoinHandle<()> {
        let entries = Arc::clone(&self.entries);
        let expired_tx = self.expired_tx.clone();
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;

            let pending = {
                let mut entries = lock(&entries);
                // A timer that woke up after being replaced must not fire.
                let is_current = entries
                    .get(&key)
                    .is_some_and(|pending| pending.generation == generation);
                if !is_current {
                    return;
                }
                entries.remove(&key)
            };

            if let Some(pending) = pending
                && expired_tx
                    .send(Expired {
                        key,
                        value: pending.value,
                    })
                    .is_err()
            {
                tracing::debug!("Presence expiry receiver dropped, discarding expiry");
            }
        })
    }
}

fn abort_all<K, V>(entries: &Mutex<HashMap<K, Pending<V>>>) -> usize {
    let mut entries = lock(entries);
    let count = entries.len();
    for (_, pending) in entries.drain() {
        pending.handle.abort();
    }
    count
}

impl<K, V> Drop for DebouncedPresence<K, V> {
    fn drop(&mut self) {
        let aborted = abort_all(&self.entries);
        if aborted > 0 {
            tracing::debug!("Presence table dropped with {} pending timers", aborted);
        }
    }
}
