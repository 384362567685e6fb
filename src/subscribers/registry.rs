//! # Ordered fan-out of updates to registered subscribers.
//!
//! Provides [`SubscriptionRegistry`], which maps [`SubscriptionId`]s to
//! subscribers and delivers every published [`Update`] to each of them.
//!
//! ## Architecture
//! ```text
//! publish(&update)
//!     │  snapshot registrations (lock held only while cloning)
//!     ├──► sub #1.on_update() ──► Ok / Err / panic → logged, counted
//!     ├──► sub #2.on_update()
//!     └──► sub #N.on_update()
//! ```
//!
//! ## Rules
//! - **Registration order**: subscribers are invoked in the order they subscribed
//! - **Exactly once**: each subscriber active for the whole pass sees the update once
//! - **Isolation**: an `Err` or a panic from one subscriber never stops delivery to the next
//! - **Removal is immediate**: a subscriber unsubscribed mid-pass is skipped if not yet reached
//! - **Best-effort, no mid-publish snapshot guarantee**: a subscriber added while a pass
//!   is running does not receive that pass's update
//! - **Re-entrancy**: no lock is held while a subscriber runs, so subscribers may
//!   subscribe or unsubscribe from inside `on_update`
//!
//! ## Panic handling
//! Each call is wrapped in `catch_unwind`. **Warning**: `AssertUnwindSafe` is used,
//! which can leave shared state inconsistent if a subscriber panics while holding a lock.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::SubscriberError;
use crate::events::Update;
use crate::subscribers::Subscribe;

/// Opaque handle returned by [`SubscriptionRegistry::subscribe`].
///
/// Ids are never reused within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome counters for one publish pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Subscribers that handled the update.
    pub delivered: usize,
    /// Subscribers that returned `Err` or panicked.
    pub failed: usize,
}

impl Delivery {
    /// Total subscribers invoked.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

struct Registration {
    id: SubscriptionId,
    sub: Arc<dyn Subscribe>,
    active: AtomicBool,
}

/// Subscriber map with ordered, failure-isolated fan-out.
pub struct SubscriptionRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<Arc<Registration>>>,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Registers a subscriber and returns its id.
    pub fn subscribe(&self, sub: impl Subscribe) -> SubscriptionId {
        self.subscribe_arc(Arc::new(sub))
    }

    /// Registers a shared subscriber and returns its id.
    ///
    /// The same `Arc` may be registered more than once; each registration gets
    /// its own id and its own delivery.
    pub fn subscribe_arc(&self, sub: Arc<dyn Subscribe>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(event = "feed.registry.subscribed", %id, subscriber = sub.name());

        self.lock().push(Arc::new(Registration {
            id,
            sub,
            active: AtomicBool::new(true),
        }));
        id
    }

    /// Removes a subscriber.
    ///
    /// Returns `false` when the id is unknown or already removed; that is not an error.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut entries = self.lock();
            entries
                .iter()
                .position(|r| r.id == id)
                .map(|pos| entries.remove(pos))
        };
        match removed {
            Some(reg) => {
                reg.active.store(false, Ordering::Release);
                debug!(event = "feed.registry.unsubscribed", %id);
                true
            }
            None => false,
        }
    }

    /// Drops every subscription (owner teardown).
    pub fn clear(&self) {
        let drained: Vec<_> = self.lock().drain(..).collect();
        for reg in &drained {
            reg.active.store(false, Ordering::Release);
        }
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.lock().iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Delivers `update` to every subscriber registered when the pass starts.
    ///
    /// Never fails: subscriber errors and panics are logged and counted in the
    /// returned [`Delivery`].
    pub async fn publish(&self, update: &Update) -> Delivery {
        let snapshot: Vec<Arc<Registration>> = self.lock().clone();
        let mut out = Delivery::default();

        for reg in snapshot {
            if !reg.active.load(Ordering::Acquire) {
                continue;
            }
            let fut = reg.sub.on_update(update);

            let failure = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err),
                Err(panic_err) => Some(SubscriberError::Panicked {
                    info: panic_message(&*panic_err),
                }),
            };

            match failure {
                None => out.delivered += 1,
                Some(err) => {
                    out.failed += 1;
                    warn!(
                        event = "feed.registry.subscriber_failed",
                        id = %reg.id,
                        subscriber = reg.sub.name(),
                        update = %update.id,
                        label = err.as_label(),
                        error = %err,
                    );
                }
            }
        }
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<Registration>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::UpdateKind;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;

    fn update(kind: UpdateKind) -> Update {
        Update::new(kind, "title", "message")
    }

    /// Records the ids of updates it sees.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_update(&self, update: &Update) -> Result<(), SubscriberError> {
            self.seen.lock().unwrap().push(update.seq);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Subscribe for Failing {
        async fn on_update(&self, _update: &Update) -> Result<(), SubscriberError> {
            Err(SubscriberError::failed("render queue closed"))
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct Panicking;

    #[async_trait]
    impl Subscribe for Panicking {
        async fn on_update(&self, _update: &Update) -> Result<(), SubscriberError> {
            panic!("boom");
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let reg = SubscriptionRegistry::new();
        let mut ids = HashSet::new();
        for _ in 0..100 {
            assert!(ids.insert(reg.subscribe(|_: &Update| {})));
        }
        assert_eq!(reg.len(), 100);
    }

    #[test]
    fn test_ids_not_reused_after_unsubscribe() {
        let reg = SubscriptionRegistry::new();
        let a = reg.subscribe(|_: &Update| {});
        assert!(reg.unsubscribe(a));
        let b = reg.subscribe(|_: &Update| {});
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber_once() {
        let reg = SubscriptionRegistry::new();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        reg.subscribe_arc(a.clone());
        reg.subscribe_arc(b.clone());

        let up = update(UpdateKind::Audit);
        let delivery = reg.publish(&up).await;

        assert_eq!(delivery, Delivery { delivered: 2, failed: 0 });
        assert_eq!(*a.seen.lock().unwrap(), vec![up.seq]);
        assert_eq!(*b.seen.lock().unwrap(), vec![up.seq]);
    }

    #[tokio::test]
    async fn test_publish_follows_registration_order() {
        let reg = SubscriptionRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..5 {
            let order = order.clone();
            reg.subscribe(move |_: &Update| order.lock().unwrap().push(n));
        }
        reg.publish(&update(UpdateKind::Team)).await;
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery_and_is_idempotent() {
        let reg = SubscriptionRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let id = reg.subscribe(move |_: &Update| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        reg.publish(&update(UpdateKind::System)).await;
        assert!(reg.unsubscribe(id));
        assert!(!reg.unsubscribe(id));
        assert!(!reg.contains(id));
        reg.publish(&update(UpdateKind::System)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(reg.is_empty());
    }

    #[tokio::test]
    async fn test_failures_do_not_block_later_subscribers() {
        let reg = SubscriptionRegistry::new();
        let tail = Arc::new(Recorder::default());
        reg.subscribe(Failing);
        reg.subscribe(Panicking);
        reg.subscribe_arc(tail.clone());

        let delivery = reg.publish(&update(UpdateKind::Compliance)).await;

        assert_eq!(delivery.delivered, 1);
        assert_eq!(delivery.failed, 2);
        assert_eq!(delivery.attempted(), 3);
        assert_eq!(tail.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_may_unsubscribe_a_later_one_mid_pass() {
        let reg = Arc::new(SubscriptionRegistry::new());
        let late_hits = Arc::new(AtomicUsize::new(0));

        let victim_slot = Arc::new(Mutex::new(None::<SubscriptionId>));
        let r = reg.clone();
        let slot = victim_slot.clone();
        reg.subscribe(move |_: &Update| {
            if let Some(id) = *slot.lock().unwrap() {
                r.unsubscribe(id);
            }
        });
        let h = late_hits.clone();
        let victim = reg.subscribe(move |_: &Update| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        *victim_slot.lock().unwrap() = Some(victim);

        let delivery = reg.publish(&update(UpdateKind::Project)).await;
        assert_eq!(delivery.delivered, 1);
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_subscribe_during_pass_waits_for_next_publish() {
        let reg = Arc::new(SubscriptionRegistry::new());
        let late_hits = Arc::new(AtomicUsize::new(0));

        let r = reg.clone();
        let h = late_hits.clone();
        let added = Arc::new(AtomicBool::new(false));
        reg.subscribe(move |_: &Update| {
            if !added.swap(true, Ordering::SeqCst) {
                let h = h.clone();
                r.subscribe(move |_: &Update| {
                    h.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        reg.publish(&update(UpdateKind::Team)).await;
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);
        reg.publish(&update(UpdateKind::Team)).await;
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let reg = SubscriptionRegistry::new();
        reg.subscribe(|_: &Update| {});
        reg.subscribe(|_: &Update| {});
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.publish(&update(UpdateKind::Audit)).await.attempted(), 0);
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}
