//! # Single delivery path for updates.
//!
//! Every update, scheduled or manual, goes through [`UpdateHub::deliver`]:
//! it is stamped and recorded in the rolling [`UpdateLog`] under one lock, then
//! fanned out by the [`SubscriptionRegistry`]. The log lock is released before
//! any subscriber runs.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::core::store::UpdateLog;
use crate::events::Update;
use crate::subscribers::{Delivery, SubscriptionRegistry};

/// Registry plus rolling log, shared by the feed and the source.
pub(crate) struct UpdateHub {
    pub(crate) registry: SubscriptionRegistry,
    log: Mutex<UpdateLog>,
}

impl UpdateHub {
    pub(crate) fn new(max_updates: usize) -> Self {
        Self {
            registry: SubscriptionRegistry::new(),
            log: Mutex::new(UpdateLog::new(max_updates)),
        }
    }

    /// Stamps `update`, records it and publishes it to all subscribers.
    pub(crate) async fn deliver(&self, update: &mut Update) -> Delivery {
        let evicted = {
            let mut log = self.log();
            update.restamp();
            log.push(update.clone())
        };
        if let Some(evicted) = evicted {
            debug!(event = "feed.log.evicted", seq = evicted.seq, kind = %evicted.kind);
        }
        let delivery = self.registry.publish(&*update).await;
        debug!(
            event = "feed.update.delivered",
            seq = update.seq,
            kind = %update.kind,
            delivered = delivery.delivered,
            failed = delivery.failed,
        );
        delivery
    }

    pub(crate) fn log(&self) -> MutexGuard<'_, UpdateLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
