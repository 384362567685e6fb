//! # UpdateSource: synthetic update emission.
//!
//! Emulates a live feed by synthesizing [`Update`]s on a randomized schedule.
//!
//! ## Emission loop
//! ```text
//! loop {
//!   ├─► wait = interval.sample()           (uniform in [min, max])
//!   ├─► sleep(wait) (cancellable)
//!   ├─► skip if disconnected
//!   ├─► skip unless emit roll passes       (EmissionOdds::emit)
//!   ├─► kind     = uniform over UpdateKind::ALL
//!   ├─► severity = Info, or kind.escalated_severity() on escalate roll
//!   ├─► template = catalog.pick(kind)      (falls back, never fails)
//!   └─► hub.deliver(update)
//! }
//! ```
//!
//! ## Rules
//! - One pending emission timer at a time; `start` while running is a no-op
//! - `stop` cancels the pending timer and is idempotent
//! - Manual emissions bypass the schedule and never touch the pending timer
//! - Manual updates always carry [`Severity::Success`]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::catalog::MessageCatalog;
use crate::core::config::FeedConfig;
use crate::core::connection::ConnectionSupervisor;
use crate::core::hub::UpdateHub;
use crate::error::FeedError;
use crate::events::{Origin, Severity, Update, UpdateKind};
use crate::policies::{Dice, EmissionInterval, EmissionOdds};

/// Title carried by every manual update.
pub const MANUAL_TITLE: &str = "Manual Refresh";

/// Synthesizes updates on a timer and on demand.
pub struct UpdateSource {
    interval: EmissionInterval,
    odds: EmissionOdds,
    catalog: MessageCatalog,
    dice: Dice,
    hub: Arc<UpdateHub>,
    connection: Arc<ConnectionSupervisor>,
    root: CancellationToken,
    timer: Mutex<Option<CancellationToken>>,
}

impl UpdateSource {
    pub(crate) fn new(
        cfg: &FeedConfig,
        catalog: MessageCatalog,
        dice: Dice,
        hub: Arc<UpdateHub>,
        connection: Arc<ConnectionSupervisor>,
        root: CancellationToken,
    ) -> Self {
        Self {
            interval: cfg.interval,
            odds: cfg.emission,
            catalog,
            dice,
            hub,
            connection,
            root,
            timer: Mutex::new(None),
        }
    }

    /// Schedules emissions; no-op if already running.
    pub fn start(self: &Arc<Self>) -> Result<(), FeedError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| FeedError::NoRuntime)?;
        let mut timer = self.timer_slot();
        if timer.as_ref().is_some_and(|t| !t.is_cancelled()) {
            return Ok(());
        }
        let token = self.root.child_token();
        *timer = Some(token.clone());
        drop(timer);

        handle.spawn(Arc::clone(self).run(token));
        debug!(
            event = "feed.source.started",
            min = ?self.interval.min,
            max = ?self.interval.max,
        );
        Ok(())
    }

    /// Cancels the pending emission; idempotent.
    pub fn stop(&self) {
        if let Some(token) = self.timer_slot().take() {
            token.cancel();
            debug!(event = "feed.source.stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer_slot().as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Builds a scheduled update from the current rolls without publishing it.
    pub fn synthesize(&self) -> Update {
        let kind = UpdateKind::ALL[self.dice.index(UpdateKind::ALL.len())];
        let severity = if self.dice.chance(self.odds.escalate) {
            kind.escalated_severity()
        } else {
            Severity::Info
        };
        let template = self.catalog.pick(kind, &self.dice);

        Update::new(kind, template.title, template.message).with_severity(severity)
    }

    /// Synthesizes and immediately publishes one manual update.
    pub async fn emit_manual(&self, kind: UpdateKind, payload: Option<Value>) -> Update {
        let mut update = manual_update(kind, payload);
        self.hub.deliver(&mut update).await;
        update
    }

    async fn run(self: Arc<Self>, token: CancellationToken) {
        loop {
            let wait = self.interval.sample(&self.dice);
            let sleep = time::sleep(wait);
            tokio::pin!(sleep);
            tokio::select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => { break; }
            }

            if !self.connection.is_connected() {
                trace!(event = "feed.source.skipped", reason = "disconnected");
                continue;
            }
            if !self.dice.chance(self.odds.emit) {
                trace!(event = "feed.source.skipped", reason = "roll");
                continue;
            }
            let mut update = self.synthesize();
            self.hub.deliver(&mut update).await;
        }
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Manual refreshes map every kind to `Success`.
fn manual_update(kind: UpdateKind, payload: Option<Value>) -> Update {
    Update::new(
        kind,
        MANUAL_TITLE,
        format!("{kind} data refreshed on request"),
    )
    .with_severity(Severity::Success)
    .with_origin(Origin::Manual)
    .with_optional_data(payload)
}
