//! # ConnectionSupervisor: simulated connectivity.
//!
//! Owns a two-state machine and drives it with timers:
//!
//! ```text
//!              periodic check, low roll
//!   Connected(q) ───────────────────────► Disconnected
//!     ▲   │ periodic check, normal roll         │
//!     │   └──► Connected(q')                    │
//!     │                                         │
//!     └─────── reconnect timer / force ─────────┘
//!                  Connected(Excellent)
//! ```
//!
//! ## Driver loop
//! ```text
//! loop {
//!   ├─► Connected:    sleep(check_interval) ─► check() (one roll)
//!   ├─► Disconnected: sleep_until(reconnect_at) ─► reconnect()
//!   │                 (woken early by force_reconnect)
//!   └─► token cancelled ─► exit
//! }
//! ```
//!
//! ## Rules
//! - Starts in `Connected(Excellent)`; there is no terminal state
//! - Exactly **one** reconnect is pending while disconnected; checks are ignored then
//! - Every connect/disconnect publishes one [`StatusChange`]; quality-only changes do not
//! - `force_reconnect` while connected is a no-op

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::config::FeedConfig;
use crate::error::FeedError;
use crate::events::{ConnectionState, Quality, StatusBus, StatusChange};
use crate::policies::{CheckOutcome, ConnectionOdds, Dice};

/// State change produced by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Connected → Disconnected; a reconnect is due at `reconnect_at`.
    Dropped { reconnect_at: Instant },
    /// Disconnected → Connected(Excellent).
    Restored,
    /// Quality changed while staying connected.
    QualityChanged { from: Quality, to: Quality },
}

impl Transition {
    /// `true` for connect/disconnect transitions.
    pub fn is_status_change(&self) -> bool {
        self.entered().is_some()
    }

    /// State this transition entered, for connect/disconnect transitions only.
    pub fn entered(&self) -> Option<ConnectionState> {
        match self {
            Transition::Dropped { .. } => Some(ConnectionState::Disconnected),
            Transition::Restored => Some(ConnectionState::Connected(Quality::Excellent)),
            Transition::QualityChanged { .. } => None,
        }
    }
}

/// Used when `now + delay` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn reconnect_deadline(now: Instant, delay: Duration) -> Instant {
    now.checked_add(delay)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Pure connectivity state machine; all randomness arrives as rolls.
#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    odds: ConnectionOdds,
    reconnect_delay: Duration,
    reconnect_at: Option<Instant>,
}

impl ConnectionMachine {
    pub fn new(odds: ConnectionOdds, reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::default(),
            odds,
            reconnect_delay,
            reconnect_at: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Deadline of the pending reconnect, if disconnected.
    pub fn reconnect_at(&self) -> Option<Instant> {
        self.reconnect_at
    }

    /// Applies one periodic check roll.
    ///
    /// Ignored while disconnected, so a drop never schedules a second reconnect.
    pub fn check(&mut self, roll: f64, now: Instant) -> Option<Transition> {
        let ConnectionState::Connected(current) = self.state else {
            return None;
        };
        match self.odds.classify(roll) {
            CheckOutcome::Disconnect => {
                let reconnect_at = reconnect_deadline(now, self.reconnect_delay);
                self.state = ConnectionState::Disconnected;
                self.reconnect_at = Some(reconnect_at);
                Some(Transition::Dropped { reconnect_at })
            }
            CheckOutcome::Quality(next) if next != current => {
                self.state = ConnectionState::Connected(next);
                Some(Transition::QualityChanged {
                    from: current,
                    to: next,
                })
            }
            CheckOutcome::Quality(_) => None,
        }
    }

    /// Returns to `Connected(Excellent)` if disconnected.
    pub fn reconnect(&mut self) -> Option<Transition> {
        match self.state {
            ConnectionState::Disconnected => {
                self.state = ConnectionState::Connected(Quality::Excellent);
                self.reconnect_at = None;
                Some(Transition::Restored)
            }
            ConnectionState::Connected(_) => None,
        }
    }
}

/// Drives a [`ConnectionMachine`] with timers and publishes status changes.
pub struct ConnectionSupervisor {
    machine: Mutex<ConnectionMachine>,
    dice: Dice,
    bus: StatusBus,
    check_interval: Duration,
    wake: Notify,
    root: CancellationToken,
    timer: Mutex<Option<CancellationToken>>,
}

impl ConnectionSupervisor {
    /// Creates a supervisor in `Connected(Excellent)`; timers start with [`start`](Self::start).
    ///
    /// `root` bounds the lifetime of every timer this supervisor spawns.
    pub fn new(cfg: &FeedConfig, dice: Dice, bus: StatusBus, root: CancellationToken) -> Self {
        Self {
            machine: Mutex::new(ConnectionMachine::new(cfg.connection, cfg.reconnect_delay)),
            dice,
            bus,
            check_interval: cfg.check_interval,
            wake: Notify::new(),
            root,
            timer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.machine().state()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    pub fn quality(&self) -> Option<Quality> {
        self.state().quality()
    }

    /// Deadline of the pending reconnect, if disconnected.
    pub fn reconnect_at(&self) -> Option<Instant> {
        self.machine().reconnect_at()
    }

    /// Runs one periodic check immediately (one roll).
    pub fn check(&self) -> Option<Transition> {
        let roll = self.dice.roll();
        let t = self.machine().check(roll, Instant::now());
        self.announce(t);
        t
    }

    /// Reconnects now if disconnected, cancelling the pending reconnect wait.
    ///
    /// Returns `false` (and does nothing) when already connected.
    pub fn force_reconnect(&self) -> bool {
        let t = self.machine().reconnect();
        self.announce(t);
        if t.is_some() {
            self.wake.notify_one();
            true
        } else {
            false
        }
    }

    /// Spawns the driver loop; no-op if it is already running.
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
        debug!(event = "feed.connection.started", check_interval = ?self.check_interval);
        Ok(())
    }

    /// Cancels the driver loop and any pending reconnect; idempotent.
    ///
    /// The current state is kept; a later `start` resumes from it.
    pub fn stop(&self) {
        if let Some(token) = self.timer_slot().take() {
            token.cancel();
            debug!(event = "feed.connection.stopped");
        }
    }

    async fn run(self: Arc<Self>, token: CancellationToken) {
        loop {
            match self.reconnect_at() {
                None => {
                    let sleep = time::sleep(self.check_interval);
                    tokio::pin!(sleep);
                    tokio::select! {
                        _ = &mut sleep => { self.check(); }
                        _ = token.cancelled() => { break; }
                    }
                }
                Some(at) => {
                    tokio::select! {
                        _ = time::sleep_until(at) => {
                            let t = self.machine().reconnect();
                            self.announce(t);
                        }
                        _ = self.wake.notified() => {}
                        _ = token.cancelled() => { break; }
                    }
                }
            }
        }
    }

    fn announce(&self, t: Option<Transition>) {
        let Some(t) = t else { return };
        match t {
            Transition::Dropped { .. } => {
                let delay = self.machine().reconnect_delay;
                warn!(event = "feed.connection.dropped", reconnect_in = ?delay);
            }
            Transition::Restored => {
                info!(event = "feed.connection.restored");
            }
            Transition::QualityChanged { from, to } => {
                debug!(
                    event = "feed.connection.quality_changed",
                    from = from.as_label(),
                    to = to.as_label(),
                );
            }
        }
        if let Some(state) = t.entered() {
            self.bus.publish(StatusChange::entered(state));
        }
    }

    fn machine(&self) -> MutexGuard<'_, ConnectionMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::ScriptedRandom;
    use tokio::sync::broadcast::error::TryRecvError;

    fn machine() -> ConnectionMachine {
        ConnectionMachine::new(ConnectionOdds::default(), Duration::from_secs(3))
    }

    fn supervisor(rolls: Vec<f64>) -> (Arc<ConnectionSupervisor>, StatusBus) {
        let cfg = FeedConfig::default();
        let bus = StatusBus::new(16);
        let sup = ConnectionSupervisor::new(
            &cfg,
            Dice::new(ScriptedRandom::new(rolls)),
            bus.clone(),
            CancellationToken::new(),
        );
        (Arc::new(sup), bus)
    }

    #[test]
    fn test_starts_connected_excellent() {
        let m = machine();
        assert_eq!(m.state(), ConnectionState::Connected(Quality::Excellent));
        assert!(m.reconnect_at().is_none());
    }

    #[tokio::test]
    async fn test_repeated_drop_rolls_schedule_one_reconnect() {
        let mut m = machine();
        let now = Instant::now();

        let first = m.check(0.0, now);
        assert_eq!(
            first,
            Some(Transition::Dropped {
                reconnect_at: now + Duration::from_secs(3)
            })
        );
        for n in 1..10 {
            let later = now + Duration::from_secs(n);
            assert_eq!(m.check(0.0, later), None);
        }
        assert_eq!(m.state(), ConnectionState::Disconnected);
        assert_eq!(m.reconnect_at(), Some(now + Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_quality_bands() {
        let mut m = machine();
        let now = Instant::now();
        assert_eq!(
            m.check(0.03, now),
            Some(Transition::QualityChanged {
                from: Quality::Excellent,
                to: Quality::Good
            })
        );
        assert_eq!(m.check(0.03, now), None);
        assert_eq!(m.check(0.022, now).map(|t| t.is_status_change()), Some(false));
        assert_eq!(m.state().quality(), Some(Quality::Poor));
        assert!(m.check(0.9, now).is_some());
        assert_eq!(m.state(), ConnectionState::Connected(Quality::Excellent));
    }

    #[tokio::test]
    async fn test_huge_reconnect_delay_does_not_overflow() {
        let mut m = ConnectionMachine::new(ConnectionOdds::default(), Duration::MAX);
        let now = Instant::now();
        match m.check(0.0, now) {
            Some(Transition::Dropped { reconnect_at }) => assert!(reconnect_at >= now),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(m.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_reconnect_only_from_disconnected() {
        let mut m = machine();
        assert_eq!(m.reconnect(), None);
    }

    #[tokio::test]
    async fn test_forced_drops_then_force_reconnect() {
        let (sup, bus) = supervisor(vec![0.0; 5]);
        let mut rx = bus.subscribe();

        let transitions: Vec<_> = (0..5).filter_map(|_| sup.check()).collect();
        assert_eq!(transitions.len(), 1);
        assert!(matches!(transitions[0], Transition::Dropped { .. }));
        assert!(!sup.is_connected());
        assert!(sup.reconnect_at().is_some());

        let down = rx.try_recv().unwrap();
        assert!(!down.connected);
        assert_eq!(down.quality, None);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        assert!(sup.force_reconnect());
        assert_eq!(sup.state(), ConnectionState::Connected(Quality::Excellent));
        assert!(sup.reconnect_at().is_none());

        let up = rx.try_recv().unwrap();
        assert!(up.connected);
        assert_eq!(up.quality, Some(Quality::Excellent));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_force_reconnect_while_connected_is_noop() {
        let (sup, bus) = supervisor(vec![]);
        let mut rx = bus.subscribe();
        assert!(!sup.force_reconnect());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_quality_changes_are_not_status_changes() {
        let (sup, bus) = supervisor(vec![0.03]);
        let mut rx = bus.subscribe();
        assert!(sup.check().is_some());
        assert_eq!(sup.quality(), Some(Quality::Good));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn test_status_change_reflects_the_transition_not_current_state() {
        let (sup, bus) = supervisor(vec![]);
        let mut rx = bus.subscribe();

        // machine is connected, but a drop that raced a reconnect is still reported as a drop
        sup.announce(Some(Transition::Dropped {
            reconnect_at: Instant::now(),
        }));
        let note = rx.try_recv().unwrap();
        assert!(!note.connected);
        assert_eq!(note.quality, None);

        sup.announce(Some(Transition::Restored));
        let note = rx.try_recv().unwrap();
        assert!(note.connected);
        assert_eq!(note.quality, Some(Quality::Excellent));
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_drops_and_reconnects_on_schedule() {
        // check at 5s drops, reconnect due at 8s
        let (sup, bus) = supervisor(vec![0.0]);
        let mut rx = bus.subscribe();
        sup.start().unwrap();

        time::sleep(Duration::from_secs(6)).await;
        assert!(!sup.is_connected());
        assert!(!rx.try_recv().unwrap().connected);

        time::sleep(Duration::from_secs(3)).await;
        assert!(sup.is_connected());
        assert!(rx.try_recv().unwrap().connected);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        sup.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_reconnect_cuts_the_wait_short() {
        let (sup, bus) = supervisor(vec![0.0]);
        let mut rx = bus.subscribe();
        sup.start().unwrap();

        time::sleep(Duration::from_secs(6)).await;
        assert!(!sup.is_connected());
        assert!(sup.force_reconnect());

        // the stale 8s deadline must not produce a second notification
        time::sleep(Duration::from_secs(4)).await;
        assert!(sup.is_connected());
        let notes: Vec<bool> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|c| c.connected)
            .collect();
        assert_eq!(notes, vec![false, true]);

        sup.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_reconnect() {
        let (sup, _bus) = supervisor(vec![0.0]);
        sup.start().unwrap();
        sup.start().unwrap();

        time::sleep(Duration::from_secs(6)).await;
        assert!(!sup.is_connected());
        sup.stop();
        sup.stop();

        time::sleep(Duration::from_secs(10)).await;
        assert!(!sup.is_connected());
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let (sup, _bus) = supervisor(vec![]);
        assert_eq!(sup.start(), Err(FeedError::NoRuntime));
    }
}
