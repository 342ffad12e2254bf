//! Single-pending-timer scheduling for the sequence player.
//!
//! The player never sleeps itself. It asks a [`Scheduler`] to deliver a
//! [`Ticket`] after a delay and later receives that ticket back through
//! `SequencePlayer::on_timer`. Arming a new timer replaces the previous one;
//! the player additionally ignores any ticket it is not waiting for, so a
//! timer that fires after a restart is harmless.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A timer source holding at most one pending timer.
pub trait Scheduler {
    /// Arm the timer, replacing any pending one.
    fn schedule(&mut self, delay: Duration, ticket: Ticket);

    /// Drop the pending timer, if any.
    fn cancel(&mut self);
}

/// Scheduler that only records what was asked of it. Tests (or a UI loop
/// with its own clock) fire the timer by handing the ticket back.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Option<(Duration, Ticket)>,
    armed: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<(Duration, Ticket)> {
        self.pending
    }

    /// Remove and return the pending timer, as if it had fired.
    pub fn take(&mut self) -> Option<(Duration, Ticket)> {
        self.pending.take()
    }

    /// Number of timers armed so far.
    pub fn armed_count(&self) -> usize {
        self.armed
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, ticket: Ticket) {
        self.pending = Some((delay, ticket));
        self.armed += 1;
    }

    fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.cancelled += 1;
        }
    }
}

/// Real-time scheduler backed by the tokio timer.
///
/// Each armed timer is a spawned sleep that sends its ticket on the channel
/// returned by [`TokioScheduler::new`]; cancelling aborts that task.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Ticket>,
    pending: Option<JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Ticket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, pending: None }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, ticket: Ticket) {
        self.cancel();
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means playback is shutting down.
            let _ = tx.send(ticket);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
