//! Cancellable periodic tick sources.
//!
//! Each timer runs on its own thread and delivers [`TimerEvent`]s into an
//! mpsc channel; all state mutation stays on the consumer's thread. Every
//! spawn gets a process-unique id so consumers can discard ticks that were
//! already queued when their timer was cancelled.

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Clock,
    Blink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub id: TimerId,
    pub kind: TickKind,
}

/// A periodic tick source backed by a dedicated thread.
///
/// Sends one [`TimerEvent`] per period until cancelled. [`cancel`] is
/// synchronous: it signals the thread and joins it, so once it returns no
/// further event will ever be sent. Events already sitting in the channel
/// survive cancellation; consumers match on [`TimerEvent::id`] to drop
/// them.
///
/// [`cancel`]: PeriodicTimer::cancel
pub struct PeriodicTimer {
    id: TimerId,
    shutdown: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl PeriodicTimer {
    pub fn spawn(period: Duration, kind: TickKind, events: Sender<TimerEvent>) -> Self {
        let id = TimerId(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed));
        let (shutdown, stop_signal) = mpsc::channel();
        let worker =
            std::thread::spawn(move || Self::run(id, kind, period, events, stop_signal));
        debug!("Timer {:?} armed ({:?} every {:?})", id, kind, period);
        Self {
            id,
            shutdown,
            worker: Some(worker),
        }
    }

    fn run(
        id: TimerId,
        kind: TickKind,
        period: Duration,
        events: Sender<TimerEvent>,
        stop_signal: Receiver<()>,
    ) {
        loop {
            match stop_signal.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    if events.send(TimerEvent { id, kind }).is_err() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Stops the timer thread and waits for it to exit. Idempotent:
    /// cancelling an already-cancelled timer is a no-op.
    pub fn cancel(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.shutdown.send(());
            let _ = worker.join();
            debug!("Timer {:?} cancelled", self.id);
        }
    }
}

impl Drop for PeriodicTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_delivers_ticks() {
        let (tx, rx) = mpsc::channel();
        let timer = PeriodicTimer::spawn(Duration::from_millis(5), TickKind::Clock, tx);

        let event = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(event.id, timer.id());
        assert_eq!(event.kind, TickKind::Clock);
    }

    #[test]
    fn test_timer_ids_are_unique() {
        let (tx, _rx) = mpsc::channel();
        let a = PeriodicTimer::spawn(Duration::from_millis(50), TickKind::Clock, tx.clone());
        let b = PeriodicTimer::spawn(Duration::from_millis(50), TickKind::Blink, tx);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_cancel_is_synchronous_and_silences_timer() {
        let (tx, rx) = mpsc::channel();
        let mut timer = PeriodicTimer::spawn(Duration::from_millis(5), TickKind::Blink, tx);

        let _ = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        timer.cancel();

        // The worker has exited and dropped its sender, so after draining
        // the queue the channel reports disconnection, never a new tick.
        while rx.try_recv().is_ok() {}
        assert_eq!(rx.recv_timeout(Duration::from_millis(50)), Err(RecvTimeoutError::Disconnected));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (tx, _rx) = mpsc::channel();
        let mut timer = PeriodicTimer::spawn(Duration::from_millis(5), TickKind::Clock, tx);

        timer.cancel();
        timer.cancel();
    }
}
