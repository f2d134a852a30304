//! Ownership of the two periodic activities behind a running brew.
//!
//! The 1s brew clock and the 500ms blink cadence run as two independent
//! timers, never coalesced. Both hand their ticks to the controller
//! through the shared event channel; the `accepts` check ties each tick
//! to the handle that produced it, so a tick queued before cancellation
//! never reaches an idle session.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::infrastructure::{PeriodicTimer, TickKind, TimerEvent, TimerId};

pub const CLOCK_PERIOD: Duration = Duration::from_millis(1000);
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Handle owner for the one-second brew clock timer.
#[derive(Default)]
pub struct BrewClock {
    timer: Option<PeriodicTimer>,
}

impl BrewClock {
    /// Arms a fresh one-second timer, cancelling any previous handle first.
    pub fn arm(&mut self, events: &Sender<TimerEvent>) {
        self.disarm();
        self.timer = Some(PeriodicTimer::spawn(
            CLOCK_PERIOD,
            TickKind::Clock,
            events.clone(),
        ));
    }

    /// Synchronously cancels the armed timer. No-op when unarmed.
    pub fn disarm(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn armed_id(&self) -> Option<TimerId> {
        self.timer.as_ref().map(|t| t.id())
    }

    /// True only for ticks produced by the currently armed handle.
    pub fn accepts(&self, id: TimerId) -> bool {
        self.armed_id() == Some(id)
    }
}

/// Handle owner for the half-second blink timer.
#[derive(Default)]
pub struct Blinker {
    timer: Option<PeriodicTimer>,
}

impl Blinker {
    pub fn arm(&mut self, events: &Sender<TimerEvent>) {
        self.disarm();
        self.timer = Some(PeriodicTimer::spawn(
            BLINK_PERIOD,
            TickKind::Blink,
            events.clone(),
        ));
    }

    pub fn disarm(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    pub fn armed_id(&self) -> Option<TimerId> {
        self.timer.as_ref().map(|t| t.id())
    }

    pub fn accepts(&self, id: TimerId) -> bool {
        self.armed_id() == Some(id)
    }
}
