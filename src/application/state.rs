//! Application state management for the brew timer.
//!
//! This module owns the single mutable [`BrewSession`], the commands that
//! drive it, and the tick handlers fired by the timer threads. The domain
//! services stay pure; every state transition funnels through the methods
//! here.

use log::info;
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::application::clock::{Blinker, BrewClock};
use crate::domain::{
    BrewMode, CompletionDetector, RecipeCatalog, RecipeScaler, ScaledRecipe, ScaledStep,
    StepTracker, COMPLETION_GRACE_SECS,
};
use crate::infrastructure::{TickKind, TimerEvent};

/// Batch sizes offered by the UI: half batch (one cup) and full batch
/// (two cups).
pub const BATCH_MULTIPLIERS: [f64; 2] = [0.5, 1.0];

pub const DEFAULT_MULTIPLIER: f64 = 0.5;

/// Represents the current input mode of the application.
#[derive(Debug)]
pub enum AppMode {
    /// Normal mode - command keys control the brew
    Normal,
    /// Water override entry popup is open
    WaterInput,
    /// Help screen is displayed
    Help,
}

/// The one mutable record behind a brew. Created once at startup, mutated
/// in place by commands and tick handlers, reset to idle values on stop;
/// never destroyed.
#[derive(Debug, Clone, PartialEq)]
pub struct BrewSession {
    pub mode: BrewMode,
    pub multiplier: f64,
    pub water_override_g: Option<f64>,
    pub running: bool,
    pub elapsed_secs: u32,
    pub step_index: usize,
    pub blink_phase: bool,
}

impl Default for BrewSession {
    fn default() -> Self {
        Self {
            mode: BrewMode::Hot,
            multiplier: DEFAULT_MULTIPLIER,
            water_override_g: None,
            running: false,
            elapsed_secs: 0,
            step_index: 0,
            blink_phase: true,
        }
    }
}

impl BrewSession {
    /// Returns the session to its idle values. Recipe inputs (mode,
    /// multiplier, override) are kept; only the run state is cleared.
    fn reset_idle(&mut self) {
        self.running = false;
        self.elapsed_secs = 0;
        self.step_index = 0;
        self.blink_phase = true;
    }
}

/// Read-only view of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrewSnapshot {
    pub mode: BrewMode,
    pub multiplier: f64,
    pub coffee_g: f64,
    pub water_g: f64,
    pub ice_g: f64,
    pub grind: String,
    pub water_override_g: Option<f64>,
    pub elapsed_secs: u32,
    pub current_step_index: usize,
    pub running: bool,
    pub blink_phase: bool,
    pub steps: Vec<ScaledStep>,
}

/// Main application state: the brew session, its derived scaled recipe,
/// the timer handles, and the UI input state.
///
/// # Examples
///
/// ```
/// use tbrew::application::App;
///
/// let (app, _events) = App::new();
/// let snapshot = app.snapshot();
/// assert!(!snapshot.running);
/// assert_eq!(snapshot.elapsed_secs, 0);
/// ```
pub struct App {
    /// Current input mode
    pub mode: AppMode,
    /// Input buffer for the water override popup
    pub input: String,
    /// Cursor position within the input buffer
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    session: BrewSession,
    scaled: ScaledRecipe,
    clock: BrewClock,
    blinker: Blinker,
    events: Sender<TimerEvent>,
}

impl App {
    /// Creates the application in its idle state together with the
    /// receiving end of the timer-event channel the main loop drains.
    pub fn new() -> (Self, Receiver<TimerEvent>) {
        let (events, rx) = mpsc::channel();
        let session = BrewSession::default();
        let scaled = RecipeScaler::scale(
            RecipeCatalog::get(session.mode),
            session.multiplier,
            session.water_override_g,
        );
        let app = Self {
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            session,
            scaled,
            clock: BrewClock::default(),
            blinker: Blinker::default(),
            events,
        };
        (app, rx)
    }

    /// Starts a brew. Always zeroes elapsed time and the step index and
    /// re-arms both timers, whatever the previous state was.
    pub fn start(&mut self) {
        self.session.elapsed_secs = 0;
        self.session.step_index = 0;
        self.session.running = true;
        self.session.blink_phase = true;
        self.clock.arm(&self.events);
        self.blinker.arm(&self.events);
        self.status_message = None;
        info!(
            "Brew started: {:?} x{}",
            self.session.mode, self.session.multiplier
        );
    }

    /// Stops the brew and returns the session to idle. Cancels both
    /// timers before touching the session, so no further tick can land on
    /// it. Idempotent.
    pub fn reset(&mut self) {
        self.clock.disarm();
        self.blinker.disarm();
        if self.session.running {
            info!("Brew stopped after {}s", self.session.elapsed_secs);
        }
        self.session.reset_idle();
    }

    /// Selects a recipe mode. Ignored while a brew is running.
    pub fn set_mode(&mut self, mode: BrewMode) {
        if self.session.running {
            return;
        }
        if self.session.mode != mode {
            info!("Mode changed: {:?} -> {:?}", self.session.mode, mode);
        }
        self.session.mode = mode;
        self.rescale();
    }

    /// Selects a batch multiplier. Ignored while running; non-positive
    /// values are ignored as well.
    pub fn set_multiplier(&mut self, multiplier: f64) {
        if self.session.running || multiplier <= 0.0 {
            return;
        }
        self.session.multiplier = multiplier;
        self.rescale();
    }

    /// Sets the actual poured-water mass, rescaling step targets
    /// proportionally. Ignored while running; negative values clamp to 0.
    pub fn set_water_override(&mut self, grams: f64) {
        if self.session.running {
            return;
        }
        self.session.water_override_g = Some(grams.max(0.0));
        self.rescale();
    }

    /// Drops the override, returning to multiplier-scaled water. Ignored
    /// while running.
    pub fn clear_water_override(&mut self) {
        if self.session.running {
            return;
        }
        self.session.water_override_g = None;
        self.rescale();
    }

    fn rescale(&mut self) {
        self.scaled = RecipeScaler::scale(
            RecipeCatalog::get(self.session.mode),
            self.session.multiplier,
            self.session.water_override_g,
        );
    }

    /// Routes a tick from the timer threads. Ticks whose id does not
    /// match the currently armed handle are stale leftovers from a
    /// cancelled timer and are dropped.
    pub fn handle_timer_event(&mut self, event: TimerEvent) {
        match event.kind {
            TickKind::Clock if self.clock.accepts(event.id) => self.on_clock_tick(),
            TickKind::Blink if self.blinker.accepts(event.id) => self.on_blink_tick(),
            _ => {}
        }
    }

    /// One clock tick: elapsed time advances first, then the step index,
    /// then the completion check runs against the fresh index. Completion
    /// performs the full reset inside this same call.
    fn on_clock_tick(&mut self) {
        if !self.session.running {
            return;
        }
        self.session.elapsed_secs += 1;
        self.session.step_index = StepTracker::advance(
            &self.scaled.steps,
            self.session.elapsed_secs,
            self.session.step_index,
        );
        if CompletionDetector::is_complete(
            self.session.running,
            self.session.step_index,
            self.scaled.last_index(),
            self.session.elapsed_secs,
            self.scaled.last_offset_secs(),
            COMPLETION_GRACE_SECS,
        ) {
            info!("Brew complete after {}s", self.session.elapsed_secs);
            self.reset();
            self.status_message = Some("Brew complete".to_string());
        }
    }

    fn on_blink_tick(&mut self) {
        if self.session.running {
            self.session.blink_phase = !self.session.blink_phase;
        }
    }

    /// Builds the read-only view the presentation layer renders from.
    pub fn snapshot(&self) -> BrewSnapshot {
        BrewSnapshot {
            mode: self.session.mode,
            multiplier: self.session.multiplier,
            coffee_g: self.scaled.coffee_g,
            water_g: self.scaled.water_g,
            ice_g: self.scaled.ice_g,
            grind: RecipeCatalog::get(self.session.mode).grind.clone(),
            water_override_g: self.session.water_override_g,
            elapsed_secs: self.session.elapsed_secs,
            current_step_index: self.session.step_index,
            running: self.session.running,
            blink_phase: self.session.blink_phase,
            steps: self.scaled.steps.clone(),
        }
    }

    /// Opens the water override popup. Ignored while running, matching
    /// the override command itself.
    pub fn start_water_input(&mut self) {
        if self.session.running {
            return;
        }
        self.mode = AppMode::WaterInput;
        self.input = match self.session.water_override_g {
            Some(grams) if grams.fract() == 0.0 => format!("{:.0}", grams),
            Some(grams) => format!("{}", grams),
            None => String::new(),
        };
        self.cursor_position = self.input.len();
    }

    /// Applies the override popup's input. Empty input clears the
    /// override; anything unparseable counts as 0 grams.
    pub fn finish_water_input(&mut self) {
        let text = self.input.trim().to_string();
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;

        if text.is_empty() {
            self.clear_water_override();
            self.status_message = Some("Water override cleared".to_string());
        } else {
            let grams = text.parse::<f64>().unwrap_or(0.0).max(0.0);
            self.set_water_override(grams);
            self.status_message = Some("Water override set".to_string());
        }
    }

    pub fn cancel_water_input(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_tick(app: &mut App) {
        let id = app.clock.armed_id().unwrap();
        app.handle_timer_event(TimerEvent {
            id,
            kind: TickKind::Clock,
        });
    }

    fn blink_tick(app: &mut App) {
        let id = app.blinker.armed_id().unwrap();
        app.handle_timer_event(TimerEvent {
            id,
            kind: TickKind::Blink,
        });
    }

    #[test]
    fn test_app_starts_idle_with_defaults() {
        let (app, _rx) = App::new();
        let snapshot = app.snapshot();

        assert_eq!(snapshot.mode, BrewMode::Hot);
        assert_eq!(snapshot.multiplier, 0.5);
        assert!(!snapshot.running);
        assert_eq!(snapshot.elapsed_secs, 0);
        assert_eq!(snapshot.current_step_index, 0);
        assert!(snapshot.blink_phase);
        assert!(snapshot.water_override_g.is_none());
        assert!(matches!(app.mode, AppMode::Normal));
    }

    #[test]
    fn test_start_resets_regardless_of_prior_state() {
        let (mut app, _rx) = App::new();
        app.start();
        for _ in 0..50 {
            clock_tick(&mut app);
        }
        assert_eq!(app.snapshot().elapsed_secs, 50);
        assert_eq!(app.snapshot().current_step_index, 1);

        // starting again mid-brew restarts from zero
        app.start();
        let snapshot = app.snapshot();
        assert!(snapshot.running);
        assert_eq!(snapshot.elapsed_secs, 0);
        assert_eq!(snapshot.current_step_index, 0);
    }

    #[test]
    fn test_clock_ticks_advance_elapsed_and_step() {
        let (mut app, _rx) = App::new();
        app.start();

        for _ in 0..44 {
            clock_tick(&mut app);
        }
        assert_eq!(app.snapshot().elapsed_secs, 44);
        assert_eq!(app.snapshot().current_step_index, 0);

        clock_tick(&mut app);
        assert_eq!(app.snapshot().elapsed_secs, 45);
        assert_eq!(app.snapshot().current_step_index, 1);
    }

    #[test]
    fn test_stale_tick_after_reset_changes_nothing() {
        let (mut app, _rx) = App::new();
        app.start();
        let stale = app.clock.armed_id().unwrap();
        clock_tick(&mut app);
        app.reset();

        app.handle_timer_event(TimerEvent {
            id: stale,
            kind: TickKind::Clock,
        });

        let snapshot = app.snapshot();
        assert!(!snapshot.running);
        assert_eq!(snapshot.elapsed_secs, 0);
        assert_eq!(snapshot.current_step_index, 0);
    }

    #[test]
    fn test_completion_auto_resets_to_idle() {
        let (mut app, _rx) = App::new();
        app.set_multiplier(1.0);
        app.start();

        // hot recipe: last step at 210s, grace 5s
        for _ in 0..214 {
            clock_tick(&mut app);
        }
        let snapshot = app.snapshot();
        assert!(snapshot.running);
        assert_eq!(snapshot.elapsed_secs, 214);
        assert_eq!(snapshot.current_step_index, 5);

        clock_tick(&mut app);
        let snapshot = app.snapshot();
        assert!(!snapshot.running);
        assert_eq!(snapshot.elapsed_secs, 0);
        assert_eq!(snapshot.current_step_index, 0);
        assert_eq!(app.status_message.as_deref(), Some("Brew complete"));
    }

    #[test]
    fn test_completion_disarms_timers() {
        let (mut app, _rx) = App::new();
        app.set_multiplier(1.0);
        app.start();
        for _ in 0..215 {
            clock_tick(&mut app);
        }
        assert!(app.clock.armed_id().is_none());
        assert!(app.blinker.armed_id().is_none());
    }

    #[test]
    fn test_recipe_commands_ignored_while_running() {
        let (mut app, _rx) = App::new();
        app.start();

        app.set_mode(BrewMode::Iced);
        app.set_multiplier(1.0);
        app.set_water_override(600.0);
        app.clear_water_override();

        let snapshot = app.snapshot();
        assert_eq!(snapshot.mode, BrewMode::Hot);
        assert_eq!(snapshot.multiplier, 0.5);
        assert!(snapshot.water_override_g.is_none());
    }

    #[test]
    fn test_set_multiplier_rejects_non_positive() {
        let (mut app, _rx) = App::new();
        app.set_multiplier(0.0);
        assert_eq!(app.snapshot().multiplier, 0.5);
        app.set_multiplier(-1.0);
        assert_eq!(app.snapshot().multiplier, 0.5);
    }

    #[test]
    fn test_mode_change_rescales() {
        let (mut app, _rx) = App::new();
        app.set_multiplier(1.0);
        app.set_mode(BrewMode::Iced);

        let snapshot = app.snapshot();
        assert_eq!(snapshot.water_g, 300.0);
        assert_eq!(snapshot.ice_g, 200.0);
        assert_eq!(snapshot.steps[5].offset_secs, 180);
    }

    #[test]
    fn test_water_override_rescales_steps() {
        let (mut app, _rx) = App::new();
        app.set_multiplier(1.0);
        app.set_water_override(600.0);

        let snapshot = app.snapshot();
        assert_eq!(snapshot.water_g, 600.0);
        assert_eq!(snapshot.steps[1].water_g, 180);

        app.clear_water_override();
        let snapshot = app.snapshot();
        assert_eq!(snapshot.water_g, 500.0);
        assert_eq!(snapshot.steps[1].water_g, 150);
    }

    #[test]
    fn test_blink_toggles_while_running_and_rests_true() {
        let (mut app, _rx) = App::new();
        app.start();
        assert!(app.snapshot().blink_phase);

        blink_tick(&mut app);
        assert!(!app.snapshot().blink_phase);
        blink_tick(&mut app);
        assert!(app.snapshot().blink_phase);
        blink_tick(&mut app);

        app.reset();
        assert!(app.snapshot().blink_phase);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut app, _rx) = App::new();
        app.reset();
        app.start();
        app.reset();
        app.reset();
        assert!(!app.snapshot().running);
    }

    #[test]
    fn test_water_input_applies_parsed_grams() {
        let (mut app, _rx) = App::new();
        app.set_multiplier(1.0);

        app.start_water_input();
        assert!(matches!(app.mode, AppMode::WaterInput));
        app.input = "600".to_string();
        app.finish_water_input();

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.snapshot().water_override_g, Some(600.0));
        assert_eq!(app.snapshot().steps[1].water_g, 180);
    }

    #[test]
    fn test_water_input_unparseable_counts_as_zero() {
        let (mut app, _rx) = App::new();
        app.start_water_input();
        app.input = "12.3.4".to_string();
        app.finish_water_input();

        assert_eq!(app.snapshot().water_override_g, Some(0.0));
    }

    #[test]
    fn test_water_input_empty_clears_override() {
        let (mut app, _rx) = App::new();
        app.set_water_override(600.0);

        app.start_water_input();
        assert_eq!(app.input, "600");
        app.input.clear();
        app.finish_water_input();

        assert!(app.snapshot().water_override_g.is_none());
    }

    #[test]
    fn test_water_input_blocked_while_running() {
        let (mut app, _rx) = App::new();
        app.start();
        app.start_water_input();
        assert!(matches!(app.mode, AppMode::Normal));
    }

    #[test]
    fn test_cancel_water_input_keeps_override() {
        let (mut app, _rx) = App::new();
        app.set_water_override(450.0);
        app.start_water_input();
        app.input = "999".to_string();
        app.cancel_water_input();

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.snapshot().water_override_g, Some(450.0));
    }

    #[test]
    fn test_snapshot_grind_follows_mode() {
        let (mut app, _rx) = App::new();
        assert!(app.snapshot().grind.starts_with("Medium-fine"));
        app.set_mode(BrewMode::Iced);
        assert!(app.snapshot().grind.starts_with("Fine"));
    }
}
