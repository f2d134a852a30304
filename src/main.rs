//! TBREW - Terminal Brew Timer
//!
//! A terminal V60 pour-over timer. Pick a recipe and batch size, press
//! start, and follow the highlighted pour as the clock runs; the guide
//! advances through the steps and resets itself when the brew is done.

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

mod application;
mod domain;
mod infrastructure;
mod presentation;

use application::App;
use infrastructure::TimerEvent;
use presentation::{render_ui, InputHandler};

/// Entry point for the TBREW terminal brew timer.
///
/// Sets up the terminal interface, initializes the application state,
/// and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (mut app, events) = App::new();
    let res = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Redraws the screen, drains any queued timer ticks, and polls the
/// keyboard with a short timeout so the clock and blink cadence animate
/// between keypresses. Continues running until the user presses 'q' in
/// normal mode.
///
/// # Arguments
///
/// * `terminal` - Terminal interface for rendering
/// * `app` - Mutable reference to application state
/// * `events` - Receiving end of the timer-event channel
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &Receiver<TimerEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        while let Ok(tick) = events.try_recv() {
            app.handle_timer_event(tick);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if matches!(app.mode, application::AppMode::Normal) => {
                            return Ok(())
                        }
                        _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                    }
                }
            }
        }
    }
}
