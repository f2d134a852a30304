use crate::application::{App, AppMode, BATCH_MULTIPLIERS};
use crate::domain::BrewMode;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::WaterInput => Self::handle_water_input_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, _modifiers: KeyModifiers) {
        match key {
            KeyCode::Char('s') | KeyCode::Char(' ') => app.start(),
            KeyCode::Char('r') => app.reset(),
            KeyCode::Char('h') => app.set_mode(BrewMode::Hot),
            KeyCode::Char('i') => app.set_mode(BrewMode::Iced),
            KeyCode::Char('1') => app.set_multiplier(BATCH_MULTIPLIERS[0]),
            KeyCode::Char('2') => app.set_multiplier(BATCH_MULTIPLIERS[1]),
            KeyCode::Char('w') => app.start_water_input(),
            KeyCode::Char('c') => app.clear_water_override(),
            KeyCode::Char('?') => app.show_help(),
            _ => {}
        }
    }

    fn handle_water_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_water_input(),
            KeyCode::Esc => app.cancel_water_input(),
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                    app.input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                app.cursor_position = app.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                app.cursor_position = (app.cursor_position + 1).min(app.input.len());
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => app.close_help(),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::Down => app.help_scroll += 1,
            _ => {}
        }
    }
}
