use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::ControlsSettings;
use crate::playlist::Direction;

/// What a key press means while browsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    TogglePlayPause,
    Navigate(Direction),
    First,
    Last,
    Volume(i64),
    Scrub(f64),
    SeekFraction(f64),
    OpenPrompt,
    Quit,
}

/// What a key press means while typing a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Submit,
    Cancel,
    Backspace,
    Insert(char),
}

pub fn map_key(key: &KeyEvent, controls: &ControlsSettings) -> Option<Action> {
    let scrub = controls.scrub_seconds as f64;
    let step = controls.volume_step as i64;

    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char(' ') => Action::TogglePlayPause,
        KeyCode::Left | KeyCode::Up => Action::Navigate(Direction::Previous),
        KeyCode::Right | KeyCode::Down => Action::Navigate(Direction::Next),
        KeyCode::Home => Action::First,
        KeyCode::End => Action::Last,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Volume(step),
        KeyCode::Char('-') => Action::Volume(-step),
        KeyCode::Char('L') => Action::Scrub(scrub),
        KeyCode::Char('H') => Action::Scrub(-scrub),
        KeyCode::Char(c @ '0'..='9') => {
            Action::SeekFraction(c.to_digit(10).unwrap_or(0) as f64 / 10.0)
        }
        KeyCode::Char('o') => Action::OpenPrompt,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

pub fn map_prompt_key(key: &KeyEvent) -> Option<PromptAction> {
    match key.code {
        KeyCode::Enter => Some(PromptAction::Submit),
        KeyCode::Esc => Some(PromptAction::Cancel),
        KeyCode::Backspace => Some(PromptAction::Backspace),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(PromptAction::Cancel)
        }
        KeyCode::Char(c) if !c.is_control() => Some(PromptAction::Insert(c)),
        _ => None,
    }
}
