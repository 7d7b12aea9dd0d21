use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::{Event, Phase};

/// Translate a key press into a session event for the current phase.
/// Keys with no meaning in the phase map to `None`.
pub fn event_for_key(phase: &Phase, key: KeyEvent) -> Option<Event> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    // AltGr arrives as ctrl+alt on Windows
    let alt_gr = ctrl && key.modifiers.contains(KeyModifiers::ALT);

    // ctrl+c and esc quit from anywhere
    if key.code == KeyCode::Esc || (ctrl && !alt_gr && key.code == KeyCode::Char('c')) {
        return Some(Event::Cancel);
    }

    match phase {
        Phase::AwaitingInput { .. } => match key.code {
            KeyCode::Enter => Some(Event::Submit),
            KeyCode::Tab => Some(Event::RepeatAudio),
            KeyCode::Backspace => Some(Event::Backspace),
            KeyCode::Char(c) if !ctrl || alt_gr => Some(Event::Type(c)),
            _ => None,
        },
        Phase::ShowingDialog { .. } => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Event::Acknowledge),
            KeyCode::Char('q') => Some(Event::Cancel),
            _ => None,
        },
        Phase::AwaitingAudio { .. } | Phase::Finished(_) => None,
    }
}
