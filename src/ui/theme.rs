use ratatui::style::{Color, Modifier, Style};

/// All styling used by the session screens. Built once and handed to the
/// view; nothing in the crate reads styles from global state.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub title_bar: Style,
    pub title_border: Style,
    pub prompt: Style,
    pub input: Style,
    pub placeholder: Style,
    pub cursor: Style,
    pub error: Style,
    pub hint: Style,
    pub waiting: Style,
    pub label: Style,
    pub matched: Style,
    pub mismatched: Style,
    pub marker: Style,
    pub correct_dialog: Style,
    pub incorrect_dialog: Style,
    pub summary: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);

        Self {
            title_bar: bold.fg(Color::White),
            title_border: Style::default().fg(Color::Cyan),
            prompt: bold,
            input: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::SLOW_BLINK),
            error: bold.fg(Color::Red),
            hint: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            waiting: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
            label: bold.fg(Color::Cyan),
            matched: Style::default().fg(Color::Green),
            mismatched: bold.fg(Color::Red),
            marker: bold.fg(Color::Yellow),
            correct_dialog: Style::default().fg(Color::Green),
            incorrect_dialog: Style::default().fg(Color::Red),
            summary: bold,
        }
    }
}

impl Theme {
    /// Plain styles for terminals without colour.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = plain.add_modifier(Modifier::BOLD);

        Self {
            title_bar: bold,
            title_border: plain,
            prompt: bold,
            input: plain,
            placeholder: plain.add_modifier(Modifier::DIM),
            cursor: plain,
            error: bold,
            hint: plain.add_modifier(Modifier::ITALIC),
            waiting: plain.add_modifier(Modifier::ITALIC),
            label: bold,
            matched: plain,
            mismatched: bold.add_modifier(Modifier::UNDERLINED),
            marker: bold,
            correct_dialog: plain,
            incorrect_dialog: plain,
            summary: bold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_distinguishes_match_and_mismatch() {
        let theme = Theme::default();
        assert_ne!(theme.matched, theme.mismatched);
        assert_eq!(theme.mismatched.fg, Some(Color::Red));
        assert_eq!(theme.matched.fg, Some(Color::Green));
    }

    #[test]
    fn test_monochrome_has_no_colours() {
        let theme = Theme::monochrome();
        assert_eq!(theme.mismatched.fg, None);
        assert_eq!(theme.marker.fg, None);
        assert_ne!(theme.matched, theme.mismatched);
    }
}
