use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::diff::{DiffRow, Marker, BLANK};
use crate::i18n::{Localizer, MessageKey};
use crate::session::DialogResult;
use crate::ui::theme::Theme;

const DIALOG_WIDTH: u16 = 60;
const LABEL_GAP: &str = "  ";

/// Pad `label` with spaces to `width` display columns.
pub fn pad_label(label: &str, width: usize) -> String {
    let pad = width.saturating_sub(label.width());
    format!("{label}{}", " ".repeat(pad))
}

/// The three aligned diff lines (input, correct, markers) with their labels.
pub fn diff_lines(diff: &DiffRow, l10n: &Localizer, theme: &Theme) -> Vec<Line<'static>> {
    let labels = [
        l10n.text(MessageKey::YourInput),
        l10n.text(MessageKey::CorrectLabel),
        l10n.text(MessageKey::Differences),
    ];
    let width = labels.iter().map(|l| l.width()).max().unwrap_or(0);
    let [input_label, correct_label, diff_label] = labels;

    let char_style = |marker: Marker| -> Style {
        match marker {
            Marker::Match => theme.matched,
            Marker::Mismatch => theme.mismatched,
        }
    };

    let labelled = |label: &str, cells: Vec<Span<'static>>| -> Line<'static> {
        let mut spans = vec![
            Span::styled(pad_label(label, width), theme.label),
            Span::raw(LABEL_GAP),
        ];
        spans.extend(cells);
        Line::from(spans)
    };

    // one column per position, as wide as the wider of the two characters
    let widths: Vec<usize> = diff
        .user
        .iter()
        .zip(&diff.correct)
        .map(|(u, c)| cell_width(*u).max(cell_width(*c)))
        .collect();

    let user_cells = diff
        .user
        .iter()
        .zip(&diff.markers)
        .zip(&widths)
        .map(|((c, m), w)| Span::styled(pad_cell(*c, *w), char_style(*m)))
        .collect();
    let correct_cells = diff
        .correct
        .iter()
        .zip(&diff.markers)
        .zip(&widths)
        .map(|((c, m), w)| Span::styled(pad_cell(*c, *w), char_style(*m)))
        .collect();
    let marker_cells = diff
        .markers
        .iter()
        .zip(&widths)
        .map(|(m, w)| match m {
            Marker::Match => Span::raw(pad_cell(m.symbol(), *w)),
            Marker::Mismatch => Span::styled(pad_cell(m.symbol(), *w), theme.marker),
        })
        .collect();

    vec![
        labelled(&input_label, user_cells),
        labelled(&correct_label, correct_cells),
        labelled(&diff_label, marker_cells),
    ]
}

/// Display width of one diff cell. Zero-width marks still get a column.
fn cell_width(c: char) -> usize {
    c.width().unwrap_or(0).max(1)
}

fn pad_cell(c: char, width: usize) -> String {
    let mut cell = c.to_string();
    for _ in c.width().unwrap_or(0)..width {
        cell.push(BLANK);
    }
    cell
}

/// Lines making up the feedback dialog body.
pub fn dialog_lines(result: &DialogResult, l10n: &Localizer, theme: &Theme) -> Vec<Line<'static>> {
    let (title, style) = if result.is_correct() {
        (l10n.text(MessageKey::Correct), theme.correct_dialog)
    } else {
        (l10n.text(MessageKey::IncorrectSpelling), theme.incorrect_dialog)
    };

    let mut lines = vec![Line::from(Span::styled(title, style.patch(theme.prompt))), Line::default()];

    if let Some(diff) = &result.diff {
        lines.extend(diff_lines(diff, l10n, theme));
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled(
        format!("({})", l10n.text(MessageKey::PressEnterToContinue)),
        theme.hint,
    )));
    lines
}

/// Rectangle of the dialog, centred in `area` and clamped to it.
pub fn dialog_area(area: Rect, content_lines: u16, content_width: u16) -> Rect {
    // borders plus one column/row of padding on each side
    let width = content_width
        .saturating_add(6)
        .max(DIALOG_WIDTH)
        .min(area.width);
    let height = content_lines.saturating_add(4).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
