pub mod dialog;
pub mod theme;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::i18n::{Localizer, MessageKey};
use crate::session::{DialogResult, FinishReason, InputError, Phase, Session, Summary};
use crate::ui::theme::Theme;

const HORIZONTAL_MARGIN: u16 = 2;
const TITLE_BAR_HEIGHT: u16 = 3;
const CURSOR: &str = "█";
const SPEAKER: &str = "🔊";

/// Renders whatever state the session is in. Holds only borrows, so build
/// one per frame.
pub struct SessionView<'a> {
    pub session: &'a Session,
    pub l10n: &'a Localizer,
    pub theme: &'a Theme,
}

impl<'a> SessionView<'a> {
    pub fn new(session: &'a Session, l10n: &'a Localizer, theme: &'a Theme) -> Self {
        Self {
            session,
            l10n,
            theme,
        }
    }

    pub fn progress_text(&self) -> String {
        let progress = self.session.progress();
        let words = self.session.correct_words().iter().join(", ");

        self.l10n.translate(
            MessageKey::ProgressMessage,
            &[
                ("Current", progress.turn.to_string()),
                ("Completed", progress.completed.to_string()),
                ("Total", progress.total.to_string()),
                ("Words", words),
            ],
        )
    }

    fn render_title_bar(&self, area: Rect, buf: &mut Buffer) {
        let title = Paragraph::new(Span::styled(
            format!("{SPEAKER} {}", self.progress_text()),
            self.theme.title_bar,
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.title_border)
                .title(format!(" {} ", self.l10n.text(MessageKey::Title)))
                .title_bottom(
                    Line::from(Span::styled(
                        format!(" {} ", self.l10n.text(MessageKey::QuitHint)),
                        self.theme.hint,
                    ))
                    .right_aligned(),
                ),
        );
        title.render(area, buf);
    }

    fn render_waiting(&self, area: Rect, buf: &mut Buffer) {
        let waiting = Paragraph::new(vec![
            Line::from(Span::styled(
                self.l10n.text(MessageKey::WaitingForAudio),
                self.theme.waiting,
            )),
            Line::from(Span::styled(
                self.l10n.text(MessageKey::Subtitle),
                self.theme.hint,
            )),
        ])
        .alignment(Alignment::Center);
        waiting.render(centered_rows(area, 2), buf);
    }

    fn render_prompt(&self, input: &str, error: Option<InputError>, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let prompt = self.l10n.translate(
            MessageKey::WordPrompt,
            &[("Number", self.session.progress().turn.to_string())],
        );

        let entry = if input.is_empty() {
            Span::styled(self.l10n.text(MessageKey::Placeholder), theme.placeholder)
        } else {
            Span::styled(input.to_string(), theme.input)
        };

        let mut lines = vec![
            Line::from(Span::styled(prompt, theme.prompt)),
            Line::default(),
            Line::from(vec![entry, Span::styled(CURSOR, theme.cursor)]),
            Line::default(),
        ];

        if error == Some(InputError::Blank) {
            lines.push(Line::from(Span::styled(
                format!("❌ {}", self.l10n.text(MessageKey::ValidationError)),
                theme.error,
            )));
        }
        lines.push(Line::from(Span::styled(
            self.l10n.text(MessageKey::TabHint),
            theme.hint,
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    fn render_dialog(&self, result: &DialogResult, area: Rect, buf: &mut Buffer) {
        let lines = dialog::dialog_lines(result, self.l10n, self.theme);
        let content_width = lines.iter().map(Line::width).max().unwrap_or(0);
        let rect = dialog::dialog_area(
            area,
            u16::try_from(lines.len()).unwrap_or(u16::MAX),
            u16::try_from(content_width).unwrap_or(u16::MAX),
        );

        let border = if result.is_correct() {
            self.theme.correct_dialog
        } else {
            self.theme.incorrect_dialog
        };

        Clear.render(rect, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border)
                    .padding(Padding::new(2, 2, 1, 1)),
            )
            .render(rect, buf);
    }

    fn render_summary(&self, reason: FinishReason, area: Rect, buf: &mut Buffer) {
        let lines = summary_lines(&self.session.summary(), reason, self.l10n)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, self.theme.summary)))
            .collect::<Vec<_>>();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

impl Widget for SessionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(1)])
            .split(area);

        self.render_title_bar(chunks[0], buf);

        let body = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(1)
            .constraints([Constraint::Min(1)])
            .split(chunks[1])[0];

        match self.session.phase() {
            Phase::AwaitingAudio { .. } => self.render_waiting(body, buf),
            Phase::AwaitingInput { buffer, error, .. } => {
                self.render_prompt(buffer, *error, body, buf)
            }
            Phase::ShowingDialog { result, .. } => self.render_dialog(result, chunks[1], buf),
            Phase::Finished(reason) => self.render_summary(*reason, body, buf),
        }
    }
}

/// Localized end-of-session report, used on screen and after the terminal
/// is restored.
pub fn summary_lines(summary: &Summary, reason: FinishReason, l10n: &Localizer) -> Vec<String> {
    let headline = match reason {
        FinishReason::Completed => l10n.text(MessageKey::PracticeComplete),
        FinishReason::Cancelled => l10n.text(MessageKey::SessionCancelled),
    };

    vec![
        headline,
        l10n.translate(
            MessageKey::WordsPracticed,
            &[("Count", summary.correct.to_string())],
        ),
        l10n.translate(
            MessageKey::TotalAttempts,
            &[("Count", summary.attempts.to_string())],
        ),
        l10n.translate(
            MessageKey::Accuracy,
            &[("Percent", format!("{:.1}", summary.accuracy_percent()))],
        ),
    ]
}

/// Framed summary for printing to a plain terminal.
pub fn summary_banner(lines: &[String]) -> String {
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0).max(30);
    let rule = "=".repeat(width);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&rule);
    out
}

fn centered_rows(area: Rect, rows: u16) -> Rect {
    let height = rows.min(area.height);
    Rect::new(area.x, area.y + (area.height - height) / 2, area.width, height)
}
