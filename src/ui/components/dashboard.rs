use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use typecoach::session::SessionReport;

use crate::app::FeedbackState;
use crate::ui::theme::Theme;

/// Shown in place of a metric when the session produced no data.
const NO_DATA: &str = "-";

pub struct Dashboard<'a> {
    report: Option<&'a SessionReport>,
    feedback: &'a FeedbackState,
    can_request_feedback: bool,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        report: Option<&'a SessionReport>,
        feedback: &'a FeedbackState,
        can_request_feedback: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            report,
            feedback,
            can_request_feedback,
            theme,
        }
    }
}

fn wpm_text(report: Option<&SessionReport>) -> String {
    report.map_or_else(|| NO_DATA.to_string(), |r| format!("{} WPM", r.words_per_minute))
}

fn accuracy_text(report: Option<&SessionReport>) -> String {
    report.map_or_else(|| NO_DATA.to_string(), |r| format!("{}%", r.accuracy_percent))
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Session Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let wpm_line = Line::from(vec![
            Span::styled("  Speed:    ", Style::default().fg(colors.fg())),
            Span::styled(
                wpm_text(self.report),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(wpm_line).render(layout[1], buf);

        let acc_color = match self.report.map(|r| r.accuracy_percent) {
            Some(acc) if acc >= 95 => colors.success(),
            Some(acc) if acc >= 85 => colors.warning(),
            Some(_) => colors.error(),
            None => colors.text_pending(),
        };
        let mut acc_spans = vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg())),
            Span::styled(
                accuracy_text(self.report),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(r) = self.report {
            acc_spans.push(Span::styled(
                format!("  ({}/{} words)", r.words_correct, r.words_submitted),
                Style::default().fg(colors.text_pending()),
            ));
        }
        Paragraph::new(Line::from(acc_spans)).render(layout[2], buf);

        let backspace_text = self
            .report
            .map_or_else(|| NO_DATA.to_string(), |r| r.total_backspaces.to_string());
        let backspace_line = Line::from(vec![
            Span::styled("  Backspaces: ", Style::default().fg(colors.fg())),
            Span::styled(backspace_text, Style::default().fg(colors.fg())),
        ]);
        Paragraph::new(backspace_line).render(layout[3], buf);

        let coach = match self.feedback {
            FeedbackState::Ready(text) => Paragraph::new(text.as_str())
                .style(Style::default().fg(colors.fg()))
                .block(
                    Block::bordered()
                        .title(" Coach ")
                        .border_style(Style::default().fg(colors.border())),
                ),
            FeedbackState::Failed(err) => {
                Paragraph::new(format!("  {err}")).style(Style::default().fg(colors.error()))
            }
            FeedbackState::NotRequested if self.report.is_none() => Paragraph::new(
                "  No words were submitted, so there is nothing to coach yet.",
            )
            .style(Style::default().fg(colors.text_pending())),
            FeedbackState::NotRequested => Paragraph::new(""),
        };
        coach.wrap(Wrap { trim: true }).render(layout[4], buf);

        let mut help = Vec::new();
        if self.can_request_feedback {
            help.push(Span::styled("  [f] Get feedback  ", Style::default().fg(colors.accent())));
        }
        help.push(Span::styled("  [r/Enter] Restart  ", Style::default().fg(colors.accent())));
        help.push(Span::styled("[q/Esc] Quit", Style::default().fg(colors.accent())));
        Paragraph::new(Line::from(help)).render(layout[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn report() -> SessionReport {
        SessionReport {
            words_per_minute: 42,
            accuracy_percent: 97,
            words_submitted: 30,
            words_correct: 29,
            total_backspaces: 4,
            duration_secs: 30,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn metrics_show_values() {
        let r = report();
        assert_eq!(wpm_text(Some(&r)), "42 WPM");
        assert_eq!(accuracy_text(Some(&r)), "97%");
    }

    #[test]
    fn missing_report_shows_sentinel() {
        assert_eq!(wpm_text(None), NO_DATA);
        assert_eq!(accuracy_text(None), NO_DATA);
    }

    #[test]
    fn renders_without_panicking_on_tiny_areas() {
        let theme = Theme::default();
        let feedback = FeedbackState::Ready("You did great.".to_string());
        let r = report();
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        Dashboard::new(Some(&r), &feedback, false, &theme).render(area, &mut buf);
    }
}
