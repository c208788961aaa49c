use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use typecoach::session::SessionEngine;

use crate::ui::theme::Theme;

/// The word window: the active word, marked up against the input, then what comes next.
pub struct TypingArea<'a> {
    engine: &'a SessionEngine,
    window: usize,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(engine: &'a SessionEngine, window: usize, theme: &'a Theme) -> Self {
        Self {
            engine,
            window,
            theme,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharMark {
    Correct,
    Wrong,
    Pending,
}

/// Mark each target char by position against the input typed so far.
fn mark_chars(target: &str, input: &str) -> Vec<(char, CharMark)> {
    let mut typed = input.chars();
    target
        .chars()
        .map(|ch| match typed.next() {
            Some(t) if t == ch => (ch, CharMark::Correct),
            Some(_) => (ch, CharMark::Wrong),
            None => (ch, CharMark::Pending),
        })
        .collect()
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let words = self.engine.upcoming(self.window);
        let input = self.engine.input();

        let mut spans: Vec<Span> = Vec::new();
        if let Some((current, rest)) = words.split_first() {
            for (ch, mark) in mark_chars(current, input) {
                let style = match mark {
                    CharMark::Correct => Style::default().fg(colors.text_correct()),
                    CharMark::Wrong => Style::default()
                        .fg(colors.text_incorrect())
                        .bg(colors.text_incorrect_bg())
                        .add_modifier(Modifier::UNDERLINED),
                    CharMark::Pending => Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg()),
                };
                spans.push(Span::styled(ch.to_string(), style));
            }
            for word in rest {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    word.as_str(),
                    Style::default().fg(colors.text_pending()),
                ));
            }
        }

        let prompt = if input.is_empty() && self.engine.stats().is_empty() {
            Span::styled("Start typing here...", Style::default().fg(colors.text_pending()))
        } else {
            Span::styled(input, Style::default().fg(colors.fg()))
        };

        let lines = vec![
            Line::from(spans),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(colors.accent())),
                prompt,
            ]),
        ];

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
