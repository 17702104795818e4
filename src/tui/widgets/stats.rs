use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::views::CompletionStats;

/// Two cards: completion percentage and pending count
pub fn render_stats(f: &mut Frame, area: Rect, stats: &CompletionStats, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let completion = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{}%", stats.percentage),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} of {} done", stats.completed, stats.total),
            Style::default().fg(fg_color),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Completion")
            .style(Style::default().fg(fg_color).bg(bg_color)),
    );
    f.render_widget(completion, halves[0]);

    let pending = Paragraph::new(vec![
        Line::from(Span::styled(
            stats.pending.to_string(),
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "tasks waiting",
            Style::default().fg(fg_color),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Total Pending")
            .style(Style::default().fg(fg_color).bg(bg_color)),
    );
    f.render_widget(pending, halves[1]);
}
