use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::Config;
use crate::models::Note;
use crate::tui::widgets::color::{contrast_text_color, note_color, parse_color};

fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let mut text: String = first_line.chars().take(40).collect();
    if first_line.chars().count() > 40 || content.lines().count() > 1 {
        text.push('…');
    }
    text
}

fn updated_label(note: &Note) -> String {
    chrono::DateTime::from_timestamp_millis(note.updated_at)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn render_note_list(
    f: &mut Frame,
    area: Rect,
    notes: &[Note],
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = contrast_text_color(highlight_bg);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Notes")
        .style(Style::default().fg(fg_color).bg(bg_color));

    if notes.is_empty() {
        let empty = Paragraph::new("Capture your thoughts. Press n to add a note!")
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let swatch = Span::styled("■ ", Style::default().fg(note_color(&note.color)));
            let title = Span::styled(
                note.display_title().to_string(),
                Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
            );
            let body = preview(&note.content);
            let line = Line::from(vec![
                swatch,
                title,
                Span::raw("  "),
                Span::styled(body, Style::default().fg(fg_color).add_modifier(Modifier::DIM)),
                Span::raw("  "),
                Span::styled(
                    updated_label(note),
                    Style::default().fg(fg_color).add_modifier(Modifier::DIM),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
