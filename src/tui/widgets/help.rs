use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let kb = &config.key_bindings;

    let entries: Vec<(String, &str)> = vec![
        (format!("{} / {}", kb.tab_left, kb.tab_right), "switch tab"),
        (format!("{}-{}", kb.tab_1, kb.tab_4), "jump to tab"),
        (format!("{} / {}", kb.list_up, kb.list_down), "move selection"),
        (kb.new.clone(), "new task / note"),
        (kb.edit.clone(), "edit selected"),
        (kb.delete.clone(), "delete selected (asks first)"),
        (kb.toggle_task.clone(), "toggle task done"),
        (kb.calendar.clone(), "show calendar"),
        (kb.filter.clone(), "cycle status filter"),
        (kb.assist.clone(), "AI task suggestions"),
        ("t".to_string(), "jump to today"),
        ("F".to_string(), "focus selected task"),
        ("s".to_string(), "music discovery (Sounds tab)"),
        ("o".to_string(), "open stream (Sounds tab)"),
        (kb.logout.clone(), "log out"),
        (kb.quit.clone(), "quit"),
    ];

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (key, description) in entries {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:>12}  ", key),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(fg_color)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc to close",
        Style::default().fg(fg_color).add_modifier(Modifier::DIM),
    )));

    let popup = popup_area(area, 60, 80);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color));

    f.render_widget(paragraph, popup);
}
