use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::Config;
use crate::models::{Priority, Task};
use crate::tui::widgets::color::{contrast_text_color, parse_color};

fn priority_color(priority: Priority) -> ratatui::style::Color {
    use ratatui::style::Color;
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::LightRed,
    }
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
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
        .title("Tasks")
        .style(Style::default().fg(fg_color).bg(bg_color));

    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press n to add one.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let checkbox = if task.completed { "[x] " } else { "[ ] " };

            let mut title_style = Style::default().fg(fg_color);
            if task.completed {
                title_style = title_style
                    .add_modifier(Modifier::CROSSED_OUT)
                    .add_modifier(Modifier::DIM);
            }

            let line = Line::from(vec![
                Span::styled(checkbox, Style::default().fg(fg_color)),
                Span::styled(task.title.clone(), title_style),
                Span::raw("  "),
                Span::styled(
                    format!("({})", task.priority),
                    Style::default().fg(priority_color(task.priority)),
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
