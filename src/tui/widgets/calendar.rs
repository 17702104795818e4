use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::tui::widgets::color::{contrast_text_color, parse_color};
use crate::utils::today_string;
use crate::views::{MonthGrid, month_label};

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const CELL_WIDTH: usize = 4;

/// Month grid with task markers. Cells are fixed-width; a dot after the
/// day number marks dates with tasks anywhere in the collection.
pub fn render_calendar(
    f: &mut Frame,
    area: Rect,
    grid: &MonthGrid,
    selected_date: &str,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = contrast_text_color(highlight_bg);
    let accent = parse_color(&active_theme.accent);

    let today = today_string();

    let mut lines: Vec<Line> = Vec::new();

    let header: String = WEEKDAYS
        .iter()
        .map(|d| format!("{:^width$}", d, width = CELL_WIDTH))
        .collect();
    lines.push(Line::from(Span::styled(
        header,
        Style::default().fg(fg_color).add_modifier(Modifier::DIM),
    )));

    let mut row: Vec<Span> = Vec::new();
    for _ in 0..grid.leading_blanks {
        row.push(Span::raw(" ".repeat(CELL_WIDTH)));
    }

    for cell in &grid.days {
        let marker = if cell.has_tasks { "•" } else { " " };
        let text = format!("{:>2}{} ", cell.day, marker);

        let style = if cell.date == selected_date {
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else if cell.date == today {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color)
        };
        row.push(Span::styled(text, style));

        if (grid.leading_blanks + cell.day as usize) % 7 == 0 {
            lines.push(Line::from(std::mem::take(&mut row)));
        }
    }
    if !row.is_empty() {
        lines.push(Line::from(row));
    }

    let title = format!(" {} ", month_label(grid.year, grid.month));
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        );

    f.render_widget(paragraph, area);
}
