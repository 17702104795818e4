use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::DeleteTarget;
use crate::tui::widgets::color::{contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;

/// Deletion is irreversible, so it is always gated behind this modal
pub fn render_confirm_delete(
    f: &mut Frame,
    area: Rect,
    target: &DeleteTarget,
    selection: usize,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = contrast_text_color(highlight_bg);

    let popup = popup_area(area, 50, 35);
    f.render_widget(Clear, popup);

    let mut all_lines = Vec::new();

    all_lines.push(Line::from(Span::styled(
        format!("Delete this {}? This cannot be undone.", target.kind().to_lowercase()),
        Style::default().fg(fg_color).bg(bg_color),
    )));
    all_lines.push(Line::from(""));
    all_lines.push(Line::from(Span::styled(
        target.label().to_string(),
        Style::default().fg(fg_color).bg(bg_color),
    )));
    all_lines.push(Line::from(""));

    let options = ["Delete", "Cancel"];
    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selection;
        let prefix = if is_selected { "> " } else { "  " };
        let style = if is_selected {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg_color).bg(bg_color)
        };
        all_lines.push(Line::from(Span::styled(
            format!("{}{}", prefix, option),
            style,
        )));
    }

    all_lines.push(Line::from(""));
    all_lines.push(Line::from(Span::styled(
        "Use ↑↓ to choose, Enter to confirm, Esc to cancel",
        Style::default().fg(fg_color).bg(bg_color),
    )));

    let paragraph = Paragraph::new(all_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}
