use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{contrast_text_color, parse_color};

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[&str],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let max_width = area.width as usize;

    let (content, style) = if let Some(msg) = message {
        // Status messages get a highlighted background for visibility
        let msg_fg = contrast_text_color(highlight_bg);
        let text = truncate_with_ellipsis(msg, max_width);
        (
            text,
            Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        // Key hints with bullet separators, as many as fit
        let mut hints_text = String::new();
        for (i, hint) in key_hints.iter().enumerate() {
            let candidate = if i == 0 {
                hint.to_string()
            } else {
                format!("{} • {}", hints_text, hint)
            };
            if candidate.chars().count() > max_width {
                if !hints_text.is_empty() {
                    hints_text = truncate_with_ellipsis(&format!("{}…", hints_text), max_width);
                } else {
                    hints_text = truncate_with_ellipsis(hint, max_width);
                }
                break;
            }
            hints_text = candidate;
        }
        (hints_text, Style::default().fg(fg_color).bg(bg_color))
    };

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
