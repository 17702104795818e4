use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::{AuthField, AuthForm};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;

/// Login screen. The exchange is simulated: any email and password are
/// accepted.
pub fn render_auth(f: &mut Frame, area: Rect, form: &AuthForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let popup = popup_area(area, 60, 60);
    f.render_widget(Clear, popup);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" Day To Day ")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Welcome line
            Constraint::Length(1),
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(1),
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new("Welcome back! Please enter your details.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM)),
        rows[0],
    );

    let field = |title: &str, value: String, active: bool| {
        let border_style = if active {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color)
        };
        Paragraph::new(value)
            .style(Style::default().fg(fg_color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(border_style),
            )
    };

    let email_active = form.current_field == AuthField::Email;
    let password_active = form.current_field == AuthField::Password;

    let email_value = form.email.lines.first().cloned().unwrap_or_default();
    f.render_widget(field("Email Address", email_value, email_active), rows[2]);

    // Mask the password like any login form, stub or not
    let password_chars = form
        .password
        .lines
        .first()
        .map(|l| l.chars().count())
        .unwrap_or(0);
    let masked = "•".repeat(password_chars);
    f.render_widget(field("Password", masked, password_active), rows[3]);

    f.render_widget(
        Paragraph::new("Enter: sign in • Tab: switch field • Ctrl+g: continue with Google")
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM)),
        rows[5],
    );

    // Cursor in the active field
    let (field_area, editor) = if email_active {
        (rows[2], &form.email)
    } else {
        (rows[3], &form.password)
    };
    let inner_field = Block::default().borders(Borders::ALL).inner(field_area);
    let (_, col) = editor.cursor();
    let x = inner_field.x + (col as u16).min(inner_field.width.saturating_sub(1));
    f.set_cursor_position((x, inner_field.y));
}
