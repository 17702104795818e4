use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::models::Priority;
use crate::tui::app::{NoteField, NoteForm, TaskField, TaskForm};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::popup_area;

fn field_block(title: &str, active: bool, config: &Config) -> Block<'static> {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    let border_style = if active {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg_color)
    };

    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(border_style)
}

/// Single-line editor field; places the terminal cursor when active
fn render_line_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &Editor,
    active: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);

    let block = field_block(title, active, config);
    let inner = block.inner(area);

    let text = editor.lines.first().cloned().unwrap_or_default();
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(fg_color))
        .block(block);
    f.render_widget(paragraph, area);

    if active {
        let (_, col) = editor.cursor();
        let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position((x, inner.y));
    }
}

fn render_multiline_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &Editor,
    active: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);

    let block = field_block(title, active, config);
    let inner = block.inner(area);

    // Keep the cursor line inside the viewport
    let (line, col) = editor.cursor();
    let height = inner.height.max(1) as usize;
    let scroll = line.saturating_sub(height - 1);

    let text = editor.lines.join("\n");
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(fg_color))
        .scroll((scroll as u16, 0))
        .block(block);
    f.render_widget(paragraph, area);

    if active {
        let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + (line - scroll) as u16;
        f.set_cursor_position((x, y));
    }
}

fn render_priority_field(
    f: &mut Frame,
    area: Rect,
    priority: Priority,
    active: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    let block = field_block("Priority", active, config);

    let spans: Vec<Span> = [Priority::Low, Priority::Medium, Priority::High]
        .iter()
        .flat_map(|level| {
            let style = if *level == priority {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(fg_color).add_modifier(Modifier::DIM)
            };
            [Span::styled(level.as_str().to_uppercase(), style), Span::raw("  ")]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(paragraph, area);
}

pub fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup = popup_area(area, 60, 60);
    f.render_widget(Clear, popup);

    let title = if form.editing_id.is_some() {
        " Edit Task "
    } else {
        " New Task "
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Priority
            Constraint::Length(3), // Due date
            Constraint::Min(0),
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    render_line_field(
        f,
        rows[0],
        "Title",
        &form.title,
        form.current_field == TaskField::Title,
        config,
    );
    render_priority_field(
        f,
        rows[1],
        form.priority,
        form.current_field == TaskField::Priority,
        config,
    );
    render_line_field(
        f,
        rows[2],
        "Due date (YYYY-MM-DD)",
        &form.due_date,
        form.current_field == TaskField::DueDate,
        config,
    );

    let hint = Paragraph::new("Tab: next field • Space: cycle priority • Enter: save • Esc: cancel")
        .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM));
    f.render_widget(hint, rows[4]);
}

pub fn render_note_form(f: &mut Frame, area: Rect, form: &NoteForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup = popup_area(area, 70, 70);
    f.render_widget(Clear, popup);

    let title = if form.editing_id.is_some() {
        " Edit Note "
    } else {
        " New Note "
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(4),    // Content
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    render_line_field(
        f,
        rows[0],
        "Title",
        &form.title,
        form.current_field == NoteField::Title,
        config,
    );
    render_multiline_field(
        f,
        rows[1],
        "Content",
        &form.content,
        form.current_field == NoteField::Content,
        config,
    );

    let hint = Paragraph::new("Tab: switch field • Ctrl+s: save • Esc: discard")
        .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM));
    f.render_widget(hint, rows[2]);
}
