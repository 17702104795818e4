use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::{StatusFilter, Tab};
use crate::tui::app::{App, ItemForm, Mode};
use crate::tui::layout::Layout;
use crate::tui::widgets::auth::render_auth;
use crate::tui::widgets::calendar::render_calendar;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::confirm_delete::render_confirm_delete;
use crate::tui::widgets::focus::render_focus;
use crate::tui::widgets::form::{render_note_form, render_task_form};
use crate::tui::widgets::help::render_help;
use crate::tui::widgets::note_list::render_note_list;
use crate::tui::widgets::sounds::render_sounds;
use crate::tui::widgets::stats::render_stats;
use crate::tui::widgets::status_bar::render_status_bar;
use crate::tui::widgets::tabs::render_tabs;
use crate::tui::widgets::task_list::render_task_list;
use crate::utils::display_date;
use crate::views;

pub fn render(f: &mut Frame, app: &mut App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let layout = Layout::calculate(f.area());

    let title = match app.core.user() {
        Some(user) => format!(" Day To Day — Hello, {}! ", user.greeting_name()),
        None => " Day To Day ".to_string(),
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer, f.area());

    if app.ui.mode == Mode::Auth {
        render_auth(f, layout.inner_area, &app.auth, &app.config);
        render_status_bar(
            f,
            layout.status_area,
            app.status.message.as_ref(),
            &["Enter: sign in", "Ctrl+g: Google", "Esc: quit"],
            &app.config,
        );
        return;
    }

    render_tabs(f, layout.tabs_area, app.core.active_tab(), &app.config);

    match app.core.active_tab() {
        Tab::Tasks => render_tasks_tab(f, layout.main_area, app),
        Tab::Focus => render_focus(f, layout.main_area, &app.timer, &app.presets, &app.config),
        Tab::Sounds => {
            let board = app.sounds.clone();
            render_sounds(
                f,
                layout.main_area,
                &board,
                &app.music,
                app.ui.mode,
                &mut app.ui.list_state,
                &app.config,
            );
        }
        Tab::Notes => {
            let notes = app.core.notes().to_vec();
            render_note_list(
                f,
                layout.main_area,
                &notes,
                &mut app.ui.list_state,
                &app.config,
            );
        }
    }

    // Modal overlays
    match app.ui.mode {
        Mode::Create => match &app.form.create_form {
            Some(ItemForm::Task(form)) => render_task_form(f, layout.inner_area, form, &app.config),
            Some(ItemForm::Note(form)) => render_note_form(f, layout.inner_area, form, &app.config),
            None => {}
        },
        Mode::ConfirmDelete => {
            if let Some(target) = &app.modals.delete_confirmation {
                render_confirm_delete(
                    f,
                    layout.inner_area,
                    target,
                    app.modals.delete_modal_selection,
                    &app.config,
                );
            }
        }
        Mode::Help => render_help(f, layout.inner_area, &app.config),
        _ => {}
    }

    let hints = status_hints(app);
    let hint_refs: Vec<&str> = hints.iter().map(|s| s.as_str()).collect();
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &hint_refs,
        &app.config,
    );
}

fn render_tasks_tab(f: &mut Frame, area: Rect, app: &mut App) {
    let show_calendar = app.ui.show_calendar;

    let mut constraints = vec![
        Constraint::Length(4), // Stats cards
        Constraint::Length(3), // Smart planning input
        Constraint::Length(1), // Date row
    ];
    if show_calendar {
        constraints.push(Constraint::Length(9)); // Calendar
    }
    constraints.push(Constraint::Length(1)); // Filter row
    constraints.push(Constraint::Min(1)); // Task list

    let rows = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_stats(f, rows[0], &app.core.stats(), &app.config);
    render_assist_box(f, rows[1], app);
    render_date_row(f, rows[2], app);

    let mut next = 3;
    if show_calendar {
        if let Some(grid) = views::month_grid(app.ui.cal_year, app.ui.cal_month, app.core.tasks())
        {
            render_calendar(f, rows[next], &grid, app.core.selected_date(), &app.config);
        }
        next += 1;
    }

    render_filter_row(f, rows[next], app);

    let tasks = app.visible_tasks();
    render_task_list(f, rows[next + 1], &tasks, &mut app.ui.list_state, &app.config);
}

fn render_assist_box(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let active = app.ui.mode == Mode::Assist;
    let title = if app.assist_pending() {
        " Smart Planning (thinking…) "
    } else {
        " Smart Planning (a to ask) "
    };
    let border_style = if active {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg_color)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(area);

    let content = app.assist.input.lines.first().cloned().unwrap_or_default();
    let content = if content.is_empty() && !active {
        "What's the plan for today?".to_string()
    } else {
        content
    };
    let style = if active {
        Style::default().fg(fg_color)
    } else {
        Style::default().fg(fg_color).add_modifier(Modifier::DIM)
    };

    f.render_widget(Paragraph::new(content).style(style).block(block), area);

    if active {
        let (_, col) = app.assist.input.cursor();
        let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position((x, inner.y));
    }
}

fn render_date_row(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    let line = Line::from(vec![
        Span::styled(
            display_date(app.core.selected_date()),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  ([ and ] change day, c calendar, t today)",
            Style::default().fg(fg_color).add_modifier(Modifier::DIM),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_filter_row(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let accent = parse_color(&active_theme.accent);

    let mut spans: Vec<Span> = Vec::new();
    for filter in StatusFilter::ALL {
        let style = if filter == app.core.filter() {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color).add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(filter.label(), style));
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn status_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.ui.mode {
        Mode::View => match app.core.active_tab() {
            Tab::Tasks => vec![
                format!("{}: new", kb.new),
                format!("{}: edit", kb.edit),
                format!("{}: delete", kb.delete),
                format!("{}: done", kb.toggle_task),
                format!("{}: suggest", kb.assist),
                format!("{}: filter", kb.filter),
                format!("{}: help", kb.help),
                format!("{}: quit", kb.quit),
            ],
            Tab::Focus => vec![
                "Space: start/pause".to_string(),
                "r: reset".to_string(),
                "p: preset".to_string(),
                format!("{}: help", kb.help),
                format!("{}: quit", kb.quit),
            ],
            Tab::Sounds => vec![
                format!("{}: play/stop", kb.select),
                "o: open stream".to_string(),
                "s: search music".to_string(),
                "+/-: volume".to_string(),
                format!("{}: quit", kb.quit),
            ],
            Tab::Notes => vec![
                format!("{}: new", kb.new),
                format!("{}: edit", kb.edit),
                format!("{}: delete", kb.delete),
                format!("{}: help", kb.help),
                format!("{}: quit", kb.quit),
            ],
        },
        Mode::Create => vec![
            "Tab: next field".to_string(),
            "Ctrl+s: save".to_string(),
            "Esc: cancel".to_string(),
        ],
        Mode::ConfirmDelete => vec!["Enter: confirm".to_string(), "Esc: cancel".to_string()],
        Mode::Assist => vec![
            "Enter: ask for suggestions".to_string(),
            "Esc: back".to_string(),
        ],
        Mode::MusicSearch => vec!["Enter: search".to_string(), "Esc: back".to_string()],
        Mode::Help => vec!["Esc: close".to_string()],
        Mode::Auth => Vec::new(),
    }
}
