use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::Config;
use crate::timer::FocusTimer;
use crate::tui::app::TimerPreset;
use crate::tui::widgets::color::parse_color;

pub fn render_focus(
    f: &mut Frame,
    area: Rect,
    timer: &FocusTimer,
    presets: &[TimerPreset],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Focus Mode")
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Encouragement
            Constraint::Length(1),
            Constraint::Length(1), // Clock
            Constraint::Length(1), // Focused task
            Constraint::Length(1),
            Constraint::Length(1), // Progress gauge
            Constraint::Length(1),
            Constraint::Length(1), // Presets
            Constraint::Length(1),
            Constraint::Length(1), // Key hints
            Constraint::Min(0),
        ])
        .split(inner);

    let encouragement = if timer.is_running() {
        "Keep going, you got this!"
    } else {
        "Ready to dive in?"
    };
    f.render_widget(
        Paragraph::new(encouragement)
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg_color)),
        rows[0],
    );

    f.render_widget(
        Paragraph::new(timer.format_remaining())
            .alignment(Alignment::Center)
            .style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        rows[2],
    );

    if let Some(label) = &timer.focus_label {
        f.render_widget(
            Paragraph::new(format!("focusing: {}", label))
                .alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM)),
            rows[3],
        );
    }

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(accent).bg(bg_color))
        .percent(timer.progress_percent())
        .label(format!("{}%", timer.progress_percent()));
    f.render_widget(gauge, rows[5]);

    let mut preset_spans: Vec<Span> = Vec::new();
    for preset in presets {
        let is_current = preset.secs == timer.total_secs();
        let style = if is_current {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color).add_modifier(Modifier::DIM)
        };
        preset_spans.push(Span::styled(
            format!("{} ({}m)", preset.label, preset.secs / 60),
            style,
        ));
        preset_spans.push(Span::raw("   "));
    }
    f.render_widget(
        Paragraph::new(Line::from(preset_spans)).alignment(Alignment::Center),
        rows[7],
    );

    f.render_widget(
        Paragraph::new("Space: start/pause • r: reset • p: preset")
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM)),
        rows[9],
    );
}
