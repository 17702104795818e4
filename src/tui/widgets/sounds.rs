use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap};

use crate::Config;
use crate::sounds::{SOUNDSCAPES, SoundBoard};
use crate::tui::app::{Mode, MusicState};
use crate::tui::widgets::color::{contrast_text_color, parse_color};

pub fn render_sounds(
    f: &mut Frame,
    area: Rect,
    board: &SoundBoard,
    music: &MusicState,
    mode: Mode,
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = contrast_text_color(highlight_bg);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                          // Discovery input
            Constraint::Length(SOUNDSCAPES.len() as u16 + 2), // Catalog
            Constraint::Length(1),                          // Volume
            Constraint::Min(0),                             // Discovery result
        ])
        .split(area);

    // Music discovery search box
    let searching = music.pending.is_some();
    let search_active = mode == Mode::MusicSearch;
    let search_title = if searching {
        " Music Discovery (searching…) "
    } else {
        " Music Discovery (s to search) "
    };
    let border_style = if search_active {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg_color)
    };
    let search_block = Block::default()
        .borders(Borders::ALL)
        .title(search_title)
        .border_style(border_style)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let search_inner = search_block.inner(rows[0]);
    let query = music.query.lines.first().cloned().unwrap_or_default();
    f.render_widget(
        Paragraph::new(query).block(search_block).style(Style::default().fg(fg_color)),
        rows[0],
    );
    if search_active {
        let (_, col) = music.query.cursor();
        let x = search_inner.x + (col as u16).min(search_inner.width.saturating_sub(1));
        f.set_cursor_position((x, search_inner.y));
    }

    // Soundscape catalog
    let items: Vec<ListItem> = SOUNDSCAPES
        .iter()
        .map(|sound| {
            let playing = board.is_active(sound.id);
            let state_label = if playing { "Playing" } else { "Ready" };
            let state_style = if playing {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(fg_color).add_modifier(Modifier::DIM)
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {}  ", sound.icon, sound.name)),
                Span::styled(state_label, state_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Soundscapes")
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, rows[1], list_state);

    // Volume
    let volume_percent = (board.volume() * 100.0).round() as u16;
    let volume = Gauge::default()
        .gauge_style(Style::default().fg(accent).bg(bg_color))
        .percent(volume_percent)
        .label(format!("volume {}% (+/-)", volume_percent));
    f.render_widget(volume, rows[2]);

    // Discovery result
    if let Some(result) = &music.result {
        let mut lines: Vec<Line> = Vec::new();
        for text_line in result.text.lines() {
            lines.push(Line::from(Span::styled(
                text_line.to_string(),
                Style::default().fg(fg_color),
            )));
        }
        if !result.links.is_empty() {
            lines.push(Line::from(""));
            for link in &result.links {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} ", link.title),
                        Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        link.uri.clone(),
                        Style::default().fg(accent).add_modifier(Modifier::UNDERLINED),
                    ),
                ]));
            }
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Results")
                    .style(Style::default().fg(fg_color).bg(bg_color)),
            );
        f.render_widget(paragraph, rows[3]);
    }
}
