use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::state::Tab;
use crate::tui::app::{
    App, AuthField, ItemForm, Mode, NoteField, TaskField,
};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::render;
use crate::tui::widgets::editor::Editor;
use crate::utils::parse_key_binding;

/// How long to wait for input before re-rendering; also drives timer polls
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Guard that ensures terminal state is restored even on panic.
/// A TUI left in raw mode or the alternate screen makes the user's
/// terminal unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After this the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors - we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the
    // error lands in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    app.sync_list_state();

    loop {
        app.check_status_message_timeout();
        app.poll_timer(Instant::now());
        app.poll_providers();

        terminal.draw(|f| render::render(f, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    Ok(())
}

fn binding_matches(binding: &str, key: &KeyEvent) -> bool {
    parse_key_binding(binding)
        .map(|b| b.matches(key))
        .unwrap_or(false)
}

/// Route typing keys into an editor. Returns whether the key was consumed.
fn handle_editor_key(editor: &mut Editor, key: &KeyEvent, multiline: bool) -> bool {
    match key.code {
        KeyCode::Char(ch)
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
        {
            editor.insert_char(ch);
            true
        }
        KeyCode::Enter if multiline => {
            editor.insert_newline();
            true
        }
        KeyCode::Backspace => {
            editor.backspace();
            true
        }
        KeyCode::Delete => {
            editor.delete();
            true
        }
        KeyCode::Left => {
            editor.move_left();
            true
        }
        KeyCode::Right => {
            editor.move_right();
            true
        }
        KeyCode::Up if multiline => {
            editor.move_up();
            true
        }
        KeyCode::Down if multiline => {
            editor.move_down();
            true
        }
        KeyCode::Home => {
            editor.move_home();
            true
        }
        KeyCode::End => {
            editor.move_end();
            true
        }
        _ => false,
    }
}

/// Dispatch one key press. Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    // Ctrl+c always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui.mode {
        Mode::Auth => handle_auth_key(app, key),
        Mode::View => handle_view_key(app, key),
        Mode::Create => handle_create_key(app, key),
        Mode::ConfirmDelete => handle_confirm_delete_key(app, key),
        Mode::Assist => handle_assist_key(app, key),
        Mode::MusicSearch => handle_music_search_key(app, key),
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter)
                || binding_matches(&app.config.key_bindings.help, &key)
                || binding_matches(&app.config.key_bindings.quit, &key)
            {
                app.ui.mode = Mode::View;
            }
            Ok(false)
        }
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            app.auth.current_field = match app.auth.current_field {
                AuthField::Email => AuthField::Password,
                AuthField::Password => AuthField::Email,
            };
        }
        KeyCode::Enter => app.auth_submit()?,
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.auth_google()?;
        }
        _ => {
            let editor = match app.auth.current_field {
                AuthField::Email => &mut app.auth.email,
                AuthField::Password => &mut app.auth.password,
            };
            handle_editor_key(editor, &key, false);
        }
    }
    Ok(false)
}

fn handle_view_key(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    // Calendar navigation swallows movement keys while it is open
    if app.core.active_tab() == Tab::Tasks && app.ui.show_calendar {
        match key.code {
            KeyCode::Left => {
                app.select_date_offset(-1);
                return Ok(false);
            }
            KeyCode::Right => {
                app.select_date_offset(1);
                return Ok(false);
            }
            KeyCode::Up => {
                app.select_date_offset(-7);
                return Ok(false);
            }
            KeyCode::Down => {
                app.select_date_offset(7);
                return Ok(false);
            }
            KeyCode::PageUp => {
                app.calendar_prev_month();
                return Ok(false);
            }
            KeyCode::PageDown => {
                app.calendar_next_month();
                return Ok(false);
            }
            KeyCode::Enter | KeyCode::Esc => {
                app.ui.show_calendar = false;
                return Ok(false);
            }
            _ => {}
        }
    }

    if binding_matches(&kb.quit, &key) {
        return Ok(true);
    }
    if binding_matches(&kb.help, &key) {
        app.ui.mode = Mode::Help;
        return Ok(false);
    }
    if binding_matches(&kb.logout, &key) {
        app.logout()?;
        return Ok(false);
    }
    if binding_matches(&kb.tab_left, &key) {
        app.prev_tab();
        return Ok(false);
    }
    if binding_matches(&kb.tab_right, &key) {
        app.next_tab();
        return Ok(false);
    }
    if binding_matches(&kb.tab_1, &key) {
        app.switch_tab(Tab::Tasks);
        return Ok(false);
    }
    if binding_matches(&kb.tab_2, &key) {
        app.switch_tab(Tab::Focus);
        return Ok(false);
    }
    if binding_matches(&kb.tab_3, &key) {
        app.switch_tab(Tab::Sounds);
        return Ok(false);
    }
    if binding_matches(&kb.tab_4, &key) {
        app.switch_tab(Tab::Notes);
        return Ok(false);
    }
    if binding_matches(&kb.list_up, &key) || key.code == KeyCode::Up {
        app.move_selection_up();
        return Ok(false);
    }
    if binding_matches(&kb.list_down, &key) || key.code == KeyCode::Down {
        app.move_selection_down();
        return Ok(false);
    }

    match app.core.active_tab() {
        Tab::Tasks => handle_tasks_tab_key(app, key, &kb)?,
        Tab::Focus => handle_focus_tab_key(app, key),
        Tab::Sounds => handle_sounds_tab_key(app, key, &kb),
        Tab::Notes => handle_notes_tab_key(app, key, &kb),
    }
    Ok(false)
}

fn handle_tasks_tab_key(
    app: &mut App,
    key: KeyEvent,
    kb: &crate::config::KeyBindings,
) -> Result<(), TuiError> {
    if binding_matches(&kb.new, &key) {
        app.enter_create_mode();
    } else if binding_matches(&kb.edit, &key) || binding_matches(&kb.select, &key) {
        app.enter_edit_mode();
    } else if binding_matches(&kb.delete, &key) {
        app.request_delete_selected();
    } else if binding_matches(&kb.toggle_task, &key) {
        app.toggle_selected_task()?;
    } else if binding_matches(&kb.calendar, &key) {
        app.toggle_calendar();
    } else if binding_matches(&kb.filter, &key) {
        app.core.cycle_filter();
        app.sync_list_state();
    } else if binding_matches(&kb.assist, &key) {
        app.enter_assist_mode();
    } else {
        match key.code {
            KeyCode::Char('[') => app.select_date_offset(-1),
            KeyCode::Char(']') => app.select_date_offset(1),
            KeyCode::Char('t') => app.select_today(),
            KeyCode::Char('F') => app.focus_selected_task(),
            _ => {}
        }
    }
    Ok(())
}

fn handle_focus_tab_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(' ') => app.timer.toggle(Instant::now()),
        KeyCode::Char('r') => app.timer.reset(),
        KeyCode::Char('p') => app.cycle_preset(),
        _ => {}
    }
}

fn handle_sounds_tab_key(app: &mut App, key: KeyEvent, kb: &crate::config::KeyBindings) {
    if binding_matches(&kb.select, &key) || key.code == KeyCode::Char(' ') {
        app.toggle_selected_sound();
        return;
    }
    match key.code {
        KeyCode::Char('o') => app.open_selected_sound(),
        KeyCode::Char('s') => app.enter_music_search_mode(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.sounds.nudge_volume(0.05),
        KeyCode::Char('-') => app.sounds.nudge_volume(-0.05),
        _ => {}
    }
}

fn handle_notes_tab_key(app: &mut App, key: KeyEvent, kb: &crate::config::KeyBindings) {
    if binding_matches(&kb.new, &key) {
        app.enter_create_mode();
    } else if binding_matches(&kb.edit, &key) || binding_matches(&kb.select, &key) {
        app.enter_edit_mode();
    } else if binding_matches(&kb.delete, &key) {
        app.request_delete_selected();
    }
}

fn handle_create_key(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    if key.code == KeyCode::Esc {
        app.exit_create_mode();
        return Ok(false);
    }
    // Ctrl+s saves from any field
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.save_create_form()?;
        return Ok(false);
    }
    // Enter saves task forms; note forms keep Enter for the content editor
    if key.code == KeyCode::Enter && matches!(app.form.create_form, Some(ItemForm::Task(_))) {
        app.save_create_form()?;
        return Ok(false);
    }

    let Some(form) = app.form.create_form.as_mut() else {
        app.ui.mode = Mode::View;
        return Ok(false);
    };

    match form {
        ItemForm::Task(task_form) => {
            match key.code {
                KeyCode::Tab | KeyCode::Down => {
                    task_form.current_field = match task_form.current_field {
                        TaskField::Title => TaskField::Priority,
                        TaskField::Priority => TaskField::DueDate,
                        TaskField::DueDate => TaskField::Title,
                    };
                }
                KeyCode::BackTab | KeyCode::Up => {
                    task_form.current_field = match task_form.current_field {
                        TaskField::Title => TaskField::DueDate,
                        TaskField::Priority => TaskField::Title,
                        TaskField::DueDate => TaskField::Priority,
                    };
                }
                KeyCode::Char(' ') if task_form.current_field == TaskField::Priority => {
                    task_form.priority = task_form.priority.cycle();
                }
                KeyCode::Left if task_form.current_field == TaskField::Priority => {
                    task_form.priority = task_form.priority.cycle().cycle();
                }
                KeyCode::Right if task_form.current_field == TaskField::Priority => {
                    task_form.priority = task_form.priority.cycle();
                }
                _ => {
                    let editor = match task_form.current_field {
                        TaskField::Title => Some(&mut task_form.title),
                        TaskField::DueDate => Some(&mut task_form.due_date),
                        TaskField::Priority => None,
                    };
                    if let Some(editor) = editor {
                        handle_editor_key(editor, &key, false);
                    }
                }
            }
        }
        ItemForm::Note(note_form) => match key.code {
            KeyCode::Tab => {
                note_form.current_field = match note_form.current_field {
                    NoteField::Title => NoteField::Content,
                    NoteField::Content => NoteField::Title,
                };
            }
            KeyCode::Enter if note_form.current_field == NoteField::Title => {
                note_form.current_field = NoteField::Content;
            }
            _ => {
                let (editor, multiline) = match note_form.current_field {
                    NoteField::Title => (&mut note_form.title, false),
                    NoteField::Content => (&mut note_form.content, true),
                };
                handle_editor_key(editor, &key, multiline);
            }
        },
    }
    Ok(false)
}

fn handle_confirm_delete_key(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.modals.delete_modal_selection = app.modals.delete_modal_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.modals.delete_modal_selection = (app.modals.delete_modal_selection + 1).min(1);
        }
        KeyCode::Enter => app.confirm_delete_choice()?,
        KeyCode::Char('y') => {
            app.modals.delete_modal_selection = 0;
            app.confirm_delete_choice()?;
        }
        KeyCode::Esc | KeyCode::Char('n') => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

fn handle_assist_key(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    match key.code {
        KeyCode::Esc => app.exit_assist_mode(),
        KeyCode::Enter => app.submit_assist(),
        _ => {
            handle_editor_key(&mut app.assist.input, &key, false);
        }
    }
    Ok(false)
}

fn handle_music_search_key(app: &mut App, key: KeyEvent) -> Result<bool, TuiError> {
    match key.code {
        KeyCode::Esc => app.exit_music_search_mode(),
        KeyCode::Enter => app.submit_music_search(),
        _ => {
            handle_editor_key(&mut app.music.query, &key, false);
        }
    }
    Ok(false)
}
