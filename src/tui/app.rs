use std::io::Write;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Datelike;
use log::warn;
use ratatui::widgets::ListState;

use crate::Config;
use crate::auth::{self, Credentials};
use crate::models::{Note, Priority, Task};
use crate::sounds::{SOUNDSCAPES, SoundBoard};
use crate::state::{AppState, StateError, Tab};
use crate::suggest::{
    GeminiProvider, MusicDiscovery, ProviderError, SuggestionProvider, TaskSuggestion,
};
use crate::timer::{FocusTimer, TimerSignal};
use crate::tui::error::TuiError;
use crate::tui::widgets::editor::Editor;
use crate::utils::{parse_date, today_string};

/// How long a status message stays on screen
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Login screen; active whenever no identity is set
    Auth,
    View,
    Create,
    ConfirmDelete,
    Assist,
    MusicSearch,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Priority,
    DueDate,
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: TaskField,
    pub title: Editor,
    pub due_date: Editor,
    pub priority: Priority,
    pub editing_id: Option<String>, // None for new items
}

impl TaskForm {
    pub fn new(due_date: &str) -> Self {
        Self {
            current_field: TaskField::Title,
            title: Editor::new(),
            due_date: Editor::from_text(due_date),
            priority: Priority::default(),
            editing_id: None,
        }
    }

    pub fn editing(task: &Task) -> Self {
        Self {
            current_field: TaskField::Title,
            title: Editor::from_text(&task.title),
            due_date: Editor::from_text(&task.due_date),
            priority: task.priority,
            editing_id: Some(task.id.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
}

#[derive(Debug, Clone)]
pub struct NoteForm {
    pub current_field: NoteField,
    pub title: Editor,
    pub content: Editor,
    pub editing_id: Option<String>,
}

impl NoteForm {
    pub fn new() -> Self {
        Self {
            current_field: NoteField::Title,
            title: Editor::new(),
            content: Editor::new(),
            editing_id: None,
        }
    }

    pub fn editing(note: &Note) -> Self {
        Self {
            current_field: NoteField::Title,
            title: Editor::from_text(&note.title),
            content: Editor::from_text(&note.content),
            editing_id: Some(note.id.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ItemForm {
    Task(TaskForm),
    Note(NoteForm),
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub create_form: Option<ItemForm>,
}

#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Task(Task),
    Note(Note),
}

impl DeleteTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Task(_) => "Task",
            DeleteTarget::Note(_) => "Note",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DeleteTarget::Task(task) => &task.title,
            DeleteTarget::Note(note) => note.display_title(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<DeleteTarget>,
    pub delete_modal_selection: usize, // 0 = Delete, 1 = Cancel
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub show_calendar: bool,
    pub cal_year: i32,
    pub cal_month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub current_field: AuthField,
    pub email: Editor,
    pub password: Editor,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            current_field: AuthField::Email,
            email: Editor::new(),
            password: Editor::new(),
        }
    }
}

/// In-flight state of the AI task-suggestion box. While a request is
/// pending the trigger stays disabled; there is no cancellation, a late
/// result is discarded if it no longer applies.
pub struct AssistState {
    pub input: Editor,
    pub pending: Option<Receiver<Result<Vec<TaskSuggestion>, ProviderError>>>,
}

impl Default for AssistState {
    fn default() -> Self {
        Self {
            input: Editor::new(),
            pending: None,
        }
    }
}

pub struct MusicState {
    pub query: Editor,
    pub result: Option<MusicDiscovery>,
    pub pending: Option<Receiver<Result<MusicDiscovery, ProviderError>>>,
}

impl Default for MusicState {
    fn default() -> Self {
        Self {
            query: Editor::new(),
            result: None,
            pending: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimerPreset {
    pub label: &'static str,
    pub secs: u64,
}

pub struct App {
    pub config: Config,
    pub core: AppState,

    pub ui: UiState,
    pub modals: ModalState,
    pub status: StatusState,
    pub form: FormState,
    pub auth: AuthForm,
    pub assist: AssistState,
    pub music: MusicState,

    pub timer: FocusTimer,
    pub presets: Vec<TimerPreset>,
    pub sounds: SoundBoard,
}

impl App {
    pub fn new(config: Config, core: AppState) -> Self {
        let presets = vec![
            TimerPreset {
                label: "Focus",
                secs: config.timer.focus_minutes * 60,
            },
            TimerPreset {
                label: "Short Break",
                secs: config.timer.short_break_minutes * 60,
            },
            TimerPreset {
                label: "Long Break",
                secs: config.timer.long_break_minutes * 60,
            },
        ];
        let timer = FocusTimer::new(presets[0].secs);

        let mode = if core.user().is_some() {
            Mode::View
        } else {
            Mode::Auth
        };

        let (cal_year, cal_month) = match parse_date(core.selected_date()) {
            Ok(date) => (date.year(), date.month()),
            Err(_) => {
                let today = chrono::Local::now().date_naive();
                (today.year(), today.month())
            }
        };

        Self {
            config,
            core,
            ui: UiState {
                mode,
                selected_index: 0,
                list_state: ListState::default(),
                show_calendar: false,
                cal_year,
                cal_month,
            },
            modals: ModalState::default(),
            status: StatusState::default(),
            form: FormState::default(),
            auth: AuthForm::default(),
            assist: AssistState::default(),
            music: MusicState::default(),
            timer,
            presets,
            sounds: SoundBoard::new(),
        }
    }

    // --- selection and lists ---

    /// Tasks visible under the current date and status filter, cloned for
    /// rendering
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.core.filtered_tasks().into_iter().cloned().collect()
    }

    fn current_list_len(&self) -> usize {
        match self.core.active_tab() {
            Tab::Tasks => self.core.filtered_tasks().len(),
            Tab::Notes => self.core.notes().len(),
            Tab::Sounds => SOUNDSCAPES.len(),
            Tab::Focus => 0,
        }
    }

    pub fn sync_list_state(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            if self.ui.selected_index >= len {
                self.ui.selected_index = len - 1;
            }
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) {
        self.ui.selected_index = self.ui.selected_index.saturating_sub(1);
        self.sync_list_state();
    }

    pub fn move_selection_down(&mut self) {
        let len = self.current_list_len();
        if len > 0 && self.ui.selected_index + 1 < len {
            self.ui.selected_index += 1;
        }
        self.sync_list_state();
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.core
            .filtered_tasks()
            .get(self.ui.selected_index)
            .map(|t| (*t).clone())
    }

    pub fn selected_note(&self) -> Option<Note> {
        self.core.notes().get(self.ui.selected_index).cloned()
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.core.active_tab() != tab {
            self.core.set_tab(tab);
            self.ui.selected_index = 0;
            self.sync_list_state();
        }
    }

    pub fn next_tab(&mut self) {
        let next = match self.core.active_tab() {
            Tab::Tasks => Tab::Focus,
            Tab::Focus => Tab::Sounds,
            Tab::Sounds => Tab::Notes,
            Tab::Notes => Tab::Tasks,
        };
        self.switch_tab(next);
    }

    pub fn prev_tab(&mut self) {
        let prev = match self.core.active_tab() {
            Tab::Tasks => Tab::Notes,
            Tab::Focus => Tab::Tasks,
            Tab::Sounds => Tab::Focus,
            Tab::Notes => Tab::Sounds,
        };
        self.switch_tab(prev);
    }

    // --- status bar ---

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.status.message = None;
                self.status.message_time = None;
            }
        }
    }

    // --- forms ---

    pub fn enter_create_mode(&mut self) {
        let form = match self.core.active_tab() {
            Tab::Tasks => ItemForm::Task(TaskForm::new(self.core.selected_date())),
            Tab::Notes => ItemForm::Note(NoteForm::new()),
            _ => return,
        };
        self.form.create_form = Some(form);
        self.ui.mode = Mode::Create;
    }

    pub fn enter_edit_mode(&mut self) {
        let form = match self.core.active_tab() {
            Tab::Tasks => match self.selected_task() {
                Some(task) => ItemForm::Task(TaskForm::editing(&task)),
                None => return,
            },
            Tab::Notes => match self.selected_note() {
                Some(note) => ItemForm::Note(NoteForm::editing(&note)),
                None => return,
            },
            _ => return,
        };
        self.form.create_form = Some(form);
        self.ui.mode = Mode::Create;
    }

    pub fn exit_create_mode(&mut self) {
        self.form.create_form = None;
        self.ui.mode = Mode::View;
    }

    /// Persist the open form. Validation failures keep the form open with a
    /// status hint; store failures propagate.
    pub fn save_create_form(&mut self) -> Result<(), TuiError> {
        let Some(form) = self.form.create_form.clone() else {
            return Ok(());
        };

        let result = match form {
            ItemForm::Task(task_form) => self.save_task_form(task_form),
            ItemForm::Note(note_form) => self.save_note_form(note_form),
        };

        match result {
            Ok(saved) => {
                self.exit_create_mode();
                self.sync_list_state();
                self.set_status_message(saved.to_string());
                Ok(())
            }
            Err(StateError::EmptyTitle) => {
                self.set_status_message("Title cannot be empty".to_string());
                Ok(())
            }
            Err(StateError::UnknownId(_)) => {
                // The item disappeared under the form (e.g. deleted from the
                // CLI); drop the stale form.
                self.exit_create_mode();
                self.sync_list_state();
                self.set_status_message("Item no longer exists".to_string());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save_task_form(&mut self, form: TaskForm) -> Result<&'static str, StateError> {
        let title = form.title.text();
        let due_date = {
            let raw = form.due_date.text();
            let raw = raw.trim();
            // An unparseable due date falls back to the selected day rather
            // than silently creating an unreachable task
            if parse_date(raw).is_ok() {
                raw.to_string()
            } else {
                self.core.selected_date().to_string()
            }
        };

        match form.editing_id {
            Some(id) => {
                let mut task = self
                    .core
                    .tasks()
                    .iter()
                    .find(|t| t.id == id)
                    .cloned()
                    .ok_or(StateError::UnknownId(id))?;
                task.title = title.trim().to_string();
                task.priority = form.priority;
                task.due_date = due_date;
                self.core.update_task(task)?;
                Ok("Task updated")
            }
            None => {
                self.core.create_task(&title, form.priority, &due_date)?;
                Ok("Task created")
            }
        }
    }

    fn save_note_form(&mut self, form: NoteForm) -> Result<&'static str, StateError> {
        let title = form.title.text();
        let content = form.content.text();

        match form.editing_id {
            Some(id) => {
                let mut note = self
                    .core
                    .notes()
                    .iter()
                    .find(|n| n.id == id)
                    .cloned()
                    .ok_or(StateError::UnknownId(id))?;
                note.title = title.trim().to_string();
                note.content = content;
                self.core.update_note(note)?;
                Ok("Note updated")
            }
            None => {
                self.core.create_note(&title, &content)?;
                Ok("Note created")
            }
        }
    }

    // --- deletion (explicit confirmation is the precondition) ---

    pub fn request_delete_selected(&mut self) {
        let target = match self.core.active_tab() {
            Tab::Tasks => self.selected_task().map(DeleteTarget::Task),
            Tab::Notes => self.selected_note().map(DeleteTarget::Note),
            _ => None,
        };
        if let Some(target) = target {
            self.modals.delete_confirmation = Some(target);
            self.modals.delete_modal_selection = 0;
            self.ui.mode = Mode::ConfirmDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
        self.ui.mode = Mode::View;
    }

    /// Execute the confirmed choice. Only the "Delete" option removes the
    /// item; deletion is immediate and irreversible.
    pub fn confirm_delete_choice(&mut self) -> Result<(), TuiError> {
        let Some(target) = self.modals.delete_confirmation.take() else {
            self.ui.mode = Mode::View;
            return Ok(());
        };

        if self.modals.delete_modal_selection == 0 {
            let message = match &target {
                DeleteTarget::Task(task) => {
                    self.core.delete_task(&task.id)?;
                    "Task deleted"
                }
                DeleteTarget::Note(note) => {
                    self.core.delete_note(&note.id)?;
                    "Note deleted"
                }
            };
            self.set_status_message(message.to_string());
        }

        self.ui.mode = Mode::View;
        self.sync_list_state();
        Ok(())
    }

    // --- tasks tab actions ---

    pub fn toggle_selected_task(&mut self) -> Result<(), TuiError> {
        if let Some(task) = self.selected_task() {
            self.core.toggle_task(&task.id)?;
            self.sync_list_state();
        }
        Ok(())
    }

    /// Jump to the focus tab with the selected task pinned on the timer
    pub fn focus_selected_task(&mut self) {
        if let Some(task) = self.selected_task() {
            self.timer.focus_label = Some(task.title);
            self.switch_tab(Tab::Focus);
        }
    }

    // --- calendar ---

    pub fn toggle_calendar(&mut self) {
        self.ui.show_calendar = !self.ui.show_calendar;
        if self.ui.show_calendar {
            self.align_calendar_to_selected_date();
        }
    }

    fn align_calendar_to_selected_date(&mut self) {
        if let Ok(date) = parse_date(self.core.selected_date()) {
            self.ui.cal_year = date.year();
            self.ui.cal_month = date.month();
        }
    }

    pub fn calendar_prev_month(&mut self) {
        let (y, m) = crate::views::prev_month(self.ui.cal_year, self.ui.cal_month);
        self.ui.cal_year = y;
        self.ui.cal_month = m;
    }

    pub fn calendar_next_month(&mut self) {
        let (y, m) = crate::views::next_month(self.ui.cal_year, self.ui.cal_month);
        self.ui.cal_year = y;
        self.ui.cal_month = m;
    }

    /// Move the selected date by whole days and keep the calendar view on
    /// the same month
    pub fn select_date_offset(&mut self, days: i64) {
        let base = parse_date(self.core.selected_date())
            .unwrap_or_else(|_| chrono::Local::now().date_naive());
        if let Some(date) = base.checked_add_signed(chrono::Duration::days(days)) {
            self.core.select_date(date.format("%Y-%m-%d").to_string());
            self.ui.cal_year = date.year();
            self.ui.cal_month = date.month();
            self.sync_list_state();
        }
    }

    pub fn select_today(&mut self) {
        self.core.select_date(today_string());
        self.align_calendar_to_selected_date();
        self.sync_list_state();
    }

    // --- AI task suggestions ---

    pub fn enter_assist_mode(&mut self) {
        if self.core.active_tab() == Tab::Tasks {
            self.ui.mode = Mode::Assist;
        }
    }

    pub fn exit_assist_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn assist_pending(&self) -> bool {
        self.assist.pending.is_some()
    }

    /// Kick off a suggestion request on a worker thread. The trigger is
    /// disabled while one is in flight, so at most one request runs per
    /// control.
    pub fn submit_assist(&mut self) {
        if self.assist.pending.is_some() {
            return;
        }
        let context = self.assist.input.text().trim().to_string();
        if context.is_empty() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result =
                GeminiProvider::from_env().and_then(|provider| provider.suggest_tasks(&context));
            let _ = tx.send(result);
        });
        self.assist.pending = Some(rx);
    }

    // --- music discovery ---

    pub fn enter_music_search_mode(&mut self) {
        if self.core.active_tab() == Tab::Sounds {
            self.ui.mode = Mode::MusicSearch;
        }
    }

    pub fn exit_music_search_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn music_pending(&self) -> bool {
        self.music.pending.is_some()
    }

    pub fn submit_music_search(&mut self) {
        if self.music.pending.is_some() {
            return;
        }
        let query = self.music.query.text().trim().to_string();
        if query.is_empty() {
            return;
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result =
                GeminiProvider::from_env().and_then(|provider| provider.find_music(&query));
            let _ = tx.send(result);
        });
        self.music.pending = Some(rx);
    }

    /// Drain any provider results that arrived since the last frame. A
    /// result for a view that is no longer current is discarded.
    pub fn poll_providers(&mut self) {
        if let Some(rx) = &self.assist.pending {
            match rx.try_recv() {
                Ok(Ok(suggestions)) => {
                    self.assist.pending = None;
                    if suggestions.is_empty() {
                        self.set_status_message("No suggestions right now.".to_string());
                    } else {
                        match self.core.import_suggestions(suggestions) {
                            Ok(count) => {
                                self.assist.input.clear();
                                if self.ui.mode == Mode::Assist {
                                    self.ui.mode = Mode::View;
                                }
                                self.sync_list_state();
                                self.set_status_message(format!(
                                    "Added {} suggested task{}",
                                    count,
                                    if count == 1 { "" } else { "s" }
                                ));
                            }
                            Err(StateError::NoIdentity) => {
                                warn!("discarding suggestions that arrived after logout");
                            }
                            Err(err) => {
                                warn!("failed to import suggestions: {}", err);
                                self.set_status_message("Could not save suggestions".to_string());
                            }
                        }
                    }
                }
                Ok(Err(err)) => {
                    self.assist.pending = None;
                    warn!("task suggestion failed: {}", err);
                    self.set_status_message("AI failed to suggest tasks.".to_string());
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.assist.pending = None;
                    self.set_status_message("AI failed to suggest tasks.".to_string());
                }
            }
        }

        if let Some(rx) = &self.music.pending {
            match rx.try_recv() {
                Ok(result) => {
                    self.music.pending = None;
                    let discovery = match result {
                        Ok(discovery) => discovery,
                        Err(err) => {
                            warn!("music discovery failed: {}", err);
                            MusicDiscovery::unavailable()
                        }
                    };
                    if self.core.active_tab() == Tab::Sounds {
                        self.music.result = Some(discovery);
                    } else {
                        warn!("discarding music result for an inactive view");
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.music.pending = None;
                    self.music.result = Some(MusicDiscovery::unavailable());
                }
            }
        }
    }

    // --- sounds tab actions ---

    pub fn toggle_selected_sound(&mut self) {
        if let Some(sound) = SOUNDSCAPES.get(self.ui.selected_index) {
            if self.sounds.toggle(sound.id) {
                self.set_status_message(format!("Playing {}", sound.name));
            } else {
                self.set_status_message(format!("Stopped {}", sound.name));
            }
        }
    }

    /// Hand the selected soundscape's stream to the system player
    pub fn open_selected_sound(&mut self) {
        if let Some(sound) = SOUNDSCAPES.get(self.ui.selected_index) {
            match open::that(sound.url) {
                Ok(()) => self.set_status_message(format!("Opened {} stream", sound.name)),
                Err(err) => {
                    warn!("failed to open {}: {}", sound.url, err);
                    self.set_status_message("Could not open the stream".to_string());
                }
            }
        }
    }

    // --- timer ---

    pub fn poll_timer(&mut self, now: Instant) {
        if let Some(TimerSignal::Completed) = self.timer.poll(now) {
            // Best-effort chime: the terminal bell may be muted
            let _ = write!(std::io::stdout(), "\x07");
            self.set_status_message("Focus session complete! Take a break.".to_string());
        }
    }

    pub fn apply_preset(&mut self, index: usize) {
        if let Some(preset) = self.presets.get(index) {
            self.timer.apply_preset(preset.secs);
        }
    }

    /// Step to the next preset (presets always reset the countdown)
    pub fn cycle_preset(&mut self) {
        let current = self
            .presets
            .iter()
            .position(|p| p.secs == self.timer.total_secs())
            .unwrap_or(self.presets.len() - 1);
        let next = (current + 1) % self.presets.len();
        self.apply_preset(next);
    }

    // --- identity ---

    pub fn auth_submit(&mut self) -> Result<(), TuiError> {
        let credentials = Credentials {
            email: self.auth.email.text(),
            password: self.auth.password.text(),
        };
        match auth::authenticate(&credentials) {
            Ok(user) => self.finish_login(user),
            Err(err) => {
                warn!("authentication failed: {}", err);
                self.set_status_message("Sign in failed, try again".to_string());
                Ok(())
            }
        }
    }

    pub fn auth_google(&mut self) -> Result<(), TuiError> {
        match auth::authenticate_google() {
            Ok(user) => self.finish_login(user),
            Err(err) => {
                warn!("google sign-in failed: {}", err);
                self.set_status_message("Sign in failed, try again".to_string());
                Ok(())
            }
        }
    }

    fn finish_login(&mut self, user: crate::models::User) -> Result<(), TuiError> {
        let name = user.greeting_name().to_string();
        self.core.set_identity(Some(user))?;
        self.auth = AuthForm::default();
        self.ui.mode = Mode::View;
        self.sync_list_state();
        self.set_status_message(format!("Hello, {}!", name));
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), TuiError> {
        self.core.set_identity(None)?;
        self.ui.mode = Mode::Auth;
        self.ui.selected_index = 0;
        self.ui.list_state.select(None);
        self.music.result = None;
        Ok(())
    }
}
