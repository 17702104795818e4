//! Application state core: the single source of truth for the task and
//! note collections and the active view selectors. Every mutation goes
//! through here, and every successful collection mutation triggers one
//! full write of that collection to the store.

use log::debug;
use thiserror::Error;

use crate::models::{Note, Priority, Task, User};
use crate::store::{Store, StoreError};
use crate::suggest::TaskSuggestion;
use crate::utils::{now_millis, today_string};
use crate::views::{self, CompletionStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Focus,
    Sounds,
    Notes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Active => "ACTIVE",
            StatusFilter::Completed => "COMPLETED",
        }
    }

    pub fn cycle(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("no user is signed in")]
    NoIdentity,
    #[error("no item with id {0}")]
    UnknownId(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct AppState {
    store: Store,
    user: Option<User>,
    tasks: Vec<Task>,
    notes: Vec<Note>,
    filter: StatusFilter,
    selected_date: String,
    active_tab: Tab,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            user: None,
            tasks: Vec::new(),
            notes: Vec::new(),
            filter: StatusFilter::All,
            selected_date: today_string(),
            active_tab: Tab::Tasks,
        }
    }

    // --- accessors ---

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn selected_date(&self) -> &str {
        &self.selected_date
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn stats(&self) -> CompletionStats {
        views::completion_stats(&self.tasks)
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        views::filter_tasks(&self.tasks, &self.selected_date, self.filter)
    }

    // --- identity ---

    /// Restore the session-mirrored identity from the store, if present.
    /// Returns whether a user was restored.
    pub fn restore_session(&mut self) -> Result<bool, StateError> {
        match self.store.session_user()? {
            Some(user) => {
                self.set_identity(Some(user))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// none -> user loads both collections for that user (empty if absent)
    /// and mirrors the identity into the session key; -> none clears both
    /// collections in memory and the mirror. Persisted collections are
    /// never deleted here.
    pub fn set_identity(&mut self, user: Option<User>) -> Result<(), StateError> {
        match user {
            Some(user) => {
                self.tasks = self.store.read_tasks(&user.uid)?;
                self.notes = self.store.read_notes(&user.uid)?;
                self.store.set_session_user(&user)?;
                debug!(
                    "identity set: {} ({} tasks, {} notes)",
                    user.uid,
                    self.tasks.len(),
                    self.notes.len()
                );
                self.user = Some(user);
            }
            None => {
                self.tasks.clear();
                self.notes.clear();
                self.store.clear_session_user()?;
                debug!("identity cleared");
                self.user = None;
            }
        }
        Ok(())
    }

    fn require_uid(&self) -> Result<String, StateError> {
        self.user
            .as_ref()
            .map(|u| u.uid.clone())
            .ok_or(StateError::NoIdentity)
    }

    fn persist_tasks(&self) -> Result<(), StateError> {
        let uid = self.require_uid()?;
        self.store.write_tasks(&uid, &self.tasks)?;
        Ok(())
    }

    fn persist_notes(&self) -> Result<(), StateError> {
        let uid = self.require_uid()?;
        self.store.write_notes(&uid, &self.notes)?;
        Ok(())
    }

    // --- tasks ---

    /// Prepend a new task due on `due_date` and persist the collection
    pub fn create_task(
        &mut self,
        title: &str,
        priority: Priority,
        due_date: &str,
    ) -> Result<&Task, StateError> {
        let uid = self.require_uid()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(StateError::EmptyTitle);
        }

        let task = Task::new(uid, title.to_string(), priority, due_date.to_string());
        debug!("create task {}", task.id);
        self.tasks.insert(0, task);
        self.persist_tasks()?;
        Ok(&self.tasks[0])
    }

    /// Replace the task with a matching id in place. Every other task keeps
    /// its position; the collection is not re-sorted.
    pub fn update_task(&mut self, updated: Task) -> Result<(), StateError> {
        if updated.title.trim().is_empty() {
            return Err(StateError::EmptyTitle);
        }
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == updated.id)
            .ok_or_else(|| StateError::UnknownId(updated.id.clone()))?;
        *slot = updated;
        self.persist_tasks()
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<bool, StateError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StateError::UnknownId(id.to_string()))?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.persist_tasks()?;
        Ok(completed)
    }

    /// Remove the task with the given id. Deleting a non-existent id is a
    /// no-op; the caller is responsible for having confirmed the action.
    pub fn delete_task(&mut self, id: &str) -> Result<bool, StateError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        debug!("delete task {}", id);
        self.persist_tasks()?;
        Ok(true)
    }

    /// Import provider suggestions as tasks due on the currently selected
    /// date, preserving provider order at the head of the collection. The
    /// whole batch is one state transition: one persistence write.
    pub fn import_suggestions(
        &mut self,
        suggestions: Vec<TaskSuggestion>,
    ) -> Result<usize, StateError> {
        let uid = self.require_uid()?;
        if suggestions.is_empty() {
            return Ok(0);
        }

        let count = suggestions.len();
        for suggestion in suggestions.into_iter().rev() {
            let task = Task::new(
                uid.clone(),
                suggestion.title,
                suggestion.priority,
                self.selected_date.clone(),
            );
            self.tasks.insert(0, task);
        }
        debug!("imported {} suggested tasks", count);
        self.persist_tasks()?;
        Ok(count)
    }

    // --- notes ---

    pub fn create_note(&mut self, title: &str, content: &str) -> Result<&Note, StateError> {
        let uid = self.require_uid()?;
        if title.trim().is_empty() {
            return Err(StateError::EmptyTitle);
        }

        let note = Note::new(uid, title.to_string(), content.to_string());
        debug!("create note {}", note.id);
        self.notes.insert(0, note);
        self.persist_notes()?;
        Ok(&self.notes[0])
    }

    /// Replace the note with a matching id, stamping a fresh updated-at
    pub fn update_note(&mut self, mut updated: Note) -> Result<(), StateError> {
        if updated.title.trim().is_empty() {
            return Err(StateError::EmptyTitle);
        }
        updated.updated_at = now_millis();
        let slot = self
            .notes
            .iter_mut()
            .find(|n| n.id == updated.id)
            .ok_or_else(|| StateError::UnknownId(updated.id.clone()))?;
        *slot = updated;
        self.persist_notes()
    }

    pub fn delete_note(&mut self, id: &str) -> Result<bool, StateError> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return Ok(false);
        }
        debug!("delete note {}", id);
        self.persist_notes()?;
        Ok(true)
    }

    // --- view selectors (not persisted) ---

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
    }

    pub fn select_date(&mut self, date: String) {
        self.selected_date = date;
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use pretty_assertions::assert_eq;

    fn demo_user() -> User {
        User {
            uid: "user-demo".into(),
            email: Some("demo@example.com".into()),
            display_name: Some("demo".into()),
            photo_url: None,
        }
    }

    fn signed_in_state() -> AppState {
        let mut state = AppState::new(Store::open_in_memory().unwrap());
        state.set_identity(Some(demo_user())).unwrap();
        state
    }

    #[test]
    fn mutations_require_an_identity() {
        let mut state = AppState::new(Store::open_in_memory().unwrap());
        let err = state
            .create_task("Buy milk", Priority::Low, "2024-05-01")
            .unwrap_err();
        assert!(matches!(err, StateError::NoIdentity));
        assert!(state.tasks().is_empty());
    }

    #[test]
    fn blank_title_never_changes_collection_size() {
        let mut state = signed_in_state();
        for title in ["", "   ", "\t\n"] {
            let err = state
                .create_task(title, Priority::Medium, "2024-05-01")
                .unwrap_err();
            assert!(matches!(err, StateError::EmptyTitle));
            assert_eq!(state.tasks().len(), 0);

            let err = state.create_note(title, "body").unwrap_err();
            assert!(matches!(err, StateError::EmptyTitle));
            assert_eq!(state.notes().len(), 0);
        }
    }

    #[test]
    fn creates_prepend_newest_first() {
        let mut state = signed_in_state();
        state.create_task("first", Priority::Low, "2024-05-01").unwrap();
        state.create_task("second", Priority::Low, "2024-05-01").unwrap();
        let titles: Vec<&str> = state.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[test]
    fn create_scenario_shows_up_in_the_filtered_view() {
        let mut state = signed_in_state();
        state.select_date("2024-05-01".into());
        state.create_task("Buy milk", Priority::Low, "2024-05-01").unwrap();

        let filtered = state.filtered_tasks();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Buy milk");
        assert!(!filtered[0].completed);
    }

    #[test]
    fn update_preserves_position_in_the_collection() {
        let mut state = signed_in_state();
        for title in ["a", "b", "c"] {
            state.create_task(title, Priority::Low, "2024-05-01").unwrap();
        }
        // Order is newest-first: c, b, a
        let mut middle = state.tasks()[1].clone();
        middle.title = "b (renamed)".into();
        middle.priority = Priority::High;
        state.update_task(middle).unwrap();

        let titles: Vec<&str> = state.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b (renamed)", "a"]);
    }

    #[test]
    fn update_with_blank_title_is_rejected() {
        let mut state = signed_in_state();
        state.create_task("keep me", Priority::Low, "2024-05-01").unwrap();
        let mut task = state.tasks()[0].clone();
        task.title = "  ".into();
        assert!(matches!(state.update_task(task), Err(StateError::EmptyTitle)));
        assert_eq!(state.tasks()[0].title, "keep me");
    }

    #[test]
    fn update_unknown_id_reports_the_stale_reference() {
        let mut state = signed_in_state();
        let ghost = Task::new("user-demo".into(), "ghost".into(), Priority::Low, "2024-05-01".into());
        assert!(matches!(
            state.update_task(ghost),
            Err(StateError::UnknownId(_))
        ));
    }

    #[test]
    fn delete_removes_exactly_that_id() {
        let mut state = signed_in_state();
        for title in ["a", "b", "c"] {
            state.create_task(title, Priority::Low, "2024-05-01").unwrap();
        }
        let victim = state.tasks()[1].id.clone();
        assert!(state.delete_task(&victim).unwrap());
        assert_eq!(state.tasks().len(), 2);
        assert!(state.tasks().iter().all(|t| t.id != victim));

        // Deleting a non-existent id is a no-op
        assert!(!state.delete_task("no-such-id").unwrap());
        assert_eq!(state.tasks().len(), 2);
    }

    #[test]
    fn toggle_flips_completion_and_persists() {
        let mut state = signed_in_state();
        state.create_task("a", Priority::Low, "2024-05-01").unwrap();
        let id = state.tasks()[0].id.clone();

        assert!(state.toggle_task(&id).unwrap());
        assert!(state.tasks()[0].completed);
        assert!(!state.toggle_task(&id).unwrap());
        assert!(!state.tasks()[0].completed);

        assert!(matches!(
            state.toggle_task("no-such-id"),
            Err(StateError::UnknownId(_))
        ));
    }

    #[test]
    fn every_mutation_is_written_through_to_the_store() {
        let mut state = signed_in_state();
        state.create_task("a", Priority::Low, "2024-05-01").unwrap();
        state.create_note("n", "body").unwrap();

        // A second core over the same store sees the data after sign-in
        // (set_identity(None) keeps persisted data intact).
        state.set_identity(None).unwrap();
        assert!(state.tasks().is_empty());
        assert!(state.notes().is_empty());

        state.set_identity(Some(demo_user())).unwrap();
        assert_eq!(state.tasks().len(), 1);
        assert_eq!(state.notes().len(), 1);
        assert_eq!(state.tasks()[0].title, "a");
    }

    #[test]
    fn import_stamps_the_selected_date_and_keeps_provider_order() {
        let mut state = signed_in_state();
        state.select_date("2024-07-04".into());
        state.create_task("existing", Priority::Low, "2024-07-01").unwrap();

        let count = state
            .import_suggestions(vec![
                TaskSuggestion {
                    title: "Stretch".into(),
                    priority: Priority::Medium,
                },
                TaskSuggestion {
                    title: "Plan the week".into(),
                    priority: Priority::High,
                },
            ])
            .unwrap();
        assert_eq!(count, 2);

        let titles: Vec<&str> = state.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Stretch", "Plan the week", "existing"]);
        assert_eq!(state.tasks()[0].due_date, "2024-07-04");
        assert_eq!(state.tasks()[1].due_date, "2024-07-04");
        assert_eq!(state.tasks()[0].priority, Priority::Medium);
    }

    #[test]
    fn importing_an_empty_list_is_a_no_op() {
        let mut state = signed_in_state();
        assert_eq!(state.import_suggestions(Vec::new()).unwrap(), 0);
        assert!(state.tasks().is_empty());
    }

    #[test]
    fn single_suggestion_scenario() {
        let mut state = signed_in_state();
        state.select_date("2024-05-06".into());
        state
            .import_suggestions(vec![TaskSuggestion {
                title: "Stretch".into(),
                priority: Priority::Medium,
            }])
            .unwrap();
        assert_eq!(state.tasks().len(), 1);
        let task = &state.tasks()[0];
        assert_eq!(task.title, "Stretch");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, "2024-05-06");
    }

    #[test]
    fn note_update_refreshes_updated_at_only_on_mutation() {
        let mut state = signed_in_state();
        state.create_note("Ideas", "v1").unwrap();
        let note = state.notes()[0].clone();
        let created = note.created_at;

        // Reads never touch the stamp
        let _ = state.notes()[0].updated_at;

        let mut changed = note.clone();
        changed.content = "v2".into();
        state.update_note(changed).unwrap();

        let after = &state.notes()[0];
        assert_eq!(after.created_at, created);
        assert!(after.updated_at >= note.updated_at);
        assert_eq!(after.content, "v2");
        // Color never changes after creation
        assert_eq!(after.color, note.color);
    }

    #[test]
    fn session_restore_round_trip() {
        let mut state = AppState::new(Store::open_in_memory().unwrap());
        assert!(!state.restore_session().unwrap());

        state.set_identity(Some(demo_user())).unwrap();
        state.create_task("a", Priority::Low, "2024-05-01").unwrap();

        // Simulate a reload within the same session: identity comes back
        // from the mirror, collections from the store.
        state.user = None;
        state.tasks.clear();
        assert!(state.restore_session().unwrap());
        assert_eq!(state.user().unwrap().uid, "user-demo");
        assert_eq!(state.tasks().len(), 1);

        // Logout clears the mirror; nothing to restore afterwards
        state.set_identity(None).unwrap();
        assert!(!state.restore_session().unwrap());
    }

    #[test]
    fn filter_and_date_selectors_shape_the_derived_view() {
        let mut state = signed_in_state();
        state.select_date("2024-05-01".into());
        state.create_task("a", Priority::Low, "2024-05-01").unwrap();
        state.create_task("b", Priority::Low, "2024-05-01").unwrap();
        let id = state.tasks()[0].id.clone();
        state.toggle_task(&id).unwrap();

        state.set_filter(StatusFilter::Active);
        assert_eq!(state.filtered_tasks().len(), 1);
        state.set_filter(StatusFilter::Completed);
        assert_eq!(state.filtered_tasks().len(), 1);
        state.set_filter(StatusFilter::All);
        assert_eq!(state.filtered_tasks().len(), 2);

        state.select_date("2024-05-02".into());
        assert!(state.filtered_tasks().is_empty());
    }
}
