use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::auth::{self, AuthError, Credentials};
use crate::models::{ParsePriorityError, Priority};
use crate::state::{AppState, StateError};
use crate::suggest::{GeminiProvider, ProviderError, SuggestionProvider};
use crate::utils::{parse_date, today_string};

#[derive(Parser)]
#[command(name = "daytoday")]
#[command(about = "Day To Day - tasks, notes, focus timer and soundscapes in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/store)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Sign in and remember the session
    Login {
        /// Email address (any value is accepted; this is a local stub)
        email: String,
    },
    /// Clear the remembered session
    Logout,
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// Priority (low, medium, high)
        #[arg(long)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        due: Option<String>,
    },
    /// Quickly add a new note
    AddNote {
        /// Note title
        title: String,
        /// Note content
        #[arg(long)]
        content: Option<String>,
    },
    /// Ask the suggestion provider for tasks matching a goal
    Suggest {
        /// Free-text goal or context
        context: String,
        /// Import the suggestions as tasks due today
        #[arg(long)]
        import: bool,
    },
    /// Print completion statistics
    Stats,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("not logged in; run `daytoday login <email>` first")]
    NotLoggedIn,
    #[error("invalid priority '{0}' (expected low, medium or high)")]
    InvalidPriority(String),
    #[error("invalid date format '{0}' (expected YYYY-MM-DD)")]
    DateParseError(String),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

fn require_session(state: &mut AppState) -> Result<(), CliError> {
    if state.restore_session()? {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

/// Handle the login command
pub fn handle_login(email: String, state: &mut AppState) -> Result<(), CliError> {
    let user = auth::authenticate(&Credentials {
        email,
        password: String::new(),
    })?;
    let name = user.greeting_name().to_string();
    state.set_identity(Some(user))?;
    println!("Hello, {}! Session remembered.", name);
    Ok(())
}

/// Handle the logout command
pub fn handle_logout(state: &mut AppState) -> Result<(), CliError> {
    state.set_identity(None)?;
    println!("Logged out.");
    Ok(())
}

/// Handle the add-task command
pub fn handle_add_task(
    title: String,
    priority: Option<String>,
    due: Option<String>,
    state: &mut AppState,
) -> Result<(), CliError> {
    require_session(state)?;

    let priority = match priority {
        Some(p) => p
            .parse::<Priority>()
            .map_err(|ParsePriorityError(raw)| CliError::InvalidPriority(raw))?,
        None => Priority::default(),
    };

    let due_date = match due {
        Some(due_str) => {
            parse_date(&due_str).map_err(|_| CliError::DateParseError(due_str.clone()))?;
            due_str
        }
        None => today_string(),
    };

    let task = state.create_task(&title, priority, &due_date)?;
    println!("Task created (id: {})", task.id);
    Ok(())
}

/// Handle the add-note command
pub fn handle_add_note(
    title: String,
    content: Option<String>,
    state: &mut AppState,
) -> Result<(), CliError> {
    require_session(state)?;

    let note = state.create_note(&title, content.as_deref().unwrap_or(""))?;
    println!("Note created (id: {})", note.id);
    Ok(())
}

/// Handle the suggest command
pub fn handle_suggest(
    context: String,
    import: bool,
    state: &mut AppState,
) -> Result<(), CliError> {
    require_session(state)?;

    let provider = GeminiProvider::from_env()?;
    let suggestions = provider.suggest_tasks(&context)?;

    if suggestions.is_empty() {
        println!("No suggestions right now.");
        return Ok(());
    }

    for suggestion in &suggestions {
        println!("[{}] {}", suggestion.priority, suggestion.title);
    }

    if import {
        let count = state.import_suggestions(suggestions)?;
        println!("Imported {} tasks due {}", count, state.selected_date());
    }

    Ok(())
}

/// Handle the stats command
pub fn handle_stats(state: &mut AppState) -> Result<(), CliError> {
    require_session(state)?;

    let stats = state.stats();
    let today = today_string();
    let due_today = state
        .tasks()
        .iter()
        .filter(|t| t.due_date == today)
        .count();

    println!("Tasks:     {}", stats.total);
    println!("Completed: {}", stats.completed);
    println!("Pending:   {}", stats.pending);
    println!("Progress:  {}%", stats.percentage);
    println!("Due today: {}", due_today);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::store::Store;
    use pretty_assertions::assert_eq;

    fn state_with_session() -> AppState {
        let store = Store::open_in_memory().unwrap();
        store
            .set_session_user(&User {
                uid: "user-demo".into(),
                email: Some("demo@example.com".into()),
                display_name: Some("demo".into()),
                photo_url: None,
            })
            .unwrap();
        AppState::new(store)
    }

    #[test]
    fn quick_commands_refuse_to_run_without_a_session() {
        let mut state = AppState::new(Store::open_in_memory().unwrap());
        let err = handle_add_task("Buy milk".into(), None, None, &mut state).unwrap_err();
        assert!(matches!(err, CliError::NotLoggedIn));
    }

    #[test]
    fn add_task_applies_defaults_and_persists() {
        let mut state = state_with_session();
        handle_add_task("Buy milk".into(), None, None, &mut state).unwrap();

        assert_eq!(state.tasks().len(), 1);
        let task = &state.tasks()[0];
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, today_string());
    }

    #[test]
    fn add_task_validates_priority_and_date() {
        let mut state = state_with_session();
        let err = handle_add_task("x".into(), Some("urgent".into()), None, &mut state).unwrap_err();
        assert!(matches!(err, CliError::InvalidPriority(_)));

        let err = handle_add_task("x".into(), None, Some("05/01/2024".into()), &mut state)
            .unwrap_err();
        assert!(matches!(err, CliError::DateParseError(_)));

        assert!(state.tasks().is_empty());
    }

    #[test]
    fn add_note_defaults_to_empty_content() {
        let mut state = state_with_session();
        handle_add_note("Ideas".into(), None, &mut state).unwrap();
        assert_eq!(state.notes().len(), 1);
        assert_eq!(state.notes()[0].content, "");
    }

    #[test]
    fn logout_clears_the_session() {
        let mut state = state_with_session();
        handle_logout(&mut state).unwrap();
        let err = handle_stats(&mut state).unwrap_err();
        assert!(matches!(err, CliError::NotLoggedIn));
    }
}
