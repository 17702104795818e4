use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::now_millis;

/// Task urgency level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Next level in form-cycling order: low -> medium -> high -> low
    pub fn cycle(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: i64,  // epoch milliseconds
    pub due_date: String, // YYYY-MM-DD, compared by string equality
}

impl Task {
    pub fn new(user_id: String, title: String, priority: Priority, due_date: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            description: None,
            completed: false,
            priority,
            created_at: now_millis(),
            due_date,
        }
    }
}

/// Fixed palette for note cards; a note keeps the color it was born with.
pub const NOTE_COLORS: &[&str] = &["amber", "blue", "emerald", "rose", "indigo"];

pub fn random_note_color() -> &'static str {
    let idx = rand::thread_rng().gen_range(0..NOTE_COLORS.len());
    NOTE_COLORS[idx]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String, // may be empty, rendered as "Untitled"
    pub content: String,
    pub color: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    pub fn new(user_id: String, title: String, content: String) -> Self {
        let now = now_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            content,
            color: random_note_color().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { "Untitled" } else { &self.title }
    }
}

/// Session-scoped identity; mirrored to the session key, never stored in a
/// durable collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl User {
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Friend")
    }
}

/// A named ambient audio track. Playback is handed to the host platform;
/// the app only tracks which one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Soundscape {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn priority_parses_known_values_case_insensitively() {
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!(" Medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
    }

    #[test]
    fn priority_rejects_unknown_values() {
        assert!("urgent".parse::<Priority>().is_err());
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_cycle_visits_all_levels() {
        let mut p = Priority::Low;
        p = p.cycle();
        assert_eq!(p, Priority::Medium);
        p = p.cycle();
        assert_eq!(p, Priority::High);
        p = p.cycle();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn new_task_defaults() {
        let task = Task::new(
            "user-demo".into(),
            "Buy milk".into(),
            Priority::Low,
            "2024-05-01".into(),
        );
        assert!(!task.completed);
        assert!(task.description.is_none());
        assert_eq!(task.due_date, "2024-05-01");
        assert!(!task.id.is_empty());
    }

    #[test]
    fn new_note_color_comes_from_palette() {
        let note = Note::new("user-demo".into(), "Ideas".into(), String::new());
        assert!(NOTE_COLORS.contains(&note.color.as_str()));
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn empty_note_title_displays_untitled() {
        let note = Note::new("user-demo".into(), String::new(), "body".into());
        assert_eq!(note.display_title(), "Untitled");
    }

    #[test]
    fn task_serializes_with_camel_case_field_names() {
        let task = Task::new(
            "user-demo".into(),
            "Water plants".into(),
            Priority::High,
            "2024-06-10".into(),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json.get("priority").unwrap(), "high");
    }
}
