use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "daytoday-dev",
            Profile::Prod => "daytoday",
        }
    }
}

/// Get the configuration directory path for the app.
/// If profile is Dev, uses "daytoday-dev" instead of "daytoday".
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "daytoday", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for the app (store file and logs live here).
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "daytoday", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Current local date as a YYYY-MM-DD string
pub fn today_string() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Human-facing form of a YYYY-MM-DD string, e.g. "May 1, 2024".
/// Unparseable input is shown as-is.
pub fn display_date(date_str: &str) -> String {
    match parse_date(date_str) {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => date_str.to_string(),
    }
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

impl ParsedKeyBinding {
    /// Whether a key event matches this binding
    pub fn matches(&self, key: &crossterm::event::KeyEvent) -> bool {
        let ctrl = key
            .modifiers
            .contains(crossterm::event::KeyModifiers::CONTROL);
        self.key_code == key.code && self.requires_ctrl == ctrl
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding.
/// Supports single keys ("q", "n"), special keys ("Enter", "Left", "F1",
/// "Space") and the Ctrl modifier ("Ctrl+l").
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        "F1" => Ok(KeyCode::F(1)),
        "F2" => Ok(KeyCode::F(2)),
        _ => {
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_date_accepts_iso_format() {
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-02-29");
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn display_date_formats_long_form() {
        assert_eq!(display_date("2024-05-01"), "May 1, 2024");
        assert_eq!(display_date("not-a-date"), "not-a-date");
    }

    #[test]
    fn key_binding_parses_plain_and_ctrl_keys() {
        let plain = parse_key_binding("q").unwrap();
        assert!(plain.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!plain.matches(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));

        let ctrl = parse_key_binding("Ctrl+l").unwrap();
        assert!(ctrl.matches(&KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL)));
        assert!(!ctrl.matches(&KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE)));

        assert!(parse_key_binding("NotAKey").is_err());
    }
}
