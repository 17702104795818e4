//! Minimal line editor backing every text input in the app. Cursor
//! positions are in characters, not bytes, so multi-byte input stays safe.

#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
        }
    }

    pub fn from_text(content: &str) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(|s| s.to_string()).collect()
        };
        let cursor_line = lines.len() - 1;
        let cursor_col = lines[cursor_line].chars().count();
        Self {
            lines,
            cursor_line,
            cursor_col,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_line = 0;
        self.cursor_col = 0;
    }

    /// (line, column) of the cursor, in characters
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn current_line_chars(&self) -> usize {
        self.lines[self.cursor_line].chars().count()
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = Self::byte_index(&self.lines[self.cursor_line], self.cursor_col);
        self.lines[self.cursor_line].insert(idx, ch);
        self.cursor_col += 1;
    }

    /// Split the current line at the cursor. Only multi-line fields call
    /// this; single-line fields never do.
    pub fn insert_newline(&mut self) {
        let idx = Self::byte_index(&self.lines[self.cursor_line], self.cursor_col);
        let rest = self.lines[self.cursor_line].split_off(idx);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let idx = Self::byte_index(&self.lines[self.cursor_line], self.cursor_col);
            self.lines[self.cursor_line].remove(idx);
        } else if self.cursor_line > 0 {
            // Join with the previous line
            let removed = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_chars();
            self.lines[self.cursor_line].push_str(&removed);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor_col < self.current_line_chars() {
            let idx = Self::byte_index(&self.lines[self.cursor_line], self.cursor_col);
            self.lines[self.cursor_line].remove(idx);
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_chars();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_line_chars() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.cursor_col.min(self.current_line_chars());
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = self.cursor_col.min(self.current_line_chars());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.current_line_chars();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typing_builds_a_line() {
        let mut editor = Editor::new();
        for ch in "hello".chars() {
            editor.insert_char(ch);
        }
        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.cursor(), (0, 5));
    }

    #[test]
    fn backspace_joins_lines() {
        let mut editor = Editor::from_text("one\ntwo");
        editor.cursor_line = 1;
        editor.cursor_col = 0;
        editor.backspace();
        assert_eq!(editor.text(), "onetwo");
        assert_eq!(editor.cursor(), (0, 3));
    }

    #[test]
    fn newline_splits_at_the_cursor() {
        let mut editor = Editor::from_text("onetwo");
        editor.cursor_col = 3;
        editor.insert_newline();
        assert_eq!(editor.text(), "one\ntwo");
        assert_eq!(editor.cursor(), (1, 0));
    }

    #[test]
    fn cursor_ops_are_char_based_not_byte_based() {
        let mut editor = Editor::from_text("héllo");
        editor.cursor_col = 2;
        editor.backspace();
        assert_eq!(editor.text(), "hllo");

        editor.move_end();
        editor.insert_char('ü');
        assert_eq!(editor.text(), "hlloü");
    }

    #[test]
    fn blankness_ignores_whitespace() {
        assert!(Editor::from_text("  \n\t").is_blank());
        assert!(!Editor::from_text(" x ").is_blank());
    }
}
