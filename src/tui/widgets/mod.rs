pub mod auth;
pub mod calendar;
pub mod color;
pub mod confirm_delete;
pub mod editor;
pub mod focus;
pub mod form;
pub mod help;
pub mod note_list;
pub mod sounds;
pub mod stats;
pub mod status_bar;
pub mod tabs;
pub mod task_list;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centered rect taking up the given percentage of the available area.
/// Based on the ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
