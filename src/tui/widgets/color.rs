use ratatui::style::Color;

/// Parse a color string into a ratatui Color.
/// Supports named terminal colors and hex (#RRGGBB). Unrecognized values
/// fall back to white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => {
            if let Some(hex) = s.strip_prefix('#') {
                if let Some(color) = parse_hex(hex) {
                    return color;
                }
            }
            Color::White
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Black or white, whichever reads better on the given background
pub fn contrast_text_color(bg: Color) -> Color {
    let (r, g, b) = approximate_rgb(bg);
    // Perceived luminance, ITU-R BT.601 weights
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 128.0 { Color::Black } else { Color::White }
}

fn approximate_rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (170, 0, 0),
        Color::Green => (0, 170, 0),
        Color::Yellow => (170, 170, 0),
        Color::Blue => (0, 0, 170),
        Color::Magenta => (170, 0, 170),
        Color::Cyan => (0, 170, 170),
        Color::Gray => (170, 170, 170),
        Color::DarkGray => (85, 85, 85),
        Color::LightRed => (255, 85, 85),
        Color::LightGreen => (85, 255, 85),
        Color::LightYellow => (255, 255, 85),
        Color::LightBlue => (85, 85, 255),
        Color::LightMagenta => (255, 85, 255),
        Color::LightCyan => (85, 255, 255),
        Color::White => (255, 255, 255),
        _ => (255, 255, 255),
    }
}

/// Display form of a color for writing back into config
pub fn format_color(color: &Color) -> String {
    match color {
        Color::Black => "black".to_string(),
        Color::White => "white".to_string(),
        Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        other => format!("{:?}", other).to_lowercase(),
    }
}

/// Palette color of a note card mapped onto a terminal color
pub fn note_color(name: &str) -> Color {
    match name {
        "amber" => Color::Yellow,
        "blue" => Color::Blue,
        "emerald" => Color::Green,
        "rose" => Color::LightRed,
        "indigo" => Color::Magenta,
        "cyan" => Color::Cyan,
        other => parse_color(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_hex_colors_parse() {
        assert_eq!(parse_color("blue"), Color::Blue);
        assert_eq!(parse_color(" LightCyan "), Color::LightCyan);
        assert_eq!(parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_color("definitely-not-a-color"), Color::White);
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(contrast_text_color(Color::Black), Color::White);
        assert_eq!(contrast_text_color(Color::White), Color::Black);
        assert_eq!(contrast_text_color(Color::Rgb(250, 250, 100)), Color::Black);
    }

    #[test]
    fn every_note_palette_entry_maps_to_a_color() {
        for name in crate::models::NOTE_COLORS {
            assert_ne!(note_color(name), Color::White);
        }
    }
}
