//! Ambient soundscapes. The fixed catalog mirrors what the app ships with;
//! audio output itself is delegated to the host platform.

use crate::models::Soundscape;

pub const SOUNDSCAPES: &[Soundscape] = &[
    Soundscape {
        id: "rain",
        name: "Summer Rain",
        url: "https://assets.mixkit.co/active_storage/sfx/2418/2418-preview.mp3",
        icon: "🌧",
        color: "blue",
    },
    Soundscape {
        id: "forest",
        name: "Deep Forest",
        url: "https://assets.mixkit.co/active_storage/sfx/1118/1118-preview.mp3",
        icon: "🌲",
        color: "emerald",
    },
    Soundscape {
        id: "lofi",
        name: "Lo-Fi Chill",
        url: "https://assets.mixkit.co/active_storage/sfx/2381/2381-preview.mp3",
        icon: "🎧",
        color: "indigo",
    },
    Soundscape {
        id: "waves",
        name: "Ocean Waves",
        url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
        icon: "🌊",
        color: "cyan",
    },
];

pub fn soundscape(id: &str) -> Option<&'static Soundscape> {
    SOUNDSCAPES.iter().find(|s| s.id == id)
}

/// Which soundscape is active, and at what volume. At most one soundscape
/// plays at a time: toggling another replaces the current one.
#[derive(Debug, Clone)]
pub struct SoundBoard {
    active: Option<&'static str>,
    volume: f32,
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self {
            active: None,
            volume: 0.5,
        }
    }
}

impl SoundBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active
    }

    pub fn active(&self) -> Option<&'static Soundscape> {
        self.active.and_then(soundscape)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.is_some_and(|active| active == id)
    }

    /// Toggle a catalog entry. Returns true when the entry is active after
    /// the call. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(entry) = soundscape(id) else {
            return false;
        };
        if self.active == Some(entry.id) {
            self.active = None;
            false
        } else {
            self.active = Some(entry.id);
            true
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn nudge_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_entries_resolve_by_id() {
        assert_eq!(soundscape("rain").unwrap().name, "Summer Rain");
        assert!(soundscape("vacuum").is_none());
    }

    #[test]
    fn at_most_one_soundscape_plays() {
        let mut board = SoundBoard::new();
        assert!(board.toggle("rain"));
        assert!(board.is_active("rain"));

        // Activating another replaces the first
        assert!(board.toggle("lofi"));
        assert!(board.is_active("lofi"));
        assert!(!board.is_active("rain"));

        // Toggling the active one stops it
        assert!(!board.toggle("lofi"));
        assert!(board.active().is_none());
    }

    #[test]
    fn unknown_id_leaves_the_board_untouched() {
        let mut board = SoundBoard::new();
        board.toggle("rain");
        assert!(!board.toggle("vacuum"));
        assert!(board.is_active("rain"));
    }

    #[test]
    fn volume_clamps_to_unit_range() {
        let mut board = SoundBoard::new();
        board.set_volume(1.8);
        assert_eq!(board.volume(), 1.0);
        board.nudge_volume(-2.0);
        assert_eq!(board.volume(), 0.0);
        board.nudge_volume(0.25);
        assert_eq!(board.volume(), 0.25);
    }
}
