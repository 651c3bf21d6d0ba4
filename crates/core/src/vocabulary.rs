//! Static name-to-id tables used to translate human-readable filters.

use once_cell::sync::Lazy;

/// An immutable lookup table of catalog vocabulary entries.
#[derive(Debug)]
pub struct Vocabulary {
    kind: &'static str,
    entries: &'static [(&'static str, u32)],
}

impl Vocabulary {
    const fn new(kind: &'static str, entries: &'static [(&'static str, u32)]) -> Self {
        Self { kind, entries }
    }

    /// Vocabulary name, used in logs.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Resolve a display name to its catalog id, ignoring ASCII case.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(name))
            .map(|(_, id)| *id)
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &'static [(&'static str, u32)] {
        self.entries
    }
}

/// Hardware platforms.
pub static PLATFORMS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(
        "platform",
        &[
            ("Linux", 3),
            ("Nintendo 64", 4),
            ("Wii", 5),
            ("PC (Microsoft Windows)", 6),
            ("PlayStation", 7),
            ("PlayStation 2", 8),
            ("PlayStation 3", 9),
            ("Xbox", 11),
            ("Xbox 360", 12),
            ("Mac", 14),
            ("Nintendo Entertainment System", 18),
            ("Super Nintendo Entertainment System", 19),
            ("Nintendo DS", 20),
            ("Nintendo GameCube", 21),
            ("Game Boy Color", 22),
            ("Dreamcast", 23),
            ("Game Boy Advance", 24),
            ("Sega Mega Drive/Genesis", 29),
            ("Game Boy", 33),
            ("Android", 34),
            ("Nintendo 3DS", 37),
            ("PlayStation Portable", 38),
            ("iOS", 39),
            ("Wii U", 41),
            ("PlayStation Vita", 46),
            ("PlayStation 4", 48),
            ("Xbox One", 49),
            ("Nintendo Switch", 130),
            ("PlayStation 5", 167),
            ("Xbox Series X|S", 169),
            ("Google Stadia", 170),
        ],
    )
});

/// Genres.
pub static GENRES: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(
        "genre",
        &[
            ("Point-and-click", 2),
            ("Fighting", 4),
            ("Shooter", 5),
            ("Music", 7),
            ("Platform", 8),
            ("Puzzle", 9),
            ("Racing", 10),
            ("Real Time Strategy (RTS)", 11),
            ("Role-playing (RPG)", 12),
            ("Simulator", 13),
            ("Sport", 14),
            ("Strategy", 15),
            ("Turn-based strategy (TBS)", 16),
            ("Tactical", 24),
            ("Hack and slash/Beat 'em up", 25),
            ("Quiz/Trivia", 26),
            ("Pinball", 30),
            ("Adventure", 31),
            ("Indie", 32),
            ("Arcade", 33),
            ("Visual Novel", 34),
            ("Card & Board Game", 35),
            ("MOBA", 36),
        ],
    )
});

/// Game modes.
pub static GAME_MODES: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(
        "game mode",
        &[
            ("Single player", 1),
            ("Multiplayer", 2),
            ("Co-operative", 3),
            ("Split screen", 4),
            ("Massively Multiplayer Online (MMO)", 5),
            ("Battle Royale", 6),
        ],
    )
});

/// Player perspectives.
pub static PLAYER_PERSPECTIVES: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(
        "player perspective",
        &[
            ("First person", 1),
            ("Third person", 2),
            ("Bird view / Isometric", 3),
            ("Side view", 4),
            ("Text", 5),
            ("Auditory", 6),
            ("Virtual Reality", 7),
        ],
    )
});

/// Themes.
pub static THEMES: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(
        "theme",
        &[
            ("Action", 1),
            ("Fantasy", 17),
            ("Science fiction", 18),
            ("Horror", 19),
            ("Thriller", 20),
            ("Survival", 21),
            ("Historical", 22),
            ("Stealth", 23),
            ("Comedy", 27),
            ("Business", 28),
            ("Drama", 31),
            ("Non-fiction", 32),
            ("Sandbox", 33),
            ("Educational", 34),
            ("Kids", 35),
            ("Open world", 38),
            ("Warfare", 39),
            ("Party", 40),
            ("4X (explore, expand, exploit, and exterminate)", 41),
            ("Mystery", 43),
            ("Romance", 44),
        ],
    )
});
