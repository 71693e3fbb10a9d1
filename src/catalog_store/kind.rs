//! Static description of the catalog hierarchy.
//!
//! Every ordered record type is described here once: its table, the columns
//! holding its own data, the parent that scopes its positions, the children it
//! owns and the association tables linking it to shared records. The ordered
//! collection manager works purely from these descriptors.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Genre,
    Movie,
    Medium,
    Show,
    Season,
    Episode,
    Game,
    Program,
    Music,
    Song,
}

/// Link from a child kind to the kind owning its position scope.
#[derive(Clone, Copy, Debug)]
pub struct ParentLink {
    pub kind: EntityKind,
    pub column: &'static str,
}

/// Many-to-many table pointing from an owner record to a shared record.
///
/// Association rows are copied by reference when the owner is duplicated and
/// dropped when either side is removed; the shared record itself is never
/// cloned or deleted through the association.
#[derive(Clone, Copy, Debug)]
pub struct AssociationTable {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
    pub target: EntityKind,
}

pub const MOVIE_GENRES: AssociationTable = AssociationTable {
    table: "movie_genres",
    owner_column: "movie_id",
    target_column: "genre_id",
    target: EntityKind::Genre,
};

pub const SHOW_GENRES: AssociationTable = AssociationTable {
    table: "show_genres",
    owner_column: "show_id",
    target_column: "genre_id",
    target: EntityKind::Genre,
};

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Genre,
        EntityKind::Movie,
        EntityKind::Medium,
        EntityKind::Show,
        EntityKind::Season,
        EntityKind::Episode,
        EntityKind::Game,
        EntityKind::Program,
        EntityKind::Music,
        EntityKind::Song,
    ];

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Genre => "genres",
            EntityKind::Movie => "movies",
            EntityKind::Medium => "media",
            EntityKind::Show => "shows",
            EntityKind::Season => "seasons",
            EntityKind::Episode => "episodes",
            EntityKind::Game => "games",
            EntityKind::Program => "programs",
            EntityKind::Music => "music",
            EntityKind::Song => "songs",
        }
    }

    /// Lowercase name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Genre => "genre",
            EntityKind::Movie => "movie",
            EntityKind::Medium => "medium",
            EntityKind::Show => "show",
            EntityKind::Season => "season",
            EntityKind::Episode => "episode",
            EntityKind::Game => "game",
            EntityKind::Program => "program",
            EntityKind::Music => "music",
            EntityKind::Song => "song",
        }
    }

    /// Columns carrying the record's own data, excluding `id`, `position`
    /// and the parent column.
    pub fn data_columns(self) -> &'static [&'static str] {
        match self {
            EntityKind::Genre => &["name"],
            EntityKind::Movie => &[
                "czech_name",
                "original_name",
                "year",
                "language",
                "subtitles",
                "csfd",
                "imdb_code",
                "wiki_en",
                "wiki_cz",
                "picture",
                "note",
            ],
            EntityKind::Medium => &["length"],
            EntityKind::Show => &[
                "czech_name",
                "original_name",
                "csfd",
                "imdb_code",
                "wiki_en",
                "wiki_cz",
                "picture",
                "note",
            ],
            EntityKind::Season => &[
                "number",
                "start_year",
                "end_year",
                "language",
                "subtitles",
                "note",
            ],
            EntityKind::Episode => &["number", "name", "length", "note"],
            EntityKind::Game => &[
                "name",
                "wiki_en",
                "wiki_cz",
                "media_count",
                "crack",
                "serial_key",
                "patch",
                "trainer",
                "trainer_data",
                "editor",
                "saves",
                "other_data",
                "note",
            ],
            EntityKind::Program => &[
                "name",
                "wiki_en",
                "wiki_cz",
                "media_count",
                "crack",
                "serial_key",
                "other_data",
                "note",
            ],
            EntityKind::Music => &["name", "wiki_en", "wiki_cz", "media_count", "note"],
            EntityKind::Song => &["name", "length", "note"],
        }
    }

    pub fn parent(self) -> Option<ParentLink> {
        let (kind, column) = match self {
            EntityKind::Medium => (EntityKind::Movie, "movie_id"),
            EntityKind::Season => (EntityKind::Show, "show_id"),
            EntityKind::Episode => (EntityKind::Season, "season_id"),
            EntityKind::Song => (EntityKind::Music, "music_id"),
            _ => return None,
        };
        Some(ParentLink { kind, column })
    }

    /// Kinds whose records are owned by records of this kind.
    pub fn children(self) -> &'static [EntityKind] {
        match self {
            EntityKind::Movie => &[EntityKind::Medium],
            EntityKind::Show => &[EntityKind::Season],
            EntityKind::Season => &[EntityKind::Episode],
            EntityKind::Music => &[EntityKind::Song],
            _ => &[],
        }
    }

    /// Association tables owned by records of this kind.
    pub fn associations(self) -> &'static [AssociationTable] {
        match self {
            EntityKind::Movie => &[MOVIE_GENRES],
            EntityKind::Show => &[SHOW_GENRES],
            _ => &[],
        }
    }

    /// Association tables in which records of this kind are the shared target.
    pub fn referenced_by(self) -> &'static [AssociationTable] {
        match self {
            EntityKind::Genre => &[MOVIE_GENRES, SHOW_GENRES],
            _ => &[],
        }
    }

    pub fn has_column(self, column: &str) -> bool {
        self.data_columns().contains(&column)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let singular = match lower.as_str() {
            "media" => "medium",
            "music" => "music",
            other => other.strip_suffix('s').unwrap_or(other),
        };
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.name() == singular)
            .ok_or_else(|| format!("Unknown catalog entity '{}'", s))
    }
}
