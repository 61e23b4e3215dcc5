use serde::{Deserialize, Serialize};

// === Enums ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Water,
    DeepWater,
    Grass,
    Forest,
    Mountain,
    Town,
    Dungeon,
    Ruins,
    Industrial,
    Residential,
    Road,
    Park,
}

impl TileKind {
    pub const ALL: [TileKind; 12] = [
        TileKind::Water,
        TileKind::DeepWater,
        TileKind::Grass,
        TileKind::Forest,
        TileKind::Mountain,
        TileKind::Town,
        TileKind::Dungeon,
        TileKind::Ruins,
        TileKind::Industrial,
        TileKind::Residential,
        TileKind::Road,
        TileKind::Park,
    ];

    /// Catalog key, also used as a biome tag by the region and city generators.
    pub fn key(self) -> &'static str {
        match self {
            TileKind::Water => "water",
            TileKind::DeepWater => "deep_water",
            TileKind::Grass => "grass",
            TileKind::Forest => "forest",
            TileKind::Mountain => "mountain",
            TileKind::Town => "town",
            TileKind::Dungeon => "dungeon",
            TileKind::Ruins => "ruins",
            TileKind::Industrial => "industrial",
            TileKind::Residential => "residential",
            TileKind::Road => "road",
            TileKind::Park => "park",
        }
    }

    pub fn from_key(key: &str) -> Option<TileKind> {
        TileKind::ALL.into_iter().find(|k| k.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Safe,
    Easy,
    Medium,
    Hard,
    #[serde(rename = "Very Hard")]
    VeryHard,
    Dangerous,
}

// === Archetype ===

/// A named tile template. Cells copy these fields when they resolve to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TileArchetype {
    pub kind: TileKind,
    pub name: &'static str,
    pub symbol: char,
    pub resources: &'static [&'static str],
    pub difficulty: Difficulty,
    pub flavor: &'static str,
}

impl TileArchetype {
    /// Symbol shown to clients. The road's `=` placeholder is replaced by
    /// the first letter of its name.
    pub fn display_symbol(&self) -> char {
        if self.symbol == '=' {
            self.name
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or(self.symbol)
        } else {
            self.symbol
        }
    }
}

const STANDARD_ARCHETYPES: [TileArchetype; 12] = [
    TileArchetype {
        kind: TileKind::Water,
        name: "Water",
        symbol: 'W',
        resources: &["Fish"],
        difficulty: Difficulty::Easy,
        flavor: "Calm water surface.",
    },
    TileArchetype {
        kind: TileKind::DeepWater,
        name: "Deep Water",
        symbol: 'W',
        resources: &["Fish", "Rare minerals"],
        difficulty: Difficulty::Hard,
        flavor: "Dark, unfathomable depths.",
    },
    TileArchetype {
        kind: TileKind::Grass,
        name: "Grass",
        symbol: 'G',
        resources: &["Herbs"],
        difficulty: Difficulty::Easy,
        flavor: "Rolling grassy plains.",
    },
    TileArchetype {
        kind: TileKind::Forest,
        name: "Forest",
        symbol: 'F',
        resources: &["Wood", "Fauna"],
        difficulty: Difficulty::Medium,
        flavor: "Dense woodland, full of life.",
    },
    TileArchetype {
        kind: TileKind::Mountain,
        name: "Mountain",
        symbol: 'M',
        resources: &["Ore", "Stone"],
        difficulty: Difficulty::Hard,
        flavor: "Steep rocky peaks.",
    },
    TileArchetype {
        kind: TileKind::Town,
        name: "Town",
        symbol: 'T',
        resources: &["Supplies", "NPCs"],
        difficulty: Difficulty::Safe,
        flavor: "A small settlement with trade opportunities.",
    },
    TileArchetype {
        kind: TileKind::Dungeon,
        name: "Dungeon",
        symbol: 'D',
        resources: &["Loot"],
        difficulty: Difficulty::Hard,
        flavor: "Dark corridors and lurking creatures.",
    },
    TileArchetype {
        kind: TileKind::Ruins,
        name: "Ruins",
        symbol: 'R',
        resources: &["Artifacts"],
        difficulty: Difficulty::Medium,
        flavor: "Crumbling remains of a forgotten place.",
    },
    TileArchetype {
        kind: TileKind::Industrial,
        name: "Industrial Zone",
        symbol: 'I',
        resources: &["Parts", "Energy"],
        difficulty: Difficulty::Medium,
        flavor: "Heavy machinery and humming reactors.",
    },
    TileArchetype {
        kind: TileKind::Residential,
        name: "Residential Block",
        symbol: 'H',
        resources: &["Civilians"],
        difficulty: Difficulty::Safe,
        flavor: "Homes stacked into neon-lit towers.",
    },
    TileArchetype {
        kind: TileKind::Road,
        name: "Road",
        symbol: '=',
        resources: &[],
        difficulty: Difficulty::Safe,
        flavor: "Main artery connecting the city sectors.",
    },
    TileArchetype {
        kind: TileKind::Park,
        name: "Park",
        symbol: 'P',
        resources: &["Herbs"],
        difficulty: Difficulty::Easy,
        flavor: "A rare patch of green in the neon jungle.",
    },
];

// === Catalog ===

/// Errors raised while building a catalog. These only happen at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    MissingTile(TileKind),
    DuplicateTile(TileKind),
    InvalidSymbol { kind: TileKind, symbol: char },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::MissingTile(kind) => {
                write!(f, "Tile catalog has no archetype for '{}'", kind.key())
            }
            CatalogError::DuplicateTile(kind) => {
                write!(f, "Tile catalog defines '{}' more than once", kind.key())
            }
            CatalogError::InvalidSymbol { kind, symbol } => write!(
                f,
                "Tile '{}' has non-printable symbol {:?}",
                kind.key(),
                symbol
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Immutable registry of tile archetypes, one per [`TileKind`].
///
/// Construction checks that every kind is present, so lookups never fail
/// once a catalog exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCatalog {
    // Indexed by `TileKind::index`.
    tiles: Vec<TileArchetype>,
}

impl TileCatalog {
    /// The fixed catalog shipped with the engine.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_archetypes(STANDARD_ARCHETYPES.to_vec())
    }

    pub fn from_archetypes(archetypes: Vec<TileArchetype>) -> Result<Self, CatalogError> {
        let mut slots: Vec<Option<TileArchetype>> = vec![None; TileKind::ALL.len()];

        for archetype in archetypes {
            let symbol = archetype.symbol;
            if symbol.is_control() || symbol.is_whitespace() {
                return Err(CatalogError::InvalidSymbol {
                    kind: archetype.kind,
                    symbol,
                });
            }
            let slot = &mut slots[archetype.kind.index()];
            if slot.is_some() {
                return Err(CatalogError::DuplicateTile(archetype.kind));
            }
            *slot = Some(archetype);
        }

        let mut tiles = Vec::with_capacity(slots.len());
        for (kind, slot) in TileKind::ALL.into_iter().zip(slots) {
            tiles.push(slot.ok_or(CatalogError::MissingTile(kind))?);
        }
        Ok(TileCatalog { tiles })
    }

    pub fn get(&self, kind: TileKind) -> &TileArchetype {
        &self.tiles[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileArchetype> {
        self.tiles.iter()
    }
}
