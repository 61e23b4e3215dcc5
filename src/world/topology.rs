use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::world::tile::{Difficulty, TileCatalog, TileKind};

/// Orthogonal neighbor offsets, in N, S, E, W order.
pub const ORTHOGONAL_NEIGHBORS: [(i32, i32); 4] = [
    (0, -1), // North
    (0, 1),  // South
    (1, 0),  // East
    (-1, 0), // West
];

/// The eight surrounding offsets, row by row.
pub const MOORE_NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Size presets. Unrecognized strings fall back to `Small`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapSize {
    Small,
    Medium,
    Large,
}

impl MapSize {
    pub fn parse(size: &str) -> MapSize {
        match size.trim().to_lowercase().as_str() {
            "medium" => MapSize::Medium,
            "large" => MapSize::Large,
            _ => MapSize::Small,
        }
    }

    /// Returns (width, height) in cells.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            MapSize::Small => (18, 12),
            MapSize::Medium => (24, 16),
            MapSize::Large => (32, 20),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MapSize::Small => "small",
            MapSize::Medium => "medium",
            MapSize::Large => "large",
        }
    }
}

/// What a generator decided for one grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub kind: TileKind,
    pub biome: &'static str,
}

impl Placement {
    pub fn new(kind: TileKind, biome: &'static str) -> Self {
        Placement { kind, biome }
    }
}

/// One emitted grid cell: tile fields copied from its archetype plus position and biome tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub name: String,
    pub symbol: String,
    pub resources: Vec<String>,
    pub difficulty: Difficulty,
    pub flavor: String,
    pub biome: String,
}

/// Row-major grid of cells, the shape every generator is normalized to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub grid_columns: u32,
    pub map: Vec<Cell>,
}

impl Grid {
    /// Shape a generator's row-major layout into cells.
    pub fn from_layout(width: u32, layout: &[Placement], catalog: &TileCatalog) -> Grid {
        let map = layout
            .iter()
            .enumerate()
            .map(|(i, placement)| {
                let i = i as u32;
                let tile = catalog.get(placement.kind);
                Cell {
                    x: i % width,
                    y: i / width,
                    name: tile.name.to_string(),
                    symbol: tile.display_symbol().to_string(),
                    resources: tile.resources.iter().map(|r| r.to_string()).collect(),
                    difficulty: tile.difficulty,
                    flavor: tile.flavor.to_string(),
                    biome: placement.biome.to_string(),
                }
            })
            .collect();

        Grid {
            grid_columns: width,
            map,
        }
    }

    pub fn height(&self) -> u32 {
        if self.grid_columns == 0 {
            return 0;
        }
        self.map.len() as u32 / self.grid_columns
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        if x >= self.grid_columns || y >= self.height() {
            return None;
        }
        self.map.get(y as usize * self.grid_columns as usize + x as usize)
    }

    /// Number of cells per biome tag, sorted by tag.
    pub fn biome_counts(&self) -> BTreeMap<&str, u32> {
        let mut counts = BTreeMap::new();
        for cell in &self.map {
            *counts.entry(cell.biome.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// One line of symbols per row.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.map.len() + self.height() as usize);
        for row in self.map.chunks(self.grid_columns.max(1) as usize) {
            for cell in row {
                out.push_str(&cell.symbol);
            }
            out.push('\n');
        }
        out
    }
}

/// Neighbor of `(x, y)` at offset `(dx, dy)`, or `None` outside the grid.
pub fn offset_within(x: u32, y: u32, (dx, dy): (i32, i32), width: u32, height: u32) -> Option<(u32, u32)> {
    let nx = x as i64 + dx as i64;
    let ny = y as i64 + dy as i64;
    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
        None
    } else {
        Some((nx as u32, ny as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TileCatalog {
        TileCatalog::standard().unwrap()
    }

    #[test]
    fn size_presets() {
        assert_eq!(MapSize::Small.dimensions(), (18, 12));
        assert_eq!(MapSize::Medium.dimensions(), (24, 16));
        assert_eq!(MapSize::Large.dimensions(), (32, 20));
    }

    #[test]
    fn size_parse_is_lenient() {
        assert_eq!(MapSize::parse("MEDIUM"), MapSize::Medium);
        assert_eq!(MapSize::parse(" large "), MapSize::Large);
        assert_eq!(MapSize::parse("huge"), MapSize::Small);
        assert_eq!(MapSize::parse(""), MapSize::Small);
    }

    #[test]
    fn from_layout_is_row_major() {
        let layout = vec![
            Placement::new(TileKind::Grass, "plains"),
            Placement::new(TileKind::Forest, "forest"),
            Placement::new(TileKind::Road, "road"),
            Placement::new(TileKind::Water, "coast"),
            Placement::new(TileKind::Town, "settlement"),
            Placement::new(TileKind::Ruins, "ruins"),
        ];
        let grid = Grid::from_layout(3, &layout, &catalog());
        assert_eq!(grid.grid_columns, 3);
        assert_eq!(grid.height(), 2);

        let cell = grid.cell(1, 1).unwrap();
        assert_eq!((cell.x, cell.y), (1, 1));
        assert_eq!(cell.name, "Town");
        assert_eq!(cell.biome, "settlement");
        assert_eq!(cell.resources, vec!["Supplies", "NPCs"]);

        let road = grid.cell(2, 0).unwrap();
        assert_eq!(road.symbol, "R");
        assert!(road.resources.is_empty());
        assert!(grid.cell(3, 0).is_none());
    }

    #[test]
    fn cell_lookup_out_of_range_is_none() {
        let layout = vec![Placement::new(TileKind::Grass, "plains"); 4];
        let grid = Grid::from_layout(2, &layout, &catalog());
        assert!(grid.cell(1, 1).is_some());
        assert!(grid.cell(0, 2).is_none());
        assert!(grid.cell(0, u32::MAX).is_none());
        assert!(grid.cell(u32::MAX, u32::MAX).is_none());
    }

    #[test]
    fn render_ascii_one_line_per_row() {
        let layout = vec![Placement::new(TileKind::Mountain, "rock"); 4];
        let grid = Grid::from_layout(2, &layout, &catalog());
        assert_eq!(grid.render_ascii(), "MM\nMM\n");
    }

    #[test]
    fn biome_counts_tally_tags() {
        let layout = vec![
            Placement::new(TileKind::Mountain, "rock"),
            Placement::new(TileKind::Dungeon, "dungeon"),
            Placement::new(TileKind::Mountain, "rock"),
        ];
        let grid = Grid::from_layout(3, &layout, &catalog());
        let counts = grid.biome_counts();
        assert_eq!(counts.get("rock"), Some(&2));
        assert_eq!(counts.get("dungeon"), Some(&1));
    }

    #[test]
    fn cell_payload_json_shape() {
        let layout = vec![Placement::new(TileKind::DeepWater, "ocean")];
        let grid = Grid::from_layout(1, &layout, &catalog());
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["grid_columns"], 1);
        let cell = &json["map"][0];
        assert_eq!(cell["x"], 0);
        assert_eq!(cell["y"], 0);
        assert_eq!(cell["name"], "Deep Water");
        assert_eq!(cell["symbol"], "W");
        assert_eq!(cell["difficulty"], "Hard");
        assert_eq!(cell["biome"], "ocean");
        assert_eq!(cell["resources"][1], "Rare minerals");
    }

    #[test]
    fn offset_within_respects_bounds() {
        assert_eq!(offset_within(0, 0, (-1, 0), 4, 4), None);
        assert_eq!(offset_within(3, 3, (1, 1), 4, 4), None);
        assert_eq!(offset_within(1, 1, (1, -1), 4, 4), Some((2, 0)));
    }
}
