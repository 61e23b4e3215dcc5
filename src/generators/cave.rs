use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::generators::GridGenerator;
use crate::world::tile::TileKind;
use crate::world::topology::{MOORE_NEIGHBORS, Placement, offset_within};

pub const FILL_PROBABILITY: f64 = 0.45;
pub const SMOOTHING_PASSES: usize = 5;

/// A wall stays a wall with at least this many wall neighbors.
const WALL_SURVIVES_AT: u32 = 4;
/// A floor turns into a wall with more than this many wall neighbors.
const FLOOR_FILLS_ABOVE: u32 = 4;

/// Boolean wall map, row-major. `true` is wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaveMap {
    width: u32,
    height: u32,
    walls: Vec<bool>,
}

impl CaveMap {
    pub fn from_walls(width: u32, height: u32, walls: Vec<bool>) -> Self {
        debug_assert_eq!(walls.len(), (width * height) as usize);
        CaveMap {
            width,
            height,
            walls,
        }
    }

    /// One uniform draw per cell, row-major, wall below `FILL_PROBABILITY`.
    pub fn random_fill(width: u32, height: u32, rng: &mut impl Rng) -> Self {
        let walls = (0..width * height)
            .map(|_| rng.r#gen::<f64>() < FILL_PROBABILITY)
            .collect();
        CaveMap::from_walls(width, height, walls)
    }

    pub fn is_wall(&self, x: u32, y: u32) -> bool {
        self.walls[(y * self.width + x) as usize]
    }

    /// Wall count among the 8 surrounding cells. Off-grid counts as wall.
    pub fn wall_neighbors(&self, x: u32, y: u32) -> u32 {
        MOORE_NEIGHBORS
            .iter()
            .filter(|&&offset| match offset_within(x, y, offset, self.width, self.height) {
                Some((nx, ny)) => self.is_wall(nx, ny),
                None => true,
            })
            .count() as u32
    }

    /// One synchronous automaton generation; reads only from `self`.
    pub fn smooth(&self) -> CaveMap {
        let mut walls = Vec::with_capacity(self.walls.len());
        for y in 0..self.height {
            for x in 0..self.width {
                let count = self.wall_neighbors(x, y);
                walls.push(if self.is_wall(x, y) {
                    count >= WALL_SURVIVES_AT
                } else {
                    count > FLOOR_FILLS_ABOVE
                });
            }
        }
        CaveMap::from_walls(self.width, self.height, walls)
    }

    pub fn smooth_passes(&self, passes: usize) -> CaveMap {
        let mut map = self.clone();
        for _ in 0..passes {
            map = map.smooth();
        }
        map
    }

    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|&&w| w).count()
    }
}

/// Cellular-automata cave carving.
pub struct CaveGenerator {
    rng: ChaCha8Rng,
}

impl CaveGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        CaveGenerator { rng }
    }

    pub fn carve(&mut self, width: u32, height: u32) -> CaveMap {
        CaveMap::random_fill(width, height, &mut self.rng).smooth_passes(SMOOTHING_PASSES)
    }
}

impl GridGenerator for CaveGenerator {
    fn layout(&mut self, width: u32, height: u32) -> Vec<Placement> {
        self.carve(width, height)
            .walls
            .iter()
            .map(|&wall| {
                if wall {
                    Placement::new(TileKind::Mountain, "rock")
                } else {
                    Placement::new(TileKind::Dungeon, "dungeon")
                }
            })
            .collect()
    }
}
