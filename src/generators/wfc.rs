//! Wave function collapse over a four-tile city set.
//!
//! Contradictions are handled by restarting, not backtracking: up to
//! [`MAX_ATTEMPTS`] fresh attempts share one random stream, so a seed
//! reproduces the whole run. If every attempt fails the last wave is
//! resolved best-effort and the result may violate adjacency.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::generators::GridGenerator;
use crate::world::tile::TileKind;
use crate::world::topology::{ORTHOGONAL_NEIGHBORS, Placement, offset_within};

pub const MAX_ATTEMPTS: u32 = 8;
/// Collapse/propagate rounds per attempt, per cell.
const STEPS_PER_CELL: u32 = 4;

/// Tile universe, in iteration order. Index 0 is the fallback tile.
pub const WFC_TILES: [TileKind; 4] = [
    TileKind::Road,
    TileKind::Residential,
    TileKind::Industrial,
    TileKind::Park,
];

const ROAD: usize = 0;
const RESIDENTIAL: usize = 1;
const INDUSTRIAL: usize = 2;
const PARK: usize = 3;

// === Possibility sets ===

/// Bitset over indices into [`WFC_TILES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileSet(u8);

impl TileSet {
    pub const EMPTY: TileSet = TileSet(0);
    pub const FULL: TileSet = TileSet(0b1111);

    pub fn of(indices: &[usize]) -> TileSet {
        indices
            .iter()
            .fold(TileSet::EMPTY, |set, &i| TileSet(set.0 | (1 << i)))
    }

    pub fn single(index: usize) -> TileSet {
        TileSet(1 << index)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    pub fn union(self, other: TileSet) -> TileSet {
        TileSet(self.0 | other.0)
    }

    pub fn intersection(self, other: TileSet) -> TileSet {
        TileSet(self.0 & other.0)
    }

    /// Member indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..WFC_TILES.len()).filter(move |&i| self.contains(i))
    }

    pub fn first(self) -> Option<usize> {
        self.iter().next()
    }
}

// === Rules ===

/// Allowed neighbors per tile and direction (N, S, E, W order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRules {
    allowed: [[TileSet; 4]; 4],
}

impl AdjacencyRules {
    pub fn new(allowed: [[TileSet; 4]; 4]) -> Self {
        AdjacencyRules { allowed }
    }

    /// Roads touch anything; industry only touches roads and industry;
    /// homes and parks keep away from industry.
    pub fn standard() -> Self {
        let anything = TileSet::of(&[ROAD, RESIDENTIAL, INDUSTRIAL, PARK]);
        let quiet = TileSet::of(&[ROAD, RESIDENTIAL, PARK]);
        let heavy = TileSet::of(&[ROAD, INDUSTRIAL]);

        let mut allowed = [[TileSet::EMPTY; 4]; 4];
        allowed[ROAD] = [anything; 4];
        allowed[RESIDENTIAL] = [quiet; 4];
        allowed[INDUSTRIAL] = [heavy; 4];
        allowed[PARK] = [quiet; 4];
        AdjacencyRules { allowed }
    }

    pub fn allows(&self, tile: usize, direction: usize, neighbor: usize) -> bool {
        self.allowed[tile][direction].contains(neighbor)
    }

    /// Union of what any tile in `current` permits toward `direction`.
    fn reachable(&self, current: TileSet, direction: usize) -> TileSet {
        current
            .iter()
            .fold(TileSet::EMPTY, |acc, t| acc.union(self.allowed[t][direction]))
    }
}

// === Wave ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    width: u32,
    height: u32,
    cells: Vec<TileSet>,
}

impl Wave {
    pub fn new(width: u32, height: u32) -> Self {
        Wave {
            width,
            height,
            cells: vec![TileSet::FULL; (width * height) as usize],
        }
    }

    /// Every cell back to all options.
    pub fn reset(&mut self) {
        self.cells.fill(TileSet::FULL);
    }

    pub fn get(&self, x: u32, y: u32) -> TileSet {
        self.cells[(y * self.width + x) as usize]
    }

    pub fn has_contradiction(&self) -> bool {
        self.cells.iter().any(|c| c.is_empty())
    }

    /// Pick a lowest-entropy undecided cell and fix it to one of its options.
    /// Returns false when every cell is decided.
    fn collapse(&mut self, rng: &mut impl Rng) -> bool {
        let mut candidates: Vec<usize> = Vec::new();
        let mut min_entropy = usize::MAX;
        for (i, options) in self.cells.iter().enumerate() {
            let entropy = options.len();
            if entropy <= 1 {
                continue;
            }
            if entropy < min_entropy {
                min_entropy = entropy;
                candidates.clear();
                candidates.push(i);
            } else if entropy == min_entropy {
                candidates.push(i);
            }
        }

        if candidates.is_empty() {
            return false;
        }

        let cell = candidates[rng.gen_range(0..candidates.len())];
        let options: Vec<usize> = self.cells[cell].iter().collect();
        let choice = options[rng.gen_range(0..options.len())];
        self.cells[cell] = TileSet::single(choice);
        true
    }

    /// Narrow neighbors until nothing changes.
    fn propagate(&mut self, rules: &AdjacencyRules) {
        let mut changed = true;
        while changed {
            changed = false;
            for y in 0..self.height {
                for x in 0..self.width {
                    let current = self.get(x, y);
                    if current.is_empty() {
                        continue;
                    }
                    for (direction, &offset) in ORTHOGONAL_NEIGHBORS.iter().enumerate() {
                        let Some((nx, ny)) = offset_within(x, y, offset, self.width, self.height)
                        else {
                            continue;
                        };
                        let idx = (ny * self.width + nx) as usize;
                        let narrowed = self.cells[idx].intersection(rules.reachable(current, direction));
                        if narrowed != self.cells[idx] {
                            self.cells[idx] = narrowed;
                            changed = true;
                        }
                    }
                }
            }
        }
    }

    /// Final tile per cell: empty resolves to road, anything else to its
    /// first remaining option.
    pub fn resolve(&self) -> Vec<TileKind> {
        self.cells
            .iter()
            .map(|options| WFC_TILES[options.first().unwrap_or(ROAD)])
            .collect()
    }
}

// === Generator ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WfcOutcome {
    /// An attempt finished without contradiction.
    Solved { attempts: u32 },
    /// Every attempt hit a contradiction; the last wave was resolved best-effort.
    Degraded,
}

pub struct WfcGenerator {
    rng: ChaCha8Rng,
    rules: AdjacencyRules,
    last_outcome: Option<WfcOutcome>,
}

impl WfcGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self::with_rules(rng, AdjacencyRules::standard())
    }

    pub fn with_rules(rng: ChaCha8Rng, rules: AdjacencyRules) -> Self {
        WfcGenerator {
            rng,
            rules,
            last_outcome: None,
        }
    }

    pub fn rules(&self) -> &AdjacencyRules {
        &self.rules
    }

    pub fn last_outcome(&self) -> Option<WfcOutcome> {
        self.last_outcome
    }

    /// Run up to [`MAX_ATTEMPTS`] attempts, continuing the same random stream.
    pub fn solve(&mut self, width: u32, height: u32) -> (Wave, WfcOutcome) {
        let max_steps = width * height * STEPS_PER_CELL;
        let mut wave = Wave::new(width, height);

        for attempt in 1..=MAX_ATTEMPTS {
            wave.reset();
            let mut ok = true;
            for _ in 0..max_steps {
                if !wave.collapse(&mut self.rng) {
                    break;
                }
                wave.propagate(&self.rules);
                if wave.has_contradiction() {
                    ok = false;
                    break;
                }
            }
            if ok {
                let outcome = WfcOutcome::Solved { attempts: attempt };
                self.last_outcome = Some(outcome);
                return (wave, outcome);
            }
            debug!(attempt, width, height, "WFC contradiction, restarting");
        }

        warn!(
            attempts = MAX_ATTEMPTS,
            width, height, "WFC retry budget exhausted, resolving best-effort"
        );
        self.last_outcome = Some(WfcOutcome::Degraded);
        (wave, WfcOutcome::Degraded)
    }
}

impl GridGenerator for WfcGenerator {
    fn layout(&mut self, width: u32, height: u32) -> Vec<Placement> {
        let (wave, _) = self.solve(width, height);
        wave.resolve()
            .into_iter()
            .map(|kind| Placement::new(kind, kind.key()))
            .collect()
    }
}
