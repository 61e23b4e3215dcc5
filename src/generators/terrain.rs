use crate::generators::GridGenerator;
use crate::world::noise::{NoiseBackend, NoiseField};
use crate::world::tile::TileKind;
use crate::world::topology::Placement;

/// Larger = smoother terrain.
const SCALE: f64 = 12.0;

const MOISTURE_SEED_OFFSET: u32 = 7;
const FEATURE_SEED_OFFSET: u32 = 13;
const MOISTURE_OFFSET: (f64, f64) = (100.0, 100.0);
const FEATURE_OFFSET: (f64, f64) = (200.0, -200.0);

const DEEP_WATER_BELOW: f64 = 0.25;
const SHALLOW_WATER_BELOW: f64 = 0.32;
const MOUNTAIN_ABOVE: f64 = 0.8;
const STEPPE_MOISTURE_BELOW: f64 = 0.25;
const PLAINS_MOISTURE_BELOW: f64 = 0.55;

const SETTLEMENT_FEATURE_ABOVE: f64 = 0.72;
const SETTLEMENT_MIN_HEIGHT: f64 = 0.35;
const RUINS_FEATURE_BELOW: f64 = -0.72;
const RUINS_MIN_HEIGHT: f64 = 0.45;

/// The three noise layers one terrain map samples.
pub struct NoiseLayers {
    pub height: NoiseField,
    pub moisture: NoiseField,
    pub feature: NoiseField,
}

impl NoiseLayers {
    /// Height at `seed`, moisture at `seed + 7`, features at `seed + 13`.
    pub fn derive(backend: NoiseBackend, seed: u32) -> Self {
        NoiseLayers {
            height: NoiseField::new(backend, seed),
            moisture: NoiseField::new(backend, seed.wrapping_add(MOISTURE_SEED_OFFSET)),
            feature: NoiseField::new(backend, seed.wrapping_add(FEATURE_SEED_OFFSET)),
        }
    }
}

/// Height + moisture layered biomes with sprinkled settlements and ruins.
pub struct TerrainGenerator {
    layers: NoiseLayers,
}

impl TerrainGenerator {
    pub fn new(layers: NoiseLayers) -> Self {
        TerrainGenerator { layers }
    }

    fn place(&self, x: u32, y: u32) -> Placement {
        let nx = x as f64 / SCALE;
        let ny = y as f64 / SCALE;

        let h = self.layers.height.sample(nx, ny);
        let m = self
            .layers
            .moisture
            .sample(nx + MOISTURE_OFFSET.0, ny + MOISTURE_OFFSET.1);
        let h01 = (h + 1.0) / 2.0;
        let m01 = (m + 1.0) / 2.0;

        let base = classify(h01, m01);

        let feature = self
            .layers
            .feature
            .sample(nx + FEATURE_OFFSET.0, ny + FEATURE_OFFSET.1);
        apply_feature(base, h01, feature)
    }
}

impl GridGenerator for TerrainGenerator {
    fn layout(&mut self, width: u32, height: u32) -> Vec<Placement> {
        let mut placements = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                placements.push(self.place(x, y));
            }
        }
        placements
    }
}

/// Base biome from normalized height and moisture.
pub fn classify(h01: f64, m01: f64) -> Placement {
    if h01 < DEEP_WATER_BELOW {
        Placement::new(TileKind::DeepWater, "ocean")
    } else if h01 < SHALLOW_WATER_BELOW {
        Placement::new(TileKind::Water, "coast")
    } else if h01 > MOUNTAIN_ABOVE {
        Placement::new(TileKind::Mountain, "mountain")
    } else if m01 < STEPPE_MOISTURE_BELOW {
        Placement::new(TileKind::Grass, "steppe")
    } else if m01 < PLAINS_MOISTURE_BELOW {
        Placement::new(TileKind::Grass, "plains")
    } else {
        Placement::new(TileKind::Forest, "forest")
    }
}

/// Override land with a settlement or ruins when the feature layer peaks.
pub fn apply_feature(base: Placement, h01: f64, feature: f64) -> Placement {
    if h01 > SETTLEMENT_MIN_HEIGHT && feature > SETTLEMENT_FEATURE_ABOVE {
        Placement::new(TileKind::Town, "settlement")
    } else if h01 > RUINS_MIN_HEIGHT && feature < RUINS_FEATURE_BELOW {
        Placement::new(TileKind::Ruins, "ruins")
    } else {
        base
    }
}
