use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::generators::GridGenerator;
use crate::world::tile::TileKind;
use crate::world::topology::Placement;

pub const DEFAULT_REGION_COUNT: u32 = 7;

/// Biomes a region center can carry. Also used as the cell biome tag.
pub const REGION_BIOMES: [TileKind; 6] = [
    TileKind::Grass,
    TileKind::Forest,
    TileKind::Mountain,
    TileKind::Water,
    TileKind::Town,
    TileKind::Ruins,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCenter {
    pub x: u32,
    pub y: u32,
    pub biome: TileKind,
}

enum CenterSource {
    Random { rng: ChaCha8Rng, count: u32 },
    Fixed(Vec<RegionCenter>),
}

/// Nearest-center region partition.
pub struct VoronoiGenerator {
    source: CenterSource,
}

impl VoronoiGenerator {
    /// Draw `region_count` centers (at least one) from `rng` on each layout.
    pub fn new(rng: ChaCha8Rng, region_count: u32) -> Self {
        VoronoiGenerator {
            source: CenterSource::Random {
                rng,
                count: region_count.max(1),
            },
        }
    }

    /// Partition around explicit centers instead of random ones.
    pub fn with_centers(centers: Vec<RegionCenter>) -> Self {
        VoronoiGenerator {
            source: CenterSource::Fixed(centers),
        }
    }

    fn centers(&mut self, width: u32, height: u32) -> Vec<RegionCenter> {
        match &mut self.source {
            CenterSource::Random { rng, count } => draw_centers(rng, *count, width, height),
            CenterSource::Fixed(centers) => centers.clone(),
        }
    }
}

/// Draw order is x, y, biome per center, centers in sequence.
fn draw_centers(rng: &mut impl Rng, count: u32, width: u32, height: u32) -> Vec<RegionCenter> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            let biome = REGION_BIOMES[rng.gen_range(0..REGION_BIOMES.len())];
            RegionCenter { x, y, biome }
        })
        .collect()
}

/// Closest center by squared distance. Ties go to the earliest center.
pub fn nearest_center(centers: &[RegionCenter], x: u32, y: u32) -> Option<&RegionCenter> {
    let mut best: Option<(&RegionCenter, i64)> = None;
    for center in centers {
        let dx = center.x as i64 - x as i64;
        let dy = center.y as i64 - y as i64;
        let dist = dx * dx + dy * dy;
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((center, dist)),
        }
    }
    best.map(|(center, _)| center)
}

impl GridGenerator for VoronoiGenerator {
    fn layout(&mut self, width: u32, height: u32) -> Vec<Placement> {
        let centers = self.centers(width, height);
        let mut placements = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let kind = nearest_center(&centers, x, y)
                    .map(|c| c.biome)
                    .unwrap_or(TileKind::Grass);
                placements.push(Placement::new(kind, kind.key()));
            }
        }
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::seed::rng_from_seed;

    #[test]
    fn tie_goes_to_first_center() {
        let centers = vec![
            RegionCenter { x: 0, y: 2, biome: TileKind::Forest },
            RegionCenter { x: 4, y: 2, biome: TileKind::Mountain },
        ];
        // (2, 2) is 4 away (squared) from both.
        assert_eq!(nearest_center(&centers, 2, 2).unwrap().biome, TileKind::Forest);

        let reversed: Vec<_> = centers.iter().rev().cloned().collect();
        assert_eq!(nearest_center(&reversed, 2, 2).unwrap().biome, TileKind::Mountain);
    }

    #[test]
    fn tie_break_in_layout() {
        let mut generator = VoronoiGenerator::with_centers(vec![
            RegionCenter { x: 0, y: 0, biome: TileKind::Water },
            RegionCenter { x: 2, y: 0, biome: TileKind::Town },
        ]);
        let layout = generator.layout(3, 1);
        assert_eq!(layout[0].kind, TileKind::Water);
        assert_eq!(layout[1], Placement::new(TileKind::Water, "water"));
        assert_eq!(layout[2].kind, TileKind::Town);
    }

    #[test]
    fn nearest_center_empty() {
        assert!(nearest_center(&[], 0, 0).is_none());
    }

    #[test]
    fn centers_follow_draw_order() {
        let mut rng = rng_from_seed(11);
        let centers = draw_centers(&mut rng, 3, 18, 12);

        let mut replay = rng_from_seed(11);
        for center in &centers {
            assert_eq!(center.x, replay.gen_range(0..18));
            assert_eq!(center.y, replay.gen_range(0..12));
            assert_eq!(center.biome, REGION_BIOMES[replay.gen_range(0..REGION_BIOMES.len())]);
        }
    }

    #[test]
    fn layout_is_deterministic_and_uses_region_biomes() {
        let first = VoronoiGenerator::new(rng_from_seed(5), DEFAULT_REGION_COUNT).layout(24, 16);
        let second = VoronoiGenerator::new(rng_from_seed(5), DEFAULT_REGION_COUNT).layout(24, 16);
        assert_eq!(first.len(), 24 * 16);
        assert_eq!(first, second);
        for p in &first {
            assert!(REGION_BIOMES.contains(&p.kind));
            assert_eq!(p.biome, p.kind.key());
        }
    }

    #[test]
    fn every_center_owns_its_own_cell() {
        let mut rng = rng_from_seed(3);
        let centers = draw_centers(&mut rng, 7, 18, 12);
        let mut generator = VoronoiGenerator::with_centers(centers.clone());
        let layout = generator.layout(18, 12);
        for center in &centers {
            let owner = nearest_center(&centers, center.x, center.y).unwrap();
            assert_eq!(layout[(center.y * 18 + center.x) as usize].kind, owner.biome);
        }
    }

    #[test]
    fn zero_regions_still_yields_one() {
        let layout = VoronoiGenerator::new(rng_from_seed(1), 0).layout(4, 4);
        let kind = layout[0].kind;
        assert!(layout.iter().all(|p| p.kind == kind));
    }
}
