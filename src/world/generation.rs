use rayon::prelude::*;
use tracing::debug;

use crate::generators::voronoi::DEFAULT_REGION_COUNT;
use crate::generators::terrain::NoiseLayers;
use crate::generators::{CaveGenerator, GridGenerator, TerrainGenerator, VoronoiGenerator, WfcGenerator};
use crate::world::noise::NoiseBackend;
use crate::world::seed::{SeedBundle, normalize_key, rng_from_seed};
use crate::world::tile::{CatalogError, TileCatalog};
use crate::world::topology::{Grid, MapSize};

/// The four grid algorithms a theme can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Terrain,
    Voronoi,
    Cave,
    Wfc,
}

impl Algorithm {
    /// Route a theme string. Unknown themes get terrain.
    pub fn for_theme(theme: &str) -> Algorithm {
        match normalize_key(theme, "fantasy").as_str() {
            "fantasy" | "post-apocalyptic" | "post apocalyptic" | "post_apocalyptic"
            | "post-apoc" => Algorithm::Terrain,
            "sci-fi" | "sci fi" | "sci_fi" | "scifi" => Algorithm::Voronoi,
            "cyberpunk" => Algorithm::Wfc,
            "dungeon" | "caves" => Algorithm::Cave,
            _ => Algorithm::Terrain,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Terrain => "terrain",
            Algorithm::Voronoi => "voronoi",
            Algorithm::Cave => "cave",
            Algorithm::Wfc => "wfc",
        }
    }
}

/// Knobs fixed at startup and shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub noise_backend: NoiseBackend,
    pub region_count: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            noise_backend: NoiseBackend::preferred(),
            region_count: DEFAULT_REGION_COUNT,
        }
    }
}

/// One `(theme, size, seed)` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub theme: String,
    pub size: String,
    pub seed: i64,
}

impl GenerationRequest {
    pub fn new(theme: impl Into<String>, size: impl Into<String>, seed: i64) -> Self {
        GenerationRequest {
            theme: theme.into(),
            size: size.into(),
            seed,
        }
    }
}

/// Routes requests to a generator and shapes the result into a [`Grid`].
///
/// Holds only read-only state, so one dispatcher can serve many threads.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    catalog: TileCatalog,
    options: GeneratorOptions,
}

impl Dispatcher {
    pub fn new(catalog: TileCatalog, options: GeneratorOptions) -> Self {
        let options = GeneratorOptions {
            noise_backend: options.noise_backend.resolve(),
            region_count: options.region_count.max(1),
        };
        Dispatcher { catalog, options }
    }

    /// Dispatcher over the standard catalog.
    pub fn standard(options: GeneratorOptions) -> Result<Self, CatalogError> {
        Ok(Self::new(TileCatalog::standard()?, options))
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Generate one grid. Never fails: unknown themes and sizes fall back
    /// to terrain and `small`.
    pub fn generate(&self, theme: &str, size: &str, seed: i64) -> Grid {
        let algorithm = Algorithm::for_theme(theme);
        let map_size = MapSize::parse(size);
        let (width, height) = map_size.dimensions();
        let seeds = SeedBundle::derive(theme, size, seed);

        debug!(
            theme,
            algorithm = algorithm.name(),
            size = map_size.as_str(),
            seed,
            map_seed = seeds.map_seed,
            "Generating grid"
        );

        let layout = match algorithm {
            Algorithm::Terrain => TerrainGenerator::new(NoiseLayers::derive(
                self.options.noise_backend,
                seeds.map_seed,
            ))
            .layout(width, height),
            Algorithm::Voronoi => {
                VoronoiGenerator::new(rng_from_seed(seeds.map_seed), self.options.region_count)
                    .layout(width, height)
            }
            Algorithm::Cave => CaveGenerator::new(rng_from_seed(seeds.map_seed)).layout(width, height),
            Algorithm::Wfc => WfcGenerator::new(rng_from_seed(seeds.map_seed)).layout(width, height),
        };

        Grid::from_layout(width, &layout, &self.catalog)
    }

    pub fn generate_request(&self, request: &GenerationRequest) -> Grid {
        self.generate(&request.theme, &request.size, request.seed)
    }

    /// Generate many independent requests in parallel. Output order matches
    /// input order and each grid equals its serial counterpart.
    pub fn generate_batch(&self, requests: &[GenerationRequest]) -> Vec<Grid> {
        requests
            .par_iter()
            .map(|request| self.generate_request(request))
            .collect()
    }
}

/// Print a summary of a generated grid.
pub fn print_grid_summary(grid: &Grid) {
    println!("=== Grid Summary ===");
    println!("Size: {}x{}", grid.grid_columns, grid.height());
    println!("Cells: {}", grid.map.len());

    let total = grid.map.len().max(1) as f32;
    println!("\nBiomes:");
    for (biome, count) in grid.biome_counts() {
        let pct = count as f32 / total * 100.0;
        println!("  {:<12} {:>5} ({:.1}%)", biome, count, pct);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::generators::wfc::WFC_TILES;

    fn dispatcher() -> Dispatcher {
        Dispatcher::standard(GeneratorOptions::default()).unwrap()
    }

    fn hashed_dispatcher() -> Dispatcher {
        Dispatcher::standard(GeneratorOptions {
            noise_backend: NoiseBackend::Hashed,
            ..GeneratorOptions::default()
        })
        .unwrap()
    }

    fn assert_shape(grid: &Grid) {
        let columns = grid.grid_columns;
        assert!(columns > 0);
        let height = grid.map.len() as u32 / columns;
        assert_eq!(grid.map.len() as u32, columns * height);

        let mut seen = HashSet::new();
        for (i, cell) in grid.map.iter().enumerate() {
            assert!(cell.x < columns && cell.y < height);
            assert_eq!((cell.y * columns + cell.x) as usize, i, "not row-major");
            assert!(seen.insert((cell.x, cell.y)), "duplicate ({}, {})", cell.x, cell.y);
        }
    }

    #[test]
    fn theme_routing() {
        assert_eq!(Algorithm::for_theme("fantasy"), Algorithm::Terrain);
        assert_eq!(Algorithm::for_theme("Post-Apocalyptic"), Algorithm::Terrain);
        assert_eq!(Algorithm::for_theme("post-apoc"), Algorithm::Terrain);
        assert_eq!(Algorithm::for_theme("SCI-FI"), Algorithm::Voronoi);
        assert_eq!(Algorithm::for_theme("sci fi"), Algorithm::Voronoi);
        assert_eq!(Algorithm::for_theme("sci_fi"), Algorithm::Voronoi);
        assert_eq!(Algorithm::for_theme("Cyberpunk"), Algorithm::Wfc);
        assert_eq!(Algorithm::for_theme("dungeon"), Algorithm::Cave);
        assert_eq!(Algorithm::for_theme("caves"), Algorithm::Cave);
        assert_eq!(Algorithm::for_theme("steampunk"), Algorithm::Terrain);
        assert_eq!(Algorithm::for_theme(""), Algorithm::Terrain);
    }

    #[test]
    fn every_theme_yields_a_well_formed_grid() {
        let dispatcher = dispatcher();
        for theme in ["fantasy", "post-apocalyptic", "sci-fi", "cyberpunk", "dungeon", "unknown"] {
            for size in ["small", "medium", "large", "gigantic"] {
                let grid = dispatcher.generate(theme, size, 12345);
                assert_shape(&grid);
                let (w, h) = MapSize::parse(size).dimensions();
                assert_eq!(grid.grid_columns, w);
                assert_eq!(grid.height(), h);
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let first = dispatcher();
        for theme in ["fantasy", "sci-fi", "cyberpunk", "caves"] {
            let a = serde_json::to_vec(&first.generate(theme, "medium", 987)).unwrap();
            let b = serde_json::to_vec(&first.generate(theme, "medium", 987)).unwrap();
            assert_eq!(a, b, "theme {} not reproducible", theme);
        }

        // Two independently built dispatchers agree too.
        let other = dispatcher();
        assert_eq!(
            first.generate("fantasy", "large", -5),
            other.generate("fantasy", "large", -5)
        );
    }

    #[test]
    fn cyberpunk_small_scenario() {
        let dispatcher = dispatcher();
        let first = dispatcher.generate("cyberpunk", "small", 1);
        let second = dispatcher.generate("cyberpunk", "small", 1);
        assert_eq!(first, second);
        assert_eq!(first.grid_columns, 18);
        assert_eq!(first.height(), 12);
        assert_eq!(first.map.len(), 216);

        let allowed: HashSet<&str> = WFC_TILES.iter().map(|k| k.key()).collect();
        for cell in &first.map {
            assert!(allowed.contains(cell.biome.as_str()), "unexpected tile {}", cell.biome);
        }
    }

    #[test]
    fn dungeon_medium_scenario() {
        let grid = dispatcher().generate("dungeon", "medium", 7);
        assert_eq!(grid.grid_columns, 24);
        assert_eq!(grid.height(), 16);
        assert_eq!(grid.map.len(), 24 * 16);
        for cell in &grid.map {
            assert!(cell.biome == "rock" || cell.biome == "dungeon", "biome {}", cell.biome);
        }
    }

    #[test]
    fn theme_and_size_are_case_insensitive() {
        let dispatcher = dispatcher();
        assert_eq!(
            dispatcher.generate("CyberPunk", "SMALL", 3),
            dispatcher.generate("cyberpunk", "small", 3)
        );
    }

    #[test]
    fn different_seeds_usually_differ() {
        let dispatcher = hashed_dispatcher();
        let a = dispatcher.generate("fantasy", "small", 1);
        let b = dispatcher.generate("fantasy", "small", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn hashed_backend_terrain_is_deterministic() {
        let dispatcher = hashed_dispatcher();
        assert_eq!(dispatcher.options().noise_backend, NoiseBackend::Hashed);
        let a = dispatcher.generate("fantasy", "medium", 42);
        let b = dispatcher.generate("fantasy", "medium", 42);
        assert_eq!(a, b);
        assert_shape(&a);
    }

    #[test]
    fn batch_matches_serial() {
        let dispatcher = dispatcher();
        let requests: Vec<GenerationRequest> = (0..24)
            .map(|i| {
                let theme = ["fantasy", "sci-fi", "cyberpunk", "dungeon"][i % 4];
                GenerationRequest::new(theme, "small", i as i64)
            })
            .collect();

        let parallel = dispatcher.generate_batch(&requests);
        assert_eq!(parallel.len(), requests.len());
        for (request, grid) in requests.iter().zip(&parallel) {
            assert_eq!(grid, &dispatcher.generate_request(request));
        }
    }

    #[test]
    fn zero_region_option_is_clamped() {
        let dispatcher = Dispatcher::standard(GeneratorOptions {
            region_count: 0,
            ..GeneratorOptions::default()
        })
        .unwrap();
        assert_eq!(dispatcher.options().region_count, 1);
        let grid = dispatcher.generate("sci-fi", "small", 8);
        let biome = &grid.map[0].biome;
        assert!(grid.map.iter().all(|c| &c.biome == biome));
    }
}
