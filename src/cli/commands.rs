use std::time::Instant;

use clap::ValueEnum;
use rand::Rng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::generation::GenerationConfig;
use crate::world::generation::{Algorithm, Dispatcher, GenerationRequest, print_grid_summary};
use crate::world::seed::SeedBundle;
use crate::world::topology::{Grid, MapSize};

/// Highest seed handed out when the caller does not supply one.
const MAX_RANDOM_SEED: i64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Map response as JSON
    Json,
    /// One row of tile symbols per line
    Ascii,
    /// Biome distribution
    Summary,
}

/// The JSON document printed by `generate --format json`.
#[derive(Debug, Serialize)]
pub struct MapResponse<'a> {
    pub theme: &'a str,
    pub size: &'a str,
    pub seed: i64,
    pub algorithm: &'static str,
    #[serde(flatten)]
    pub grid: &'a Grid,
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &GenerationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pixelsaga={}", config.log_level)));
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

/// Pick a seed for requests that did not bring one.
pub fn random_user_seed() -> i64 {
    rand::thread_rng().gen_range(1..=MAX_RANDOM_SEED)
}

fn build_dispatcher(config: &GenerationConfig) -> Result<Dispatcher, String> {
    Dispatcher::standard(config.generator_options())
        .map_err(|e| format!("Invalid tile catalog: {}", e))
}

/// Generate one grid and print it.
pub fn generate(
    config: &GenerationConfig,
    theme: Option<&str>,
    size: Option<&str>,
    seed: Option<i64>,
    format: OutputFormat,
) -> Result<(), String> {
    let dispatcher = build_dispatcher(config)?;
    let theme = theme.unwrap_or(&config.theme);
    let size = size.unwrap_or(&config.size);
    let seed = seed.unwrap_or_else(random_user_seed);
    let algorithm = Algorithm::for_theme(theme);

    let started = Instant::now();
    let grid = dispatcher.generate(theme, size, seed);
    info!(
        theme,
        size,
        seed,
        algorithm = algorithm.name(),
        cells = grid.map.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Grid generated"
    );

    match format {
        OutputFormat::Json => {
            let response = MapResponse {
                theme,
                size,
                seed,
                algorithm: algorithm.name(),
                grid: &grid,
            };
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| format!("Cannot encode grid: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Ascii => {
            println!("Seed: {} ({} / {})", seed, theme, algorithm.name());
            print!("{}", grid.render_ascii());
        }
        OutputFormat::Summary => {
            println!("Seed: {} ({} / {})", seed, theme, algorithm.name());
            print_grid_summary(&grid);
        }
    }
    Ok(())
}

/// Print the derived seed bundle for a request.
pub fn show_seeds(theme: &str, size: &str, seed: i64) {
    let bundle = SeedBundle::derive(theme, size, seed);
    println!("=== Seeds for {} / {} / {} ===", theme, size, seed);
    println!("  base:  {:>10}", bundle.base);
    println!("  map:   {:>10}", bundle.map_seed);
    println!("  quest: {:>10}", bundle.quest_seed);
    println!("  asset: {:>10}", bundle.asset_seed);
}

/// Generate `count` consecutive seeds starting at `from`, in parallel.
pub fn batch(
    config: &GenerationConfig,
    theme: Option<&str>,
    size: Option<&str>,
    from: i64,
    count: u32,
) -> Result<(), String> {
    if count == 0 {
        return Err("count must be > 0".to_string());
    }
    let dispatcher = build_dispatcher(config)?;
    let theme = theme.unwrap_or(&config.theme);
    let size = size.unwrap_or(&config.size);

    let requests: Vec<GenerationRequest> = (0..count as i64)
        .map(|i| GenerationRequest::new(theme, size, from + i))
        .collect();

    let started = Instant::now();
    let grids = dispatcher.generate_batch(&requests);
    info!(
        count,
        theme,
        size = MapSize::parse(size).as_str(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Batch generated"
    );

    println!("{:>12}  {:<8}  Biomes", "Seed", "Grid");
    println!("{}", "-".repeat(60));
    for (request, grid) in requests.iter().zip(&grids) {
        let biomes: Vec<String> = grid
            .biome_counts()
            .into_iter()
            .map(|(biome, n)| format!("{}={}", biome, n))
            .collect();
        println!(
            "{:>12}  {:<8}  {}",
            request.seed,
            format!("{}x{}", grid.grid_columns, grid.height()),
            biomes.join(" ")
        );
    }
    Ok(())
}
