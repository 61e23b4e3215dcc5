pub mod generation;
pub mod noise;
pub mod seed;
pub mod tile;
pub mod topology;

pub use generation::{Algorithm, Dispatcher, GenerationRequest, GeneratorOptions};
pub use seed::SeedBundle;
pub use tile::{CatalogError, Difficulty, TileArchetype, TileCatalog, TileKind};
pub use topology::{Cell, Grid, MapSize};
