pub mod cave;
pub mod terrain;
pub mod voronoi;
pub mod wfc;

pub use cave::CaveGenerator;
pub use terrain::TerrainGenerator;
pub use voronoi::VoronoiGenerator;
pub use wfc::WfcGenerator;

use crate::world::topology::Placement;

/// A grid algorithm. Implementations own their random source or noise
/// layers, handed in at construction; `layout` returns exactly
/// `width * height` placements in row-major order.
pub trait GridGenerator {
    fn layout(&mut self, width: u32, height: u32) -> Vec<Placement>;
}
