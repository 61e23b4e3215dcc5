//! Deterministic world-grid generation.
//!
//! A `(theme, size, seed)` request is routed to one of four algorithms
//! (noise terrain, Voronoi regions, cellular-automata caves, wave function
//! collapse) and shaped into a row-major [`world::Grid`]. Identical requests
//! always produce identical grids, and no generator shares random state, so
//! requests can run on any number of threads.

pub mod cli;
pub mod config;
pub mod generators;
pub mod world;
