//! Deterministic 2-D scalar noise.
//!
//! Two interchangeable backends sit behind [`NoiseField`]: fractal Perlin
//! noise from the `noise` crate, and a hashed value-noise fallback that
//! reseeds a private generator per coordinate. The backend is chosen once,
//! when the field is built, never per sample.

#[cfg(feature = "coherent-noise")]
use ::noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::world::seed::rng_from_seed;

#[cfg(feature = "coherent-noise")]
const OCTAVES: usize = 4;
#[cfg(feature = "coherent-noise")]
const PERSISTENCE: f64 = 0.5;
#[cfg(feature = "coherent-noise")]
const LACUNARITY: f64 = 2.0;

const HASH_X: f64 = 73_856_093.0;
const HASH_Y: f64 = 19_349_663.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseBackend {
    Coherent,
    Hashed,
}

impl NoiseBackend {
    /// Whether coherent noise was compiled in.
    pub fn coherent_available() -> bool {
        cfg!(feature = "coherent-noise")
    }

    /// Coherent noise when compiled in, hashed otherwise.
    pub fn preferred() -> NoiseBackend {
        if Self::coherent_available() {
            NoiseBackend::Coherent
        } else {
            NoiseBackend::Hashed
        }
    }

    /// Downgrade a requested backend to what this build can actually provide.
    pub fn resolve(self) -> NoiseBackend {
        match self {
            NoiseBackend::Coherent if !Self::coherent_available() => NoiseBackend::Hashed,
            other => other,
        }
    }

    pub fn parse(name: &str) -> Option<NoiseBackend> {
        match name.trim().to_lowercase().as_str() {
            "coherent" => Some(NoiseBackend::Coherent),
            "hashed" => Some(NoiseBackend::Hashed),
            _ => None,
        }
    }
}

impl Default for NoiseBackend {
    fn default() -> Self {
        NoiseBackend::preferred()
    }
}

/// A seeded noise layer. `sample` returns values in roughly `[-1, 1]`.
pub enum NoiseField {
    #[cfg(feature = "coherent-noise")]
    Coherent(Fbm<Perlin>),
    Hashed(HashedValueNoise),
}

impl NoiseField {
    pub fn new(backend: NoiseBackend, seed: u32) -> Self {
        match backend.resolve() {
            #[cfg(feature = "coherent-noise")]
            NoiseBackend::Coherent => NoiseField::Coherent(
                Fbm::<Perlin>::new(seed)
                    .set_octaves(OCTAVES)
                    .set_persistence(PERSISTENCE)
                    .set_lacunarity(LACUNARITY),
            ),
            _ => NoiseField::Hashed(HashedValueNoise { seed }),
        }
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        match self {
            #[cfg(feature = "coherent-noise")]
            NoiseField::Coherent(fbm) => fbm.get([x, y]),
            NoiseField::Hashed(hashed) => hashed.sample(x, y),
        }
    }

    pub fn backend(&self) -> NoiseBackend {
        match self {
            #[cfg(feature = "coherent-noise")]
            NoiseField::Coherent(_) => NoiseBackend::Coherent,
            NoiseField::Hashed(_) => NoiseBackend::Hashed,
        }
    }
}

/// Per-coordinate value noise with no spatial smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedValueNoise {
    seed: u32,
}

impl HashedValueNoise {
    pub fn new(seed: u32) -> Self {
        HashedValueNoise { seed }
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut rng = rng_from_seed(spatial_hash(x, y) ^ self.seed);
        rng.r#gen::<f64>() * 2.0 - 1.0
    }
}

/// `trunc(x * 73856093) XOR trunc(y * 19349663)`, masked to 32 bits.
fn spatial_hash(x: f64, y: f64) -> u32 {
    let hx = (x * HASH_X) as i64;
    let hy = (y * HASH_Y) as i64;
    ((hx ^ hy) & 0xFFFF_FFFF) as u32
}
