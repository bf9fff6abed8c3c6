//! Material parameters for tooth surfaces
//!
//! The renderer owns shading; these are just the PBR-ish parameters the
//! viewer has always used for enamel and root surfaces, carried on the
//! scene boundary so every front end agrees on the look.

/// Surface parameters for a standard PBR material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// Base color, linear RGB in `[0, 1]`
    pub color: [f32; 3],

    /// Metalness factor
    pub metalness: f32,

    /// Roughness factor
    pub roughness: f32,
}

impl MaterialParams {
    /// Enamel look for crown surfaces
    pub fn crown() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.1,
            roughness: 0.91,
        }
    }

    /// Slightly darker, glossier look for root surfaces
    pub fn root() -> Self {
        Self {
            color: [0.933, 0.933, 0.933],
            metalness: 0.1,
            roughness: 0.118,
        }
    }
}
