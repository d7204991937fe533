//! Equirectangular HDRI to cubemap conversion
//!
//! The environment asset is a single equirectangular `.hdr` image, while the
//! renderer's environment lighting wants a cubemap. Faces are produced in
//! the usual layer order (+X, -X, +Y, -Y, +Z, -Z), each `face_size` texels
//! square and row-major, with `v` pointing down the face.

use glam::Vec3;
use std::f32::consts::PI;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CubemapError {
    #[error("Source image is empty")]
    EmptySource,
    #[error("Source has {actual} texels, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Cubemap face size must be non-zero")]
    ZeroFaceSize,
}

/// Cubemap face, in layer order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Unnormalized direction through face coordinates `u`, `v` in `-1..=1`
    pub fn direction(self, u: f32, v: f32) -> Vec3 {
        match self {
            CubeFace::PositiveX => Vec3::new(1.0, -v, -u),
            CubeFace::NegativeX => Vec3::new(-1.0, -v, u),
            CubeFace::PositiveY => Vec3::new(u, 1.0, v),
            CubeFace::NegativeY => Vec3::new(u, -1.0, -v),
            CubeFace::PositiveZ => Vec3::new(u, -v, 1.0),
            CubeFace::NegativeZ => Vec3::new(-u, -v, -1.0),
        }
    }
}

/// Linear RGBA float image in equirectangular layout
#[derive(Debug, Clone)]
pub struct EquirectImage {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
}

impl EquirectImage {
    pub fn new(width: u32, height: u32, texels: Vec<[f32; 4]>) -> Result<Self, CubemapError> {
        if width == 0 || height == 0 {
            return Err(CubemapError::EmptySource);
        }
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(CubemapError::SizeMismatch {
                width,
                height,
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Decode tightly packed little-endian `Rgba32Float` texel data
    pub fn from_rgba32f_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, CubemapError> {
        let texels = bytes
            .chunks_exact(16)
            .map(|texel| {
                let mut rgba = [0.0f32; 4];
                for (channel, raw) in rgba.iter_mut().zip(texel.chunks_exact(4)) {
                    *channel = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                }
                rgba
            })
            .collect();
        Self::new(width, height, texels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Bilinear sample at normalized coordinates, wrapping horizontally
    pub fn sample(&self, s: f32, t: f32) -> [f32; 4] {
        let x = s * self.width as f32 - 0.5;
        let y = t * self.height as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let a = self.texel(x0, y0);
        let b = self.texel(x0 + 1, y0);
        let c = self.texel(x0, y0 + 1);
        let d = self.texel(x0 + 1, y0 + 1);

        let mut out = [0.0; 4];
        for i in 0..4 {
            let top = a[i] + (b[i] - a[i]) * fx;
            let bottom = c[i] + (d[i] - c[i]) * fx;
            out[i] = top + (bottom - top) * fy;
        }
        out
    }

    /// Sample along a world direction
    pub fn sample_direction(&self, direction: Vec3) -> [f32; 4] {
        let d = direction.normalize_or(Vec3::Y);
        let s = d.z.atan2(d.x) / (2.0 * PI) + 0.5;
        let t = d.y.clamp(-1.0, 1.0).acos() / PI;
        self.sample(s, t)
    }
}

/// Resample an equirectangular image into six cubemap faces
pub fn equirect_to_cubemap(
    source: &EquirectImage,
    face_size: u32,
) -> Result<Vec<[f32; 4]>, CubemapError> {
    if face_size == 0 {
        return Err(CubemapError::ZeroFaceSize);
    }

    let size = face_size as usize;
    let mut texels = Vec::with_capacity(size * size * 6);
    for face in CubeFace::ALL {
        for y in 0..size {
            let v = 2.0 * (y as f32 + 0.5) / face_size as f32 - 1.0;
            for x in 0..size {
                let u = 2.0 * (x as f32 + 0.5) / face_size as f32 - 1.0;
                texels.push(source.sample_direction(face.direction(u, v)));
            }
        }
    }

    tracing::debug!(
        source_width = source.width,
        source_height = source.height,
        face_size,
        "Built environment cubemap"
    );
    Ok(texels)
}

/// Encode texels as tightly packed little-endian `Rgba16Float`
pub fn to_rgba16f_bytes(texels: &[[f32; 4]]) -> Vec<u8> {
    texels
        .iter()
        .flatten()
        .flat_map(|c| half::f16::from_f32(*c).to_le_bytes())
        .collect()
}
