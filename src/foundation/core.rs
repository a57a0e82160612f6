use crate::foundation::error::{ExportError, ExportResult};

pub use glam::{DMat4, DVec3};

/// Host frame number. Hosts allow negative frames.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameNumber(pub i64);

/// Inclusive host frame range sampled every `step` frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameNumber,
    pub end: FrameNumber, // inclusive
    pub step: u32,
}

impl FrameRange {
    pub fn new(start: FrameNumber, end: FrameNumber, step: u32) -> ExportResult<Self> {
        if step == 0 {
            return Err(ExportError::validation("frame step must be > 0"));
        }
        if start.0 > end.0 {
            return Err(ExportError::validation("frame range start must be <= end"));
        }
        Ok(Self { start, end, step })
    }

    /// Sampled frames in increasing order.
    pub fn frames(self) -> impl Iterator<Item = FrameNumber> {
        (self.start.0..=self.end.0)
            .step_by(self.step as usize)
            .map(FrameNumber)
    }

    pub fn len_frames(self) -> u64 {
        self.frames().count() as u64
    }

    pub fn is_first(self, f: FrameNumber) -> bool {
        f == self.start
    }
}

/// Linear RGB color.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color(pub f64, pub f64, pub f64);

impl Color {
    pub const BLACK: Self = Self(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self(1.0, 1.0, 1.0);

    pub fn gray(v: f64) -> Self {
        Self(v, v, v)
    }

    pub fn with_alpha(self, a: f64) -> AColor {
        AColor(self.0, self.1, self.2, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Linear RGB color with alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AColor(pub f64, pub f64, pub f64, pub f64);

/// Host world matrix.
///
/// Serialized row-major (`m[row][col]`, translation in the last column) the way the host exposes
/// it; stored as a column-major [`DMat4`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[[f64; 4]; 4]", into = "[[f64; 4]; 4]")]
pub struct Matrix4(pub DMat4);

impl Matrix4 {
    pub const IDENTITY: Self = Self(DMat4::IDENTITY);

    pub fn from_translation(t: DVec3) -> Self {
        Self(DMat4::from_translation(t))
    }

    pub fn translation(self) -> DVec3 {
        self.0.w_axis.truncate()
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[[f64; 4]; 4]> for Matrix4 {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        Self(DMat4::from_cols_array_2d(&rows).transpose())
    }
}

impl From<Matrix4> for [[f64; 4]; 4] {
    fn from(m: Matrix4) -> Self {
        m.0.transpose().to_cols_array_2d()
    }
}

/// Approximate color of a black body at `kelvin`, normalized to `[0, 1]`.
pub fn kelvin_to_rgb(kelvin: f64) -> Color {
    let t = kelvin.clamp(1000.0, 40000.0) / 100.0;

    let r = if t <= 66.0 {
        255.0
    } else {
        329.698_727_446 * (t - 60.0).powf(-0.133_204_759_2)
    };
    let g = if t <= 66.0 {
        99.470_802_586_1 * t.ln() - 161.119_568_166_1
    } else {
        288.122_169_528_3 * (t - 60.0).powf(-0.075_514_849_2)
    };
    let b = if t >= 66.0 {
        255.0
    } else if t <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * (t - 10.0).ln() - 305.044_792_730_7
    };

    let norm = |v: f64| (v / 255.0).clamp(0.0, 1.0);
    Color(norm(r), norm(g), norm(b))
}
