//! Face configuration.

use glyph_types::F26Dot6;
use thiserror::Error;

/// How glyph outlines are fitted to the pixel grid.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hinting {
    /// Outlines are scaled without adjustment.
    #[default]
    None,
    /// Only vertical positions are fitted.
    Vertical,
    /// Both axes are fitted.
    Full,
}

/// Options for creating an [`OutlineFace`](crate::OutlineFace).
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaceOptions {
    /// Font size in points.
    pub size: f64,
    /// Dots per inch of the target device.
    pub dpi: f64,
    pub hinting: Hinting,
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            size: 12.0,
            dpi: 72.0,
            hinting: Hinting::None,
        }
    }
}

impl FaceOptions {
    /// Returns the number of 26.6 pixels per em.
    ///
    /// A point is 1/72 of an inch, so the scale is `size * dpi / 72` pixels,
    /// rounded to the nearest 1/64.
    pub fn scale(&self) -> Result<F26Dot6, FaceError> {
        let invalid = FaceError::InvalidScale {
            size: self.size,
            dpi: self.dpi,
        };
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.size) || !valid(self.dpi) {
            return Err(invalid);
        }
        let bits = (0.5 + self.size * self.dpi * 64.0 / 72.0).floor();
        if bits < 1.0 || bits > i32::MAX as f64 {
            return Err(invalid);
        }
        Ok(F26Dot6::from_bits(bits as i32))
    }
}

/// Errors from creating a face.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FaceError {
    #[error("invalid scale for size {size} at {dpi} dpi")]
    InvalidScale { size: f64, dpi: f64 },
}
