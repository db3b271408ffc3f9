use glyph_types::{F26Dot6, Point};

/// Font wide metrics in 26.6 pixels.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Recommended distance between consecutive baselines.
    pub height: F26Dot6,
    /// Distance from the top of a line to its baseline.
    pub ascent: F26Dot6,
    /// Distance from the baseline to the bottom of a line. Positive values
    /// are below the baseline.
    pub descent: F26Dot6,
    /// Distance from the baseline to the top of non-ascending lowercase
    /// letters.
    pub x_height: F26Dot6,
    /// Distance from the baseline to the top of flat capital letters.
    pub cap_height: F26Dot6,
    /// Slope of the caret as a run and rise. Upright fonts use (0, 1).
    pub caret_slope: Point<i32>,
}
