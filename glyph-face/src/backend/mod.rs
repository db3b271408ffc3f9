//! Font format backends.

#[cfg(feature = "sfnt")]
pub(crate) mod sfnt;
