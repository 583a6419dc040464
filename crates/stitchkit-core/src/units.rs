//! Unit conversion between screen pixels and world units.
//!
//! World units are tenths of a millimetre, so one inch is 254 units. Screen
//! pixels map to world units through the display dpi.

/// World units per inch.
pub const WORLD_UNITS_PER_INCH: f64 = 254.0;

/// Default screen resolution assumed when none is configured.
pub const DEFAULT_SCREEN_DPI: f64 = 96.0;

/// Converts a pixel length to world units at `dpi`.
pub fn px_to_world(px: f64, dpi: f64) -> f64 {
    px / dpi * WORLD_UNITS_PER_INCH
}

/// Converts a world length to pixels at `dpi`.
pub fn world_to_px(world: f64, dpi: f64) -> f64 {
    world / WORLD_UNITS_PER_INCH * dpi
}

/// Pixels per world unit at `dpi`.
///
/// Used to turn a maximum-dpi zoom cap into a scale limit.
pub fn dpi_to_px_per_world(dpi: f64) -> f64 {
    dpi / WORLD_UNITS_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_world_roundtrip() {
        let world = px_to_world(96.0, DEFAULT_SCREEN_DPI);
        assert!((world - 254.0).abs() < 1e-9);
        assert!((world_to_px(world, DEFAULT_SCREEN_DPI) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_dpi_scale() {
        assert!((dpi_to_px_per_world(254.0) - 1.0).abs() < 1e-12);
    }
}
