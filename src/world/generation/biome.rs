//! Height to biome color mapping

use crate::config::PaletteConfig;

/// Linear RGB, components may leave `[0, 1]` if the table is edited to do so
pub type Rgb = [f32; 3];

const BAND_COUNT: usize = 7;

/// Ordered color bands: deep water, shallow water, sand, grass, cold, stone, snow
///
/// Heights at or below the first threshold get the flat deep-water color.
/// Each later band blends from the previous band's color (at the previous
/// threshold) to its own color (at its threshold). Heights above the last
/// threshold get the flat snow color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomePalette {
    thresholds: [f32; BAND_COUNT],
    colors: [Rgb; BAND_COUNT],
}

impl Default for BiomePalette {
    fn default() -> Self {
        Self::from_config(&PaletteConfig::default())
    }
}

impl BiomePalette {
    pub fn from_config(config: &PaletteConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            colors: config.colors,
        }
    }

    pub fn thresholds(&self) -> &[f32; BAND_COUNT] {
        &self.thresholds
    }

    pub fn colors(&self) -> &[Rgb; BAND_COUNT] {
        &self.colors
    }

    /// Biome color for a raw (unshaped) height
    pub fn color_from_height(&self, height: f32) -> Rgb {
        if height <= self.thresholds[0] {
            return self.colors[0];
        }

        for band in 1..BAND_COUNT {
            let upper = self.thresholds[band];
            if height <= upper {
                let lower = self.thresholds[band - 1];
                let value = (height - lower) / (upper - lower);
                return lerp_rgb(self.colors[band - 1], self.colors[band], value);
            }
        }

        self.colors[BAND_COUNT - 1]
    }
}

/// Unclamped linear blend from `from` (t = 0) to `to` (t = 1)
pub fn lerp_rgb(from: Rgb, to: Rgb, t: f32) -> Rgb {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::palette::*;

    fn assert_rgb_close(actual: Rgb, expected: Rgb) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-5,
                "color {:?} != {:?}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_flat_color_below_lowest_threshold() {
        let palette = BiomePalette::default();
        assert_eq!(palette.color_from_height(DEEP_HEIGHT), DEEP_COLOR);
        assert_eq!(palette.color_from_height(0.2), DEEP_COLOR);
        assert_eq!(palette.color_from_height(-3.0), DEEP_COLOR);
    }

    #[test]
    fn test_flat_color_above_highest_threshold() {
        let palette = BiomePalette::default();
        assert_eq!(palette.color_from_height(0.65), SNOW_COLOR);
        assert_eq!(palette.color_from_height(1.0), SNOW_COLOR);
        assert_eq!(palette.color_from_height(42.0), SNOW_COLOR);
    }

    #[test]
    fn test_band_endpoints_hit_exact_colors() {
        let palette = BiomePalette::default();
        let thresholds = *palette.thresholds();
        let colors = *palette.colors();
        for band in 1..7 {
            assert_rgb_close(palette.color_from_height(thresholds[band]), colors[band]);
        }
        assert_rgb_close(palette.color_from_height(SNOW_HEIGHT), SNOW_COLOR);
    }

    #[test]
    fn test_band_midpoint_blends() {
        let palette = BiomePalette::default();
        let mid = (COLD_HEIGHT + STONE_HEIGHT) / 2.0;
        assert_rgb_close(
            palette.color_from_height(mid),
            [
                (COLD_COLOR[0] + STONE_COLOR[0]) / 2.0,
                (COLD_COLOR[1] + STONE_COLOR[1]) / 2.0,
                (COLD_COLOR[2] + STONE_COLOR[2]) / 2.0,
            ],
        );
    }

    #[test]
    fn test_sweep_stays_within_table_colors() {
        // Blends never extrapolate, so every component stays inside the
        // min/max of the table.
        let palette = BiomePalette::default();
        let colors = palette.colors();
        for i in 0..=1000 {
            let color = palette.color_from_height(i as f32 / 1000.0);
            for c in 0..3 {
                let min = colors.iter().map(|rgb| rgb[c]).fold(f32::MAX, f32::min);
                let max = colors.iter().map(|rgb| rgb[c]).fold(f32::MIN, f32::max);
                assert!(color[c] >= min - 1e-6 && color[c] <= max + 1e-6);
            }
        }
    }
}
