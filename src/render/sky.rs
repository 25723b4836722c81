//! Day-night sky interpolation
//!
//! The sim exposes the cycle as a phase in [0, 1); mapping it to a color is
//! purely presentational and lives here so it can be unit tested without a
//! canvas.

use crate::lerp;

/// Daytime backdrop, a muted roadside green
pub const DAY: [f32; 3] = [10.0, 42.0, 10.0];
/// Night backdrop
pub const NIGHT: [f32; 3] = [4.0, 8.0, 24.0];

/// Blend factor for a cycle phase: 0 at full day, 1 at full night,
/// smooth and periodic
#[inline]
pub fn night_amount(phase: f32) -> f32 {
    0.5 - 0.5 * (std::f32::consts::TAU * phase).cos()
}

/// Sky color for a day-night phase
pub fn sky_color(phase: f32) -> [u8; 3] {
    let t = night_amount(phase);
    [
        lerp(DAY[0], NIGHT[0], t).round() as u8,
        lerp(DAY[1], NIGHT[1], t).round() as u8,
        lerp(DAY[2], NIGHT[2], t).round() as u8,
    ]
}

/// CSS color string for a sky color
pub fn css_color(rgb: [u8; 3]) -> String {
    format!("rgb({}, {}, {})", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(sky_color(0.0), [10, 42, 10]);
        assert_eq!(sky_color(0.5), [4, 8, 24]);
    }

    #[test]
    fn test_periodic_and_symmetric() {
        assert!((night_amount(0.0) - night_amount(0.999_999)).abs() < 1e-3);
        assert!((night_amount(0.25) - night_amount(0.75)).abs() < 1e-6);
    }

    #[test]
    fn test_blend_is_bounded() {
        for i in 0..100 {
            let t = night_amount(i as f32 / 100.0);
            assert!((0.0..=1.0).contains(&t));
        }
    }

    #[test]
    fn test_css_format() {
        assert_eq!(css_color([10, 42, 10]), "rgb(10, 42, 10)");
    }
}
