use std::fmt;

use serde::{
    Serialize,
    Serializer,
};

const SATURATION: f64 = 0.8;
const VALUE: f64 = 0.9;

/// Maps an average interval onto `[0, 1)`, relative to the interval considered strong.
///
/// `x = avg / strong`, `1 - 1 / (x + 1)^2`. Zero at zero, approaches one as the
/// interval grows.
pub fn strength(avg_interval: f64, strong_interval: u32) -> f64 {
    let x = avg_interval / strong_interval.max(1) as f64 + 1.0;
    1.0 - 1.0 / (x * x)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Parses `#RGB` or `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#').filter(|digits| digits.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Rgb(channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?)),
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn channel(x: f64) -> u8 {
    (x * 256.0).round().clamp(0.0, 255.0) as u8
}

pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let sector = (hue * 6.0).floor();
    let f = hue * 6.0 - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    Rgb(channel(r), channel(g), channel(b))
}

/// Red for weak through green for strong, using the lower half of the hue wheel.
pub fn color_for(strength: f64) -> Rgb {
    hsv_to_rgb(strength.clamp(0.0, 1.0) / 2.0, SATURATION, VALUE)
}

/// Swatches for the weak-to-strong key at the top of the grid.
pub fn key_colors() -> Vec<Rgb> {
    (0..=6).map(|n| color_for(n as f64 / 6.0)).collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Rgb::from_hex("#FFF"), Some(Rgb(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#e62e2e"), Some(Rgb(0xE6, 0x2E, 0x2E)));
        assert_eq!(Rgb::from_hex(&color_for(0.3).to_hex()), Some(color_for(0.3)));
        assert_eq!(Rgb::from_hex("EEE"), None);
        assert_eq!(Rgb::from_hex("#日"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
    }

    #[test]
    fn zero_interval_is_zero_strength() {
        assert_eq!(strength(0.0, 21), 0.0);
    }

    #[test]
    fn strong_interval_scores_three_quarters() {
        assert!((strength(21.0, 21) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn colors_run_red_to_green() {
        assert_eq!(color_for(0.0), Rgb(230, 46, 46));
        assert_eq!(color_for(0.0).to_hex(), "#E62E2E");
        let Rgb(r, g, b) = color_for(0.66);
        assert!(g > r && g > b, "strong should be green, got {:?}", color_for(0.66));
        assert_eq!(key_colors().len(), 7);
        assert_eq!(key_colors()[0], color_for(0.0));
    }

    proptest! {
        #[test]
        fn strength_is_bounded(interval in 0.0f64..100_000.0, strong in 1u32..1000) {
            let s = strength(interval, strong);
            prop_assert!(s >= 0.0);
            prop_assert!(s < 1.0);
        }

        #[test]
        fn strength_is_increasing(a in 0.0f64..5_000.0, delta in 0.01f64..100.0, strong in 1u32..400) {
            prop_assert!(strength(a + delta, strong) > strength(a, strong));
        }

        #[test]
        fn color_is_total(s in 0.0f64..=1.0) {
            let hex = color_for(s).to_hex();
            prop_assert_eq!(hex.len(), 7);
        }
    }
}
