//! Readability adjustment applied to colors right before they are emitted.

use crate::color::Color;

/// Lighten or darken transform keeping colors readable on the terminal
/// background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Adjustment {
    /// Colors are emitted unchanged.
    #[default]
    None,
    /// Scale to 3/4 and raise by 64, for dark backgrounds.
    Lighten,
    /// Scale to 3/4, for light backgrounds.
    Darken,
}

impl Adjustment {
    /// Apply the adjustment to `color`.
    ///
    /// `Lighten` cannot overflow: 64 + 255 * 3 / 4 = 255.
    ///
    /// ```
    /// # use pridecat::{adjust::Adjustment, color::Color};
    /// let white = Color::new(255, 255, 255);
    /// assert_eq!(Adjustment::Darken.apply(white), Color::new(191, 191, 191));
    /// assert_eq!(Adjustment::Lighten.apply(white), white);
    /// ```
    #[must_use]
    pub fn apply(self, color: Color) -> Color {
        // at most 191
        #[allow(clippy::cast_possible_truncation)]
        let scale = |channel: u8| (u16::from(channel) * 3 / 4) as u8;

        match self {
            Self::None => color,
            Self::Darken => Color::new(scale(color.r), scale(color.g), scale(color.b)),
            Self::Lighten => Color::new(
                64 + scale(color.r),
                64 + scale(color.g),
                64 + scale(color.b),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [Color; 6] = [
        Color::new(0, 0, 0),
        Color::new(255, 255, 255),
        Color::new(228, 3, 3),
        Color::new(1, 2, 3),
        Color::new(91, 206, 250),
        Color::new(128, 64, 192),
    ];

    #[test]
    fn test_none_is_identity() {
        for color in SAMPLES {
            assert_eq!(Adjustment::None.apply(color), color);
        }
    }

    #[test]
    fn test_darken() {
        assert_eq!(Adjustment::Darken.apply(Color::new(228, 3, 3)), Color::new(171, 2, 2));
        assert_eq!(Adjustment::Darken.apply(Color::new(0, 0, 0)), Color::new(0, 0, 0));
        assert_eq!(Adjustment::Darken.apply(Color::new(1, 2, 3)), Color::new(0, 1, 2));
    }

    #[test]
    fn test_lighten() {
        assert_eq!(Adjustment::Lighten.apply(Color::new(0, 0, 0)), Color::new(64, 64, 64));
        assert_eq!(Adjustment::Lighten.apply(Color::new(228, 3, 3)), Color::new(235, 66, 66));
        assert_eq!(
            Adjustment::Lighten.apply(Color::new(255, 255, 255)),
            Color::new(255, 255, 255)
        );
    }

    #[test]
    fn test_darken_never_raises_a_channel() {
        for r in 0..=255u8 {
            let color = Color::new(r, 255 - r, r / 2);
            let once = Adjustment::Darken.apply(color);
            let twice = Adjustment::Darken.apply(once);
            for (adjusted, original) in [(twice.r, r), (twice.g, 255 - r), (twice.b, r / 2)] {
                assert!(adjusted <= original);
            }
            assert!(twice.r <= once.r && once.r <= color.r);
        }
    }

    #[test]
    fn test_lighten_never_lowers_a_channel() {
        for r in 0..=255u8 {
            let color = Color::new(r, 255 - r, r / 2);
            let lighter = Adjustment::Lighten.apply(color);
            assert!(lighter.r >= color.r);
            assert!(lighter.g >= color.g);
            assert!(lighter.b >= color.b);
        }
    }
}
