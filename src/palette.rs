//! Palette queue cycled over output lines.

use anyhow::{Result, anyhow};

use crate::color::Color;
use crate::flags::{Catalogue, DEFAULT_FLAG, Flag};

/// Colors of the selected flags, concatenated in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// An empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the palette for a list of selected flags.
    ///
    /// Falls back to the default flag when `selected` is empty, so the
    /// result is never empty.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected and the catalogue lacks the
    /// default flag.
    pub fn from_selection(selected: &[&Flag], catalogue: &Catalogue) -> Result<Self> {
        let mut palette = Self::new();
        for flag in selected {
            palette.append(flag);
        }
        if palette.is_empty() {
            let default = catalogue
                .get(DEFAULT_FLAG)
                .ok_or_else(|| anyhow!("Flag catalogue has no '{DEFAULT_FLAG}' flag"))?;
            palette.append(default);
        }
        Ok(palette)
    }

    /// Append all colors of `flag`, in order.
    pub fn append(&mut self, flag: &Flag) {
        self.colors.extend_from_slice(&flag.colors);
    }

    /// Color for line `index`, wrapping around the palette length.
    ///
    /// # Panics
    ///
    /// Panics if the palette is empty. `from_selection` never returns an
    /// empty palette.
    #[must_use]
    pub fn color_at(&self, index: usize) -> Color {
        assert!(!self.colors.is_empty(), "color_at on an empty palette");
        self.colors[index % self.colors.len()]
    }

    /// Number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no flag has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(name: &str, colors: &[u32]) -> Flag {
        Flag {
            name: name.to_string(),
            colors: colors.iter().copied().map(Color::from_packed).collect(),
            description: String::new(),
        }
    }

    #[test]
    fn test_append_keeps_selection_order() {
        let mut palette = Palette::new();
        palette.append(&flag("a", &[0x01, 0x02]));
        palette.append(&flag("b", &[0x03]));
        palette.append(&flag("a", &[0x01, 0x02]));

        let colors: Vec<u32> = (0..palette.len())
            .map(|i| u32::from(palette.color_at(i).b))
            .collect();
        assert_eq!(colors, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_color_at_wraps() {
        let mut palette = Palette::new();
        palette.append(&flag("a", &[0x10, 0x20, 0x30]));
        assert_eq!(palette.color_at(0), palette.color_at(3));
        assert_eq!(palette.color_at(2), palette.color_at(302));
        assert_eq!(palette.color_at(4).b, 0x20);
    }

    #[test]
    fn test_from_selection_defaults_to_lgbt() -> Result<()> {
        let catalogue = Catalogue::builtin()?;
        let palette = Palette::from_selection(&[], &catalogue)?;
        assert_eq!(palette.len(), 6);
        assert_eq!(palette.color_at(0), Color::from_packed(0xE40303));
        Ok(())
    }

    #[test]
    fn test_from_selection_concatenates() -> Result<()> {
        let catalogue = Catalogue::builtin()?;
        let trans = catalogue.resolve("trans").ok_or_else(|| anyhow!("trans"))?;
        let bi = catalogue.resolve("bi").ok_or_else(|| anyhow!("bi"))?;
        let palette = Palette::from_selection(&[trans, bi], &catalogue)?;
        assert_eq!(palette.len(), 10);
        assert_eq!(palette.color_at(0), Color::from_packed(0x5BCEFA));
        assert_eq!(palette.color_at(5), Color::from_packed(0xD60270));
        Ok(())
    }

    #[test]
    fn test_from_selection_without_default() {
        let catalogue = Catalogue::default();
        assert!(Palette::from_selection(&[], &catalogue).is_err());
    }

    #[test]
    #[should_panic(expected = "empty palette")]
    fn test_color_at_empty_panics() {
        let _ = Palette::new().color_at(0);
    }
}
