//! Continent color palette.

use std::fmt;

/// Plain RGB color, converted to backend colors at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// d3 schemeCategory10
pub const CATEGORY10: [Rgb; 10] = [
    Rgb::new(31, 119, 180),  // Blue
    Rgb::new(255, 127, 14),  // Orange
    Rgb::new(44, 160, 44),   // Green
    Rgb::new(214, 39, 40),   // Red
    Rgb::new(148, 103, 189), // Purple
    Rgb::new(140, 86, 75),   // Brown
    Rgb::new(227, 119, 194), // Pink
    Rgb::new(127, 127, 127), // Grey
    Rgb::new(188, 189, 34),  // Olive
    Rgb::new(23, 190, 207),  // Cyan
];

/// Color for continents outside the palette, including "unknown".
pub const FALLBACK_COLOR: Rgb = Rgb::new(189, 189, 189);

pub const DEFAULT_CONTINENTS: [&str; 5] = ["Asia", "Europe", "Africa", "Americas", "Oceania"];

/// Assigns each known continent a fixed color by its position in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinentPalette {
    continents: Vec<String>,
}

impl Default for ContinentPalette {
    fn default() -> Self {
        Self::new(DEFAULT_CONTINENTS.iter().map(|c| c.to_string()).collect())
    }
}

impl ContinentPalette {
    pub fn new(continents: Vec<String>) -> Self {
        Self { continents }
    }

    pub fn continents(&self) -> &[String] {
        &self.continents
    }

    pub fn color_for(&self, continent: &str) -> Rgb {
        self.continents
            .iter()
            .position(|c| c == continent)
            .map(|i| CATEGORY10[i % CATEGORY10.len()])
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Legend entries in palette order.
    pub fn legend(&self) -> Vec<(String, Rgb)> {
        self.continents
            .iter()
            .map(|c| (c.clone(), self.color_for(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UNKNOWN_CONTINENT;

    #[test]
    fn known_continents_follow_category10() {
        let palette = ContinentPalette::default();
        assert_eq!(palette.color_for("Asia"), CATEGORY10[0]);
        assert_eq!(palette.color_for("Oceania"), CATEGORY10[4]);
        assert_eq!(palette.color_for("Asia").hex(), "#1f77b4");
    }

    #[test]
    fn unknown_uses_fallback() {
        let palette = ContinentPalette::default();
        assert_eq!(palette.color_for(UNKNOWN_CONTINENT), FALLBACK_COLOR);
        assert_eq!(palette.color_for("Antarctica"), FALLBACK_COLOR);
        assert!(!CATEGORY10[..5].contains(&FALLBACK_COLOR));
    }

    #[test]
    fn colors_are_stable() {
        let a = ContinentPalette::default();
        let b = ContinentPalette::default();
        for continent in DEFAULT_CONTINENTS {
            assert_eq!(a.color_for(continent), b.color_for(continent));
        }
        assert_eq!(a.legend().len(), 5);
    }
}
