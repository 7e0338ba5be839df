//! Named color palettes for chart series.
//!
//! Palettes are immutable lookup tables. A [`PaletteSet`] is built once (the
//! built-in tables plus any palettes from the config file) and handed to the
//! aggregator by reference.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Name of the palette used when a chart names none, or an unknown one.
pub const DEFAULT_PALETTE: &str = "default";

/// An sRGB color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color at full opacity.
    pub const fn opaque(self) -> Self {
        Self { a: 1.0, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Rgba {
    type Err = color_eyre::Report;

    /// Accepts `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if trimmed.starts_with('#') {
            return parse_hex(trimmed);
        }

        let lower = trimmed.to_lowercase();
        let (args, expected) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, 4)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, 3)
        } else {
            return Err(eyre!(
                "Unknown color: '{}'. Supported: #rrggbb, #rrggbbaa, rgb(r, g, b), rgba(r, g, b, a)",
                trimmed
            ));
        };
        let args = args
            .strip_suffix(')')
            .ok_or_else(|| eyre!("Missing closing parenthesis in color: {}", trimmed))?;

        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != expected {
            return Err(eyre!(
                "Expected {} components in color '{}', found {}",
                expected,
                trimmed,
                parts.len()
            ));
        }

        let channel = |idx: usize, name: &str| -> Result<u8> {
            parts[idx]
                .parse::<u8>()
                .map_err(|_| eyre!("Invalid {} component in color: {}", name, trimmed))
        };
        let r = channel(0, "red")?;
        let g = channel(1, "green")?;
        let b = channel(2, "blue")?;
        let a = if expected == 4 {
            let a = parts[3]
                .parse::<f32>()
                .map_err(|_| eyre!("Invalid alpha component in color: {}", trimmed))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(eyre!("Alpha must be between 0 and 1 in color: {}", trimmed));
            }
            a
        } else {
            1.0
        };

        Ok(Self::new(r, g, b, a))
    }
}

/// Parse hex color string (#rrggbb or #rrggbbaa)
fn parse_hex(s: &str) -> Result<Rgba> {
    if !s.starts_with('#') || !(s.len() == 7 || s.len() == 9) || !s.is_ascii() {
        return Err(eyre!(
            "Invalid hex color format: '{}'. Expected format: #rrggbb or #rrggbbaa",
            s
        ));
    }

    let component = |range: std::ops::Range<usize>, name: &str| -> Result<u8> {
        u8::from_str_radix(&s[range], 16)
            .map_err(|_| eyre!("Invalid {} component in hex color: {}", name, s))
    };
    let r = component(1..3, "red")?;
    let g = component(3..5, "green")?;
    let b = component(5..7, "blue")?;
    let a = if s.len() == 9 {
        f32::from(component(7..9, "alpha")?) / 255.0
    } else {
        1.0
    };

    Ok(Rgba::new(r, g, b, a))
}

/// Fill and border color assigned to one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesColor {
    pub fill: Rgba,
    pub border: Rgba,
}

/// A named, non-empty color table with a parallel border table.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    name: Cow<'static, str>,
    fill: Cow<'static, [Rgba]>,
    border: Cow<'static, [Rgba]>,
}

impl Palette {
    /// Build a palette from fill colors; borders are the same colors at full opacity.
    pub fn new(name: impl Into<String>, fill: Vec<Rgba>) -> Result<Self> {
        let name = name.into();
        if fill.is_empty() {
            return Err(eyre!("Palette '{}' has no colors", name));
        }
        let border = fill.iter().map(|c| c.opaque()).collect::<Vec<_>>();
        Ok(Self {
            name: Cow::Owned(name),
            fill: Cow::Owned(fill),
            border: Cow::Owned(border),
        })
    }

    const fn from_static(
        name: &'static str,
        fill: &'static [Rgba],
        border: &'static [Rgba],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            fill: Cow::Borrowed(fill),
            border: Cow::Borrowed(border),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.fill.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_empty()
    }

    /// Color pair for a label position, cycling through the table.
    pub fn color(&self, index: usize) -> SeriesColor {
        SeriesColor {
            fill: self.fill[index % self.fill.len()],
            border: self.border[index % self.border.len()],
        }
    }
}

const DEFAULT_FILL: [Rgba; 5] = [
    Rgba::new(59, 130, 246, 0.7),
    Rgba::new(16, 185, 129, 0.7),
    Rgba::new(249, 115, 22, 0.7),
    Rgba::new(139, 92, 246, 0.7),
    Rgba::new(236, 72, 153, 0.7),
];
const DEFAULT_BORDER: [Rgba; 5] = [
    Rgba::new(59, 130, 246, 1.0),
    Rgba::new(16, 185, 129, 1.0),
    Rgba::new(249, 115, 22, 1.0),
    Rgba::new(139, 92, 246, 1.0),
    Rgba::new(236, 72, 153, 1.0),
];

// Single hue at decreasing opacity; borders step down from full opacity.
const MONOCHROME_FILL: [Rgba; 5] = [
    Rgba::new(59, 130, 246, 0.8),
    Rgba::new(59, 130, 246, 0.7),
    Rgba::new(59, 130, 246, 0.6),
    Rgba::new(59, 130, 246, 0.5),
    Rgba::new(59, 130, 246, 0.4),
];
const MONOCHROME_BORDER: [Rgba; 5] = [
    Rgba::new(59, 130, 246, 1.0),
    Rgba::new(59, 130, 246, 0.9),
    Rgba::new(59, 130, 246, 0.8),
    Rgba::new(59, 130, 246, 0.7),
    Rgba::new(59, 130, 246, 0.6),
];

const CATEGORICAL_FILL: [Rgba; 5] = [
    Rgba::new(239, 68, 68, 0.7),
    Rgba::new(249, 115, 22, 0.7),
    Rgba::new(234, 179, 8, 0.7),
    Rgba::new(16, 185, 129, 0.7),
    Rgba::new(59, 130, 246, 0.7),
];
const CATEGORICAL_BORDER: [Rgba; 5] = [
    Rgba::new(239, 68, 68, 1.0),
    Rgba::new(249, 115, 22, 1.0),
    Rgba::new(234, 179, 8, 1.0),
    Rgba::new(16, 185, 129, 1.0),
    Rgba::new(59, 130, 246, 1.0),
];

const DIVERGING_FILL: [Rgba; 5] = [
    Rgba::new(239, 68, 68, 0.7),
    Rgba::new(249, 115, 22, 0.7),
    Rgba::new(234, 234, 234, 0.7),
    Rgba::new(147, 197, 253, 0.7),
    Rgba::new(59, 130, 246, 0.7),
];
const DIVERGING_BORDER: [Rgba; 5] = [
    Rgba::new(239, 68, 68, 1.0),
    Rgba::new(249, 115, 22, 1.0),
    Rgba::new(234, 234, 234, 1.0),
    Rgba::new(147, 197, 253, 1.0),
    Rgba::new(59, 130, 246, 1.0),
];

const GRADIENT_FILL: [Rgba; 5] = [
    Rgba::new(236, 72, 153, 0.7),
    Rgba::new(217, 70, 239, 0.7),
    Rgba::new(168, 85, 247, 0.7),
    Rgba::new(139, 92, 246, 0.7),
    Rgba::new(99, 102, 241, 0.7),
];
const GRADIENT_BORDER: [Rgba; 5] = [
    Rgba::new(236, 72, 153, 1.0),
    Rgba::new(217, 70, 239, 1.0),
    Rgba::new(168, 85, 247, 1.0),
    Rgba::new(139, 92, 246, 1.0),
    Rgba::new(99, 102, 241, 1.0),
];

// Pastel borders use a darker shade than the fill so light slices stay visible.
const PASTEL_FILL: [Rgba; 5] = [
    Rgba::new(254, 226, 226, 0.7),
    Rgba::new(254, 243, 199, 0.7),
    Rgba::new(209, 250, 229, 0.7),
    Rgba::new(219, 234, 254, 0.7),
    Rgba::new(237, 233, 254, 0.7),
];
const PASTEL_BORDER: [Rgba; 5] = [
    Rgba::new(254, 202, 202, 1.0),
    Rgba::new(254, 240, 138, 1.0),
    Rgba::new(187, 247, 208, 1.0),
    Rgba::new(191, 219, 254, 1.0),
    Rgba::new(221, 214, 254, 1.0),
];

const BOLD_FILL: [Rgba; 5] = [
    Rgba::new(220, 38, 38, 0.8),
    Rgba::new(217, 119, 6, 0.8),
    Rgba::new(5, 150, 105, 0.8),
    Rgba::new(37, 99, 235, 0.8),
    Rgba::new(124, 58, 237, 0.8),
];
const BOLD_BORDER: [Rgba; 5] = [
    Rgba::new(185, 28, 28, 1.0),
    Rgba::new(180, 83, 9, 1.0),
    Rgba::new(4, 120, 87, 1.0),
    Rgba::new(29, 78, 216, 1.0),
    Rgba::new(109, 40, 217, 1.0),
];

static BUILTIN: [Palette; 7] = [
    Palette::from_static(DEFAULT_PALETTE, &DEFAULT_FILL, &DEFAULT_BORDER),
    Palette::from_static("monochrome", &MONOCHROME_FILL, &MONOCHROME_BORDER),
    Palette::from_static("categorical", &CATEGORICAL_FILL, &CATEGORICAL_BORDER),
    Palette::from_static("diverging", &DIVERGING_FILL, &DIVERGING_BORDER),
    Palette::from_static("gradient", &GRADIENT_FILL, &GRADIENT_BORDER),
    Palette::from_static("pastel", &PASTEL_FILL, &PASTEL_BORDER),
    Palette::from_static("bold", &BOLD_FILL, &BOLD_BORDER),
];

/// Names of the palettes that ship with csvviz.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(Palette::name)
}

/// Lookup table of palettes by name. Always contains the built-ins, with
/// `default` first.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSet {
    palettes: Vec<Palette>,
}

impl Default for PaletteSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PaletteSet {
    pub fn builtin() -> Self {
        Self {
            palettes: BUILTIN.to_vec(),
        }
    }

    /// Add a custom palette. Names must be unique and may not shadow a built-in.
    pub fn insert(&mut self, palette: Palette) -> Result<()> {
        if self.get(palette.name()).is_some() {
            return Err(eyre!("Palette '{}' is already defined", palette.name()));
        }
        self.palettes.push(palette);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Palette for a scheme name, falling back to `default` when the name is
    /// empty or unknown.
    pub fn resolve(&self, name: &str) -> &Palette {
        self.get(name).unwrap_or(&self.palettes[0])
    }

    pub fn names(&self) -> Vec<&str> {
        self.palettes.iter().map(|p| p.name()).collect()
    }
}
