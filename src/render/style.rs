//! Pin dot and connector styling.
//!
//! Colours come from a [`ColorScheme`]: either one of three preset palettes
//! or a custom outer/inner pair. The outer colour is the base colour; pins
//! whose ring is unknown always use it.
//!
//! Preset palettes pair cyclically so that changing the outer colour also
//! picks a sensible inner colour:
//!
//! ```text
//! grey #BEBEBE ──▶ green #00EC00 ──▶ teal #00CACA ──▶ grey
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::Ring;

/// Reference dot radius before scaling.
pub const DEFAULT_BASE_DOT_RADIUS: f64 = 1.0;

/// Reference connector width before scaling.
pub const DEFAULT_BASE_LINE_WIDTH: f64 = 1.0;

/// Default style scale.
pub const DEFAULT_SCALE: f64 = 1.5;

/// An sRGB colour, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a colour from channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `#RGB` (the leading `#` is optional).
    #[must_use]
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid colour '{value}'"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Preset palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteId {
    /// Grey outer, green inner.
    #[default]
    Grey,
    /// Green outer, teal inner.
    Green,
    /// Teal outer, grey inner.
    Teal,
}

impl PaletteId {
    /// All presets in cycle order.
    pub const ALL: [Self; 3] = [Self::Grey, Self::Green, Self::Teal];

    /// The preset's base (outer) colour.
    #[must_use]
    pub const fn base(self) -> Rgb {
        match self {
            Self::Grey => Rgb::new(0xBE, 0xBE, 0xBE),
            Self::Green => Rgb::new(0x00, 0xEC, 0x00),
            Self::Teal => Rgb::new(0x00, 0xCA, 0xCA),
        }
    }

    /// The next preset in the cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Grey => Self::Green,
            Self::Green => Self::Teal,
            Self::Teal => Self::Grey,
        }
    }

    /// The inner colour paired with this preset.
    #[must_use]
    pub const fn inner(self) -> Rgb {
        self.next().base()
    }

    /// Finds the preset whose base colour is `color`.
    #[must_use]
    pub fn from_base(color: Rgb) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.base() == color)
    }
}

/// Inner colour for an arbitrary outer colour with no explicit override.
#[must_use]
pub fn ring_mate(outer: Rgb) -> Rgb {
    PaletteId::from_base(outer).map_or(PaletteId::Green.base(), PaletteId::inner)
}

/// How pin colours are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// A preset palette.
    Palette(PaletteId),
    /// A user-chosen outer colour, with an optional explicit inner colour.
    Custom {
        /// Outer (base) colour.
        outer: Rgb,
        /// Inner colour; paired automatically when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inner: Option<Rgb>,
    },
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::Palette(PaletteId::default())
    }
}

impl ColorScheme {
    /// The outer (base) colour.
    #[must_use]
    pub const fn outer(&self) -> Rgb {
        match self {
            Self::Palette(id) => id.base(),
            Self::Custom { outer, .. } => *outer,
        }
    }

    /// The inner colour.
    #[must_use]
    pub fn inner(&self) -> Rgb {
        match self {
            Self::Palette(id) => id.inner(),
            Self::Custom { outer, inner } => inner.unwrap_or_else(|| ring_mate(*outer)),
        }
    }

    /// Resolves the draw colour of a pin in `ring`.
    #[must_use]
    pub fn resolve(&self, ring: Ring) -> Rgb {
        match ring {
            Ring::Inner => self.inner(),
            Ring::Outer | Ring::Unknown => self.outer(),
        }
    }
}

/// Which connectors are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineScope {
    /// Every valid pin.
    #[default]
    All,
    /// Only inner-ring pins.
    Inner,
    /// Only outer-ring pins.
    Outer,
}

impl LineScope {
    /// Returns `true` if a pin in `ring` gets a connector under this scope.
    #[must_use]
    pub const fn admits(self, ring: Ring) -> bool {
        matches!(
            (self, ring),
            (Self::All, _) | (Self::Inner, Ring::Inner) | (Self::Outer, Ring::Outer)
        )
    }
}

impl fmt::Display for LineScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Inner => write!(f, "inner"),
            Self::Outer => write!(f, "outer"),
        }
    }
}

/// Style settings for pin dots and connectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinStyle {
    /// Multiplier applied to the base radius and width.
    pub scale: f64,
    /// Dot radius at scale 1.
    pub base_dot_radius: f64,
    /// Connector width at scale 1.
    pub base_line_width: f64,
    /// Colour scheme.
    pub color_scheme: ColorScheme,
    /// Requested connector scope.
    pub line_scope: LineScope,
}

impl Default for PinStyle {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            base_dot_radius: DEFAULT_BASE_DOT_RADIUS,
            base_line_width: DEFAULT_BASE_LINE_WIDTH,
            color_scheme: ColorScheme::default(),
            line_scope: LineScope::default(),
        }
    }
}

impl PinStyle {
    /// Current dot radius.
    #[must_use]
    pub fn dot_radius(&self) -> f64 {
        self.base_dot_radius * self.scale
    }

    /// Current connector width.
    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.base_line_width * self.scale
    }
}
