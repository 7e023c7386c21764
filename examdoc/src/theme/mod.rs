mod error;

pub use error::ThemeError;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::format::{CharacterFormat, Color};

/// Font size and color for one kind of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub font_size: u32,
    pub color: Color,
}

/// The colors `^` cycles through, in order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Color>);

impl Palette {
    /// Returns `None` for an empty list.
    pub fn new(colors: Vec<Color>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Palette(colors))
        }
    }

    pub fn colors(&self) -> &[Color] {
        &self.0
    }

    /// The color following `current` in the cycle. A color that is not part
    /// of the palette counts as sitting just before the first entry.
    pub fn next_after(&self, current: Color) -> Color {
        let next = match self.0.iter().position(|c| *c == current) {
            Some(index) => (index + 1) % self.0.len(),
            None => 0,
        };
        self.0[next]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette(vec![Color::RED, Color::GREEN, Color::BLUE, Color::ORANGE])
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let colors = Vec::<Color>::deserialize(deserializer)?;
        Palette::new(colors).ok_or_else(|| de::Error::custom("palette must contain at least one color"))
    }
}

/// Formatting constants the markup converter applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub palette: Palette,
    pub body: TextStyle,
    pub heading: TextStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            palette: Palette::default(),
            body: TextStyle {
                font_size: 12,
                color: Color::BLACK,
            },
            heading: TextStyle {
                font_size: 16,
                color: Color::HEADING,
            },
        }
    }
}

// Theme files may override any subset of keys; the rest keep their defaults.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeFile {
    palette: Option<Palette>,
    body: Option<StyleOverride>,
    heading: Option<StyleOverride>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleOverride {
    font_size: Option<u32>,
    color: Option<Color>,
}

impl StyleOverride {
    fn apply(self, base: TextStyle) -> TextStyle {
        TextStyle {
            font_size: self.font_size.unwrap_or(base.font_size),
            color: self.color.unwrap_or(base.color),
        }
    }
}

impl Theme {
    /// Parse a theme from TOML, layering the file over [`Theme::default`].
    pub fn from_toml_str(source: &str) -> Result<Self, ThemeError> {
        let file: ThemeFile = toml::from_str(source)?;
        let mut theme = Theme::default();
        if let Some(palette) = file.palette {
            theme.palette = palette;
        }
        if let Some(body) = file.body {
            theme.body = body.apply(theme.body);
        }
        if let Some(heading) = file.heading {
            theme.heading = heading.apply(theme.heading);
        }
        for (name, style) in [("body", &theme.body), ("heading", &theme.heading)] {
            if style.font_size == 0 {
                log::warn!("rejecting theme: {} font size is zero", name);
                return Err(ThemeError::new(format!("{} font_size must be positive", name))
                    .with_note("font sizes are in points"));
            }
        }
        Ok(theme)
    }

    /// Starting format for each non-heading line.
    pub fn body_format(&self) -> CharacterFormat {
        CharacterFormat::plain(self.body.font_size, self.body.color)
    }

    pub fn heading_format(&self) -> CharacterFormat {
        CharacterFormat::heading(self.heading.font_size, self.heading.color)
    }
}
