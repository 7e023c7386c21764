mod color;

pub use color::{Color, ParseColorError};

use serde::{Deserialize, Serialize};

/// Character-level formatting attached to a run of text.
///
/// The boolean attributes are optional: `None` means the attribute was never
/// set and is left out of the serialized form, which the editor reads as
/// "inherit". Formats are `Copy`, so every run owns its own snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterFormat {
    pub font_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    pub font_color: Color,
}

impl CharacterFormat {
    /// Body text format: every boolean attribute explicitly off.
    pub fn plain(font_size: u32, font_color: Color) -> Self {
        CharacterFormat {
            font_size,
            bold: Some(false),
            italic: Some(false),
            underline: Some(false),
            font_color,
        }
    }

    /// Heading format: bold, with italic and underline left unset.
    pub fn heading(font_size: u32, font_color: Color) -> Self {
        CharacterFormat {
            font_size,
            bold: Some(true),
            italic: None,
            underline: None,
            font_color,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_underline(&self) -> bool {
        self.underline.unwrap_or(false)
    }

    pub fn toggle_bold(self) -> Self {
        CharacterFormat {
            bold: Some(!self.is_bold()),
            ..self
        }
    }

    pub fn toggle_italic(self) -> Self {
        CharacterFormat {
            italic: Some(!self.is_italic()),
            ..self
        }
    }

    pub fn toggle_underline(self) -> Self {
        CharacterFormat {
            underline: Some(!self.is_underline()),
            ..self
        }
    }

    pub fn with_color(self, font_color: Color) -> Self {
        CharacterFormat { font_color, ..self }
    }
}

impl Default for CharacterFormat {
    /// 12pt black, no emphasis.
    fn default() -> Self {
        CharacterFormat::plain(12, Color::BLACK)
    }
}
