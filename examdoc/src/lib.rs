pub mod document;
pub mod format;
pub mod markup;
pub mod theme;

pub use document::{Block, Document, Run, Section};
pub use format::{CharacterFormat, Color};
pub use markup::{convert, convert_with};
pub use theme::{Palette, TextStyle, Theme, ThemeError};
