use std::iter::Peekable;
use std::str::Chars;

use crate::document::Run;
use crate::format::CharacterFormat;
use crate::theme::{Palette, Theme};

/// An inline markup delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `**`
    Bold,
    /// `_`
    Italic,
    /// `~`
    Underline,
    /// `^`
    Color,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Bold => "**",
            Delimiter::Italic => "_",
            Delimiter::Underline => "~",
            Delimiter::Color => "^",
        }
    }

    /// The format in effect after this delimiter.
    pub fn apply(&self, format: CharacterFormat, palette: &Palette) -> CharacterFormat {
        match self {
            Delimiter::Bold => format.toggle_bold(),
            Delimiter::Italic => format.toggle_italic(),
            Delimiter::Underline => format.toggle_underline(),
            Delimiter::Color => format.with_color(palette.next_after(format.font_color)),
        }
    }

    /// Consume a delimiter starting with `c`, if there is one.
    /// A `*` only counts when immediately followed by another `*`.
    fn take(c: char, rest: &mut Peekable<Chars<'_>>) -> Option<Delimiter> {
        match c {
            '*' if rest.peek() == Some(&'*') => {
                rest.next();
                Some(Delimiter::Bold)
            }
            '_' => Some(Delimiter::Italic),
            '~' => Some(Delimiter::Underline),
            '^' => Some(Delimiter::Color),
            _ => None,
        }
    }
}

struct LineScanner<'t> {
    palette: &'t Palette,
    format: CharacterFormat,
    buffer: String,
    runs: Vec<Run>,
}

impl<'t> LineScanner<'t> {
    fn new(theme: &'t Theme) -> Self {
        LineScanner {
            palette: &theme.palette,
            format: theme.body_format(),
            buffer: String::new(),
            runs: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.runs.push(Run::new(text, self.format));
        }
    }

    fn transition(&mut self, delimiter: Delimiter) {
        self.flush();
        self.format = delimiter.apply(self.format, self.palette);
    }

    fn finish(mut self) -> Vec<Run> {
        self.flush();
        self.runs
    }
}

/// Scan one non-heading line into runs, starting from the theme's body format.
pub fn scan_line(line: &str, theme: &Theme) -> Vec<Run> {
    let mut scanner = LineScanner::new(theme);
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match Delimiter::take(c, &mut chars) {
            Some(delimiter) => scanner.transition(delimiter),
            None => scanner.buffer.push(c),
        }
    }
    scanner.finish()
}
