//! Converter from the generator's lightweight markup to [`Document`].
//!
//! The markup is line oriented. A line starting with `"# "` or `"## "` is a
//! heading; every other line is scanned for toggle delimiters:
//!
//! | delimiter | effect                              |
//! |-----------|-------------------------------------|
//! | `**`      | toggle bold                         |
//! | `_`       | toggle italic                       |
//! | `~`       | toggle underline                    |
//! | `^`       | advance font color along the palette |
//!
//! Toggles are unconditional and never span lines, so unbalanced markup just
//! leaves an attribute on until the end of its line.

mod inline;

pub use inline::{Delimiter, scan_line};

use crate::document::{Block, Document, Run, Section};
use crate::theme::Theme;

const HEADING_PREFIXES: [&str; 2] = ["# ", "## "];

/// Both prefixes strip this many characters, so `"## Title"` keeps a leading
/// space. Consumers depend on that output.
const HEADING_PREFIX_LEN: usize = 2;

/// Convert markup text using the default theme.
pub fn convert(text: &str) -> Document {
    convert_with(text, &Theme::default())
}

/// Convert markup text, one block per `'\n'`-separated line.
///
/// Empty input has no lines and yields a section with no blocks.
pub fn convert_with(text: &str, theme: &Theme) -> Document {
    let blocks: Vec<Block> = lines(text).map(|line| convert_line(line, theme)).collect();
    log::debug!(
        "converted {} bytes into {} blocks ({} runs)",
        text.len(),
        blocks.len(),
        blocks.iter().map(|b| b.inlines.len()).sum::<usize>()
    );
    Document::single(Section { blocks })
}

/// Convert a single line (without its terminating newline) into a block.
pub fn convert_line(line: &str, theme: &Theme) -> Block {
    match heading_text(line) {
        Some(title) => {
            log::trace!("heading line: {:?}", title);
            Block::new(vec![Run::new(format!("{}\n", title), theme.heading_format())])
        }
        None => Block::new(scan_line(line, theme)),
    }
}

/// The heading text if `line` is a heading.
pub fn heading_text(line: &str) -> Option<&str> {
    if HEADING_PREFIXES.iter().any(|p| line.starts_with(p)) {
        Some(&line[HEADING_PREFIX_LEN..])
    } else {
        None
    }
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    let split = if text.is_empty() {
        None
    } else {
        Some(text.split('\n'))
    };
    split.into_iter().flatten()
}
