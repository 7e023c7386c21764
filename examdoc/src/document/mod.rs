use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::CharacterFormat;

/// A rich-text document in the shape the document editor loads:
/// `{ sections: [ { blocks: [ { inlines: [ { text, characterFormat } ] } ] } ] }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn empty() -> Self {
        Document {
            sections: Vec::new(),
        }
    }

    /// A document holding exactly one section.
    pub fn single(section: Section) -> Self {
        Document {
            sections: vec![section],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.blocks.is_empty())
    }

    /// All blocks across every section, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.blocks().flat_map(|b| b.inlines.iter())
    }

    /// Concatenation of every run's text, without block separators.
    pub fn plain_text(&self) -> String {
        self.runs().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub blocks: Vec<Block>,
}

/// One paragraph. A block with no inlines is a blank line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub inlines: Vec<Run>,
}

impl Block {
    pub fn new(inlines: Vec<Run>) -> Self {
        Block { inlines }
    }

    pub fn is_blank(&self) -> bool {
        self.inlines.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.inlines.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A span of text sharing one character format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub text: String,
    pub character_format: CharacterFormat,
}

impl Run {
    pub fn new(text: impl Into<String>, character_format: CharacterFormat) -> Self {
        Run {
            text: text.into(),
            character_format,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.blocks() {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.inlines {
            write!(f, "{}", run)?;
        }
        Ok(())
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Heading runs already end in a newline.
        write!(f, "{}", self.text.strip_suffix('\n').unwrap_or(&self.text))
    }
}
