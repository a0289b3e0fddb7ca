//! Document buffer and sectioning state.

use serde::{Deserialize, Serialize};

/// Heading level of a title, from the document title down to level 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// The document title
    Title,
    L1,
    L2,
    L3,
    L4,
}

impl HeadingLevel {
    /// Create a section level from a number (1-4). 0 is the document title.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(HeadingLevel::Title),
            1 => Some(HeadingLevel::L1),
            2 => Some(HeadingLevel::L2),
            3 => Some(HeadingLevel::L3),
            4 => Some(HeadingLevel::L4),
            _ => None,
        }
    }

    /// Get the numeric level (0 for the document title, 1-4 for sections).
    pub fn level(&self) -> u8 {
        match self {
            HeadingLevel::Title => 0,
            HeadingLevel::L1 => 1,
            HeadingLevel::L2 => 2,
            HeadingLevel::L3 => 3,
            HeadingLevel::L4 => 4,
        }
    }
}

/// Sectioning and line-break state carried between builder operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionState {
    /// Level of the last emitted heading
    pub depth: Option<HeadingLevel>,

    /// A block just ended; the next fragment needs a blank line before it
    pub pending_break: bool,

    /// Implicit nesting depth for single list items (1 = top level)
    pub list_depth: usize,

    /// The last fragment was a list item
    pub in_list: bool,
}

impl Default for SectionState {
    fn default() -> Self {
        Self {
            depth: None,
            pending_break: false,
            list_depth: 1,
            in_list: false,
        }
    }
}

/// The text accumulated by a builder, as an ordered list of fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fragments: Vec<String>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. Empty fragments are dropped.
    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    /// Fragments in emission order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Check if nothing was emitted yet.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Whether the write position is at the start of a line.
    pub fn at_line_start(&self) -> bool {
        self.fragments.last().is_none_or(|f| f.ends_with('\n'))
    }

    /// Whether the text ends with a blank line (or nothing was written).
    pub fn at_blank_line(&self) -> bool {
        match self.fragments.as_slice() {
            [] => true,
            [.., last] if last.ends_with("\n\n") => true,
            [.., prev, last] => last == "\n" && prev.ends_with('\n'),
            [last] => last == "\n",
        }
    }

    /// Total length of the text in bytes.
    pub fn len(&self) -> usize {
        self.fragments.iter().map(String::len).sum()
    }

    /// Concatenate all fragments.
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(self.len());
        for fragment in &self.fragments {
            output.push_str(fragment);
        }
        output
    }

    /// Drop all fragments.
    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}
