//! Content Block Model
//!
//! The text a card displays. The host owns what goes into a block; the
//! orchestrator only reads `units.len()` and `kind` to drive a regeneration
//! and swaps `units` wholesale when a session commits.

use serde::{Deserialize, Serialize};

/// How a block's units are laid out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// One paragraph per unit
    #[default]
    Paragraph,
    /// One bullet per unit
    BulletList,
}

impl ContentKind {
    /// Parse a kind from a config or CLI string
    ///
    /// Returns `None` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paragraph" | "paragraphs" | "prose" => Some(Self::Paragraph),
            "bullet" | "bullets" | "bullet_list" | "bullet-list" | "list" => Some(Self::BulletList),
            _ => None,
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::BulletList => "bullet point",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A card's displayed content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Card title
    pub heading: String,
    /// One-line description under the title
    pub summary: String,
    /// Ordered content units (paragraphs or bullets)
    pub units: Vec<String>,
    /// Layout of the units
    pub kind: ContentKind,
    /// Labels of the action chips under the content
    pub actions: Vec<String>,
}

impl ContentBlock {
    /// Create a block with the given heading, kind and units
    pub fn new(heading: impl Into<String>, kind: ContentKind, units: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            summary: String::new(),
            units,
            kind,
            actions: Vec::new(),
        }
    }

    /// Set the summary line
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the action labels
    #[must_use]
    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Text placed on the clipboard by the copy action
    #[must_use]
    pub fn copy_text(&self) -> String {
        self.units.join("\n\n")
    }
}
