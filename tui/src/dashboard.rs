//! Dashboard Host
//!
//! The host around the card: it owns the sample content for each kind and
//! a Paragraph / Bullet Points toggle. Switching kinds hands the card a new
//! [`ContentBlock`]; the toggle is disabled while a regeneration runs.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use genblock_core::{ContentBlock, ContentKind};

use crate::theme;

/// Card heading
pub const HEADING: &str = "Dynamic Content Display";

/// Action chips shown under the content
pub const ACTIONS: [&str; 2] = ["Generate more content", "Summarize content"];

const PARAGRAPH_CONTENT: [&str; 3] = [
    "Artificial Intelligence has revolutionized how we approach content creation, making it faster and more efficient than ever before.",
    "With generative models, we can now produce high-quality text that adapts to specific requirements and maintains a consistent tone of voice.",
    "These AI systems learn from vast amounts of data, enabling them to understand context and generate relevant responses to complex prompts.",
];

const BULLET_CONTENT: [&str; 3] = [
    "AI revolutionizes content creation with improved speed and efficiency",
    "Generative models produce high-quality text with consistent tone of voice",
    "AI systems learn from vast datasets to understand context and generate relevant responses",
];

/// Host-side selection of the content kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dashboard {
    kind: ContentKind,
}

impl Dashboard {
    /// Start with `kind` selected
    #[must_use]
    pub fn new(kind: ContentKind) -> Self {
        Self { kind }
    }

    /// Currently selected kind
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// The content block for the selected kind
    #[must_use]
    pub fn block(&self) -> ContentBlock {
        content_for(self.kind)
    }

    /// Switch to `kind`
    ///
    /// Returns the block to hand the card, or `None` if nothing changed or
    /// the card is busy.
    pub fn select(&mut self, kind: ContentKind, busy: bool) -> Option<ContentBlock> {
        if busy || kind == self.kind {
            return None;
        }
        self.kind = kind;
        Some(content_for(kind))
    }
}

/// The dashboard's content for `kind`
#[must_use]
pub fn content_for(kind: ContentKind) -> ContentBlock {
    let units = match kind {
        ContentKind::Paragraph => PARAGRAPH_CONTENT,
        ContentKind::BulletList => BULLET_CONTENT,
    };
    ContentBlock::new(
        HEADING,
        kind,
        units.iter().map(|u| (*u).to_string()).collect(),
    )
    .with_summary(format!("Content displayed in {} format.", kind.label()))
    .with_actions(ACTIONS)
}

/// The Paragraph / Bullet Points toggle
pub struct KindToggle {
    selected: ContentKind,
    enabled: bool,
}

impl KindToggle {
    /// Toggle showing `selected`, greyed out unless `enabled`
    #[must_use]
    pub fn new(selected: ContentKind, enabled: bool) -> Self {
        Self { selected, enabled }
    }
}

impl Widget for KindToggle {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let option = |kind: ContentKind, label: &'static str| {
            Span::styled(
                format!(" {label} "),
                theme::toggle(self.selected == kind, self.enabled),
            )
        };

        let line = Line::from(vec![
            option(ContentKind::Paragraph, "Paragraph"),
            Span::raw("  "),
            option(ContentKind::BulletList, "Bullet Points"),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}
