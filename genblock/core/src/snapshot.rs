//! Presentation Snapshot
//!
//! The read-only view a renderer pulls from the core. A surface must draw
//! solely from a snapshot: typing progress is already folded into
//! `visible_units`, so nothing on the rendering side needs a clock.

use serde::{Deserialize, Serialize};

use crate::content::ContentKind;
use crate::orchestrator::Phase;

/// Everything a renderer may look at, captured at one instant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    /// Current phase of the state machine
    pub phase: Phase,
    /// `phase != Idle`; disables regenerate and copy controls
    pub is_busy: bool,
    /// Units to draw right now
    ///
    /// While revealing unit `i`, holds units `0..i` in full followed by the
    /// typed prefix of unit `i`. Empty while the content is hidden.
    pub visible_units: Vec<String>,
    /// Unit currently being typed, if any
    pub active_reveal_index: Option<usize>,
    /// Header is in its collapsed visual state
    pub header_collapsed: bool,
    /// Content area is visible
    pub content_visible: bool,
    /// Bumped every time the header re-expands
    ///
    /// Observer-only: lets a surface with entrance animations replay them
    /// once per commit. The terminal card draws the header the same way for
    /// every epoch.
    pub header_epoch: u64,
    /// A copy succeeded recently
    pub copied: bool,
    /// Why the last copy failed, while its notice is still showing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_error: Option<String>,
    /// Card title
    pub heading: String,
    /// One-line description
    pub summary: String,
    /// Layout of the units
    pub kind: ContentKind,
    /// Action chip labels
    pub actions: Vec<String>,
}

impl CardSnapshot {
    /// Whether the unit at `index` is the one being typed
    #[must_use]
    pub fn is_typing(&self, index: usize) -> bool {
        self.active_reveal_index == Some(index)
    }

    /// The regenerate control accepts input
    #[must_use]
    pub fn can_regenerate(&self) -> bool {
        !self.is_busy
    }

    /// The copy control accepts input
    #[must_use]
    pub fn can_copy(&self) -> bool {
        !self.is_busy
    }
}
