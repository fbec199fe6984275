//! Theme and Colors
//!
//! The card palette: a quiet surface with one accent, and a dimmed variant
//! for everything that is disabled while a regeneration runs.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Card Palette
// ============================================================================

/// Card border at rest
pub const CARD_BORDER: Color = Color::Rgb(120, 120, 140);

/// Card border while regenerating
pub const CARD_BORDER_BUSY: Color = Color::Rgb(150, 180, 255);

/// Heading text
pub const HEADING: Color = Color::Rgb(235, 235, 245);

/// Body text
pub const TEXT: Color = Color::Rgb(210, 210, 220);

/// The unit currently being typed
pub const TYPING: Color = Color::Rgb(255, 223, 128);

/// Action chips and enabled controls
pub const ACCENT: Color = Color::Magenta;

/// Summary, footer label, and collapsed header
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Copy confirmation
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

// ============================================================================
// Styles
// ============================================================================

/// Style for a control that may be disabled
#[must_use]
pub fn control(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM_GRAY)
    }
}

/// Style for the selected or unselected option of a toggle
#[must_use]
pub fn toggle(selected: bool, enabled: bool) -> Style {
    match (selected, enabled) {
        (true, true) => Style::default().fg(Color::Black).bg(ACCENT),
        (true, false) => Style::default().fg(Color::Black).bg(DIM_GRAY),
        (false, true) => Style::default().fg(ACCENT),
        (false, false) => Style::default().fg(DIM_GRAY),
    }
}
