//! Card Widget
//!
//! Draws one generative content card from a [`CardSnapshot`]. The widget
//! holds no state and reads no clock: typing progress, header collapse and
//! content visibility all arrive already resolved in the snapshot.
//!
//! ```text
//! ╭──────────────────────────────────────────────╮
//! │ Dynamic Content Display                      │
//! │ Content displayed in paragraph format.       │
//! │                                              │
//! │ Artificial Intelligence has revolutionized   │
//! │ how we approach content creation...          │
//! │                                              │
//! │ [Generate more content] [Summarize content]  │
//! │ Logic and reasoning        Copy  Regenerate  │
//! ╰──────────────────────────────────────────────╯
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};
use textwrap::Options;
use unicode_width::UnicodeWidthStr;

use genblock_core::{CardSnapshot, ContentKind};

use crate::theme;

/// Label in the footer's left corner
pub const FOOTER_LABEL: &str = "Logic and reasoning";

/// Copy control label
pub const COPY_LABEL: &str = "Copy";

/// Copy control label after a successful copy
pub const COPIED_LABEL: &str = "Copied!";

/// Regenerate control label
pub const REGENERATE_LABEL: &str = "Regenerate";

/// Drawn after the unit being typed
pub const TYPING_CURSOR: &str = "▌";

/// Bullet marker for list content
const BULLET: &str = "• ";

/// Below this inner size the card draws only its border
const MIN_INNER_WIDTH: u16 = 12;
const MIN_INNER_HEIGHT: u16 = 5;

/// Stateless card renderer
pub struct CardWidget<'a> {
    snapshot: &'a CardSnapshot,
}

impl<'a> CardWidget<'a> {
    /// Render `snapshot`
    #[must_use]
    pub fn new(snapshot: &'a CardSnapshot) -> Self {
        Self { snapshot }
    }
}

/// Wrap the visible units to `width`
///
/// Paragraphs are separated by a blank line; bullets get a hanging indent.
#[must_use]
pub fn body_lines(snapshot: &CardSnapshot, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width).max(1);
    let mut lines = Vec::new();

    for (index, unit) in snapshot.visible_units.iter().enumerate() {
        let typing = snapshot.is_typing(index);
        let text = if typing {
            format!("{unit}{TYPING_CURSOR}")
        } else {
            unit.clone()
        };

        let wrapped = match snapshot.kind {
            ContentKind::Paragraph => {
                if index > 0 {
                    lines.push(Line::default());
                }
                textwrap::wrap(&text, width)
            }
            ContentKind::BulletList => textwrap::wrap(
                &text,
                Options::new(width)
                    .initial_indent(BULLET)
                    .subsequent_indent("  "),
            ),
        };

        let style = Style::default().fg(if typing { theme::TYPING } else { theme::TEXT });
        lines.extend(
            wrapped
                .into_iter()
                .map(|line| Line::styled(line.into_owned(), style)),
        );
    }

    lines
}

/// The right-hand footer controls
fn controls(snapshot: &CardSnapshot) -> Line<'static> {
    let copy = if snapshot.copied {
        Span::styled(
            COPIED_LABEL,
            Style::default()
                .fg(theme::SUCCESS_GREEN)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(COPY_LABEL, theme::control(snapshot.can_copy()))
    };

    Line::from(vec![
        copy,
        Span::raw("  "),
        Span::styled(REGENERATE_LABEL, theme::control(snapshot.can_regenerate())),
    ])
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.snapshot;

        let border = if snapshot.is_busy {
            theme::CARD_BORDER_BUSY
        } else {
            theme::CARD_BORDER
        };
        let frame = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));
        let inner = frame.inner(area);
        frame.render(area, buf);

        if inner.width < MIN_INNER_WIDTH || inner.height < MIN_INNER_HEIGHT {
            return;
        }

        let header_height = if snapshot.header_collapsed { 1 } else { 2 };
        let [header, _, body, actions, footer] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        // Header
        let mut header_lines = Vec::with_capacity(2);
        if snapshot.header_collapsed {
            header_lines.push(Line::styled(
                snapshot.heading.clone(),
                Style::default().fg(theme::DIM_GRAY),
            ));
        } else {
            header_lines.push(Line::styled(
                snapshot.heading.clone(),
                Style::default()
                    .fg(theme::HEADING)
                    .add_modifier(Modifier::BOLD),
            ));
            header_lines.push(Line::styled(
                snapshot.summary.clone(),
                Style::default().fg(theme::DIM_GRAY),
            ));
        }
        Paragraph::new(header_lines).render(header, buf);

        // Body
        if snapshot.content_visible {
            Paragraph::new(body_lines(snapshot, body.width)).render(body, buf);
        }

        // Action chips
        let mut chips = Vec::with_capacity(snapshot.actions.len() * 2);
        for (i, action) in snapshot.actions.iter().enumerate() {
            if i > 0 {
                chips.push(Span::raw(" "));
            }
            chips.push(Span::styled(
                format!("[{action}]"),
                theme::control(!snapshot.is_busy),
            ));
        }
        Paragraph::new(Line::from(chips)).render(actions, buf);

        // Footer
        let controls = controls(snapshot);
        let label_fits = FOOTER_LABEL.width() + controls.width() < usize::from(footer.width);
        if label_fits {
            Paragraph::new(Line::styled(
                FOOTER_LABEL,
                Style::default().fg(theme::DIM_GRAY),
            ))
            .render(footer, buf);
        }
        Paragraph::new(controls)
            .alignment(Alignment::Right)
            .render(footer, buf);
    }
}
