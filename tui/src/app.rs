//! Main Application
//!
//! The App manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - `CardHandle` for orchestration
//! - A pulled `CardSnapshot` for rendering
//!
//! The App never times anything about the card. Each frame it asks the
//! engine for a fresh snapshot and draws exactly that.

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tracing::{debug, info, warn};

use genblock_core::{
    CardHandle, CardSnapshot, ContentApplied, ContentKind, CopyOutcome, EngineError,
    TriggerOutcome,
};

use crate::dashboard::{Dashboard, KindToggle};
use crate::theme;
use crate::widgets::CardWidget;

/// Widest the card is drawn
const MAX_CARD_WIDTH: u16 = 84;

/// Key hints shown on the bottom line
const HELP: &str = "r regenerate · c copy · p paragraph · b bullets · q quit";

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Handle to the card engine
    card: CardHandle,
    /// Host content selection
    dashboard: Dashboard,
    /// Snapshot drawn on the last frame
    snapshot: CardSnapshot,
}

impl App {
    /// Create an App driving `card`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine is not running.
    pub async fn new(card: CardHandle, dashboard: Dashboard) -> Result<Self, EngineError> {
        let snapshot = card.snapshot().await?;
        Ok(Self {
            running: true,
            card,
            dashboard,
            snapshot,
        })
    }

    /// Main event loop
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails or the engine stops unexpectedly.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        // ~30 FPS is plenty for a typing reveal
        let frame_duration = Duration::from_millis(33);

        let mut event_stream = EventStream::new();

        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key).await?;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            if !self.running {
                break;
            }

            self.refresh().await?;
            terminal.draw(|frame| self.render(frame))?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Pull a fresh snapshot from the engine
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine has stopped.
    pub async fn refresh(&mut self) -> Result<(), EngineError> {
        self.snapshot = self.card.snapshot().await?;
        Ok(())
    }

    /// Handle keyboard input
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine has stopped.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<(), EngineError> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit().await?,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit().await?;
            }

            KeyCode::Char('r') | KeyCode::Enter => {
                if let TriggerOutcome::Rejected { phase } = self.card.regenerate().await? {
                    debug!(%phase, "Regenerate ignored");
                }
            }

            KeyCode::Char('c') => self.copy().await?,

            KeyCode::Char('p') => self.select(ContentKind::Paragraph).await?,
            KeyCode::Char('b') => self.select(ContentKind::BulletList).await?,
            KeyCode::Tab => {
                let next = match self.dashboard.kind() {
                    ContentKind::Paragraph => ContentKind::BulletList,
                    ContentKind::BulletList => ContentKind::Paragraph,
                };
                self.select(next).await?;
            }

            _ => {}
        }
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        let cancelled = self.card.shutdown().await?;
        info!(cancelled, "Card shut down");
        self.running = false;
        Ok(())
    }

    async fn copy(&mut self) -> Result<(), EngineError> {
        // Feedback, including failures, comes back through the snapshot
        if let CopyOutcome::Failed(e) = self.card.copy().await? {
            debug!(error = %e, "Copy failed");
        }
        self.refresh().await
    }

    async fn select(&mut self, kind: ContentKind) -> Result<(), EngineError> {
        // The toggle is disabled while the card regenerates
        let Some(block) = self.dashboard.select(kind, self.snapshot.is_busy) else {
            return Ok(());
        };
        if self.card.replace_content(block).await? == ContentApplied::Deferred {
            debug!(%kind, "Content change deferred until the card settles");
        }
        Ok(())
    }

    /// Draw the dashboard from the current snapshot
    pub fn render(&self, frame: &mut Frame<'_>) {
        let [toggle, _, card, notice, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let [toggle] = Layout::horizontal([Constraint::Max(MAX_CARD_WIDTH)])
            .flex(Flex::Center)
            .areas(toggle);
        let [card] = Layout::horizontal([Constraint::Max(MAX_CARD_WIDTH)])
            .flex(Flex::Center)
            .areas(card);

        frame.render_widget(
            KindToggle::new(self.dashboard.kind(), !self.snapshot.is_busy),
            toggle,
        );
        frame.render_widget(CardWidget::new(&self.snapshot), card);

        if let Some(message) = self.notice() {
            frame.render_widget(
                Paragraph::new(Line::styled(
                    message,
                    Style::default().fg(theme::ACCENT),
                ))
                .centered(),
                notice,
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                HELP,
                Style::default().fg(theme::DIM_GRAY),
            )))
            .centered(),
            help,
        );
    }

    /// Is the app still running?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Snapshot drawn on the last frame
    #[must_use]
    pub fn snapshot(&self) -> &CardSnapshot {
        &self.snapshot
    }

    /// Host content selection
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Current notice line, if any
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.snapshot.copy_error.as_deref()
    }
}
