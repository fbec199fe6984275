//! Regeneration Orchestrator
//!
//! The state machine that owns a card's regeneration lifecycle. One
//! regenerate signal walks the card through a fixed phase table; every phase
//! that waits does so through exactly one timer from the
//! [`RevealScheduler`], and each expiry produces exactly one transition.
//!
//! # Phase Table
//!
//! ```text
//! Idle ──regenerate──▶ HeaderCollapsing        (header_settle_delay)
//!   HeaderCollapsing ──timer──▶ ContentHiding ─▶ Generating
//!                                               (content_hide_settle_delay)
//!   Generating ──timer──▶ RevealingItem(0)      (plan_duration(unit 0))
//!   RevealingItem(i) ──timer──▶ RevealingItem(i+1) | Committing
//!   Committing (settling) ──timer──▶ commit units, expand header
//!                                               (visibility_restore_delay)
//!   Committing (restoring) ──timer──▶ Idle
//! ```
//!
//! A block with no units skips the reveals: Generating moves straight on to
//! Committing.
//!
//! # Timeline
//!
//! Timer callbacks only post a [`TimerFired`] into the channel given at
//! construction; the owner feeds it back through [`Orchestrator::on_timer`].
//! All state changes therefore happen on the owner's task. A fired event
//! whose id is not the one outstanding timer is stale and ignored, which
//! also covers anything arriving after [`Orchestrator::teardown`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::config::{CardConfig, ConfigError};
use crate::content::{ContentBlock, ContentKind};
use crate::reveal::{RevealScheduler, TimerHandle};
use crate::samples::SampleProvider;
use crate::snapshot::CardSnapshot;

/// Phases of a regeneration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No session; content and header shown normally
    Idle,
    /// Header moving to its collapsed state; old content still shown
    HeaderCollapsing,
    /// Old content hidden
    ContentHiding,
    /// Replacement units drawn; settling before the first reveal
    Generating,
    /// Typing out the unit at this index
    RevealingItem(usize),
    /// Committing the new units and restoring the card
    Committing,
}

impl Phase {
    /// Whether this is the idle phase
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short label for logs and status lines
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::HeaderCollapsing => "header-collapsing",
            Self::ContentHiding => "content-hiding",
            Self::Generating => "generating",
            Self::RevealingItem(_) => "revealing",
            Self::Committing => "committing",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RevealingItem(index) => write!(f, "revealing({index})"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Identifies one scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Posted by a timer callback when its delay elapses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFired {
    /// The timer that fired
    pub id: TimerId,
}

/// Result of a regenerate signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A new session started
    Started,
    /// Ignored: a session is already running (or the orchestrator is torn down)
    Rejected {
        /// Phase at the time of the signal
        phase: Phase,
    },
}

/// What happened to host-supplied content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentApplied {
    /// Took effect immediately
    Applied,
    /// Held until the running session settles back to idle
    Deferred,
    /// Dropped because the orchestrator is torn down
    Discarded,
}

/// Host notifications for a regeneration's lifecycle
///
/// Every method has a no-op default, so a host implements only what it needs.
pub trait LifecycleListener: Send {
    /// Fired on Idle → `HeaderCollapsing`
    fn on_regeneration_start(&mut self) {}

    /// Fired on Committing → Idle
    fn on_regeneration_end(&mut self) {}

    /// Fired on every phase entry
    fn on_phase_change(&mut self, _phase: Phase) {}
}

/// The transient state of one regeneration
#[derive(Clone, Debug)]
pub struct RegenerationSession {
    kind: ContentKind,
    unit_count: usize,
    pending_units: Vec<String>,
    active_reveal_index: Option<usize>,
    reveal_started_at: Option<Instant>,
}

impl RegenerationSession {
    fn new(kind: ContentKind, unit_count: usize) -> Self {
        Self {
            kind,
            unit_count,
            pending_units: Vec::new(),
            active_reveal_index: None,
            reveal_started_at: None,
        }
    }

    /// Kind captured at trigger time
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Unit count captured at trigger time
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    /// Replacement units (empty until generated)
    #[must_use]
    pub fn pending_units(&self) -> &[String] {
        &self.pending_units
    }

    /// Unit currently being revealed
    #[must_use]
    pub fn active_reveal_index(&self) -> Option<usize> {
        self.active_reveal_index
    }

    /// When the active reveal started
    #[must_use]
    pub fn reveal_started_at(&self) -> Option<Instant> {
        self.reveal_started_at
    }
}

struct PendingTimer {
    id: TimerId,
    handle: TimerHandle,
}

/// The regeneration state machine for one card
pub struct Orchestrator {
    config: CardConfig,
    block: ContentBlock,
    provider: SampleProvider,
    scheduler: RevealScheduler,
    phase: Phase,
    session: Option<RegenerationSession>,
    header_epoch: u64,
    /// Host content received mid-session, applied at the commit boundary
    deferred: Option<ContentBlock>,
    timer: Option<PendingTimer>,
    next_timer_id: u64,
    timer_tx: mpsc::UnboundedSender<TimerFired>,
    listener: Option<Box<dyn LifecycleListener>>,
    torn_down: bool,
}

impl Orchestrator {
    /// Create an orchestrator with an entropy-seeded sample provider
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(
        config: CardConfig,
        block: ContentBlock,
        timer_tx: mpsc::UnboundedSender<TimerFired>,
    ) -> Result<Self, ConfigError> {
        let provider = SampleProvider::new(config.samples.clone())?;
        Self::with_provider(config, block, provider, timer_tx)
    }

    /// Create an orchestrator drawing from the given provider
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn with_provider(
        config: CardConfig,
        block: ContentBlock,
        provider: SampleProvider,
        timer_tx: mpsc::UnboundedSender<TimerFired>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let scheduler = RevealScheduler::new(config.reveal_timing());

        Ok(Self {
            config,
            block,
            provider,
            scheduler,
            phase: Phase::Idle,
            session: None,
            header_epoch: 0,
            deferred: None,
            timer: None,
            next_timer_id: 0,
            timer_tx,
            listener: None,
            torn_down: false,
        })
    }

    /// Attach a lifecycle listener
    #[must_use]
    pub fn with_listener(mut self, listener: Box<dyn LifecycleListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Replace the lifecycle listener
    pub fn set_listener(&mut self, listener: Option<Box<dyn LifecycleListener>>) {
        self.listener = listener;
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `phase != Idle`
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.phase.is_idle()
    }

    /// The committed content
    #[must_use]
    pub fn block(&self) -> &ContentBlock {
        &self.block
    }

    /// The live session, if any
    #[must_use]
    pub fn session(&self) -> Option<&RegenerationSession> {
        self.session.as_ref()
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// The reveal scheduler in use
    #[must_use]
    pub fn scheduler(&self) -> &RevealScheduler {
        &self.scheduler
    }

    /// Id of the one outstanding timer
    #[must_use]
    pub fn outstanding_timer(&self) -> Option<TimerId> {
        self.timer.as_ref().map(|t| t.id)
    }

    /// Whether [`Orchestrator::teardown`] has run
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Handle a regenerate signal
    ///
    /// Starts a session when idle; anything else is a no-op.
    pub fn regenerate(&mut self) -> TriggerOutcome {
        if self.torn_down || self.is_busy() {
            debug!(phase = %self.phase, "Regenerate ignored, session already running");
            return TriggerOutcome::Rejected { phase: self.phase };
        }

        let session = RegenerationSession::new(self.block.kind, self.block.units.len());
        info!(
            kind = %session.kind,
            units = session.unit_count,
            "Regeneration started"
        );
        self.session = Some(session);

        self.enter(Phase::HeaderCollapsing);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_regeneration_start();
        }
        self.schedule(self.config.header_settle_delay);

        TriggerOutcome::Started
    }

    /// Advance the state machine for a fired timer
    ///
    /// Returns `false` if the event was stale and ignored.
    pub fn on_timer(&mut self, fired: TimerFired) -> bool {
        if self.torn_down {
            trace!(timer = ?fired.id, "Timer after teardown ignored");
            return false;
        }
        match self.timer {
            Some(ref pending) if pending.id == fired.id => {}
            _ => {
                trace!(timer = ?fired.id, "Stale timer ignored");
                return false;
            }
        }
        self.timer = None;

        match self.phase {
            Phase::HeaderCollapsing => self.hide_content(),
            Phase::Generating => self.reveal(0),
            Phase::RevealingItem(index) => self.finish_reveal(index),
            Phase::Committing => self.settle_commit(),
            Phase::Idle | Phase::ContentHiding => {
                warn!(phase = %self.phase, "Timer fired in a phase that schedules none");
            }
        }
        true
    }

    /// Supply new content from the host
    ///
    /// Applied immediately when idle. While a session runs, the content is
    /// held and applied when the session settles (last write wins), so an
    /// in-flight reveal never tears.
    pub fn replace_content(&mut self, block: ContentBlock) -> ContentApplied {
        if self.torn_down {
            return ContentApplied::Discarded;
        }
        if self.is_busy() {
            debug!(phase = %self.phase, "Deferring host content until the session settles");
            self.deferred = Some(block);
            return ContentApplied::Deferred;
        }
        self.block = block;
        ContentApplied::Applied
    }

    /// Snapshot for the renderer at the current instant
    #[must_use]
    pub fn snapshot(&self) -> CardSnapshot {
        self.snapshot_at(Instant::now())
    }

    /// Snapshot for the renderer at `now`
    #[must_use]
    pub fn snapshot_at(&self, now: Instant) -> CardSnapshot {
        let session = self.session.as_ref();

        let visible_units = match (self.phase, session) {
            (Phase::Idle | Phase::HeaderCollapsing, _) => self.block.units.clone(),
            (Phase::RevealingItem(index), Some(session)) => self.revealed_units(session, index, now),
            (Phase::Committing, Some(session)) => session.pending_units.clone(),
            _ => Vec::new(),
        };

        let content_visible = match self.phase {
            Phase::Idle | Phase::HeaderCollapsing | Phase::RevealingItem(_) => true,
            Phase::ContentHiding | Phase::Generating => false,
            Phase::Committing => session.is_some(),
        };

        let header_collapsed = match self.phase {
            Phase::Idle => false,
            Phase::Committing => session.is_some(),
            _ => true,
        };

        CardSnapshot {
            phase: self.phase,
            is_busy: self.is_busy(),
            visible_units,
            active_reveal_index: session.and_then(|s| s.active_reveal_index),
            header_collapsed,
            content_visible,
            header_epoch: self.header_epoch,
            copied: false,
            copy_error: None,
            heading: self.block.heading.clone(),
            summary: self.block.summary.clone(),
            kind: self.block.kind,
            actions: self.block.actions.clone(),
        }
    }

    /// Cancel the outstanding timer and discard any live session
    ///
    /// After teardown no timer event, trigger or content update mutates the
    /// orchestrator. The phase is frozen where teardown found it, so a card
    /// torn down mid-session keeps reporting busy and never reaches `Idle`;
    /// hosts should not poll for `Idle` afterwards. Returns `true` if a
    /// pending timer was cancelled.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;

        let cancelled = self
            .timer
            .take()
            .is_some_and(|pending| pending.handle.cancel());
        if self.session.take().is_some() {
            info!(phase = %self.phase, "Discarded in-flight regeneration on teardown");
        }
        self.deferred = None;

        debug!(cancelled, "Orchestrator torn down");
        cancelled
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, "Phase transition");
        self.phase = phase;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_phase_change(phase);
        }
    }

    fn hide_content(&mut self) {
        self.enter(Phase::ContentHiding);
        self.generate();
    }

    fn generate(&mut self) {
        self.enter(Phase::Generating);

        let count = match self.session.as_mut() {
            Some(session) => {
                session.pending_units = self.provider.draw(session.kind, session.unit_count);
                session.pending_units.len()
            }
            None => 0,
        };
        debug!(count, "Generated replacement units");

        if count == 0 {
            self.enter_committing();
        } else {
            self.schedule(self.config.content_hide_settle_delay);
        }
    }

    fn reveal(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(unit) = session.pending_units.get(index) else {
            return;
        };
        let duration = self.scheduler.plan_duration(unit);
        session.active_reveal_index = Some(index);
        session.reveal_started_at = Some(Instant::now());

        self.enter(Phase::RevealingItem(index));
        self.schedule(duration);
    }

    fn finish_reveal(&mut self, index: usize) {
        let count = self.session.as_ref().map_or(0, |s| s.pending_units.len());
        if index + 1 < count {
            self.reveal(index + 1);
        } else {
            self.enter_committing();
        }
    }

    fn enter_committing(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.active_reveal_index = None;
            session.reveal_started_at = None;
        }
        self.enter(Phase::Committing);
        self.schedule(self.config.commit_settle_delay);
    }

    /// Committing has two steps: the live session marks the first
    fn settle_commit(&mut self) {
        match self.session.take() {
            Some(session) => {
                debug!(units = session.pending_units.len(), "Committing regenerated units");
                self.block.units = session.pending_units;
                self.header_epoch += 1;
                self.schedule(self.config.visibility_restore_delay);
            }
            None => self.finish(),
        }
    }

    fn finish(&mut self) {
        if let Some(block) = self.deferred.take() {
            debug!(units = block.units.len(), kind = %block.kind, "Applying deferred host content");
            self.block = block;
        }

        self.enter(Phase::Idle);
        info!(units = self.block.units.len(), "Regeneration finished");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_regeneration_end();
        }
    }

    fn schedule(&mut self, delay: Duration) {
        if let Some(previous) = self.timer.take() {
            previous.handle.cancel();
        }

        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;

        let tx = self.timer_tx.clone();
        let handle = self.scheduler.after(delay, move || {
            // Receiver gone means the owner is shutting down
            let _ = tx.send(TimerFired { id });
        });
        trace!(timer = ?id, delay_ms = delay.as_millis(), "Timer scheduled");
        self.timer = Some(PendingTimer { id, handle });
    }

    fn revealed_units(&self, session: &RegenerationSession, index: usize, now: Instant) -> Vec<String> {
        let elapsed = session
            .reveal_started_at
            .map_or(Duration::ZERO, |started| now.saturating_duration_since(started));

        session
            .pending_units
            .iter()
            .take(index + 1)
            .enumerate()
            .map(|(i, unit)| {
                if i < index {
                    unit.clone()
                } else {
                    let typed = self.scheduler.typed_chars(unit, elapsed);
                    unit.chars().take(typed).collect()
                }
            })
            .collect()
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.teardown();
    }
}
