//! Card Engine
//!
//! Runs one [`Orchestrator`] on a single tokio task: the card's cooperative
//! timeline. Hosts hold a cheap, cloneable [`CardHandle`] and talk to the
//! engine with typed [`CardCommand`]s; timer expiries arrive on a second
//! channel. Both are drained by the same loop, so state only ever changes
//! on the engine task.
//!
//! # Usage
//!
//! ```ignore
//! let (engine, handle) = CardEngine::new(config, block, MemoryClipboard::new())?;
//! let task = engine.spawn();
//!
//! handle.regenerate().await?;
//! let snapshot = handle.snapshot().await?;   // render from this
//!
//! handle.shutdown().await?;                  // cancels the outstanding timer
//! task.await?;
//! ```

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::clipboard::{Clipboard, CopyOutcome};
use crate::config::{CardConfig, ConfigError};
use crate::content::ContentBlock;
use crate::orchestrator::{ContentApplied, LifecycleListener, Orchestrator, TimerFired, TriggerOutcome};
use crate::samples::SampleProvider;
use crate::snapshot::CardSnapshot;

/// Capacity of the host → engine command channel
const COMMAND_CAPACITY: usize = 64;

/// Errors returned by [`CardHandle`]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The engine task is gone
    #[error("Card engine has shut down")]
    Closed,
}

/// Commands from a host to the engine
#[derive(Debug)]
pub enum CardCommand {
    /// The regenerate signal
    Regenerate {
        /// Receives whether a session started
        reply: oneshot::Sender<TriggerOutcome>,
    },
    /// New content from the host
    ReplaceContent {
        /// The new block
        block: ContentBlock,
        /// Receives whether it applied now or at the commit boundary
        reply: oneshot::Sender<ContentApplied>,
    },
    /// Copy the committed units to the clipboard
    Copy {
        /// Receives the copy result
        reply: oneshot::Sender<CopyOutcome>,
    },
    /// Pull a presentation snapshot
    Snapshot {
        /// Receives the snapshot
        reply: oneshot::Sender<CardSnapshot>,
    },
    /// Tear the card down and stop the engine
    Shutdown {
        /// Receives whether a pending timer was cancelled
        reply: oneshot::Sender<bool>,
    },
}

/// State owned by the engine loop, separate from its channels
struct EngineState {
    orchestrator: Orchestrator,
    clipboard: Box<dyn Clipboard>,
    copied_until: Option<Instant>,
    /// Last copy failure and when its notice expires
    copy_failure: Option<(String, Instant)>,
}

impl EngineState {
    fn snapshot(&self) -> CardSnapshot {
        let now = Instant::now();
        let mut snapshot = self.orchestrator.snapshot_at(now);
        snapshot.copied = self.copied_until.is_some_and(|until| now < until);
        snapshot.copy_error = self
            .copy_failure
            .as_ref()
            .filter(|(_, until)| now < *until)
            .map(|(message, _)| message.clone());
        snapshot
    }

    fn copy(&mut self) -> CopyOutcome {
        if self.orchestrator.is_busy() {
            debug!(phase = %self.orchestrator.phase(), "Copy refused while regenerating");
            return CopyOutcome::Busy;
        }

        let text = self.orchestrator.block().copy_text();
        match self.clipboard.copy(&text) {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + self.orchestrator.config().copy_feedback);
                self.copy_failure = None;
                info!(chars = text.chars().count(), "Copied card content");
                CopyOutcome::Copied
            }
            Err(e) => {
                warn!(error = %e, "Failed to copy card content");
                self.copied_until = None;
                self.copy_failure = Some((
                    e.to_string(),
                    Instant::now() + self.orchestrator.config().copy_feedback,
                ));
                CopyOutcome::Failed(e)
            }
        }
    }

    /// Returns `false` once the engine should stop
    fn handle(&mut self, command: CardCommand) -> bool {
        match command {
            CardCommand::Regenerate { reply } => {
                let _ = reply.send(self.orchestrator.regenerate());
            }
            CardCommand::ReplaceContent { block, reply } => {
                let _ = reply.send(self.orchestrator.replace_content(block));
            }
            CardCommand::Copy { reply } => {
                let _ = reply.send(self.copy());
            }
            CardCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            CardCommand::Shutdown { reply } => {
                let _ = reply.send(self.orchestrator.teardown());
                return false;
            }
        }
        true
    }
}

/// Async actor hosting one card's orchestrator
pub struct CardEngine {
    state: EngineState,
    commands: mpsc::Receiver<CardCommand>,
    timers: mpsc::UnboundedReceiver<TimerFired>,
}

impl CardEngine {
    /// Create an engine and the handle that drives it
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(
        config: CardConfig,
        block: ContentBlock,
        clipboard: impl Clipboard + 'static,
    ) -> Result<(Self, CardHandle), ConfigError> {
        let provider = SampleProvider::new(config.samples.clone())?;
        Self::with_provider(config, block, provider, clipboard)
    }

    /// Create an engine drawing samples from `provider`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn with_provider(
        config: CardConfig,
        block: ContentBlock,
        provider: SampleProvider,
        clipboard: impl Clipboard + 'static,
    ) -> Result<(Self, CardHandle), ConfigError> {
        let (timer_tx, timers) = mpsc::unbounded_channel();
        let (command_tx, commands) = mpsc::channel(COMMAND_CAPACITY);

        let orchestrator = Orchestrator::with_provider(config, block, provider, timer_tx)?;

        let engine = Self {
            state: EngineState {
                orchestrator,
                clipboard: Box::new(clipboard),
                copied_until: None,
                copy_failure: None,
            },
            commands,
            timers,
        };
        Ok((engine, CardHandle { commands: command_tx }))
    }

    /// Attach a lifecycle listener
    #[must_use]
    pub fn with_listener(mut self, listener: Box<dyn LifecycleListener>) -> Self {
        self.state.orchestrator.set_listener(Some(listener));
        self
    }

    /// Run the engine on its own task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drain commands and timer events until shutdown
    ///
    /// Dropping every [`CardHandle`] also shuts the engine down.
    pub async fn run(mut self) {
        info!(units = self.state.orchestrator.block().units.len(), "Card engine started");

        loop {
            tokio::select! {
                biased;

                Some(fired) = self.timers.recv() => {
                    self.state.orchestrator.on_timer(fired);
                }

                command = self.commands.recv() => {
                    let keep_running = match command {
                        Some(command) => self.state.handle(command),
                        None => {
                            debug!("All card handles dropped");
                            self.state.orchestrator.teardown();
                            false
                        }
                    };
                    if !keep_running {
                        break;
                    }
                }
            }
        }

        info!("Card engine stopped");
    }
}

/// Host-side handle to a running [`CardEngine`]
#[derive(Clone, Debug)]
pub struct CardHandle {
    commands: mpsc::Sender<CardCommand>,
}

impl CardHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> CardCommand,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| EngineError::Closed)?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    /// Send the regenerate signal
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine has stopped.
    pub async fn regenerate(&self) -> Result<TriggerOutcome, EngineError> {
        self.request(|reply| CardCommand::Regenerate { reply }).await
    }

    /// Hand the card new content
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine has stopped.
    pub async fn replace_content(&self, block: ContentBlock) -> Result<ContentApplied, EngineError> {
        self.request(|reply| CardCommand::ReplaceContent { block, reply })
            .await
    }

    /// Copy the committed units to the clipboard
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine has stopped.
    pub async fn copy(&self) -> Result<CopyOutcome, EngineError> {
        self.request(|reply| CardCommand::Copy { reply }).await
    }

    /// Pull the current presentation snapshot
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine has stopped.
    pub async fn snapshot(&self) -> Result<CardSnapshot, EngineError> {
        self.request(|reply| CardCommand::Snapshot { reply }).await
    }

    /// Tear the card down
    ///
    /// Returns whether a pending timer had to be cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the engine had already stopped.
    pub async fn shutdown(&self) -> Result<bool, EngineError> {
        self.request(|reply| CardCommand::Shutdown { reply }).await
    }
}
