//! Genblock Core - Headless Regeneration Orchestration
//!
//! This crate drives a "generative content" card: a card that can replace its
//! own text through a staged regeneration animation. It is completely
//! independent of any UI framework; a surface only ever renders the
//! [`CardSnapshot`] it pulls from the core.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Presentation Surface                      │
//! │            (TUI card widget, headless trace, tests)           │
//! └───────────────┬──────────────────────────────▲───────────────┘
//!                 │ CardCommand (regenerate,     │ CardSnapshot
//!                 │ copy, replace, shutdown)     │ (pull)
//! ┌───────────────▼──────────────────────────────┴───────────────┐
//! │                         CardEngine                            │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                    Orchestrator                        │  │
//! │  │   ┌────────────────┐          ┌─────────────────────┐  │  │
//! │  │   │ SampleProvider │          │   RevealScheduler   │  │  │
//! │  │   └────────────────┘          └─────────────────────┘  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Orchestrator`]: the phase state machine owning one regeneration session
//! - [`SampleProvider`]: draws replacement units from fixed sample pools
//! - [`RevealScheduler`]: reveal durations and the cancellable delay primitive
//! - [`CardEngine`] / [`CardHandle`]: async actor hosting an orchestrator
//! - [`CardSnapshot`]: everything a renderer may look at
//!
//! # Module Overview
//!
//! - [`content`]: content block model
//! - [`samples`]: sample pools and random draws
//! - [`reveal`]: typing reveal timing and timers
//! - [`orchestrator`]: the regeneration state machine
//! - [`snapshot`]: the presentation contract
//! - [`engine`]: the actor running an orchestrator on one task
//! - [`clipboard`]: the copy action seam
//! - [`config`]: layered configuration (defaults, TOML, env, CLI)
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clipboard;
pub mod config;
pub mod content;
pub mod engine;
pub mod orchestrator;
pub mod reveal;
pub mod samples;
pub mod snapshot;

pub use clipboard::{Clipboard, ClipboardError, CopyOutcome, MemoryClipboard};
pub use config::{
    default_config_path, load_config, load_config_from_path, CardConfig, CardToml, ConfigError,
    ConfigOverrides, ConfigSource,
};
pub use content::{ContentBlock, ContentKind};
pub use engine::{CardCommand, CardEngine, CardHandle, EngineError};
pub use orchestrator::{
    ContentApplied, LifecycleListener, Orchestrator, Phase, RegenerationSession, TimerFired,
    TimerId, TriggerOutcome,
};
pub use reveal::{RevealScheduler, RevealTiming, TimerHandle};
pub use samples::{SamplePools, SampleProvider};
pub use snapshot::CardSnapshot;
