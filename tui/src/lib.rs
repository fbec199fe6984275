//! Genblock TUI - Terminal dashboard for the generative content card
//!
//! A thin surface over `genblock-core`: it forwards key presses to a
//! [`genblock_core::CardHandle`] and redraws the card from a pulled
//! [`genblock_core::CardSnapshot`] every frame.
//!
//! # Architecture
//!
//! - **App**: event loop, key bindings, frame pacing
//! - **Dashboard**: host content and the paragraph / bullet toggle
//! - **Widgets**: the stateless card renderer
//! - **Clipboard**: desktop clipboard adapter

pub mod app;
pub mod clipboard;
pub mod dashboard;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use clipboard::SystemClipboard;
pub use dashboard::Dashboard;
