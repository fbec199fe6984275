//! Widgets
//!
//! Stateless renderers. They draw from a snapshot and never keep time.

pub mod card;

pub use card::CardWidget;
