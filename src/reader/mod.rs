//! Markup Reader Module
//!
//! - SliceReader: event reader over a markup string
//! - Events: markup event types for pull parsing

pub mod events;
pub mod slice;
