//! ResourceArc Wrappers
//!
//! Persistent highlighter state held by Elixir processes.

use crate::error::{HighlightError, Result};
use crate::highlight::Highlight;
use crate::highlighter::Highlighter;
use rustler::{LocalPid, ResourceArc};
use std::sync::{Arc, Mutex};

/// Captured highlights waiting to be sent to subscribed pids
pub type Outbox = Arc<Mutex<Vec<(LocalPid, Highlight)>>>;

/// Wrapper for Highlighter that can be stored in a ResourceArc.
///
/// Subscriber callbacks cannot hold an `Env`, so they queue into `outbox`
/// and the calling NIF delivers the messages once the callbacks return.
pub struct HighlighterResource {
    pub inner: Mutex<Highlighter>,
    pub outbox: Outbox,
}

impl HighlighterResource {
    pub fn new(highlighter: Highlighter) -> Self {
        HighlighterResource {
            inner: Mutex::new(highlighter),
            outbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run `f` with exclusive access to the highlighter.
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError::Poisoned`] if the mutex is poisoned.
    pub fn with_highlighter<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Highlighter) -> R,
    {
        let mut guard = self.inner.lock().map_err(|_| HighlightError::Poisoned)?;
        Ok(f(&mut *guard))
    }

    /// Register `pid` to receive every captured highlight
    pub fn subscribe(&self, pid: LocalPid) -> Result<()> {
        let outbox = Arc::clone(&self.outbox);
        self.with_highlighter(move |hl| {
            hl.on_selection_capture(move |highlight| {
                if let Ok(mut queue) = outbox.lock() {
                    queue.push((pid, highlight.clone()));
                }
            })
        })
    }

    /// Take every queued notification
    pub fn drain_outbox(&self) -> Result<Vec<(LocalPid, Highlight)>> {
        let mut queue = self.outbox.lock().map_err(|_| HighlightError::Poisoned)?;
        Ok(std::mem::take(&mut *queue))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for HighlighterResource {}

/// Type alias for the ResourceArc
pub type HighlighterRef = ResourceArc<HighlighterResource>;
