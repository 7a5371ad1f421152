//! RustyHighlight - Text highlighting over a markup container
//!
//! Components:
//! - Tree indexer: flat char offsets for every leaf of the container
//! - Highlight store: the persistent, insertion-ordered highlight set
//! - Selection mapper: host selections to highlight records
//! - Overlap renderer: nested marker markup for overlapping highlights
//! - Shift engine: highlight re-alignment after the text is edited

use tracing::debug;
use rustler::{Atom, Binary, Encoder, Env, LocalPid, NifResult, ResourceArc, Term};

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod highlight;
pub mod highlighter;
pub mod log;
pub mod reader;
mod resource;
mod term;

use error::{HighlightError, Result};
use highlight::{Highlight, Selection};
use highlighter::Highlighter;
use resource::{HighlighterRef, HighlighterResource};
use term::{
    error, event_from_atom, highlight_captured, highlights_from_terms, highlights_to_terms, none, ok,
    str_to_binary, HighlightTerm, OptionsTerm, SelectionTerm,
};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Result Encoding
// ============================================================================

fn error_term<'a>(env: Env<'a>, err: HighlightError) -> Term<'a> {
    (error(), err.to_string()).encode(env)
}

/// `:ok` or `{:error, reason}`
fn status_term<'a>(env: Env<'a>, result: Result<()>) -> Term<'a> {
    match result {
        Ok(()) => ok().encode(env),
        Err(e) => error_term(env, e),
    }
}

/// `{:ok, highlight}`, `:none` or `{:error, reason}`
fn captured_term<'a>(env: Env<'a>, result: Result<Option<Highlight>>) -> Term<'a> {
    match result {
        Ok(Some(h)) => (ok(), HighlightTerm::from(&h)).encode(env),
        Ok(None) => none().encode(env),
        Err(e) => error_term(env, e),
    }
}

/// Send queued captures to their subscribers
fn deliver_captures(env: Env, resource: &HighlighterRef) -> Result<()> {
    for (pid, highlight) in resource.drain_outbox()? {
        // A dead subscriber is not an error for the caller
        if let Err(e) = env.send(&pid, (highlight_captured(), HighlightTerm::from(&highlight))) {
            debug!(?e, "dropped capture for unreachable subscriber");
        }
    }
    Ok(())
}

// ============================================================================
// Highlighter Lifecycle
// ============================================================================

/// Parse container markup into a new highlighter
#[rustler::nif]
fn new<'a>(env: Env<'a>, markup: Binary<'a>, options: OptionsTerm) -> NifResult<Term<'a>> {
    match Highlighter::new(markup.as_slice(), options.into()) {
        Ok(highlighter) => {
            let arc = ResourceArc::new(HighlighterResource::new(highlighter));
            Ok((ok(), arc).encode(env))
        }
        Err(e) => Ok(error_term(env, e)),
    }
}

/// Append highlights and re-render; the batch is rejected as a whole
#[rustler::nif(schedule = "DirtyCpu")]
fn render_highlights<'a>(
    env: Env<'a>,
    resource: HighlighterRef,
    highlights: Vec<HighlightTerm>,
) -> NifResult<Term<'a>> {
    let result = highlights_from_terms(highlights)
        .and_then(|batch| resource.with_highlighter(|hl| hl.render_highlights(batch))?)
        .map(|_| ());
    Ok(status_term(env, result))
}

#[rustler::nif]
fn remove_highlights<'a>(env: Env<'a>, resource: HighlighterRef) -> NifResult<Term<'a>> {
    let result = resource.with_highlighter(|hl| hl.remove_highlights());
    Ok(status_term(env, result))
}

#[rustler::nif]
fn get_highlights<'a>(env: Env<'a>, resource: HighlighterRef) -> NifResult<Term<'a>> {
    match resource.with_highlighter(|hl| highlights_to_terms(hl.get_highlights())) {
        Ok(terms) => Ok(terms.encode(env)),
        Err(e) => Ok(error_term(env, e)),
    }
}

/// Replace the container content, shift highlights and re-render
#[rustler::nif(schedule = "DirtyCpu")]
fn update_content<'a>(env: Env<'a>, resource: HighlighterRef, markup: Binary<'a>) -> NifResult<Term<'a>> {
    let result = resource
        .with_highlighter(|hl| hl.update_content(markup.as_slice()))
        .and_then(|inner| inner.map(|_| ()));
    Ok(status_term(env, result))
}

// ============================================================================
// Selection Capture
// ============================================================================

/// Send every future capture to `pid` as `{:highlight_captured, highlight}`
#[rustler::nif]
fn subscribe<'a>(env: Env<'a>, resource: HighlighterRef, pid: LocalPid) -> NifResult<Term<'a>> {
    Ok(status_term(env, resource.subscribe(pid)))
}

/// Host selection event; qualifying events capture and notify subscribers
#[rustler::nif]
fn selection_event<'a>(
    env: Env<'a>,
    resource: HighlighterRef,
    event: Atom,
    selection: SelectionTerm,
) -> NifResult<Term<'a>> {
    let selection: Selection = selection.into();
    let result = resource.with_highlighter(|hl| hl.handle_selection_event(event_from_atom(event), &selection));
    if let Err(e) = deliver_captures(env, &resource) {
        return Ok(error_term(env, e));
    }
    Ok(captured_term(env, result))
}

/// Capture a selection without notifying subscribers
#[rustler::nif]
fn capture_highlight<'a>(env: Env<'a>, resource: HighlighterRef, selection: SelectionTerm) -> NifResult<Term<'a>> {
    let selection: Selection = selection.into();
    let result = resource.with_highlighter(|hl| hl.capture(&selection));
    Ok(captured_term(env, result))
}

// ============================================================================
// Shift Engine
// ============================================================================

/// Shift highlights from `old_text` offsets to `new_text` offsets
#[rustler::nif(schedule = "DirtyCpu")]
fn shift_highlights<'a>(
    env: Env<'a>,
    old_text: &str,
    new_text: &str,
    highlights: Vec<HighlightTerm>,
) -> NifResult<Term<'a>> {
    match highlights_from_terms(highlights) {
        Ok(items) => {
            let shifted = highlight::shift(old_text, new_text, &items);
            Ok((ok(), highlights_to_terms(&shifted)).encode(env))
        }
        Err(e) => Ok(error_term(env, e)),
    }
}

// ============================================================================
// Container Queries
// ============================================================================

/// Rendered container markup
#[rustler::nif]
fn to_markup<'a>(env: Env<'a>, resource: HighlighterRef) -> NifResult<Term<'a>> {
    match resource.with_highlighter(|hl| hl.markup()) {
        Ok(markup) => Ok(str_to_binary(env, &markup)),
        Err(e) => Ok(error_term(env, e)),
    }
}

#[rustler::nif]
fn text_content<'a>(env: Env<'a>, resource: HighlighterRef) -> NifResult<Term<'a>> {
    match resource.with_highlighter(|hl| hl.text_content()) {
        Ok(text) => Ok(str_to_binary(env, &text)),
        Err(e) => Ok(error_term(env, e)),
    }
}

/// `[{node_id, start, text}]` for every leaf of the rendered container
#[rustler::nif]
fn leaves<'a>(env: Env<'a>, resource: HighlighterRef) -> NifResult<Term<'a>> {
    let result = resource.with_highlighter(|hl| {
        hl.index()
            .leaves()
            .map(|leaf| (leaf.node, leaf.start, leaf.text.clone()))
            .collect::<Vec<_>>()
    });
    match result {
        Ok(leaves) => {
            let mut list = Term::list_new_empty(env);
            for (node, start, text) in leaves.into_iter().rev() {
                list = list.list_prepend((node, start, str_to_binary(env, &text)).encode(env));
            }
            Ok(list)
        }
        Err(e) => Ok(error_term(env, e)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

fn load(_env: Env, _info: Term) -> bool {
    log::init();
    true
}

rustler::init!("Elixir.RustyHighlight.Native", load = load);
