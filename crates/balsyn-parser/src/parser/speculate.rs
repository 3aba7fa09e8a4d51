//! Production-scoped backtracking.
//!
//! Productions never write into the diagnostic sink themselves; they return
//! `Err`. That keeps a failed attempt free of side effects once the cursor is
//! reset, and the marker rolls the sink back as well for the few nested
//! constructs (statement bodies of anonymous functions) that do recover
//! internally.

use super::{ParseError, TokenStream};
use balsyn_ast::foundation::Span;
use tracing::trace;

/// Run `f` speculatively.
///
/// Commits and returns `Some` when `f` succeeds; otherwise rewinds the
/// cursor and the diagnostic sink and returns `None`.
pub fn try_parse<'src, T>(
    stream: &mut TokenStream<'src>,
    f: impl FnOnce(&mut TokenStream<'src>) -> Result<T, ParseError>,
) -> Option<T> {
    attempt(stream, f).ok()
}

/// Run `f` speculatively, keeping the error of a failed attempt.
pub fn attempt<'src, T>(
    stream: &mut TokenStream<'src>,
    f: impl FnOnce(&mut TokenStream<'src>) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    let marker = stream.mark();
    match f(stream) {
        Ok(value) => Ok(value),
        Err(err) => {
            trace!(
                pos = marker.pos(),
                failed_at = err.span.start,
                "speculative parse rolled back"
            );
            stream.reset(marker);
            Err(err)
        }
    }
}

/// Error for a choice where every candidate failed.
///
/// `detail` is the error of the candidate that matched the most input; its
/// message is kept as the detail.
pub fn ambiguous(candidates: &[&str], detail: &ParseError, span: Span) -> ParseError {
    ParseError::ambiguous(
        format!(
            "expected {} ({})",
            candidates.join(" or "),
            detail.message
        ),
        span,
    )
}
