//! file: core/src/lower/diagnostics.rs
//! description: attaches source locations to failures raised while lowering.
//!
//! Every visit passes its result through `attach_location`. The first visit
//! to see a failure (the innermost one) tags it with `<File "...", line N>`;
//! enclosing visits find the tag already present and forward the error
//! untouched, so a failure carries exactly one tag.

use crate::error::TranslateError;
use crate::location::{Location, Span};

pub fn attach_location(
    err: TranslateError,
    file: &str,
    line: usize,
    column: usize,
    span: Option<Span>,
) -> TranslateError {
    if err.is_tagged() {
        return err;
    }
    let location = Location::new(file.to_string(), line, column);
    let tag = location.file_link();
    log::debug!("{} {}", tag, err);
    TranslateError::tagged(err, &tag, location, span)
}
