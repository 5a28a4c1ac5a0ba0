//! Marker-region scanner.
//!
//! A generated region is delimited by a BEGIN/END marker pair, each matched
//! as a substring of a single line. The scanner splits the target into a
//! preserved prefix (through the BEGIN line), the old body (discarded and
//! fully reconstructed from the schema every run), and a preserved suffix
//! (from the END line onward). Missing, duplicated, or misordered markers
//! are fatal — the file is never guessed at or modified.

use std::path::Path;

use crate::error::MarkerError;

/// A target split around one marker region.
#[derive(Debug)]
pub struct MarkerSplit<'a> {
    /// Everything through the end of the BEGIN marker line.
    pub prefix: &'a str,
    /// The old region body, owned by the generator.
    pub body: &'a str,
    /// Everything from the start of the END marker line.
    pub suffix: &'a str,
}

/// Locate the marker pair in `text` and split around it.
pub fn split<'a>(
    text: &'a str,
    begin: &str,
    end: &str,
    path: &Path,
) -> Result<MarkerSplit<'a>, MarkerError> {
    // (line start, line end including the newline)
    let mut begin_span: Option<(usize, usize)> = None;
    let mut end_span: Option<(usize, usize)> = None;

    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let span = (offset, offset + line.len());
        if line.contains(begin) {
            if begin_span.is_some() {
                return Err(MarkerError::DuplicateMarker {
                    path: path.to_path_buf(),
                    marker: begin.to_string(),
                });
            }
            begin_span = Some(span);
        }
        if line.contains(end) {
            if end_span.is_some() {
                return Err(MarkerError::DuplicateMarker {
                    path: path.to_path_buf(),
                    marker: end.to_string(),
                });
            }
            end_span = Some(span);
        }
        offset = span.1;
    }

    let (_, begin_stop) = begin_span.ok_or_else(|| MarkerError::MissingBegin {
        path: path.to_path_buf(),
        marker: begin.to_string(),
    })?;
    let (end_start, _) = end_span.ok_or_else(|| MarkerError::MissingEnd {
        path: path.to_path_buf(),
        marker: end.to_string(),
    })?;

    // The END line must come strictly after the BEGIN line; sharing a line
    // leaves no well-defined region either.
    if end_start < begin_stop {
        return Err(MarkerError::MisorderedMarkers {
            path: path.to_path_buf(),
            begin: begin.to_string(),
            end: end.to_string(),
        });
    }

    Ok(MarkerSplit {
        prefix: &text[..begin_stop],
        body: &text[begin_stop..end_start],
        suffix: &text[end_start..],
    })
}
