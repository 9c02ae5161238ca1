//! Reading primitive events from text.
//!
//! The line format is an optional event-count header followed by one event
//! per line:
//!
//! ```text
//! 3
//! ADD 1 /test -
//! ADD 2 /test/1.txt f2fa762f
//! DEL 3 /test/1.txt f2fa762f
//! ```
//!
//! Fields are whitespace separated: operation (`ADD` or `DEL`), timestamp,
//! path, and content hash, where `-` marks a folder. Blank lines and lines
//! starting with `#` are ignored. Events can also be supplied as JSON lines
//! of [`PrimitiveEvent`].

use crate::error::FeedError;
use crate::event::{ContentHash, PrimitiveEvent, PrimitiveOp};
use crate::path::ObjectPath;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Parse one event line. `line` is the 1-based line number used in errors.
///
/// Returns `Ok(None)` for blank and comment lines. A line with more than
/// four fields is an error.
///
/// # Examples
///
/// ```
/// use fsfold::{feed, ObjectKind, PrimitiveOp};
///
/// let event = feed::parse_line(1, "DEL 7 /a/b.t 1111").unwrap().unwrap();
/// assert_eq!(event.op, PrimitiveOp::Delete);
/// assert_eq!(event.ts, 7);
/// assert_eq!(event.kind(), ObjectKind::File);
///
/// assert!(feed::parse_line(2, "# comment").unwrap().is_none());
/// assert!(feed::parse_line(3, "MOV 8 /a -").is_err());
/// ```
pub fn parse_line(line: usize, text: &str) -> Result<Option<PrimitiveEvent>, FeedError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut fields = text.split_whitespace();
    let mut next =
        |field: &'static str| fields.next().ok_or(FeedError::MissingField { line, field });

    let op = match next("operation")? {
        "ADD" => PrimitiveOp::Create,
        "DEL" => PrimitiveOp::Delete,
        other => {
            return Err(FeedError::UnknownOperation {
                line,
                op: other.to_string(),
            });
        }
    };

    let raw_ts = next("timestamp")?;
    let ts = raw_ts.parse::<u64>().map_err(|_| FeedError::BadTimestamp {
        line,
        value: raw_ts.to_string(),
    })?;

    let path = ObjectPath::parse(next("path")?).map_err(|source| FeedError::Path { line, source })?;
    let hash = ContentHash::from_feed(next("hash")?);

    if let Some(extra) = fields.next() {
        return Err(FeedError::TrailingField {
            line,
            value: extra.to_string(),
        });
    }

    Ok(Some(PrimitiveEvent { op, ts, path, hash }))
}

/// Parse a whole feed.
///
/// If the first meaningful line is a lone number it is taken as the event
/// count, and the number of event lines that follow must match it.
///
/// # Errors
///
/// Fails on the first malformed line, or on a count mismatch. No events are
/// returned in that case.
pub fn parse_batch(text: &str) -> Result<Vec<PrimitiveEvent>, FeedError> {
    let mut expected = None;
    let mut events = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if expected.is_none() && events.is_empty() && !trimmed.contains(char::is_whitespace) {
            let count = trimmed.parse::<usize>().map_err(|_| FeedError::BadCount {
                line,
                value: trimmed.to_string(),
            })?;
            expected = Some(count);
            continue;
        }

        if let Some(event) = parse_line(line, trimmed)? {
            events.push(event);
        }
    }

    if let Some(expected) = expected {
        if expected != events.len() {
            return Err(FeedError::CountMismatch {
                expected,
                found: events.len(),
            });
        }
    }
    Ok(events)
}

/// Read and parse a feed file in the line format.
pub fn read_file(path: &Path) -> Result<Vec<PrimitiveEvent>, FeedError> {
    let text = fs::read_to_string(path)?;
    parse_batch(&text)
}

/// Parse JSON lines of [`PrimitiveEvent`]. Empty lines are skipped, and a
/// `"-"` hash marks a folder just as in the line format.
///
/// ```
/// use fsfold::feed;
///
/// let jsonl = r#"{"op":"create","ts":1,"path":"/a"}
/// {"op":"create","ts":2,"path":"/a/b.t","hash":"1111"}
/// "#;
/// let events = feed::parse_jsonl(jsonl.as_bytes()).unwrap();
/// assert_eq!(events.len(), 2);
/// assert!(events[0].hash.is_none());
/// ```
pub fn parse_jsonl<R: BufRead>(reader: R) -> Result<Vec<PrimitiveEvent>, FeedError> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line_text = line?;
        if line_text.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line_text)
            .map_err(|source| FeedError::Json { line: i + 1, source })?;
        events.push(event);
    }
    Ok(events)
}
