//! The reduced history handed to output sinks.

use crate::error::HistoryError;
use crate::event::Event;
use crate::narrate;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// The final, ordered semantic events of a reduction.
///
/// Read-only: sinks iterate it, narrate it, or persist it as JSON lines
/// (one [`Event`] per line, the same layout as any other `.jsonl` log).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    events: Vec<Event>,
}

impl History {
    /// Wrap events that are already in history order.
    pub fn new(events: Vec<Event>) -> Self {
        History { events }
    }

    /// The events as a slice.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterate the events in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// One sentence per event, skipping moves that changed nothing.
    pub fn narrate(&self) -> Vec<String> {
        self.events.iter().filter_map(narrate::describe).collect()
    }

    /// Write every event as a single JSON line.
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<(), HistoryError> {
        for (i, event) in self.events.iter().enumerate() {
            let json = serde_json::to_string(event)
                .map_err(|source| HistoryError::Json { line: i + 1, source })?;
            writeln!(writer, "{json}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a history written by [`write_jsonl`](History::write_jsonl).
    ///
    /// Empty lines are skipped.
    pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Self, HistoryError> {
        let mut events = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event = serde_json::from_str(&line)
                .map_err(|source| HistoryError::Json { line: i + 1, source })?;
            events.push(event);
        }
        Ok(History { events })
    }

    /// Save atomically: write to a `.tmp` sibling, sync, then rename over
    /// `path`. A crash mid-write leaves any previous file intact.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let tmp_path = path.with_extension("jsonl.tmp");

        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        self.write_jsonl(&mut writer)?;
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_data()?;
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load a history saved with [`save`](History::save).
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let file = File::open(path)?;
        History::read_jsonl(BufReader::new(file))
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for History {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
