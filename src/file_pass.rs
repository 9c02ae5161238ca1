//! File-level reduction: fuses each incoming primitive event with the event
//! stored just before it, or with the hash index.

use crate::error::{ReduceError, Result};
use crate::event::{Change, ContentHash, Event, ObjectKind, PrimitiveEvent, PrimitiveOp};
use crate::index::HashIndex;
use crate::path::ObjectPath;
use crate::reducer::ReducerConfig;
use crate::store::EventStore;
use log::{debug, trace, warn};

/// Consume one primitive event, in timestamp order.
///
/// Folder events are stored verbatim; the folder pass deals with them once
/// the batch is complete. A file `Create` is fused with a directly preceding
/// file `Delete` into a `Modify` (same path) or a `Move` (same hash), else
/// narrated as a `Copy` if its hash is already live elsewhere, else stored
/// verbatim. The hash index is then updated from the raw event.
///
/// # Errors
///
/// - [`ReduceError::OutOfOrder`] if `event` is older than the newest stored
///   event.
/// - [`ReduceError::UntrackedDelete`] if `config.strict_index` is set and a
///   file delete has no live index entry.
///
/// On error neither `store` nor `index` has been touched.
pub fn ingest(
    store: &mut EventStore,
    index: &mut HashIndex,
    event: PrimitiveEvent,
    config: &ReducerConfig,
) -> Result<()> {
    if let Some(last) = store.last() {
        if event.ts < last.ts {
            return Err(ReduceError::OutOfOrder {
                ts: event.ts,
                last: last.ts,
            });
        }
    }

    let Some(hash) = event.hash.clone() else {
        store.insert(event.to_event());
        return Ok(());
    };

    if event.op == PrimitiveOp::Delete && config.strict_index && !index.contains(&hash, &event.path)
    {
        return Err(ReduceError::UntrackedDelete {
            path: event.path.to_string(),
            hash: hash.to_string(),
        });
    }

    let narrated = match event.op {
        PrimitiveOp::Create => fuse_with_previous(store, &event.path, &hash, event.ts)
            .or_else(|| detect_copy(index, &event.path, &hash, event.ts, config))
            .unwrap_or_else(|| event.to_event()),
        PrimitiveOp::Delete => event.to_event(),
    };
    store.insert(narrated);

    update_index(index, event.op, hash, event.path);
    Ok(())
}

/// Fuse a file create with the stored event right before it.
///
/// Pops that event from the store and returns the fused event, or leaves the
/// store alone and returns `None`.
fn fuse_with_previous(
    store: &mut EventStore,
    path: &ObjectPath,
    hash: &ContentHash,
    ts: u64,
) -> Option<Event> {
    let prev = store.last()?;
    if !prev.is_file() {
        return None;
    }
    let Change::Delete {
        path: prev_path,
        hash: Some(prev_hash),
        ..
    } = &prev.change
    else {
        return None;
    };

    // Same path wins over same hash: it's the same object either way.
    let change = if prev_path == path {
        debug!("fused delete+create of {path} into a modify");
        Change::Modify {
            path: path.clone(),
            old_hash: prev_hash.clone(),
            new_hash: hash.clone(),
        }
    } else if prev_hash == hash {
        debug!("fused delete of {prev_path} + create of {path} into a move");
        Change::Move {
            from: prev_path.clone(),
            to: path.clone(),
        }
    } else {
        return None;
    };

    store.pop_last();
    Some(Event::new(ts, ObjectKind::File, change))
}

/// Narrate a file create as a copy when another live file holds its hash.
fn detect_copy(
    index: &HashIndex,
    path: &ObjectPath,
    hash: &ContentHash,
    ts: u64,
    config: &ReducerConfig,
) -> Option<Event> {
    if !config.detect_copies {
        return None;
    }
    let src = index.paths(hash).find(|p| *p != path)?;
    debug!("create of {path} copies {src}");
    Some(Event::new(
        ts,
        ObjectKind::File,
        Change::Copy {
            src: src.clone(),
            dest: path.clone(),
        },
    ))
}

fn update_index(index: &mut HashIndex, op: PrimitiveOp, hash: ContentHash, path: ObjectPath) {
    match op {
        PrimitiveOp::Create => {
            trace!("index += ({hash}, {path})");
            index.insert(hash, path);
        }
        PrimitiveOp::Delete => {
            if index.remove(&hash, &path) {
                trace!("index -= ({hash}, {path})");
            } else {
                warn!("delete of {path} ({hash}) has no live index entry");
            }
        }
    }
}
