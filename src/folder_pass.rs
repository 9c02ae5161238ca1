//! Folder-level reduction over a finished store.
//!
//! Runs once after every primitive event is ingested. Nested folder deletes
//! are collapsed bottom-up into the outermost delete, which then carries a
//! [`Subtree`] of everything below it. A collapsed delete directly followed
//! by the creation of an identical tree elsewhere becomes a folder `Move`.
//!
//! Both steps rely on adjacency: a child's delete must come right before its
//! parent's, and a moved tree's creates must follow its delete without
//! interruption. Folder copies are not detected.

use crate::event::{Change, Event, ObjectKind, Subtree};
use crate::path::ObjectPath;
use crate::store::EventStore;
use log::debug;

/// Outcome of [`match_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMatch {
    /// The delete and its create run were replaced by a `Move` at `at`.
    Moved { at: usize },
    /// Nothing changed.
    NoMatch,
}

/// Scan the store once, collapsing nested deletes and detecting folder moves.
pub fn simplify_folders(store: &mut EventStore) {
    let mut i = 0;
    while i < store.len() {
        while i > 0 && collapse(store, i) {
            i -= 1;
        }
        i = match match_move(store, i) {
            MoveMatch::Moved { at } => at + 1,
            MoveMatch::NoMatch => i + 1,
        };
    }
}

/// Fold the delete at `i - 1` into the folder delete at `i`.
///
/// Applies when both are deletes, the one at `i` is a folder, and the one at
/// `i - 1` is its immediate child. The child's name and hash, plus its own
/// subtree re-prefixed with its name, are merged into the folder's subtree
/// and the child is removed, so the folder delete ends up at `i - 1`.
/// Returns whether anything was collapsed.
pub fn collapse(store: &mut EventStore, i: usize) -> bool {
    if i == 0 {
        return false;
    }
    let (Some(prev), Some(cur)) = (store.get(i - 1), store.get(i)) else {
        return false;
    };
    let applies = match (&prev.change, &cur.change) {
        (Change::Delete { path: child, .. }, Change::Delete { path: folder, .. }) => {
            cur.kind == ObjectKind::Folder && child.parent().as_ref() == Some(folder)
        }
        _ => false,
    };
    if !applies {
        return false;
    }

    let removed = store.remove(i - 1);
    if let (
        Change::Delete {
            path: child,
            hash,
            subtree: child_tree,
        },
        Some(Event {
            change: Change::Delete {
                path: folder,
                subtree,
                ..
            },
            ..
        }),
    ) = (removed.change, store.get_mut(i - 1))
    {
        let name = child.name();
        debug!("collapsed delete of {child} into {folder}");
        subtree.insert(name, hash);
        subtree.absorb(name, child_tree);
    }
    true
}

/// Replace a folder delete and the create run that rebuilds its exact tree
/// with a single folder `Move`.
///
/// The run starts at `del_idx + 1` with a folder create at some path `P` and
/// extends over every consecutive create strictly below `P`. It matches when
/// the tree it builds, relative to `P`, equals the delete's subtree. Anything
/// else leaves the store untouched.
pub fn match_move(store: &mut EventStore, del_idx: usize) -> MoveMatch {
    let Some(Event {
        kind: ObjectKind::Folder,
        change: Change::Delete {
            path: old_root,
            subtree,
            ..
        },
        ..
    }) = store.get(del_idx)
    else {
        return MoveMatch::NoMatch;
    };
    let Some(run) = find_create_run(store, del_idx + 1) else {
        return MoveMatch::NoMatch;
    };
    if run.subtree != *subtree {
        return MoveMatch::NoMatch;
    }

    debug!("folder {old_root} moved to {}", run.root);
    let moved = Event::new(
        run.ts,
        ObjectKind::Folder,
        Change::Move {
            from: old_root.clone(),
            to: run.root,
        },
    );
    let at = store.replace_span(del_idx..run.end, moved);
    MoveMatch::Moved { at }
}

struct CreateRun {
    root: ObjectPath,
    ts: u64,
    /// One past the last create in the run.
    end: usize,
    subtree: Subtree,
}

/// Collect the consecutive creates that rebuild a folder starting at `start`.
fn find_create_run(store: &EventStore, start: usize) -> Option<CreateRun> {
    let first = store.get(start)?;
    let Change::Create { path: root, .. } = &first.change else {
        return None;
    };
    // Stricter than a plain run scan: an empty folder never "moves" onto a file.
    if first.kind != ObjectKind::Folder {
        return None;
    }

    let mut subtree = Subtree::new();
    let mut end = start + 1;
    while let Some(Event {
        change: Change::Create { path, hash },
        ..
    }) = store.get(end)
    {
        let Some(rel) = path.relative_to(root) else {
            break;
        };
        subtree.insert(rel, hash.clone());
        end += 1;
    }

    Some(CreateRun {
        root: root.clone(),
        ts: first.ts,
        end,
        subtree,
    })
}
