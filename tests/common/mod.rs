#![allow(dead_code)]

use fsfold::{Change, ContentHash, Event, ObjectPath, PrimitiveEvent, Reducer};

pub fn path(text: &str) -> ObjectPath {
    ObjectPath::parse(text).unwrap()
}

pub fn hash(text: &str) -> ContentHash {
    ContentHash::new(text)
}

pub fn add_file(ts: u64, p: &str, h: &str) -> PrimitiveEvent {
    PrimitiveEvent::create(ts, path(p), Some(hash(h)))
}

pub fn del_file(ts: u64, p: &str, h: &str) -> PrimitiveEvent {
    PrimitiveEvent::delete(ts, path(p), Some(hash(h)))
}

pub fn add_folder(ts: u64, p: &str) -> PrimitiveEvent {
    PrimitiveEvent::create(ts, path(p), None)
}

pub fn del_folder(ts: u64, p: &str) -> PrimitiveEvent {
    PrimitiveEvent::delete(ts, path(p), None)
}

/// Ingest everything into a default reducer and finish it.
pub fn reduce_all(events: Vec<PrimitiveEvent>) -> Vec<Event> {
    let mut reducer = Reducer::new();
    reducer.ingest_all(events).unwrap();
    reducer.finish().unwrap().into_events()
}

/// Ingest everything without running the folder pass.
pub fn file_pass_only(events: Vec<PrimitiveEvent>) -> Vec<Event> {
    let mut reducer = Reducer::builder().fold_folders(false).build();
    reducer.ingest_all(events).unwrap();
    reducer.finish().unwrap().into_events()
}

/// Short one-word tag per event, handy for asserting the shape of a history.
pub fn shape(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|e| match &e.change {
            Change::Create { path, .. } => format!("create {path}"),
            Change::Delete { path, .. } => format!("delete {path}"),
            Change::Modify { path, .. } => format!("modify {path}"),
            Change::Move { from, to } => format!("move {from} -> {to}"),
            Change::Copy { src, dest } => format!("copy {src} -> {dest}"),
        })
        .collect()
}

/// The classic file scenario: rename, modify, copy, then move+rename.
pub fn file_scenario() -> Vec<PrimitiveEvent> {
    vec![
        add_folder(1, "/a"),
        add_file(2, "/a/b.t", "1111"),
        add_file(3, "/a/c.t", "2222"),
        del_file(4, "/a/c.t", "2222"),
        add_file(5, "/a/d.t", "2222"),
        del_file(6, "/a/b.t", "1111"),
        add_file(7, "/a/b.t", "1112"),
        add_folder(8, "/a/e"),
        add_file(9, "/a/e/f.t", "1112"),
        del_file(10, "/a/b.t", "1112"),
        add_file(11, "/a/e/g.t", "1112"),
    ]
}

/// Delete `/f` (with `b/c.t` and `d.t`) and recreate it as `/g/h`.
pub fn folder_move_scenario() -> Vec<PrimitiveEvent> {
    vec![
        del_file(1, "/f/b/c.t", "H1"),
        del_folder(2, "/f/b"),
        del_file(3, "/f/d.t", "H2"),
        del_folder(4, "/f"),
        add_folder(5, "/g/h"),
        add_file(6, "/g/h/d.t", "H2"),
        add_folder(7, "/g/h/b"),
        add_file(8, "/g/h/b/c.t", "H1"),
    ]
}
