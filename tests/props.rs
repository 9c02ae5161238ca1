mod common;

use common::{add_file, del_file, path, shape};
use fsfold::{Change, ContentHash, ObjectPath, PrimitiveEvent, Reducer};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn arb_path() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/a.t".to_string()),
        Just("/b.t".to_string()),
        Just("/d/a.t".to_string()),
        Just("/d/c.t".to_string()),
        Just("/e/f/g.t".to_string()),
    ]
}

fn arb_hash() -> impl Strategy<Value = String> {
    prop_oneof![Just("h1".to_string()), Just("h2".to_string()), Just("h3".to_string())]
}

/// A file history that only deletes what is live, with its real hash.
fn arb_file_history() -> impl Strategy<Value = Vec<PrimitiveEvent>> {
    proptest::collection::vec((arb_path(), arb_hash(), any::<bool>()), 0..40).prop_map(|steps| {
        let mut live: BTreeMap<String, String> = BTreeMap::new();
        let mut events = Vec::new();
        for (i, (p, h, want_delete)) in steps.into_iter().enumerate() {
            let ts = i as u64;
            match live.get(&p).cloned() {
                Some(held) if want_delete => {
                    live.remove(&p);
                    events.push(del_file(ts, &p, &held));
                }
                Some(_) => {}
                None => {
                    live.insert(p.clone(), h.clone());
                    events.push(add_file(ts, &p, &h));
                }
            }
        }
        events
    })
}

/// The live set according to the raw events alone.
fn expected_index(events: &[PrimitiveEvent]) -> BTreeSet<(ContentHash, ObjectPath)> {
    let mut live = BTreeMap::new();
    for event in events {
        match event.op {
            fsfold::PrimitiveOp::Create => {
                live.insert(event.path.clone(), event.hash.clone().unwrap());
            }
            fsfold::PrimitiveOp::Delete => {
                live.remove(&event.path);
            }
        }
    }
    live.into_iter().map(|(p, h)| (h, p)).collect()
}

// After every prefix of the stream, the index holds exactly the live files.
proptest! {
    #[test]
    fn prop_index_consistency(events in arb_file_history()) {
        let mut reducer = Reducer::builder().strict_index(true).build();
        for (n, event) in events.iter().enumerate() {
            reducer.ingest(event.clone()).unwrap();

            let actual: BTreeSet<_> = reducer
                .index()
                .iter()
                .map(|(p, h)| (h.clone(), p.clone()))
                .collect();
            prop_assert_eq!(actual, expected_index(&events[..=n]));
        }
    }
}

// Reduction never produces more events than it was fed.
proptest! {
    #[test]
    fn prop_never_grows(events in arb_file_history()) {
        let len = events.len();
        let mut reducer = Reducer::new();
        reducer.ingest_all(events).unwrap();
        let history = reducer.finish().unwrap();
        prop_assert!(history.len() <= len);
    }
}

// Every copy names a source that was live when the copy happened, and no
// file create directly follows a file delete it could have fused with.
proptest! {
    #[test]
    fn prop_copies_and_fusions_are_sound(events in arb_file_history()) {
        let mut reducer = Reducer::new();
        let mut live: BTreeMap<ObjectPath, ContentHash> = BTreeMap::new();
        for event in &events {
            reducer.ingest(event.clone()).unwrap();
            if let Some(Change::Copy { src, dest }) = reducer.store().last().map(|e| &e.change) {
                if dest == &event.path {
                    prop_assert_eq!(live.get(src), event.hash.as_ref());
                }
            }
            match event.op {
                fsfold::PrimitiveOp::Create => {
                    live.insert(event.path.clone(), event.hash.clone().unwrap());
                }
                fsfold::PrimitiveOp::Delete => {
                    live.remove(&event.path);
                }
            }
        }

        let history = reducer.finish().unwrap();
        for pair in history.events().windows(2) {
            if let (
                Change::Delete { path: old, hash: Some(old_hash), .. },
                Change::Create { path: new, hash: Some(new_hash) },
            ) = (&pair[0].change, &pair[1].change)
            {
                prop_assert!(old != new && old_hash != new_hash);
            }
        }
    }
}

// Deleting and recreating any file at the same path is always a modify.
proptest! {
    #[test]
    fn prop_same_path_is_modify(p in arb_path(), old in arb_hash(), new in arb_hash()) {
        let mut reducer = Reducer::new();
        reducer
            .ingest_all(vec![del_file(1, &p, &old), add_file(2, &p, &new)])
            .unwrap();
        let history = reducer.finish().unwrap();
        prop_assert_eq!(shape(history.events()), vec![format!("modify {}", path(&p))]);
    }
}
