//! Fold a timestamp-ordered batch of primitive filesystem notifications
//! (create, delete) into the shortest history a person would read: creates,
//! deletes, modifications, renames, moves and file copies.
//!
//! ```
//! use fsfold::{feed, reduce};
//!
//! let events = feed::parse_batch(
//!     "DEL 1 /f/b/c.t 3333
//!      DEL 2 /f/b -
//!      DEL 3 /f/d.t 4444
//!      DEL 4 /f -
//!      ADD 5 /g/h -
//!      ADD 6 /g/h/d.t 4444
//!      ADD 7 /g/h/b -
//!      ADD 8 /g/h/b/c.t 3333",
//! )
//! .unwrap();
//!
//! let history = reduce(events).unwrap();
//! assert_eq!(
//!     history.narrate(),
//!     ["Moved the folder \"f\" in the folder \"/\" to the folder \"/g\" with the name \"h\"."]
//! );
//! ```

mod error;
mod event;
pub mod feed;
pub mod file_pass;
pub mod folder_pass;
mod history;
mod index;
pub mod narrate;
mod path;
mod reducer;
mod store;

pub use error::{FeedError, HistoryError, ReduceError, Result};
pub use event::{
    Change, ContentHash, Event, FOLDER_HASH, ObjectKind, PrimitiveEvent, PrimitiveOp, Subtree,
};
pub use folder_pass::MoveMatch;
pub use history::History;
pub use index::HashIndex;
pub use path::{ObjectPath, SEP};
pub use reducer::{reduce, Reducer, ReducerBuilder, ReducerConfig};
pub use store::EventStore;
