use crate::path::ObjectPath;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hash text that marks a folder in the input feed instead of a content hash.
pub const FOLDER_HASH: &str = "-";

/// Content hash of a file, as reported by the input feed.
///
/// Opaque to the reducer: two files have the same content if and only if
/// their hashes compare equal. The folder sentinel [`FOLDER_HASH`] is never
/// wrapped in a `ContentHash`; folders carry `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap hash text as-is.
    pub fn new(hash: impl Into<String>) -> Self {
        ContentHash(hash.into())
    }

    /// Interpret feed hash text: the folder sentinel yields `None`.
    ///
    /// ```
    /// use fsfold::ContentHash;
    ///
    /// assert_eq!(ContentHash::from_feed("-"), None);
    /// assert_eq!(ContentHash::from_feed("f2fa762f"), Some(ContentHash::new("f2fa762f")));
    /// ```
    pub fn from_feed(text: &str) -> Option<Self> {
        if text == FOLDER_HASH {
            None
        } else {
            Some(ContentHash(text.to_string()))
        }
    }

    /// The hash text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Folders may arrive with the sentinel spelled out instead of the field
// being absent; both mean `None`.
fn deserialize_hash<'de, D>(deserializer: D) -> Result<Option<ContentHash>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.as_deref().and_then(ContentHash::from_feed))
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an event concerns a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    File,
    Folder,
}

impl ObjectKind {
    /// Files carry a hash, folders don't.
    pub fn of(hash: Option<&ContentHash>) -> Self {
        match hash {
            Some(_) => ObjectKind::File,
            None => ObjectKind::Folder,
        }
    }

    /// Lowercase name used in narration.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::File => "file",
            ObjectKind::Folder => "folder",
        }
    }
}

/// Everything that existed below a deleted folder: relative path to content
/// hash, with `None` for sub-folders.
///
/// Keys are relative to the folder itself, e.g. `"b/c.t"`. Two subtrees are
/// equal when they hold the same keys with the same hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subtree(BTreeMap<String, Option<ContentHash>>);

impl Subtree {
    /// An empty subtree.
    pub fn new() -> Self {
        Subtree::default()
    }

    /// Record one entry. An existing entry for `rel` is kept.
    pub fn insert(&mut self, rel: impl Into<String>, hash: Option<ContentHash>) {
        self.0.entry(rel.into()).or_insert(hash);
    }

    /// Merge `child` (the subtree of the entry named `name`) into `self`,
    /// re-prefixing each of its keys with `name/`.
    pub fn absorb(&mut self, name: &str, child: Subtree) {
        for (rel, hash) in child.0 {
            self.insert(format!("{name}/{rel}"), hash);
        }
    }

    /// Look up one entry: `Some(None)` is a sub-folder.
    pub fn get(&self, rel: &str) -> Option<&Option<ContentHash>> {
        self.0.get(rel)
    }

    /// Number of entries, files and folders.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All entries, folders included, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ContentHash>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// File entries only, in key order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &ContentHash)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|h| (k.as_str(), h)))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<ContentHash>)> for Subtree {
    fn from_iter<I: IntoIterator<Item = (K, Option<ContentHash>)>>(iter: I) -> Self {
        let mut tree = Subtree::new();
        for (rel, hash) in iter {
            tree.insert(rel, hash);
        }
        tree
    }
}

/// The semantic operation an [`Event`] narrates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    Create {
        path: ObjectPath,
        #[serde(
            default,
            deserialize_with = "deserialize_hash",
            skip_serializing_if = "Option::is_none"
        )]
        hash: Option<ContentHash>,
    },
    Delete {
        path: ObjectPath,
        #[serde(
            default,
            deserialize_with = "deserialize_hash",
            skip_serializing_if = "Option::is_none"
        )]
        hash: Option<ContentHash>,
        /// Filled only by folder-delete collapsing.
        #[serde(default, skip_serializing_if = "Subtree::is_empty")]
        subtree: Subtree,
    },
    Modify {
        path: ObjectPath,
        old_hash: ContentHash,
        new_hash: ContentHash,
    },
    Move {
        from: ObjectPath,
        to: ObjectPath,
    },
    Copy {
        src: ObjectPath,
        dest: ObjectPath,
    },
}

impl Change {
    /// A `Move` whose final name differs. False for every other variant.
    pub fn is_rename(&self) -> bool {
        match self {
            Change::Move { from, to } => from.name() != to.name(),
            _ => false,
        }
    }

    /// A `Move` whose parent folder differs. False for every other variant.
    pub fn is_move(&self) -> bool {
        match self {
            Change::Move { from, to } => from.parent() != to.parent(),
            _ => false,
        }
    }
}

/// A semantic event in the reduced history.
///
/// # Examples
///
/// ```
/// use fsfold::{Change, Event, ObjectKind, ObjectPath};
///
/// let event = Event::new(
///     4,
///     ObjectKind::File,
///     Change::Move {
///         from: ObjectPath::parse("/a/c.t").unwrap(),
///         to: ObjectPath::parse("/a/d.t").unwrap(),
///     },
/// );
/// assert!(event.change.is_rename());
/// assert!(!event.change.is_move());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Timestamp of the primitive event that produced this one.
    pub ts: u64,
    /// Whether a file or a folder changed.
    pub kind: ObjectKind,
    #[serde(flatten)]
    pub change: Change,
}

impl Event {
    /// Build an event from its parts.
    pub fn new(ts: u64, kind: ObjectKind, change: Change) -> Self {
        Event { ts, kind, change }
    }

    /// True for file events.
    pub fn is_file(&self) -> bool {
        self.kind == ObjectKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ObjectKind::Folder
    }

    /// The path this event acts on: the destination for moves and copies.
    pub fn path(&self) -> &ObjectPath {
        match &self.change {
            Change::Create { path, .. }
            | Change::Delete { path, .. }
            | Change::Modify { path, .. } => path,
            Change::Move { to, .. } => to,
            Change::Copy { dest, .. } => dest,
        }
    }
}

/// The two operations an input feed can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveOp {
    Create,
    Delete,
}

/// A raw create/delete notification for one file or folder.
///
/// Folders are told apart from files by the absence of a hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveEvent {
    pub op: PrimitiveOp,
    pub ts: u64,
    pub path: ObjectPath,
    /// Content hash, `None` for folders. In JSON the field may be absent,
    /// `null`, or the `"-"` sentinel.
    #[serde(
        default,
        deserialize_with = "deserialize_hash",
        skip_serializing_if = "Option::is_none"
    )]
    pub hash: Option<ContentHash>,
}

impl PrimitiveEvent {
    /// A create notification. Pass `None` for a folder.
    pub fn create(ts: u64, path: ObjectPath, hash: Option<ContentHash>) -> Self {
        PrimitiveEvent {
            op: PrimitiveOp::Create,
            ts,
            path,
            hash,
        }
    }

    /// A delete notification. Pass `None` for a folder.
    pub fn delete(ts: u64, path: ObjectPath, hash: Option<ContentHash>) -> Self {
        PrimitiveEvent {
            op: PrimitiveOp::Delete,
            ts,
            path,
            hash,
        }
    }

    /// File or folder, from the presence of a hash.
    pub fn kind(&self) -> ObjectKind {
        ObjectKind::of(self.hash.as_ref())
    }

    /// The verbatim semantic form of this event.
    pub fn to_event(&self) -> Event {
        let change = match self.op {
            PrimitiveOp::Create => Change::Create {
                path: self.path.clone(),
                hash: self.hash.clone(),
            },
            PrimitiveOp::Delete => Change::Delete {
                path: self.path.clone(),
                hash: self.hash.clone(),
                subtree: Subtree::new(),
            },
        };
        Event::new(self.ts, self.kind(), change)
    }
}
