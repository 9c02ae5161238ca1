//! Plain-English descriptions of reduced events.

use crate::event::{Change, Event};
use crate::path::ObjectPath;

/// Describe one event as a sentence.
///
/// Returns `None` for a move that changes neither name nor folder: the
/// object was deleted and recreated as it was, so there is nothing to say.
///
/// # Examples
///
/// ```
/// use fsfold::{narrate, Change, ContentHash, Event, ObjectKind, ObjectPath};
///
/// let event = Event::new(
///     1,
///     ObjectKind::File,
///     Change::Create {
///         path: ObjectPath::parse("/test/1.txt").unwrap(),
///         hash: Some(ContentHash::new("f2fa762f")),
///     },
/// );
/// assert_eq!(
///     narrate::describe(&event).unwrap(),
///     "Created the file \"1.txt\" in the folder \"/test\" with the hash value \"f2fa762f\"."
/// );
/// ```
pub fn describe(event: &Event) -> Option<String> {
    let kind = event.kind.as_str();
    let sentence = match &event.change {
        Change::Create {
            path,
            hash: Some(hash),
        } => format!(
            "Created the {kind} \"{}\" in the folder \"{}\" with the hash value \"{hash}\".",
            path.name(),
            folder_of(path)
        ),
        Change::Create { path, hash: None } => format!(
            "Created the {kind} \"{}\" in the folder \"{}\".",
            path.name(),
            folder_of(path)
        ),
        Change::Delete { path, .. } => format!(
            "Deleted the {kind} \"{}\" in the folder \"{}\".",
            path.name(),
            folder_of(path)
        ),
        Change::Modify { path, new_hash, .. } => format!(
            "Modified the {kind} \"{}\" in the folder \"{}\". The new hash value is \"{new_hash}\".",
            path.name(),
            folder_of(path)
        ),
        change @ Change::Move { from, to } => match (change.is_rename(), change.is_move()) {
            (true, true) => format!(
                "Moved the {kind} \"{}\" in the folder \"{}\" to the folder \"{}\" with the name \"{}\".",
                from.name(),
                folder_of(from),
                folder_of(to),
                to.name()
            ),
            (true, false) => format!(
                "Renamed the {kind} \"{}\" in the folder \"{}\" to \"{}\".",
                from.name(),
                folder_of(from),
                to.name()
            ),
            (false, true) => format!(
                "Moved the {kind} \"{}\" in the folder \"{}\" to the folder \"{}\".",
                from.name(),
                folder_of(from),
                folder_of(to)
            ),
            (false, false) => return None,
        },
        Change::Copy { src, dest } => format!(
            "Copied the {kind} \"{}\" from the folder \"{}\" to the folder \"{}\" with the name \"{}\".",
            src.name(),
            folder_of(src),
            folder_of(dest),
            dest.name()
        ),
    };
    Some(sentence)
}

fn folder_of(path: &ObjectPath) -> String {
    path.parent().map(|p| p.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ContentHash, ObjectKind, PrimitiveEvent};

    fn p(text: &str) -> ObjectPath {
        ObjectPath::parse(text).unwrap()
    }

    fn moved(from: &str, to: &str) -> Event {
        Event::new(
            1,
            ObjectKind::Folder,
            Change::Move {
                from: p(from),
                to: p(to),
            },
        )
    }

    #[test]
    fn move_variants() {
        assert_eq!(
            describe(&moved("/f", "/g/h")).unwrap(),
            "Moved the folder \"f\" in the folder \"/\" to the folder \"/g\" with the name \"h\"."
        );
        assert_eq!(
            describe(&moved("/a/b", "/a/c")).unwrap(),
            "Renamed the folder \"b\" in the folder \"/a\" to \"c\"."
        );
        assert_eq!(
            describe(&moved("/a/b", "/c/b")).unwrap(),
            "Moved the folder \"b\" in the folder \"/a\" to the folder \"/c\"."
        );
        assert_eq!(describe(&moved("/a/b", "/a/b")), None);
    }

    #[test]
    fn modify_reports_new_hash() {
        let event = Event::new(
            7,
            ObjectKind::File,
            Change::Modify {
                path: p("/a/b.t"),
                old_hash: ContentHash::new("1111"),
                new_hash: ContentHash::new("1112"),
            },
        );
        assert_eq!(
            describe(&event).unwrap(),
            "Modified the file \"b.t\" in the folder \"/a\". The new hash value is \"1112\"."
        );
    }

    #[test]
    fn copy_and_delete() {
        let copy = Event::new(
            9,
            ObjectKind::File,
            Change::Copy {
                src: p("/a/b.t"),
                dest: p("/a/e/f.t"),
            },
        );
        assert_eq!(
            describe(&copy).unwrap(),
            "Copied the file \"b.t\" from the folder \"/a\" to the folder \"/a/e\" with the name \"f.t\"."
        );

        let delete = PrimitiveEvent::delete(1, p("/a"), None).to_event();
        assert_eq!(
            describe(&delete).unwrap(),
            "Deleted the folder \"a\" in the folder \"/\"."
        );
    }
}
