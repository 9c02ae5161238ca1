//! Segment-wise paths for objects in the watched tree.

use crate::error::{ReduceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between path segments in textual form.
pub const SEP: &str = "/";

/// An ordered, non-empty sequence of path segments.
///
/// An absolute path starts with the root sentinel segment `"/"`, so `/a/b`
/// is `["/", "a", "b"]` and `/` alone is `["/"]`. Equality and ordering are
/// segment-wise.
///
/// # Examples
///
/// ```
/// use fsfold::ObjectPath;
///
/// let path = ObjectPath::parse("/docs/notes.txt").unwrap();
/// assert_eq!(path.name(), "notes.txt");
/// assert_eq!(path.parent().unwrap().to_string(), "/docs");
/// assert_eq!(path.to_string(), "/docs/notes.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath {
    segments: Vec<String>,
}

impl ObjectPath {
    /// Parse a path from its textual form.
    ///
    /// Empty segments (from doubled or trailing separators) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::EmptyPath`] for empty text.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(ReduceError::EmptyPath);
        }

        let mut segments = Vec::new();
        if text.starts_with(SEP) {
            segments.push(SEP.to_string());
        }
        segments.extend(
            text.split(SEP)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );

        Self::from_segments(segments).map_err(|_| ReduceError::MalformedPath(text.to_string()))
    }

    /// Build a path from raw segments.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::MalformedPath`] if there are no segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(ReduceError::MalformedPath(String::new()));
        }
        Ok(ObjectPath { segments })
    }

    /// The root path `/`.
    pub fn root() -> Self {
        ObjectPath {
            segments: vec![SEP.to_string()],
        }
    }

    /// Everything but the last segment.
    ///
    /// Returns `None` for a single-segment path such as the root, since the
    /// result would have no segments.
    pub fn parent(&self) -> Option<ObjectPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(ObjectPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The last segment.
    pub fn name(&self) -> &str {
        // Non-empty by construction.
        &self.segments[self.segments.len() - 1]
    }

    /// Append one segment.
    pub fn join(&self, name: &str) -> ObjectPath {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        ObjectPath { segments }
    }

    /// The raw segments, root sentinel included.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True if `self` is strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &ObjectPath) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments.starts_with(&ancestor.segments)
    }

    /// The segments past `base`, joined with `/`.
    ///
    /// Returns `None` unless `self` is a proper descendant of `base`.
    ///
    /// ```
    /// use fsfold::ObjectPath;
    ///
    /// let base = ObjectPath::parse("/g/h").unwrap();
    /// let file = ObjectPath::parse("/g/h/b/c.t").unwrap();
    /// assert_eq!(file.relative_to(&base).as_deref(), Some("b/c.t"));
    /// assert_eq!(base.relative_to(&base), None);
    /// ```
    pub fn relative_to(&self, base: &ObjectPath) -> Option<String> {
        if !self.is_descendant_of(base) {
            return None;
        }
        Some(join_segments(&self.segments[base.segments.len()..]))
    }
}

fn join_segments(segments: &[String]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        out.push_str(seg);
        if seg != SEP && i + 1 < segments.len() {
            out.push_str(SEP);
        }
    }
    out
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_segments(&self.segments))
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = ReduceError;

    fn try_from(text: String) -> Result<Self> {
        ObjectPath::parse(&text)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> String {
        path.to_string()
    }
}

impl std::str::FromStr for ObjectPath {
    type Err = ReduceError;

    fn from_str(text: &str) -> Result<Self> {
        ObjectPath::parse(text)
    }
}
