//! Attribute paths for nested validation errors

use std::fmt;

use serde::{Serialize, Serializer};

/// One step in an attribute path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object property name
    Key(String),
    /// An array element index
    Index(usize),
}

/// A nested attribute path, displayed dot/bracket-joined (`foo.bar`,
/// `tags[2].name`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty root path
    pub fn root() -> Self {
        Path::default()
    }

    /// Extend with an object property name
    pub fn key(&self, name: impl Into<String>) -> Path {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(name.into()));
        Path { segments }
    }

    /// Extend with an array element index
    pub fn index(&self, index: usize) -> Path {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Path { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

// Paths serialize as their display form, not as a segment list.
impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_keys_with_dots() {
        let path = Path::root().key("foo").key("bar");
        assert_eq!(path.to_string(), "foo.bar");
    }

    #[test]
    fn test_display_brackets_indices() {
        let path = Path::root().key("tags").index(2).key("name");
        assert_eq!(path.to_string(), "tags[2].name");
    }

    #[test]
    fn test_root_is_empty() {
        assert!(Path::root().is_root());
        assert_eq!(Path::root().to_string(), "");
    }
}
