//! Facilities for working with paths within validated instances.
use std::fmt;
use std::fmt::Write;

/// A structural path into a JSON value: a sequence of property names and array indices.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct JSONPointer(Vec<PathChunk>);

impl JSONPointer {
    pub(crate) fn new(chunks: Vec<PathChunk>) -> Self {
        JSONPointer(chunks)
    }

    /// Number of components in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when the path points at the root value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The component at `idx`, if any.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&PathChunk> {
        self.0.get(idx)
    }

    /// Iterate over the path components.
    pub fn iter(&self) -> std::slice::Iter<'_, PathChunk> {
        self.0.iter()
    }

    /// A new path that starts with `self` and continues with `tail`.
    #[must_use]
    pub fn extend(&self, tail: &JSONPointer) -> JSONPointer {
        let mut chunks = self.0.clone();
        chunks.extend(tail.0.iter().cloned());
        JSONPointer(chunks)
    }

    /// The path as a vector of strings. Each component is casted to `String`.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
            .iter()
            .map(|item| match item {
                PathChunk::Name(value) => value.to_string(),
                PathChunk::Index(idx) => idx.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for JSONPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.0.is_empty() {
            for chunk in &self.0 {
                f.write_char('/')?;
                match chunk {
                    PathChunk::Name(value) => f.write_str(value)?,
                    PathChunk::Index(idx) => write!(f, "{}", idx)?,
                }
            }
        }
        Ok(())
    }
}

/// One component of a [`JSONPointer`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathChunk {
    /// An object property name.
    Name(String),
    /// An array index.
    Index(usize),
}

impl From<String> for PathChunk {
    #[inline]
    fn from(value: String) -> Self {
        PathChunk::Name(value)
    }
}
impl From<usize> for PathChunk {
    #[inline]
    fn from(value: usize) -> Self {
        PathChunk::Index(value)
    }
}

impl From<&[&str]> for JSONPointer {
    #[inline]
    fn from(path: &[&str]) -> Self {
        JSONPointer(
            path.iter()
                .map(|item| PathChunk::Name((*item).to_string()))
                .collect(),
        )
    }
}

/// The runtime location of a value being validated.
///
/// Threaded through every recursive validator call by reference; descending into a
/// property or an index creates a new node that borrows its parent, so sibling branches
/// never observe each other's segments.
#[derive(Clone, Debug)]
pub(crate) struct InstancePath<'a> {
    pub(crate) segment: Option<PathSegment<'a>>,
    pub(crate) parent: Option<&'a InstancePath<'a>>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum PathSegment<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for PathSegment<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        PathSegment::Name(value)
    }
}
impl<'a> From<usize> for PathSegment<'a> {
    #[inline]
    fn from(value: usize) -> Self {
        PathSegment::Index(value)
    }
}

impl<'a> InstancePath<'a> {
    pub(crate) const fn new() -> Self {
        InstancePath {
            segment: None,
            parent: None,
        }
    }

    #[inline]
    pub(crate) fn push(&'a self, segment: impl Into<PathSegment<'a>>) -> Self {
        InstancePath {
            segment: Some(segment.into()),
            parent: Some(self),
        }
    }

    /// Depth of the current location, i.e. the number of segments from the root.
    pub(crate) fn len(&self) -> usize {
        let mut len = usize::from(self.segment.is_some());
        let mut current = self;
        while let Some(parent) = current.parent {
            len += usize::from(parent.segment.is_some());
            current = parent;
        }
        len
    }

    pub(crate) fn to_pointer(&self) -> JSONPointer {
        let mut chunks = Vec::with_capacity(self.len());
        collect(self, &mut chunks);
        JSONPointer::new(chunks)
    }
}

fn collect(path: &InstancePath<'_>, chunks: &mut Vec<PathChunk>) {
    if let Some(parent) = path.parent {
        collect(parent, chunks);
    }
    match path.segment {
        Some(PathSegment::Name(name)) => chunks.push(PathChunk::Name(name.to_string())),
        Some(PathSegment::Index(idx)) => chunks.push(PathChunk::Index(idx)),
        None => {}
    }
}

impl From<&InstancePath<'_>> for JSONPointer {
    #[inline]
    fn from(path: &InstancePath<'_>) -> Self {
        path.to_pointer()
    }
}
