//! Named parallel branches, kept in insertion order.
//!
//! Branch order is what the diagram shows (first branch above the centerline,
//! second below, ...). On the wire it is a JSON/YAML object whose key order is
//! preserved in both directions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// Borrowed view of one parallel branch: a named series of segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch<'a> {
    pub name: &'a str,
    pub segments: &'a [Segment],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParallelBranches(IndexMap<String, Vec<Segment>>);

impl ParallelBranches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Branch<'_>> {
        self.0.iter().map(|(name, segments)| Branch {
            name: name.as_str(),
            segments: segments.as_slice(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<Branch<'_>> {
        self.0.get_key_value(name).map(|(name, segments)| Branch {
            name: name.as_str(),
            segments: segments.as_slice(),
        })
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Segment>> {
        self.0.get_mut(name)
    }

    pub(crate) fn segments_mut(&mut self) -> impl Iterator<Item = &mut Segment> {
        self.0.values_mut().flat_map(|segments| segments.iter_mut())
    }

    /// Set `name` to `segments`. An existing key keeps its position and has its
    /// segments replaced (last write wins); a new key is appended.
    pub fn insert(&mut self, name: impl Into<String>, segments: Vec<Segment>) {
        self.0.insert(name.into(), segments);
    }

    /// Segment list for `name`, creating an empty branch at the end if absent.
    pub(crate) fn get_or_create(&mut self, name: &str) -> &mut Vec<Segment> {
        self.0.entry(name.to_string()).or_default()
    }

    /// Remove `name`, keeping the order of the remaining branches.
    pub fn remove(&mut self, name: &str) -> Option<Vec<Segment>> {
        self.0.shift_remove(name)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

// Branch order is part of the value.
impl PartialEq for ParallelBranches {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl FromIterator<(String, Vec<Segment>)> for ParallelBranches {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Segment>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
