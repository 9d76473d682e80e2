//! Property path parsing and target container resolution
//!
//! A property path is a dotted string. Resolution picks the container a field
//! operation works on:
//!
//! 1. An empty path targets the entity itself.
//! 2. A path equal (as a whole) to the class name of one of the entity's
//!    components targets that component, with nothing left to address.
//! 3. Anything else targets the entity, and the full path is handed to the
//!    native addressing call as nested path entries.
//!
//! A component target is never combined with a non-empty remaining path, the
//! native layer rejects that combination.

use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};
use crate::host::{ContainerRef, EntityHandle, PathEntry, WorldEditorApi};

/// Parsed dotted path
///
/// Pieces are split on `.` and empty pieces are dropped, so `"a..b"` and
/// `".a.b."` both parse to `a`, `b`. A piece written `Name[3]` addresses one
/// element of an array field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPath {
    entries: Vec<PathEntry>,
}

impl PropertyPath {
    /// The empty path
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(path: &str) -> Result<Self> {
        let entries = path
            .split('.')
            .filter(|piece| !piece.is_empty())
            .map(parse_entry)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// This path extended by the pieces of `tail`
    pub fn join(&self, tail: &str) -> Result<Self> {
        let mut joined = self.clone();
        joined.entries.extend(Self::parse(tail)?.entries);
        Ok(joined)
    }
}

impl FromStr for PropertyPath {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

fn parse_entry(piece: &str) -> Result<PathEntry> {
    if !piece.contains(['[', ']']) {
        return Ok(PathEntry::new(piece));
    }
    indexed_entry(piece).ok_or_else(|| invalid_segment(piece))
}

/// `Name[i]` with a non-empty name and an index written without leading zeros
fn indexed_entry(piece: &str) -> Option<PathEntry> {
    let (name, rest) = piece.split_once('[')?;
    let digits = rest.strip_suffix(']')?;
    let index = digits.parse::<usize>().ok()?;
    if name.is_empty() || name.contains(']') || index.to_string() != digits {
        return None;
    }
    Some(PathEntry::indexed(name, index))
}

/// Split a path for the native addressing call without rejecting anything
///
/// Pieces that are not a well-formed `Name[i]` go through verbatim as plain
/// field names; the native call decides whether they address anything.
fn passthrough(path: &str) -> PropertyPath {
    let entries = path
        .split('.')
        .filter(|piece| !piece.is_empty())
        .map(|piece| indexed_entry(piece).unwrap_or_else(|| PathEntry::new(piece)))
        .collect();
    PropertyPath { entries }
}

fn invalid_segment(piece: &str) -> BridgeError {
    BridgeError::InvalidRequest(format!("Invalid path segment: {}", piece))
}

/// Outcome of resolving a path against one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub target: ContainerRef,
    /// Path entries still to be interpreted by the native call
    pub remaining: PropertyPath,
}

impl ResolvedTarget {
    /// The entity itself, nothing left to address
    pub fn entity(entity: EntityHandle) -> Self {
        Self {
            target: ContainerRef::Entity(entity),
            remaining: PropertyPath::root(),
        }
    }

    /// Human-readable description of the target for messages
    pub fn describe(&self, api: &dyn WorldEditorApi) -> String {
        match self.target {
            ContainerRef::Entity(entity) if self.remaining.is_empty() => api.entity_name(entity),
            ContainerRef::Entity(entity) => format!("{}.{}", api.entity_name(entity), self.remaining),
            ContainerRef::Component { entity, component } => api.component_class_name(entity, component),
        }
    }
}

/// Resolve `path` against `entity`
///
/// Computed from the live component list on every call, nothing is cached.
pub fn resolve(api: &dyn WorldEditorApi, entity: EntityHandle, path: &str) -> Result<ResolvedTarget> {
    if path.is_empty() {
        return Ok(ResolvedTarget::entity(entity));
    }

    let component = (0..api.component_count(entity))
        .filter_map(|index| api.component_at(entity, index))
        .find(|&component| api.component_class_name(entity, component) == path);

    if let Some(component) = component {
        return Ok(ResolvedTarget {
            target: ContainerRef::Component { entity, component },
            remaining: PropertyPath::root(),
        });
    }

    Ok(ResolvedTarget {
        target: ContainerRef::Entity(entity),
        remaining: passthrough(path),
    })
}
