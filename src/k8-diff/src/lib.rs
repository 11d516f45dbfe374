mod json;
mod render;

use std::fmt;

pub use json::JsonDiff;
pub use json::PatchObject;
pub use json::LIST_TAG;
pub use render::render;
pub use render::render_masked;

pub trait Changes {
    type Replace;
    type Patch;

    fn diff(&self, new: &Self) -> Result<Diff<Self::Replace, Self::Patch>, DiffError>;
}

#[derive(Debug)]
pub enum DiffError {
    DuplicateTag(String), // two items of a tagged list share the same name
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTag(tag) => write!(f, "duplicate list entry named '{}'", tag),
        }
    }
}

impl std::error::Error for DiffError {}

// use Option as inspiration
#[derive(Debug)]
pub enum Diff<R, P> {
    None,
    Add(R),                     // value did not exist before
    Delete(R),                  // keeps the removed value so it can be reported
    Replace { old: R, new: R }, // primitives, untagged lists, type changes
    Patch(P),                   // for objects
    Merge(P),                   // need tag, works on unordered list
}

impl<R, P> Diff<R, P> {
    pub fn is_none(&self) -> bool {
        matches!(self, Diff::None)
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Diff::Add(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Diff::Delete(_))
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, Diff::Replace { .. })
    }

    pub fn is_patch(&self) -> bool {
        matches!(self, Diff::Patch(_))
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, Diff::Merge(_))
    }

    /// new value for add and replace
    pub fn new_value(&self) -> Option<&R> {
        match self {
            Diff::Add(val) => Some(val),
            Diff::Replace { new, .. } => Some(new),
            _ => None,
        }
    }

    /// nested changes for patch and merge
    pub fn nested(&self) -> Option<&P> {
        match self {
            Diff::Patch(val) | Diff::Merge(val) => Some(val),
            _ => None,
        }
    }
}
