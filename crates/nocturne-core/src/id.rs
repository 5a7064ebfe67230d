//! Surface identifiers

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// An opaque string key naming one rendering surface.
///
/// Surface ids are chosen by the caller (they name the host's drawing
/// target, e.g. a canvas element or a pane) and are unique among registered
/// surfaces. The engine never interprets the string.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Create a surface id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the id as a plain string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SurfaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SurfaceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SurfaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({:?})", self.0)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
