//! The identity that transactions are scoped to.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The identifier of the authenticated user that a transaction belongs to.
///
/// Owner IDs are opaque strings issued by the identity provider, e.g. the
/// `sub` claim of a verified token. They are never taken from request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an owner ID from the identity provider's subject identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The owner ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
