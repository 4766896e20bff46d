//! Module identifiers and instances.
//!
//! A [`ModuleInstance`] pairs a user-chosen [`ModuleId`] with the static
//! [`ModuleSchema`] of its kind. Instances carry no engine state; the live
//! processing object lives in the engine binding under the same id.

use core::borrow::Borrow;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::address::DESTINATION;
use crate::schema::{ModuleSchema, PortSpec};

/// Unique identifier of a module within a patch (e.g. `"osc-1"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Creates an id from any string. No validation happens here; see
    /// [`ModuleId::is_valid`].
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ids must be non-empty, free of `/` (the address separator), and must
    /// not collide with the `destination` sentinel.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.contains('/') && self.0 != DESTINATION
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A module placed in a patch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleInstance {
    id: ModuleId,
    schema: &'static ModuleSchema,
}

impl ModuleInstance {
    /// Creates an instance of `schema` named `id`.
    pub fn new(id: ModuleId, schema: &'static ModuleSchema) -> Self {
        Self { id, schema }
    }

    /// Instance id.
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Kind identifier from the schema.
    pub fn kind(&self) -> &'static str {
        self.schema.kind
    }

    /// Static schema of this module's kind.
    pub fn schema(&self) -> &'static ModuleSchema {
        self.schema
    }

    /// Declared ports.
    pub fn ports(&self) -> &'static [PortSpec] {
        self.schema.ports
    }

    /// Declared parameter targets.
    pub fn params(&self) -> &'static [&'static str] {
        self.schema.params
    }
}

/// Anything that can answer "which schema does module `id` have?".
///
/// Address resolution and validation only need this much of a patch.
pub trait ModuleLookup {
    /// Returns the schema of module `id`, or `None` if no such module exists.
    fn schema_of(&self, id: &ModuleId) -> Option<&'static ModuleSchema>;
}

impl ModuleLookup for [ModuleInstance] {
    fn schema_of(&self, id: &ModuleId) -> Option<&'static ModuleSchema> {
        self.iter().find(|m| m.id() == id).map(ModuleInstance::schema)
    }
}

impl ModuleLookup for Vec<ModuleInstance> {
    fn schema_of(&self, id: &ModuleId) -> Option<&'static ModuleSchema> {
        self.as_slice().schema_of(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_validity() {
        assert!(ModuleId::from("osc-1").is_valid());
        assert!(!ModuleId::from("").is_valid());
        assert!(!ModuleId::from("a/b").is_valid());
        assert!(!ModuleId::from("destination").is_valid());
    }

    #[test]
    fn lookup_over_instances() {
        static EMPTY: ModuleSchema = ModuleSchema {
            kind: "blank",
            ports: &[],
            params: &[],
        };
        let modules = vec![ModuleInstance::new("a".into(), &EMPTY)];
        assert_eq!(modules.schema_of(&"a".into()).map(|s| s.kind), Some("blank"));
        assert!(modules.schema_of(&"b".into()).is_none());
    }
}
