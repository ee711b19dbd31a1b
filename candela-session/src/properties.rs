//! Startup-built table of bridge property bindings.

use candela_engine::PropertyValue;
use std::collections::BTreeMap;

/// One UI-facing bridge property: its sub-object, its name there, and the
/// value reads fall back to when the engine build does not expose it.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    object: String,
    property: String,
    default: PropertyValue,
}

impl PropertySpec {
    pub fn new(
        object: impl Into<String>,
        property: impl Into<String>,
        default: impl Into<PropertyValue>,
    ) -> Self {
        Self {
            object: object.into(),
            property: property.into(),
            default: default.into(),
        }
    }

    /// Table key, `object.property`.
    pub fn path(&self) -> String {
        format!("{}.{}", self.object, self.property)
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn default_value(&self) -> &PropertyValue {
        &self.default
    }
}

/// Path-keyed table of property specs.
///
/// Binding code registers every property it exposes once at startup. Reads
/// and writes then go through the table, so what exists is explicit and
/// absence handling lives in one place instead of in per-property accessors.
#[derive(Debug, Default)]
pub struct PropertyTable {
    specs: BTreeMap<String, PropertySpec>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec under its path, returning any spec it displaced.
    pub fn register(&mut self, spec: PropertySpec) -> Option<PropertySpec> {
        self.specs.insert(spec.path(), spec)
    }

    pub fn spec(&self, path: &str) -> Option<&PropertySpec> {
        self.specs.get(path)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Registered specs in path order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertySpec> {
        self.specs.values()
    }
}
