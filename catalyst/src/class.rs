// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component classes: type descriptors with declared ancestry.
//!
//! ## Overview
//!
//! A class stands in for a component's prototype. It names its parent, its
//! statically observed attributes and the default values of its plain
//! properties. Marks attach property initializers to classes, and the
//! initializer walks [`ClassTable::ancestry`] so a subclass composes with
//! everything its bases declared.
//!
//! Ancestry is resolved once, when the class is defined.
//!
//! ```
//! use catalyst::{ClassDescriptor, ClassTable};
//!
//! let mut classes = ClassTable::new();
//! let base = classes.define(ClassDescriptor::new("BaseElement").with_default("size", 3)).unwrap();
//! let derived = classes.define(ClassDescriptor::new("FancyElement").extends(base)).unwrap();
//! assert_eq!(classes.ancestry(derived), &[derived, base]);
//! assert_eq!(classes.default_value(derived, "size").and_then(|v| v.as_number()), Some(3.0));
//! ```

use crate::error::{Error, Result};
use crate::value::PropValue;

/// Handle to a class in a [`ClassTable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ClassId(u32);

/// Declaration of a component class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassDescriptor {
    /// Human-readable class name, used in logs.
    pub name: String,
    /// Base class, if any. The element base itself is implicit.
    pub parent: Option<ClassId>,
    /// Attribute names observed regardless of marks.
    pub observed_attributes: Vec<String>,
    /// Plain property values an instance starts with, in declaration order.
    pub defaults: Vec<(String, PropValue)>,
}

impl ClassDescriptor {
    /// A class with no parent, defaults or observed attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Derive from `parent`.
    #[must_use]
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Observe `attribute` statically.
    #[must_use]
    pub fn observe(mut self, attribute: impl Into<String>) -> Self {
        self.observed_attributes.push(attribute.into());
        self
    }

    /// Give the plain property `key` an initial value.
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.defaults.push((key.into(), value.into()));
        self
    }
}

#[derive(Clone, Debug)]
struct ClassEntry {
    descriptor: ClassDescriptor,
    ancestry: Vec<ClassId>,
    computed_observed: bool,
}

/// Every class known to a runtime.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: Vec<ClassEntry>,
}

impl ClassTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. Fails if the parent is unknown.
    pub fn define(&mut self, descriptor: ClassDescriptor) -> Result<ClassId> {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ClassId uses 32-bit indices by design."
        )]
        let id = ClassId(self.classes.len() as u32);
        let mut ancestry = vec![id];
        if let Some(parent) = descriptor.parent {
            ancestry.extend_from_slice(&self.entry(parent)?.ancestry);
        }
        tracing::debug!(class = %descriptor.name, ?id, depth = ancestry.len(), "class defined");
        self.classes.push(ClassEntry {
            descriptor,
            ancestry,
            computed_observed: false,
        });
        Ok(id)
    }

    /// The descriptor of `class`.
    pub fn get(&self, class: ClassId) -> Option<&ClassDescriptor> {
        self.classes.get(class.0 as usize).map(|e| &e.descriptor)
    }

    /// Returns true if `class` was defined by this table.
    pub fn contains(&self, class: ClassId) -> bool {
        self.get(class).is_some()
    }

    /// `class` followed by its bases, most derived first. Empty for unknown classes.
    pub fn ancestry(&self, class: ClassId) -> &[ClassId] {
        self.classes
            .get(class.0 as usize)
            .map_or(&[][..], |e| e.ancestry.as_slice())
    }

    /// Returns true if `class` is `base` or derives from it.
    pub fn is_subclass_of(&self, class: ClassId, base: ClassId) -> bool {
        self.ancestry(class).contains(&base)
    }

    /// The initial value of `key`, searching the class and then its bases.
    pub fn default_value(&self, class: ClassId, key: &str) -> Option<&PropValue> {
        self.ancestry(class).iter().find_map(|c| {
            self.get(*c)?
                .defaults
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v)
        })
    }

    /// Every initial value visible to an instance of `class`; base values first,
    /// overridden by derived ones.
    pub fn defaults(&self, class: ClassId) -> Vec<(String, PropValue)> {
        let mut out: Vec<(String, PropValue)> = Vec::new();
        for c in self.ancestry(class).iter().rev() {
            let Some(desc) = self.get(*c) else { continue };
            for (k, v) in &desc.defaults {
                match out.iter_mut().find(|(existing, _)| existing == k) {
                    Some(slot) => slot.1 = v.clone(),
                    None => out.push((k.clone(), v.clone())),
                }
            }
        }
        out
    }

    /// The statically declared observed attributes.
    pub fn static_observed_attributes(&self, class: ClassId) -> &[String] {
        self.get(class)
            .map_or(&[][..], |d| d.observed_attributes.as_slice())
    }

    /// Replace the statically declared observed attributes.
    pub fn set_observed_attributes(&mut self, class: ClassId, attributes: Vec<String>) -> Result<()> {
        self.entry_mut(class)?.descriptor.observed_attributes = attributes;
        Ok(())
    }

    /// Mark `class` as computing its observed attributes from its marks.
    pub fn compute_observed_attributes(&mut self, class: ClassId) -> Result<()> {
        self.entry_mut(class)?.computed_observed = true;
        Ok(())
    }

    /// Returns true once [`ClassTable::compute_observed_attributes`] ran for `class`.
    pub fn has_computed_observed_attributes(&self, class: ClassId) -> bool {
        self.classes
            .get(class.0 as usize)
            .is_some_and(|e| e.computed_observed)
    }

    fn entry(&self, class: ClassId) -> Result<&ClassEntry> {
        self.classes
            .get(class.0 as usize)
            .ok_or(Error::UnknownClass(class))
    }

    fn entry_mut(&mut self, class: ClassId) -> Result<&mut ClassEntry> {
        self.classes
            .get_mut(class.0 as usize)
            .ok_or(Error::UnknownClass(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parent_is_rejected() {
        let mut a = ClassTable::new();
        let mut b = ClassTable::new();
        let _ = b.define(ClassDescriptor::new("Other")).unwrap();
        let foreign = b.define(ClassDescriptor::new("Foreign")).unwrap();
        assert_eq!(
            a.define(ClassDescriptor::new("Child").extends(foreign)),
            Err(Error::UnknownClass(foreign))
        );
    }

    #[test]
    fn derived_defaults_override_base() {
        let mut classes = ClassTable::new();
        let base = classes
            .define(
                ClassDescriptor::new("Base")
                    .with_default("a", 1)
                    .with_default("b", "base"),
            )
            .unwrap();
        let derived = classes
            .define(ClassDescriptor::new("Derived").extends(base).with_default("b", "derived"))
            .unwrap();
        assert_eq!(
            classes.defaults(derived),
            vec![
                ("a".to_owned(), PropValue::Number(1.0)),
                ("b".to_owned(), PropValue::from("derived")),
            ]
        );
        assert!(classes.is_subclass_of(derived, base));
        assert!(!classes.is_subclass_of(base, derived));
    }
}
