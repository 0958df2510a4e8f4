// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mark registry.
//!
//! ## Overview
//!
//! A mark is a named capability with up to three hooks:
//!
//! - a property initializer, run per marked property when an instance initializes;
//! - an attribute-change callback, run for every element carrying `data-<name>`;
//! - a class callback, run when a class is initialized.
//!
//! [`MarkRegistry::define_mark`] stores the hooks and returns a [`Marker`]; applying
//! the marker to a class and a property key records that the mark's property
//! initializer governs that key on that class.
//!
//! ## Ordering
//!
//! Registries preserve insertion order everywhere: attribute names, the marks under
//! each name, the marks applied to each class, and the keys under each mark.
//! [`MarkRegistry::properties_to_call`] yields the most derived class's entries first.
//!
//! ## Lifetime
//!
//! Marks are never removed. Per-class entries live as long as the registry.
//!
//! ```
//! use catalyst::{ClassDescriptor, ClassTable, MarkHandlers, MarkRegistry};
//!
//! let mut classes = ClassTable::new();
//! let mut registry = MarkRegistry::new();
//! let tracked = registry.define_mark("tracked", MarkHandlers::new().on_property(|_, _, _, _| {}));
//!
//! let base = classes.define(ClassDescriptor::new("Base")).unwrap();
//! let child = classes.define(ClassDescriptor::new("Child").extends(base)).unwrap();
//! tracked.apply(&mut registry, base, "a");
//! tracked.apply(&mut registry, child, "b");
//!
//! let keys: Vec<_> = registry.properties_to_call(&classes, child, None).map(|(_, k)| k).collect();
//! assert_eq!(keys, ["b", "a"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use catalyst_dom::{NodeId, Selector};

use crate::class::{ClassId, ClassTable};
use crate::runtime::Runtime;
use crate::value::PropValue;

/// Called once per marked property when an instance initializes, with the
/// property's plain value from before initialization.
pub type InitializePropertyCallback = Rc<dyn Fn(&mut Runtime, NodeId, &str, Option<PropValue>)>;

/// Called with an element carrying the mark's attribute and the attribute's value.
pub type ElementAttributeChangedCallback = Rc<dyn Fn(&mut Runtime, NodeId, Option<&str>)>;

/// Called with a class when it is initialized.
pub type InitializeClassCallback = Rc<dyn Fn(&mut ClassTable, ClassId)>;

/// Handle to a mark in a [`MarkRegistry`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MarkId(u32);

/// The optional hooks of a mark.
#[derive(Clone, Default)]
pub struct MarkHandlers {
    /// Property initializer.
    pub initialize_property: Option<InitializePropertyCallback>,
    /// Attribute-change callback, registered under `data-<name>`.
    pub element_attribute_changed: Option<ElementAttributeChangedCallback>,
    /// Class callback.
    pub initialize_class: Option<InitializeClassCallback>,
}

impl fmt::Debug for MarkHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkHandlers")
            .field("initialize_property", &self.initialize_property.is_some())
            .field(
                "element_attribute_changed",
                &self.element_attribute_changed.is_some(),
            )
            .field("initialize_class", &self.initialize_class.is_some())
            .finish()
    }
}

impl MarkHandlers {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the property initializer.
    #[must_use]
    pub fn on_property(
        mut self,
        f: impl Fn(&mut Runtime, NodeId, &str, Option<PropValue>) + 'static,
    ) -> Self {
        self.initialize_property = Some(Rc::new(f));
        self
    }

    /// Set the attribute-change callback.
    #[must_use]
    pub fn on_attribute(mut self, f: impl Fn(&mut Runtime, NodeId, Option<&str>) + 'static) -> Self {
        self.element_attribute_changed = Some(Rc::new(f));
        self
    }

    /// Set the class callback.
    #[must_use]
    pub fn on_class(mut self, f: impl Fn(&mut ClassTable, ClassId) + 'static) -> Self {
        self.initialize_class = Some(Rc::new(f));
        self
    }
}

/// Applies a mark's property initializer to `(class, key)` pairs.
///
/// Returned by [`MarkRegistry::define_mark`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Marker {
    mark: MarkId,
    governs_properties: bool,
}

impl Marker {
    /// The mark this marker belongs to.
    pub fn id(self) -> MarkId {
        self.mark
    }

    /// Record `key` under this mark's property initializer for `class`.
    ///
    /// A no-op when the mark has no property initializer. Returns `class`.
    pub fn apply(self, registry: &mut MarkRegistry, class: ClassId, key: &str) -> ClassId {
        if self.governs_properties {
            registry.record_property(class, self.mark, key);
        }
        class
    }
}

#[derive(Clone, Debug)]
struct MarkEntry {
    name: String,
    handlers: MarkHandlers,
}

/// Process-wide mark state, written during setup and read afterwards.
#[derive(Clone, Debug, Default)]
pub struct MarkRegistry {
    marks: Vec<MarkEntry>,
    class_callbacks: Vec<MarkId>,
    attr_callbacks: Vec<(String, Vec<MarkId>)>,
    prop_callbacks: BTreeMap<ClassId, Vec<(MarkId, Vec<String>)>>,
}

impl MarkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mark named `name`.
    ///
    /// The attribute hook is filed under `data-<name>`; the class hook joins the
    /// class callbacks. Missing hooks are simply absent capabilities.
    pub fn define_mark(&mut self, name: &str, handlers: MarkHandlers) -> Marker {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "MarkId uses 32-bit indices by design."
        )]
        let mark = MarkId(self.marks.len() as u32);
        let governs_properties = handlers.initialize_property.is_some();
        if handlers.element_attribute_changed.is_some() {
            let attr = format!("data-{name}");
            match self.attr_callbacks.iter_mut().find(|(a, _)| *a == attr) {
                Some((_, marks)) => marks.push(mark),
                None => self.attr_callbacks.push((attr, vec![mark])),
            }
        }
        if handlers.initialize_class.is_some() {
            self.class_callbacks.push(mark);
        }
        tracing::debug!(name, ?mark, ?handlers, "mark defined");
        self.marks.push(MarkEntry {
            name: name.to_owned(),
            handlers,
        });
        Marker {
            mark,
            governs_properties,
        }
    }

    fn record_property(&mut self, class: ClassId, mark: MarkId, key: &str) {
        let per_class = self.prop_callbacks.entry(class).or_default();
        let i = match per_class.iter().position(|(m, _)| *m == mark) {
            Some(i) => i,
            None => {
                per_class.push((mark, Vec::new()));
                per_class.len() - 1
            }
        };
        let keys = &mut per_class[i].1;
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_owned());
        }
    }

    /// Name a mark was defined with.
    pub fn name(&self, mark: MarkId) -> Option<&str> {
        self.marks.get(mark.0 as usize).map(|m| m.name.as_str())
    }

    /// Hooks of a mark.
    pub fn handlers(&self, mark: MarkId) -> Option<&MarkHandlers> {
        self.marks.get(mark.0 as usize).map(|m| &m.handlers)
    }

    /// The property initializer of `mark`.
    pub fn property_callback(&self, mark: MarkId) -> Option<InitializePropertyCallback> {
        self.handlers(mark)?.initialize_property.clone()
    }

    /// The attribute-change callback of `mark`.
    pub fn attribute_callback(&self, mark: MarkId) -> Option<ElementAttributeChangedCallback> {
        self.handlers(mark)?.element_attribute_changed.clone()
    }

    /// Registered attribute names, in registration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.attr_callbacks.iter().map(|(a, _)| a.as_str())
    }

    /// Marks listening to `attribute`, in registration order.
    pub fn attribute_marks(&self, attribute: &str) -> &[MarkId] {
        self.attr_callbacks
            .iter()
            .find(|(a, _)| a.eq_ignore_ascii_case(attribute))
            .map_or(&[][..], |(_, marks)| marks.as_slice())
    }

    /// Attribute names paired with their marks.
    pub fn attribute_entries(&self) -> impl Iterator<Item = (&str, &[MarkId])> + '_ {
        self.attr_callbacks
            .iter()
            .map(|(a, marks)| (a.as_str(), marks.as_slice()))
    }

    /// `[a],[b],…` over every registered attribute name, rebuilt from the live set.
    pub fn attribute_selector(&self) -> Selector {
        Selector::any_attribute(self.attribute_names())
    }

    /// Marks with a class hook, in registration order.
    pub fn class_marks(&self) -> &[MarkId] {
        &self.class_callbacks
    }

    /// Run every class hook against `class`.
    pub fn initialize_class(&self, classes: &mut ClassTable, class: ClassId) {
        for mark in &self.class_callbacks {
            if let Some(cb) = self.handlers(*mark).and_then(|h| h.initialize_class.clone()) {
                tracing::trace!(?mark, ?class, "class callback");
                cb(classes, class);
            }
        }
    }

    /// Every `(mark, key)` pair governing `class`, walking its ancestry from the
    /// most derived class up. With `filter`, only that mark's pairs are yielded.
    ///
    /// The iterator is lazy and can be cloned to restart.
    pub fn properties_to_call<'a>(
        &'a self,
        classes: &'a ClassTable,
        class: ClassId,
        filter: Option<MarkId>,
    ) -> PropertiesToCall<'a> {
        PropertiesToCall {
            registry: self,
            ancestry: classes.ancestry(class),
            filter,
            level: 0,
            entry: 0,
            key: 0,
        }
    }
}

/// Iterator returned by [`MarkRegistry::properties_to_call`].
#[derive(Clone, Debug)]
pub struct PropertiesToCall<'a> {
    registry: &'a MarkRegistry,
    ancestry: &'a [ClassId],
    filter: Option<MarkId>,
    level: usize,
    entry: usize,
    key: usize,
}

impl<'a> Iterator for PropertiesToCall<'a> {
    type Item = (MarkId, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let registry: &'a MarkRegistry = self.registry;
        let ancestry: &'a [ClassId] = self.ancestry;
        while let Some(class) = ancestry.get(self.level) {
            let entries = registry
                .prop_callbacks
                .get(class)
                .map_or(&[][..], Vec::as_slice);
            while let Some((mark, keys)) = entries.get(self.entry) {
                if self.filter.is_none_or(|f| f == *mark)
                    && let Some(key) = keys.get(self.key)
                {
                    self.key += 1;
                    return Some((*mark, key.as_str()));
                }
                self.entry += 1;
                self.key = 0;
            }
            self.level += 1;
            self.entry = 0;
        }
        None
    }
}
