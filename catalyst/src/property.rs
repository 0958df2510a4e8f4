// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance properties.
//!
//! Before initialization a property is a plain [`PropValue`]. Property initializers
//! replace it with a typed wrapper that reads through to the element on every access.

use catalyst_dom::{Dom, DomError, NodeId};

use crate::target::{find_target, find_targets};
use crate::value::{PropValue, parse_number};

/// How an attribute-backed property coerces values.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AttrKind {
    /// Attribute text; absent reads as `""`.
    #[default]
    String,
    /// Attribute text parsed as a number; absent reads as `0`.
    Number,
    /// Attribute presence.
    Boolean,
}

impl AttrKind {
    /// Infer the kind from a property's value before initialization.
    pub fn infer(prior: Option<&PropValue>) -> Self {
        match prior {
            Some(PropValue::Number(_)) => Self::Number,
            Some(PropValue::Boolean(_)) => Self::Boolean,
            _ => Self::String,
        }
    }
}

/// A property mirrored onto a `data-*` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrProperty {
    name: String,
    kind: AttrKind,
}

impl AttrProperty {
    /// Mirror onto attribute `name` with coercion `kind`.
    pub fn new(name: impl Into<String>, kind: AttrKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coercion kind.
    pub fn kind(&self) -> AttrKind {
        self.kind
    }

    /// Read the current value from `el`.
    pub fn get(&self, dom: &Dom, el: NodeId) -> PropValue {
        match self.kind {
            AttrKind::String => {
                PropValue::String(dom.get_attribute(el, &self.name).unwrap_or("").to_owned())
            }
            AttrKind::Number => {
                PropValue::Number(parse_number(dom.get_attribute(el, &self.name).unwrap_or("")))
            }
            AttrKind::Boolean => PropValue::Boolean(dom.has_attribute(el, &self.name)),
        }
    }

    /// Write `value` to `el`.
    ///
    /// Strings store falsy values as `""`; numbers store their text; booleans
    /// toggle presence by truthiness.
    pub fn set(&self, dom: &mut Dom, el: NodeId, value: &PropValue) -> Result<(), DomError> {
        match self.kind {
            AttrKind::String => {
                let text = if value.is_truthy() {
                    value.to_attribute_text()
                } else {
                    String::new()
                };
                dom.set_attribute(el, &self.name, &text)
            }
            AttrKind::Number => dom.set_attribute(el, &self.name, &value.to_attribute_text()),
            AttrKind::Boolean => dom
                .toggle_attribute(el, &self.name, Some(value.is_truthy()))
                .map(|_| ()),
        }
    }
}

/// A property resolving to one target element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetProperty {
    key: String,
}

impl TargetProperty {
    /// Resolve targets named `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Look the target up now.
    pub fn get(&self, dom: &Dom, controller: NodeId) -> Option<NodeId> {
        find_target(dom, controller, &self.key)
    }
}

/// A property resolving to every matching target element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetsProperty {
    key: String,
}

impl TargetsProperty {
    /// Resolve targets named `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Look the targets up now.
    pub fn get(&self, dom: &Dom, controller: NodeId) -> Vec<NodeId> {
        find_targets(dom, controller, &self.key)
    }
}

/// A property slot on an instance.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    /// A plain stored value.
    Value(PropValue),
    /// Mirrored onto an attribute.
    Attr(AttrProperty),
    /// Looked up as a single target.
    Target(TargetProperty),
    /// Looked up as a target list.
    Targets(TargetsProperty),
}

impl Property {
    /// Read through to the element if needed.
    pub fn read(&self, dom: &Dom, el: NodeId) -> PropValue {
        match self {
            Self::Value(v) => v.clone(),
            Self::Attr(a) => a.get(dom, el),
            Self::Target(t) => PropValue::Element(t.get(dom, el)),
            Self::Targets(t) => PropValue::Elements(t.get(dom, el)),
        }
    }

    /// Returns true for target lookups, which have no setter.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Target(_) | Self::Targets(_))
    }
}
