// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `attr` mark: properties mirrored onto `data-*` attributes.

use catalyst_dom::NodeId;

use crate::class::{ClassId, ClassTable};
use crate::mark::{MarkRegistry, Marker};
use crate::property::{AttrKind, AttrProperty, Property};
use crate::runtime::Runtime;
use crate::value::PropValue;

/// The attribute a property key is mirrored onto.
///
/// A `-` goes before every ASCII capital that starts a word (is followed by a
/// lower-case letter or ends the key), then the result is prefixed with `data-`,
/// doubled hyphens are collapsed and everything is lower-cased. A run of capitals
/// stays joined, but its last capital starts a new word when a lower-case letter
/// follows: `URLValue` becomes `data-url-value`.
///
/// ```
/// use catalyst::attribute_name_for;
///
/// assert_eq!(attribute_name_for("fooBar"), "data-foo-bar");
/// assert_eq!(attribute_name_for("Foo"), "data-foo");
/// assert_eq!(attribute_name_for("fooBarB"), "data-foo-bar-b");
/// ```
pub fn attribute_name_for(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 8);
    out.push_str("data-");
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_uppercase() && chars.peek().is_none_or(char::is_ascii_lowercase) {
            out.push('-');
        }
        out.push(c);
    }
    out.replace("--", "-").to_lowercase()
}

/// Property initializer of the `attr` mark.
///
/// The prior value picks the coercion. When the key had a value and the element
/// lacks the attribute, the value is written through the new setter.
pub(crate) fn initialize_attr(rt: &mut Runtime, el: NodeId, key: &str, prior: Option<PropValue>) {
    let property = AttrProperty::new(attribute_name_for(key), AttrKind::infer(prior.as_ref()));
    if let Err(err) = rt.install_property(el, key, Property::Attr(property.clone())) {
        tracing::warn!(?el, key, %err, "attr property skipped");
        return;
    }
    let Some(value) = prior else {
        return;
    };
    if !rt.dom.has_attribute(el, property.name()) {
        if let Err(err) = property.set(&mut rt.dom, el, &value) {
            tracing::warn!(?el, key, %err, "attr default not written");
        }
    }
}

/// Class hook of the `attr` mark: observed attributes become computed.
pub(crate) fn define_observed_attributes(classes: &mut ClassTable, class: ClassId) {
    if let Err(err) = classes.compute_observed_attributes(class) {
        tracing::warn!(?class, %err, "observed attributes not computed");
    }
}

/// Observed attributes of `class`: names of `attr`-marked keys (when computed),
/// followed by the statically declared ones.
pub(crate) fn observed_attributes(
    registry: &MarkRegistry,
    classes: &ClassTable,
    class: ClassId,
    attr: Marker,
) -> Vec<String> {
    let mut out: Vec<String> = if classes.has_computed_observed_attributes(class) {
        registry
            .properties_to_call(classes, class, Some(attr.id()))
            .map(|(_, key)| attribute_name_for(key))
            .collect()
    } else {
        Vec::new()
    };
    out.extend(classes.static_observed_attributes(class).iter().cloned());
    out
}
