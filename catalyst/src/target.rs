// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `target` and `targets` marks: named lookups of descendant elements.
//!
//! An element opts in with `data-target="<controller-tag>.<name>"` (or
//! `data-targets`, for lists). The attribute is a whitespace-separated list, so
//! one element can serve several controllers.

use catalyst_dom::{Dom, NodeId, Selector};

use crate::property::{Property, TargetProperty, TargetsProperty};
use crate::runtime::Runtime;
use crate::value::PropValue;

/// Attribute naming a single target.
pub const TARGET_ATTRIBUTE: &str = "data-target";

/// Attribute naming a member of a target list.
pub const TARGETS_ATTRIBUTE: &str = "data-targets";

/// First element of `controller` declaring itself target `name`.
///
/// The open shadow root is searched first, skipping elements nested in another
/// controller of the same tag; then the light tree, keeping only elements whose
/// closest controller of that tag is `controller`.
pub fn find_target(dom: &Dom, controller: NodeId, name: &str) -> Option<NodeId> {
    candidates(dom, controller, TARGET_ATTRIBUTE, name).next()
}

/// Every element of `controller` declaring itself a member of target list `name`,
/// shadow tree first.
pub fn find_targets(dom: &Dom, controller: NodeId, name: &str) -> Vec<NodeId> {
    candidates(dom, controller, TARGETS_ATTRIBUTE, name).collect()
}

fn candidates<'a>(
    dom: &'a Dom,
    controller: NodeId,
    attribute: &str,
    name: &str,
) -> impl Iterator<Item = NodeId> + use<'a> {
    let tag = dom.tag_name(controller).unwrap_or_default();
    let wanted = Selector::includes(attribute, &format!("{tag}.{name}"));
    let scope = Selector::tag(tag);
    let shadow = dom
        .shadow_root(controller)
        .map(|root| dom.query_selector_all(root, &wanted))
        .unwrap_or_default();
    let light = dom.query_selector_all(controller, &wanted);
    let (in_shadow, in_light) = (scope.clone(), scope);
    shadow
        .into_iter()
        .filter(move |el| dom.closest(*el, &in_shadow).is_none())
        .chain(
            light
                .into_iter()
                .filter(move |el| dom.closest(*el, &in_light) == Some(controller)),
        )
}

/// Property initializer of the `target` mark.
pub(crate) fn initialize_target(rt: &mut Runtime, el: NodeId, key: &str, _: Option<PropValue>) {
    if let Err(err) = rt.install_property(el, key, Property::Target(TargetProperty::new(key))) {
        tracing::warn!(?el, key, %err, "target property skipped");
    }
}

/// Property initializer of the `targets` mark.
pub(crate) fn initialize_targets(rt: &mut Runtime, el: NodeId, key: &str, _: Option<PropValue>) {
    if let Err(err) = rt.install_property(el, key, Property::Targets(TargetsProperty::new(key))) {
        tracing::warn!(?el, key, %err, "targets property skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalyst_dom::ShadowRootMode;

    fn el(dom: &mut Dom, doc: NodeId, tag: &str, parent: NodeId, target: Option<(&str, &str)>) -> NodeId {
        let e = dom.create_element(doc, tag).unwrap();
        if let Some((attr, value)) = target {
            dom.set_attribute(e, attr, value).unwrap();
        }
        dom.append_child(parent, e).unwrap();
        e
    }

    #[test]
    fn nested_controllers_keep_their_own_targets() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let outer = el(&mut dom, doc, "user-list", doc, None);
        let inner = el(&mut dom, doc, "user-list", outer, None);
        let nested = el(&mut dom, doc, "p", inner, Some((TARGET_ATTRIBUTE, "user-list.name")));
        let own = el(&mut dom, doc, "p", outer, Some((TARGET_ATTRIBUTE, "other.x user-list.name")));

        assert_eq!(find_target(&dom, outer, "name"), Some(own));
        assert_eq!(find_target(&dom, inner, "name"), Some(nested));
        assert_eq!(find_target(&dom, outer, "missing"), None);
    }

    #[test]
    fn shadow_targets_come_first() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let host = el(&mut dom, doc, "x-card", doc, None);
        let light = el(&mut dom, doc, "li", host, Some((TARGETS_ATTRIBUTE, "x-card.items")));
        let shadow = dom.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let dark = el(&mut dom, doc, "li", shadow, Some((TARGETS_ATTRIBUTE, "x-card.items")));
        let _single = el(&mut dom, doc, "b", shadow, Some((TARGET_ATTRIBUTE, "x-card.title")));

        assert_eq!(find_targets(&dom, host, "items"), vec![dark, light]);
        assert!(find_target(&dom, host, "title").is_some());
    }
}
