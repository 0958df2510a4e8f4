// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `shadowroot` mark: promote `<template data-shadowroot>` children of an
//! initialized controller into its shadow root.

use catalyst_dom::{NodeId, ShadowRootMode};

use crate::runtime::Runtime;

/// Attribute callback of the `shadowroot` mark. The attribute value picks the
/// mode; only `closed` gives a closed root.
///
/// Each template is promoted at most once, even when a later scan sees it again.
pub(crate) fn promote(rt: &mut Runtime, template: NodeId, mode: Option<&str>) {
    if rt.dom().tag_name(template) != Some("template") || rt.promoted.contains(&template) {
        return;
    }
    let Some(controller) = rt.dom().parent_element(template) else {
        return;
    };
    if !rt.initialized(controller) {
        return;
    }
    let root = match rt.shadows.get(&controller) {
        Some(root) => *root,
        None => {
            let root = match rt.dom().shadow_root(controller) {
                Some(root) => root,
                None => {
                    let mode = if mode == Some("closed") {
                        ShadowRootMode::Closed
                    } else {
                        ShadowRootMode::Open
                    };
                    match rt.dom_mut().attach_shadow(controller, mode) {
                        Ok(root) => root,
                        Err(err) => {
                            tracing::warn!(?controller, %err, "shadow root not attached");
                            return;
                        }
                    }
                }
            };
            rt.shadows.insert(controller, root);
            root
        }
    };
    let Some(content) = rt.dom().template_content(template) else {
        return;
    };
    let copy = match rt.dom_mut().clone_node(content, true) {
        Ok(copy) => copy,
        Err(err) => {
            tracing::warn!(?template, %err, "template not cloned");
            return;
        }
    };
    tracing::debug!(?controller, ?root, "template promoted");
    match rt.append_child(root, copy) {
        Ok(()) => {
            rt.promoted.insert(template);
        }
        Err(err) => tracing::warn!(?controller, %err, "template content not appended"),
    }
    rt.dom_mut().destroy(copy);
}

#[cfg(test)]
mod tests {
    use crate::{ClassDescriptor, Methods, Runtime};

    fn controller_with_template(rt: &mut Runtime, mode: &str) -> (catalyst_dom::NodeId, catalyst_dom::NodeId) {
        let class = rt.define_class(ClassDescriptor::new("Shadowed")).unwrap();
        let el = rt.create_element("x-shadowed").unwrap();
        rt.attach_controller(el, class, Box::new(Methods::new())).unwrap();
        let template = rt.create_element("template").unwrap();
        rt.dom_mut().set_attribute(template, "data-shadowroot", mode).unwrap();
        let content = rt.dom().template_content(template).unwrap();
        let p = rt.create_element("p").unwrap();
        rt.dom_mut().append_child(content, p).unwrap();
        rt.dom_mut().append_child(el, template).unwrap();
        (el, template)
    }

    #[test]
    fn template_content_lands_in_an_open_shadow_root() {
        let mut rt = Runtime::default();
        let (el, template) = controller_with_template(&mut rt, "");
        rt.initialize_instance(el).unwrap();

        let shadow = rt.dom().shadow_root(el).unwrap();
        let kids = rt.dom().children(shadow);
        assert_eq!(kids.len(), 1);
        assert_eq!(rt.dom().tag_name(kids[0]), Some("p"));
        // The template itself stays and keeps its content.
        assert_eq!(rt.dom().parent(template), Some(el));
        let content = rt.dom().template_content(template).unwrap();
        assert_eq!(rt.dom().children(content).len(), 1);
        assert!(rt.subscription(shadow).is_some());
    }

    #[test]
    fn closed_mode_hides_the_root() {
        let mut rt = Runtime::default();
        let (el, _) = controller_with_template(&mut rt, "closed");
        rt.initialize_instance(el).unwrap();
        assert!(rt.dom().shadow_root(el).is_none());
        assert!(rt.shadows.contains_key(&el));
    }

    #[test]
    fn rescanning_does_not_promote_twice() {
        let mut rt = Runtime::default();
        let doc = rt.document();
        rt.listen_for_new_attributes(doc).unwrap();
        let (el, template) = controller_with_template(&mut rt, "");
        let second = rt.create_element("template").unwrap();
        rt.dom_mut().set_attribute(second, "data-shadowroot", "").unwrap();
        let content = rt.dom().template_content(second).unwrap();
        let span = rt.create_element("span").unwrap();
        rt.dom_mut().append_child(content, span).unwrap();
        rt.dom_mut().append_child(el, second).unwrap();

        rt.append_child(doc, el).unwrap();
        rt.initialize_instance(el).unwrap();
        let shadow = rt.dom().shadow_root(el).unwrap();
        assert_eq!(rt.dom().children(shadow).len(), 2);

        rt.flush();
        assert_eq!(rt.call_on_attributes(template), 1);
        assert_eq!(rt.dom().children(shadow).len(), 2);
        assert!(rt.promoted.contains(&template));
        assert!(rt.promoted.contains(&second));
    }

    #[test]
    fn templates_under_uninitialized_parents_wait() {
        let mut rt = Runtime::default();
        let (el, template) = controller_with_template(&mut rt, "");
        assert_eq!(rt.call_on_attributes(template), 1);
        assert!(rt.dom().shadow_root(el).is_none());
    }
}
