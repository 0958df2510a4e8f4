// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instance initialization.

use catalyst_dom::{DomError, NodeId};

use crate::error::Result;
use crate::mark::InitializePropertyCallback;
use crate::runtime::Runtime;

/// Marker attribute set on every initialized instance.
pub const INITIALIZED_ATTRIBUTE: &str = "data-catalyst";

impl Runtime {
    /// Returns true once `el` completed [`Runtime::initialize_instance`].
    pub fn initialized(&self, el: NodeId) -> bool {
        self.initialized.contains(&el)
    }

    /// Initialize `instance` without a connect hook.
    ///
    /// See [`Runtime::initialize_instance_with`].
    pub fn initialize_instance(&mut self, instance: NodeId) -> Result<bool> {
        self.initialize_instance_with(instance, |_, _| {})
    }

    /// Initialize `instance`:
    ///
    /// 1. set `data-catalyst` and record membership;
    /// 2. run every property initializer governing its class, most derived first;
    /// 3. run attribute callbacks over the instance and its descendants;
    /// 4. subscribe its owner document;
    /// 5. run `on_connect`;
    /// 6. if it has an open shadow root, scan and subscribe that too.
    ///
    /// A second call is a no-op returning `Ok(false)`.
    pub fn initialize_instance_with(
        &mut self,
        instance: NodeId,
        on_connect: impl FnOnce(&mut Self, NodeId),
    ) -> Result<bool> {
        if !self.dom.is_alive(instance) {
            return Err(DomError::Stale(instance).into());
        }
        if !self.dom.is_element(instance) {
            return Err(DomError::NotAnElement(instance).into());
        }
        if self.initialized.contains(&instance) {
            tracing::debug!(?instance, "already initialized");
            return Ok(false);
        }
        self.dom
            .toggle_attribute(instance, INITIALIZED_ATTRIBUTE, Some(true))?;
        self.initialized.insert(instance);

        self.call_on_props(instance);
        self.call_on_attributes(instance);
        if let Some(doc) = self.dom.owner_document(instance) {
            self.listen_for_new_attributes(doc)?;
        }
        on_connect(self, instance);
        if let Some(shadow) = self.dom.shadow_root(instance) {
            self.call_on_attributes(shadow);
            self.listen_for_new_attributes(shadow)?;
        }
        tracing::debug!(?instance, class = ?self.component_class(instance), "instance initialized");
        Ok(true)
    }

    /// Run every property initializer governing the class of `instance`, passing
    /// each key's value from before the call.
    fn call_on_props(&mut self, instance: NodeId) {
        let Some(class) = self.component_class(instance) else {
            return;
        };
        let calls: Vec<(InitializePropertyCallback, String)> = self
            .registry
            .properties_to_call(&self.classes, class, None)
            .filter_map(|(mark, key)| Some((self.registry.property_callback(mark)?, key.to_owned())))
            .collect();
        for (callback, key) in calls {
            let prior = self
                .property_slot(instance, &key)
                .map(|p| p.read(&self.dom, instance));
            tracing::trace!(?instance, key, ?prior, "property callback");
            callback(self, instance, &key, prior);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDescriptor, MarkHandlers, Methods, PropValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn initialization_is_idempotent() {
        let mut rt = Runtime::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let tracked = rt.define_mark(
            "tracked",
            MarkHandlers::new().on_property(move |_, _, key, prior| {
                log.borrow_mut().push((key.to_owned(), prior));
            }),
        );
        let class = rt
            .define_class(ClassDescriptor::new("Tracked").with_default("size", 2))
            .unwrap();
        rt.mark(tracked, class, "size");
        rt.mark(tracked, class, "label");
        let el = rt.create_element("x-tracked").unwrap();
        rt.attach_controller(el, class, Box::new(Methods::new())).unwrap();

        assert!(!rt.initialized(el));
        assert!(rt.initialize_instance(el).unwrap());
        assert!(rt.initialized(el));
        assert!(rt.dom().has_attribute(el, INITIALIZED_ATTRIBUTE));
        assert!(!rt.initialize_instance(el).unwrap());
        assert_eq!(
            *seen.borrow(),
            vec![
                ("size".to_owned(), Some(PropValue::Number(2.0))),
                ("label".to_owned(), None),
            ]
        );
    }

    #[test]
    fn membership_survives_attribute_changes() {
        let mut rt = Runtime::default();
        let el = rt.create_element("div").unwrap();
        rt.initialize_instance(el).unwrap();
        rt.dom_mut().remove_attribute(el, INITIALIZED_ATTRIBUTE).unwrap();
        rt.dom_mut().set_attribute(el, "data-action", "").unwrap();
        rt.flush();
        assert!(rt.initialized(el));
    }

    #[test]
    fn connect_hook_runs_after_props_and_before_shadow_scan() {
        let mut rt = Runtime::default();
        let order = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&order);
        let early = rt.define_mark(
            "early",
            MarkHandlers::new().on_property(move |_, _, _, _| log.borrow_mut().push("props")),
        );
        let log = Rc::clone(&order);
        rt.define_mark(
            "watch",
            MarkHandlers::new().on_attribute(move |rt, el, _| {
                let place = if rt.dom().parent(el).is_some_and(|p| rt.dom().host(p).is_some()) {
                    "shadow"
                } else {
                    "light"
                };
                log.borrow_mut().push(place);
            }),
        );
        let class = rt.define_class(ClassDescriptor::new("Probe")).unwrap();
        rt.mark(early, class, "x");

        let el = rt.create_element("x-watch").unwrap();
        rt.dom_mut().set_attribute(el, "data-watch", "").unwrap();
        let shadow = rt
            .dom_mut()
            .attach_shadow(el, catalyst_dom::ShadowRootMode::Open)
            .unwrap();
        let inner = rt.create_element("span").unwrap();
        rt.dom_mut().set_attribute(inner, "data-watch", "").unwrap();
        rt.dom_mut().append_child(shadow, inner).unwrap();
        rt.attach_controller(el, class, Box::new(Methods::new())).unwrap();

        let log = Rc::clone(&order);
        rt.initialize_instance_with(el, move |_, _| log.borrow_mut().push("connect"))
            .unwrap();
        assert_eq!(*order.borrow(), ["props", "light", "connect", "shadow"]);
        assert!(rt.subscription(shadow).is_some());
        assert!(rt.subscription(rt.document()).is_some());
    }

    #[test]
    fn stale_and_non_element_nodes_are_rejected() {
        let mut rt = Runtime::default();
        let doc = rt.document();
        assert!(rt.initialize_instance(doc).is_err());
        let el = rt.create_element("div").unwrap();
        rt.destroy(el);
        assert!(rt.initialize_instance(el).is_err());
    }
}
