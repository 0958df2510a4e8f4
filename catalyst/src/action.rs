// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `action` mark: declarative event delegation.
//!
//! ## Syntax
//!
//! `data-action` holds whitespace-separated `event:tag#method` bindings, e.g.
//! `click:hello-controller#greet mouseover:hello-controller#peek`. The event
//! type ends at the rightmost `:` and the tag at the rightmost `#`, so event
//! types cannot contain `:` and tags cannot contain `#`.
//!
//! ## Dispatch
//!
//! Every element with bindings gets the runtime's single shared listener for each
//! event type it names. When an event arrives the attribute is parsed again, and
//! for each binding of that type:
//!
//! - the closest initialized ancestor matching the tag has the method called;
//! - if the element sits in a shadow tree whose host matches the tag and is
//!   initialized, the host has the method called as well.
//!
//! Malformed bindings, missing controllers and missing methods are skipped.

use catalyst_dom::{NodeId, Selector};

use crate::event::Event;
use crate::runtime::Runtime;

/// Attribute holding action bindings.
pub const ACTION_ATTRIBUTE: &str = "data-action";

/// One `event:tag#method` binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Binding<'a> {
    /// Event type to react to.
    pub event_type: &'a str,
    /// Selector text naming the controller.
    pub tag: &'a str,
    /// Method called on the controller.
    pub method: &'a str,
}

impl<'a> Binding<'a> {
    /// Parse one token. `None` when a separator is missing or out of order.
    ///
    /// ```
    /// use catalyst::Binding;
    ///
    /// let b = Binding::parse("custom:event:x-foo#bar").unwrap();
    /// assert_eq!((b.event_type, b.tag, b.method), ("custom:event", "x-foo", "bar"));
    /// assert!(Binding::parse("click#x-foo:bar").is_none());
    /// ```
    pub fn parse(token: &'a str) -> Option<Self> {
        let event_sep = token.rfind(':')?;
        let method_sep = token.rfind('#')?;
        if method_sep < event_sep {
            return None;
        }
        Some(Self {
            event_type: &token[..event_sep],
            tag: &token[event_sep + 1..method_sep],
            method: &token[method_sep + 1..],
        })
    }
}

/// Bindings of a `data-action` value, in order. Malformed tokens are logged and
/// skipped.
pub fn bindings(value: &str) -> impl Iterator<Item = Binding<'_>> {
    value.split_whitespace().filter_map(|token| {
        let binding = Binding::parse(token);
        if binding.is_none() {
            tracing::warn!(token, "malformed action binding");
        }
        binding
    })
}

/// Attribute callback of the `action` mark.
pub(crate) fn bind(rt: &mut Runtime, el: NodeId, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };
    let listener = rt.action_listener();
    for binding in bindings(value) {
        match rt.add_event_listener(el, binding.event_type, listener) {
            Ok(true) => tracing::trace!(?el, event_type = binding.event_type, "action bound"),
            Ok(false) => {}
            Err(err) => tracing::warn!(?el, %err, "action not bound"),
        }
    }
}

/// The listener shared by every bound element.
pub(crate) fn handle_event(rt: &mut Runtime, event: &Event) {
    let Some(el) = event.current_target() else {
        return;
    };
    let Some(value) = rt.dom().get_attribute(el, ACTION_ATTRIBUTE).map(str::to_owned) else {
        return;
    };
    for binding in bindings(&value) {
        if binding.event_type != event.event_type() {
            continue;
        }
        let selector = match Selector::parse(binding.tag) {
            Ok(selector) => selector,
            Err(err) => {
                tracing::warn!(tag = binding.tag, %err, "action tag is not a selector");
                continue;
            }
        };
        if let Some(controller) = rt.dom().closest(el, &selector)
            && rt.initialized(controller)
            && !rt.invoke(controller, binding.method, event)
        {
            tracing::warn!(?controller, method = binding.method, "action method missing");
        }
        let root = rt.dom().root_node(el);
        if let Some(host) = rt.dom().host(root)
            && rt.initialized(host)
            && rt.dom().matches(host, &selector)
        {
            rt.invoke(host, binding.method, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDescriptor, Methods};
    use catalyst_dom::ShadowRootMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn separators_are_the_rightmost_ones() {
        let all: Vec<_> = bindings("  click:x-foo#a\n keydown:enter:x-bar#b#c ").collect();
        assert_eq!(
            all,
            vec![
                Binding {
                    event_type: "click",
                    tag: "x-foo",
                    method: "a"
                },
                Binding {
                    event_type: "keydown:enter",
                    tag: "x-bar#b",
                    method: "c"
                },
            ]
        );
    }

    #[test]
    fn malformed_tokens_are_skipped() {
        let all: Vec<_> = bindings("click x-foo#a click:x-foo#b x#y:z")
            .map(|b| b.method)
            .collect();
        assert_eq!(all, ["b"]);
        assert_eq!(bindings("").count(), 0);
    }

    type Calls = Rc<RefCell<Vec<(&'static str, NodeId, String)>>>;

    fn recorder(calls: &Calls, label: &'static str, methods: &[&'static str]) -> Methods {
        let mut m = Methods::new();
        for method in methods {
            let calls = Rc::clone(calls);
            m = m.method(*method, move |_, this, event: &Event| {
                calls
                    .borrow_mut()
                    .push((label, this, event.event_type().to_owned()));
            });
        }
        m
    }

    #[test]
    fn shadow_host_and_closest_ancestor_both_fire() {
        let mut rt = Runtime::default();
        let calls: Calls = Rc::default();
        let class = rt.define_class(ClassDescriptor::new("Host")).unwrap();
        let doc = rt.document();

        let host = rt.create_element("x-host").unwrap();
        rt.attach_controller(host, class, Box::new(recorder(&calls, "host", &["go"])))
            .unwrap();
        rt.append_child(doc, host).unwrap();
        let shadow = rt.dom_mut().attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inner = rt.create_element("x-host").unwrap();
        rt.attach_controller(inner, class, Box::new(recorder(&calls, "inner", &["go"])))
            .unwrap();
        let button = rt.create_element("button").unwrap();
        rt.dom_mut()
            .set_attribute(button, ACTION_ATTRIBUTE, "click:x-host#go")
            .unwrap();
        rt.dom_mut().append_child(inner, button).unwrap();
        rt.dom_mut().append_child(shadow, inner).unwrap();

        rt.initialize_instance(inner).unwrap();
        rt.initialize_instance(host).unwrap();
        rt.dispatch_event(button, Event::new("click")).unwrap();
        let labels: Vec<_> = calls.borrow().iter().map(|(l, _, _)| *l).collect();
        assert_eq!(labels, ["inner", "host"]);
    }

    #[test]
    fn uninitialized_controllers_are_ignored() {
        let mut rt = Runtime::default();
        let calls: Calls = Rc::default();
        let class = rt.define_class(ClassDescriptor::new("C")).unwrap();
        let doc = rt.document();
        let controller = rt.create_element("x-c").unwrap();
        rt.attach_controller(controller, class, Box::new(recorder(&calls, "c", &["go"])))
            .unwrap();
        let button = rt.create_element("button").unwrap();
        rt.dom_mut()
            .set_attribute(button, ACTION_ATTRIBUTE, "click:x-c#go")
            .unwrap();
        rt.dom_mut().append_child(controller, button).unwrap();
        rt.dom_mut().append_child(doc, controller).unwrap();
        rt.add_event_listener(button, "click", rt.action_listener())
            .unwrap();

        rt.dispatch_event(button, Event::new("click")).unwrap();
        assert!(calls.borrow().is_empty());
        rt.initialize_instance(controller).unwrap();
        rt.dispatch_event(button, Event::new("click")).unwrap();
        assert_eq!(calls.borrow().len(), 1);
    }
}
