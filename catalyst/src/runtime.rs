// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The runtime: one document, its registries, and the components living in it.
//!
//! ## Overview
//!
//! [`Runtime`] owns the [`Dom`], the [`MarkRegistry`], the [`ClassTable`] and all
//! per-element state. Marks and classes are registered during setup; after that
//! everything is driven by [`Runtime::append_child`], [`Runtime::flush`] and
//! [`Runtime::dispatch_event`].
//!
//! ## Lifetimes
//!
//! Per-element and per-root state is keyed by [`NodeId`]. Nothing is reclaimed
//! implicitly: [`Runtime::destroy`] frees a subtree and sweeps, and
//! [`Runtime::sweep`] can be called after any host-side destruction.
//!
//! ```
//! use catalyst::{ClassDescriptor, Event, Methods, Runtime};
//! use std::{cell::Cell, rc::Rc};
//!
//! let mut rt = Runtime::default();
//! let class = rt.define_class(ClassDescriptor::new("HelloController")).unwrap();
//! let greeted = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&greeted);
//! rt.define_element("hello-controller", class, move || {
//!     let counter = Rc::clone(&counter);
//!     Box::new(Methods::new().method("greet", move |_, _, _| counter.set(counter.get() + 1)))
//! })
//! .unwrap();
//!
//! let doc = rt.document();
//! let hello = rt.create_element("hello-controller").unwrap();
//! let button = rt.create_element("button").unwrap();
//! rt.dom_mut().set_attribute(button, "data-action", "click:hello-controller#greet").unwrap();
//! rt.append_child(hello, button).unwrap();
//! rt.append_child(doc, hello).unwrap();
//!
//! rt.dispatch_event(button, Event::new("click")).unwrap();
//! assert_eq!(greeted.get(), 1);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use catalyst_dom::{Dom, DomError, ListenerId, NodeId, NodeKind, Selector};
use catalyst_responder::adapters::dom::DomParents;
use catalyst_responder::router::Router;
use catalyst_responder::types::{Outcome, Phase};

use crate::action;
use crate::attr;
use crate::builtins::{self, Builtins};
use crate::class::{ClassDescriptor, ClassId, ClassTable};
use crate::config::Config;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::mark::{MarkHandlers, MarkRegistry, Marker};
use crate::observer::Subscription;
use crate::property::Property;
use crate::value::PropValue;

/// A listener callable from [`Runtime::dispatch_event`].
pub type EventListener = Rc<dyn Fn(&mut Runtime, &Event)>;

/// Builds a controller for a newly created or upgraded custom element.
pub type ControllerFactory = Rc<dyn Fn() -> Box<dyn Controller>>;

/// Per-element state of a component.
pub(crate) struct Component {
    pub(crate) class: ClassId,
    /// `None` while one of its methods is running.
    pub(crate) controller: Option<Box<dyn Controller>>,
    pub(crate) properties: BTreeMap<String, Property>,
}

#[derive(Clone)]
struct ElementDefinition {
    class: ClassId,
    factory: ControllerFactory,
}

/// The component runtime.
pub struct Runtime {
    pub(crate) config: Config,
    pub(crate) dom: Dom,
    pub(crate) document: NodeId,
    pub(crate) registry: MarkRegistry,
    pub(crate) classes: ClassTable,
    pub(crate) builtins: Builtins,
    pub(crate) action_listener: ListenerId,
    pub(crate) components: BTreeMap<NodeId, Component>,
    pub(crate) initialized: BTreeSet<NodeId>,
    pub(crate) subscriptions: BTreeMap<NodeId, Subscription>,
    /// Shadow roots created for template promotion, by host.
    pub(crate) shadows: BTreeMap<NodeId, NodeId>,
    /// Templates whose content was already copied into a shadow root.
    pub(crate) promoted: BTreeSet<NodeId>,
    listeners: Vec<EventListener>,
    definitions: BTreeMap<String, ElementDefinition>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("document", &self.document)
            .field("components", &self.components.len())
            .field("initialized", &self.initialized.len())
            .field("subscriptions", &self.subscriptions.len())
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Runtime {
    /// A runtime with a fresh document and the built-in marks.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, MarkRegistry::new())
    }

    /// A runtime over a registry that may already hold marks.
    ///
    /// The built-in marks are added after the existing ones.
    pub fn with_registry(config: Config, mut registry: MarkRegistry) -> Self {
        let builtins = builtins::install(&mut registry);
        let mut dom = Dom::new();
        let document = dom.create_document();
        let mut rt = Self {
            config,
            dom,
            document,
            registry,
            classes: ClassTable::new(),
            builtins,
            action_listener: ListenerId(0),
            components: BTreeMap::new(),
            initialized: BTreeSet::new(),
            subscriptions: BTreeMap::new(),
            shadows: BTreeMap::new(),
            promoted: BTreeSet::new(),
            listeners: Vec::new(),
            definitions: BTreeMap::new(),
        };
        rt.action_listener = rt.register_listener(action::handle_event);
        tracing::debug!(?document, config = ?rt.config, "runtime created");
        rt
    }

    // --- accessors ---

    /// The runtime's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The document every created element belongs to.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// The document model.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// The document model, for host-side mutations.
    ///
    /// Mutations made here are seen by subscriptions on the next [`Runtime::flush`],
    /// but insertions do not connect custom elements; use [`Runtime::append_child`].
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// The mark registry.
    pub fn registry(&self) -> &MarkRegistry {
        &self.registry
    }

    /// The class table.
    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// The built-in markers.
    pub fn builtins(&self) -> Builtins {
        self.builtins
    }

    // --- setup ---

    /// Register a mark. See [`MarkRegistry::define_mark`].
    pub fn define_mark(&mut self, name: &str, handlers: MarkHandlers) -> Marker {
        self.registry.define_mark(name, handlers)
    }

    /// Register a class.
    pub fn define_class(&mut self, descriptor: ClassDescriptor) -> Result<ClassId> {
        self.classes.define(descriptor)
    }

    /// Apply `marker` to `key` on `class`.
    pub fn mark(&mut self, marker: Marker, class: ClassId, key: &str) -> ClassId {
        marker.apply(&mut self.registry, class, key)
    }

    /// Run every class hook against `class`.
    pub fn initialize_class(&mut self, class: ClassId) -> Result<()> {
        if !self.classes.contains(class) {
            return Err(Error::UnknownClass(class));
        }
        self.registry.initialize_class(&mut self.classes, class);
        Ok(())
    }

    /// The attributes `class` observes: attr-derived names when its observed
    /// attributes are computed, followed by the static list.
    pub fn observed_attributes(&self, class: ClassId) -> Vec<String> {
        attr::observed_attributes(&self.registry, &self.classes, class, self.builtins.attr)
    }

    /// Define custom element `tag` backed by `class`.
    ///
    /// Initializes the class, then upgrades existing `tag` elements in the
    /// document, connecting those already in it.
    pub fn define_element(
        &mut self,
        tag: &str,
        class: ClassId,
        factory: impl Fn() -> Box<dyn Controller> + 'static,
    ) -> Result<()> {
        let valid = tag.contains('-')
            && tag.starts_with(|c: char| c.is_ascii_lowercase())
            && !tag.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace());
        if !valid {
            return Err(Error::InvalidElementName(tag.to_owned()));
        }
        if self.definitions.contains_key(tag) {
            return Err(Error::AlreadyDefined(tag.to_owned()));
        }
        self.initialize_class(class)?;
        self.definitions.insert(
            tag.to_owned(),
            ElementDefinition {
                class,
                factory: Rc::new(factory),
            },
        );
        tracing::debug!(tag, ?class, "custom element defined");

        let existing = self
            .dom
            .query_selector_all(self.document, &Selector::tag(tag));
        for el in existing {
            self.upgrade(el)?;
            if self.config.auto_connect && self.dom.is_connected(el) {
                self.connect(el)?;
            }
        }
        Ok(())
    }

    /// Returns true if `tag` names a defined custom element.
    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    // --- elements ---

    /// Create an element owned by the document, upgrading it if `tag` is defined.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        let el = self.dom.create_element(self.document, tag)?;
        self.upgrade(el)?;
        Ok(el)
    }

    /// Make `el` a component of `class` driven by `controller`.
    ///
    /// The instance starts with the class defaults as plain property values.
    pub fn attach_controller(
        &mut self,
        el: NodeId,
        class: ClassId,
        controller: Box<dyn Controller>,
    ) -> Result<()> {
        if !self.dom.is_alive(el) {
            return Err(DomError::Stale(el).into());
        }
        if !self.dom.is_element(el) {
            return Err(DomError::NotAnElement(el).into());
        }
        if !self.classes.contains(class) {
            return Err(Error::UnknownClass(class));
        }
        let properties = self
            .classes
            .defaults(class)
            .into_iter()
            .map(|(k, v)| (k, Property::Value(v)))
            .collect();
        let replaced = self
            .components
            .insert(
                el,
                Component {
                    class,
                    controller: Some(controller),
                    properties,
                },
            )
            .is_some();
        tracing::debug!(?el, ?class, replaced, "controller attached");
        Ok(())
    }

    /// The class of a component element.
    pub fn component_class(&self, el: NodeId) -> Option<ClassId> {
        self.components.get(&el).map(|c| c.class)
    }

    /// Attach the defined controller if `el` is a defined custom element without one.
    fn upgrade(&mut self, el: NodeId) -> Result<bool> {
        if self.components.contains_key(&el) {
            return Ok(false);
        }
        let Some(tag) = self.dom.tag_name(el) else {
            return Ok(false);
        };
        let Some(def) = self.definitions.get(tag).cloned() else {
            return Ok(false);
        };
        self.attach_controller(el, def.class, (def.factory)())?;
        Ok(true)
    }

    /// Initialize component `el` and run its controller's `connected` hook.
    ///
    /// Returns `Ok(false)` if it was already initialized.
    pub fn connect(&mut self, el: NodeId) -> Result<bool> {
        self.upgrade(el)?;
        if !self.components.contains_key(&el) {
            return Err(Error::UnknownElement(el));
        }
        self.initialize_instance_with(el, |rt, el| {
            let Some(mut controller) = rt.take_controller(el) else {
                return;
            };
            controller.connected(rt, el);
            rt.restore_controller(el, controller);
        })
    }

    /// Append `child` to `parent`.
    ///
    /// With [`Config::auto_connect`], defined custom elements in the inserted
    /// subtree (shadow trees included) are connected once `parent` is connected.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let inserted = match self.dom.kind(child) {
            Some(NodeKind::Fragment) => self.dom.children(child).to_vec(),
            _ => vec![child],
        };
        self.dom.append_child(parent, child)?;
        if self.config.auto_connect && self.dom.is_connected(parent) {
            for node in inserted {
                self.connect_tree(node)?;
            }
        }
        Ok(())
    }

    /// Remove `child` from `parent`. Its state is kept until it is destroyed.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.dom.remove_child(parent, child)?;
        Ok(())
    }

    /// Free `node` and its subtree, then [`sweep`](Runtime::sweep).
    pub fn destroy(&mut self, node: NodeId) {
        self.dom.destroy(node);
        self.sweep();
    }

    /// Drop state held for nodes that no longer exist, and subscriptions that
    /// were closed.
    pub fn sweep(&mut self) {
        let dom = &self.dom;
        let before = self.components.len() + self.initialized.len();
        self.components.retain(|el, _| dom.is_alive(*el));
        self.initialized.retain(|el| dom.is_alive(*el));
        self.shadows
            .retain(|host, root| dom.is_alive(*host) && dom.is_alive(*root));
        self.promoted.retain(|template| dom.is_alive(*template));
        let dropped = before - self.components.len() - self.initialized.len();
        let stale: Vec<NodeId> = self
            .subscriptions
            .iter()
            .filter(|(root, sub)| sub.closed() || !self.dom.is_alive(**root))
            .map(|(root, _)| *root)
            .collect();
        for root in &stale {
            self.release(*root);
        }
        tracing::debug!(dropped, subscriptions = stale.len(), "swept");
    }

    fn connect_tree(&mut self, root: NodeId) -> Result<()> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            if self.dom.is_element(n) {
                order.push(n);
            }
            if let Some(shadow) = self.dom.shadow_root(n) {
                stack.push(shadow);
            }
            stack.extend(self.dom.children(n).iter().rev().copied());
        }
        for el in order {
            if !self.dom.is_alive(el) || self.initialized.contains(&el) {
                continue;
            }
            let defined = self
                .dom
                .tag_name(el)
                .is_some_and(|t| self.definitions.contains_key(t));
            if (defined || self.components.contains_key(&el)) && self.dom.is_connected(el) {
                self.connect(el)?;
            }
        }
        Ok(())
    }

    // --- properties ---

    /// Read property `key` of component `el`.
    pub fn property(&self, el: NodeId, key: &str) -> Option<PropValue> {
        self.components
            .get(&el)?
            .properties
            .get(key)
            .map(|p| p.read(&self.dom, el))
    }

    /// Assign property `key` of component `el`.
    ///
    /// Attribute-backed properties write through to the element; target lookups
    /// are read-only.
    pub fn set_property(&mut self, el: NodeId, key: &str, value: PropValue) -> Result<()> {
        let component = self
            .components
            .get_mut(&el)
            .ok_or(Error::UnknownElement(el))?;
        match component.properties.get_mut(key) {
            Some(Property::Value(slot)) => *slot = value,
            Some(Property::Attr(a)) => a.set(&mut self.dom, el, &value)?,
            Some(Property::Target(_) | Property::Targets(_)) => {
                return Err(Error::ReadOnlyProperty {
                    element: el,
                    key: key.to_owned(),
                });
            }
            None => {
                component
                    .properties
                    .insert(key.to_owned(), Property::Value(value));
            }
        }
        Ok(())
    }

    /// Replace the slot of property `key` on component `el`.
    ///
    /// Property initializers use this to swap a plain value for a wrapper.
    pub fn install_property(&mut self, el: NodeId, key: &str, property: Property) -> Result<()> {
        let component = self
            .components
            .get_mut(&el)
            .ok_or(Error::UnknownElement(el))?;
        tracing::trace!(?el, key, ?property, "property installed");
        component.properties.insert(key.to_owned(), property);
        Ok(())
    }

    /// The slot of property `key` on component `el`.
    pub fn property_slot(&self, el: NodeId, key: &str) -> Option<&Property> {
        self.components.get(&el)?.properties.get(key)
    }

    // --- events ---

    /// Register a listener callable from [`Runtime::dispatch_event`].
    pub fn register_listener(&mut self, f: impl Fn(&mut Self, &Event) + 'static) -> ListenerId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ListenerId uses 32-bit indices by design."
        )]
        let id = ListenerId(self.listeners.len() as u32);
        self.listeners.push(Rc::new(f));
        id
    }

    /// Listen on `node` for `event_type`. Returns `false` if already listening.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> Result<bool> {
        Ok(self.dom.add_event_listener(node, event_type, listener)?)
    }

    /// The listener shared by every action binding.
    pub fn action_listener(&self) -> ListenerId {
        self.action_listener
    }

    /// Dispatch `event` at `target`.
    ///
    /// Listeners run on the target and then, if the event bubbles, on each
    /// ancestor. Composed events continue from shadow roots to their hosts.
    /// Returns false if a listener called [`Event::prevent_default`].
    pub fn dispatch_event(&mut self, target: NodeId, event: Event) -> Result<bool> {
        if !self.dom.is_alive(target) {
            return Err(DomError::Stale(target).into());
        }
        event.set_target(target);
        let parents = if event.composed() {
            DomParents::composed(&self.dom)
        } else {
            DomParents::new(&self.dom)
        };
        let route = Router::with_parent(parents).route(target);
        tracing::trace!(?target, event_type = event.event_type(), steps = route.len(), "dispatch");

        for step in route {
            let run = match step.phase {
                Phase::Capture => false,
                Phase::Target => true,
                Phase::Bubble => event.bubbles() && step.node != target,
            };
            if !run {
                continue;
            }
            event.set_current_target(Some(step.node));
            for id in self.dom.event_listeners(step.node, event.event_type()) {
                let Some(listener) = self.listeners.get(id.0 as usize).cloned() else {
                    continue;
                };
                listener(self, &event);
            }
            match event.outcome() {
                Outcome::Continue => {}
                Outcome::Stop | Outcome::StopAndConsume => break,
            }
        }
        event.set_current_target(None);
        Ok(!event.default_prevented())
    }

    /// Returns true if component `el` exposes a callable method `name`.
    pub fn has_method(&self, el: NodeId, name: &str) -> bool {
        self.components
            .get(&el)
            .and_then(|c| c.controller.as_ref())
            .is_some_and(|c| c.has_method(name))
    }

    /// Call method `name` on component `el`. Returns whether it was called.
    pub fn invoke(&mut self, el: NodeId, name: &str, event: &Event) -> bool {
        if !self.has_method(el, name) {
            return false;
        }
        let Some(mut controller) = self.take_controller(el) else {
            return false;
        };
        tracing::trace!(?el, method = name, event_type = event.event_type(), "invoke");
        controller.call(name, self, el, event);
        self.restore_controller(el, controller);
        true
    }

    fn take_controller(&mut self, el: NodeId) -> Option<Box<dyn Controller>> {
        let controller = self.components.get_mut(&el)?.controller.take();
        if controller.is_none() {
            tracing::warn!(?el, "controller re-entered while running");
        }
        controller
    }

    fn restore_controller(&mut self, el: NodeId, controller: Box<dyn Controller>) {
        if let Some(component) = self.components.get_mut(&el) {
            component.controller = Some(controller);
        }
    }
}
