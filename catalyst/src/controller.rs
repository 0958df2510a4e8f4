// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controllers: the behavior behind a component element.

use std::collections::BTreeMap;
use std::fmt;

use catalyst_dom::NodeId;

use crate::event::Event;
use crate::runtime::Runtime;

/// Behavior attached to a component element.
///
/// Action bindings call methods by name, so a controller exposes a name-based
/// method table rather than Rust methods.
pub trait Controller {
    /// Returns true if `name` is a callable method.
    fn has_method(&self, name: &str) -> bool;

    /// Call method `name` for `this` with `event`.
    fn call(&mut self, name: &str, runtime: &mut Runtime, this: NodeId, event: &Event);

    /// Runs once during initialization, after properties and attributes are wired.
    fn connected(&mut self, runtime: &mut Runtime, this: NodeId) {
        let _ = (runtime, this);
    }
}

type Method = Box<dyn FnMut(&mut Runtime, NodeId, &Event)>;
type ConnectHook = Box<dyn FnMut(&mut Runtime, NodeId)>;

/// A [`Controller`] assembled from closures.
///
/// ```
/// use catalyst::{Controller, Methods};
///
/// let controller = Methods::new().method("greet", |_, _, _| {});
/// assert!(controller.has_method("greet"));
/// assert!(!controller.has_method("wave"));
/// ```
#[derive(Default)]
pub struct Methods {
    methods: BTreeMap<String, Method>,
    on_connect: Option<ConnectHook>,
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Methods")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("on_connect", &self.on_connect.is_some())
            .finish()
    }
}

impl Methods {
    /// No methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add method `name`.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl FnMut(&mut Runtime, NodeId, &Event) + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Box::new(f));
        self
    }

    /// Run `f` when connected.
    #[must_use]
    pub fn on_connect(mut self, f: impl FnMut(&mut Runtime, NodeId) + 'static) -> Self {
        self.on_connect = Some(Box::new(f));
        self
    }
}

impl Controller for Methods {
    fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    fn call(&mut self, name: &str, runtime: &mut Runtime, this: NodeId, event: &Event) {
        if let Some(m) = self.methods.get_mut(name) {
            m(runtime, this, event);
        }
    }

    fn connected(&mut self, runtime: &mut Runtime, this: NodeId) {
        if let Some(hook) = self.on_connect.as_mut() {
            hook(runtime, this);
        }
    }
}
