// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catalyst: declarative initialization for DOM components.
//!
//! ## Overview
//!
//! Component classes mark selected members; when an instance connects, the
//! runtime wires those members to `data-*` attributes, descendant lookups and
//! delegated events. Markup inserted later is picked up through per-root mutation
//! subscriptions, without any manual re-registration.
//!
//! The pieces, leaves first:
//!
//! - [`MarkRegistry`]: named marks with property, attribute and class hooks.
//! - [`ClassTable`]: class descriptors with ancestry resolved at definition.
//! - Instance initialization: [`Runtime::initialize_instance`].
//! - Mutation observation: [`Runtime::listen_for_new_attributes`] and
//!   [`Runtime::flush`].
//! - Action delegation: `data-action="event:tag#method"` bindings routed through a
//!   single shared listener.
//!
//! Built-in marks (see [`Builtins`]): `attr`, `target`, `targets`, `action` and
//! `shadowroot`.
//!
//! ## Host model
//!
//! The document is a [`catalyst_dom::Dom`] owned by the [`Runtime`]. Mutations are
//! recorded synchronously and delivered at [`Runtime::flush`], which plays the
//! part of a microtask checkpoint. Events are routed with
//! [`catalyst_responder`].
//!
//! ## Minimal usage
//!
//! ```
//! use catalyst::{ClassDescriptor, Event, Methods, PropValue, Runtime};
//!
//! let mut rt = Runtime::default();
//! let marks = rt.builtins();
//! let class = rt
//!     .define_class(ClassDescriptor::new("CounterElement").with_default("count", 0))
//!     .unwrap();
//! rt.mark(marks.attr, class, "count");
//! rt.define_element("counter-element", class, || {
//!     Box::new(Methods::new().method("increment", |rt, this, _| {
//!         let n = rt.property(this, "count").and_then(|v| v.as_number()).unwrap_or(0.0);
//!         rt.set_property(this, "count", PropValue::Number(n + 1.0)).unwrap();
//!     }))
//! })
//! .unwrap();
//!
//! let doc = rt.document();
//! let counter = rt.create_element("counter-element").unwrap();
//! let button = rt.create_element("button").unwrap();
//! rt.dom_mut()
//!     .set_attribute(button, "data-action", "click:counter-element#increment")
//!     .unwrap();
//! rt.append_child(counter, button).unwrap();
//! rt.append_child(doc, counter).unwrap();
//!
//! rt.dispatch_event(button, Event::new("click")).unwrap();
//! assert_eq!(rt.dom().get_attribute(counter, "data-count"), Some("1"));
//! ```

mod action;
mod attr;
mod builtins;
mod class;
mod config;
mod controller;
mod error;
mod event;
mod instance;
mod mark;
mod observer;
mod property;
mod runtime;
mod shadow;
mod target;
mod value;

pub use action::{ACTION_ATTRIBUTE, Binding, bindings};
pub use attr::attribute_name_for;
pub use builtins::Builtins;
pub use class::{ClassDescriptor, ClassId, ClassTable};
pub use config::{AttributeFilter, Config};
pub use controller::{Controller, Methods};
pub use error::{Error, Result};
pub use event::Event;
pub use instance::INITIALIZED_ATTRIBUTE;
pub use mark::{
    ElementAttributeChangedCallback, InitializeClassCallback, InitializePropertyCallback, MarkHandlers,
    MarkId, MarkRegistry, Marker, PropertiesToCall,
};
pub use observer::Subscription;
pub use property::{AttrKind, AttrProperty, Property, TargetProperty, TargetsProperty};
pub use runtime::{ControllerFactory, EventListener, Runtime};
pub use target::{TARGET_ATTRIBUTE, TARGETS_ATTRIBUTE, find_target, find_targets};
pub use value::PropValue;

pub use catalyst_dom;
pub use catalyst_responder::types::Outcome;
