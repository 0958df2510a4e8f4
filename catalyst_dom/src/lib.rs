// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catalyst DOM: a generational-arena document model for declarative components.
//!
//! ## Overview
//!
//! This crate is the host environment the Catalyst core runs against: documents,
//! elements with ordered attributes, shadow roots, template contents, a small
//! selector language, and mutation observers that queue records for the embedder
//! to drain.
//!
//! It does not run callbacks. Event listeners are stored as [`ListenerId`]s and
//! mutation records are queued per observer; deciding when and how to act on them
//! belongs to the runtime layered on top.
//!
//! ## Handles
//!
//! Every node is addressed by a [`NodeId`]: a slot index plus a generation.
//! Destroying a node frees its slot, and the next node allocated in that slot gets a
//! new generation, so stale handles never alias live nodes.
//!
//! ## Trees and roots
//!
//! - Documents and shadow roots are roots; they cannot be inserted under anything.
//! - A shadow root hangs off its host but is not one of the host's children, so
//!   [`Dom::query_selector_all`] and [`Dom::closest`] never cross into or out of it.
//! - A `template` element owns a content fragment that is likewise outside the tree.
//!   Appending a fragment moves its children.
//!
//! ## Minimal usage
//!
//! ```
//! use catalyst_dom::{Dom, MutationKinds, ObserveOptions, Selector};
//!
//! let mut dom = Dom::new();
//! let doc = dom.create_document();
//! let observer = dom.observe(doc, ObserveOptions::default()).unwrap();
//!
//! let controller = dom.create_element(doc, "x-counter").unwrap();
//! let button = dom.create_element(doc, "button").unwrap();
//! dom.set_attribute(button, "data-action", "click:x-counter#increment").unwrap();
//! dom.append_child(controller, button).unwrap();
//! dom.append_child(doc, controller).unwrap();
//!
//! let actions = Selector::parse("[data-action]").unwrap();
//! assert_eq!(dom.query_selector_all(doc, &actions), vec![button]);
//! assert_eq!(dom.closest(button, &Selector::tag("x-counter")), Some(controller));
//!
//! // Only the insertion into the observed document was recorded.
//! assert_eq!(dom.take_records(observer).len(), 1);
//! # let _ = MutationKinds::SUBTREE;
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod mutation;
mod selector;
mod tree;
mod types;

pub use error::{DomError, SelectorError};
pub use mutation::MutationRecord;
pub use selector::{AttrCondition, AttrMatch, Compound, Selector};
pub use tree::Dom;
pub use types::{
    ListenerId, MutationKinds, NodeId, NodeKind, ObserveOptions, ObserverId, ShadowRootMode,
};
