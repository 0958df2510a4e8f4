// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation observation.
//!
//! ## Overview
//!
//! Each root (a document or a shadow root) gets at most one [`Subscription`]. The
//! subscription owns a DOM observer recording child-list mutations over the whole
//! subtree, plus attribute mutations for a filtered set of names (see
//! [`AttributeFilter`]).
//!
//! [`Runtime::flush`] is the delivery point: attribute records go to every
//! callback registered for that attribute; each added element is rescanned with
//! [`Runtime::call_on_attributes`].
//!
//! ## Release
//!
//! [`Subscription::unsubscribe`] closes the handle at once; the runtime drops the
//! underlying observer the next time it flushes, sweeps or subscribes that root.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use catalyst_dom::{MutationKinds, MutationRecord, NodeId, ObserveOptions, ObserverId};

use crate::action::ACTION_ATTRIBUTE;
use crate::config::AttributeFilter;
use crate::error::Result;
use crate::mark::ElementAttributeChangedCallback;
use crate::runtime::Runtime;

struct Inner {
    root: NodeId,
    observer: ObserverId,
    closed: Cell<bool>,
}

/// Live observation of one root.
///
/// Clones share state; equality is identity.
#[derive(Clone)]
pub struct Subscription {
    inner: Rc<Inner>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("root", &self.inner.root)
            .field("closed", &self.inner.closed.get())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Subscription {}

impl Subscription {
    fn new(root: NodeId, observer: ObserverId) -> Self {
        Self {
            inner: Rc::new(Inner {
                root,
                observer,
                closed: Cell::new(false),
            }),
        }
    }

    /// The observed root.
    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    /// Returns true once unsubscribed.
    pub fn closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Stop delivering mutations for this root. Idempotent.
    pub fn unsubscribe(&self) {
        if !self.inner.closed.replace(true) {
            tracing::debug!(root = ?self.inner.root, "subscription closed");
        }
    }

    pub(crate) fn observer(&self) -> ObserverId {
        self.inner.observer
    }
}

impl Runtime {
    /// The subscription for `root`, creating it on first use.
    ///
    /// Repeated calls return the same subscription until it is closed.
    pub fn listen_for_new_attributes(&mut self, root: NodeId) -> Result<Subscription> {
        if let Some(existing) = self.subscriptions.get(&root) {
            if !existing.closed() {
                return Ok(existing.clone());
            }
            self.release(root);
        }
        let attribute_filter = match self.config.attribute_filter {
            AttributeFilter::ActionOnly => vec![ACTION_ATTRIBUTE.to_owned()],
            AttributeFilter::AllRegistered => {
                self.registry.attribute_names().map(str::to_owned).collect()
            }
        };
        tracing::debug!(?root, ?attribute_filter, "subscribing");
        let observer = self.dom.observe(
            root,
            ObserveOptions {
                kinds: MutationKinds::default(),
                attribute_filter: Some(attribute_filter),
            },
        )?;
        let subscription = Subscription::new(root, observer);
        self.subscriptions.insert(root, subscription.clone());
        Ok(subscription)
    }

    /// The open subscription for `root`, if any.
    pub fn subscription(&self, root: NodeId) -> Option<&Subscription> {
        self.subscriptions.get(&root).filter(|s| !s.closed())
    }

    /// Close and drop the subscription for `root` now. Returns whether one was open.
    pub fn unsubscribe(&mut self, root: NodeId) -> bool {
        let open = self.subscription(root).is_some();
        if let Some(sub) = self.subscriptions.get(&root) {
            sub.unsubscribe();
        }
        self.release(root);
        open
    }

    pub(crate) fn release(&mut self, root: NodeId) {
        if let Some(sub) = self.subscriptions.remove(&root) {
            sub.unsubscribe();
            self.dom.disconnect(sub.observer());
            tracing::debug!(?root, "subscription released");
        }
    }

    /// Deliver queued mutation records until none remain. Returns how many were
    /// delivered.
    ///
    /// Records of one subscription are handled in mutation order. Callbacks may
    /// mutate further; those records are picked up by the next round.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        loop {
            let closed: Vec<NodeId> = self
                .subscriptions
                .iter()
                .filter(|(_, s)| s.closed())
                .map(|(root, _)| *root)
                .collect();
            for root in closed {
                self.release(root);
            }

            let mut batch = Vec::new();
            for sub in self.subscriptions.values() {
                let records = self.dom.take_records(sub.observer());
                if !records.is_empty() {
                    batch.push((sub.clone(), records));
                }
            }
            if batch.is_empty() {
                break;
            }
            for (sub, records) in batch {
                for record in records {
                    if sub.closed() {
                        break;
                    }
                    delivered += 1;
                    self.deliver(record);
                }
            }
        }
        delivered
    }

    fn deliver(&mut self, record: MutationRecord) {
        match record {
            MutationRecord::Attributes { target, name, .. } => {
                if !self.dom.is_alive(target) {
                    return;
                }
                let callbacks = self.attribute_callbacks(&name);
                let value = self.dom.get_attribute(target, &name).map(str::to_owned);
                for callback in callbacks {
                    tracing::trace!(?target, attribute = %name, "attribute callback");
                    callback(self, target, value.as_deref());
                }
            }
            MutationRecord::ChildList { added, .. } => {
                for node in added {
                    if self.dom.is_element(node) {
                        self.call_on_attributes(node);
                    }
                }
            }
        }
    }

    fn attribute_callbacks(&self, attribute: &str) -> Vec<ElementAttributeChangedCallback> {
        self.registry
            .attribute_marks(attribute)
            .iter()
            .filter_map(|m| self.registry.attribute_callback(*m))
            .collect()
    }

    /// Run attribute callbacks for every element under `root` carrying a
    /// registered attribute, then for `root` itself if it carries one.
    ///
    /// The selector is rebuilt from the registry on every call. Returns how many
    /// callbacks ran.
    pub fn call_on_attributes(&mut self, root: NodeId) -> usize {
        let selector = self.registry.attribute_selector();
        let mut elements = self.dom.query_selector_all(root, &selector);
        if self.dom.matches(root, &selector) {
            elements.push(root);
        }
        let entries: Vec<(String, Vec<ElementAttributeChangedCallback>)> = self
            .registry
            .attribute_names()
            .map(|a| (a.to_owned(), self.attribute_callbacks(a)))
            .collect();
        let mut calls = 0;
        for el in elements {
            for (attribute, callbacks) in &entries {
                for callback in callbacks {
                    // Earlier callbacks may have removed the element or attribute.
                    let Some(value) = self.dom.get_attribute(el, attribute).map(str::to_owned)
                    else {
                        break;
                    };
                    tracing::trace!(?el, attribute = %attribute, "attribute callback");
                    callback(self, el, Some(&value));
                    calls += 1;
                }
            }
        }
        calls
    }
}
