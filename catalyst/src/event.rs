// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events dispatched through [`Runtime::dispatch_event`](crate::Runtime::dispatch_event).

use std::cell::Cell;

use catalyst_dom::NodeId;
use catalyst_responder::types::Outcome;

/// A DOM-style event.
///
/// Targets and propagation flags use interior mutability so listeners can work
/// from a shared reference.
#[derive(Clone, Debug)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    composed: bool,
    detail: Option<String>,
    target: Cell<Option<NodeId>>,
    current_target: Cell<Option<NodeId>>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// A bubbling, composed event of `event_type`, like user input events.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: true,
            composed: true,
            detail: None,
            target: Cell::new(None),
            current_target: Cell::new(None),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Set whether the event bubbles past its target.
    #[must_use]
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Set whether the event escapes shadow trees.
    #[must_use]
    pub fn with_composed(mut self, composed: bool) -> Self {
        self.composed = composed;
        self
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Event type, e.g. `click`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Whether the event bubbles.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Whether the event crosses shadow boundaries.
    pub fn composed(&self) -> bool {
        self.composed
    }

    /// Payload, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The node the event was dispatched to.
    pub fn target(&self) -> Option<NodeId> {
        self.target.get()
    }

    /// The node whose listeners are running.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target.get()
    }

    /// Stop after the listeners of the current node.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Returns true once [`Event::stop_propagation`] was called.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Cancel the default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Returns true once [`Event::prevent_default`] was called.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// How propagation continues after the current node's listeners.
    ///
    /// A stopped event whose default was also prevented is consumed.
    pub fn outcome(&self) -> Outcome {
        match (self.propagation_stopped(), self.default_prevented()) {
            (false, _) => Outcome::Continue,
            (true, false) => Outcome::Stop,
            (true, true) => Outcome::StopAndConsume,
        }
    }

    pub(crate) fn set_target(&self, node: NodeId) {
        self.target.set(Some(node));
    }

    pub(crate) fn set_current_target(&self, node: Option<NodeId>) {
        self.current_target.set(node);
    }
}
