// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mutation records and the per-observer queues that hold them.
//!
//! ## Overview
//!
//! Observers are registered on a root node with [`Dom::observe`](crate::Dom::observe).
//! Every attribute or child-list change made through [`Dom`](crate::Dom) is appended,
//! in mutation order, to the queue of each observer whose root covers the target.
//! Nothing is delivered automatically: the embedding runtime drains queues with
//! [`Dom::take_records`](crate::Dom::take_records) at its own checkpoint.

use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{MutationKinds, NodeId, ObserveOptions};

/// A single recorded change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationRecord {
    /// An attribute was set, changed, or removed.
    Attributes {
        /// Element whose attribute changed.
        target: NodeId,
        /// Attribute name.
        name: String,
        /// Value before the change (`None` if it was absent).
        old_value: Option<String>,
    },
    /// Children were added to or removed from `target`.
    ChildList {
        /// Parent whose child list changed.
        target: NodeId,
        /// Nodes inserted, in order.
        added: Vec<NodeId>,
        /// Nodes removed, in order.
        removed: Vec<NodeId>,
    },
}

impl MutationRecord {
    /// The node the change happened on.
    pub fn target(&self) -> NodeId {
        match self {
            Self::Attributes { target, .. } | Self::ChildList { target, .. } => *target,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Observer {
    pub(crate) root: NodeId,
    pub(crate) options: ObserveOptions,
    pub(crate) queue: Vec<MutationRecord>,
}

impl Observer {
    pub(crate) fn new(root: NodeId, options: ObserveOptions) -> Self {
        Self {
            root,
            options,
            queue: Vec::new(),
        }
    }

    /// Whether a change on `target` is in scope; `in_subtree` is true when the
    /// root is an ancestor of `target`.
    pub(crate) fn covers(&self, target: NodeId, in_subtree: bool) -> bool {
        target == self.root || (in_subtree && self.options.kinds.contains(MutationKinds::SUBTREE))
    }
}
