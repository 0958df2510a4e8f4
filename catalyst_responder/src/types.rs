// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the responder: phases, outcomes, lookups, and dispatch steps.

/// Phases of event propagation.
///
/// Appears on each [`Dispatch`] item produced by
/// [`Router::route`](crate::router::Router::route).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Root-to-target traversal.
    Capture,
    /// Target node.
    Target,
    /// Target-to-root traversal.
    Bubble,
}

/// Handler outcome controlling propagation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Stop after the current node.
    Stop,
    /// Stop and mark consumed (for higher-level policies).
    StopAndConsume,
}

/// Look up the parent of a node to build a root→target path.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A no‑op parent provider: every node is its own root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    #[inline]
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}

impl<K, F: Fn(&K) -> Option<K>> ParentLookup<K> for F {
    #[inline]
    fn parent_of(&self, node: &K) -> Option<K> {
        self(node)
    }
}

/// A single dispatch step.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Dispatch<K> {
    /// Propagation phase for this step.
    pub phase: Phase,
    /// Node that sees the event at this step.
    pub node: K,
}
