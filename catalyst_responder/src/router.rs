// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Reconstructs the root→target path through a [`ParentLookup`] and emits a
//! capture → target → bubble sequence for it.
//!
//! ## Scope
//!
//! [`Router::set_scope`] filters which nodes appear in the emitted sequence. The
//! target is always kept so a dispatch never loses its destination.

use alloc::vec::Vec;

use crate::types::{Dispatch, NoParent, ParentLookup, Phase};

/// Deterministic propagation-path router.
///
/// ## Usage
///
/// - Construct with [`Router::with_parent`] and a [`ParentLookup`] for your tree.
/// - Optionally call [`Router::set_scope`] to drop nodes (for example, nodes with no listeners).
/// - Call [`Router::route`] per event.
pub struct Router<K, P: ParentLookup<K> = NoParent> {
    pub(crate) parent: P,
    pub(crate) scope: Option<fn(&K) -> bool>,
    pub(crate) _phantom: core::marker::PhantomData<fn() -> K>,
}

impl<K, P: ParentLookup<K>> core::fmt::Debug for Router<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("scoped", &self.scope.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> Router<K, P> {
    /// Create a router with a default parent lookup.
    pub fn new() -> Self {
        Self::with_parent(P::default())
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> Default for Router<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K>> Router<K, P> {
    /// Create a router with an explicit parent lookup provider.
    pub fn with_parent(parent: P) -> Self {
        Self {
            parent,
            scope: None,
            _phantom: core::marker::PhantomData,
        }
    }

    /// Set an optional scope filter; only nodes that satisfy the predicate (and the target) are emitted.
    pub fn set_scope(&mut self, scope: Option<fn(&K) -> bool>) {
        self.scope = scope;
    }

    /// The root→target path for `target`, inclusive.
    pub fn path(&self, target: K) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = target;
        // Collect to root; caller ensures acyclic ancestry.
        loop {
            out.push(cur);
            match self.parent.parent_of(&cur) {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Produce the propagation sequence for an event aimed at `target`.
    pub fn route(&self, target: K) -> Vec<Dispatch<K>> {
        let path: Vec<K> = self
            .path(target)
            .into_iter()
            .filter(|n| *n == target || self.scope.is_none_or(|f| f(n)))
            .collect();
        let mut out = Vec::with_capacity(path.len() * 2 + 1);
        // Capture: root→target
        for &node in &path {
            out.push(Dispatch {
                phase: Phase::Capture,
                node,
            });
        }
        out.push(Dispatch {
            phase: Phase::Target,
            node: target,
        });
        // Bubble: target→root
        for &node in path.iter().rev() {
            out.push(Dispatch {
                phase: Phase::Bubble,
                node,
            });
        }
        out
    }
}

/// Extract the root→target path from a dispatch sequence (its capture steps).
pub fn path_from_dispatch<K: Copy>(seq: &[Dispatch<K>]) -> Vec<K> {
    seq.iter()
        .filter(|d| d.phase == Phase::Capture)
        .map(|d| d.node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct Node(u32);

    #[derive(Default)]
    struct Parents;
    impl ParentLookup<Node> for Parents {
        fn parent_of(&self, node: &Node) -> Option<Node> {
            match node.0 {
                3 => Some(Node(2)),
                2 => Some(Node(1)),
                _ => None,
            }
        }
    }

    #[test]
    fn simple_path_dispatch() {
        let router: Router<Node, Parents> = Router::new();
        let out = router.route(Node(3));
        let phases: Vec<(Phase, u32)> = out.iter().map(|d| (d.phase, d.node.0)).collect();
        assert_eq!(
            phases,
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Capture, 3),
                (Phase::Target, 3),
                (Phase::Bubble, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
        assert_eq!(path_from_dispatch(&out), vec![Node(1), Node(2), Node(3)]);
    }

    #[test]
    fn fallback_singleton_path_without_parent() {
        let router: Router<Node> = Router::new();
        let phases: Vec<(Phase, u32)> = router
            .route(Node(9))
            .iter()
            .map(|d| (d.phase, d.node.0))
            .collect();
        assert_eq!(
            phases,
            vec![(Phase::Capture, 9), (Phase::Target, 9), (Phase::Bubble, 9)]
        );
    }

    #[test]
    fn scope_filter_keeps_target() {
        let mut router: Router<Node, Parents> = Router::new();
        router.set_scope(Some(|n: &Node| n.0 == 1));
        let nodes: Vec<u32> = router.route(Node(3)).iter().map(|d| d.node.0).collect();
        assert_eq!(nodes, vec![1, 3, 3, 3, 1]);
    }

    #[test]
    fn closures_are_parent_lookups() {
        let router = Router::with_parent(|n: &u32| (*n > 0).then(|| n - 1));
        assert_eq!(router.path(2), vec![0, 1, 2]);
    }
}
