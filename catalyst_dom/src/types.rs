// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document model: node identifiers, kinds, and observer options.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a node in the document arena.
///
/// This is a small, copyable handle that stays stable while the node lives but
/// becomes invalid when the node is destroyed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On [`Dom::destroy`](crate::Dom::destroy), the slot is freed; any existing `NodeId`
///   that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale `NodeId`s never alias a different live node because the generation must match.
/// Use [`Dom::is_alive`](crate::Dom::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Encapsulation mode of a shadow root.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ShadowRootMode {
    /// Reachable from the host via [`Dom::shadow_root`](crate::Dom::shadow_root).
    #[default]
    Open,
    /// Hidden from [`Dom::shadow_root`](crate::Dom::shadow_root); only the attacher holds it.
    Closed,
}

/// What a node is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// A document; the root of a light tree.
    Document,
    /// An element with a lower-case tag name.
    Element {
        /// Lower-case tag name.
        tag: String,
    },
    /// A shadow root attached to `host`.
    ShadowRoot {
        /// The element this shadow root is attached to.
        host: NodeId,
        /// Encapsulation mode.
        mode: ShadowRootMode,
    },
    /// A document fragment, used for template contents.
    Fragment,
}

impl NodeKind {
    /// Returns the tag name if this is an element.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag } => Some(tag),
            _ => None,
        }
    }
}

/// Identifier of an event listener registered with the host.
///
/// The document only stores listener identities; calling them is up to the
/// embedding runtime.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ListenerId(pub u32);

/// Identifier of a registered mutation observer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObserverId(pub(crate) u32);

bitflags::bitflags! {
    /// Which mutations an observer is interested in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MutationKinds: u8 {
        /// Attribute changes on observed nodes.
        const ATTRIBUTES = 0b0000_0001;
        /// Children added to or removed from observed nodes.
        const CHILD_LIST = 0b0000_0010;
        /// Extend observation to every descendant of the root.
        const SUBTREE    = 0b0000_0100;
    }
}

impl Default for MutationKinds {
    fn default() -> Self {
        Self::ATTRIBUTES | Self::CHILD_LIST | Self::SUBTREE
    }
}

/// Options passed to [`Dom::observe`](crate::Dom::observe).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Mutation kinds to record.
    pub kinds: MutationKinds,
    /// When set, only attribute mutations for these names are recorded.
    pub attribute_filter: Option<Vec<String>>,
}

impl ObserveOptions {
    /// Returns true if an attribute mutation for `name` should be recorded.
    pub fn wants_attribute(&self, name: &str) -> bool {
        self.kinds.contains(MutationKinds::ATTRIBUTES)
            && self
                .attribute_filter
                .as_ref()
                .is_none_or(|names| names.iter().any(|n| n == name))
    }
}
