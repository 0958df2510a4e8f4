// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by document and selector operations.

use alloc::string::String;

use crate::types::NodeId;

/// Failure of a document operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The handle no longer refers to a live node.
    #[error("stale node handle {0:?}")]
    Stale(NodeId),
    /// The operation requires an element.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    /// The operation would create a cycle or put a root under another node.
    #[error("cannot insert {child:?} under {parent:?}")]
    Hierarchy {
        /// Intended parent.
        parent: NodeId,
        /// Node that was being inserted.
        child: NodeId,
    },
    /// The host already has a shadow root.
    #[error("element {0:?} already has a shadow root")]
    ShadowAlreadyAttached(NodeId),
    /// The node is not a child of the given parent.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Presumed parent.
        parent: NodeId,
        /// Node that was being removed.
        child: NodeId,
    },
}

/// Failure to parse a selector.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one of its comma-separated parts) is empty.
    #[error("empty selector")]
    Empty,
    /// An unexpected character was found.
    #[error("unexpected {found:?} at byte {at} in selector")]
    Unexpected {
        /// Offending character.
        found: char,
        /// Byte offset.
        at: usize,
    },
    /// An attribute condition or quoted value was not closed.
    #[error("unterminated attribute condition in {0:?}")]
    Unterminated(String),
}
