// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by the runtime.
//!
//! Only host-level misuse is reported here. Malformed markup (bad action tokens,
//! missing controllers or methods) is logged and skipped instead.

use catalyst_dom::{DomError, NodeId};

use crate::class::ClassId;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failure of a runtime operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A document operation failed.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// The class handle was not produced by this class table.
    #[error("unknown class {0:?}")]
    UnknownClass(ClassId),
    /// The element has no controller attached.
    #[error("element {0:?} is not a component")]
    UnknownElement(NodeId),
    /// A custom element with this tag is already defined.
    #[error("custom element {0:?} is already defined")]
    AlreadyDefined(String),
    /// Custom element names must be lower-case and contain a hyphen.
    #[error("invalid custom element name {0:?}")]
    InvalidElementName(String),
    /// The property has a getter only.
    #[error("property {key:?} on {element:?} is read-only")]
    ReadOnlyProperty {
        /// Element the assignment targeted.
        element: NodeId,
        /// Property key.
        key: String,
    },
}
