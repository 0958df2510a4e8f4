// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The marks every runtime starts with.

use crate::mark::{MarkHandlers, MarkRegistry, Marker};
use crate::{action, attr, shadow, target};

/// Markers of the built-in marks.
///
/// `action` and `shadowroot` only react to attributes, so applying their markers
/// to properties does nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Builtins {
    /// Mirrors a property onto `data-<key>` (see [`attribute_name_for`](crate::attribute_name_for)).
    pub attr: Marker,
    /// Resolves a property to one `data-target` element.
    pub target: Marker,
    /// Resolves a property to every `data-targets` element.
    pub targets: Marker,
    /// Binds `data-action` events.
    pub action: Marker,
    /// Promotes `data-shadowroot` templates.
    pub shadowroot: Marker,
}

pub(crate) fn install(registry: &mut MarkRegistry) -> Builtins {
    Builtins {
        attr: registry.define_mark(
            "attr",
            MarkHandlers::new()
                .on_property(attr::initialize_attr)
                .on_class(attr::define_observed_attributes),
        ),
        target: registry.define_mark(
            "target",
            MarkHandlers::new().on_property(target::initialize_target),
        ),
        targets: registry.define_mark(
            "targets",
            MarkHandlers::new().on_property(target::initialize_targets),
        ),
        action: registry.define_mark("action", MarkHandlers::new().on_attribute(action::bind)),
        shadowroot: registry.define_mark(
            "shadowroot",
            MarkHandlers::new().on_attribute(shadow::promote),
        ),
    }
}
