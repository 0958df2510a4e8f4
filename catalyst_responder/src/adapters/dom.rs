// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent lookup over a [`catalyst_dom::Dom`].
//!
//! ```
//! use catalyst_dom::{Dom, ShadowRootMode};
//! use catalyst_responder::adapters::dom::DomParents;
//! use catalyst_responder::router::Router;
//!
//! let mut dom = Dom::new();
//! let doc = dom.create_document();
//! let host = dom.create_element(doc, "x-foo").unwrap();
//! dom.append_child(doc, host).unwrap();
//! let shadow = dom.attach_shadow(host, ShadowRootMode::Open).unwrap();
//! let button = dom.create_element(doc, "button").unwrap();
//! dom.append_child(shadow, button).unwrap();
//!
//! let composed = Router::with_parent(DomParents::composed(&dom));
//! assert_eq!(composed.path(button), vec![doc, host, shadow, button]);
//!
//! let scoped = Router::with_parent(DomParents::new(&dom));
//! assert_eq!(scoped.path(button), vec![shadow, button]);
//! ```

use catalyst_dom::{Dom, NodeId};

use crate::types::ParentLookup;

/// Light-tree parents, optionally continuing from shadow roots to their hosts.
#[derive(Copy, Clone, Debug)]
pub struct DomParents<'a> {
    dom: &'a Dom,
    composed: bool,
}

impl<'a> DomParents<'a> {
    /// Parents within a single tree; shadow roots are roots.
    pub fn new(dom: &'a Dom) -> Self {
        Self {
            dom,
            composed: false,
        }
    }

    /// Parents across shadow boundaries: a shadow root's parent is its host.
    pub fn composed(dom: &'a Dom) -> Self {
        Self {
            dom,
            composed: true,
        }
    }
}

impl ParentLookup<NodeId> for DomParents<'_> {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.dom.parent(*node).or_else(|| {
            if self.composed {
                self.dom.host(*node)
            } else {
                None
            }
        })
    }
}
