// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, queries, observers.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::DomError;
use crate::mutation::{MutationRecord, Observer};
use crate::selector::Selector;
use crate::types::{
    ListenerId, MutationKinds, NodeId, NodeKind, ObserveOptions, ObserverId, ShadowRootMode,
};

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena holding every document, element, shadow root and fragment.
pub struct Dom {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    observers: Vec<Option<Observer>>,
}

impl core::fmt::Debug for Dom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let observers = self.observers.iter().filter(|o| o.is_some()).count();
        f.debug_struct("Dom")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("observers", &observers)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    kind: NodeKind,
    owner: Option<NodeId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    shadow: Option<NodeId>,
    content: Option<NodeId>,
    listeners: Vec<(String, ListenerId)>,
}

impl Node {
    fn new(generation: u32, kind: NodeKind, owner: Option<NodeId>) -> Self {
        Self {
            generation,
            kind,
            owner,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            shadow: None,
            content: None,
            listeners: Vec::new(),
        }
    }
}

impl Dom {
    /// Create an empty document arena.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            observers: Vec::new(),
        }
    }

    fn alloc(&mut self, kind: NodeKind, owner: Option<NodeId>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind, owner));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, kind, owner)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Create a new, empty document.
    pub fn create_document(&mut self) -> NodeId {
        self.alloc(NodeKind::Document, None)
    }

    /// Create a detached element owned by the document of `context`.
    ///
    /// Tag names are lower-cased. A `template` element gets a content fragment,
    /// reachable with [`Dom::template_content`].
    pub fn create_element(&mut self, context: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let owner = self.document_of(context)?;
        let tag = tag.to_ascii_lowercase();
        let is_template = tag == "template";
        let id = self.alloc(NodeKind::Element { tag }, Some(owner));
        if is_template {
            let content = self.alloc(NodeKind::Fragment, Some(owner));
            self.node_mut(id).content = Some(content);
        }
        Ok(id)
    }

    /// Create a detached, empty fragment owned by the document of `context`.
    pub fn create_fragment(&mut self, context: NodeId) -> Result<NodeId, DomError> {
        let owner = self.document_of(context)?;
        Ok(self.alloc(NodeKind::Fragment, Some(owner)))
    }

    fn document_of(&self, context: NodeId) -> Result<NodeId, DomError> {
        let node = self.try_node(context)?;
        Ok(match node.kind {
            NodeKind::Document => context,
            _ => node.owner.ok_or(DomError::Stale(context))?,
        })
    }

    // --- liveness and inspection ---

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// What kind of node `id` is, if it is live.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node_opt(id).map(|n| &n.kind)
    }

    /// Tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.kind(id).and_then(NodeKind::tag)
    }

    /// Returns true if `id` is a live element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag_name(id).is_some()
    }

    /// Parent in the light tree. Shadow roots and documents have none.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Parent element, if the parent is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.is_element(*p))
    }

    /// Children in order. Empty for stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[][..], |n| n.children.as_slice())
    }

    /// The document that owns `id`; `None` for documents themselves and stale handles.
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.owner)
    }

    /// Topmost inclusive ancestor: a document, a shadow root, a fragment, or a detached node.
    pub fn root_node(&self, mut id: NodeId) -> NodeId {
        while let Some(p) = self.parent(id) {
            id = p;
        }
        id
    }

    /// Returns true if `id` is in a document, directly or through shadow hosts.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            let root = self.root_node(cur);
            match self.kind(root) {
                Some(NodeKind::Document) => return true,
                Some(NodeKind::ShadowRoot { host, .. }) => cur = *host,
                _ => return false,
            }
        }
    }

    /// Returns true if `ancestor` is `node` or one of its light-tree ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Like [`Dom::is_inclusive_ancestor`], but a shadow root's parent is its host.
    pub fn is_host_including_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = match self.parent(n) {
                Some(p) => Some(p),
                None => self.host(n),
            };
        }
        false
    }

    // --- structure ---

    /// Append `child` to `parent`, moving it from any previous parent.
    ///
    /// Appending a fragment moves the fragment's children instead, leaving it empty.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.try_node(parent)?;
        match self.try_node(child)?.kind {
            NodeKind::Document | NodeKind::ShadowRoot { .. } => {
                return Err(DomError::Hierarchy { parent, child });
            }
            NodeKind::Fragment => {
                let moved = self.node(child).children.clone();
                if moved.is_empty() {
                    return Ok(());
                }
                if self.is_host_including_inclusive_ancestor(child, parent) {
                    return Err(DomError::Hierarchy { parent, child });
                }
                self.node_mut(child).children.clear();
                for &c in &moved {
                    self.node_mut(c).parent = Some(parent);
                }
                self.record(MutationRecord::ChildList {
                    target: child,
                    added: Vec::new(),
                    removed: moved.clone(),
                });
                self.node_mut(parent).children.extend_from_slice(&moved);
                self.record(MutationRecord::ChildList {
                    target: parent,
                    added: moved,
                    removed: Vec::new(),
                });
                return Ok(());
            }
            NodeKind::Element { .. } => {}
        }
        if self.is_host_including_inclusive_ancestor(child, parent) {
            return Err(DomError::Hierarchy { parent, child });
        }
        if let Some(old) = self.node(child).parent {
            self.unlink(old, child);
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        self.record(MutationRecord::ChildList {
            target: parent,
            added: alloc::vec![child],
            removed: Vec::new(),
        });
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays alive and can be re-inserted.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.try_node(parent)?;
        if self.try_node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.unlink(parent, child);
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != child);
        self.node_mut(child).parent = None;
        self.record(MutationRecord::ChildList {
            target: parent,
            added: Vec::new(),
            removed: alloc::vec![child],
        });
    }

    /// Free `id` and everything it owns (children, shadow root, template content).
    ///
    /// The node is detached first if it has a parent. Stale handles are ignored.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink(parent, id);
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: NodeId) {
        let (children, shadow, content) = {
            let n = self.node(id);
            (n.children.clone(), n.shadow, n.content)
        };
        for c in children.into_iter().chain(shadow).chain(content) {
            self.free_subtree(c);
        }
        for slot in self.observers.iter_mut() {
            if slot.as_ref().is_some_and(|o| o.root == id) {
                *slot = None;
            }
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Copy a node. With `deep`, children and template contents are copied too.
    ///
    /// Listeners, shadow roots and observers are never copied.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Result<NodeId, DomError> {
        let (kind, owner, attributes, children, content) = {
            let n = self.try_node(id)?;
            if matches!(n.kind, NodeKind::Document | NodeKind::ShadowRoot { .. }) {
                return Err(DomError::NotAnElement(id));
            }
            (
                n.kind.clone(),
                n.owner,
                n.attributes.clone(),
                n.children.clone(),
                n.content,
            )
        };
        let copy = self.alloc(kind, owner);
        self.node_mut(copy).attributes = attributes;
        if let Some(content) = content {
            let content_copy = if deep {
                self.clone_node(content, true)?
            } else {
                self.alloc(NodeKind::Fragment, owner)
            };
            self.node_mut(copy).content = Some(content_copy);
        }
        if deep {
            for c in children {
                let c = self.clone_node(c, true)?;
                self.node_mut(copy).children.push(c);
                self.node_mut(c).parent = Some(copy);
            }
        }
        Ok(copy)
    }

    // --- shadow roots and templates ---

    /// Attach a shadow root to `host`.
    pub fn attach_shadow(
        &mut self,
        host: NodeId,
        mode: ShadowRootMode,
    ) -> Result<NodeId, DomError> {
        let n = self.try_node(host)?;
        if n.kind.tag().is_none() {
            return Err(DomError::NotAnElement(host));
        }
        if n.shadow.is_some() {
            return Err(DomError::ShadowAlreadyAttached(host));
        }
        let owner = n.owner;
        let root = self.alloc(NodeKind::ShadowRoot { host, mode }, owner);
        self.node_mut(host).shadow = Some(root);
        Ok(root)
    }

    /// The host's shadow root, if one is attached in [`ShadowRootMode::Open`].
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = self.node_opt(host)?.shadow?;
        match self.kind(root) {
            Some(NodeKind::ShadowRoot {
                mode: ShadowRootMode::Open,
                ..
            }) => Some(root),
            _ => None,
        }
    }

    /// The host of a shadow root.
    pub fn host(&self, shadow_root: NodeId) -> Option<NodeId> {
        match self.kind(shadow_root) {
            Some(NodeKind::ShadowRoot { host, .. }) => Some(*host),
            _ => None,
        }
    }

    /// The content fragment of a `template` element.
    pub fn template_content(&self, template: NodeId) -> Option<NodeId> {
        self.node_opt(template).and_then(|n| n.content)
    }

    // --- attributes ---

    /// Value of an attribute, or `None` if absent.
    pub fn get_attribute(&self, el: NodeId, name: &str) -> Option<&str> {
        let n = self.node_opt(el)?;
        n.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the attribute is present.
    pub fn has_attribute(&self, el: NodeId, name: &str) -> bool {
        self.get_attribute(el, name).is_some()
    }

    /// Attributes in insertion order.
    pub fn attributes(&self, el: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.node_opt(el)
            .into_iter()
            .flat_map(|n| n.attributes.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute; names are lower-cased.
    pub fn set_attribute(&mut self, el: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let n = self.try_element_mut(el)?;
        let name = name.to_ascii_lowercase();
        let old_value = match n.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => Some(core::mem::replace(v, value.to_string())),
            None => {
                n.attributes.push((name.clone(), value.to_string()));
                None
            }
        };
        self.record(MutationRecord::Attributes {
            target: el,
            name,
            old_value,
        });
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, el: NodeId, name: &str) -> Result<bool, DomError> {
        let n = self.try_element_mut(el)?;
        let name = name.to_ascii_lowercase();
        let Some(pos) = n.attributes.iter().position(|(k, _)| *k == name) else {
            return Ok(false);
        };
        let (_, old) = n.attributes.remove(pos);
        self.record(MutationRecord::Attributes {
            target: el,
            name,
            old_value: Some(old),
        });
        Ok(true)
    }

    /// Toggle a boolean attribute. With `force`, set presence explicitly.
    ///
    /// Returns whether the attribute is present afterwards. Forcing an already
    /// present attribute leaves it untouched and records nothing.
    pub fn toggle_attribute(
        &mut self,
        el: NodeId,
        name: &str,
        force: Option<bool>,
    ) -> Result<bool, DomError> {
        let present = self.try_element_mut(el)?;
        let present = present
            .attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name));
        let want = force.unwrap_or(!present);
        match (present, want) {
            (false, true) => self.set_attribute(el, name, "")?,
            (true, false) => {
                self.remove_attribute(el, name)?;
            }
            _ => {}
        }
        Ok(want)
    }

    // --- selectors ---

    /// Returns true if `el` is an element matched by `selector`.
    pub fn matches(&self, el: NodeId, selector: &Selector) -> bool {
        let Some(n) = self.node_opt(el) else {
            return false;
        };
        let Some(tag) = n.kind.tag() else {
            return false;
        };
        selector.matches_with(tag, |name| {
            n.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        })
    }

    /// Nearest inclusive ancestor element matched by `selector`.
    ///
    /// Does not leave the node's tree: the search stops at a shadow root.
    pub fn closest(&self, el: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cur = Some(el);
        while let Some(n) = cur {
            if !self.is_element(n) {
                return None;
            }
            if self.matches(n, selector) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    /// Descendant elements of `root` matched by `selector`, in tree order.
    ///
    /// `root` itself is not tested. Shadow trees and template contents are not entered.
    pub fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        if selector.is_empty() {
            return out;
        }
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if self.matches(n, selector) {
                out.push(n);
            }
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// First descendant element of `root` matched by `selector`.
    pub fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_selector_all(root, selector).into_iter().next()
    }

    // --- listeners ---

    /// Register `listener` for `event_type` on `node`.
    ///
    /// Returns `false` if the same pair was already registered; it is not added twice.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> Result<bool, DomError> {
        let n = self.try_node_mut(node)?;
        if n
            .listeners
            .iter()
            .any(|(t, l)| t == event_type && *l == listener)
        {
            return Ok(false);
        }
        n.listeners.push((event_type.to_string(), listener));
        Ok(true)
    }

    /// Unregister a listener. Returns whether it was registered.
    pub fn remove_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> Result<bool, DomError> {
        let n = self.try_node_mut(node)?;
        let before = n.listeners.len();
        n.listeners
            .retain(|(t, l)| !(t == event_type && *l == listener));
        Ok(n.listeners.len() != before)
    }

    /// Listeners registered on `node` for `event_type`, in registration order.
    pub fn event_listeners(&self, node: NodeId, event_type: &str) -> Vec<ListenerId> {
        self.node_opt(node)
            .map(|n| {
                n.listeners
                    .iter()
                    .filter(|(t, _)| t == event_type)
                    .map(|(_, l)| *l)
                    .collect()
            })
            .unwrap_or_default()
    }

    // --- observers ---

    /// Start recording mutations under `root`.
    pub fn observe(
        &mut self,
        root: NodeId,
        options: ObserveOptions,
    ) -> Result<ObserverId, DomError> {
        self.try_node(root)?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ObserverId uses 32-bit indices by design."
        )]
        let id = ObserverId(self.observers.len() as u32);
        self.observers.push(Some(Observer::new(root, options)));
        Ok(id)
    }

    /// Stop recording and drop any queued records. Returns whether it was active.
    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        self.observers
            .get_mut(observer.0 as usize)
            .and_then(Option::take)
            .is_some()
    }

    /// Returns true if `observer` is still recording.
    pub fn is_observing(&self, observer: ObserverId) -> bool {
        self.observers
            .get(observer.0 as usize)
            .is_some_and(Option::is_some)
    }

    /// Drain the records queued for `observer`, in mutation order.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(observer.0 as usize)
            .and_then(Option::as_mut)
            .map(|o| core::mem::take(&mut o.queue))
            .unwrap_or_default()
    }

    /// Returns true if any observer has queued records.
    pub fn has_pending_records(&self) -> bool {
        self.observers
            .iter()
            .flatten()
            .any(|o| !o.queue.is_empty())
    }

    fn record(&mut self, record: MutationRecord) {
        let target = record.target();
        let mut interested = Vec::new();
        for (i, slot) in self.observers.iter().enumerate() {
            let Some(o) = slot else { continue };
            let wanted = match &record {
                MutationRecord::Attributes { name, .. } => o.options.wants_attribute(name),
                MutationRecord::ChildList { .. } => {
                    o.options.kinds.contains(MutationKinds::CHILD_LIST)
                }
            };
            if wanted && o.covers(target, self.is_inclusive_ancestor(o.root, target)) {
                interested.push(i);
            }
        }
        for i in interested {
            if let Some(o) = self.observers[i].as_mut() {
                o.queue.push(record.clone());
            }
        }
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn try_node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.node_opt(id).ok_or(DomError::Stale(id))
    }

    fn try_node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        let n = self
            .nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .ok_or(DomError::Stale(id))?;
        if n.generation != id.1 {
            return Err(DomError::Stale(id));
        }
        Ok(n)
    }

    fn try_element_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        let n = self.try_node_mut(id)?;
        if n.kind.tag().is_none() {
            return Err(DomError::NotAnElement(id));
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn doc_with_body(dom: &mut Dom) -> (NodeId, NodeId) {
        let doc = dom.create_document();
        let body = dom.create_element(doc, "BODY").unwrap();
        dom.append_child(doc, body).unwrap();
        (doc, body)
    }

    #[test]
    fn slots_are_reused_with_new_generation() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let a = dom.create_element(doc, "div").unwrap();
        dom.destroy(a);
        assert!(!dom.is_alive(a));
        let b = dom.create_element(doc, "div").unwrap();
        assert_eq!(a.0, b.0, "slot should be reused");
        assert_ne!(a, b, "generation must differ");
        assert_eq!(dom.set_attribute(a, "x", "1"), Err(DomError::Stale(a)));
    }

    #[test]
    fn tags_and_attribute_names_are_lower_cased() {
        let mut dom = Dom::new();
        let (_, body) = doc_with_body(&mut dom);
        assert_eq!(dom.tag_name(body), Some("body"));
        dom.set_attribute(body, "Data-Foo", "1").unwrap();
        assert_eq!(dom.get_attribute(body, "data-foo"), Some("1"));
        assert_eq!(dom.get_attribute(body, "DATA-FOO"), Some("1"));
    }

    #[test]
    fn append_rejects_cycles_and_roots() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let div = dom.create_element(doc, "div").unwrap();
        dom.append_child(body, div).unwrap();
        assert!(matches!(
            dom.append_child(div, body),
            Err(DomError::Hierarchy { .. })
        ));
        assert!(matches!(
            dom.append_child(div, div),
            Err(DomError::Hierarchy { .. })
        ));
        let other = dom.create_document();
        assert!(matches!(
            dom.append_child(div, other),
            Err(DomError::Hierarchy { .. })
        ));
    }

    #[test]
    fn append_rejects_cycles_through_shadow_hosts() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let host = dom.create_element(doc, "x-host").unwrap();
        dom.append_child(body, host).unwrap();
        let shadow = dom.attach_shadow(host, ShadowRootMode::Closed).unwrap();
        let inner = dom.create_element(doc, "div").unwrap();
        dom.append_child(shadow, inner).unwrap();

        assert!(dom.is_host_including_inclusive_ancestor(host, inner));
        assert!(!dom.is_inclusive_ancestor(host, inner));
        assert!(matches!(
            dom.append_child(inner, host),
            Err(DomError::Hierarchy { .. })
        ));
        assert!(matches!(
            dom.append_child(inner, body),
            Err(DomError::Hierarchy { .. })
        ));

        assert!(dom.is_connected(inner));

        let frag = dom.create_fragment(doc).unwrap();
        dom.append_child(frag, body).unwrap();
        assert!(matches!(
            dom.append_child(inner, frag),
            Err(DomError::Hierarchy { .. })
        ));
        assert_eq!(dom.parent(host), Some(body));
        assert!(!dom.is_connected(inner));
    }

    #[test]
    fn reparenting_moves_node() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let a = dom.create_element(doc, "a").unwrap();
        let b = dom.create_element(doc, "b").unwrap();
        dom.append_child(body, a).unwrap();
        dom.append_child(body, b).unwrap();
        dom.append_child(a, b).unwrap();
        assert_eq!(dom.children(body), &[a]);
        assert_eq!(dom.children(a), &[b]);
        assert_eq!(dom.root_node(b), doc);
    }

    #[test]
    fn toggle_attribute_semantics() {
        let mut dom = Dom::new();
        let (_, body) = doc_with_body(&mut dom);
        assert!(dom.toggle_attribute(body, "hidden", None).unwrap());
        assert_eq!(dom.get_attribute(body, "hidden"), Some(""));
        assert!(dom.toggle_attribute(body, "hidden", Some(true)).unwrap());
        assert!(!dom.toggle_attribute(body, "hidden", None).unwrap());
        assert!(!dom.has_attribute(body, "hidden"));
        assert!(!dom.toggle_attribute(body, "hidden", Some(false)).unwrap());
    }

    #[test]
    fn closest_is_inclusive_and_stays_in_tree() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let host = dom.create_element(doc, "x-foo").unwrap();
        dom.append_child(body, host).unwrap();
        let shadow = dom.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inner = dom.create_element(doc, "button").unwrap();
        dom.append_child(shadow, inner).unwrap();

        let sel = Selector::tag("x-foo");
        assert_eq!(dom.closest(host, &sel), Some(host));
        assert_eq!(dom.closest(inner, &sel), None);
        assert_eq!(dom.root_node(inner), shadow);
        assert_eq!(dom.host(shadow), Some(host));
        assert!(dom.is_connected(inner));
    }

    #[test]
    fn closed_shadow_is_hidden() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let host = dom.create_element(doc, "x-foo").unwrap();
        dom.append_child(body, host).unwrap();
        dom.attach_shadow(host, ShadowRootMode::Closed).unwrap();
        assert_eq!(dom.shadow_root(host), None);
        assert_eq!(
            dom.attach_shadow(host, ShadowRootMode::Open),
            Err(DomError::ShadowAlreadyAttached(host))
        );
    }

    #[test]
    fn query_selector_all_in_tree_order_skips_shadow_and_templates() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let a = dom.create_element(doc, "div").unwrap();
        let b = dom.create_element(doc, "div").unwrap();
        let c = dom.create_element(doc, "div").unwrap();
        dom.append_child(body, a).unwrap();
        dom.append_child(a, b).unwrap();
        dom.append_child(body, c).unwrap();
        for n in [a, b, c] {
            dom.set_attribute(n, "data-action", "").unwrap();
        }
        let shadow = dom.attach_shadow(c, ShadowRootMode::Open).unwrap();
        let hidden = dom.create_element(doc, "span").unwrap();
        dom.set_attribute(hidden, "data-action", "").unwrap();
        dom.append_child(shadow, hidden).unwrap();
        let template = dom.create_element(doc, "template").unwrap();
        dom.append_child(body, template).unwrap();
        let content = dom.template_content(template).unwrap();
        let inert = dom.create_element(doc, "span").unwrap();
        dom.set_attribute(inert, "data-action", "").unwrap();
        dom.append_child(content, inert).unwrap();

        let sel = Selector::any_attribute(["data-action"]);
        assert_eq!(dom.query_selector_all(doc, &sel), vec![a, b, c]);
        assert_eq!(dom.query_selector_all(shadow, &sel), vec![hidden]);
    }

    #[test]
    fn appending_fragment_moves_children() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let template = dom.create_element(doc, "template").unwrap();
        let content = dom.template_content(template).unwrap();
        let p = dom.create_element(doc, "p").unwrap();
        dom.append_child(content, p).unwrap();
        let copy = dom.clone_node(content, true).unwrap();
        dom.append_child(body, copy).unwrap();
        assert_eq!(dom.children(copy), &[] as &[NodeId]);
        assert_eq!(dom.children(body).len(), 1);
        assert_ne!(dom.children(body)[0], p, "must be a copy");
        assert_eq!(dom.children(content), &[p], "original content untouched");
    }

    #[test]
    fn listeners_are_deduplicated() {
        let mut dom = Dom::new();
        let (_, body) = doc_with_body(&mut dom);
        assert!(dom.add_event_listener(body, "click", ListenerId(1)).unwrap());
        assert!(!dom.add_event_listener(body, "click", ListenerId(1)).unwrap());
        assert!(dom.add_event_listener(body, "keyup", ListenerId(1)).unwrap());
        assert_eq!(dom.event_listeners(body, "click"), vec![ListenerId(1)]);
        assert!(dom.remove_event_listener(body, "click", ListenerId(1)).unwrap());
        assert!(dom.event_listeners(body, "click").is_empty());
    }

    #[test]
    fn observer_records_filtered_attributes_and_subtree_child_lists() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let obs = dom
            .observe(
                doc,
                ObserveOptions {
                    kinds: MutationKinds::default(),
                    attribute_filter: Some(vec!["data-action".into()]),
                },
            )
            .unwrap();
        let div = dom.create_element(doc, "div").unwrap();
        dom.set_attribute(div, "data-action", "detached").unwrap();
        dom.append_child(body, div).unwrap();
        dom.set_attribute(div, "title", "ignored").unwrap();
        dom.set_attribute(div, "data-action", "click:x#y").unwrap();

        let records = dom.take_records(obs);
        assert_eq!(
            records,
            vec![
                MutationRecord::ChildList {
                    target: body,
                    added: vec![div],
                    removed: vec![],
                },
                MutationRecord::Attributes {
                    target: div,
                    name: "data-action".into(),
                    old_value: Some("detached".into()),
                },
            ]
        );
        assert!(!dom.has_pending_records());
        assert!(dom.disconnect(obs));
        assert!(!dom.disconnect(obs));
        dom.set_attribute(div, "data-action", "").unwrap();
        assert!(dom.take_records(obs).is_empty());
    }

    #[test]
    fn document_observer_does_not_see_shadow_mutations() {
        let mut dom = Dom::new();
        let (doc, body) = doc_with_body(&mut dom);
        let obs = dom.observe(doc, ObserveOptions::default()).unwrap();
        let host = dom.create_element(doc, "x-foo").unwrap();
        dom.append_child(body, host).unwrap();
        let _ = dom.take_records(obs);
        let shadow = dom.attach_shadow(host, ShadowRootMode::Open).unwrap();
        let inner = dom.create_element(doc, "span").unwrap();
        dom.append_child(shadow, inner).unwrap();
        assert!(dom.take_records(obs).is_empty());
    }

    #[test]
    fn destroying_root_drops_its_observers() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let obs = dom.observe(doc, ObserveOptions::default()).unwrap();
        assert!(dom.is_observing(obs));
        dom.destroy(doc);
        assert!(!dom.is_observing(obs));
    }
}
