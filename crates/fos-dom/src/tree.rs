//! DOM Tree (arena-based allocation)
//!
//! All nodes live in one `Vec`; node 0 is the document root. The tree also
//! owns the `id` index so every attribute write keeps it current.

use std::collections::HashMap;

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId};

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    /// id attribute -> every element carrying it, in registration order
    ids: HashMap<String, Vec<NodeId>>,
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            ids: HashMap::new(),
        }
    }

    /// Document root
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        if !id.is_valid() {
            return Err(DomError::NotFound(id));
        }
        self.nodes.get_mut(id.index()).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the tree, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text))
    }

    /// Element data, if `id` is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Lowercase tag name
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(NodeId::is_valid)
    }

    /// Direct children in order
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let next = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// All descendants of `root` in document (pre-)order, `root` excluded
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).collect();
        stack.reverse();

        while let Some(id) = stack.pop() {
            out.push(id);
            let start = stack.len();
            stack.extend(self.children(id));
            stack[start..].reverse();
        }
        out
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Inclusive containment check
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference` (append when `None`)
    ///
    /// An attached `child` is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.node(parent)?;
        if matches!(self.node(child)?.data, NodeData::Document) || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotFound(r));
            }
            if r == child {
                return Ok(child);
            }
        }

        self.detach(child)?;
        self.link(parent, child, reference.unwrap_or(NodeId::NONE));
        Ok(child)
    }

    /// Create an element and append it to `parent`
    ///
    /// `parent` must be a node of this tree; the new element is always a
    /// valid child of it.
    pub(crate) fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.link(parent, child, NodeId::NONE);
        child
    }

    /// Splice a detached `child` under `parent` before `next` (NONE appends)
    fn link(&mut self, parent: NodeId, child: NodeId, next: NodeId) {
        let prev = if next.is_valid() {
            self.nodes[next.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        let node = &mut self.nodes[child.index()];
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = next;

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    /// Unlink a node from its parent; the subtree stays in the arena
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.node(id)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.attrs.has(name))
    }

    /// Set an attribute, keeping the id index current
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let old = self.element_mut(id)?.attrs.set(name, value);
        if name == "id" {
            self.reindex_id(id, old.as_deref(), Some(value));
        }
        Ok(())
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let old = self.element_mut(id)?.attrs.remove(name);
        if name == "id" {
            self.reindex_id(id, old.as_deref(), None);
        }
        Ok(old)
    }

    fn reindex_id(&mut self, id: NodeId, old: Option<&str>, new: Option<&str>) {
        if let Some(old) = old.filter(|o| !o.is_empty()) {
            if let Some(holders) = self.ids.get_mut(old) {
                holders.retain(|&h| h != id);
                if holders.is_empty() {
                    self.ids.remove(old);
                }
            }
        }
        if let Some(new) = new.filter(|n| !n.is_empty()) {
            let holders = self.ids.entry(new.to_string()).or_default();
            if !holders.contains(&id) {
                holders.push(id);
            }
            if holders.len() > 1 {
                tracing::debug!("Duplicate id {:?} on {:?}, first owner {:?}", new, id, holders[0]);
            }
        }
    }

    /// O(1) lookup through the id index; the first holder wins on duplicates
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).and_then(|holders| holders.first()).copied()
    }

    /// Every element carrying `id`
    pub fn elements_by_id(&self, id: &str) -> &[NodeId] {
        self.ids.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Add a class token if missing
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let elem = self.element(id).ok_or(DomError::NotAnElement(id))?;
        if class.is_empty() || elem.has_class(class) {
            return Ok(());
        }
        let mut classes: Vec<&str> = elem.classes().collect();
        classes.push(class);
        let value = classes.join(" ");
        self.set_attribute(id, "class", &value)
    }

    /// Remove a class token if present
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        let elem = self.element(id).ok_or(DomError::NotAnElement(id))?;
        if !elem.has_class(class) {
            return Ok(());
        }
        let value = elem
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "class", &value)
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Serialized markup of the node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.serialize(child, &mut out);
        }
        out
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Document => {
                for child in self.children(id) {
                    self.serialize(child, out);
                }
            }
            NodeData::Text(text) => escape_into(text, false, out),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                for attr in elem.attrs.iter() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_into(&attr.value, true, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&elem.tag.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.serialize(child, out);
                }
                out.push_str("</");
                out.push_str(&elem.tag);
                out.push('>');
            }
        }
    }

    /// Deep-copy a node into a new detached subtree
    pub fn clone_node(&mut self, id: NodeId) -> DomResult<NodeId> {
        let mut copy = self.node(id)?.clone();
        if matches!(copy.data, NodeData::Document) {
            return Err(DomError::HierarchyRequest);
        }
        copy.parent = NodeId::NONE;
        copy.first_child = NodeId::NONE;
        copy.last_child = NodeId::NONE;
        copy.prev_sibling = NodeId::NONE;
        copy.next_sibling = NodeId::NONE;

        let copied_id = copy.as_element().and_then(|e| e.id()).map(str::to_string);
        let new_id = self.push(copy);
        if let Some(value) = copied_id {
            self.reindex_id(new_id, None, Some(&value));
        }

        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            let child_copy = self.clone_node(child)?;
            self.append_child(new_id, child_copy)?;
        }
        Ok(new_id)
    }

    /// Deep-copy every child of `src` and append the copies to `dst`
    pub fn clone_children_into(&mut self, src: NodeId, dst: NodeId) -> DomResult<()> {
        let children: Vec<NodeId> = self.children(src).collect();
        for child in children {
            let copy = self.clone_node(child)?;
            self.append_child(dst, copy)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        let node = self.tree.get(current)?;
        self.next = node.next_sibling;
        Some(current)
    }
}
