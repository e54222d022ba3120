//! Document - High-level document API

use crate::{DomError, DomResult, DomTree, NodeId, Selector};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Element holding input focus
    active_element: Option<NodeId>,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.append_element(NodeId::ROOT, "html");
        let head = tree.append_element(html, "head");
        let body = tree.append_element(html, "body");

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            active_element: None,
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was filled in
    pub fn finalize(&mut self) {
        let find = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|&c| tree.tag_name(c) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };
        self.html_element = find(&self.tree, NodeId::ROOT, "html");
        self.head_element = find(&self.tree, self.html_element, "head");
        self.body_element = find(&self.tree, self.html_element, "body");
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.get_element_by_id(id)
    }

    /// Every element carrying `id`
    pub fn elements_by_id(&self, id: &str) -> &[NodeId] {
        self.tree.elements_by_id(id)
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.get_attribute(node, name)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree.set_attribute(node, name, value)
    }

    /// All descendants of `root` matching `selector`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        Ok(Selector::parse(selector)?.query_all(&self.tree, root))
    }

    /// First descendant of `root` matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(Selector::parse(selector)?.query(&self.tree, root))
    }

    /// Closest inclusive ancestor matching `selector`
    pub fn closest(&self, node: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(Selector::parse(selector)?.closest(&self.tree, node))
    }

    /// Element holding input focus
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    /// Move input focus; returns `false` when it was already there
    pub fn focus(&mut self, node: NodeId) -> DomResult<bool> {
        if self.tree.element(node).is_none() {
            return Err(match self.tree.get(node) {
                Some(_) => DomError::NotAnElement(node),
                None => DomError::NotFound(node),
            });
        }
        if self.active_element == Some(node) {
            return Ok(false);
        }
        tracing::trace!("Focus {:?} -> {:?}", self.active_element, node);
        self.active_element = Some(node);
        Ok(true)
    }

    /// Drop input focus
    pub fn blur(&mut self) {
        self.active_element = None;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
