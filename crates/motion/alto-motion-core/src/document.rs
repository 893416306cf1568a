//! Host document abstraction and an in-memory implementation.
//!
//! The engine reads markers, configuration attributes and layout through the
//! [`Document`] trait and writes only the attachment mirror attributes back.
//! [`MemoryDocument`] is an arena tree used by tests and by the wasm adapter as
//! its mirror of the live page.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::ids::ElementId;

/// Viewport-relative vertical extent of an element, in px.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }
}

/// What the engine needs from the page.
pub trait Document {
    /// Topmost element; scans without an explicit root start here.
    fn root(&self) -> ElementId;
    /// True when `el` exists and is connected to the document root.
    fn contains(&self, el: ElementId) -> bool;
    /// Descendants of `root` in document order, excluding `root` itself.
    /// Empty when `root` is unknown or detached.
    fn descendants(&self, root: ElementId) -> Vec<ElementId>;
    fn classes(&self, el: ElementId) -> &[String];
    fn attr(&self, el: ElementId, name: &str) -> Option<&str>;
    fn set_attr(&mut self, el: ElementId, name: &str, value: &str);
    fn rect(&self, el: ElementId) -> Option<Rect>;
    fn viewport_height(&self) -> f32;

    fn has_attr(&self, el: ElementId, name: &str) -> bool {
        self.attr(el, name).is_some()
    }
}

/// Serializable element tree used to build or extend a [`MemoryDocument`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    /// Host identity; allocated when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ElementId>,
    pub tag: String,
    pub classes: Vec<String>,
    /// Whitespace separated classes, as written in markup.
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(ElementId(id));
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn rect(mut self, top: f32, bottom: f32) -> Self {
        self.rect = Some(Rect { top, bottom });
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    fn all_classes(&self) -> Vec<String> {
        let mut classes = self.classes.clone();
        if let Some(names) = &self.class_name {
            classes.extend(names.split_whitespace().map(str::to_string));
        }
        classes
    }

    fn collect_ids(&self, out: &mut Vec<ElementId>) {
        if let Some(id) = self.id {
            out.push(id);
        }
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    rect: Option<Rect>,
}

#[derive(Clone, Debug)]
pub struct MemoryDocument {
    nodes: HashMap<ElementId, Node>,
    root: ElementId,
    viewport_height: f32,
    next_id: u64,
}

impl MemoryDocument {
    /// Empty document with a `body` root.
    pub fn new(viewport_height: f32) -> Self {
        let root = ElementId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                tag: "body".to_string(),
                parent: None,
                children: Vec::new(),
                classes: Vec::new(),
                attrs: BTreeMap::new(),
                rect: None,
            },
        );
        Self {
            nodes,
            root,
            viewport_height,
            next_id: 1,
        }
    }

    /// Build a document whose root is `spec` itself.
    pub fn from_spec(spec: &NodeSpec, viewport_height: f32) -> Result<Self, MotionError> {
        let mut ids = Vec::new();
        spec.collect_ids(&mut ids);
        check_unique(&ids, |_| false)?;

        // An unnumbered root takes 0 unless a descendant already claimed it.
        let root = spec.id.unwrap_or_else(|| {
            if ids.contains(&ElementId(0)) {
                ElementId(ids.iter().map(|id| id.0).max().unwrap_or(0) + 1)
            } else {
                ElementId(0)
            }
        });
        let mut doc = Self {
            nodes: HashMap::new(),
            root,
            viewport_height,
            next_id: ids.iter().map(|id| id.0 + 1).max().unwrap_or(0).max(root.0 + 1),
        };
        doc.nodes.insert(
            root,
            Node {
                tag: spec.tag.clone(),
                parent: None,
                children: Vec::new(),
                classes: spec.all_classes(),
                attrs: spec.attrs.clone(),
                rect: spec.rect,
            },
        );
        for child in &spec.children {
            doc.insert_tree(root, child);
        }
        Ok(doc)
    }

    /// Build from a JSON node tree.
    pub fn from_json(json: &str, viewport_height: f32) -> Result<Self, MotionError> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Self::from_spec(&spec, viewport_height)
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tag(&self, el: ElementId) -> Option<&str> {
        self.nodes.get(&el).map(|n| n.tag.as_str())
    }

    pub fn children(&self, el: ElementId) -> &[ElementId] {
        self.nodes
            .get(&el)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Append `spec` (and its subtree) as the last child of `parent`.
    /// Returns the id of the new subtree root.
    pub fn append(&mut self, parent: ElementId, spec: NodeSpec) -> Result<ElementId, MotionError> {
        if !self.nodes.contains_key(&parent) {
            return Err(MotionError::UnknownElement(parent));
        }
        let mut ids = Vec::new();
        spec.collect_ids(&mut ids);
        check_unique(&ids, |id| self.nodes.contains_key(&id))?;
        Ok(self.insert_tree(parent, &spec))
    }

    fn insert_tree(&mut self, parent: ElementId, spec: &NodeSpec) -> ElementId {
        let id = match spec.id {
            Some(id) => {
                self.next_id = self.next_id.max(id.0 + 1);
                id
            }
            None => {
                let id = ElementId(self.next_id);
                self.next_id += 1;
                id
            }
        };
        self.nodes.insert(
            id,
            Node {
                tag: spec.tag.clone(),
                parent: Some(parent),
                children: Vec::new(),
                classes: spec.all_classes(),
                attrs: spec.attrs.clone(),
                rect: spec.rect,
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        for child in &spec.children {
            self.insert_tree(id, child);
        }
        id
    }

    /// `el` and all its descendants, pre-order.
    pub fn subtree(&self, el: ElementId) -> Vec<ElementId> {
        if !self.nodes.contains_key(&el) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![el];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Unlink `el` from its parent, keeping the subtree in memory.
    pub fn detach(&mut self, el: ElementId) -> bool {
        if el == self.root {
            return false;
        }
        let Some(parent) = self.nodes.get_mut(&el).and_then(|n| n.parent.take()) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != el);
        }
        true
    }

    /// Remove `el` and its subtree. Returns the removed ids.
    pub fn remove(&mut self, el: ElementId) -> Vec<ElementId> {
        if el == self.root || !self.nodes.contains_key(&el) {
            return Vec::new();
        }
        let removed = self.subtree(el);
        self.detach(el);
        for id in &removed {
            self.nodes.remove(id);
        }
        removed
    }

    pub fn set_rect(&mut self, el: ElementId, rect: Rect) -> bool {
        match self.nodes.get_mut(&el) {
            Some(node) => {
                node.rect = Some(rect);
                true
            }
            None => false,
        }
    }

    /// Scroll the page down by `dy` px: every measured rect moves up.
    pub fn scroll_by(&mut self, dy: f32) {
        for node in self.nodes.values_mut() {
            if let Some(rect) = node.rect.as_mut() {
                rect.top -= dy;
                rect.bottom -= dy;
            }
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height;
    }
}

fn check_unique(
    ids: &[ElementId],
    exists: impl Fn(ElementId) -> bool,
) -> Result<(), MotionError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(*id) || exists(*id) {
            return Err(MotionError::DuplicateElement(*id));
        }
    }
    Ok(())
}

impl Document for MemoryDocument {
    fn root(&self) -> ElementId {
        self.root
    }

    fn contains(&self, el: ElementId) -> bool {
        let mut cur = el;
        let mut visited = HashSet::new();
        loop {
            if !visited.insert(cur) {
                return false;
            }
            let Some(node) = self.nodes.get(&cur) else {
                return false;
            };
            match node.parent {
                Some(p) => cur = p,
                None => return cur == self.root,
            }
        }
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        if !self.contains(root) {
            return Vec::new();
        }
        let mut all = self.subtree(root);
        all.remove(0);
        all
    }

    fn classes(&self, el: ElementId) -> &[String] {
        self.nodes
            .get(&el)
            .map(|n| n.classes.as_slice())
            .unwrap_or(&[])
    }

    fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(&el)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    fn set_attr(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn rect(&self, el: ElementId) -> Option<Rect> {
        self.nodes.get(&el).and_then(|n| n.rect)
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }
}
