//! DOM tree for the boxlens render surface.
//!
//! An arena-based tree following the [DOM Living Standard](https://dom.spec.whatwg.org/)
//! in miniature: enough structure for a preview surface whose DOM is built by
//! a lenient parser and then annotated in place by the debug layers.
//!
//! # Design
//!
//! All relationships are [`NodeId`] indices into one contiguous arena,
//! giving O(1) access and traversal without borrow checker friction.
//! Nodes are never deallocated within a surface lifetime; [`DomTree::detach`]
//! only unlinks a node, because annotation overlays come and go many times
//! per hover while the arena lives only until the next full rebuild.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// Handles are only meaningful against the tree that produced them and are
/// invalidated wholesale when the render surface is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A single node in the tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// Parent node, or `None` for the document root and detached nodes.
    pub parent: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// Children, in tree order.
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
/// "When an element is created, its local name is always given."
///
/// Only the local name and attribute list are stored; namespaces and custom
/// element state are irrelevant to a preview surface.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name", lowercased by the parser.
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with a tag name and no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: AttributesMap::new(),
        }
    }

    /// The element's `id` attribute, if present.
    ///
    /// [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes)
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// The element's class names, in attribute order.
    ///
    /// [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes)
    /// "a set of space-separated tokens representing the various classes"
    ///
    /// Order is kept (unlike a set) because the tag-identity label renders
    /// classes in source order.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        match self.attrs.get("class") {
            Some(classlist) => classlist.split_whitespace().collect(),
            None => Vec::new(),
        }
    }

    /// True when the class attribute contains `name` as a whole token.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().contains(&name)
    }
}

/// Arena-based DOM tree with O(1) node access.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree containing only the Document node.
    #[must_use]
    pub fn new() -> Self {
        DomTree {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes ever allocated in this tree (detached ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena holds no nodes (never the case after `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node, unattached, and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Unlinks `node` from its parent. The node stays in the arena (its ID
    /// remains valid) but no traversal reaches it. Used to tear down
    /// annotation overlays without invalidating outstanding handles.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes.get(node.0).and_then(|n| n.parent) {
            self.nodes[parent.0].children.retain(|&child| child != node);
            self.nodes[node.0].parent = None;
        }
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// All children of a node, in tree order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of every text node under `id`, in tree order.
    ///
    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent) in spirit:
    /// the descendant text content of a node.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.as_text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// True when `descendant` sits somewhere under `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// All descendants of `id` (excluding `id` itself), in document order.
    ///
    /// This is the traversal behind the surface's `#content *` queries.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Every node reachable from the document root, in document order.
    #[must_use]
    pub fn iter_all(&self) -> Vec<NodeId> {
        self.descendants(NodeId::ROOT)
    }

    /// First element (in document order) whose `id` attribute equals `id_value`.
    ///
    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    #[must_use]
    pub fn element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.iter_all()
            .into_iter()
            .find(|&node| self.as_element(node).and_then(ElementData::id) == Some(id_value))
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's
    /// children that is either a body element or a frameset element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| e.tag_name == "body" || e.tag_name == "frameset")
            })
            .copied()
    }

    /// Set (or replace) one attribute on an element. No-op for non-elements.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.as_element_mut(id) {
            let _ = element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Append one class token to the element's class attribute, if absent.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(element) = self.as_element_mut(id) {
            if element.has_class(class) {
                return;
            }
            let classlist = element.attrs.entry("class".to_string()).or_default();
            if !classlist.is_empty() {
                classlist.push(' ');
            }
            classlist.push_str(class);
        }
    }

    /// Merge one `prop: value` pair into the element's inline `style`
    /// attribute, replacing an existing declaration of the same property.
    ///
    /// This is the mutation behind forcing `position: relative` on flagged
    /// elements and positioning overlay rectangles.
    pub fn style_set(&mut self, id: NodeId, prop: &str, value: &str) {
        let Some(element) = self.as_element_mut(id) else {
            return;
        };
        let existing = element.attrs.get("style").cloned().unwrap_or_default();
        let mut declarations: Vec<String> = existing
            .split(';')
            .map(str::trim)
            .filter(|decl| !decl.is_empty())
            .filter(|decl| {
                decl.split(':')
                    .next()
                    .is_none_or(|name| !name.trim().eq_ignore_ascii_case(prop))
            })
            .map(ToString::to_string)
            .collect();
        declarations.push(format!("{prop}: {value}"));
        let _ = element
            .attrs
            .insert("style".to_string(), declarations.join("; "));
    }

    /// Read one property out of the element's inline `style` attribute.
    #[must_use]
    pub fn style_get(&self, id: NodeId, prop: &str) -> Option<String> {
        let element = self.as_element(id)?;
        let style = element.attrs.get("style")?;
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            if name.trim().eq_ignore_ascii_case(prop) {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
        let id = tree.alloc(NodeType::Element(ElementData::new(tag)));
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn append_and_traverse() {
        let mut tree = DomTree::new();
        let html = element(&mut tree, NodeId::ROOT, "html");
        let body = element(&mut tree, html, "body");
        let div = element(&mut tree, body, "div");

        assert_eq!(tree.parent(div), Some(body));
        assert!(tree.is_descendant_of(div, html));
        assert_eq!(tree.descendants(html), vec![body, div]);
    }

    #[test]
    fn detach_unlinks_but_keeps_the_arena_slot() {
        let mut tree = DomTree::new();
        let html = element(&mut tree, NodeId::ROOT, "html");
        let div = element(&mut tree, html, "div");

        tree.detach(div);
        assert!(tree.children(html).is_empty());
        assert_eq!(tree.parent(div), None);
        // The slot survives; annotation handles stay valid.
        assert!(tree.as_element(div).is_some());
    }

    #[test]
    fn style_set_replaces_only_the_named_property() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, NodeId::ROOT, "div");
        tree.set_attr(div, "style", "width: 50px; position: static");

        tree.style_set(div, "position", "relative");
        assert_eq!(tree.style_get(div, "width").as_deref(), Some("50px"));
        assert_eq!(tree.style_get(div, "position").as_deref(), Some("relative"));
    }

    #[test]
    fn add_class_is_idempotent() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, NodeId::ROOT, "div");
        tree.add_class(div, "overflow-detected");
        tree.add_class(div, "overflow-detected");
        assert_eq!(
            tree.as_element(div).unwrap().attrs.get("class").unwrap(),
            "overflow-detected"
        );
    }

    #[test]
    fn element_by_id_finds_the_content_container() {
        let mut tree = DomTree::new();
        let body = element(&mut tree, NodeId::ROOT, "body");
        let div = element(&mut tree, body, "div");
        tree.set_attr(div, "id", "content");
        assert_eq!(tree.element_by_id("content"), Some(div));
        assert_eq!(tree.element_by_id("missing"), None);
    }

    #[test]
    fn text_content_concatenates_descendant_text() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, NodeId::ROOT, "p");
        let t1 = tree.alloc(NodeType::Text("long ".to_string()));
        let span = tree.alloc(NodeType::Element(ElementData::new("span")));
        let t2 = tree.alloc(NodeType::Text("text".to_string()));
        tree.append_child(p, t1);
        tree.append_child(p, span);
        tree.append_child(span, t2);
        assert_eq!(tree.text_content(p), "long text");
    }
}
