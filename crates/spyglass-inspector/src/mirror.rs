#![forbid(unsafe_code)]

//! Lazily built mirror of the live widget tree.
//!
//! Nodes live in an arena keyed by widget identity, so re-inspecting a
//! widget anywhere under the current root reuses the nodes already built for
//! it. A node's children are read from the live widget only when the node is
//! materialized; until then it presents an empty child list. Re-rooting
//! discards every node that is no longer reachable from the new root.
//!
//! # Example
//!
//! ```
//! use spyglass_harness::sample_app;
//! use spyglass_inspector::mirror::{TreeGuides, TreeMirror};
//!
//! let app = sample_app();
//! let mut mirror = TreeMirror::new();
//! mirror.inspect(Some(&app.button.widget_ref()));
//! let lines = mirror.render_lines(TreeGuides::Ascii);
//! assert_eq!(lines[0], "main");
//! assert_eq!(lines[2], "    +-- [ok]");
//! ```

use std::collections::{HashMap, HashSet};

use spyglass_core::widget::{WidgetId, WidgetRef};

/// Guide strings for text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeGuides {
    /// `|`, `+--`, `` `-- ``.
    Ascii,
    /// Box-drawing characters.
    #[default]
    Unicode,
    /// Box-drawing characters with a rounded last branch.
    Rounded,
}

impl TreeGuides {
    /// Vertical continuation (an ancestor has siblings below).
    #[must_use]
    pub const fn vertical(&self) -> &'static str {
        match self {
            Self::Ascii => "|   ",
            Self::Unicode | Self::Rounded => "\u{2502}   ",
        }
    }

    /// Branch guide (the node has siblings below).
    #[must_use]
    pub const fn branch(&self) -> &'static str {
        match self {
            Self::Ascii => "+-- ",
            Self::Unicode | Self::Rounded => "\u{251C}\u{2500}\u{2500} ",
        }
    }

    /// Last-child guide.
    #[must_use]
    pub const fn last(&self) -> &'static str {
        match self {
            Self::Ascii => "`-- ",
            Self::Unicode => "\u{2514}\u{2500}\u{2500} ",
            Self::Rounded => "\u{2570}\u{2500}\u{2500} ",
        }
    }

    #[must_use]
    pub const fn space(&self) -> &'static str {
        "    "
    }
}

/// Handle to a mirror node. Valid until the node is discarded by a re-root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(WidgetId);

impl NodeId {
    /// Identity of the mirrored widget.
    pub const fn widget_id(self) -> WidgetId {
        self.0
    }
}

/// Selection event produced by the mirror, `None` when cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChanged(pub Option<WidgetRef>);

#[derive(Debug)]
struct Node {
    target: WidgetRef,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    materialized: bool,
    expanded: bool,
}

impl Node {
    fn new(target: WidgetRef, parent: Option<NodeId>) -> Self {
        Self {
            target,
            parent,
            children: Vec::new(),
            materialized: false,
            expanded: false,
        }
    }
}

/// The mirror itself.
#[derive(Debug, Default)]
pub struct TreeMirror {
    nodes: HashMap<WidgetId, Node>,
    root: Option<NodeId>,
    selection: Option<NodeId>,
    created: u64,
}

impl TreeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-root the mirror on the top-level ancestor of `target` and select it.
    ///
    /// The path from the root to `target` is materialized and expanded.
    /// Ancestors also load one level of their other children, so every
    /// visible container knows whether it has children.
    pub fn inspect(&mut self, target: Option<&WidgetRef>) -> SelectionChanged {
        let Some(target) = target else {
            self.nodes.clear();
            self.root = None;
            self.selection = None;
            return SelectionChanged(None);
        };

        let chain: Vec<WidgetRef> = target.ancestry().collect();
        let mut previous: Option<NodeId> = None;
        for (depth, widget) in chain.iter().enumerate() {
            let id = self.ensure_node(widget, None);
            self.reload_children(id);
            if depth > 0 {
                self.set_expanded(id, true);
                for child in self.children(id).to_vec() {
                    if Some(child) != previous {
                        self.materialize(child);
                    }
                }
            }
            previous = Some(id);
        }

        let new_root = previous;
        if let Some(root) = new_root
            && let Some(node) = self.nodes.get_mut(&root.0)
        {
            node.parent = None;
        }
        if self.root != new_root {
            spyglass_core::trace!(
                root = %chain.last().map(|w| w.label()).unwrap_or_default(),
                "mirror re-rooted"
            );
        }
        self.root = new_root;
        self.selection = Some(NodeId(target.id()));
        self.collect_unreachable();
        SelectionChanged(Some(target.clone()))
    }

    /// Load the children of `node` if it has not been loaded yet, and show
    /// them. Children that were already known get their own children loaded.
    ///
    /// Returns `false` for an unknown node.
    pub fn expand(&mut self, node: NodeId) -> bool {
        if !self.nodes.contains_key(&node.0) {
            return false;
        }
        let already_loaded = self.is_materialized(node);
        if !already_loaded {
            let known: HashSet<WidgetId> = self.nodes.keys().copied().collect();
            self.materialize(node);
            for child in self.children(node).to_vec() {
                if known.contains(&child.0) {
                    self.materialize(child);
                }
            }
        }
        self.set_expanded(node, true);
        true
    }

    /// Hide the children of `node`. They stay materialized.
    pub fn collapse(&mut self, node: NodeId) -> bool {
        self.set_expanded(node, false)
    }

    /// Select an existing node, as a click in the tree view would.
    pub fn select_node(&mut self, node: NodeId) -> Option<SelectionChanged> {
        let target = self.nodes.get(&node.0)?.target.clone();
        self.selection = Some(node);
        Some(SelectionChanged(Some(target)))
    }

    /// Re-read the children of a materialized node from the live widget.
    ///
    /// Unmaterialized nodes are left alone. Returns `false` for an unknown
    /// node.
    pub fn refresh_children(&mut self, node: NodeId) -> bool {
        match self.nodes.get(&node.0) {
            None => false,
            Some(n) if !n.materialized => true,
            Some(_) => {
                self.reload_children(node);
                self.collect_unreachable();
                true
            }
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// Node ids from the root down to the selection.
    pub fn selection_path(&self) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.selection;
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.nodes.get(&id.0).and_then(|n| n.parent);
        }
        path.reverse();
        path
    }

    /// Node mirroring `widget`, if one exists.
    pub fn node_for(&self, widget: &WidgetRef) -> Option<NodeId> {
        let id = widget.id();
        self.nodes.contains_key(&id).then_some(NodeId(id))
    }

    pub fn target(&self, node: NodeId) -> Option<&WidgetRef> {
        self.nodes.get(&node.0).map(|n| &n.target)
    }

    /// Materialized children; empty for unknown or unmaterialized nodes.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node.0).and_then(|n| n.parent)
    }

    pub fn label(&self, node: NodeId) -> Option<String> {
        self.target(node).map(WidgetRef::label)
    }

    pub fn is_materialized(&self, node: NodeId) -> bool {
        self.nodes.get(&node.0).is_some_and(|n| n.materialized)
    }

    pub fn is_expanded(&self, node: NodeId) -> bool {
        self.nodes.get(&node.0).is_some_and(|n| n.expanded)
    }

    /// Live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes constructed over the mirror's lifetime.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Render the expanded part of the mirror, one line per node.
    ///
    /// The selected node's label is bracketed.
    pub fn render_lines(&self, guides: TreeGuides) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            let mut is_last = Vec::with_capacity(8);
            self.render_node(root, 0, &mut is_last, guides, &mut out);
        }
        out
    }

    fn render_node(
        &self,
        id: NodeId,
        depth: usize,
        is_last: &mut Vec<bool>,
        guides: TreeGuides,
        out: &mut Vec<String>,
    ) {
        let Some(node) = self.nodes.get(&id.0) else {
            return;
        };
        let mut line = String::new();
        for d in 0..depth {
            let last = is_last.get(d).copied().unwrap_or(false);
            line.push_str(match (d == depth - 1, last) {
                (true, true) => guides.last(),
                (true, false) => guides.branch(),
                (false, true) => guides.space(),
                (false, false) => guides.vertical(),
            });
        }
        let label = node.target.label();
        if self.selection == Some(id) {
            line.push('[');
            line.push_str(&label);
            line.push(']');
        } else {
            line.push_str(&label);
        }
        out.push(line);

        if !node.expanded {
            return;
        }
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            is_last.push(i + 1 == count);
            self.render_node(*child, depth + 1, is_last, guides, out);
            is_last.pop();
        }
    }

    fn ensure_node(&mut self, widget: &WidgetRef, parent: Option<NodeId>) -> NodeId {
        let id = widget.id();
        let created = &mut self.created;
        let node = self.nodes.entry(id).or_insert_with(|| {
            *created += 1;
            Node::new(widget.clone(), parent)
        });
        if parent.is_some() {
            node.parent = parent;
        }
        NodeId(id)
    }

    fn materialize(&mut self, node: NodeId) {
        if !self.is_materialized(node) {
            self.reload_children(node);
        }
    }

    fn reload_children(&mut self, node: NodeId) {
        let Some(target) = self.target(node).cloned() else {
            return;
        };
        let children: Vec<NodeId> = target
            .children()
            .unwrap_or_default()
            .iter()
            .map(|child| self.ensure_node(child, Some(node)))
            .collect();
        if let Some(n) = self.nodes.get_mut(&node.0) {
            n.children = children;
            n.materialized = true;
        }
    }

    fn set_expanded(&mut self, node: NodeId, expanded: bool) -> bool {
        match self.nodes.get_mut(&node.0) {
            Some(n) => {
                n.expanded = expanded;
                true
            }
            None => false,
        }
    }

    fn collect_unreachable(&mut self) {
        let mut reachable = HashSet::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if reachable.insert(id.0) {
                stack.extend(self.children(id).iter().copied());
            }
        }
        self.nodes.retain(|id, _| reachable.contains(id));
        if self.selection.is_some_and(|s| !reachable.contains(&s.0)) {
            self.selection = None;
        }
    }
}
