//! Arena-backed component tree
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. Children are
//! owned (tree, not DAG); cross-component references store the target's
//! arena index, never a pre-computed identifier, because identifiers are
//! only finalized after the whole tree is built. References are rendered as
//! target-ID strings at serialization time.
//!
//! Tree construction is not safe for concurrent mutation: parallel scanners
//! must build subtrees independently and let one coordinating task attach
//! them.

use super::component::Component;

/// Arena index of a component node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A non-owning link to the component believed to provide a dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub target: NodeId,
    pub dep_type: String,
    /// Package name that created the link
    pub package: String,
}

/// The component tree for one scan
pub struct ComponentTree {
    nodes: Vec<Component>,
    children: Vec<Vec<NodeId>>,
    refs: Vec<Vec<ComponentRef>>,
    root: NodeId,
}

impl ComponentTree {
    pub fn new(root: Component) -> Self {
        Self {
            nodes: vec![root],
            children: vec![Vec::new()],
            refs: vec![Vec::new()],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Component {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Component {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id.0]
    }

    pub fn refs(&self, id: NodeId) -> &[ComponentRef] {
        &self.refs[id.0]
    }

    /// Attach `candidate` under `parent`, merging into an existing child when
    /// the merge gate allows it (same name, at least one shared path, both
    /// tagged or both untagged). Returns the surviving node. Idempotent:
    /// adding an identical candidate twice leaves one child.
    ///
    /// The tagged/untagged gate can refuse to merge two legitimately related
    /// components when one was tagged before the other; such twins stay
    /// separate rather than being unified speculatively.
    pub fn add_child(&mut self, parent: NodeId, candidate: Component) -> NodeId {
        for &child in &self.children[parent.0] {
            if self.nodes[child.0].can_merge_with(&candidate) {
                self.nodes[child.0].merge_from(&candidate);
                return child;
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(candidate);
        self.children.push(Vec::new());
        self.refs.push(Vec::new());
        self.children[parent.0].push(id);
        id
    }

    /// Merge the whole payload of `other` into the node `id`.
    pub fn combine_into(&mut self, id: NodeId, other: Component) {
        self.nodes[id.0].combine(other);
    }

    /// Append a non-owning reference, deduplicated on (target, type, package).
    pub fn add_reference(&mut self, from: NodeId, reference: ComponentRef) {
        let refs = &mut self.refs[from.0];
        if !refs.contains(&reference) {
            refs.push(reference);
        }
    }

    /// Depth-first pre-order walk of the whole tree.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            // reversed so the leftmost child is visited first
            for &child in self.children[id.0].iter().rev() {
                stack.push(child);
            }
        }
        order
    }
}
