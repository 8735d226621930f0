use std::collections::HashSet;
use std::sync::Arc;

use egui::Pos2;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::{Deserialize, Serialize};

use crate::edges::NodeLookup;
use crate::error::{Error, Result};
use crate::{Choice, ChoiceId, NodeId, StoryNode};

/// Immutable snapshot of a story graph.
///
/// The editor receives a reference to a snapshot owned by its host and never edits it in place.
/// Every mutation method returns a new snapshot: the untouched nodes are carried over unchanged
/// and the receiver stays valid, so hosts may keep older snapshots around (undo stacks, list
/// views) without aliasing issues. Cloning is cheap since nodes are shared behind an [`Arc`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<StoryNode>", into = "Vec<StoryNode>")]
pub struct StoryGraph {
    nodes: Arc<[StoryNode]>,
}

impl Default for StoryGraph {
    fn default() -> Self {
        Vec::<StoryNode>::new().into()
    }
}

impl From<Vec<StoryNode>> for StoryGraph {
    fn from(nodes: Vec<StoryNode>) -> Self {
        Self {
            nodes: nodes.into(),
        }
    }
}

impl From<StoryGraph> for Vec<StoryNode> {
    fn from(g: StoryGraph) -> Self {
        g.nodes.to_vec()
    }
}

impl FromIterator<StoryNode> for StoryGraph {
    fn from_iter<T: IntoIterator<Item = StoryNode>>(iter: T) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl StoryGraph {
    pub fn new(nodes: Vec<StoryNode>) -> Self {
        nodes.into()
    }

    /// Parses a JSON array of nodes.
    ///
    /// # Errors
    /// Returns [`Error::Json`] for malformed input and [`Error::DuplicateNodeId`] when two nodes
    /// share an id.
    pub fn from_json(text: &str) -> Result<Self> {
        let nodes: Vec<StoryNode> = serde_json::from_str(text)?;

        let mut seen = HashSet::with_capacity(nodes.len());
        for n in &nodes {
            if !seen.insert(&n.id) {
                return Err(Error::DuplicateNodeId(n.id.clone()));
            }
        }

        Ok(nodes.into())
    }

    /// Serializes the snapshot as a pretty-printed JSON array.
    ///
    /// # Errors
    /// Propagates serializer failures as [`Error::Json`].
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.nodes)?)
    }

    pub fn nodes(&self) -> &[StoryNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&StoryNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn lookup(&self) -> NodeLookup<'_> {
        NodeLookup::new(&self.nodes)
    }

    /// Returns true when both snapshots share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    /// Returns an id of the form `node-N` not used by any node of the snapshot.
    pub fn next_node_id(&self) -> NodeId {
        let mut n = self.nodes.len() + 1;
        loop {
            let candidate = NodeId::new(format!("node-{n}"));
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub(crate) fn with_node_added(&self, node: StoryNode) -> Self {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(node);
        nodes.into()
    }

    /// Copies the snapshot applying `change` to the node with the given id.
    ///
    /// # Errors
    /// Returns [`Error::UnknownNode`] when no node has the id.
    pub(crate) fn with_node_changed(
        &self,
        id: &NodeId,
        change: impl FnOnce(&mut StoryNode),
    ) -> Result<Self> {
        let pos = self
            .nodes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| Error::UnknownNode(id.clone()))?;

        let mut nodes = self.nodes.to_vec();
        change(&mut nodes[pos]);
        Ok(nodes.into())
    }

    pub(crate) fn with_node_moved(&self, id: &NodeId, loc: Pos2) -> Result<Self> {
        self.with_node_changed(id, |n| n.set_location(loc))
    }

    pub(crate) fn with_choice_added(&self, from: &NodeId, choice: Choice) -> Result<Self> {
        self.with_node_changed(from, |n| n.choices.push(choice))
    }

    pub(crate) fn with_choice_removed(&self, node: &NodeId, choice: &ChoiceId) -> Result<Self> {
        let owner = self
            .node(node)
            .ok_or_else(|| Error::UnknownNode(node.clone()))?;
        if owner.choice(choice).is_none() {
            return Err(Error::UnknownChoice {
                node: node.clone(),
                choice: choice.clone(),
            });
        }

        self.with_node_changed(node, |n| n.choices.retain(|c| &c.id != choice))
    }

    /// Removes a node. Choices of other nodes that pointed at it are kept and become dangling.
    pub(crate) fn with_node_removed(&self, id: &NodeId) -> Result<Self> {
        if !self.contains(id) {
            return Err(Error::UnknownNode(id.clone()));
        }

        Ok(self.nodes.iter().filter(|n| &n.id != id).cloned().collect())
    }
}

/// Converts the snapshot into a [`petgraph::stable_graph::StableGraph`] keyed by node ids.
///
/// Every node becomes a graph node and every resolvable choice a directed edge weighted with
/// the choice id. Dangling choices are left out.
pub fn to_petgraph(g: &StoryGraph) -> StableGraph<NodeId, ChoiceId> {
    let mut out = StableGraph::with_capacity(g.node_count(), 0);
    let lookup = g.lookup();

    let indices: Vec<NodeIndex> = g
        .nodes()
        .iter()
        .map(|n| out.add_node(n.id.clone()))
        .collect();

    for (from_pos, n) in g.nodes().iter().enumerate() {
        for c in &n.choices {
            if let Some(to_pos) = lookup.position(&c.target_node_id) {
                out.add_edge(indices[from_pos], indices[to_pos], c.id.clone());
            }
        }
    }

    out
}
