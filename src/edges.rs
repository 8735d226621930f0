use std::collections::HashMap;

use egui::{Pos2, Vec2};

use crate::{Choice, NodeId, StoryNode};

/// Id index over a node slice.
///
/// Choices hold plain ids, never references, so every edge endpoint goes through
/// [`NodeLookup::get`] and a missing target is an ordinary `None`. Duplicate ids resolve to the
/// first node carrying them.
pub struct NodeLookup<'a> {
    nodes: &'a [StoryNode],
    by_id: HashMap<&'a NodeId, usize>,
}

impl<'a> NodeLookup<'a> {
    pub fn new(nodes: &'a [StoryNode]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (pos, n) in nodes.iter().enumerate() {
            by_id.entry(&n.id).or_insert(pos);
        }

        Self { nodes, by_id }
    }

    pub fn get(&self, id: &NodeId) -> Option<&'a StoryNode> {
        let nodes = self.nodes;
        self.position(id).map(|pos| &nodes[pos])
    }

    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}

/// A choice whose target exists, with the logical geometry needed to draw it.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedEdge<'a> {
    pub from: &'a StoryNode,
    pub to: &'a StoryNode,
    pub choice: &'a Choice,
    /// Centre of the source node.
    pub start: Pos2,
    /// Centre of the target node.
    pub end: Pos2,
}

impl ResolvedEdge<'_> {
    /// Where the choice label is placed.
    pub fn label_pos(&self) -> Pos2 {
        self.start + (self.end - self.start) / 2.
    }

    pub fn is_self_loop(&self) -> bool {
        self.from.id == self.to.id
    }
}

/// Resolves a single choice of `from`. Returns `None` for a dangling target.
pub fn resolve_choice<'a>(
    lookup: &NodeLookup<'a>,
    from: &'a StoryNode,
    choice: &'a Choice,
    node_size: Vec2,
) -> Option<ResolvedEdge<'a>> {
    let to = lookup.get(&choice.target_node_id)?;

    Some(ResolvedEdge {
        from,
        to,
        choice,
        start: from.center(node_size),
        end: to.center(node_size),
    })
}

/// Enumerates every drawable edge: each choice of each node, in node then choice order.
///
/// This is a flat enumeration, cycles need no special care. Dangling choices are skipped.
pub fn resolve_edges<'a>(
    nodes: &'a [StoryNode],
    node_size: Vec2,
) -> impl Iterator<Item = ResolvedEdge<'a>> + 'a {
    let lookup = NodeLookup::new(nodes);
    nodes
        .iter()
        .flat_map(|n| n.choices.iter().map(move |c| (n, c)))
        .filter_map(move |(n, c)| resolve_choice(&lookup, n, c, node_size))
}

/// Counts choices pointing at ids absent from `nodes`.
pub fn dangling_count(nodes: &[StoryNode]) -> usize {
    let lookup = NodeLookup::new(nodes);
    nodes
        .iter()
        .flat_map(|n| n.choices.iter())
        .filter(|c| lookup.get(&c.target_node_id).is_none())
        .count()
}

/// Point where the segment from `outside` towards the centre of the axis-aligned box
/// `(center, half)` crosses the box border. Falls back to `center` when `outside` lies inside.
pub fn box_entry_point(center: Pos2, half: Vec2, outside: Pos2) -> Pos2 {
    let d = outside - center;
    if d.x.abs() <= half.x && d.y.abs() <= half.y {
        return center;
    }

    let tx = if d.x == 0. { f32::INFINITY } else { half.x / d.x.abs() };
    let ty = if d.y == 0. { f32::INFINITY } else { half.y / d.y.abs() };

    center + d * tx.min(ty)
}
