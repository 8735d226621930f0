use std::collections::HashSet;

use petgraph::algo::is_cyclic_directed;
use petgraph::visit::Dfs;

use crate::graph::to_petgraph;
use crate::{ChoiceId, NodeId, StoryGraph};

/// A choice whose target id matches no node.
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingChoice {
    pub node: NodeId,
    pub choice: ChoiceId,
    pub target: NodeId,
}

/// Structural diagnostics of a story graph.
///
/// None of these block editing: cycles are legal stories, dangling choices are simply not
/// drawn. The report exists so hosts can warn authors before publishing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub node_count: usize,
    pub duplicate_ids: Vec<NodeId>,
    pub dangling: Vec<DanglingChoice>,
    /// Nodes no choice path reaches from the start node. Empty when no start is given.
    pub unreachable: Vec<NodeId>,
    pub has_cycles: bool,
}

impl Report {
    /// No duplicates and no dangling choices.
    pub fn is_consistent(&self) -> bool {
        self.duplicate_ids.is_empty() && self.dangling.is_empty()
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        let mut s = format!("{} nodes", self.node_count);
        if !self.dangling.is_empty() {
            s.push_str(&format!(", {} dangling choices", self.dangling.len()));
        }
        if !self.duplicate_ids.is_empty() {
            s.push_str(&format!(", {} duplicate ids", self.duplicate_ids.len()));
        }
        if !self.unreachable.is_empty() {
            s.push_str(&format!(", {} unreachable", self.unreachable.len()));
        }
        if self.has_cycles {
            s.push_str(", has loops");
        }
        s
    }
}

/// Checks `g`, computing reachability from `start` when given.
pub fn validate(g: &StoryGraph, start: Option<&NodeId>) -> Report {
    let mut report = Report {
        node_count: g.node_count(),
        ..Report::default()
    };

    let mut seen = HashSet::with_capacity(g.node_count());
    for n in g.nodes() {
        if !seen.insert(&n.id) {
            report.duplicate_ids.push(n.id.clone());
        }
    }

    let lookup = g.lookup();
    for n in g.nodes() {
        for c in &n.choices {
            if lookup.get(&c.target_node_id).is_none() {
                report.dangling.push(DanglingChoice {
                    node: n.id.clone(),
                    choice: c.id.clone(),
                    target: c.target_node_id.clone(),
                });
            }
        }
    }

    let pg = to_petgraph(g);
    report.has_cycles = is_cyclic_directed(&pg);

    if let Some(start_idx) = start
        .and_then(|id| lookup.position(id))
        .and_then(|pos| pg.node_indices().nth(pos))
    {
        let mut reached = HashSet::new();
        let mut dfs = Dfs::new(&pg, start_idx);
        while let Some(idx) = dfs.next(&pg) {
            reached.insert(idx);
        }
        report.unreachable = pg
            .node_indices()
            .filter(|idx| !reached.contains(idx))
            .map(|idx| pg[idx].clone())
            .collect();
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, StoryNode};

    fn story() -> StoryGraph {
        StoryGraph::new(vec![
            StoryNode::new("start", "Start", 0., 0.)
                .with_choice(Choice::new("s1", "left", "left"))
                .with_choice(Choice::new("s2", "right", "right")),
            StoryNode::new("left", "Left", 0., 100.)
                .with_choice(Choice::new("l1", "back", "start")),
            StoryNode::new("right", "Right", 100., 100.)
                .with_choice(Choice::new("r1", "deeper", "cellar")),
            StoryNode::new("island", "Island", 300., 300.),
        ])
    }

    #[test]
    fn test_report() {
        let r = validate(&story(), Some(&"start".into()));

        assert_eq!(r.node_count, 4);
        assert!(r.duplicate_ids.is_empty());
        assert_eq!(
            r.dangling,
            vec![DanglingChoice {
                node: "right".into(),
                choice: "r1".into(),
                target: "cellar".into(),
            }]
        );
        assert_eq!(r.unreachable, vec![NodeId::from("island")]);
        assert!(r.has_cycles);
        assert!(!r.is_consistent());
        assert_eq!(
            r.summary(),
            "4 nodes, 1 dangling choices, 1 unreachable, has loops"
        );
    }

    #[test]
    fn test_no_start_skips_reachability() {
        let r = validate(&story(), None);
        assert!(r.unreachable.is_empty());
    }

    #[test]
    fn test_acyclic_and_duplicates() {
        let g = StoryGraph::new(vec![
            StoryNode::new("a", "A", 0., 0.).with_choice(Choice::new("1", "go", "b")),
            StoryNode::new("b", "B", 0., 0.),
            StoryNode::new("b", "B again", 0., 0.),
        ]);
        let r = validate(&g, None);
        assert!(!r.has_cycles);
        assert_eq!(r.duplicate_ids, vec![NodeId::from("b")]);
    }
}
