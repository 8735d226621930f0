use egui::Pos2;

use crate::error::Result;
use crate::events::{
    Event, EventSink, PayloadChoiceAdd, PayloadChoiceRemove, PayloadNodeAdd, PayloadNodeDeselect,
    PayloadNodeMove, PayloadNodeRemove, PayloadNodeSelect, PayloadNodeUpdate, PayloadNodesChange,
};
use crate::{Choice, ChoiceId, NodeId, StoryGraph, StoryNode};

const NEW_NODE_TITLE: &str = "New scene";

/// Mutation front-end over a [`StoryGraph`] snapshot.
///
/// The controller mirrors the host's graph: every operation builds a new snapshot, keeps it as
/// the current one and publishes it through the sink as [`Event::NodesChange`], right after the
/// operation-specific event. The snapshot it was created with is never touched.
pub struct GraphController<'a> {
    graph: StoryGraph,
    selected: Option<NodeId>,
    sink: Option<&'a dyn EventSink>,
}

impl<'a> GraphController<'a> {
    pub fn new(graph: StoryGraph) -> Self {
        Self {
            graph,
            selected: None,
            sink: None,
        }
    }

    pub fn with_event_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_selected(mut self, selected: Option<NodeId>) -> Self {
        self.selected = selected;
        self
    }

    /// The latest snapshot.
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Creates a node with a fresh id whose top-left corner sits at logical `(x, y)`.
    pub fn add_node(&mut self, x: f32, y: f32) -> NodeId {
        let id = self.graph.next_node_id();
        let node = StoryNode::new(id.clone(), NEW_NODE_TITLE, x, y);
        log::debug!("add node {id} at ({x}, {y})");

        let next = self.graph.with_node_added(node);
        self.publish(Event::NodeAdd(PayloadNodeAdd {
            id: id.clone(),
            x,
            y,
        }));
        self.commit(next);

        id
    }

    /// Moves a node to the logical location `loc`.
    ///
    /// # Errors
    /// [`crate::Error::UnknownNode`] when the node does not exist.
    pub fn move_node(&mut self, id: &NodeId, loc: Pos2) -> Result<()> {
        let next = self.graph.with_node_moved(id, loc)?;
        log::trace!("move node {id} to {loc:?}");

        self.publish(Event::NodeMove(PayloadNodeMove {
            id: id.clone(),
            x: loc.x,
            y: loc.y,
        }));
        self.commit(next);
        Ok(())
    }

    /// Selects `id`, replacing the previous selection. Passing `None` clears it.
    ///
    /// Selection is editor state, so no snapshot is published.
    ///
    /// # Errors
    /// [`crate::Error::UnknownNode`] when the node does not exist.
    pub fn select_node(&mut self, id: Option<&NodeId>) -> Result<()> {
        if let Some(id) = id {
            if !self.graph.contains(id) {
                return Err(crate::Error::UnknownNode(id.clone()));
            }
        }
        if self.selected.as_ref() == id {
            return Ok(());
        }

        if let Some(prev) = self.selected.take() {
            self.publish(Event::NodeDeselect(PayloadNodeDeselect { id: prev }));
        }
        if let Some(id) = id {
            log::debug!("select node {id}");
            self.selected = Some(id.clone());
            self.publish(Event::NodeSelect(PayloadNodeSelect { id: id.clone() }));
        }

        Ok(())
    }

    /// Appends a choice labelled `text` to `from`, pointing at `to`.
    ///
    /// The target is not checked: a choice may point at a node the host has not created yet.
    ///
    /// # Errors
    /// [`crate::Error::UnknownNode`] when `from` does not exist.
    pub fn add_choice(&mut self, from: &NodeId, to: &NodeId, text: &str) -> Result<ChoiceId> {
        let owner = self
            .graph
            .node(from)
            .ok_or_else(|| crate::Error::UnknownNode(from.clone()))?;
        let choice_id = owner.next_choice_id();
        let choice = Choice::new(choice_id.clone(), text, to.clone());

        let next = self.graph.with_choice_added(from, choice)?;
        log::debug!("add choice {choice_id} {from} -> {to}");

        self.publish(Event::ChoiceAdd(PayloadChoiceAdd {
            from: from.clone(),
            to: to.clone(),
            text: text.to_string(),
        }));
        self.commit(next);
        Ok(choice_id)
    }

    /// # Errors
    /// [`crate::Error::UnknownNode`] or [`crate::Error::UnknownChoice`] when either is missing.
    pub fn remove_choice(&mut self, node: &NodeId, choice: &ChoiceId) -> Result<()> {
        let next = self.graph.with_choice_removed(node, choice)?;
        log::debug!("remove choice {choice} of {node}");

        self.publish(Event::ChoiceRemove(PayloadChoiceRemove {
            node: node.clone(),
            choice: choice.clone(),
        }));
        self.commit(next);
        Ok(())
    }

    /// Replaces title and content of a node.
    ///
    /// # Errors
    /// [`crate::Error::UnknownNode`] when the node does not exist.
    pub fn update_node(&mut self, id: &NodeId, title: &str, content: &str) -> Result<()> {
        let next = self.graph.with_node_changed(id, |n| {
            n.title = title.to_string();
            n.content = content.to_string();
        })?;

        self.publish(Event::NodeUpdate(PayloadNodeUpdate {
            id: id.clone(),
            title: title.to_string(),
            content: content.to_string(),
        }));
        self.commit(next);
        Ok(())
    }

    /// Removes a node, deselecting it first. Choices pointing at it become dangling.
    ///
    /// # Errors
    /// [`crate::Error::UnknownNode`] when the node does not exist.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<()> {
        let next = self.graph.with_node_removed(id)?;
        log::debug!("remove node {id}");

        if self.selected.as_ref() == Some(id) {
            self.select_node(None)?;
        }
        self.publish(Event::NodeRemove(PayloadNodeRemove { id: id.clone() }));
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: StoryGraph) {
        self.graph = next;
        self.publish(Event::NodesChange(PayloadNodesChange {
            nodes: self.graph.clone(),
        }));
    }

    fn publish(&self, event: Event) {
        if let Some(sink) = self.sink {
            sink.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::Error;

    fn sample() -> StoryGraph {
        StoryGraph::new(vec![
            StoryNode::new("a", "Start", 0., 0.),
            StoryNode::new("b", "Fork", 200., 0.),
        ])
    }

    fn last_snapshot(events: &[Event]) -> &StoryGraph {
        match events.last().unwrap() {
            Event::NodesChange(p) => &p.nodes,
            other => panic!("expected NodesChange, got {other:?}"),
        }
    }

    #[test]
    fn test_add_node_reports_exact_coordinates() {
        let events = RefCell::new(Vec::new());
        let sink = |e: Event| events.borrow_mut().push(e);
        let original = sample();
        let mut c = GraphController::new(original.clone()).with_event_sink(&sink);

        let id = c.add_node(123.5, -40.25);

        let events = events.into_inner();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            Event::NodeAdd(PayloadNodeAdd {
                id: id.clone(),
                x: 123.5,
                y: -40.25,
            })
        );
        let snapshot = last_snapshot(&events);
        assert_eq!(snapshot.node_count(), 3);
        assert_eq!(snapshot.node(&id).unwrap().location(), Pos2::new(123.5, -40.25));
        assert_eq!(original.node_count(), 2);
    }

    #[test]
    fn test_move_is_copy_on_write() {
        let original = sample();
        let mut c = GraphController::new(original.clone());

        c.move_node(&"a".into(), Pos2::new(10., 20.)).unwrap();

        assert_eq!(original.nodes()[0].location(), Pos2::ZERO);
        assert_eq!(c.graph().nodes()[0].location(), Pos2::new(10., 20.));
        assert_eq!(c.graph().nodes()[1], original.nodes()[1]);
    }

    #[test]
    fn test_select_replaces_previous() {
        let events = RefCell::new(Vec::new());
        let sink = |e: Event| events.borrow_mut().push(e);
        let mut c = GraphController::new(sample()).with_event_sink(&sink);

        c.select_node(Some(&"a".into())).unwrap();
        c.select_node(Some(&"a".into())).unwrap();
        c.select_node(Some(&"b".into())).unwrap();

        assert_eq!(c.selected().map(NodeId::as_str), Some("b"));
        assert_eq!(
            events.into_inner(),
            vec![
                Event::NodeSelect(PayloadNodeSelect { id: "a".into() }),
                Event::NodeDeselect(PayloadNodeDeselect { id: "a".into() }),
                Event::NodeSelect(PayloadNodeSelect { id: "b".into() }),
            ]
        );
    }

    #[test]
    fn test_add_choice_to_missing_target_allowed() {
        let events = RefCell::new(Vec::new());
        let sink = |e: Event| events.borrow_mut().push(e);
        let mut c = GraphController::new(sample()).with_event_sink(&sink);

        let choice = c
            .add_choice(&"a".into(), &"not-yet".into(), "Wait")
            .unwrap();

        let events = events.into_inner();
        assert_eq!(
            events[0],
            Event::ChoiceAdd(PayloadChoiceAdd {
                from: "a".into(),
                to: "not-yet".into(),
                text: "Wait".to_string(),
            })
        );
        let a = last_snapshot(&events).node(&"a".into()).unwrap();
        assert_eq!(a.choice(&choice).unwrap().target_node_id.as_str(), "not-yet");
    }

    #[test]
    fn test_unknown_source_is_error_and_silent() {
        let events = RefCell::new(Vec::new());
        let sink = |e: Event| events.borrow_mut().push(e);
        let mut c = GraphController::new(sample()).with_event_sink(&sink);

        let err = c.add_choice(&"zz".into(), &"a".into(), "x").unwrap_err();
        assert!(matches!(err, Error::UnknownNode(_)));
        assert!(c.move_node(&"zz".into(), Pos2::ZERO).is_err());
        assert!(events.into_inner().is_empty());
    }

    #[test]
    fn test_remove_selected_node() {
        let events = RefCell::new(Vec::new());
        let sink = |e: Event| events.borrow_mut().push(e);
        let mut c = GraphController::new(sample())
            .with_selected(Some("a".into()))
            .with_event_sink(&sink);

        c.remove_node(&"a".into()).unwrap();

        assert!(c.selected().is_none());
        let events = events.into_inner();
        assert_eq!(
            events[0],
            Event::NodeDeselect(PayloadNodeDeselect { id: "a".into() })
        );
        assert_eq!(
            events[1],
            Event::NodeRemove(PayloadNodeRemove { id: "a".into() })
        );
        assert_eq!(last_snapshot(&events).node_count(), 1);
    }

    #[test]
    fn test_update_and_remove_choice() {
        let mut c = GraphController::new(sample());
        let choice = c.add_choice(&"a".into(), &"b".into(), "go").unwrap();

        c.update_node(&"a".into(), "Intro", "It was dark.").unwrap();
        c.remove_choice(&"a".into(), &choice).unwrap();

        let a = c.graph().node(&"a".into()).unwrap();
        assert_eq!(a.title, "Intro");
        assert_eq!(a.content, "It was dark.");
        assert!(a.choices.is_empty());
    }
}
