use serde::{Deserialize, Serialize};

use crate::{ChoiceId, NodeId, StoryGraph};

/// Full snapshot after a mutation. Hosts replace their copy with `nodes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodesChange {
    pub nodes: StoryGraph,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeSelect {
    pub id: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDeselect {
    pub id: NodeId,
}

/// A node was created from a canvas click at logical coordinates `x`, `y`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeAdd {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeMove {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragStart {
    pub id: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragEnd {
    pub id: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeUpdate {
    pub id: NodeId,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeRemove {
    pub id: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadChoiceAdd {
    pub from: NodeId,
    pub to: NodeId,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadChoiceRemove {
    pub node: NodeId,
    pub choice: ChoiceId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadPan {
    pub diff: [f32; 2],
    pub new_pan: [f32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadZoom {
    pub new_zoom: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    NodesChange(PayloadNodesChange),
    NodeSelect(PayloadNodeSelect),
    NodeDeselect(PayloadNodeDeselect),
    NodeAdd(PayloadNodeAdd),
    NodeMove(PayloadNodeMove),
    NodeDragStart(PayloadNodeDragStart),
    NodeDragEnd(PayloadNodeDragEnd),
    NodeUpdate(PayloadNodeUpdate),
    NodeRemove(PayloadNodeRemove),
    ChoiceAdd(PayloadChoiceAdd),
    ChoiceRemove(PayloadChoiceRemove),
    Pan(PayloadPan),
    Zoom(PayloadZoom),
}
