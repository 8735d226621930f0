use std::fmt;

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::{Choice, ChoiceId};

/// Opaque identifier of a [`StoryNode`], unique within one graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One story beat placed on the canvas.
///
/// `x` and `y` are logical canvas coordinates of the node's top-left corner and do not depend on
/// the current zoom.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl StoryNode {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::default(),
            x,
            y,
            choices: Vec::default(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn location(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn set_location(&mut self, loc: Pos2) {
        self.x = loc.x;
        self.y = loc.y;
    }

    /// Logical rectangle occupied by the node for the given node size.
    pub fn rect(&self, size: Vec2) -> Rect {
        Rect::from_min_size(self.location(), size)
    }

    /// Logical centre of the node, the anchor edges are drawn between.
    pub fn center(&self, size: Vec2) -> Pos2 {
        self.location() + size / 2.
    }

    pub fn choice(&self, id: &ChoiceId) -> Option<&Choice> {
        self.choices.iter().find(|c| &c.id == id)
    }

    /// Returns an id not yet used by any choice of this node.
    pub fn next_choice_id(&self) -> ChoiceId {
        let mut n = self.choices.len() + 1;
        loop {
            let candidate = ChoiceId::new(format!("{}-c{n}", self.id));
            if self.choice(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_offset_by_half_size() {
        let n = StoryNode::new("a", "A", 10., 20.);
        assert_eq!(n.center(Vec2::new(100., 40.)), Pos2::new(60., 40.));
    }

    #[test]
    fn test_next_choice_id_skips_taken() {
        let n = StoryNode::new("a", "A", 0., 0.)
            .with_choice(Choice::new("a-c2", "go", "b"))
            .with_choice(Choice::new("x", "stay", "a"));

        let id = n.next_choice_id();
        assert_eq!(id.as_str(), "a-c3");
        assert!(n.choice(&id).is_none());
    }
}
