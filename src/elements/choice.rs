use std::fmt;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Identifier of a [`Choice`], unique within its owning node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(String);

impl ChoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChoiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A reader decision leading from one node to another.
///
/// `target_node_id` is a weak reference: the choice does not keep the target alive, and the
/// target may be missing from the graph. Such a choice is called dangling and is simply not
/// drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: ChoiceId,
    pub text: String,
    pub target_node_id: NodeId,
}

impl Choice {
    pub fn new(
        id: impl Into<ChoiceId>,
        text: impl Into<String>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            target_node_id: target.into(),
        }
    }
}

impl From<String> for ChoiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
