mod choice;
mod node;

pub use self::choice::{Choice, ChoiceId};
pub use self::node::{NodeId, StoryNode};
