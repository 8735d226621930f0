mod controller;
mod draw;
mod edges;
mod editor;
mod elements;
mod error;
mod graph;
mod interaction;
mod metadata;
mod settings;
mod validate;
mod viewport;

pub mod events;

pub use self::controller::GraphController;
pub use self::edges::{dangling_count, resolve_choice, resolve_edges, NodeLookup, ResolvedEdge};
pub use self::editor::BranchGraphEditor;
pub use self::elements::{Choice, ChoiceId, NodeId, StoryNode};
pub use self::error::{Error, Result};
pub use self::graph::{to_petgraph, StoryGraph};
pub use self::interaction::InteractionState;
pub use self::metadata::{reset_state, ChoiceDraft, EditorState};
pub use self::settings::{Settings, SettingsInteraction, SettingsNavigation, SettingsStyle};
pub use self::validate::{validate, DanglingChoice, Report};
pub use self::viewport::{Viewport, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
