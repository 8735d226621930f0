use egui::{Id, Ui};

use crate::{InteractionState, NodeId, Viewport};

const KEY_PREFIX: &str = "egui_story_graph_editor";

/// Draft of the add-choice form in the detail panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChoiceDraft {
    pub text: String,
    pub target: Option<NodeId>,
}

/// Ephemeral state of one editor instance.
///
/// Lives in egui's temporary memory keyed by the widget id: it survives between frames but is
/// never written to persisted storage and never handed to the host.
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    pub viewport: Viewport,
    pub interaction: InteractionState,
    pub selected: Option<NodeId>,
    pub choice_draft: ChoiceDraft,
}

impl EditorState {
    pub fn load(ui: &Ui, id: Id) -> Self {
        ui.data_mut(|data| data.get_temp::<Self>(id).unwrap_or_default())
    }

    pub fn save(self, ui: &Ui, id: Id) {
        ui.data_mut(|data| data.insert_temp(id, self));
    }
}

/// Memory key of the editor state, shared by every editor instance with the same custom id.
pub fn state_id(custom_id: Option<&str>) -> Id {
    Id::new(KEY_PREFIX).with(custom_id.unwrap_or_default())
}

/// Drops the stored state so the next frame starts with a reset viewport and no selection.
pub fn reset_state(ui: &Ui, custom_id: Option<&str>) {
    ui.data_mut(|data| data.remove::<EditorState>(state_id(custom_id)));
}
