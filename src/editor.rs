use egui::{
    Align, Align2, Button, ComboBox, CornerRadius, FontId, Id, Layout, Pos2, Rect, Response,
    ScrollArea, Sense, TextEdit, Ui, UiBuilder, Vec2, Widget,
};

use crate::controller::GraphController;
use crate::draw::DrawContext;
use crate::edges::resolve_edges;
use crate::error::Result;
use crate::events::{
    Event, EventSink, PayloadNodeDragEnd, PayloadNodeDragStart, PayloadPan, PayloadZoom,
};
use crate::metadata::{reset_state, state_id, ChoiceDraft, EditorState};
use crate::settings::{Settings, SettingsInteraction, SettingsNavigation, SettingsStyle};
use crate::validate::validate;
use crate::{InteractionState, NodeId, StoryGraph, StoryNode, Viewport};

const CONTROLS_SIZE: Vec2 = Vec2::new(150., 24.);
const CONTROLS_MARGIN: f32 = 6.;
const PANEL_MARGIN: f32 = 8.;

/// Widget for editing the branch structure of a story.
///
/// It implements [`egui::Widget`] and is added with `ui.add(&mut editor)`.
///
/// The editor renders the [`StoryGraph`] it is given but never changes it. Every edit (moving,
/// adding or deleting nodes, editing text, adding or removing choices) is reported to the
/// [`EventSink`] supplied with [`BranchGraphEditor::with_event_sink`], ending with an
/// [`Event::NodesChange`] that carries the complete new snapshot. The host is expected to
/// replace its graph with that snapshot; if it does not, the next frame shows the old graph
/// again.
///
/// Viewport, drag gesture and selection are ephemeral editor state kept in egui memory under
/// the id given with [`BranchGraphEditor::with_id`].
pub struct BranchGraphEditor<'a> {
    graph: &'a StoryGraph,

    settings_interaction: SettingsInteraction,
    settings_navigation: SettingsNavigation,
    settings_style: SettingsStyle,

    custom_id: Option<String>,

    events_sink: Option<&'a dyn EventSink>,
}

impl Widget for &mut BranchGraphEditor<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let key = state_id(self.custom_id.as_deref());
        let mut state = EditorState::load(ui, key);
        self.sync_state(&mut state);

        let mut controller =
            GraphController::new(self.graph.clone()).with_selected(state.selected.clone());
        if let Some(sink) = self.events_sink {
            controller = controller.with_event_sink(sink);
        }

        let (resp, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        self.canvas_input(ui, &resp, &mut state, &mut controller);
        apply_selection(&mut state, &controller);

        // The detail panel overlays the right edge of the canvas, so the canvas keeps its size
        // and the panel shows up in the same frame the selection changes.
        let panel = state
            .selected
            .clone()
            .map(|id| (id, self.panel_rect(resp.rect)));
        let visible = panel.as_ref().map_or(resp.rect, |(_, rect)| {
            Rect::from_min_max(resp.rect.min, Pos2::new(rect.left(), resp.rect.bottom()))
        });

        self.draw(ui, &painter, &resp, &state, controller.graph());
        self.zoom_controls(ui, visible, &mut state.viewport);
        if let Some((id, rect)) = panel {
            self.detail_panel(ui, rect, &resp, &id, &mut state, &mut controller);
            apply_selection(&mut state, &controller);
        }

        state.save(ui, key);

        resp
    }
}

impl<'a> BranchGraphEditor<'a> {
    /// Creates an editor over `graph` with default settings and no event sink.
    pub fn new(graph: &'a StoryGraph) -> Self {
        Self {
            graph,

            settings_interaction: SettingsInteraction::default(),
            settings_navigation: SettingsNavigation::default(),
            settings_style: SettingsStyle::default(),

            custom_id: None,

            events_sink: None,
        }
    }

    /// Supply a sink that receives every editor event.
    /// Works with closures `Fn(Event)`, `crossbeam::channel::Sender<Event>` (feature `channel`)
    /// or custom implementations.
    pub fn with_event_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.events_sink = Some(sink);
        self
    }

    pub fn with_interactions(mut self, settings_interaction: &SettingsInteraction) -> Self {
        self.settings_interaction = settings_interaction.clone();
        self
    }

    pub fn with_navigations(mut self, settings_navigation: &SettingsNavigation) -> Self {
        self.settings_navigation = settings_navigation.clone();
        self
    }

    pub fn with_styles(mut self, settings_style: &SettingsStyle) -> Self {
        self.settings_style = settings_style.clone();
        self
    }

    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_interactions(&settings.interaction)
            .with_navigations(&settings.navigation)
            .with_styles(&settings.style)
    }

    /// Sets a custom id for the editor state. Useful when several editors live in the same UI
    /// and should keep separate viewports and selections.
    pub fn with_id(mut self, custom_id: Option<String>) -> Self {
        self.custom_id = custom_id;
        self
    }

    /// Forgets viewport, selection and any gesture of the editor with the given custom id.
    pub fn reset_state(ui: &Ui, custom_id: Option<&str>) {
        reset_state(ui, custom_id);
    }

    /// Drops state that refers to nodes the host removed since the last frame.
    fn sync_state(&self, state: &mut EditorState) {
        if let Some(id) = &state.selected {
            if !self.graph.contains(id) {
                log::debug!("selected node {id} is gone");
                state.selected = None;
                state.choice_draft = ChoiceDraft::default();
            }
        }

        if let Some(id) = state.interaction.dragged_node() {
            if !self.graph.contains(id) {
                log::debug!("dragged node {id} is gone");
                state.interaction.pointer_leave();
            }
        }
    }

    /// Handles pointer input of the canvas and its nodes.
    fn canvas_input(
        &self,
        ui: &Ui,
        resp: &Response,
        state: &mut EditorState,
        controller: &mut GraphController<'_>,
    ) {
        let origin = resp.rect.min;

        // Nodes are separate interactive widgets allocated after the canvas, so they sit on top
        // of it and the canvas only sees clicks and drags that hit the background.
        let node_size = state.viewport.canvas_to_screen_size(self.settings_style.node_size);
        let node_resps: Vec<(&StoryNode, Response)> = self
            .graph
            .nodes()
            .iter()
            .filter_map(|n| {
                let rect = Rect::from_min_size(
                    origin + state.viewport.canvas_to_screen_pos(n.location()).to_vec2(),
                    node_size,
                );
                let hit = rect.intersect(resp.rect);
                if !hit.is_positive() {
                    return None;
                }
                let r = ui.interact(hit, resp.id.with(&n.id), Sense::click_and_drag());
                Some((n, r))
            })
            .collect();

        for (node, r) in &node_resps {
            self.handle_node(ui, origin, node, r, state, controller);
        }
        self.handle_pointer_leave(ui, resp, state);
        self.handle_background(ui, resp, state, controller);
        self.handle_scroll_zoom(ui, resp, &mut state.viewport);
    }

    fn panel_rect(&self, canvas: Rect) -> Rect {
        let width = self.settings_style.detail_panel_width.min(canvas.width());
        Rect::from_min_max(Pos2::new(canvas.right() - width, canvas.top()), canvas.max)
    }

    fn handle_node(
        &self,
        ui: &Ui,
        origin: Pos2,
        node: &StoryNode,
        r: &Response,
        state: &mut EditorState,
        controller: &mut GraphController<'_>,
    ) {
        if self.settings_interaction.dragging_enabled {
            if r.drag_started() {
                let press = ui.input(|i| i.pointer.press_origin());
                if let Some(pos) = press.or_else(|| r.interact_pointer_pos()) {
                    let local = to_local(origin, pos);
                    if state.interaction.pointer_down(node, local, &state.viewport) {
                        self.publish(Event::NodeDragStart(PayloadNodeDragStart {
                            id: node.id.clone(),
                        }));
                    }
                }
            }

            if r.dragged() && state.interaction.dragged_node() == Some(&node.id) {
                if let Some(pos) = r.interact_pointer_pos() {
                    let moved = state
                        .interaction
                        .pointer_move(to_local(origin, pos), &state.viewport);
                    if let Some((id, loc)) = moved {
                        if loc != node.location() {
                            warn_on_err(controller.move_node(&id, loc));
                        }
                    }
                }
            }

            if r.drag_stopped() && state.interaction.dragged_node() == Some(&node.id) {
                if let Some(id) = state.interaction.pointer_up() {
                    self.publish(Event::NodeDragEnd(PayloadNodeDragEnd { id }));
                }
            }
        }

        if r.clicked() && self.settings_interaction.node_selection_enabled {
            let target = if controller.selected() == Some(&node.id) {
                None
            } else {
                Some(&node.id)
            };
            warn_on_err(controller.select_node(target));
        }
    }

    /// Ends a drag when the pointer leaves the canvas or the button is released while the
    /// node widget did not report it.
    fn handle_pointer_leave(&self, ui: &Ui, resp: &Response, state: &mut EditorState) {
        if state.interaction.is_idle() {
            return;
        }

        let (hover, down) = ui.input(|i| (i.pointer.hover_pos(), i.pointer.any_down()));
        let inside = hover.is_some_and(|p| resp.rect.contains(p));
        if inside && down {
            return;
        }

        if let Some(id) = state.interaction.pointer_leave() {
            self.publish(Event::NodeDragEnd(PayloadNodeDragEnd { id }));
        }
    }

    fn handle_background(
        &self,
        ui: &Ui,
        resp: &Response,
        state: &mut EditorState,
        controller: &mut GraphController<'_>,
    ) {
        let origin = resp.rect.min;

        if resp.clicked() {
            if let Some(pos) = resp.interact_pointer_pos() {
                warn_on_err(controller.select_node(None));

                if self.settings_interaction.node_adding_enabled {
                    let logical = state.viewport.screen_to_canvas_pos(to_local(origin, pos));
                    controller.add_node(logical.x, logical.y);
                }
            }
        }

        if !self.settings_interaction.panning_enabled {
            return;
        }

        if resp.drag_started() {
            let press = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = press.or_else(|| resp.interact_pointer_pos()) {
                state.interaction.pan_start(to_local(origin, pos));
            }
        }

        if resp.dragged() {
            if let Some(pos) = resp.interact_pointer_pos() {
                if let Some(delta) = state.interaction.pan_move(to_local(origin, pos)) {
                    if delta != Vec2::ZERO {
                        state.viewport.pan_by(delta);
                        self.publish(Event::Pan(PayloadPan {
                            diff: delta.into(),
                            new_pan: state.viewport.pan().into(),
                        }));
                    }
                }
            }
        }

        if resp.drag_stopped() && matches!(state.interaction, InteractionState::Panning { .. }) {
            state.interaction.pointer_up();
        }
    }

    fn handle_scroll_zoom(&self, ui: &Ui, resp: &Response, vp: &mut Viewport) {
        if !self.settings_navigation.scroll_zoom_enabled || !resp.hovered() {
            return;
        }

        let delta = ui.input(egui::InputState::zoom_delta);
        if delta == 1. {
            return;
        }

        let Some(pos) = resp.hover_pos() else {
            return;
        };

        let nav = &self.settings_navigation;
        let step = nav.zoom_step * (delta - 1.).signum();
        let before = *vp;
        vp.zoom_by_at(step, nav.zoom_min, nav.zoom_max, to_local(resp.rect.min, pos));
        self.publish_viewport_change(&before, vp);
    }

    /// Zoom buttons in the top-right corner of `area`.
    fn zoom_controls(&self, ui: &mut Ui, area: Rect, vp: &mut Viewport) {
        if !self.settings_navigation.zoom_controls_enabled {
            return;
        }

        let rect = Rect::from_min_size(
            area.right_top() + Vec2::new(-CONTROLS_SIZE.x - CONTROLS_MARGIN, CONTROLS_MARGIN),
            CONTROLS_SIZE,
        );
        let mut controls = ui.new_child(
            UiBuilder::new()
                .max_rect(rect)
                .layout(Layout::right_to_left(Align::TOP)),
        );

        let nav = &self.settings_navigation;
        let before = *vp;
        if controls.button("Reset").clicked() {
            vp.reset();
        }
        if controls.button("-").clicked() {
            vp.zoom_by(-nav.zoom_step, nav.zoom_min, nav.zoom_max);
        }
        if controls.button("+").clicked() {
            vp.zoom_by(nav.zoom_step, nav.zoom_min, nav.zoom_max);
        }
        controls.label(format!("{:.0}%", vp.zoom * 100.));

        self.publish_viewport_change(&before, vp);
    }

    fn publish_viewport_change(&self, before: &Viewport, after: &Viewport) {
        if after.zoom != before.zoom {
            self.publish(Event::Zoom(PayloadZoom {
                new_zoom: after.zoom,
            }));
        }
        if after.pan() != before.pan() {
            self.publish(Event::Pan(PayloadPan {
                diff: (after.pan() - before.pan()).into(),
                new_pan: after.pan().into(),
            }));
        }
    }

    fn draw(
        &self,
        ui: &Ui,
        painter: &egui::Painter,
        resp: &Response,
        state: &EditorState,
        graph: &StoryGraph,
    ) {
        let ctx = DrawContext {
            painter,
            origin: resp.rect.min,
            viewport: &state.viewport,
            style: &self.settings_style,
            visuals: ui.visuals(),
        };

        painter.rect_filled(resp.rect, CornerRadius::ZERO, ui.visuals().faint_bg_color);

        for e in resolve_edges(graph.nodes(), self.settings_style.node_size) {
            ctx.draw_edge(&e);
        }

        let selected = state.selected.as_ref();
        let dragged = state.interaction.dragged_node();
        for n in graph.nodes() {
            ctx.draw_node(n, selected == Some(&n.id), dragged == Some(&n.id));
        }

        if self.settings_style.diagnostics_shown {
            painter.text(
                resp.rect.left_bottom() + Vec2::new(CONTROLS_MARGIN, -CONTROLS_MARGIN),
                Align2::LEFT_BOTTOM,
                validate(graph, None).summary(),
                FontId::proportional(12.),
                ui.visuals().weak_text_color(),
            );
        }
    }

    fn detail_panel(
        &self,
        ui: &mut Ui,
        rect: Rect,
        canvas: &Response,
        id: &NodeId,
        state: &mut EditorState,
        controller: &mut GraphController<'_>,
    ) {
        let graph = controller.graph().clone();
        let Some(node) = graph.node(id) else {
            return;
        };

        // Swallows clicks and drags on the panel background so they never reach the canvas.
        ui.interact(rect, canvas.id.with("detail_panel"), Sense::click_and_drag());

        let visuals = ui.visuals();
        ui.painter().rect_filled(rect, CornerRadius::ZERO, visuals.panel_fill);
        ui.painter().vline(
            rect.left(),
            rect.y_range(),
            visuals.widgets.noninteractive.bg_stroke,
        );

        let mut panel = ui.new_child(
            UiBuilder::new()
                .max_rect(rect.shrink(PANEL_MARGIN))
                .layout(Layout::top_down(Align::Min)),
        );
        panel.vertical(|ui| {
            ScrollArea::vertical()
                .id_salt(Id::new("story_detail").with(id))
                .show(ui, |ui| {
                    ui.heading("Scene");

                    let mut title = node.title.clone();
                    let mut content = node.content.clone();
                    let title_changed = ui.text_edit_singleline(&mut title).changed();
                    let content_changed = ui
                        .add(TextEdit::multiline(&mut content).desired_rows(4))
                        .changed();
                    if title_changed || content_changed {
                        warn_on_err(controller.update_node(id, &title, &content));
                    }

                    ui.separator();
                    ui.label("Choices");

                    let mut removed = None;
                    for choice in &node.choices {
                        ui.horizontal(|ui| {
                            ui.label(&choice.text);
                            ui.label("->");
                            match graph.node(&choice.target_node_id) {
                                Some(target) => ui.label(&target.title),
                                None => ui.weak("no connection"),
                            };
                            if ui.small_button("x").clicked() {
                                removed = Some(choice.id.clone());
                            }
                        });
                    }
                    if let Some(choice) = removed {
                        warn_on_err(controller.remove_choice(id, &choice));
                    }

                    ui.add_space(4.);
                    self.choice_form(ui, id, &graph, &mut state.choice_draft, controller);

                    ui.separator();
                    if ui.button("Delete scene").clicked() {
                        warn_on_err(controller.remove_node(id));
                    }
                });
        });
    }

    fn choice_form(
        &self,
        ui: &mut Ui,
        from: &NodeId,
        graph: &StoryGraph,
        draft: &mut ChoiceDraft,
        controller: &mut GraphController<'_>,
    ) {
        ui.add(TextEdit::singleline(&mut draft.text).hint_text("Choice text"));

        let selected_text = draft
            .target
            .as_ref()
            .and_then(|t| graph.node(t))
            .map_or_else(|| "Target scene".to_string(), |n| n.title.clone());
        ComboBox::from_id_salt(Id::new("story_choice_target").with(from))
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for n in graph.nodes() {
                    ui.selectable_value(&mut draft.target, Some(n.id.clone()), &n.title);
                }
            });

        let ready = !draft.text.trim().is_empty() && draft.target.is_some();
        if ui.add_enabled(ready, Button::new("Add choice")).clicked() {
            if let Some(to) = draft.target.take() {
                warn_on_err(controller.add_choice(from, &to, draft.text.trim()).map(|_| ()));
                draft.text.clear();
            }
        }
    }

    fn publish(&self, event: Event) {
        if let Some(sink) = self.events_sink {
            sink.send(event);
        }
    }
}

/// Takes over the controller's selection, dropping the choice draft when it changed.
fn apply_selection(state: &mut EditorState, controller: &GraphController<'_>) {
    let selected = controller.selected().cloned();
    if selected != state.selected {
        state.choice_draft = ChoiceDraft::default();
    }
    state.selected = selected;
}

fn to_local(origin: Pos2, pos: Pos2) -> Pos2 {
    (pos - origin).to_pos2()
}

fn warn_on_err(res: Result<()>) {
    if let Err(err) = res {
        log::warn!("story graph edit ignored: {err}");
    }
}
