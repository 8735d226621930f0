use egui::{Pos2, Vec2};

use crate::{NodeId, StoryNode, Viewport};

/// Ephemeral pointer interaction of the editor.
///
/// There is exactly one slot: at most one node is dragged at a time, and a pan gesture never
/// overlaps a drag. Pointer positions are canvas-local screen coordinates (origin at the
/// canvas' top-left corner).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A node follows the pointer. `offset` is the pointer position relative to the node's
    /// screen anchor at grab time, so the node does not jump under the pointer.
    Dragging { node_id: NodeId, offset: Vec2 },
    /// The background is dragged and the viewport pan follows.
    Panning { last: Pos2 },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn dragged_node(&self) -> Option<&NodeId> {
        match self {
            Self::Dragging { node_id, .. } => Some(node_id),
            _ => None,
        }
    }

    /// Idle -> Dragging. Ignored while any gesture is active.
    ///
    /// Returns true when the drag started.
    pub fn pointer_down(&mut self, node: &StoryNode, pointer: Pos2, vp: &Viewport) -> bool {
        if !self.is_idle() {
            return false;
        }

        let anchor = vp.canvas_to_screen_pos(node.location());
        *self = Self::Dragging {
            node_id: node.id.clone(),
            offset: pointer - anchor,
        };
        log::trace!("drag start {}", node.id);
        true
    }

    /// Idle -> Panning. Ignored while any gesture is active.
    pub fn pan_start(&mut self, pointer: Pos2) -> bool {
        if !self.is_idle() {
            return false;
        }

        *self = Self::Panning { last: pointer };
        true
    }

    /// Computes the dragged node's new logical location for the pointer position.
    ///
    /// The result is `((pointer - offset) - pan) / zoom`, hence a screen delta translates to a
    /// logical delta of `screen_delta / zoom`. Returns `None` unless dragging.
    pub fn pointer_move(&self, pointer: Pos2, vp: &Viewport) -> Option<(NodeId, Pos2)> {
        match self {
            Self::Dragging { node_id, offset } => {
                let anchor = pointer - *offset;
                Some((node_id.clone(), vp.screen_to_canvas_pos(anchor)))
            }
            _ => None,
        }
    }

    /// Advances a pan gesture, returning the screen delta to apply to the viewport.
    pub fn pan_move(&mut self, pointer: Pos2) -> Option<Vec2> {
        match self {
            Self::Panning { last } => {
                let delta = pointer - *last;
                *last = pointer;
                Some(delta)
            }
            _ => None,
        }
    }

    /// Any gesture -> Idle. Returns the node that was being dragged, if any.
    pub fn pointer_up(&mut self) -> Option<NodeId> {
        match std::mem::take(self) {
            Self::Dragging { node_id, .. } => {
                log::trace!("drag end {node_id}");
                Some(node_id)
            }
            _ => None,
        }
    }

    /// Same as [`InteractionState::pointer_up`]: leaving the canvas mid-gesture cancels it
    /// without moving the node any further.
    pub fn pointer_leave(&mut self) -> Option<NodeId> {
        self.pointer_up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f32, y: f32) -> StoryNode {
        StoryNode::new("n", "N", x, y)
    }

    #[test]
    fn test_drag_grabbed_at_anchor() {
        let vp = Viewport::default();
        let n = node_at(100., 100.);
        let mut s = InteractionState::default();

        assert!(s.pointer_down(&n, Pos2::new(100., 100.), &vp));
        let (id, loc) = s.pointer_move(Pos2::new(150., 130.), &vp).unwrap();

        assert_eq!(id, n.id);
        assert_eq!(loc, Pos2::new(150., 130.));
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let vp = Viewport::default();
        let n = node_at(100., 100.);
        let mut s = InteractionState::default();

        s.pointer_down(&n, Pos2::new(120., 110.), &vp);
        assert_eq!(
            s.pointer_move(Pos2::new(120., 110.), &vp).unwrap().1,
            Pos2::new(100., 100.)
        );
        assert_eq!(
            s.pointer_move(Pos2::new(130., 150.), &vp).unwrap().1,
            Pos2::new(110., 140.)
        );
    }

    #[test]
    fn test_drag_delta_scaled_by_zoom() {
        let vp = Viewport {
            x: 20.,
            y: -20.,
            zoom: 2.,
        };
        let n = node_at(50., 50.);
        let mut s = InteractionState::default();

        let grab = vp.canvas_to_screen_pos(n.location()) + Vec2::new(7., 3.);
        s.pointer_down(&n, grab, &vp);
        let (_, loc) = s.pointer_move(grab + Vec2::new(40., -10.), &vp).unwrap();

        assert_eq!(loc, Pos2::new(70., 45.));
    }

    #[test]
    fn test_no_move_after_pointer_up() {
        let vp = Viewport::default();
        let n = node_at(0., 0.);
        let mut s = InteractionState::default();

        s.pointer_down(&n, Pos2::ZERO, &vp);
        assert_eq!(s.pointer_up(), Some(n.id.clone()));
        assert!(s.is_idle());
        assert!(s.pointer_move(Pos2::new(10., 10.), &vp).is_none());
    }

    #[test]
    fn test_pointer_leave_cancels() {
        let vp = Viewport::default();
        let n = node_at(0., 0.);
        let mut s = InteractionState::default();

        s.pointer_down(&n, Pos2::ZERO, &vp);
        assert_eq!(s.pointer_leave(), Some(n.id));
        assert_eq!(s, InteractionState::Idle);
        assert_eq!(s.pointer_leave(), None);
    }

    #[test]
    fn test_single_active_drag() {
        let vp = Viewport::default();
        let a = StoryNode::new("a", "A", 0., 0.);
        let b = StoryNode::new("b", "B", 300., 0.);
        let mut s = InteractionState::default();

        assert!(s.pointer_down(&a, Pos2::ZERO, &vp));
        assert!(!s.pointer_down(&b, Pos2::new(300., 0.), &vp));
        assert_eq!(s.dragged_node(), Some(&a.id));
    }

    #[test]
    fn test_pan_gesture() {
        let mut s = InteractionState::default();
        assert!(s.pan_start(Pos2::new(10., 10.)));
        assert_eq!(s.pan_move(Pos2::new(15., 5.)), Some(Vec2::new(5., -5.)));
        assert_eq!(s.pan_move(Pos2::new(15., 8.)), Some(Vec2::new(0., 3.)));
        assert_eq!(s.pointer_up(), None);
        assert!(s.pan_move(Pos2::new(0., 0.)).is_none());
    }
}
