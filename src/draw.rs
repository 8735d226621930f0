use egui::{
    epaint::CubicBezierShape, Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke,
    StrokeKind, Vec2, Visuals,
};

use crate::edges::{box_entry_point, ResolvedEdge};
use crate::{SettingsStyle, StoryNode, Viewport};

const ARROW_ANGLE: f32 = std::f32::consts::TAU / 30.;
const ARROW_SIZE: f32 = 10.;
const LOOP_SIZE: f32 = 40.;
const LABEL_PADDING: Vec2 = Vec2::new(4., 2.);

/// Everything needed to paint one frame of the canvas.
pub struct DrawContext<'a> {
    pub painter: &'a Painter,
    /// Screen position of the canvas' top-left corner.
    pub origin: Pos2,
    pub viewport: &'a Viewport,
    pub style: &'a SettingsStyle,
    pub visuals: &'a Visuals,
}

impl DrawContext<'_> {
    pub fn to_screen(&self, logical: Pos2) -> Pos2 {
        self.origin + self.viewport.canvas_to_screen_pos(logical).to_vec2()
    }

    pub fn node_rect(&self, node: &StoryNode) -> Rect {
        Rect::from_min_size(
            self.to_screen(node.location()),
            self.viewport.canvas_to_screen_size(self.style.node_size),
        )
    }

    fn font(&self) -> FontId {
        FontId::proportional(self.style.label_size * self.viewport.zoom)
    }

    pub fn draw_edge(&self, e: &ResolvedEdge<'_>) {
        let stroke = Stroke::new(
            self.style.edge_width * self.viewport.zoom,
            self.visuals.widgets.noninteractive.fg_stroke.color,
        );

        if e.is_self_loop() {
            self.draw_loop(e, stroke);
            return;
        }

        let start = self.to_screen(e.start);
        let end = self.to_screen(e.end);
        let half = self.viewport.canvas_to_screen_size(self.style.node_size) / 2.;
        let tip = box_entry_point(end, half, start);

        self.painter.line_segment([start, tip], stroke);

        let dir = (tip - start).normalized();
        if dir != Vec2::ZERO {
            let size = ARROW_SIZE * self.viewport.zoom;
            let head_1 = tip - size * rotate_vector(dir, ARROW_ANGLE);
            let head_2 = tip - size * rotate_vector(dir, -ARROW_ANGLE);
            self.painter.line_segment([tip, head_1], stroke);
            self.painter.line_segment([tip, head_2], stroke);
        }

        self.draw_label(self.to_screen(e.label_pos()), &e.choice.text);
    }

    fn draw_loop(&self, e: &ResolvedEdge<'_>, stroke: Stroke) {
        let rect = self.node_rect(e.from);
        let size = LOOP_SIZE * self.viewport.zoom;
        let a = rect.center_top() - Vec2::new(rect.width() / 4., 0.);
        let b = rect.center_top() + Vec2::new(rect.width() / 4., 0.);

        self.painter.add(CubicBezierShape::from_points_stroke(
            [a, a - Vec2::new(0., size), b - Vec2::new(0., size), b],
            false,
            Color32::TRANSPARENT,
            stroke,
        ));

        self.draw_label(rect.center_top() - Vec2::new(0., size * 0.75), &e.choice.text);
    }

    fn draw_label(&self, center: Pos2, text: &str) {
        if text.is_empty() {
            return;
        }

        let galley = self
            .painter
            .layout_no_wrap(text.to_string(), self.font(), self.visuals.text_color());
        let rect = Rect::from_center_size(center, galley.size() + LABEL_PADDING * 2.);

        self.painter
            .rect_filled(rect, CornerRadius::same(3), self.visuals.extreme_bg_color);
        self.painter
            .galley(rect.min + LABEL_PADDING, galley, self.visuals.text_color());
    }

    pub fn draw_node(&self, node: &StoryNode, selected: bool, dragged: bool) {
        let rect = self.node_rect(node);
        let widgets = &self.visuals.widgets;

        let fill = if dragged {
            widgets.active.bg_fill
        } else {
            widgets.inactive.bg_fill
        };
        let stroke = if selected {
            Stroke::new(2. * self.viewport.zoom, self.visuals.selection.stroke.color)
        } else {
            widgets.inactive.bg_stroke
        };

        self.painter
            .rect(rect, CornerRadius::same(6), fill, stroke, StrokeKind::Outside);

        let clipped = self.painter.with_clip_rect(rect.shrink(2.));
        let pad = 6. * self.viewport.zoom;
        clipped.text(
            rect.left_top() + Vec2::splat(pad),
            Align2::LEFT_TOP,
            &node.title,
            self.font(),
            widgets.inactive.fg_stroke.color,
        );

        let preview = node.content.lines().next().unwrap_or_default();
        if !preview.is_empty() {
            clipped.text(
                rect.left_bottom() + Vec2::new(pad, -pad),
                Align2::LEFT_BOTTOM,
                preview,
                FontId::proportional(self.style.label_size * 0.85 * self.viewport.zoom),
                self.visuals.weak_text_color(),
            );
        }
    }
}

fn rotate_vector(vec: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * vec.x - sin * vec.y, sin * vec.x + cos * vec.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_vector_quarter_turn() {
        let v = rotate_vector(Vec2::new(1., 0.), std::f32::consts::FRAC_PI_2);
        assert!((v - Vec2::new(0., 1.)).length() < 1e-6);
    }
}
