use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke};

use crate::radar::{Surface, arc_segments, polar_point};

impl Surface for Painter {
    fn fill_sector(
        &mut self,
        center: Pos2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        fill: Color32,
        stroke: Stroke,
    ) {
        let segments = arc_segments(end_angle - start_angle);
        let mut points = Vec::with_capacity(segments + 2);
        points.push(center);
        for step in 0..=segments {
            let t = step as f32 / segments as f32;
            let angle = start_angle + (end_angle - start_angle) * t;
            points.push(polar_point(center, radius, angle));
        }

        self.add(Shape::convex_polygon(points, fill, stroke));
    }

    fn draw_circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
        self.circle(center, radius, fill, stroke);
    }

    fn draw_label(&mut self, anchor: Pos2, text: &str, size: f32, color: Color32) {
        self.text(
            anchor,
            Align2::CENTER_BOTTOM,
            text,
            FontId::proportional(size),
            color,
        );
    }
}
