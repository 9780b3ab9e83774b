use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Color32, FontId, Id, LayerId, Order, Pos2, Rect, Sense, Ui, vec2};

use crate::radar::Tooltip;

use super::ViewModel;

const TOOLTIP_PADDING: f32 = 8.0;
const TOOLTIP_OFFSET: f32 = 16.0;
const TOOLTIP_WRAP_WIDTH: f32 = 260.0;
const LOOKUP_POLL_INTERVAL: Duration = Duration::from_millis(30);

impl ViewModel {
    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let Some(items) = self
            .board
            .chart(&self.active_chart)
            .map(|chart| Arc::clone(&chart.items))
        else {
            ui.label("No chart selected.");
            return;
        };

        self.canvas.sync(self.snapshot_revision, &items, self.radius);
        let Some(scene) = self.canvas.scene() else {
            return;
        };

        let side = scene.extent() * 2.0;
        let (rect, response) = ui.allocate_exact_size(vec2(side, side), Sense::click());
        let mut painter = ui.painter_at(rect);
        let origin = rect.center();

        let hovered = response
            .hover_pos()
            .and_then(|pointer| scene.hit_test(pointer - origin));
        self.controller.pointer_moved(hovered);

        if self.controller.poll() || self.controller.in_flight() > 0 {
            ui.ctx().request_repaint_after(LOOKUP_POLL_INTERVAL);
        }

        scene.paint(&mut painter, origin, self.controller.hovered());

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.clicked()
            && let Some(marker) = hovered
        {
            self.open_item(marker);
        }

        if let Some(tooltip) = self.controller.tooltip()
            && let Some(pointer) = response.hover_pos()
        {
            let layer = LayerId::new(Order::Tooltip, Id::new("radar_tooltip"));
            draw_tooltip(&ui.ctx().layer_painter(layer), pointer, tooltip);
        }
    }
}

fn draw_tooltip(painter: &egui::Painter, pointer: Pos2, tooltip: &Tooltip) {
    let text = tooltip.lines().join("\n");
    let galley = painter.layout(
        text,
        FontId::proportional(12.0),
        Color32::from_gray(238),
        TOOLTIP_WRAP_WIDTH,
    );

    let min = pointer + vec2(TOOLTIP_OFFSET, TOOLTIP_OFFSET);
    let rect = Rect::from_min_size(min, galley.size() + vec2(TOOLTIP_PADDING, TOOLTIP_PADDING) * 2.0);
    painter.rect_filled(rect, 4.0, Color32::from_rgba_unmultiplied(24, 28, 34, 235));
    painter.galley(
        min + vec2(TOOLTIP_PADDING, TOOLTIP_PADDING),
        galley,
        Color32::from_gray(238),
    );
}
