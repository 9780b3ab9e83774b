use eframe::egui::{self, RichText, Ui};

use crate::board::{Chart, StrategicElement};
use crate::radar::MarkerId;

use super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_strategy(&mut self, ui: &mut Ui) {
        ui.heading("Strategic Elements");
        ui.separator();

        let Some(chart) = self.board.chart(&self.active_chart) else {
            return;
        };
        if chart.elements.is_empty() {
            ui.label("No strategic elements on this chart.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("strategy_scroll")
            .show(ui, |ui| {
                for (position, element) in chart.elements.iter().enumerate() {
                    draw_element(ui, chart, position, element, &mut clicked);
                }
            });

        if let Some(index) = clicked {
            self.open_item(MarkerId(index));
        }
    }
}

fn draw_element(
    ui: &mut Ui,
    chart: &Chart,
    position: usize,
    element: &StrategicElement,
    clicked: &mut Option<usize>,
) {
    let title = format!("{}  ({})", element.name, element.status_label());
    egui::CollapsingHeader::new(title)
        .id_salt(("strategic_element", element.id.as_deref(), position))
        .default_open(position == 0)
        .show(ui, |ui| {
            field(ui, "Diagnosis", &element.diagnosis);
            field(ui, "Overall approach", &element.overall_approach);
            field(ui, "Coherent actions", &element.set_of_coherent_actions);
            field(ui, "Proximate objectives", &element.proximate_objectives);
            ui.label(format!("Period: {}", element.period()));

            ui.horizontal_wrapped(|ui| {
                ui.label("Tags:");
                let tags = chart.resolve_tags(element);
                if tags.is_empty() {
                    ui.weak("none");
                }
                for tag in tags {
                    match tag.item {
                        Some(index) => {
                            if ui.link(tag.name).clicked() {
                                *clicked = Some(index);
                            }
                        }
                        None => {
                            ui.weak(tag.name)
                                .on_hover_text("No item on this chart has this name.");
                        }
                    }
                }
            });
        });
}

fn field(ui: &mut Ui, label: &str, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    ui.label(RichText::new(label).strong());
    ui.label(text);
}
