use eframe::egui::{self, Align, Context, Layout, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::board::BoardSource;
use crate::radar::{ChartRadius, Item, MarkerId, encode_color, level_label};

use super::ViewModel;

const MIN_RADIUS_PX: f32 = 80.0;
const MAX_RADIUS_PX: f32 = 420.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of the items whose name or description match `query`, best match first.
/// An empty query keeps every item in its original order.
fn filter_items(items: &[Item], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let name = fuzzy_match_score(&matcher, &item.name, query);
            let description = fuzzy_match_score(&matcher, &item.description, query);
            name.max(description).map(|score| (index, score))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(index, _)| index).collect()
}

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &BoardSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.handle_routes();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, source, reload_requested, is_loading));

        egui::SidePanel::left("charts")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_chart_list(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        if self.show_strategy {
            egui::TopBottomPanel::bottom("strategy")
                .resizable(true)
                .default_height(200.0)
                .show(ctx, |ui| self.draw_strategy(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading radar board...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else if self.show_radar {
                egui::ScrollArea::both().show(ui, |ui| self.draw_chart(ui));
            } else {
                self.controller.pointer_moved(None);
                ui.label("Radar hidden. Use \"Display radar\" to draw it.");
            }
        });

        // Intents emitted while drawing this frame (marker or list clicks).
        if self.handle_routes() {
            ctx.request_repaint();
        }
    }

    fn draw_top_bar(
        &mut self,
        ui: &mut Ui,
        source: &BoardSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        ui.horizontal(|ui| {
            ui.heading("radar-board");
            ui.separator();
            ui.label(format!("board: {source}"));
            ui.label(format!("charts: {}", self.board.chart_count()));
            ui.label(format!("items: {}", self.board.item_count()));
            ui.label(format!("strategic elements: {}", self.board.element_count()));
            ui.separator();
            ui.checkbox(&mut self.show_radar, "Display radar");
            ui.checkbox(&mut self.show_strategy, "Strategy");

            let slider = ui.add(
                egui::Slider::new(&mut self.radius_px, MIN_RADIUS_PX..=MAX_RADIUS_PX)
                    .text("radius"),
            );
            if slider.changed() {
                self.set_radius(self.radius_px);
            }
            if ui.button("Reset").clicked() {
                self.radius_px = ChartRadius::DEFAULT_PX;
                self.set_radius(self.radius_px);
            }

            let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload board"));
            if reload_button.clicked() {
                *reload_requested = true;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if let Some(route) = &self.last_route {
                    ui.monospace(route.to_string());
                }
            });
        });
    }

    fn draw_chart_list(&mut self, ui: &mut Ui) {
        ui.heading("Charts");
        ui.separator();

        let mut requested = None;
        for chart in &self.board.charts {
            let is_active = chart.id == self.active_chart;
            let label = format!("{}  ({} items)", chart.name, chart.items.len());
            if ui.selectable_label(is_active, label).clicked() && !is_active {
                requested = Some(chart.id.clone());
            }
        }
        if let Some(chart_id) = requested {
            self.activate_chart(&chart_id);
        }

        ui.add_space(8.0);
        ui.heading("Items");
        ui.separator();
        ui.label("Search")
            .on_hover_text("Fuzzy-filter items of the open chart by name or description.");
        ui.text_edit_singleline(&mut self.search);
        ui.add_space(4.0);

        let Some(chart) = self.board.chart(&self.active_chart) else {
            return;
        };
        let matches = filter_items(&chart.items, &self.search);
        if matches.is_empty() {
            ui.label("No items match the search.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for index in matches {
                let item = &chart.items[index];
                let swatch = RichText::new("●").color(encode_color(item.impact.as_ref()));
                ui.horizontal(|ui| {
                    ui.label(swatch);
                    let label = format!("{}  [{} / {}]", item.name, item.category, item.distance);
                    if ui
                        .selectable_label(self.selected == Some(index), label)
                        .clicked()
                    {
                        clicked = Some(index);
                    }
                });
            }
        });

        if let Some(index) = clicked {
            self.open_item(MarkerId(index));
        }
    }

    fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Item Details");
        ui.add_space(6.0);

        if let Some(status) = &self.status {
            ui.colored_label(ui.visuals().warn_fg_color, status.as_str());
            ui.add_space(6.0);
        }

        let Some(index) = self.selected else {
            ui.label("Click a marker or an item to open its details.");
            return;
        };
        let Some(item) = self
            .board
            .chart(&self.active_chart)
            .and_then(|chart| chart.items.get(index))
        else {
            ui.label("Selected item no longer exists on this chart.");
            return;
        };

        ui.label(RichText::new(item.name.as_str()).strong());
        if let Some(id) = &item.id {
            ui.small(format!("id: {id}"));
        }
        ui.add_space(6.0);
        if !item.description.is_empty() {
            ui.label(item.description.as_str());
            ui.add_space(6.0);
        }

        ui.label(format!("Type: {}", item.kind.label()));
        ui.label(format!("Category: {}", item.category));
        ui.label(format!("Distance: {}", item.distance));
        ui.label(format!("Impact: {}", level_label(item.impact.as_ref())));
        ui.label(format!("Cost: {}", level_label(item.cost.as_ref())));

        ui.separator();
        let Some(target) = item.cross_reference.clone() else {
            ui.label("No cross-reference selected.");
            return;
        };

        let target_name = self
            .board
            .chart(&target)
            .map(|chart| chart.name.clone());
        match target_name {
            Some(name) => {
                if ui.button(format!("Zoom into {name}")).clicked()
                    && let Err(error) = self.controller.zoom_into(MarkerId(index))
                {
                    self.status = Some(error.to_string());
                }
            }
            None => {
                ui.label(format!("Links to chart {target}, which is not on this board."));
            }
        }
    }
}
