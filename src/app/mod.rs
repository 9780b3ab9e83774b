use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context};
use tracing::{error, info, warn};

use crate::board::{Board, BoardDirectory, BoardSource, load_board};
use crate::radar::{ChartRadius, InteractionController, MarkerId, RadarCanvas, Route};

mod chart;
mod navigation;
mod panels;
mod strategy;
mod surface;

use navigation::ChannelNavigator;

#[derive(Clone, Debug)]
pub struct ViewSettings {
    pub initial_chart: Option<String>,
    pub radius: ChartRadius,
    pub lookup_latency: Duration,
}

pub struct RadarBoardApp {
    source: BoardSource,
    settings: ViewSettings,
    state: AppState,
    reload_rx: Option<Receiver<Result<Board, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Board, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    board: Board,
    active_chart: String,
    snapshot_revision: u64,
    radius: ChartRadius,
    radius_px: f32,
    show_radar: bool,
    show_strategy: bool,
    search: String,
    selected: Option<usize>,
    canvas: RadarCanvas,
    controller: InteractionController,
    routes_rx: Receiver<Route>,
    last_route: Option<Route>,
    status: Option<String>,
}

impl RadarBoardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: BoardSource, settings: ViewSettings) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            settings,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: BoardSource) -> Receiver<Result<Board, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_board(&source).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: BoardSource) -> AppState {
        info!(%source, "loading radar board");
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready_state(board: Board, settings: &ViewSettings) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(board, settings)))
    }
}

impl eframe::App for RadarBoardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(board) => Self::ready_state(board, &self.settings),
                        Err(message) => {
                            error!(%message, "failed to load radar board");
                            AppState::Error(message)
                        }
                    });
                } else {
                    ctx.request_repaint_after(Duration::from_millis(50));
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading radar board...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load radar board");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!(source = %self.source, "reloading radar board");
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(board)) => {
                            let settings = ViewSettings {
                                initial_chart: Some(model.active_chart.clone()),
                                radius: model.radius,
                                ..self.settings.clone()
                            };
                            transition = Some(Self::ready_state(board, &settings));
                        }
                        Ok(Err(message)) => {
                            error!(%message, "failed to reload radar board");
                            transition = Some(AppState::Error(message));
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(Duration::from_millis(50));
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(board: Board, settings: &ViewSettings) -> Self {
        let lookup = Arc::new(BoardDirectory::new(&board, settings.lookup_latency));
        let (navigator, routes_rx) = ChannelNavigator::new();
        let controller = InteractionController::new(lookup, Box::new(navigator));

        let requested = settings
            .initial_chart
            .as_deref()
            .filter(|id| board.chart(id).is_some());
        if let Some(id) = settings.initial_chart.as_deref()
            && requested.is_none()
        {
            warn!(chart = id, "requested chart is not on the board; opening the first one");
        }
        let active_chart = requested
            .map(str::to_owned)
            .or_else(|| board.charts.first().map(|chart| chart.id.clone()))
            .unwrap_or_default();

        let mut model = Self {
            board,
            active_chart: String::new(),
            snapshot_revision: 0,
            radius: settings.radius,
            radius_px: settings.radius.get(),
            show_radar: true,
            show_strategy: true,
            search: String::new(),
            selected: None,
            canvas: RadarCanvas::default(),
            controller,
            routes_rx,
            last_route: None,
            status: None,
        };
        model.activate_chart(&active_chart);
        model
    }

    /// Switches the rendered snapshot. Every switch is a new revision, so the canvas
    /// rebuilds and the controller drops any hover session.
    fn activate_chart(&mut self, chart_id: &str) {
        let Some(chart) = self.board.chart(chart_id) else {
            warn!(chart = chart_id, "cannot open unknown chart");
            self.status = Some(format!("Chart {chart_id} is not on this board."));
            return;
        };

        let items = Arc::clone(&chart.items);
        info!(chart = chart_id, items = items.len(), "opening chart");

        self.active_chart = chart_id.to_owned();
        self.snapshot_revision += 1;
        self.selected = None;
        self.controller.set_snapshot(chart_id, items);
    }

    fn set_radius(&mut self, px: f32) {
        match ChartRadius::new(px) {
            Ok(radius) => self.radius = radius,
            Err(error) => warn!(%error, "ignoring invalid radius"),
        }
    }

    /// Marker and list clicks. An item without an id has no route, so its details open
    /// in place next to the error.
    fn open_item(&mut self, marker: MarkerId) {
        match self.controller.click(marker) {
            Ok(_) => self.status = None,
            Err(error) => {
                if self.controller.item(marker).is_some() {
                    self.selected = Some(marker.0);
                }
                self.status = Some(error.to_string());
            }
        }
    }

    /// Applies queued navigation intents. Returns whether any were applied.
    fn handle_routes(&mut self) -> bool {
        let mut applied = false;
        while let Ok(route) = self.routes_rx.try_recv() {
            applied = true;
            match &route {
                Route::Item { chart_id, item_id } => {
                    if chart_id != &self.active_chart {
                        self.activate_chart(chart_id);
                    }
                    self.selected = self
                        .board
                        .chart(&self.active_chart)
                        .and_then(|chart| chart.item_index(item_id));
                    if self.selected.is_none() {
                        warn!(%route, "navigated to an item that is not on the board");
                    }
                }
                Route::Chart { chart_id } => self.activate_chart(chart_id),
            }
            self.last_route = Some(route);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_model() -> ViewModel {
        let board = load_board(&BoardSource::Demo).unwrap();
        let settings = ViewSettings {
            initial_chart: Some("strategy".to_owned()),
            radius: ChartRadius::default(),
            lookup_latency: Duration::ZERO,
        };
        ViewModel::new(board, &settings)
    }

    #[test]
    fn item_without_id_opens_details_next_to_the_error() {
        let mut model = demo_model();
        let index = model
            .board
            .chart("strategy")
            .unwrap()
            .items
            .iter()
            .position(|item| item.id.is_none())
            .unwrap();

        model.open_item(MarkerId(index));

        assert_eq!(model.selected, Some(index));
        assert!(model.status.is_some());
        assert!(!model.handle_routes());
    }

    #[test]
    fn item_with_id_is_opened_through_its_route() {
        let mut model = demo_model();
        model.status = Some("stale".to_owned());

        model.open_item(MarkerId(0));
        assert!(model.handle_routes());

        assert_eq!(model.selected, Some(0));
        assert_eq!(model.status, None);
        assert_eq!(
            model.last_route.as_ref().map(Route::to_string).as_deref(),
            Some("/radar/strategy/items/s1")
        );
    }

    #[test]
    fn unknown_marker_selects_nothing() {
        let mut model = demo_model();
        model.open_item(MarkerId(999));
        assert_eq!(model.selected, None);
        assert!(model.status.is_some());
    }
}
