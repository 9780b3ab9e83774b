use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::{debug, info, warn};

use super::error::{InteractionError, LookupError};
use super::item::{Item, level_label};
use super::layout::MarkerId;

pub const NO_CROSS_REFERENCE_TEXT: &str = "No cross-reference selected";
pub const LOOKUP_PENDING_TEXT: &str = "Resolving linked chart...";
pub const LOOKUP_FAILED_TEXT: &str = "Unknown chart";

/// Resolves a chart id to its display name. Called from a worker thread.
pub trait EntityLookup: Send + Sync {
    fn lookup_name(&self, id: &str) -> Result<String, LookupError>;
}

pub trait Navigator {
    fn navigate_to(&self, route: Route);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Item { chart_id: String, item_id: String },
    Chart { chart_id: String },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item { chart_id, item_id } => write!(f, "/radar/{chart_id}/items/{item_id}"),
            Self::Chart { chart_id } => write!(f, "/radar/{chart_id}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CrossReference {
    NotSelected,
    Pending { chart_id: String },
    Resolved { chart_id: String, name: String },
    Failed { chart_id: String },
}

impl CrossReference {
    pub fn text(&self) -> String {
        match self {
            Self::NotSelected => NO_CROSS_REFERENCE_TEXT.to_owned(),
            Self::Pending { .. } => LOOKUP_PENDING_TEXT.to_owned(),
            Self::Resolved { name, .. } => format!("Zooms into: {name}"),
            Self::Failed { .. } => format!("Zooms into: {LOOKUP_FAILED_TEXT}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tooltip {
    pub marker: MarkerId,
    pub name: String,
    pub description: String,
    pub impact: String,
    pub cost: String,
    pub cross_reference: CrossReference,
}

impl Tooltip {
    fn for_item(marker: MarkerId, item: &Item) -> Self {
        let cross_reference = match &item.cross_reference {
            Some(chart_id) => CrossReference::Pending {
                chart_id: chart_id.clone(),
            },
            None => CrossReference::NotSelected,
        };

        Self {
            marker,
            name: item.name.clone(),
            description: item.description.clone(),
            impact: level_label(item.impact.as_ref()),
            cost: level_label(item.cost.as_ref()),
            cross_reference,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if !self.description.is_empty() {
            lines.push(self.description.clone());
        }
        lines.push(format!("Impact: {}", self.impact));
        lines.push(format!("Cost: {}", self.cost));
        lines.push(self.cross_reference.text());
        lines
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HoverState {
    Idle,
    Hovering { marker: MarkerId, epoch: u64 },
}

struct LookupReply {
    epoch: u64,
    chart_id: String,
    result: Result<String, LookupError>,
}

// Lookup replies carry the epoch of the hover session that started them and are applied
// only while that session is still active.
pub struct InteractionController {
    chart_id: String,
    items: Arc<[Item]>,
    lookup: Arc<dyn EntityLookup>,
    navigator: Box<dyn Navigator>,
    state: HoverState,
    tooltip: Option<Tooltip>,
    last_epoch: u64,
    in_flight: usize,
    reply_tx: Sender<LookupReply>,
    reply_rx: Receiver<LookupReply>,
}

impl InteractionController {
    pub fn new(lookup: Arc<dyn EntityLookup>, navigator: Box<dyn Navigator>) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        Self {
            chart_id: String::new(),
            items: Arc::from(Vec::new()),
            lookup,
            navigator,
            state: HoverState::Idle,
            tooltip: None,
            last_epoch: 0,
            in_flight: 0,
            reply_tx,
            reply_rx,
        }
    }

    pub fn set_snapshot(&mut self, chart_id: &str, items: Arc<[Item]>) {
        self.pointer_leave();
        self.chart_id = chart_id.to_owned();
        self.items = items;
    }

    pub fn item(&self, marker: MarkerId) -> Option<&Item> {
        self.items.get(marker.0)
    }

    pub fn hovered(&self) -> Option<MarkerId> {
        match self.state {
            HoverState::Idle => None,
            HoverState::Hovering { marker, .. } => Some(marker),
        }
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Number of lookups started that have not reported back yet, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Feeds the marker currently under the pointer, if any, and performs the resulting
    /// leave/enter transitions.
    pub fn pointer_moved(&mut self, target: Option<MarkerId>) {
        if self.hovered() == target {
            return;
        }

        self.pointer_leave();
        if let Some(marker) = target {
            self.pointer_enter(marker);
        }
    }

    pub fn pointer_enter(&mut self, marker: MarkerId) {
        if self.hovered() == Some(marker) {
            return;
        }
        self.pointer_leave();

        let Some(item) = self.items.get(marker.0) else {
            warn!(?marker, chart = %self.chart_id, "pointer entered a marker outside the snapshot");
            return;
        };

        self.last_epoch += 1;
        let epoch = self.last_epoch;
        let tooltip = Tooltip::for_item(marker, item);
        let cross_reference = item.cross_reference.clone();

        self.state = HoverState::Hovering { marker, epoch };
        self.tooltip = Some(tooltip);

        if let Some(chart_id) = cross_reference {
            self.spawn_lookup(epoch, chart_id);
        }
    }

    pub fn pointer_leave(&mut self) {
        if let HoverState::Hovering { marker, epoch } = self.state {
            debug!(?marker, epoch, "hover session ended");
        }
        self.state = HoverState::Idle;
        self.tooltip = None;
    }

    pub fn click(&self, marker: MarkerId) -> Result<Route, InteractionError> {
        let item = self
            .item(marker)
            .ok_or(InteractionError::UnknownMarker(marker))?;

        let Some(item_id) = item.id.clone() else {
            warn!(?marker, name = %item.name, "clicked item has no id; not navigating");
            return Err(InteractionError::MissingNavigationTarget {
                name: item.name.clone(),
            });
        };

        let route = Route::Item {
            chart_id: self.chart_id.clone(),
            item_id,
        };
        info!(%route, "navigating to item");
        self.navigator.navigate_to(route.clone());
        Ok(route)
    }

    pub fn zoom_into(&self, marker: MarkerId) -> Result<Route, InteractionError> {
        let item = self
            .item(marker)
            .ok_or(InteractionError::UnknownMarker(marker))?;

        let Some(chart_id) = item.cross_reference.clone() else {
            return Err(InteractionError::NoCrossReference {
                name: item.name.clone(),
            });
        };

        let route = Route::Chart { chart_id };
        info!(%route, "zooming into cross-referenced chart");
        self.navigator.navigate_to(route.clone());
        Ok(route)
    }

    /// Applies finished lookups. Returns whether the visible tooltip changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.reply_rx.try_recv() {
                Ok(reply) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    changed |= self.apply_reply(reply);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn apply_reply(&mut self, reply: LookupReply) -> bool {
        let active = matches!(self.state, HoverState::Hovering { epoch, .. } if epoch == reply.epoch);
        let Some(tooltip) = self.tooltip.as_mut().filter(|_| active) else {
            debug!(
                epoch = reply.epoch,
                chart = %reply.chart_id,
                "discarding lookup reply for an ended hover session"
            );
            return false;
        };

        tooltip.cross_reference = match reply.result {
            Ok(name) => CrossReference::Resolved {
                chart_id: reply.chart_id,
                name,
            },
            Err(error) => {
                warn!(chart = %reply.chart_id, %error, "cross-reference lookup failed");
                CrossReference::Failed {
                    chart_id: reply.chart_id,
                }
            }
        };
        true
    }

    fn spawn_lookup(&mut self, epoch: u64, chart_id: String) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.reply_tx.clone();
        let worker_chart_id = chart_id.clone();

        let spawned = thread::Builder::new()
            .name("radar-lookup".to_owned())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    lookup.lookup_name(&worker_chart_id)
                }))
                .unwrap_or_else(|_| Err(LookupError::Panicked(worker_chart_id.clone())));

                let _ = tx.send(LookupReply {
                    epoch,
                    chart_id: worker_chart_id,
                    result,
                });
            });

        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(error) => {
                warn!(chart = %chart_id, %error, "failed to start lookup worker");
                self.apply_reply(LookupReply {
                    epoch,
                    chart_id,
                    result: Err(LookupError::Unavailable(error.to_string())),
                });
            }
        }
    }
}
