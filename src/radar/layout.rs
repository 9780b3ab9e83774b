use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use eframe::egui::{Color32, Vec2, vec2};

use super::encode::{encode_color, encode_size};
use super::error::RadiusError;
use super::item::{Category, Distance, Item, ItemKind};

pub const QUADRANT_SPAN: f32 = FRAC_PI_2;

/// Fraction of the chart radius for `dist1..=dist4`. Slot 0 doubles as the fallback ring.
pub const RING_FRACTIONS: [f32; 4] = [1.0, 0.75, 0.5, 0.25];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartRadius(f32);

impl ChartRadius {
    pub const DEFAULT_PX: f32 = 200.0;

    pub fn new(px: f32) -> Result<Self, RadiusError> {
        if px.is_finite() && px > 0.0 {
            Ok(Self(px))
        } else {
            Err(RadiusError::NotPositive(px))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for ChartRadius {
    fn default() -> Self {
        Self(Self::DEFAULT_PX)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedMarker<'a> {
    pub id: MarkerId,
    pub item: &'a Item,
    /// Chart-local position, origin at the chart center, y pointing down.
    pub position: Vec2,
    pub angle: f32,
    pub ring_radius: f32,
    pub color: Color32,
    pub radius_px: f32,
    pub has_glow: bool,
}

pub fn quadrant_index(category: &Category) -> usize {
    match category {
        Category::Cat1 | Category::Unrecognized(_) => 0,
        Category::Cat2 => 1,
        Category::Cat3 => 2,
        Category::Cat4 => 3,
    }
}

pub fn ring_slot(distance: &Distance) -> usize {
    match distance {
        Distance::Dist1 | Distance::Unrecognized(_) => 0,
        Distance::Dist2 => 1,
        Distance::Dist3 => 2,
        Distance::Dist4 => 3,
    }
}

/// Places every item on its quadrant/ring and spreads items that share both evenly across
/// the open quadrant sector, keeping their input order. Markers come back in input order.
pub fn layout(items: &[Item], radius: ChartRadius) -> Vec<PlacedMarker<'_>> {
    let mut groups: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (index, item) in items.iter().enumerate() {
        groups
            .entry((quadrant_index(&item.category), ring_slot(&item.distance)))
            .or_default()
            .push(index);
    }

    let mut polar = vec![(0.0_f32, 0.0_f32); items.len()];
    for ((quadrant, ring), members) in &groups {
        let base = QUADRANT_SPAN * *quadrant as f32;
        let step = QUADRANT_SPAN / (members.len() + 1) as f32;
        let ring_radius = radius.get() * RING_FRACTIONS[*ring];

        for (rank, &index) in members.iter().enumerate() {
            polar[index] = (base + step * (rank + 1) as f32, ring_radius);
        }
    }

    items
        .iter()
        .zip(polar)
        .enumerate()
        .map(|(index, (item, (angle, ring_radius)))| PlacedMarker {
            id: MarkerId(index),
            item,
            position: vec2(angle.cos(), angle.sin()) * ring_radius,
            angle,
            ring_radius,
            color: encode_color(item.impact.as_ref()),
            radius_px: encode_size(item.cost.as_ref()),
            has_glow: item.kind == ItemKind::Opportunity,
        })
        .collect()
}
