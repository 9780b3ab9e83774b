use std::f32::consts::TAU;

use eframe::egui::{Color32, Pos2, Stroke, Vec2, vec2};
use tracing::debug;

use super::item::Item;
use super::layout::{ChartRadius, MarkerId, PlacedMarker, QUADRANT_SPAN, RING_FRACTIONS, layout};

const WEDGE_FILLS: [Color32; 2] = [Color32::from_rgb(240, 240, 240), Color32::from_rgb(224, 224, 224)];
const WEDGE_STROKE: Color32 = Color32::from_rgb(204, 204, 204);
const GUIDE_RING_STROKE: Color32 = Color32::from_rgb(221, 221, 221);
const LABEL_COLOR: Color32 = Color32::from_rgb(40, 40, 40);
const EMPHASIS_COLOR: Color32 = Color32::from_rgb(20, 20, 20);

const MARKER_OUTLINE_WIDTH: f32 = 2.0;
const GLOW_SCALE: f32 = 1.8;
const GLOW_OPACITY: f32 = 0.3;
const LABEL_GAP: f32 = 5.0;
const LABEL_SIZE: f32 = 10.0;

/// Space left around the disc so that outer labels and halos are not clipped.
pub const CHART_MARGIN: f32 = 25.0;

/// A 2D drawing target. Angles are in radians, clockwise on screen from the +x axis.
pub trait Surface {
    fn fill_sector(
        &mut self,
        center: Pos2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        fill: Color32,
        stroke: Stroke,
    );

    fn draw_circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke);

    /// Draws `text` horizontally centered with its baseline box ending at `anchor`.
    fn draw_label(&mut self, anchor: Pos2, text: &str, size: f32, color: Color32);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Sector {
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Label {
        anchor: Vec2,
        text: String,
        size: f32,
        color: Color32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerTarget {
    pub id: MarkerId,
    pub center: Vec2,
    pub radius: f32,
}

/// The complete visual tree of one chart, rebuilt from scratch whenever its inputs change.
#[derive(Clone, Debug)]
pub struct RadarScene {
    radius: f32,
    primitives: Vec<Primitive>,
    targets: Vec<MarkerTarget>,
}

impl RadarScene {
    pub fn build(markers: &[PlacedMarker<'_>], radius: ChartRadius) -> Self {
        let radius = radius.get();
        let mut primitives = Vec::with_capacity(8 + markers.len() * 3);

        for quadrant in 0..4 {
            let start_angle = QUADRANT_SPAN * quadrant as f32;
            primitives.push(Primitive::Sector {
                radius,
                start_angle,
                end_angle: start_angle + QUADRANT_SPAN,
                fill: WEDGE_FILLS[quadrant % 2],
                stroke: Stroke::new(1.0, WEDGE_STROKE),
            });
        }

        let mut fractions = RING_FRACTIONS;
        fractions.sort_by(f32::total_cmp);
        for fraction in fractions {
            primitives.push(Primitive::Circle {
                center: Vec2::ZERO,
                radius: radius * fraction,
                fill: Color32::TRANSPARENT,
                stroke: Stroke::new(1.0, GUIDE_RING_STROKE),
            });
        }

        let mut targets = Vec::with_capacity(markers.len());
        for marker in markers {
            if marker.has_glow {
                primitives.push(Primitive::Circle {
                    center: marker.position,
                    radius: marker.radius_px * GLOW_SCALE,
                    fill: marker.color.gamma_multiply(GLOW_OPACITY),
                    stroke: Stroke::NONE,
                });
            }

            primitives.push(Primitive::Circle {
                center: marker.position,
                radius: marker.radius_px,
                fill: marker.color,
                stroke: Stroke::new(MARKER_OUTLINE_WIDTH, Color32::WHITE),
            });

            primitives.push(Primitive::Label {
                anchor: marker.position - vec2(0.0, marker.radius_px + LABEL_GAP),
                text: marker.item.name.clone(),
                size: LABEL_SIZE,
                color: LABEL_COLOR,
            });

            targets.push(MarkerTarget {
                id: marker.id,
                center: marker.position,
                radius: marker.radius_px,
            });
        }

        Self {
            radius,
            primitives,
            targets,
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn targets(&self) -> &[MarkerTarget] {
        &self.targets
    }

        pub fn extent(&self) -> f32 {
        self.radius + CHART_MARGIN
    }

    /// Marker under a chart-local point. Overlapping markers resolve to the nearest center.
    pub fn hit_test(&self, local: Vec2) -> Option<MarkerId> {
        self.targets
            .iter()
            .filter_map(|target| {
                let distance = (target.center - local).length();
                (distance <= target.radius).then_some((target.id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn paint(&self, surface: &mut impl Surface, origin: Pos2, emphasized: Option<MarkerId>) {
        for primitive in &self.primitives {
            match primitive {
                Primitive::Sector {
                    radius,
                    start_angle,
                    end_angle,
                    fill,
                    stroke,
                } => surface.fill_sector(origin, *radius, *start_angle, *end_angle, *fill, *stroke),
                Primitive::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                } => surface.draw_circle(origin + *center, *radius, *fill, *stroke),
                Primitive::Label {
                    anchor,
                    text,
                    size,
                    color,
                } => surface.draw_label(origin + *anchor, text, *size, *color),
            }
        }

        if let Some(target) = emphasized.and_then(|id| self.targets.iter().find(|t| t.id == id)) {
            surface.draw_circle(
                origin + target.center,
                target.radius + MARKER_OUTLINE_WIDTH,
                Color32::TRANSPARENT,
                Stroke::new(2.5, EMPHASIS_COLOR),
            );
        }
    }
}

#[derive(Default)]
pub struct RadarCanvas {
    scene: Option<RadarScene>,
    built_for: Option<(u64, ChartRadius)>,
}

impl RadarCanvas {
    /// Rebuilds the scene when `revision` or `radius` differ from the last build.
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, revision: u64, items: &[Item], radius: ChartRadius) -> bool {
        if self.built_for == Some((revision, radius)) && self.scene.is_some() {
            return false;
        }

        let markers = layout(items, radius);
        self.scene = Some(RadarScene::build(&markers, radius));
        self.built_for = Some((revision, radius));
        debug!(
            revision,
            radius = radius.get(),
            markers = markers.len(),
            "rebuilt radar scene"
        );
        true
    }

    pub fn scene(&self) -> Option<&RadarScene> {
        self.scene.as_ref()
    }
}

pub fn polar_point(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + vec2(angle.cos(), angle.sin()) * radius
}

/// Number of straight segments used to approximate an arc of `sweep` radians.
pub fn arc_segments(sweep: f32) -> usize {
    const SEGMENTS_PER_TURN: f32 = 128.0;
    ((sweep.abs() / TAU) * SEGMENTS_PER_TURN).ceil().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::item::{Category, Distance, ItemKind};

    #[derive(Default)]
    struct RecordingSurface {
        sectors: Vec<(Pos2, f32, f32, f32, Color32)>,
        circles: Vec<(Pos2, f32, Color32, Stroke)>,
        labels: Vec<(Pos2, String)>,
    }

    impl Surface for RecordingSurface {
        fn fill_sector(
            &mut self,
            center: Pos2,
            radius: f32,
            start_angle: f32,
            end_angle: f32,
            fill: Color32,
            _stroke: Stroke,
        ) {
            self.sectors.push((center, radius, start_angle, end_angle, fill));
        }

        fn draw_circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
            self.circles.push((center, radius, fill, stroke));
        }

        fn draw_label(&mut self, anchor: Pos2, text: &str, _size: f32, _color: Color32) {
            self.labels.push((anchor, text.to_owned()));
        }
    }

    fn radius() -> ChartRadius {
        ChartRadius::new(100.0).unwrap()
    }

    #[test]
    fn empty_chart_paints_background_only() {
        let scene = RadarScene::build(&[], radius());
        let mut surface = RecordingSurface::default();
        scene.paint(&mut surface, Pos2::new(125.0, 125.0), None);

        assert_eq!(surface.sectors.len(), 4);
        assert_eq!(surface.circles.len(), 4);
        assert!(surface.labels.is_empty());
        assert!(scene.targets().is_empty());

        let ring_radii = surface.circles.iter().map(|c| c.1).collect::<Vec<_>>();
        assert_eq!(ring_radii, [25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn wedges_alternate_and_cover_the_disc() {
        let scene = RadarScene::build(&[], radius());
        let mut surface = RecordingSurface::default();
        scene.paint(&mut surface, Pos2::ZERO, None);

        let total: f32 = surface.sectors.iter().map(|s| s.3 - s.2).sum();
        assert!((total - TAU).abs() < 1e-4);
        assert_eq!(surface.sectors[0].4, surface.sectors[2].4);
        assert_eq!(surface.sectors[1].4, surface.sectors[3].4);
        assert_ne!(surface.sectors[0].4, surface.sectors[1].4);
    }

    #[test]
    fn glow_halo_is_drawn_beneath_the_marker() {
        let items = [Item::new("bet", Category::Cat1, Distance::Dist1).with_kind(ItemKind::Opportunity)];
        let markers = layout(&items, radius());
        let scene = RadarScene::build(&markers, radius());

        let marker_circles = scene
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle { center, radius, fill, .. } if *center != Vec2::ZERO => {
                    Some((*radius, *fill))
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        assert_eq!(marker_circles.len(), 2);
        let (halo_radius, halo_fill) = marker_circles[0];
        let (main_radius, main_fill) = marker_circles[1];
        assert!(halo_radius > main_radius);
        assert!(halo_fill.a() < main_fill.a());
    }

    #[test]
    fn problems_have_no_halo_and_labels_sit_above() {
        let items = [Item::new("debt", Category::Cat2, Distance::Dist2)];
        let markers = layout(&items, radius());
        let scene = RadarScene::build(&markers, radius());
        let mut surface = RecordingSurface::default();
        let origin = Pos2::new(125.0, 125.0);
        scene.paint(&mut surface, origin, None);

        assert_eq!(surface.circles.len(), 5);
        let (anchor, text) = &surface.labels[0];
        assert_eq!(text, "debt");
        let marker_center = origin + markers[0].position;
        assert!((anchor.x - marker_center.x).abs() < 1e-4);
        assert!((marker_center.y - anchor.y - 15.0).abs() < 1e-4);
    }

    #[test]
    fn emphasized_marker_gets_an_extra_outline() {
        let items = [
            Item::new("a", Category::Cat1, Distance::Dist1),
            Item::new("b", Category::Cat3, Distance::Dist3),
        ];
        let markers = layout(&items, radius());
        let scene = RadarScene::build(&markers, radius());

        let mut plain = RecordingSurface::default();
        scene.paint(&mut plain, Pos2::ZERO, None);
        let mut emphasized = RecordingSurface::default();
        scene.paint(&mut emphasized, Pos2::ZERO, Some(MarkerId(1)));

        assert_eq!(emphasized.circles.len(), plain.circles.len() + 1);
        let outline = emphasized.circles.last().unwrap();
        assert_eq!(outline.0, Pos2::ZERO + markers[1].position);
        assert_eq!(outline.2, Color32::TRANSPARENT);
    }

    #[test]
    fn hit_test_prefers_the_nearest_marker() {
        let items = [
            Item::new("a", Category::Cat1, Distance::Dist1),
            Item::new("b", Category::Cat1, Distance::Dist1),
        ];
        let markers = layout(&items, radius());
        let scene = RadarScene::build(&markers, radius());

        assert_eq!(scene.hit_test(markers[1].position), Some(MarkerId(1)));
        assert_eq!(scene.hit_test(markers[0].position + vec2(3.0, 0.0)), Some(MarkerId(0)));
        assert_eq!(scene.hit_test(Vec2::ZERO), None);
    }

    #[test]
    fn canvas_rebuilds_only_when_inputs_change() {
        let items = [Item::new("a", Category::Cat1, Distance::Dist1)];
        let mut canvas = RadarCanvas::default();

        assert!(canvas.scene().is_none());
        assert!(canvas.sync(1, &items, radius()));
        assert!(!canvas.sync(1, &items, radius()));
        assert!(canvas.sync(2, &items, radius()));
        assert!(canvas.sync(2, &items, ChartRadius::new(150.0).unwrap()));
        assert_eq!(canvas.scene().map(RadarScene::extent), Some(150.0 + CHART_MARGIN));
    }

    #[test]
    fn arcs_use_at_least_one_segment() {
        assert_eq!(arc_segments(0.0), 1);
        assert_eq!(arc_segments(QUADRANT_SPAN), 32);
        let point = polar_point(Pos2::ZERO, 10.0, 0.0);
        assert!((point.x - 10.0).abs() < 1e-5 && point.y.abs() < 1e-5);
    }
}
