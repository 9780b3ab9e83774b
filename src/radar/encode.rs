use eframe::egui::Color32;

use super::item::Level;

pub const BASE_MARKER_SIZE: f32 = 10.0;

pub const LOW_IMPACT_COLOR: Color32 = Color32::from_rgb(46, 160, 67);
pub const MEDIUM_IMPACT_COLOR: Color32 = Color32::from_rgb(240, 140, 30);
pub const HIGH_IMPACT_COLOR: Color32 = Color32::from_rgb(214, 48, 49);
pub const NEUTRAL_COLOR: Color32 = Color32::from_rgb(70, 130, 180);

const IMPACT_COLORS: [(Level, Color32); 3] = [
    (Level::Low, LOW_IMPACT_COLOR),
    (Level::Medium, MEDIUM_IMPACT_COLOR),
    (Level::High, HIGH_IMPACT_COLOR),
];

const COST_SCALES: [(Level, f32); 3] = [(Level::Low, 0.7), (Level::Medium, 1.0), (Level::High, 1.5)];
const DEFAULT_COST_SCALE: f32 = 1.0;

pub fn encode_color(impact: Option<&Level>) -> Color32 {
    IMPACT_COLORS
        .iter()
        .find(|(level, _)| impact == Some(level))
        .map_or(NEUTRAL_COLOR, |(_, color)| *color)
}

pub fn encode_size(cost: Option<&Level>) -> f32 {
    let scale = COST_SCALES
        .iter()
        .find(|(level, _)| cost == Some(level))
        .map_or(DEFAULT_COST_SCALE, |(_, scale)| *scale);
    BASE_MARKER_SIZE * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_maps_to_traffic_light_colors() {
        assert_eq!(encode_color(Some(&Level::Low)), LOW_IMPACT_COLOR);
        assert_eq!(encode_color(Some(&Level::Medium)), MEDIUM_IMPACT_COLOR);
        assert_eq!(encode_color(Some(&Level::High)), HIGH_IMPACT_COLOR);
    }

    #[test]
    fn unknown_impact_is_neutral_and_distinct() {
        let unknown = Level::Unrecognized("critical".to_owned());
        assert_eq!(encode_color(None), NEUTRAL_COLOR);
        assert_eq!(encode_color(Some(&unknown)), NEUTRAL_COLOR);

        for (_, color) in IMPACT_COLORS {
            assert_ne!(color, NEUTRAL_COLOR);
        }
    }

    #[test]
    fn cost_scales_the_base_size() {
        assert!((encode_size(Some(&Level::Low)) - 7.0).abs() < 1e-5);
        assert!((encode_size(Some(&Level::Medium)) - BASE_MARKER_SIZE).abs() < 1e-5);
        assert!((encode_size(Some(&Level::High)) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn unknown_cost_uses_base_size() {
        let unknown = Level::Unrecognized("".to_owned());
        assert_eq!(encode_size(None), BASE_MARKER_SIZE);
        assert_eq!(encode_size(Some(&unknown)), BASE_MARKER_SIZE);
    }
}
