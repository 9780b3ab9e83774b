mod encode;
mod error;
mod interaction;
mod item;
mod layout;
mod render;

pub use encode::encode_color;
pub use error::LookupError;
pub use interaction::{EntityLookup, InteractionController, Navigator, Route, Tooltip};
pub use item::{Item, level_label};
pub use layout::{ChartRadius, MarkerId};
pub use render::{RadarCanvas, Surface, arc_segments, polar_point};

pub(crate) use item::{lenient_text, optional_id};

#[cfg(test)]
pub(crate) use item::{Category, Distance};
#[cfg(test)]
pub(crate) use layout::layout;
