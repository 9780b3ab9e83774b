mod directory;
mod load;
mod model;
mod parse;
mod strategy;

pub use directory::BoardDirectory;
pub use load::{BoardSource, load_board};
pub use model::{Board, Chart};
pub use strategy::StrategicElement;
