mod geometry;
mod projection;
mod renderer;

pub use projection::Viewport;
pub use renderer::{hit_test, Lod, MapLayers, MapRenderer};
