mod animate;
mod component;
mod generate;
mod render;
mod state;
mod types;

pub use component::NeuralGraphCanvas;
pub use types::GraphConfig;
