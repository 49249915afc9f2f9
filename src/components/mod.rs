pub mod canvas;
pub mod geometry;
pub mod neural_graph;
pub mod particle_field;
