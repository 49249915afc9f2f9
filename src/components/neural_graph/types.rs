use crate::components::geometry::Vec3;

/// Labels a node can carry.
pub const CONCEPTS: [&str; 9] = [
	"Machine Learning",
	"Neural Networks",
	"Deep Learning",
	"Computer Vision",
	"NLP",
	"Reinforcement Learning",
	"Data Processing",
	"Pattern Recognition",
	"Predictive Analytics",
];

pub const MIN_CONNECTIONS: usize = 2;
pub const MAX_CONNECTIONS: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct NeuralNode {
	pub index: usize,
	pub position: Vec3,
	pub label: &'static str,
	/// Outgoing connections, by node index.
	pub connections: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeuralGraph {
	pub nodes: Vec<NeuralNode>,
}

impl NeuralGraph {
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&NeuralNode> {
		self.nodes.get(index)
	}
}

/// Generation parameters for the brain visualization.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	pub node_count: usize,
	pub radius_min: f64,
	pub radius_max: f64,
	/// How many of the first nodes get a data particle flowing from the core.
	pub particle_count: usize,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			node_count: 24,
			radius_min: 1.5,
			radius_max: 2.0,
			particle_count: 8,
		}
	}
}
