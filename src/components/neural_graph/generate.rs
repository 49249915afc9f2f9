use std::collections::BTreeSet;
use std::f64::consts::TAU;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::types::{CONCEPTS, GraphConfig, MAX_CONNECTIONS, MIN_CONNECTIONS, NeuralGraph, NeuralNode};
use crate::components::geometry::Vec3;

/// Smallest graph in which every node can pick two distinct targets.
pub const MIN_NODES: usize = MIN_CONNECTIONS + 1;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
	#[error("Invalid configuration: {0}")]
	InvalidConfiguration(String),
}

fn validate(config: &GraphConfig) -> Result<(), GraphError> {
	if config.node_count < MIN_NODES {
		return Err(GraphError::InvalidConfiguration(format!(
			"node_count is {}, at least {} nodes are needed to give every node {} distinct connections",
			config.node_count, MIN_NODES, MIN_CONNECTIONS
		)));
	}
	let (lo, hi) = (config.radius_min, config.radius_max);
	if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
		return Err(GraphError::InvalidConfiguration(format!(
			"radius band [{lo}, {hi}] must be positive, finite and ordered"
		)));
	}
	Ok(())
}

/// Uniform point on a sphere whose radius is drawn from `[radius_min, radius_max]`.
///
/// The polar angle comes from `acos` of a uniform sample in `[-1, 1]`; drawing
/// it uniformly in `[0, PI]` would crowd points around the poles.
pub fn sample_on_sphere<R: Rng + ?Sized>(rng: &mut R, radius_min: f64, radius_max: f64) -> Vec3 {
	let theta = rng.gen_range(0.0..TAU);
	let phi = rng.gen_range(-1.0..=1.0_f64).acos();
	let radius = rng.gen_range(radius_min..=radius_max);
	Vec3::new(
		radius * phi.sin() * theta.cos(),
		radius * phi.sin() * theta.sin(),
		radius * phi.cos(),
	)
}

/// Builds a fresh graph. Each node links to 2..=4 distinct other nodes, picked
/// by shuffling all candidates and keeping a prefix.
pub fn generate<R: Rng + ?Sized>(config: &GraphConfig, rng: &mut R) -> Result<NeuralGraph, GraphError> {
	validate(config)?;
	let n = config.node_count;

	let mut nodes: Vec<NeuralNode> = (0..n)
		.map(|index| NeuralNode {
			index,
			position: sample_on_sphere(rng, config.radius_min, config.radius_max),
			label: CONCEPTS[rng.gen_range(0..CONCEPTS.len())],
			connections: Vec::new(),
		})
		.collect();

	let mut candidates = Vec::with_capacity(n - 1);
	for node in &mut nodes {
		let degree = rng.gen_range(MIN_CONNECTIONS..=MAX_CONNECTIONS).min(n - 1);
		candidates.clear();
		candidates.extend((0..n).filter(|&j| j != node.index));
		candidates.shuffle(rng);
		node.connections = candidates[..degree].to_vec();
	}

	debug!("Generated neural graph with {} nodes", n);
	Ok(NeuralGraph { nodes })
}

/// Undirected edge list, each pair once as `(lower, higher)`.
pub fn edges_for_render(graph: &NeuralGraph) -> Vec<(usize, usize)> {
	let mut pairs = BTreeSet::new();
	for node in &graph.nodes {
		for &target in &node.connections {
			if target != node.index {
				pairs.insert((node.index.min(target), node.index.max(target)));
			}
		}
	}
	pairs.into_iter().collect()
}
