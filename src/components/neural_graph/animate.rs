//! Per-frame animation. Everything here is a pure function of elapsed time
//! (in seconds) and immutable inputs, so it can be evaluated at any cadence
//! without drift.

use super::state::HoverState;
use super::types::{GraphConfig, NeuralGraph, NeuralNode};
use crate::components::geometry::Vec3;

pub const BOB_AMPLITUDE: f64 = 0.05;
pub const BOB_SPEED: f64 = 0.5;
pub const HOVER_EMPHASIS: f64 = 1.2;
pub const RIPPLE_DURATION: f64 = 1.2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeFrame {
	pub position: Vec3,
	pub emphasis: f64,
}

/// Render position and scale of a node at `elapsed`.
pub fn node_frame(elapsed: f64, node: &NeuralNode, hover: &HoverState) -> NodeFrame {
	let base = node.position;
	let position = Vec3::new(
		base.x,
		base.y + (elapsed * BOB_SPEED + base.x).sin() * BOB_AMPLITUDE,
		base.z,
	);
	let emphasis = if hover.is_hovered(node.index) {
		HOVER_EMPHASIS
	} else {
		1.0
	};
	NodeFrame { position, emphasis }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticlePath {
	pub start: Vec3,
	pub end: Vec3,
	pub speed: f64,
}

impl ParticlePath {
	pub fn position(&self, elapsed: f64) -> Vec3 {
		self.start.lerp(self.end, (elapsed * self.speed).rem_euclid(1.0))
	}
}

/// Particles streaming from the core out to the first few nodes.
pub fn data_particles(graph: &NeuralGraph, config: &GraphConfig) -> Vec<ParticlePath> {
	graph
		.nodes
		.iter()
		.take(config.particle_count)
		.enumerate()
		.map(|(i, node)| ParticlePath {
			start: Vec3::ZERO,
			end: node.position,
			speed: 0.3 + i as f64 * 0.05,
		})
		.collect()
}

/// Extra emissive intensity of the core, in `[0, 1]`.
pub fn core_pulse(elapsed: f64) -> f64 {
	(elapsed * 2.0).sin() * 0.5 + 0.5
}

/// Gentle sway of the core as `(pitch, yaw)` in radians.
pub fn core_sway(elapsed: f64) -> (f64, f64) {
	((elapsed * 0.15).cos() * 0.2, (elapsed * 0.2).sin() * 0.3)
}

pub fn connection_opacity(active: bool, elapsed: f64) -> f64 {
	if active {
		0.7 + (elapsed * 5.0).sin() * 0.3
	} else {
		0.3
	}
}

/// Progress of the click ripple in `[0, 1)`, or `None` outside its lifetime.
///
/// The end is compared in absolute time, the same way callers compute it, so
/// `started_at + RIPPLE_DURATION` is always past the end.
pub fn ripple_progress(started_at: f64, elapsed: f64) -> Option<f64> {
	if elapsed < started_at || elapsed >= started_at + RIPPLE_DURATION {
		return None;
	}
	Some((elapsed - started_at) / RIPPLE_DURATION)
}

const FLOAT_SPEED: f64 = 1.5;
const FLOAT_ROTATION: f64 = 0.3;
const FLOAT_LIFT: f64 = 0.5;

/// Slow wobble applied to the whole brain (core, nodes, particles) on top of
/// the per-node bob.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloatPose {
	pub pitch: f64,
	pub yaw: f64,
	pub roll: f64,
	pub lift: f64,
}

impl FloatPose {
	pub fn at(elapsed: f64) -> Self {
		let phase = elapsed / 4.0 * FLOAT_SPEED;
		Self {
			pitch: phase.cos() / 8.0 * FLOAT_ROTATION,
			yaw: phase.sin() / 8.0 * FLOAT_ROTATION,
			roll: phase.sin() / 20.0 * FLOAT_ROTATION,
			lift: phase.sin() / 10.0 * FLOAT_LIFT,
		}
	}

	/// Group transform: roll, then yaw, then pitch, then lift.
	pub fn apply(&self, p: Vec3) -> Vec3 {
		p.rotate_z(self.roll).rotate_y(self.yaw).rotate_x(self.pitch) + Vec3::new(0.0, self.lift, 0.0)
	}
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::neural_graph::types::CONCEPTS;

	const EPS: f64 = 1e-12;

	fn node(index: usize, position: Vec3) -> NeuralNode {
		NeuralNode {
			index,
			position,
			label: CONCEPTS[4],
			connections: vec![],
		}
	}

	#[test]
	fn node_frame_is_time_pure() {
		let n = node(0, Vec3::new(0.3, -1.1, 1.4));
		let hover = HoverState::default();
		for t in [0.0, 0.016, 1.5, 1234.5678] {
			assert_eq!(node_frame(t, &n, &hover), node_frame(t, &n, &hover));
		}
	}

	#[test]
	fn node_bobs_only_vertically() {
		let base = Vec3::new(0.7, 0.2, -1.5);
		let n = node(0, base);
		let hover = HoverState::default();
		let f = node_frame(2.0, &n, &hover);

		assert_eq!(f.position.x, base.x);
		assert_eq!(f.position.z, base.z);
		let expected = base.y + (2.0 * 0.5 + 0.7_f64).sin() * 0.05;
		assert!((f.position.y - expected).abs() < EPS);
		assert!((f.position.y - base.y).abs() <= BOB_AMPLITUDE + EPS);
	}

	#[test]
	fn emphasis_follows_hover_identity() {
		let a = node(0, Vec3::new(1.0, 0.0, 0.0));
		let b = node(1, Vec3::new(1.0, 0.0, 0.0));
		let mut hover = HoverState::default();
		hover.enter(&a);

		assert_eq!(node_frame(0.0, &a, &hover).emphasis, HOVER_EMPHASIS);
		// Same position, different node.
		assert_eq!(node_frame(0.0, &b, &hover).emphasis, 1.0);
	}

	#[test]
	fn particle_wraps_along_path() {
		let path = ParticlePath {
			start: Vec3::ZERO,
			end: Vec3::new(4.0, 0.0, 0.0),
			speed: 0.5,
		};
		assert_eq!(path.position(0.0), Vec3::ZERO);
		assert!((path.position(2.5).x - 1.0).abs() < EPS);
		assert!((path.position(1.0).x - 2.0).abs() < EPS);
	}

	#[test]
	fn particles_start_at_core_with_increasing_speed() {
		let graph = NeuralGraph {
			nodes: (0..10).map(|i| node(i, Vec3::new(i as f64, 1.0, 0.0))).collect(),
		};
		let paths = data_particles(&graph, &GraphConfig::default());
		assert_eq!(paths.len(), 8);
		for (i, p) in paths.iter().enumerate() {
			assert_eq!(p.start, Vec3::ZERO);
			assert_eq!(p.end, graph.nodes[i].position);
			assert!((p.speed - (0.3 + i as f64 * 0.05)).abs() < EPS);
		}
	}

	#[test]
	fn pulse_and_opacity_ranges() {
		for i in 0..200 {
			let t = i as f64 * 0.137;
			assert!((0.0..=1.0).contains(&core_pulse(t)));
			let active = connection_opacity(true, t);
			assert!((0.4 - EPS..=1.0 + EPS).contains(&active));
			assert_eq!(connection_opacity(false, t), 0.3);
		}
	}

	#[test]
	fn ripple_runs_for_its_duration() {
		assert_eq!(ripple_progress(10.0, 10.0), Some(0.0));
		assert!(ripple_progress(10.0, 10.6).is_some());
		assert_eq!(ripple_progress(10.0, 10.0 + RIPPLE_DURATION), None);
		assert_eq!(ripple_progress(0.0, RIPPLE_DURATION), None);
		assert_eq!(ripple_progress(3.7, 3.7 + RIPPLE_DURATION), None);
		assert!(ripple_progress(10.0, 10.0 + RIPPLE_DURATION - 1e-6).is_some());
		assert_eq!(ripple_progress(10.0, 9.0), None);
	}

	#[test]
	fn float_pose_stays_gentle() {
		let rest = FloatPose::at(0.0);
		assert!((rest.pitch - 0.0375).abs() < EPS);
		assert_eq!(rest.lift, 0.0);

		for i in 0..400 {
			let pose = FloatPose::at(i as f64 * 0.25);
			assert!(pose.pitch.abs() <= 0.0375 + EPS);
			assert!(pose.yaw.abs() <= 0.0375 + EPS);
			assert!(pose.lift.abs() <= 0.05 + EPS);
			let p = Vec3::new(1.0, -0.5, 1.5);
			let moved = pose.apply(p) - Vec3::new(0.0, pose.lift, 0.0);
			assert!((moved.length() - p.length()).abs() < 1e-9);
		}
	}

	#[test]
	fn float_pose_is_time_pure() {
		assert_eq!(FloatPose::at(12.34), FloatPose::at(12.34));
	}
}
