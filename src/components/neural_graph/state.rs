use log::debug;

use super::animate::{
	FloatPose, NodeFrame, ParticlePath, data_particles, node_frame, ripple_progress,
};
use super::generate::edges_for_render;
use super::types::{GraphConfig, NeuralGraph, NeuralNode};
use crate::components::geometry::{Camera, Projected, Vec3};

pub const NODE_RADIUS: f64 = 0.15;
pub const CORE_RADIUS: f64 = 0.8;
pub const PARTICLE_RADIUS: f64 = 0.05;
/// Extra pick tolerance around a node, in pixels.
pub const HIT_PADDING: f64 = 6.0;

const CAMERA_DISTANCE: f64 = 4.0;
const CAMERA_FOV: f64 = 60.0;
const MIN_DISTANCE: f64 = 2.5;
const MAX_DISTANCE: f64 = 8.0;
const MAX_PITCH: f64 = 1.2;
const ROTATE_SPEED: f64 = 0.005;
const DRAG_THRESHOLD: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoveredNode {
	pub index: usize,
	pub position: Vec3,
	pub label: &'static str,
}

/// Which node the pointer is over, if any, plus the click pulse counter.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	current: Option<HoveredNode>,
	pulse: u64,
}

impl HoverState {
	pub fn enter(&mut self, node: &NeuralNode) {
		self.current = Some(HoveredNode {
			index: node.index,
			position: node.position,
			label: node.label,
		});
	}

	/// Clears the slot only if `index` is still the hovered node, so a late
	/// leave from an older node cannot wipe a newer hover.
	pub fn leave(&mut self, index: usize) -> bool {
		match self.current {
			Some(h) if h.index == index => {
				self.current = None;
				true
			}
			_ => false,
		}
	}

	pub fn clear_and_pulse(&mut self) {
		self.current = None;
		self.pulse += 1;
	}

	pub fn current(&self) -> Option<&HoveredNode> {
		self.current.as_ref()
	}

	pub fn is_hovered(&self, index: usize) -> bool {
		self.current.is_some_and(|h| h.index == index)
	}

	pub fn label(&self) -> Option<&'static str> {
		self.current.map(|h| h.label)
	}

	pub fn pulse(&self) -> u64 {
		self.pulse
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Set once the pointer travels past the drag threshold; suppresses the
	/// click that follows the mouseup.
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub yaw_start: f64,
	pub pitch_start: f64,
}

pub struct NeuralGraphState {
	pub graph: NeuralGraph,
	pub edges: Vec<(usize, usize)>,
	pub particles: Vec<ParticlePath>,
	/// Distance from the core to the farthest node.
	pub shell_radius: f64,
	pub hover: HoverState,
	/// Whole-brain float applied before the camera.
	pub group: FloatPose,
	pub camera: Camera,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
	pub elapsed: f64,
	pub frames: Vec<NodeFrame>,
	pub projected: Vec<Option<Projected>>,
	/// Node indices sorted back to front.
	pub draw_order: Vec<usize>,
	ripple_started: Option<f64>,
	seen_pulse: u64,
}

impl NeuralGraphState {
	pub fn new(graph: NeuralGraph, config: &GraphConfig, width: f64, height: f64) -> Self {
		let edges = edges_for_render(&graph);
		let particles = data_particles(&graph, config);
		let n = graph.len();
		let shell_radius = graph
			.nodes
			.iter()
			.map(|node| node.position.length())
			.fold(0.0, f64::max);
		let mut state = Self {
			graph,
			edges,
			particles,
			shell_radius,
			hover: HoverState::default(),
			group: FloatPose::default(),
			camera: Camera::new(CAMERA_DISTANCE, CAMERA_FOV),
			drag: DragState::default(),
			width,
			height,
			elapsed: 0.0,
			frames: vec![NodeFrame::default(); n],
			projected: vec![None; n],
			draw_order: (0..n).collect(),
			ripple_started: None,
			seen_pulse: 0,
		};
		state.tick(0.0);
		state
	}

	/// Advances to `elapsed` seconds since mount. Safe at any cadence; a clock
	/// that runs backwards is held at the last seen time.
	pub fn tick(&mut self, elapsed: f64) {
		self.elapsed = elapsed.max(self.elapsed);

		if self.hover.pulse() != self.seen_pulse {
			self.seen_pulse = self.hover.pulse();
			self.ripple_started = Some(self.elapsed);
		}
		if let Some(start) = self.ripple_started {
			if ripple_progress(start, self.elapsed).is_none() {
				self.ripple_started = None;
			}
		}

		self.group = FloatPose::at(self.elapsed);
		let group = self.group;
		for node in &self.graph.nodes {
			let frame = node_frame(self.elapsed, node, &self.hover);
			self.frames[node.index] = frame;
			self.projected[node.index] =
				self.camera.project(group.apply(frame.position), self.width, self.height);
		}

		let projected = &self.projected;
		let depth = |i: usize| projected[i].map_or(f64::INFINITY, |p| p.depth);
		self.draw_order.sort_by(|&a, &b| depth(b).total_cmp(&depth(a)));
	}

	/// Projects a point in brain space, float included.
	pub fn project(&self, p: Vec3) -> Option<Projected> {
		self.camera.project(self.group.apply(p), self.width, self.height)
	}

	/// Front-most node under the given canvas coordinates.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		if self.graph.is_empty() {
			return None;
		}
		let mut found: Option<(usize, f64)> = None;
		for (idx, p) in self.projected.iter().enumerate() {
			let Some(p) = p else {
				continue;
			};
			let radius = NODE_RADIUS * self.frames[idx].emphasis * p.scale + HIT_PADDING;
			let (dx, dy) = (p.x - sx, p.y - sy);
			if (dx * dx + dy * dy).sqrt() < radius && found.is_none_or(|(_, d)| p.depth < d) {
				found = Some((idx, p.depth));
			}
		}
		found.map(|(idx, _)| idx)
	}

	pub fn pointer_enter(&mut self, index: usize) -> bool {
		let Some(node) = self.graph.get(index) else {
			debug!("Ignoring pointer enter for unknown node {}", index);
			return false;
		};
		self.hover.enter(node);
		debug!("Hovering node {} ({})", index, node.label);
		true
	}

	pub fn pointer_leave(&mut self, index: usize) -> bool {
		if self.graph.get(index).is_none() {
			debug!("Ignoring pointer leave for unknown node {}", index);
			return false;
		}
		self.hover.leave(index)
	}

	/// Turns a pointer position into leave/enter events. Returns true when the
	/// hovered node changed.
	pub fn update_hover_at(&mut self, sx: f64, sy: f64) -> bool {
		let target = self.node_at_position(sx, sy);
		let current = self.hover.current().map(|h| h.index);
		if target == current {
			return false;
		}
		if let Some(prev) = current {
			self.pointer_leave(prev);
		}
		if let Some(next) = target {
			self.pointer_enter(next);
		}
		true
	}

	pub fn clear_hover(&mut self) -> bool {
		match self.hover.current().map(|h| h.index) {
			Some(idx) => self.pointer_leave(idx),
			None => false,
		}
	}

	pub fn background_activate(&mut self) {
		self.hover.clear_and_pulse();
		debug!("Background pulse {}", self.hover.pulse());
	}

	pub fn is_edge_active(&self, a: usize, b: usize) -> bool {
		self.hover.is_hovered(a) || self.hover.is_hovered(b)
	}

	/// Progress of the click ripple, if one is running.
	pub fn ripple(&self) -> Option<f64> {
		self.ripple_started
			.and_then(|start| ripple_progress(start, self.elapsed))
	}

	pub fn begin_drag(&mut self, x: f64, y: f64) {
		self.drag = DragState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			yaw_start: self.camera.yaw,
			pitch_start: self.camera.pitch,
		};
	}

	pub fn drag_to(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			return;
		}
		let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
		if (dx * dx + dy * dy).sqrt() > DRAG_THRESHOLD {
			self.drag.moved = true;
		}
		self.camera.yaw = self.drag.yaw_start + dx * ROTATE_SPEED;
		self.camera.pitch = (self.drag.pitch_start + dy * ROTATE_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
	}

	pub fn end_drag(&mut self) {
		self.drag.active = false;
	}

	/// Ends a drag on mouseup and re-picks the node under the pointer, since
	/// the view rotated underneath it. Returns true when the hover changed.
	pub fn finish_drag_at(&mut self, sx: f64, sy: f64) -> bool {
		self.end_drag();
		self.update_hover_at(sx, sy)
	}

	/// Drops a drag when the pointer leaves the canvas. No click follows a
	/// mouseup outside the canvas, so the moved flag is cleared too.
	pub fn cancel_drag(&mut self) {
		self.drag.active = false;
		self.drag.moved = false;
	}

	/// Consumes the "pointer moved while pressed" flag. A click that ends a
	/// drag is not a background click.
	pub fn take_drag_moved(&mut self) -> bool {
		std::mem::take(&mut self.drag.moved)
	}

	pub fn zoom(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 { 1.1 } else { 0.9 };
		self.camera.distance = (self.camera.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::neural_graph::types::CONCEPTS;

	fn node(index: usize, position: Vec3, connections: Vec<usize>) -> NeuralNode {
		NeuralNode {
			index,
			position,
			label: CONCEPTS[index % CONCEPTS.len()],
			connections,
		}
	}

	/// Node 0 sits in front of the core, node 1 directly behind it, node 2 off
	/// to the right.
	fn sample_state() -> NeuralGraphState {
		let graph = NeuralGraph {
			nodes: vec![
				node(0, Vec3::new(0.0, 0.0, 1.8), vec![1, 2]),
				node(1, Vec3::new(0.0, 0.0, -1.8), vec![0, 2]),
				node(2, Vec3::new(1.6, 0.0, 0.0), vec![0]),
			],
		};
		NeuralGraphState::new(graph, &GraphConfig::default(), 800.0, 600.0)
	}

	#[test]
	fn stale_leave_keeps_newer_hover() {
		let mut s = sample_state();
		assert!(s.pointer_enter(0));
		assert!(s.pointer_enter(2));
		assert!(!s.pointer_leave(0));

		let h = s.hover.current().unwrap();
		assert_eq!(h.index, 2);
		assert_eq!(h.label, CONCEPTS[2]);
		assert_eq!(h.position, Vec3::new(1.6, 0.0, 0.0));
	}

	#[test]
	fn leave_of_current_node_clears() {
		let mut s = sample_state();
		s.pointer_enter(1);
		assert!(s.pointer_leave(1));
		assert!(s.hover.current().is_none());
	}

	#[test]
	fn background_activate_always_clears_and_pulses() {
		let mut s = sample_state();
		let before = s.hover.pulse();
		s.background_activate();
		assert!(s.hover.current().is_none());
		assert!(s.hover.pulse() > before);

		s.pointer_enter(0);
		let before = s.hover.pulse();
		s.background_activate();
		assert!(s.hover.current().is_none());
		assert!(s.hover.pulse() > before);
	}

	#[test]
	fn unknown_nodes_are_ignored() {
		let mut s = sample_state();
		s.pointer_enter(2);
		assert!(!s.pointer_enter(17));
		assert!(!s.pointer_leave(17));
		assert_eq!(s.hover.current().map(|h| h.index), Some(2));
	}

	#[test]
	fn emphasis_tracks_hover_on_next_tick() {
		let mut s = sample_state();
		s.pointer_enter(1);
		s.tick(0.5);
		assert_eq!(s.frames[1].emphasis, 1.2);
		assert_eq!(s.frames[0].emphasis, 1.0);
		assert_eq!(s.frames[2].emphasis, 1.0);
	}

	#[test]
	fn clock_never_runs_backwards() {
		let mut s = sample_state();
		s.tick(3.0);
		s.tick(1.0);
		assert_eq!(s.elapsed, 3.0);
		s.tick(3.5);
		assert_eq!(s.elapsed, 3.5);
	}

	#[test]
	fn pulse_starts_a_ripple_that_ends() {
		let mut s = sample_state();
		s.tick(1.0);
		assert!(s.ripple().is_none());

		s.background_activate();
		s.tick(1.1);
		assert_eq!(s.ripple(), Some(0.0));
		s.tick(1.7);
		assert!(s.ripple().is_some());
		s.tick(5.0);
		assert!(s.ripple().is_none());
	}

	#[test]
	fn edges_are_deduplicated_and_activate_by_index() {
		let mut s = sample_state();
		assert_eq!(s.edges, vec![(0, 1), (0, 2), (1, 2)]);

		s.pointer_enter(2);
		assert!(s.is_edge_active(0, 2));
		assert!(s.is_edge_active(1, 2));
		assert!(!s.is_edge_active(0, 1));
	}

	#[test]
	fn picks_front_most_node() {
		let s = sample_state();
		assert_eq!(s.node_at_position(400.0, 300.0), Some(0));
		assert_eq!(s.node_at_position(5.0, 5.0), None);

		let right = s.projected[2].unwrap();
		assert!(right.x > 400.0);
		assert_eq!(s.node_at_position(right.x, right.y), Some(2));
	}

	#[test]
	fn hover_follows_pointer() {
		let mut s = sample_state();
		assert!(s.update_hover_at(400.0, 300.0));
		assert!(s.hover.is_hovered(0));
		assert!(!s.update_hover_at(401.0, 300.0));
		assert!(s.update_hover_at(5.0, 5.0));
		assert!(s.hover.current().is_none());
	}

	#[test]
	fn shell_radius_is_farthest_node() {
		let s = sample_state();
		assert!((s.shell_radius - 1.8).abs() < 1e-12);
	}

	#[test]
	fn draw_order_is_back_to_front() {
		let s = sample_state();
		assert_eq!(s.draw_order.first(), Some(&1));
		assert_eq!(s.draw_order.last(), Some(&0));
	}

	#[test]
	fn drag_rotates_and_suppresses_click() {
		let mut s = sample_state();
		s.begin_drag(100.0, 100.0);
		s.drag_to(101.0, 100.0);
		assert!(!s.drag.moved);
		s.drag_to(200.0, 1000.0);
		s.end_drag();

		assert!((s.camera.yaw - 0.5).abs() < 1e-12);
		assert_eq!(s.camera.pitch, MAX_PITCH);
		assert!(s.take_drag_moved());
		assert!(!s.take_drag_moved());
	}

	#[test]
	fn drag_released_off_canvas_does_not_swallow_next_click() {
		let mut s = sample_state();
		s.begin_drag(100.0, 100.0);
		s.drag_to(300.0, 100.0);
		assert!(s.drag.moved);
		s.cancel_drag();

		assert!(!s.drag.active);
		assert!(!s.take_drag_moved());
	}

	#[test]
	fn hover_is_repicked_after_orbit() {
		let mut s = sample_state();
		assert!(s.update_hover_at(400.0, 300.0));
		assert!(s.hover.is_hovered(0));

		s.begin_drag(400.0, 300.0);
		s.drag_to(600.0, 300.0);
		s.tick(0.1);
		assert!(s.finish_drag_at(600.0, 300.0));
		assert!(!s.drag.active);
		assert!(s.hover.current().is_none());
		// The drag still counts as moved for the click that follows.
		assert!(s.take_drag_moved());
	}

	#[test]
	fn whole_brain_floats_with_time() {
		let mut s = sample_state();
		let at_rest = s.project(Vec3::ZERO).unwrap();
		assert!((at_rest.y - 300.0).abs() < 1e-9);

		// Quarter period of the float: full lift.
		let t = std::f64::consts::FRAC_PI_2 * 4.0 / 1.5;
		s.tick(t);
		assert_eq!(s.group, FloatPose::at(t));
		let lifted = s.project(Vec3::ZERO).unwrap();
		assert!(lifted.y < 299.0);

		let expected = s
			.camera
			.project(FloatPose::at(t).apply(s.frames[2].position), 800.0, 600.0);
		assert_eq!(s.projected[2], expected);
	}

	#[test]
	fn empty_graph_has_nothing_to_pick() {
		let s = NeuralGraphState::new(NeuralGraph::default(), &GraphConfig::default(), 800.0, 600.0);
		assert!(s.graph.is_empty());
		assert_eq!(s.node_at_position(400.0, 300.0), None);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut s = sample_state();
		for _ in 0..50 {
			s.zoom(1.0);
		}
		assert_eq!(s.camera.distance, MAX_DISTANCE);
		for _ in 0..50 {
			s.zoom(-1.0);
		}
		assert_eq!(s.camera.distance, MIN_DISTANCE);
	}
}
