use rand::Rng;

use crate::components::geometry::{Camera, Vec3};

pub const POINT_COUNT: usize = 1000;
pub const POINT_SPREAD: f64 = 100.0;
pub const LINE_COUNT: usize = 200;
pub const LINE_SPREAD: f64 = 50.0;

const CAMERA_DISTANCE: f64 = 30.0;
const CAMERA_FOV: f64 = 75.0;

/// Uniform point in an axis-aligned cube of the given side, centred on the origin.
fn in_cube<R: Rng + ?Sized>(rng: &mut R, side: f64) -> Vec3 {
	Vec3::new(
		(rng.r#gen::<f64>() - 0.5) * side,
		(rng.r#gen::<f64>() - 0.5) * side,
		(rng.r#gen::<f64>() - 0.5) * side,
	)
}

pub struct ParticleField {
	pub points: Vec<Vec3>,
	pub lines: Vec<(Vec3, Vec3)>,
}

impl ParticleField {
	pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
		let points = (0..POINT_COUNT).map(|_| in_cube(rng, POINT_SPREAD)).collect();
		let lines = (0..LINE_COUNT)
			.map(|_| (in_cube(rng, LINE_SPREAD), in_cube(rng, LINE_SPREAD)))
			.collect();
		Self { points, lines }
	}
}

/// The two layers spin independently, so each gets its own camera.
pub struct ParticleFieldState {
	pub field: ParticleField,
	pub point_camera: Camera,
	pub line_camera: Camera,
	pub width: f64,
	pub height: f64,
	pub elapsed: f64,
}

impl ParticleFieldState {
	pub fn new(field: ParticleField, width: f64, height: f64) -> Self {
		Self {
			field,
			point_camera: Camera::new(CAMERA_DISTANCE, CAMERA_FOV),
			line_camera: Camera::new(CAMERA_DISTANCE, CAMERA_FOV),
			width,
			height,
			elapsed: 0.0,
		}
	}

	pub fn tick(&mut self, elapsed: f64) {
		self.elapsed = elapsed.max(self.elapsed);
		let t = self.elapsed;
		self.point_camera.pitch = t * 0.05;
		self.point_camera.yaw = t * 0.075;
		self.line_camera.pitch = t * 0.02;
		self.line_camera.yaw = t * 0.03;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
