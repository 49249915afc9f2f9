//! Minimal 3D math shared by the canvases: vectors, orbit rotation and a
//! perspective camera that maps world points to canvas pixels.

use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vec3 {
	pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}

	/// Linear interpolation, `t = 0` is `self` and `t = 1` is `other`.
	pub fn lerp(self, other: Vec3, t: f64) -> Vec3 {
		self + (other - self) * t
	}

	pub fn rotate_x(self, angle: f64) -> Vec3 {
		let (s, c) = angle.sin_cos();
		Vec3::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
	}

	pub fn rotate_y(self, angle: f64) -> Vec3 {
		let (s, c) = angle.sin_cos();
		Vec3::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
	}

	pub fn rotate_z(self, angle: f64) -> Vec3 {
		let (s, c) = angle.sin_cos();
		Vec3::new(self.x * c - self.y * s, self.x * s + self.y * c, self.z)
	}
}

impl Add for Vec3 {
	type Output = Vec3;

	fn add(self, rhs: Vec3) -> Vec3 {
		Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
	}
}

impl Sub for Vec3 {
	type Output = Vec3;

	fn sub(self, rhs: Vec3) -> Vec3 {
		Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
	}
}

impl Mul<f64> for Vec3 {
	type Output = Vec3;

	fn mul(self, k: f64) -> Vec3 {
		Vec3::new(self.x * k, self.y * k, self.z * k)
	}
}

/// A point after projection. `scale` converts world units at that depth into
/// pixels, so a sphere of radius `r` is drawn with radius `r * scale`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	pub depth: f64,
	pub scale: f64,
}

const NEAR_PLANE: f64 = 0.05;

/// Camera on the +z axis looking at the origin. The scene is rotated by
/// `yaw` about y and then `pitch` about x before projection.
#[derive(Clone, Debug)]
pub struct Camera {
	pub distance: f64,
	pub fov_y: f64,
	pub yaw: f64,
	pub pitch: f64,
}

impl Camera {
	pub fn new(distance: f64, fov_degrees: f64) -> Self {
		Self {
			distance,
			fov_y: fov_degrees.to_radians(),
			yaw: 0.0,
			pitch: 0.0,
		}
	}

	/// World point into view space (camera at origin, looking down -z).
	pub fn to_view(&self, p: Vec3) -> Vec3 {
		let r = p.rotate_y(self.yaw).rotate_x(self.pitch);
		Vec3::new(r.x, r.y, r.z - self.distance)
	}

	pub fn project(&self, p: Vec3, width: f64, height: f64) -> Option<Projected> {
		let v = self.to_view(p);
		let depth = -v.z;
		if depth < NEAR_PLANE {
			return None;
		}
		let focal = (height / 2.0) / (self.fov_y / 2.0).tan();
		let scale = focal / depth;
		Some(Projected {
			x: width / 2.0 + v.x * scale,
			y: height / 2.0 - v.y * scale,
			depth,
			scale,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	#[test]
	fn origin_projects_to_canvas_centre() {
		let cam = Camera::new(4.0, 60.0);
		let p = cam.project(Vec3::ZERO, 800.0, 600.0).unwrap();
		assert!((p.x - 400.0).abs() < EPS);
		assert!((p.y - 300.0).abs() < EPS);
		assert!((p.depth - 4.0).abs() < EPS);
	}

	#[test]
	fn points_behind_camera_are_rejected() {
		let cam = Camera::new(4.0, 60.0);
		assert!(cam.project(Vec3::new(0.0, 0.0, 5.0), 800.0, 600.0).is_none());
	}

	#[test]
	fn nearer_points_are_larger() {
		let cam = Camera::new(4.0, 60.0);
		let near = cam.project(Vec3::new(0.0, 0.0, 1.0), 800.0, 600.0).unwrap();
		let far = cam.project(Vec3::new(0.0, 0.0, -1.0), 800.0, 600.0).unwrap();
		assert!(near.scale > far.scale);
	}

	#[test]
	fn up_is_up_on_screen() {
		let cam = Camera::new(4.0, 60.0);
		let p = cam.project(Vec3::new(0.0, 1.0, 0.0), 800.0, 600.0).unwrap();
		assert!(p.y < 300.0);
	}

	#[test]
	fn rotations_preserve_length() {
		let v = Vec3::new(1.0, -2.0, 0.5);
		let r = v.rotate_z(0.4).rotate_y(0.7).rotate_x(-1.3);
		assert!((r.length() - v.length()).abs() < EPS);
	}

	#[test]
	fn lerp_endpoints() {
		let a = Vec3::new(1.0, 2.0, 3.0);
		let b = Vec3::new(-1.0, 0.0, 5.0);
		assert_eq!(a.lerp(b, 0.0), a);
		assert_eq!(a.lerp(b, 1.0), b);
		assert_eq!(a.lerp(b, 0.5), Vec3::new(0.0, 1.0, 4.0));
	}
}
