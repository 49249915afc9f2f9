//! Plumbing shared by the canvas components: HiDPI backing stores and the
//! self-scheduling animation frame slot.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

/// Device pixel ratios outside this band are clamped into it.
pub const MIN_PIXEL_RATIO: f64 = 1.0;
pub const MAX_PIXEL_RATIO: f64 = 2.0;

pub fn clamp_pixel_ratio(raw: f64) -> f64 {
	if raw.is_finite() {
		raw.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
	} else {
		MIN_PIXEL_RATIO
	}
}

pub fn pixel_ratio(window: &Window) -> f64 {
	clamp_pixel_ratio(window.device_pixel_ratio())
}

/// Backing store size in device pixels for a CSS size.
pub fn backing_size(width: f64, height: f64, ratio: f64) -> (u32, u32) {
	(
		(width * ratio).round().max(0.0) as u32,
		(height * ratio).round().max(0.0) as u32,
	)
}

/// Sizes the backing store in device pixels while the element keeps its CSS
/// size. All drawing stays in CSS pixels, see [`begin_frame`].
pub fn size_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64, ratio: f64) {
	let (bw, bh) = backing_size(width, height, ratio);
	canvas.set_width(bw);
	canvas.set_height(bh);
	let style = canvas.style();
	let _ = style.set_property("width", &format!("{width}px"));
	let _ = style.set_property("height", &format!("{height}px"));
}

/// Resets the transform so one unit is one CSS pixel.
pub fn begin_frame(ctx: &CanvasRenderingContext2d, ratio: f64) {
	let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
}

/// Holds the requestAnimationFrame callback. The callback keeps a clone of
/// the slot to re-request itself, which is a reference cycle until
/// [`LoopSlot::release`] empties the slot.
pub struct LoopSlot<T>(Rc<RefCell<Option<T>>>);

impl<T> Clone for LoopSlot<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<T> Default for LoopSlot<T> {
	fn default() -> Self {
		Self(Rc::new(RefCell::new(None)))
	}
}

impl<T> LoopSlot<T> {
	pub fn set(&self, value: T) {
		*self.0.borrow_mut() = Some(value);
	}

	pub fn get(&self) -> Ref<'_, Option<T>> {
		self.0.borrow()
	}

	/// Empties the slot, breaking the cycle.
	pub fn release(&self) -> Option<T> {
		self.0.borrow_mut().take()
	}

	pub fn is_set(&self) -> bool {
		self.0.borrow().is_some()
	}
}

impl LoopSlot<Closure<dyn FnMut()>> {
	/// Requests the next animation frame with the stored callback.
	pub fn request_frame(&self, window: &Window) {
		if let Some(ref cb) = *self.get() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}

	/// Drops the stored callback once the current task has finished. A
	/// closure cannot be dropped while it is running, so the release is
	/// deferred through a zero-delay timeout.
	pub fn release_later(&self, window: &Window) {
		let slot = self.clone();
		let task = Closure::once_into_js(move || {
			slot.release();
		});
		if window
			.set_timeout_with_callback(task.unchecked_ref())
			.is_err()
		{
			log::warn!("Could not schedule animation loop release");
		}
	}
}
