use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::render;
use super::state::{ParticleField, ParticleFieldState};
use crate::components::canvas::{self, LoopSlot};

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Fullscreen, slowly rotating field of points and faint connection lines
/// drawn behind the page.
#[component]
pub fn ParticleBackground() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ParticleFieldState>>> = Rc::new(RefCell::new(None));
	let animate: LoopSlot<Closure<dyn FnMut()>> = LoopSlot::default();
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let ratio = Rc::new(Cell::new(1.0));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(performance) = window.performance() else {
			error!("Performance timer unavailable, particle background disabled");
			return;
		};
		let (w, h) = window_size(&window).unwrap_or((1280.0, 720.0));
		ratio.set(canvas::pixel_ratio(&window));
		canvas::size_canvas(&canvas, w, h, ratio.get());

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("Canvas 2d context unavailable, particle background disabled");
			return;
		};

		let field = ParticleField::new(&mut SmallRng::from_entropy());
		info!(
			"Particle background mounted: {} points, {} lines",
			field.points.len(),
			field.lines.len()
		);
		*state.borrow_mut() = Some(ParticleFieldState::new(field, w, h));

		let (state_resize, canvas_resize, ratio_resize) = (state.clone(), canvas.clone(), ratio.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let Some((nw, nh)) = window_size(&win) else {
				return;
			};
			ratio_resize.set(canvas::pixel_ratio(&win));
			canvas::size_canvas(&canvas_resize, nw, nh, ratio_resize.get());
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let start = performance.now();
		let (state_anim, animate_inner, canvas_anim, resize_inner, ratio_anim) = (
			state.clone(),
			animate.clone(),
			canvas.clone(),
			resize_cb.clone(),
			ratio.clone(),
		);
		animate.set(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !canvas_anim.is_connected() {
				*state_anim.borrow_mut() = None;
				if let Some(cb) = resize_inner.borrow_mut().take() {
					let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				animate_inner.release_later(&win);
				info!("Particle background unmounted, animation stopped");
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick((performance.now() - start) / 1000.0);
				canvas::begin_frame(&ctx, ratio_anim.get());
				render::render(s, &ctx);
			}
			animate_inner.request_frame(&win);
		}));
		animate.request_frame(&window);
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-background"
			style="position: fixed; inset: 0; z-index: 0; pointer-events: none; display: block;"
		/>
	}
}
