use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::generate::generate;
use super::render;
use super::state::NeuralGraphState;
use super::types::GraphConfig;
use crate::components::canvas::{self, LoopSlot};

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Animated "AI brain": a randomly wired graph of concept nodes around a
/// pulsing core. The hovered node's concept is mirrored into `concept`.
#[component]
pub fn NeuralGraphCanvas(
	concept: RwSignal<Option<&'static str>>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NeuralGraphState>>> = Rc::new(RefCell::new(None));
	let animate: LoopSlot<Closure<dyn FnMut()>> = LoopSlot::default();
	let state_init = state.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(performance) = window.performance() else {
			error!("Performance timer unavailable, neural graph disabled");
			return;
		};

		let (w, h) = (
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(600.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(500.0)
			}),
		);
		let ratio = canvas::pixel_ratio(&window);
		canvas::size_canvas(&canvas, w, h, ratio);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("Canvas 2d context unavailable, neural graph disabled");
			return;
		};

		let graph = match generate(&config, &mut SmallRng::from_entropy()) {
			Ok(graph) => graph,
			Err(e) => {
				error!("Failed to build neural graph: {}", e);
				return;
			}
		};
		let new_state = NeuralGraphState::new(graph, &config, w, h);
		info!(
			"Neural graph mounted: {} nodes, {} edges",
			new_state.graph.len(),
			new_state.edges.len()
		);
		*state_init.borrow_mut() = Some(new_state);

		let start = performance.now();
		let (state_anim, animate_inner, canvas_anim) =
			(state_init.clone(), animate.clone(), canvas.clone());
		animate.set(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			// Unmounted: stop the loop and release the graph and this closure.
			if !canvas_anim.is_connected() {
				*state_anim.borrow_mut() = None;
				animate_inner.release_later(&win);
				info!("Neural graph unmounted, animation stopped");
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick((performance.now() - start) / 1000.0);
				canvas::begin_frame(&ctx, ratio);
				render::render(s, &ctx);
			}
			animate_inner.request_frame(&win);
		}));
		animate.request_frame(&window);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_drag(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else if s.update_hover_at(x, y) {
				concept.set(s.hover.label());
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let point = canvas_point(canvas_ref, &ev);
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			match point {
				Some((x, y)) => {
					if s.finish_drag_at(x, y) {
						concept.set(s.hover.label());
					}
				}
				None => s.end_drag(),
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_drag();
			if s.clear_hover() {
				concept.set(None);
			}
		}
	};

	let state_cl = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_cl.borrow_mut() {
			if s.take_drag_moved() || s.node_at_position(x, y).is_some() {
				return;
			}
			s.background_activate();
			concept.set(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="neural-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:click=on_click
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
