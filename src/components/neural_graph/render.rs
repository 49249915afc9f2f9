use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::animate::{connection_opacity, core_pulse, core_sway, ease_out_cubic};
use super::state::{CORE_RADIUS, NODE_RADIUS, NeuralGraphState, PARTICLE_RADIUS};
use crate::components::geometry::{Projected, Vec3};

/// How far past the outermost node the click ripple travels.
const RIPPLE_OVERSHOOT: f64 = 0.4;

pub fn render(state: &NeuralGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	draw_ripple(state, ctx);
	draw_edges(state, ctx);
	draw_hover_marker(state, ctx);

	// Painter's order with the core slotted in at its own depth.
	let core = state.project(Vec3::ZERO);
	let core_depth = core.map_or(f64::INFINITY, |p| p.depth);
	let mut core_drawn = false;
	for &idx in &state.draw_order {
		let Some(p) = state.projected[idx] else {
			continue;
		};
		if !core_drawn && p.depth < core_depth {
			if let Some(core) = core {
				draw_core(state, ctx, core);
			}
			draw_particles(state, ctx);
			core_drawn = true;
		}
		draw_node(state, ctx, idx, p);
	}
	if !core_drawn {
		if let Some(core) = core {
			draw_core(state, ctx, core);
		}
		draw_particles(state, ctx);
	}
}

fn draw_ripple(state: &NeuralGraphState, ctx: &CanvasRenderingContext2d) {
	let (Some(t), Some(origin)) = (state.ripple(), state.project(Vec3::ZERO)) else {
		return;
	};
	let reach = state.shell_radius + RIPPLE_OVERSHOOT;
	let radius = (CORE_RADIUS + (reach - CORE_RADIUS) * ease_out_cubic(t)) * origin.scale;
	let alpha = 0.6 * (1.0 - t);

	ctx.set_stroke_style_str(&format!("rgba(0, 255, 255, {})", alpha));
	ctx.set_line_width(2.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(10.0),
		&JsValue::from_f64(6.0),
	));
	ctx.set_line_dash_offset(-t * 40.0);
	ctx.begin_path();
	let _ = ctx.arc(origin.x, origin.y, radius, 0.0, 2.0 * PI);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(state: &NeuralGraphState, ctx: &CanvasRenderingContext2d) {
	for &(a, b) in &state.edges {
		let (Some(p1), Some(p2)) = (state.projected[a], state.projected[b]) else {
			continue;
		};
		let active = state.is_edge_active(a, b);
		let alpha = connection_opacity(active, state.elapsed);
		let (rgb, width) = if active {
			("255, 0, 255", 2.0)
		} else {
			("0, 255, 255", 1.0)
		};

		ctx.set_stroke_style_str(&format!("rgba({}, {})", rgb, alpha));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(p1.x, p1.y);
		ctx.line_to(p2.x, p2.y);
		ctx.stroke();
	}
}

fn draw_core(state: &NeuralGraphState, ctx: &CanvasRenderingContext2d, core: Projected) {
	let radius = CORE_RADIUS * core.scale;
	let intensity = 1.5 + core_pulse(state.elapsed);
	let glow = (intensity / 2.5).min(1.0);

	// The specular spot drifts with the core's sway.
	let (pitch, yaw) = core_sway(state.elapsed);
	let spot = Vec3::new(-0.35, 0.35, 0.85).rotate_y(yaw).rotate_x(pitch);
	let (sx, sy) = (core.x + spot.x * radius, core.y - spot.y * radius);

	if let Ok(halo) = ctx.create_radial_gradient(core.x, core.y, radius * 0.8, core.x, core.y, radius * 1.8) {
		let _ = halo.add_color_stop(0.0, &format!("rgba(0, 136, 255, {})", 0.35 * glow));
		let _ = halo.add_color_stop(1.0, "rgba(0, 136, 255, 0)");
		ctx.begin_path();
		let _ = ctx.arc(core.x, core.y, radius * 1.8, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&halo);
		ctx.fill();
	}

	if let Ok(body) = ctx.create_radial_gradient(sx, sy, radius * 0.05, core.x, core.y, radius) {
		let _ = body.add_color_stop(0.0, "rgba(255, 255, 255, 0.95)");
		let _ = body.add_color_stop(0.35, &format!("rgba(0, 255, 255, {})", 0.6 + 0.3 * glow));
		let _ = body.add_color_stop(1.0, &format!("rgba(0, 80, 200, {})", 0.5 + 0.4 * glow));
		ctx.begin_path();
		let _ = ctx.arc(core.x, core.y, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&body);
		ctx.fill();
	}
}

fn draw_particles(state: &NeuralGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("white");
	for path in &state.particles {
		let Some(p) = state.project(path.position(state.elapsed)) else {
			continue;
		};
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, (PARTICLE_RADIUS * p.scale).max(1.0), 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_node(state: &NeuralGraphState, ctx: &CanvasRenderingContext2d, idx: usize, p: Projected) {
	let hovered = state.hover.is_hovered(idx);
	let radius = NODE_RADIUS * state.frames[idx].emphasis * p.scale;
	let (color, emissive, intensity) = if hovered {
		("#ff00ff", "170, 0, 255", 1.5)
	} else {
		("#00ffff", "0, 136, 255", 0.8)
	};

	let glow_radius = radius * (1.6 + intensity);
	if let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, radius * 0.5, p.x, p.y, glow_radius) {
		let _ = gradient.add_color_stop(0.0, &format!("rgba({}, {})", emissive, 0.3 * intensity));
		let _ = gradient.add_color_stop(1.0, &format!("rgba({}, 0)", emissive));
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, glow_radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();
	}

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
}

/// Faint ring where the hovered node rests, so the bobbing node reads as
/// anchored to its slot.
fn draw_hover_marker(state: &NeuralGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(hovered) = state.hover.current() else {
		return;
	};
	let Some(p) = state.project(hovered.position) else {
		return;
	};
	ctx.set_stroke_style_str("rgba(255, 0, 255, 0.45)");
	ctx.set_line_width(1.0);
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, NODE_RADIUS * 2.2 * p.scale, 0.0, 2.0 * PI);
	ctx.stroke();
}
