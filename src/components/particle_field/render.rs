use web_sys::CanvasRenderingContext2d;

use super::state::ParticleFieldState;

const POINT_SIZE: f64 = 0.5;

pub fn render(state: &ParticleFieldState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	let _ = ctx.set_global_composite_operation("lighter");
	draw_lines(state, ctx);
	draw_points(state, ctx);
	let _ = ctx.set_global_composite_operation("source-over");
}

fn draw_lines(state: &ParticleFieldState, ctx: &CanvasRenderingContext2d) {
	let cam = &state.line_camera;
	ctx.set_stroke_style_str("rgba(0, 229, 255, 0.2)");
	ctx.set_line_width(1.0);
	ctx.begin_path();
	for &(a, b) in &state.field.lines {
		let (Some(p1), Some(p2)) = (
			cam.project(a, state.width, state.height),
			cam.project(b, state.width, state.height),
		) else {
			continue;
		};
		ctx.move_to(p1.x, p1.y);
		ctx.line_to(p2.x, p2.y);
	}
	ctx.stroke();
}

fn draw_points(state: &ParticleFieldState, ctx: &CanvasRenderingContext2d) {
	let cam = &state.point_camera;
	ctx.set_fill_style_str("#4A00E0");
	for &p in &state.field.points {
		let Some(p) = cam.project(p, state.width, state.height) else {
			continue;
		};
		// Size attenuates with distance.
		let size = (POINT_SIZE * p.scale).max(0.5);
		ctx.fill_rect(p.x - size / 2.0, p.y - size / 2.0, size, size);
	}
}
