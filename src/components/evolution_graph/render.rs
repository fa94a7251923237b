use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphCanvasState;
use crate::layout::{EdgeKind, Node};

const BACKGROUND: &str = "#ffffff";
const GRID: &str = "#e5e7eb";
const GRID_GAP: f64 = 16.0;
const FLOW_DASH: (f64, f64) = (8.0, 4.0);

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn set_dash(ctx: &CanvasRenderingContext2d, pattern: Option<(f64, f64)>) {
	let dash = match pattern {
		Some((dash, gap)) => js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&dash);
}

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_timeline(state, ctx);
}

fn draw_grid(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let gap = GRID_GAP * state.transform.k;
	if gap < 6.0 {
		return;
	}
	ctx.set_fill_style_str(GRID);
	let (ox, oy) = (state.transform.x.rem_euclid(gap), state.transform.y.rem_euclid(gap));
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x, y, 1.0, 1.0);
			y += gap;
		}
		x += gap;
	}
}

/// Release band pinned to the top of the canvas, scrolled horizontally with
/// the graph so each label sits above its column of nodes.
fn draw_timeline(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let band = state.config.timeline_height;
	let mid_y = band / 2.0;
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.95)");
	ctx.fill_rect(0.0, 0.0, state.width, band);
	ctx.set_stroke_style_str("#e5e7eb");
	ctx.set_line_width(2.0);
	ctx.begin_path();
	ctx.move_to(0.0, band);
	ctx.line_to(state.width, band);
	ctx.stroke();

	let column_center = state.config.node_width / 2.0;
	let xs: Vec<f64> = state
		.ticks
		.iter()
		.map(|tick| state.graph_to_screen_x(tick.x + column_center))
		.collect();
	if let (Some(first), Some(last)) = (xs.first(), xs.last()) {
		ctx.set_stroke_style_str("#60a5fa");
		ctx.begin_path();
		ctx.move_to(*first, mid_y);
		ctx.line_to(*last, mid_y);
		ctx.stroke();
	}

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for (tick, &x) in state.ticks.iter().zip(&xs) {
		if x < -100.0 || x > state.width + 100.0 {
			continue;
		}
		ctx.begin_path();
		let _ = ctx.arc(x, mid_y, 5.0, 0.0, std::f64::consts::TAU);
		ctx.set_fill_style_str("#3b82f6");
		ctx.fill();

		ctx.set_fill_style_str("#1f2937");
		ctx.set_font("bold 13px monospace");
		let _ = ctx.fill_text(&tick.identifier, x, mid_y - 15.0);
		ctx.set_fill_style_str("#6b7280");
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(&tick.release_date.format("%Y-%m-%d").to_string(), x, mid_y + 16.0);
	}
}

/// Polyline from `source` to `target`. Chains run side to side, branches
/// drop out of the bottom (or top) of the major and into the revision.
fn edge_path(state: &GraphCanvasState, source: &Node, target: &Node, kind: EdgeKind) -> Vec<(f64, f64)> {
	let (w, h) = (state.config.node_width, state.config.node_height);
	let (s, t) = (source.position, target.position);
	let (ty_mid, sy_mid) = (t.y + h / 2.0, s.y + h / 2.0);
	match kind {
		EdgeKind::Branch => {
			let sx = s.x + w / 2.0;
			let sy = if ty_mid < sy_mid { s.y } else { s.y + h };
			vec![(sx, sy), (sx, ty_mid), (t.x, ty_mid)]
		}
		EdgeKind::Chain => {
			let (sx, tx) = (s.x + w, t.x);
			if (sy_mid - ty_mid).abs() < f64::EPSILON {
				vec![(sx, sy_mid), (tx, ty_mid)]
			} else {
				let mid_x = (sx + tx) / 2.0;
				vec![(sx, sy_mid), (mid_x, sy_mid), (mid_x, ty_mid), (tx, ty_mid)]
			}
		}
	}
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, arrow_size) = (2.0, 8.0);
	let flow_offset = -(state.flow_time * 30.0) % (FLOW_DASH.0 + FLOW_DASH.1);
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for (edge, &(src, tgt)) in state.view.edges.iter().zip(state.edge_endpoints()) {
		let (source, target) = (&state.view.nodes[src], &state.view.nodes[tgt]);
		let points = edge_path(state, source, target, edge.kind);
		let is_highlighted = state.is_highlighted(src) && state.is_highlighted(tgt);

		let alpha = match (has_highlight, is_highlighted) {
			(false, _) => 1.0,
			(true, true) => 1.0,
			(true, false) => 1.0 - 0.75 * t,
		};
		let width = if has_highlight && is_highlighted {
			line_width * (1.0 + 0.5 * t)
		} else {
			line_width
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.style.color);
		ctx.set_line_width(width / k.max(0.5));
		if edge.animated {
			set_dash(ctx, Some(FLOW_DASH));
			ctx.set_line_dash_offset(flow_offset);
		} else {
			set_dash(ctx, edge.style.stroke.dash_pattern());
			ctx.set_line_dash_offset(0.0);
		}

		let Some((&(tip_x, tip_y), rest)) = points.split_last() else {
			continue;
		};
		let Some(&(back_x, back_y)) = rest.last() else {
			continue;
		};
		let (dx, dy) = (tip_x - back_x, tip_y - back_y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.begin_path();
		ctx.move_to(points[0].0, points[0].1);
		for &(x, y) in &points[1..points.len() - 1] {
			ctx.line_to(x, y);
		}
		ctx.line_to(tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		ctx.stroke();

		set_dash(ctx, None);
		ctx.set_fill_style_str(edge.style.color);
		let (base_x, base_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(base_x + px, base_y + py);
		ctx.line_to(base_x - px, base_y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
	set_dash(ctx, None);
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);
	let (w, h) = (state.config.node_width, state.config.node_height);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for (idx, node) in state.view.nodes.iter().enumerate() {
		let highlighted = state.is_highlighted(idx);
		let alpha = if has_highlight && !highlighted {
			1.0 - 0.7 * t
		} else {
			1.0
		};
		let Node { position: p, style, .. } = node;

		ctx.set_global_alpha(alpha);
		ctx.set_fill_style_str(style.fill);
		ctx.fill_rect(p.x, p.y, w, h);

		let border = if state.is_selected(idx) {
			4.0
		} else if has_highlight && highlighted {
			2.0 + t
		} else {
			2.0
		};
		ctx.set_stroke_style_str(style.border);
		ctx.set_line_width(border);
		set_dash(ctx, style.stroke.dash_pattern());
		ctx.stroke_rect(p.x, p.y, w, h);
		set_dash(ctx, None);

		let (cx, cy) = (p.x + w / 2.0, p.y + h / 2.0);
		ctx.set_fill_style_str(style.text);
		ctx.set_font("500 12px sans-serif");
		let _ = ctx.fill_text(&node.package, cx, cy - 9.0);
		ctx.set_font("12px monospace");
		let version = format!("v{}", node.version);
		let _ = ctx.fill_text(&version, cx, cy + 9.0);

		if style.strike_through {
			ctx.set_stroke_style_str(style.text);
			ctx.set_line_width(1.0);
			ctx.begin_path();
			ctx.move_to(p.x + 12.0, cy - 9.0);
			ctx.line_to(p.x + w - 12.0, cy - 9.0);
			ctx.stroke();
		}
	}
	ctx.set_global_alpha(1.0);
}
