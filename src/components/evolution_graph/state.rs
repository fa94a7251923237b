use std::collections::{HashMap, HashSet};

use crate::layout::types::TimelineTick;
use crate::layout::{GraphView, LayoutConfig, Node, Point};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
const FIT_PADDING: f64 = 40.0;
/// Pointer travel, in pixels, below which a press counts as a click.
const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Everything the canvas needs between animation frames.
pub struct GraphCanvasState {
	pub view: GraphView,
	pub ticks: Vec<TimelineTick>,
	pub config: LayoutConfig,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<String>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	index: HashMap<String, usize>,
	edges: Vec<(usize, usize)>,
}

impl GraphCanvasState {
	pub fn new(
		view: GraphView,
		ticks: Vec<TimelineTick>,
		config: LayoutConfig,
		width: f64,
		height: f64,
	) -> Self {
		let mut state = Self {
			view: GraphView::default(),
			ticks,
			config,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			flow_time: 0.0,
			index: HashMap::new(),
			edges: Vec::new(),
		};
		state.set_view(view);
		state.fit_view();
		state
	}

	/// Swaps in a new projection, keeping pan and zoom.
	pub fn set_view(&mut self, mut view: GraphView) {
		self.index = view
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.clone(), i))
			.collect();
		view.edges
			.retain(|edge| self.index.contains_key(&edge.source) && self.index.contains_key(&edge.target));
		// Parallel to `view.edges`.
		self.edges = view
			.edges
			.iter()
			.map(|edge| (self.index[&edge.source], self.index[&edge.target]))
			.collect();
		self.view = view;
		self.hover = HoverState::default();
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.view.nodes[i])
	}

	/// Top-left and bottom-right corners of everything drawn.
	pub fn bounds(&self) -> Option<(Point, Point)> {
		let (w, h) = (self.config.node_width, self.config.node_height);
		self.view.nodes.iter().fold(None, |acc, node| {
			let p = node.position;
			Some(match acc {
				None => (p, Point { x: p.x + w, y: p.y + h }),
				Some((min, max)) => (
					Point {
						x: min.x.min(p.x),
						y: min.y.min(p.y),
					},
					Point {
						x: max.x.max(p.x + w),
						y: max.y.max(p.y + h),
					},
				),
			})
		})
	}

	/// Zooms and centers so every node is visible below the timeline band.
	pub fn fit_view(&mut self) {
		let Some((min, max)) = self.bounds() else {
			self.transform = ViewTransform::default();
			return;
		};
		let avail_w = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let avail_h = (self.height - self.config.timeline_height - 2.0 * FIT_PADDING).max(1.0);
		let (graph_w, graph_h) = ((max.x - min.x).max(1.0), (max.y - min.y).max(1.0));
		let k = (avail_w / graph_w).min(avail_h / graph_h).clamp(MIN_ZOOM, 1.0);

		self.transform = ViewTransform {
			x: FIT_PADDING + (avail_w - graph_w * k) / 2.0 - min.x * k,
			y: self.config.timeline_height + FIT_PADDING + (avail_h - graph_h * k) / 2.0 - min.y * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen_x(&self, gx: f64) -> f64 {
		gx * self.transform.k + self.transform.x
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let (w, h) = (self.config.node_width, self.config.node_height);
		// Last drawn wins, matching paint order.
		self.view.nodes.iter().rposition(|node| {
			let p = node.position;
			gx >= p.x && gx <= p.x + w && gy >= p.y && gy <= p.y + h
		})
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn drag_pan(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
			self.pan.moved = true;
		}
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	/// Ends a pan; returns true when the pointer barely moved, i.e. the
	/// press was a click.
	pub fn end_pan(&mut self) -> bool {
		let clicked = self.pan.active && !self.pan.moved;
		self.pan.active = false;
		clicked
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn is_selected(&self, idx: usize) -> bool {
		self.selected.as_deref() == Some(self.view.nodes[idx].id.as_str())
	}

	pub fn edge_endpoints(&self) -> &[(usize, usize)] {
		&self.edges
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
