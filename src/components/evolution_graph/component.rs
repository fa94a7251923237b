use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::GraphCanvasState;
use crate::layout::types::TimelineTick;
use crate::layout::{GraphView, LayoutConfig, Node};

const FRAME_DT: f64 = 0.016;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Window hooks owned by one mounted canvas: the self-rescheduling frame
/// closure and the resize listener.
#[derive(Clone, Default)]
struct FrameLoop {
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	frame: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	fn set_animate(&self, cb: Closure<dyn FnMut()>) {
		*self.animate.borrow_mut() = Some(cb);
	}

	fn request_frame(&self, window: &Window) {
		if let Some(cb) = self.animate.borrow().as_ref() {
			self.frame
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}

	fn listen_resize(&self, window: &Window, cb: Closure<dyn FnMut()>) {
		let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		*self.resize.borrow_mut() = Some(cb);
	}

	/// Cancels the pending frame, unhooks the resize listener and drops both
	/// closures. The frame closure holds a clone of `self`, so this is what
	/// frees it.
	fn teardown(&self) {
		let window = web_sys::window();
		if let (Some(id), Some(win)) = (self.frame.take(), window.as_ref()) {
			let _ = win.cancel_animation_frame(id);
		}
		if let Some(cb) = self.resize.borrow_mut().take() {
			if let Some(win) = window.as_ref() {
				let _ =
					win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
	}
}

/// Pannable, zoomable canvas showing the projected release graph.
///
/// Clicking a node reports it through `on_select`; clicking the background
/// reports `None`.
#[component]
pub fn EvolutionGraphCanvas(
	#[prop(into)] view: Signal<GraphView>,
	#[prop(into)] ticks: Signal<Vec<TimelineTick>>,
	#[prop(into)] selected: Signal<Option<String>>,
	on_select: Callback<Option<Node>>,
	#[prop(optional)] config: LayoutConfig,
	#[prop(default = true)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphCanvasState>>> = Rc::new(RefCell::new(None));
	let frames = FrameLoop::default();
	let (state_init, frames_init) = (state.clone(), frames.clone());

	// The page remounts the canvas on every reload.
	let teardown = StoredValue::new_local(frames);
	on_cleanup(move || {
		teardown.try_with_value(|frames| {
			frames.teardown();
			log::debug!("Graph canvas torn down");
		});
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((1280.0, 800.0))
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("Canvas 2d context unavailable");
			return;
		};
		*state_init.borrow_mut() = Some(GraphCanvasState::new(
			view.get_untracked(),
			ticks.get_untracked(),
			config.clone(),
			w,
			h,
		));
		log::debug!("Graph canvas initialized at {}x{}", w, h);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			frames_init.listen_resize(
				&window,
				Closure::new(move || {
					let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
						return;
					};
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					if let Some(ref mut s) = *state_resize.borrow_mut() {
						s.resize(nw, nh);
					}
				}),
			);
		}

		let (state_anim, frames_anim, canvas_anim) =
			(state_init.clone(), frames_init.clone(), canvas.clone());
		frames_init.set_animate(Closure::new(move || {
			frames_anim.frame.set(None);
			if !canvas_anim.is_connected() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(FRAME_DT);
				render::render(s, &ctx);
			}
			if let Some(win) = web_sys::window() {
				frames_anim.request_frame(&win);
			}
		}));
		frames_init.request_frame(&window);
	});

	// Filter changes swap the graph but keep the camera.
	let state_view = state.clone();
	Effect::new(move |_| {
		let (next, next_ticks) = (view.get(), ticks.get());
		if let Some(ref mut s) = *state_view.borrow_mut() {
			s.set_view(next);
			s.ticks = next_ticks;
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.selected = id;
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_pan(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.drag_pan(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		let clicked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if !s.end_pan() {
				return;
			}
			s.node_at_position(x, y).map(|idx| s.view.nodes[idx].clone())
		};
		// The borrow is released before handing control to the page.
		on_select.run(clicked);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
			s.set_hover(None);
		}
	};

	let state_dbl = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dbl.borrow_mut() {
			s.fit_view();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="evolution-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use super::*;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn teardown_unhooks_resize_and_frees_frame_closure() {
		let window = web_sys::window().unwrap();
		let frames = FrameLoop::default();
		let resizes = Rc::new(Cell::new(0));

		let counter = resizes.clone();
		frames.listen_resize(&window, Closure::new(move || counter.set(counter.get() + 1)));
		let looped = frames.clone();
		frames.set_animate(Closure::new(move || looped.frame.set(None)));
		frames.request_frame(&window);
		assert!(frames.frame.get().is_some());

		let resize = web_sys::Event::new("resize").unwrap();
		window.dispatch_event(&resize).unwrap();
		assert_eq!(resizes.get(), 1);

		frames.teardown();
		window.dispatch_event(&resize).unwrap();
		assert_eq!(resizes.get(), 1);
		assert!(frames.frame.get().is_none());
		assert!(frames.animate.borrow().is_none());
		// Only this handle is left once the frame closure is gone.
		assert_eq!(Rc::strong_count(&frames.animate), 1);
	}
}
