//! Full-screen states shown instead of the graph, and the counters overlay.

use leptos::prelude::*;

#[component]
pub fn LoadingSpinner(#[prop(into, default = "Loading...".into())] message: String) -> impl IntoView {
	view! {
		<div class="loading-container">
			<div class="loading-spinner"></div>
			<p>{message}</p>
		</div>
	}
}

#[component]
pub fn ErrorDisplay(
	#[prop(into)] message: String,
	#[prop(default = true)] retryable: bool,
	on_retry: Callback<()>,
) -> impl IntoView {
	view! {
		<div class="error-container">
			<h2>"Something went wrong"</h2>
			<p class="error-message">{message}</p>
			<button class="retry-button" on:click=move |_| on_retry.run(())>
				{if retryable { "Retry" } else { "Reload" }}
			</button>
		</div>
	}
}

/// Shown when the backend answered but had nothing to lay out.
#[component]
pub fn EmptyState(
	on_refresh: Callback<()>,
	#[prop(into)] refreshing: Signal<bool>,
) -> impl IntoView {
	view! {
		<div class="loading-container">
			<h2>"No data"</h2>
			<p>"Collect release history on the backend to see the package graph."</p>
			<button
				class="retry-button"
				disabled=move || refreshing.get()
				on:click=move |_| on_refresh.run(())
			>
				{move || if refreshing.get() { "Refreshing..." } else { "Fetch data" }}
			</button>
		</div>
	}
}

#[component]
pub fn GraphStats(
	#[prop(into)] visible_nodes: Signal<usize>,
	#[prop(into)] total_nodes: Signal<usize>,
	#[prop(into)] visible_edges: Signal<usize>,
	#[prop(into)] total_edges: Signal<usize>,
	/// `None` while the health check is in flight.
	#[prop(into)] healthy: Signal<Option<bool>>,
	/// Asks the backend to re-collect its data.
	on_refresh: Callback<()>,
	#[prop(into)] refreshing: Signal<bool>,
) -> impl IntoView {
	let health = move || match healthy.get() {
		None => ("health-checking", "API: checking"),
		Some(true) => ("health-ok", "API: ok"),
		Some(false) => ("health-error", "API: unreachable"),
	};

	view! {
		<div class="graph-stats">
			<div>{move || format!("Nodes: {} / {}", visible_nodes.get(), total_nodes.get())}</div>
			<div>{move || format!("Edges: {} / {}", visible_edges.get(), total_edges.get())}</div>
			<div class=move || health().0>{move || health().1}</div>
			<button
				class="refresh-button"
				disabled=move || refreshing.get()
				on:click=move |_| on_refresh.run(())
			>
				{move || if refreshing.get() { "Refreshing..." } else { "Refresh data" }}
			</button>
		</div>
	}
}
