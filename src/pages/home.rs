use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{ApiClient, ApiConfig, RequestSequence};
use crate::components::evolution_graph::EvolutionGraphCanvas;
use crate::components::filter_panel::FilterPanel;
use crate::components::node_details::NodeDetails;
use crate::components::status::{EmptyState, ErrorDisplay, GraphStats, LoadingSpinner};
use crate::layout::{EvolutionGraph, FilterState, GraphView, LayoutConfig, Node, build_graph, project};

/// Where the page is in its fetch cycle.
#[derive(Clone, Debug, Default)]
enum LoadState {
	#[default]
	Loading,
	Ready(Arc<EvolutionGraph>),
	Failed { message: String, retryable: bool },
}

impl LoadState {
	fn graph(&self) -> Option<&Arc<EvolutionGraph>> {
		match self {
			LoadState::Ready(graph) => Some(graph),
			_ => None,
		}
	}
}

/// Carries a selection over to a freshly built graph: the node with the same
/// id replaces the old one, and a node that is gone clears the selection.
fn carry_selection(selected: Option<Node>, graph: &EvolutionGraph) -> Option<Node> {
	let id = selected?.id;
	graph.nodes.iter().find(|node| node.id == id).cloned()
}

/// Release graph page: fetches, lays out and filters the package history.
#[component]
pub fn Home() -> impl IntoView {
	let client = ApiClient::new(ApiConfig::default());
	let sequence = RequestSequence::new();
	let config = LayoutConfig::default();

	let state = RwSignal::new(LoadState::default());
	let filter = RwSignal::new(FilterState::default());
	let selected = RwSignal::new(None::<Node>);
	let refreshing = RwSignal::new(false);
	let healthy = RwSignal::new(None::<bool>);

	let reload = {
		let (client, config) = (client.clone(), config.clone());
		Callback::new(move |()| {
			let ticket = sequence.begin();
			state.set(LoadState::Loading);
			let (client, sequence, config) = (client.clone(), sequence.clone(), config.clone());
			spawn_local(async move {
				let result = client.visualization().await;
				// A newer request owns the page now.
				if !sequence.is_current(ticket) {
					log::debug!("Dropping stale visualization response");
					return;
				}
				match result {
					Ok(data) => {
						let graph = build_graph(&data, &config);
						log::info!(
							"Loaded {} releases, {} nodes, {} edges",
							graph.ticks.len(),
							graph.nodes.len(),
							graph.edges.len()
						);
						selected.update(|s| *s = carry_selection(s.take(), &graph));
						state.set(LoadState::Ready(Arc::new(graph)));
					}
					Err(err) => state.set(LoadState::Failed {
						message: err.to_string(),
						retryable: err.is_retryable(),
					}),
				}
			});
		})
	};

	let refresh = {
		let client = client.clone();
		Callback::new(move |()| {
			if refreshing.get_untracked() {
				return;
			}
			refreshing.set(true);
			let client = client.clone();
			spawn_local(async move {
				match client.refresh().await {
					Ok(()) => reload.run(()),
					Err(err) => state.set(LoadState::Failed {
						message: format!("Data refresh failed: {}", err),
						retryable: true,
					}),
				}
				refreshing.set(false);
			});
		})
	};

	spawn_local(async move {
		let ok = client.health().await.map(|h| h.is_ok()).unwrap_or(false);
		healthy.set(Some(ok));
	});
	reload.run(());

	let graph = Memo::new(move |_| state.with(|s| s.graph().cloned()));
	let view = Memo::new(move |_| match graph.get() {
		Some(g) => filter.with(|f| project(&g.nodes, &g.edges, f)),
		None => GraphView::default(),
	});
	let ticks = Signal::derive(move || graph.get().map(|g| g.ticks.clone()).unwrap_or_default());
	let packages = Signal::derive(move || graph.get().map(|g| g.packages.clone()).unwrap_or_default());
	let categories =
		Signal::derive(move || graph.get().map(|g| g.categories.clone()).unwrap_or_default());
	let total_nodes = Signal::derive(move || graph.get().map_or(0, |g| g.nodes.len()));
	let total_edges = Signal::derive(move || graph.get().map_or(0, |g| g.edges.len()));
	let visible_nodes = Signal::derive(move || view.with(|v| v.nodes.len()));
	let visible_edges = Signal::derive(move || view.with(|v| v.edges.len()));
	let selected_id = Signal::derive(move || selected.with(|n| n.as_ref().map(|n| n.id.clone())));

	let on_select = Callback::new(move |node: Option<Node>| selected.set(node));
	let on_close = Callback::new(move |()| selected.set(None));

	let body = move || match state.get() {
		LoadState::Loading => {
			view! { <LoadingSpinner message="Loading visualization data..." /> }.into_any()
		}
		LoadState::Failed { message, retryable } => {
			view! { <ErrorDisplay message=message retryable=retryable on_retry=reload /> }.into_any()
		}
		LoadState::Ready(graph) if graph.nodes.is_empty() => {
			view! { <EmptyState on_refresh=refresh refreshing=refreshing /> }.into_any()
		}
		LoadState::Ready(_) => view! {
			<div class="fullscreen-graph">
				<EvolutionGraphCanvas
					view=view
					ticks=ticks
					selected=selected_id
					on_select=on_select
					config=config.clone()
				/>
				<div class="graph-overlay top-left">
					<FilterPanel
						packages=packages
						categories=categories
						filter=filter
						total_nodes=total_nodes
						visible_nodes=visible_nodes
					/>
				</div>
				<div class="graph-overlay bottom-right">
					<GraphStats
						visible_nodes=visible_nodes
						total_nodes=total_nodes
						visible_edges=visible_edges
						total_edges=total_edges
						healthy=healthy
						on_refresh=refresh
						refreshing=refreshing
					/>
				</div>
				<NodeDetails node=selected on_close=on_close />
			</div>
		}
		.into_any(),
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{body}
		</ErrorBoundary>
	}
}
