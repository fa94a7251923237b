use leptos::prelude::*;

use crate::layout::filter::search_packages;
use crate::layout::style::node_style;
use crate::layout::{ChangeCategory, FilterState};

/// Package and change-category checkboxes driving the view projection.
#[component]
pub fn FilterPanel(
	#[prop(into)] packages: Signal<Vec<String>>,
	#[prop(into)] categories: Signal<Vec<ChangeCategory>>,
	filter: RwSignal<FilterState>,
	#[prop(into)] total_nodes: Signal<usize>,
	#[prop(into)] visible_nodes: Signal<usize>,
) -> impl IntoView {
	let (collapsed, set_collapsed) = signal(false);
	let (query, set_query) = signal(String::new());
	let shown = Memo::new(move |_| search_packages(&packages.get(), &query.get()));

	let all_categories_selected =
		move || filter.with(|f| f.categories.len() == categories.with(Vec::len));
	let all_packages_selected = move || filter.with(|f| f.packages.len() == shown.with(Vec::len));

	let category_rows = move || {
		categories
			.get()
			.into_iter()
			.map(|category| {
				let label = category.label().to_string();
				let input_id = format!("category-{}", label.replace(' ', "-"));
				let swatch = format!("background: {};", node_style(&category).border);
				let (checked, toggled) = (category.clone(), category);
				view! {
					<div class="filter-checkbox">
						<input
							type="checkbox"
							id=input_id.clone()
							prop:checked=move || filter.with(|f| f.categories.contains(&checked))
							on:change=move |_| filter.update(|f| f.toggle_category(&toggled))
						/>
						<span class="category-swatch" style=swatch></span>
						<label for=input_id>{label}</label>
					</div>
				}
			})
			.collect_view()
	};

	let package_rows = move || {
		let names = shown.get();
		if names.is_empty() {
			return view! { <div class="filter-empty">"No matching packages"</div> }.into_any();
		}
		names
			.into_iter()
			.map(|name| {
				let input_id = format!("package-{}", name);
				let (checked, toggled) = (name.clone(), name.clone());
				view! {
					<div class="filter-checkbox">
						<input
							type="checkbox"
							id=input_id.clone()
							prop:checked=move || filter.with(|f| f.packages.contains(&checked))
							on:change=move |_| filter.update(|f| f.toggle_package(&toggled))
						/>
						<label for=input_id>{name}</label>
					</div>
				}
			})
			.collect_view()
			.into_any()
	};

	view! {
		<div class="filter-controls">
			<div class="filter-header">
				<h3>"Filters"</h3>
				<button
					class="filter-clear"
					on:click=move |_| {
						filter.update(FilterState::clear);
						set_query.set(String::new());
					}
				>
					"Clear"
				</button>
				<button class="filter-collapse" on:click=move |_| set_collapsed.update(|c| *c = !*c)>
					{move || if collapsed.get() { "Expand" } else { "Collapse" }}
				</button>
			</div>

			<div class="filter-summary">
				{move || format!("Showing {} / {} nodes", visible_nodes.get(), total_nodes.get())}
			</div>

			<Show when=move || !collapsed.get()>
				<div class="filter-group">
					<div class="filter-group-header">
						<label class="filter-label">"Change type"</label>
						<button on:click=move |_| {
							let all = categories.get();
							filter.update(|f| f.toggle_all_categories(&all));
						}>
							{move || if all_categories_selected() { "Deselect all" } else { "Select all" }}
						</button>
					</div>
					<div class="filter-checkboxes">{category_rows}</div>
				</div>

				<div class="filter-group">
					<div class="filter-group-header">
						<label class="filter-label">"Package"</label>
						<button on:click=move |_| {
							let all = shown.get();
							filter.update(|f| f.toggle_all_packages(&all));
						}>
							{move || if all_packages_selected() { "Deselect all" } else { "Select all" }}
						</button>
					</div>
					<input
						type="text"
						class="filter-search"
						placeholder="Search packages..."
						prop:value=move || query.get()
						on:input=move |ev| set_query.set(event_target_value(&ev))
					/>
					<div class="filter-checkboxes scrollable">{package_rows}</div>
				</div>
			</Show>
		</div>
	}
}
