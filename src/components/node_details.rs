use leptos::prelude::*;

use crate::layout::style::node_style;
use crate::layout::version::VersionKind;
use crate::layout::Node;

const RELEASE_NOTES: &str = "https://go.dev/doc";

/// Release notes page for a version. Revisions are listed on the release
/// history page rather than getting their own notes.
pub fn release_notes_url(version: &str, kind: &VersionKind) -> String {
	match kind {
		VersionKind::Major => format!("{}/go{}", RELEASE_NOTES, version),
		VersionKind::Minor { .. } => format!("{}/devel/release#go{}", RELEASE_NOTES, version),
	}
}

/// Popover describing the clicked node.
#[component]
pub fn NodeDetails(#[prop(into)] node: Signal<Option<Node>>, on_close: Callback<()>) -> impl IntoView {
	move || {
		node.get().map(|node| {
			let style = node_style(&node.category);
			let badge = format!(
				"background: {}; color: {}; border: 1px solid {};",
				style.fill, style.text, style.border
			);
			let notes = release_notes_url(&node.version, &node.kind);
			let issue = match (&node.kind, node.source_link.clone()) {
				(VersionKind::Minor { .. }, Some(link)) => Some(view! {
					<a class="details-link issue" href=link target="_blank" rel="noopener noreferrer">
						"Issue ↗"
					</a>
				}),
				_ => None,
			};
			let description = if node.description.is_empty() {
				"No detailed description.".to_string()
			} else {
				node.description.clone()
			};
			let summary = (!node.localized_summary.is_empty()).then(|| {
				let text = node.localized_summary.clone();
				view! { <p class="details-summary">{text}</p> }
			});

			view! {
				<div class="package-details">
					<div class="details-header">
						<h3>"Package details"</h3>
						<button class="details-close" on:click=move |_| on_close.run(())>"×"</button>
					</div>
					<div class="details-field">
						<label>"Package"</label>
						<div class="mono">{node.package.clone()}</div>
					</div>
					<div class="details-field">
						<label>"Version"</label>
						<div class="mono">{node.version.clone()}</div>
					</div>
					<div class="details-field">
						<label>"Change type"</label>
						<span class="details-badge" style=badge>{node.category.label().to_string()}</span>
					</div>
					<div class="details-field">
						<label>"Release date"</label>
						<div>{node.release_date.format("%Y-%m-%d").to_string()}</div>
						<div class="details-links">
							{issue}
							<a class="details-link" href=notes target="_blank" rel="noopener noreferrer">
								"Release notes ↗"
							</a>
						</div>
					</div>
					<div class="details-field">
						<label>"Changes"</label>
						<div class="details-description">{description}</div>
						{summary}
					</div>
				</div>
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn notes_link_depends_on_version_kind() {
		assert_eq!(
			release_notes_url("1.22", &VersionKind::Major),
			"https://go.dev/doc/go1.22"
		);
		let minor = VersionKind::classify("1.22.3").unwrap();
		assert_eq!(
			release_notes_url("1.22.3", &minor),
			"https://go.dev/doc/devel/release#go1.22.3"
		);
	}
}
