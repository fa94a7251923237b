//! Release-timeline layout.
//!
//! Turns the backend's per-package change records into positioned nodes
//! and edges. The whole graph is rebuilt from scratch on every call and the
//! same input always produces the same output.
//!
//! # Module Structure
//!
//! - [`version`]: major/minor classification
//! - [`timeline`]: canonical release order, the X axis
//! - [`packages`]: package tracks, the Y axis
//! - [`nodes`]: node placement
//! - [`edges`]: chain and branch edges
//! - [`style`]: category colors
//! - [`filter`]: visible subgraph for a filter selection

pub mod config;
pub mod edges;
pub mod filter;
pub mod nodes;
pub mod packages;
pub mod style;
pub mod timeline;
pub mod types;
pub mod version;

use std::collections::HashMap;

pub use config::LayoutConfig;
pub use filter::{FilterState, GraphView, project};
pub use types::{
	ChangeCategory, Edge, EdgeKind, EvolutionGraph, EvolutionIndex, Node, Point, Release,
	VersionChangeRecord, VisualizationData,
};

use edges::synthesize_edges;
use nodes::{NodeSynthesizer, PackageNodes, Skipped, TrackGeometry};
use timeline::Timeline;
use types::LayoutDiagnostics;
use version::VersionIndex;

/// Runs the full layout pipeline.
pub fn build_graph(data: &VisualizationData, config: &LayoutConfig) -> EvolutionGraph {
	let timeline = Timeline::new(&data.releases);
	let versions = VersionIndex::new(&timeline);
	let order = packages::order_packages(&data.package_evolution, &data.packages);
	let geometry = TrackGeometry::new(&data.package_evolution, &versions, config);
	let synth = NodeSynthesizer::new(&timeline, &versions, config, geometry);

	let per_package: Vec<PackageNodes> = order
		.iter()
		.enumerate()
		.map(|(track, package)| {
			let records = data
				.package_evolution
				.get(package)
				.map(Vec::as_slice)
				.unwrap_or(&[]);
			synth.synthesize(package, track, records)
		})
		.collect();

	let edges: Vec<Edge> = per_package.iter().flat_map(synthesize_edges).collect();

	let mut diagnostics = LayoutDiagnostics {
		malformed_releases: versions.malformed().to_vec(),
		..LayoutDiagnostics::default()
	};
	for skip in per_package.iter().flat_map(|p| &p.skipped) {
		match skip {
			Skipped::Unresolved(id) => diagnostics.unresolved.push(id.clone()),
			Skipped::Malformed(id) => diagnostics.malformed_records.push(id.clone()),
		}
	}

	let nodes = dedup_nodes(per_package.into_iter().flat_map(PackageNodes::into_nodes));

	if !diagnostics.unresolved.is_empty() || !diagnostics.malformed_records.is_empty() {
		log::info!(
			"Layout skipped {} unresolved and {} malformed records",
			diagnostics.unresolved.len(),
			diagnostics.malformed_records.len()
		);
	}
	log::debug!(
		"Layout: {} releases, {} packages, {} nodes, {} edges",
		timeline.len(),
		order.len(),
		nodes.len(),
		edges.len()
	);

	EvolutionGraph {
		packages: filter::distinct_packages(&nodes),
		categories: filter::distinct_categories(&nodes),
		ticks: timeline.ticks(config),
		nodes,
		edges,
		diagnostics,
	}
}

/// Node ids are unique per package by construction; across packages a later
/// node with the same id replaces the earlier one in place.
fn dedup_nodes(nodes: impl Iterator<Item = Node>) -> Vec<Node> {
	let mut out: Vec<Node> = Vec::new();
	let mut slots: HashMap<String, usize> = HashMap::new();
	for node in nodes {
		match slots.get(&node.id) {
			Some(&slot) => out[slot] = node,
			None => {
				slots.insert(node.id.clone(), out.len());
				out.push(node);
			}
		}
	}
	out
}

#[cfg(test)]
pub(crate) mod test_support {
	use chrono::{DateTime, Utc};

	use super::types::{ChangeCategory, Release, VersionChangeRecord};

	pub fn date(day: &str) -> DateTime<Utc> {
		format!("{}T00:00:00Z", day).parse().unwrap()
	}

	pub fn release(identifier: &str, day: &str) -> Release {
		Release {
			identifier: identifier.into(),
			release_date: date(day),
			url: None,
		}
	}

	pub fn record(version: &str, day: &str, category: ChangeCategory) -> VersionChangeRecord {
		VersionChangeRecord {
			version: version.into(),
			release_date: date(day),
			category,
			description: String::new(),
			localized_summary: String::new(),
			source_link: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;
	use super::test_support::{record, release};
	use pretty_assertions::assert_eq;

	fn net_http() -> VisualizationData {
		let mut index = EvolutionIndex::new();
		index.insert(
			"net/http".into(),
			vec![
				record("1.21", "2023-08-08", ChangeCategory::Added),
				record("1.21.1", "2023-09-06", ChangeCategory::BugFix),
				record("1.22", "2024-02-06", ChangeCategory::Modified),
			],
		);
		VisualizationData {
			releases: vec![
				release("1.21", "2023-08-08"),
				release("1.21.1", "2023-09-06"),
				release("1.22", "2024-02-06"),
			],
			packages: vec!["net/http".into()],
			package_evolution: index,
		}
	}

	fn wide() -> VisualizationData {
		let mut data = net_http();
		data.releases.extend([
			release("1.22.1", "2024-03-05"),
			release("1.22.2", "2024-04-03"),
			release("2.0.1", "2025-01-10"),
			release("2.0.2", "2025-02-10"),
			release("bogus", "2024-05-01"),
		]);
		data.package_evolution.insert(
			"iter".into(),
			vec![
				record("2.0.2", "2025-02-10", ChangeCategory::SecurityFix),
				record("2.0.1", "2025-01-10", ChangeCategory::Added),
				record("1.99", "2030-01-01", ChangeCategory::Added),
			],
		);
		data.package_evolution.insert(
			"slices".into(),
			vec![
				record("1.22", "2024-02-06", ChangeCategory::Added),
				record("1.22.2", "2024-04-03", ChangeCategory::SecurityFix),
				record("1.22.1", "2024-03-05", ChangeCategory::BugFix),
			],
		);
		data
	}

	#[test]
	fn net_http_scenario() {
		let graph = build_graph(&net_http(), &LayoutConfig::default());

		let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["net/http-1.21", "net/http-1.22", "net/http-1.21.1"]);

		let edges: Vec<(&str, &str, EdgeKind)> = graph
			.edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str(), e.kind))
			.collect();
		assert_eq!(
			edges,
			vec![
				("net/http-1.21", "net/http-1.22", EdgeKind::Chain),
				("net/http-1.21", "net/http-1.21.1", EdgeKind::Branch),
			]
		);
		assert_eq!(graph.packages, vec!["net/http"]);
		assert_eq!(graph.ticks.len(), 3);
	}

	#[test]
	fn missing_major_leaves_revisions_unanchored() {
		let graph = build_graph(&wide(), &LayoutConfig::default());
		let iter_edges: Vec<&Edge> = graph
			.edges
			.iter()
			.filter(|e| e.source.starts_with("iter-"))
			.collect();
		assert_eq!(iter_edges.len(), 1);
		assert_eq!(iter_edges[0].kind, EdgeKind::Chain);
		assert_eq!(iter_edges[0].source, "iter-2.0.1");
		assert_eq!(iter_edges[0].target, "iter-2.0.2");
		assert!(iter_edges[0].animated);

		assert_eq!(graph.diagnostics.unresolved, vec!["iter-1.99".to_string()]);
		assert_eq!(graph.diagnostics.malformed_releases, vec!["bogus".to_string()]);
		assert!(graph.diagnostics.malformed_records.is_empty());
	}

	#[test]
	fn layout_is_deterministic() {
		let data = wide();
		let config = LayoutConfig::default();
		let first = build_graph(&data, &config);
		let second = build_graph(&data, &config);
		assert_eq!(first, second);
		assert_eq!(
			serde_json::to_string(&first).unwrap(),
			serde_json::to_string(&second).unwrap()
		);
	}

	#[test]
	fn ids_are_unique_and_edges_resolve() {
		let graph = build_graph(&wide(), &LayoutConfig::default());
		let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), graph.nodes.len());
		for edge in &graph.edges {
			assert!(ids.contains(edge.source.as_str()), "{}", edge.id);
			assert!(ids.contains(edge.target.as_str()), "{}", edge.id);
		}
	}

	#[test]
	fn later_releases_sit_further_right_on_each_track() {
		let graph = build_graph(&wide(), &LayoutConfig::default());
		for a in &graph.nodes {
			for b in &graph.nodes {
				if a.package == b.package && a.release_date < b.release_date {
					assert!(a.position.x < b.position.x, "{} vs {}", a.id, b.id);
				}
			}
		}
	}

	/// Vertical extent of every box on each track, in track order.
	fn track_extents(data: &VisualizationData, config: &LayoutConfig) -> Vec<(String, f64, f64)> {
		let graph = build_graph(data, config);
		packages::order_packages(&data.package_evolution, &data.packages)
			.into_iter()
			.map(|package| {
				let ys: Vec<f64> = graph
					.nodes
					.iter()
					.filter(|n| n.package == package)
					.map(|n| n.position.y)
					.collect();
				let top = ys.iter().copied().fold(f64::INFINITY, f64::min);
				let bottom = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max) + config.node_height;
				(package, top, bottom)
			})
			.collect()
	}

	fn assert_tracks_clear(data: &VisualizationData, config: &LayoutConfig) {
		let extents = track_extents(data, config);
		for pair in extents.windows(2) {
			let (upper, _, upper_bottom) = &pair[0];
			let (lower, lower_top, _) = &pair[1];
			assert!(
				lower_top - upper_bottom >= config.track_gap,
				"{} (bottom {}) runs into {} (top {})",
				upper,
				upper_bottom,
				lower,
				lower_top
			);
		}
	}

	#[test]
	fn tracks_do_not_overlap() {
		assert_tracks_clear(&wide(), &LayoutConfig::default());
	}

	#[test]
	fn deep_fan_out_clears_next_track() {
		let mut index = EvolutionIndex::new();
		index.insert(
			"aaa".into(),
			vec![
				record("1.18", "2022-03-15", ChangeCategory::Added),
				record("1.21", "2023-08-08", ChangeCategory::Modified),
				record("1.21.1", "2023-09-06", ChangeCategory::BugFix),
			],
		);
		index.insert(
			"bbb".into(),
			vec![record("1.19", "2022-08-02", ChangeCategory::Added)],
		);
		let data = VisualizationData {
			releases: vec![
				release("1.18", "2022-03-15"),
				release("1.19", "2022-08-02"),
				release("1.20", "2023-02-01"),
				release("1.21", "2023-08-08"),
				release("1.21.1", "2023-09-06"),
			],
			packages: vec!["aaa".into(), "bbb".into()],
			package_evolution: index,
		};
		let config = LayoutConfig::default();

		// 1.21 is the fourth major, so its revisions use lane 4.
		let extents = track_extents(&data, &config);
		assert_eq!(extents[0].2, config.offset_y + 4.0 * config.branch_spacing + config.node_height);
		assert_tracks_clear(&data, &config);

		let inverted = LayoutConfig {
			inverted_branches: vec!["1.21".into()],
			..LayoutConfig::default()
		};
		assert_tracks_clear(&data, &inverted);
	}

	#[test]
	fn malformed_identifiers_are_reported_once_per_source() {
		let mut index = EvolutionIndex::new();
		index.insert("fmt".into(), vec![record("go1", "2012-03-28", ChangeCategory::Base)]);
		index.insert("os".into(), vec![record("go1", "2012-03-28", ChangeCategory::Base)]);
		let data = VisualizationData {
			releases: vec![release("go1", "2012-03-28")],
			packages: vec![],
			package_evolution: index,
		};

		let graph = build_graph(&data, &LayoutConfig::default());

		assert!(graph.nodes.is_empty());
		assert_eq!(graph.diagnostics.malformed_releases, vec!["go1".to_string()]);
		assert_eq!(
			graph.diagnostics.malformed_records,
			vec!["fmt-go1".to_string(), "os-go1".to_string()]
		);
		assert!(graph.diagnostics.unresolved.is_empty());
	}

	#[test]
	fn colliding_ids_across_packages_keep_the_later_track() {
		// "go" + "rc-1.21" and "go-rc" + "1.21" both render as "go-rc-1.21".
		let mut index = EvolutionIndex::new();
		index.insert("go".into(), vec![record("rc-1.21", "2023-07-01", ChangeCategory::Added)]);
		index.insert("go-rc".into(), vec![record("1.21", "2023-08-08", ChangeCategory::Modified)]);
		let data = VisualizationData {
			releases: vec![release("rc-1.21", "2023-07-01"), release("1.21", "2023-08-08")],
			packages: vec![],
			package_evolution: index,
		};

		let graph = build_graph(&data, &LayoutConfig::default());

		assert_eq!(graph.nodes.len(), 1);
		let node = &graph.nodes[0];
		assert_eq!(node.id, "go-rc-1.21");
		assert_eq!(node.package, "go-rc");
		assert_eq!(node.version, "1.21");
		assert_eq!(node.category, ChangeCategory::Modified);
		assert_eq!(graph.packages, vec!["go-rc"]);
	}

	#[test]
	fn deserializes_backend_payload() {
		let json = r#"{
			"releases": [
				{"id": 1, "version": "1.21", "release_date": "2023-08-08T00:00:00Z", "url": "https://go.dev/doc/go1.21", "created_at": "2024-01-01T00:00:00Z"}
			],
			"packages": ["log/slog"],
			"package_evolution": {
				"log/slog": [
					{"version": "1.21", "release_date": "2023-08-08T00:00:00Z", "change_type": "Added", "description": "new package", "summary_ja": "summary"},
					{"version": "1.21", "release_date": "2023-08-08T00:00:00Z", "change_type": "Renamed", "description": "", "summary_ja": "", "source_url": "https://go.dev/issue/1"}
				]
			}
		}"#;
		let data: VisualizationData = serde_json::from_str(json).unwrap();
		let records = &data.package_evolution["log/slog"];
		assert_eq!(records[0].category, ChangeCategory::Added);
		assert_eq!(records[0].localized_summary, "summary");
		assert_eq!(records[1].category, ChangeCategory::Other("Renamed".into()));
		assert_eq!(records[1].source_link.as_deref(), Some("https://go.dev/issue/1"));

		let graph = build_graph(&data, &LayoutConfig::default());
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].category, ChangeCategory::Other("Renamed".into()));
	}
}
