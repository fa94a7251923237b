//! Visible subgraph for the current filter selection.

use std::collections::{BTreeSet, HashSet};

use super::types::{ChangeCategory, Edge, EvolutionGraph, Node};

/// User selection in the filter panel.
///
/// An empty set on either axis means that axis is not filtered at all,
/// rather than hiding everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
	/// Selected packages; empty selects all.
	pub packages: BTreeSet<String>,
	/// Selected categories; empty selects all.
	pub categories: BTreeSet<ChangeCategory>,
}

impl FilterState {
	/// Nothing selected on either axis.
	pub fn is_empty(&self) -> bool {
		self.packages.is_empty() && self.categories.is_empty()
	}

	/// Whether `node` passes both axes.
	pub fn matches(&self, node: &Node) -> bool {
		(self.packages.is_empty() || self.packages.contains(&node.package))
			&& (self.categories.is_empty() || self.categories.contains(&node.category))
	}

	/// Adds or removes one package.
	pub fn toggle_package(&mut self, package: &str) {
		if !self.packages.remove(package) {
			self.packages.insert(package.to_string());
		}
	}

	/// Adds or removes one category.
	pub fn toggle_category(&mut self, category: &ChangeCategory) {
		if !self.categories.remove(category) {
			self.categories.insert(category.clone());
		}
	}

	/// Selects every category, or clears the axis when all are already
	/// selected.
	pub fn toggle_all_categories(&mut self, available: &[ChangeCategory]) {
		if self.categories.len() == available.len() {
			self.categories.clear();
		} else {
			self.categories = available.iter().cloned().collect();
		}
	}

	/// Same as [`Self::toggle_all_categories`] over the packages currently
	/// shown by the search box.
	pub fn toggle_all_packages(&mut self, shown: &[String]) {
		if self.packages.len() == shown.len() {
			self.packages.clear();
		} else {
			self.packages = shown.iter().cloned().collect();
		}
	}

	/// Drops every selection.
	pub fn clear(&mut self) {
		self.packages.clear();
		self.categories.clear();
	}
}

/// Nodes and edges left after filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphView {
	/// Visible nodes, in graph order.
	pub nodes: Vec<Node>,
	/// Edges whose endpoints are both visible.
	pub edges: Vec<Edge>,
}

impl From<&EvolutionGraph> for GraphView {
	fn from(graph: &EvolutionGraph) -> Self {
		GraphView {
			nodes: graph.nodes.clone(),
			edges: graph.edges.clone(),
		}
	}
}

/// Keeps the nodes matching `filter` and the edges whose two endpoints
/// both survived.
pub fn project(nodes: &[Node], edges: &[Edge], filter: &FilterState) -> GraphView {
	let nodes: Vec<Node> = nodes
		.iter()
		.filter(|node| filter.matches(node))
		.cloned()
		.collect();
	let visible: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
	let edges = edges
		.iter()
		.filter(|edge| visible.contains(edge.source.as_str()) && visible.contains(edge.target.as_str()))
		.cloned()
		.collect();
	GraphView { nodes, edges }
}

/// Sorted distinct package names.
pub fn distinct_packages(nodes: &[Node]) -> Vec<String> {
	nodes
		.iter()
		.map(|node| node.package.clone())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

/// Sorted distinct change categories.
pub fn distinct_categories(nodes: &[Node]) -> Vec<ChangeCategory> {
	nodes
		.iter()
		.map(|node| node.category.clone())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

/// Case-insensitive substring search over package names.
pub fn search_packages(packages: &[String], query: &str) -> Vec<String> {
	let needle = query.trim().to_lowercase();
	packages
		.iter()
		.filter(|name| name.to_lowercase().contains(&needle))
		.cloned()
		.collect()
}
