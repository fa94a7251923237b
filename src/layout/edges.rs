//! Connects the nodes of one package.
//!
//! Three kinds of connection are drawn: a chain through the major
//! releases, one branch from each major to the first revision in its line,
//! and a chain through the revisions of each line.

use super::nodes::{PackageNodes, chronological};
use super::style::edge_style;
use super::types::{ChangeCategory, Edge, EdgeKind, Node};

fn connect(source: &Node, target: &Node, kind: EdgeKind, animated: bool) -> Edge {
	Edge {
		id: Edge::id_for(&source.id, &target.id, kind),
		source: source.id.clone(),
		target: target.id.clone(),
		kind,
		animated,
		style: edge_style(&target.category),
	}
}

/// Chain edges between chronologically adjacent nodes.
fn chain(nodes: &[Node], animate: impl Fn(&Node) -> bool) -> Vec<Edge> {
	let mut sorted: Vec<&Node> = nodes.iter().collect();
	sorted.sort_by(|a, b| chronological(a, b));
	sorted
		.windows(2)
		.map(|pair| connect(pair[0], pair[1], EdgeKind::Chain, animate(pair[1])))
		.collect()
}

/// Branch edge from the anchor major to the earliest revision, or `None`
/// when the package never shipped the major itself.
pub fn branch_edge(majors: &[Node], prefix: &str, group: &[Node]) -> Option<Edge> {
	let anchor = majors.iter().find(|node| node.version == prefix)?;
	let first = group.iter().min_by(|a, b| chronological(a, b))?;
	Some(connect(anchor, first, EdgeKind::Branch, false))
}

/// Major chain, then branch edge and revision chain for each group.
pub fn synthesize_edges(nodes: &PackageNodes) -> Vec<Edge> {
	let mut edges = chain(&nodes.majors, |to| to.category == ChangeCategory::Added);

	for (prefix, group) in &nodes.minors {
		match branch_edge(&nodes.majors, prefix, group) {
			Some(edge) => edges.push(edge),
			None => log::debug!(
				"{}: no {} release to branch {} revisions from",
				nodes.package,
				prefix,
				group.len()
			),
		}
		edges.extend(chain(group, |to| to.category == ChangeCategory::SecurityFix));
	}

	edges
}
