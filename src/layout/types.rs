//! Input records from the backend and the positioned graph produced from them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::style::{EdgeStyle, NodeStyle};
use super::version::VersionKind;

/// Point on the layout plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal, grows right.
	pub x: f64,
	/// Vertical, grows down.
	pub y: f64,
}

/// One published release of the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
	/// Version string, e.g. `1.22`.
	#[serde(rename = "version")]
	pub identifier: String,
	/// When it shipped.
	pub release_date: DateTime<Utc>,
	/// Release notes, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

/// Kind of change a package went through in one release.
///
/// Strings the backend sends that are not part of the known set are kept in
/// [`ChangeCategory::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChangeCategory {
	/// New package or API.
	Added,
	/// Changed behavior or API.
	Modified,
	/// Still present but discouraged.
	Deprecated,
	/// Gone in this version.
	Removed,
	/// Bug fix.
	BugFix,
	/// Fix for a vulnerability.
	SecurityFix,
	/// Test-only change.
	TestFix,
	/// Platform or compatibility change.
	Compatibility,
	/// Hardening without a known vulnerability.
	SecurityEnhancement,
	/// Present since the base release.
	Base,
	/// Any category the backend adds later.
	Other(String),
}

impl ChangeCategory {
	/// Every known category, in display order.
	pub const KNOWN: [ChangeCategory; 10] = [
		ChangeCategory::Added,
		ChangeCategory::Modified,
		ChangeCategory::Deprecated,
		ChangeCategory::Removed,
		ChangeCategory::BugFix,
		ChangeCategory::SecurityFix,
		ChangeCategory::TestFix,
		ChangeCategory::Compatibility,
		ChangeCategory::SecurityEnhancement,
		ChangeCategory::Base,
	];

	/// Name used on the wire and in the UI.
	pub fn label(&self) -> &str {
		match self {
			ChangeCategory::Added => "Added",
			ChangeCategory::Modified => "Modified",
			ChangeCategory::Deprecated => "Deprecated",
			ChangeCategory::Removed => "Removed",
			ChangeCategory::BugFix => "Bug Fix",
			ChangeCategory::SecurityFix => "Security Fix",
			ChangeCategory::TestFix => "Test Fix",
			ChangeCategory::Compatibility => "Compatibility",
			ChangeCategory::SecurityEnhancement => "Security Enhancement",
			ChangeCategory::Base => "Base",
			ChangeCategory::Other(raw) => raw,
		}
	}
}

impl From<String> for ChangeCategory {
	fn from(raw: String) -> Self {
		Self::KNOWN
			.iter()
			.find(|known| known.label() == raw)
			.cloned()
			.unwrap_or(ChangeCategory::Other(raw))
	}
}

impl From<&str> for ChangeCategory {
	fn from(raw: &str) -> Self {
		ChangeCategory::from(raw.to_string())
	}
}

impl From<ChangeCategory> for String {
	fn from(category: ChangeCategory) -> Self {
		match category {
			ChangeCategory::Other(raw) => raw,
			known => known.label().to_string(),
		}
	}
}

impl fmt::Display for ChangeCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// What happened to one package in one release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionChangeRecord {
	/// Release identifier the change shipped in.
	pub version: String,
	/// Release date of `version`.
	pub release_date: DateTime<Utc>,
	/// Kind of change.
	#[serde(rename = "change_type")]
	pub category: ChangeCategory,
	/// Release-note text.
	#[serde(default)]
	pub description: String,
	/// Translated summary, possibly empty.
	#[serde(rename = "summary_ja", default)]
	pub localized_summary: String,
	/// Issue or change list link.
	#[serde(rename = "source_url", default, skip_serializing_if = "Option::is_none")]
	pub source_link: Option<String>,
}

/// Package name to the changes recorded for it, in any order.
pub type EvolutionIndex = BTreeMap<String, Vec<VersionChangeRecord>>;

/// Payload of `GET /visualization`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualizationData {
	/// Every release, in any order.
	#[serde(default)]
	pub releases: Vec<Release>,
	/// Package names, possibly including some without records.
	#[serde(default)]
	pub packages: Vec<String>,
	/// Change records per package.
	#[serde(default)]
	pub package_evolution: EvolutionIndex,
}

/// A package at one version, placed on the plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
	/// `package-version`.
	pub id: String,
	/// Owning package.
	pub package: String,
	/// Release identifier.
	pub version: String,
	/// Major or revision.
	pub kind: VersionKind,
	/// Top-left corner of the box.
	pub position: Point,
	/// Kind of change.
	pub category: ChangeCategory,
	/// Release-note text.
	pub description: String,
	/// Translated summary, possibly empty.
	pub localized_summary: String,
	/// Release date of `version`.
	pub release_date: DateTime<Utc>,
	/// Issue or change list link.
	pub source_link: Option<String>,
	/// Colors from the category.
	pub style: NodeStyle,
}

impl Node {
	/// Join key shared by nodes, edges and the view projection.
	pub fn id_for(package: &str, version: &str) -> String {
		format!("{}-{}", package, version)
	}
}

/// How two nodes of a package relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	/// Consecutive versions of the same kind.
	Chain,
	/// Major release to the first revision of its line.
	Branch,
}

/// Directed edge between two nodes of one package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
	/// Built by [`Edge::id_for`].
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Chain or branch.
	pub kind: EdgeKind,
	/// Drawn with a flowing dash.
	pub animated: bool,
	/// Colors from the target's category.
	pub style: EdgeStyle,
}

impl Edge {
	/// `{source}-to-{target}` for chains, `{source}-branch-{target}` for branches.
	pub fn id_for(source: &str, target: &str, kind: EdgeKind) -> String {
		match kind {
			EdgeKind::Chain => format!("{}-to-{}", source, target),
			EdgeKind::Branch => format!("{}-branch-{}", source, target),
		}
	}
}

/// Axis label for one release, aligned with the nodes drawn on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineTick {
	/// Release identifier.
	pub identifier: String,
	/// Release date.
	pub release_date: DateTime<Utc>,
	/// Column X, same as the nodes below it.
	pub x: f64,
}

/// Records the layout dropped instead of placing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LayoutDiagnostics {
	/// `package-version` ids whose version is not on the timeline.
	pub unresolved: Vec<String>,
	/// Release identifiers with neither two nor three components.
	pub malformed_releases: Vec<String>,
	/// `package-version` ids of records filed under such an identifier.
	pub malformed_records: Vec<String>,
}

/// Complete output of one layout run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EvolutionGraph {
	/// Placed nodes.
	pub nodes: Vec<Node>,
	/// Chain and branch edges.
	pub edges: Vec<Edge>,
	/// Timeline axis labels.
	pub ticks: Vec<TimelineTick>,
	/// Distinct package names carried by `nodes`, sorted.
	pub packages: Vec<String>,
	/// Distinct categories carried by `nodes`, sorted.
	pub categories: Vec<ChangeCategory>,
	/// What was skipped.
	pub diagnostics: LayoutDiagnostics,
}
