//! Places every change record of a package on the plane.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::config::LayoutConfig;
use super::style::node_style;
use super::timeline::Timeline;
use super::types::{EvolutionIndex, Node, Point, VersionChangeRecord};
use super::version::{VersionIndex, VersionKind};

/// Why a record produced no node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
	/// The version is not on the timeline.
	Unresolved(String),
	/// The version is on the timeline but has neither two nor three
	/// components.
	Malformed(String),
}

/// Nodes of one package, split into the main line and its revision groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageNodes {
	/// Package name.
	pub package: String,
	/// Track index from the package order.
	pub track: usize,
	/// Chronological.
	pub majors: Vec<Node>,
	/// Major prefix to its revisions, each list chronological.
	pub minors: BTreeMap<String, Vec<Node>>,
	/// Records that produced no node.
	pub skipped: Vec<Skipped>,
}

impl PackageNodes {
	/// All nodes, majors first, then each revision group in prefix order.
	pub fn into_nodes(self) -> impl Iterator<Item = Node> {
		self.majors
			.into_iter()
			.chain(self.minors.into_values().flatten())
	}
}

/// Order shared by node lists and the edge chains built over them.
pub(crate) fn chronological(a: &Node, b: &Node) -> Ordering {
	a.release_date
		.cmp(&b.release_date)
		.then_with(|| a.version.cmp(&b.version))
}

/// Vertical geometry of the package tracks.
///
/// Track spacing is sized from the deepest revision fan-out of any package,
/// measured to the bottom of its boxes, so branches of one track never reach
/// into the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
	/// Y of track 0.
	pub origin_y: f64,
	/// Distance between consecutive tracks.
	pub package_spacing: f64,
	/// Distance between revision lanes.
	pub branch_spacing: f64,
}

impl TrackGeometry {
	/// Sizes the tracks for every group with a record on the timeline.
	pub fn new(index: &EvolutionIndex, versions: &VersionIndex, config: &LayoutConfig) -> Self {
		let recorded: HashSet<&str> = index
			.values()
			.flatten()
			.map(|record| record.version.as_str())
			.collect();

		let mut lanes_below = 0;
		let mut lane_above = 0;
		// Only groups with a record on the timeline get drawn.
		let placed_groups = versions
			.minors_by_major()
			.iter()
			.filter(|(_, minors)| minors.iter().any(|m| recorded.contains(m.as_str())))
			.map(|(major, _)| major);
		for major in placed_groups {
			if config.is_inverted(major) {
				lane_above = 1;
			} else {
				lanes_below = lanes_below.max(versions.branch_lane(major));
			}
		}

		// Top of the inverted lane to the bottom of the deepest branch box.
		let extent = (lanes_below + lane_above) as f64 * config.branch_spacing + config.node_height;
		Self {
			origin_y: config.offset_y + lane_above as f64 * config.branch_spacing,
			package_spacing: config.package_spacing.max(extent + config.track_gap),
			branch_spacing: config.branch_spacing,
		}
	}

	/// Y of the major row of `track`.
	pub fn track_y(&self, track: usize) -> f64 {
		self.origin_y + track as f64 * self.package_spacing
	}

	/// Offset of a revision in `lane` from its track; inverted groups sit a
	/// single lane above.
	pub fn branch_offset(&self, lane: usize, inverted: bool) -> f64 {
		if inverted {
			-self.branch_spacing
		} else {
			lane as f64 * self.branch_spacing
		}
	}
}

/// Turns change records into placed nodes.
pub struct NodeSynthesizer<'a> {
	timeline: &'a Timeline,
	versions: &'a VersionIndex,
	config: &'a LayoutConfig,
	geometry: TrackGeometry,
}

impl<'a> NodeSynthesizer<'a> {
	/// Synthesizer over a fixed timeline and geometry.
	pub fn new(
		timeline: &'a Timeline,
		versions: &'a VersionIndex,
		config: &'a LayoutConfig,
		geometry: TrackGeometry,
	) -> Self {
		Self {
			timeline,
			versions,
			config,
			geometry,
		}
	}

	/// Places one record. Records the timeline doesn't know, or whose
	/// identifier is malformed, come back as [`Skipped`].
	pub fn place(
		&self,
		package: &str,
		track: usize,
		record: &VersionChangeRecord,
	) -> Result<Node, Skipped> {
		let id = Node::id_for(package, &record.version);
		let rank = self
			.timeline
			.rank(&record.version)
			.ok_or_else(|| Skipped::Unresolved(id.clone()))?;
		let kind = VersionKind::classify(&record.version)
			.ok_or_else(|| Skipped::Malformed(id.clone()))?;

		let base_y = self.geometry.track_y(track);
		let y = match &kind {
			VersionKind::Major => base_y,
			VersionKind::Minor { major } => {
				base_y
					+ self.geometry.branch_offset(
						self.versions.branch_lane(major),
						self.config.is_inverted(major),
					)
			}
		};

		Ok(Node {
			id,
			package: package.to_string(),
			version: record.version.clone(),
			kind,
			position: Point {
				x: self.config.x_for_rank(rank),
				y,
			},
			category: record.category.clone(),
			description: record.description.clone(),
			localized_summary: record.localized_summary.clone(),
			release_date: record.release_date,
			source_link: record.source_link.clone(),
			style: node_style(&record.category),
		})
	}

	/// Places every record of one package, skipping what cannot be placed.
	pub fn synthesize(
		&self,
		package: &str,
		track: usize,
		records: &[VersionChangeRecord],
	) -> PackageNodes {
		let mut sorted: Vec<&VersionChangeRecord> = records.iter().collect();
		sorted.sort_by(|a, b| {
			a.release_date
				.cmp(&b.release_date)
				.then_with(|| a.version.cmp(&b.version))
		});

		let mut placed: Vec<Node> = Vec::with_capacity(sorted.len());
		let mut slots: HashMap<String, usize> = HashMap::new();
		let mut skipped = Vec::new();
		for record in sorted {
			match self.place(package, track, record) {
				Ok(node) => match slots.get(&node.id) {
					Some(&slot) => placed[slot] = node,
					None => {
						slots.insert(node.id.clone(), placed.len());
						placed.push(node);
					}
				},
				Err(skip) => {
					log::debug!("Skipping {}@{}: {:?}", package, record.version, skip);
					skipped.push(skip);
				}
			}
		}

		let mut majors = Vec::new();
		let mut minors: BTreeMap<String, Vec<Node>> = BTreeMap::new();
		for node in placed {
			match node.kind.major_prefix() {
				None => majors.push(node),
				Some(prefix) => minors.entry(prefix.to_string()).or_default().push(node),
			}
		}
		majors.sort_by(chronological);
		for group in minors.values_mut() {
			group.sort_by(chronological);
		}

		PackageNodes {
			package: package.to_string(),
			track,
			majors,
			minors,
			skipped,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::test_support::{record, release};
	use crate::layout::types::{ChangeCategory, Release};
	use pretty_assertions::assert_eq;

	fn releases() -> Vec<Release> {
		vec![
			release("1.20", "2023-02-01"),
			release("1.20.1", "2023-02-14"),
			release("1.21", "2023-08-08"),
			release("1.21.1", "2023-09-06"),
			release("1.21.2", "2023-10-05"),
			release("1.22", "2024-02-06"),
		]
	}

	fn fixture(index: &EvolutionIndex, config: &LayoutConfig) -> (Timeline, VersionIndex, TrackGeometry) {
		let timeline = Timeline::new(&releases());
		let versions = VersionIndex::new(&timeline);
		let geometry = TrackGeometry::new(index, &versions, config);
		(timeline, versions, geometry)
	}

	#[test]
	fn places_majors_on_track_and_minors_below() {
		let records = vec![
			record("1.21.1", "2023-09-06", ChangeCategory::BugFix),
			record("1.21", "2023-08-08", ChangeCategory::Added),
			record("1.22", "2024-02-06", ChangeCategory::Modified),
		];
		let mut index = EvolutionIndex::new();
		index.insert("net/http".into(), records.clone());
		let config = LayoutConfig::default();
		let (timeline, versions, geometry) = fixture(&index, &config);
		let synth = NodeSynthesizer::new(&timeline, &versions, &config, geometry);

		let nodes = synth.synthesize("net/http", 2, &records);

		let major_versions: Vec<&str> = nodes.majors.iter().map(|n| n.version.as_str()).collect();
		assert_eq!(major_versions, vec!["1.21", "1.22"]);
		assert_eq!(nodes.minors["1.21"].len(), 1);

		let track_y = geometry.track_y(2);
		assert_eq!(nodes.majors[0].position, Point { x: 150.0 + 2.0 * 180.0, y: track_y });
		// 1.21 is the second known major, so its revisions use lane 2.
		let minor = &nodes.minors["1.21"][0];
		assert_eq!(minor.id, "net/http-1.21.1");
		assert_eq!(minor.position.x, 150.0 + 3.0 * 180.0);
		assert_eq!(minor.position.y, track_y + 2.0 * config.branch_spacing);
		assert_eq!(minor.style, node_style(&ChangeCategory::BugFix));
	}

	#[test]
	fn unresolved_and_malformed_records_are_skipped() {
		let mut all = releases();
		all.push(release("go1", "2012-03-28"));
		let timeline = Timeline::new(&all);
		let versions = VersionIndex::new(&timeline);
		let config = LayoutConfig::default();
		let index = EvolutionIndex::new();
		let geometry = TrackGeometry::new(&index, &versions, &config);
		let synth = NodeSynthesizer::new(&timeline, &versions, &config, geometry);

		let records = vec![
			record("1.99", "2030-01-01", ChangeCategory::Added),
			record("go1", "2012-03-28", ChangeCategory::Added),
			record("1.20", "2023-02-01", ChangeCategory::Added),
		];
		let nodes = synth.synthesize("fmt", 0, &records);

		assert_eq!(nodes.majors.len(), 1);
		assert_eq!(
			nodes.skipped,
			vec![
				Skipped::Malformed("fmt-go1".into()),
				Skipped::Unresolved("fmt-1.99".into()),
			]
		);
	}

	#[test]
	fn duplicate_version_keeps_last_record() {
		let mut second = record("1.21", "2023-08-08", ChangeCategory::Modified);
		second.description = "second".into();
		let records = vec![record("1.21", "2023-08-08", ChangeCategory::Added), second];
		let mut index = EvolutionIndex::new();
		index.insert("os".into(), records.clone());
		let config = LayoutConfig::default();
		let (timeline, versions, geometry) = fixture(&index, &config);
		let synth = NodeSynthesizer::new(&timeline, &versions, &config, geometry);

		let nodes = synth.synthesize("os", 0, &records);
		assert_eq!(nodes.majors.len(), 1);
		assert_eq!(nodes.majors[0].category, ChangeCategory::Modified);
		assert_eq!(nodes.majors[0].description, "second");
	}

	#[test]
	fn spacing_grows_with_deepest_fan_out() {
		let config = LayoutConfig {
			branch_spacing: 100.0,
			..LayoutConfig::default()
		};
		let mut index = EvolutionIndex::new();
		index.insert(
			"io".into(),
			vec![record("1.21.2", "2023-10-05", ChangeCategory::BugFix)],
		);
		let (_, _, geometry) = fixture(&index, &config);
		// 1.21 is major #1 -> lane 2, down to the bottom of its box, plus the gap.
		assert_eq!(
			geometry.package_spacing,
			2.0 * 100.0 + config.node_height + config.track_gap
		);
		assert_eq!(geometry.origin_y, config.offset_y);
	}

	#[test]
	fn inverted_group_sits_above_track() {
		let config = LayoutConfig {
			inverted_branches: vec!["1.20".into()],
			..LayoutConfig::default()
		};
		let records = vec![
			record("1.20", "2023-02-01", ChangeCategory::Added),
			record("1.20.1", "2023-02-14", ChangeCategory::SecurityFix),
		];
		let mut index = EvolutionIndex::new();
		index.insert("crypto/tls".into(), records.clone());
		let (timeline, versions, geometry) = fixture(&index, &config);
		assert_eq!(geometry.origin_y, config.offset_y + config.branch_spacing);

		let synth = NodeSynthesizer::new(&timeline, &versions, &config, geometry);
		let nodes = synth.synthesize("crypto/tls", 1, &records);
		let major_y = nodes.majors[0].position.y;
		let minor_y = nodes.minors["1.20"][0].position.y;
		assert_eq!(minor_y, major_y - config.branch_spacing);
		// Clear of the track above by at least the gap.
		let upper_bottom = geometry.track_y(0) + config.node_height;
		assert!(minor_y - upper_bottom >= config.track_gap);
	}
}
