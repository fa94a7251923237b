//! Layout tunables.

use serde::{Deserialize, Serialize};

/// Spacing constants shared by the graph and the timeline axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Horizontal distance between consecutive releases.
	pub version_spacing: f64,
	/// Minimum vertical distance between package tracks.
	pub package_spacing: f64,
	/// X of the first release column.
	pub offset_x: f64,
	/// Y of the first package track.
	pub offset_y: f64,
	/// Node box width.
	pub node_width: f64,
	/// Node box height.
	pub node_height: f64,
	/// Height of the release band drawn above the tracks.
	pub timeline_height: f64,
	/// Vertical distance between stacked revision branches.
	pub branch_spacing: f64,
	/// Free space kept between the deepest branch and the next track.
	pub track_gap: f64,
	/// Major prefixes whose revisions are drawn above their track.
	pub inverted_branches: Vec<String>,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			version_spacing: 180.0,
			package_spacing: 230.0,
			offset_x: 150.0,
			offset_y: 100.0,
			node_width: 120.0,
			node_height: 60.0,
			timeline_height: 60.0,
			branch_spacing: 70.0,
			track_gap: 40.0,
			inverted_branches: Vec::new(),
		}
	}
}

impl LayoutConfig {
	/// Whether revisions of `major` are drawn above the track.
	pub fn is_inverted(&self, major: &str) -> bool {
		self.inverted_branches.iter().any(|m| m == major)
	}

	/// X coordinate of a release at `rank` on the timeline.
	pub fn x_for_rank(&self, rank: usize) -> f64 {
		self.offset_x + rank as f64 * self.version_spacing
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_config_keeps_defaults() {
		let config: LayoutConfig =
			serde_json::from_str(r#"{"version_spacing": 200, "inverted_branches": ["1.5"]}"#)
				.unwrap();
		assert_eq!(config.version_spacing, 200.0);
		assert_eq!(config.package_spacing, 230.0);
		assert!(config.is_inverted("1.5"));
		assert!(!config.is_inverted("1.6"));
	}

	#[test]
	fn rank_maps_to_evenly_spaced_x() {
		let config = LayoutConfig::default();
		assert_eq!(config.x_for_rank(0), 150.0);
		assert_eq!(config.x_for_rank(3), 150.0 + 3.0 * 180.0);
	}
}
